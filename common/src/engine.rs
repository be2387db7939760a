//! 登録番号検索エンジン
//!
//! 名簿のスナップショットから索引を構築し、表記揺れ・軽微な打ち間違いに
//! 強い検索を行う。
//!
//! ## 検索の優先順位（先に当たったものを返す）
//! 1. 完全一致（大文字化のみ）: 信頼度 100
//! 2. 正規化一致（英数字のみ・大文字）: 信頼度 95
//! 3. あいまい一致（編集距離）: 類似度 > 0.8 のとき round(類似度 * 100)
//!
//! 正規化後の長さが 3〜10 の範囲外なら 2 以降は行わない。
//! エンジンは構築後に変更しない。名簿が変わったら作り直す。

use crate::mask::mask_personal_info;
use crate::normalize::{is_searchable_len, normalize_plate};
use crate::similarity::similarity;
use crate::types::{MaskedView, MatchResult, MatchType, MemberRecord, RosterStats, Suggestion};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const EXACT_CONFIDENCE: u8 = 100;
pub const NORMALIZED_CONFIDENCE: u8 = 95;
pub const DEFAULT_MIN_ACCEPTABLE_CONFIDENCE: u8 = 80;
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// 候補表示に必要な最小入力文字数
const MIN_SUGGESTION_INPUT: usize = 2;

/// 検索オプション
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// 呼び出し側が採用する最低信頼度（`lookup` で適用）
    pub min_acceptable_confidence: u8,
    /// あいまい一致の類似度下限（この値を超えたときのみ採用）
    pub fuzzy_threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_acceptable_confidence: DEFAULT_MIN_ACCEPTABLE_CONFIDENCE,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

/// 名簿から導出される索引（値は名簿内の位置）
///
/// 同じキーが複数ある場合は後のレコードで上書きする。
/// 正規化索引はキーの辞書順で走査されるため、あいまい一致の同点は
/// 辞書順で最初のキーが勝つ。
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    exact: HashMap<String, usize>,
    normalized: BTreeMap<String, usize>,
}

impl SearchIndex {
    /// 名簿全体から索引を構築
    pub fn build(records: &[MemberRecord]) -> Self {
        let mut index = Self::default();

        for (pos, record) in records.iter().enumerate() {
            let raw = record.plate_number.trim();
            if raw.is_empty() {
                continue;
            }

            index.exact.insert(raw.to_uppercase(), pos);

            let normalized = normalize_plate(raw);
            if !normalized.is_empty() {
                index.normalized.insert(normalized, pos);
            }
        }

        index
    }

    pub fn exact_len(&self) -> usize {
        self.exact.len()
    }

    pub fn normalized_len(&self) -> usize {
        self.normalized.len()
    }

    fn get_exact(&self, key: &str) -> Option<usize> {
        self.exact.get(key).copied()
    }

    fn get_normalized(&self, key: &str) -> Option<usize> {
        self.normalized.get(key).copied()
    }
}

/// 登録番号検索エンジン
#[derive(Debug, Clone, Default)]
pub struct PlateSearchEngine {
    records: Vec<MemberRecord>,
    index: SearchIndex,
    options: SearchOptions,
}

impl PlateSearchEngine {
    /// デフォルトのオプションで構築
    pub fn new(records: Vec<MemberRecord>) -> Self {
        Self::with_options(records, SearchOptions::default())
    }

    pub fn with_options(records: Vec<MemberRecord>, options: SearchOptions) -> Self {
        let index = SearchIndex::build(&records);
        tracing::debug!(
            records = records.len(),
            exact_keys = index.exact_len(),
            normalized_keys = index.normalized_len(),
            "search index built"
        );

        Self {
            records,
            index,
            options,
        }
    }

    pub fn records(&self) -> &[MemberRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// 登録番号を検索する
    ///
    /// 見つからない場合は `None`。信頼度の下限は適用しない（`lookup` を参照）。
    pub fn search(&self, query: &str) -> Option<MatchResult<'_>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        // 1. 完全一致
        if let Some(pos) = self.index.get_exact(&query.to_uppercase()) {
            tracing::debug!(strategy = "exact", "plate matched");
            return Some(self.result(pos, MatchType::Exact, EXACT_CONFIDENCE));
        }

        // 2. 正規化一致
        let normalized = normalize_plate(query);
        if !is_searchable_len(&normalized) {
            tracing::debug!(len = normalized.len(), "normalized query out of range, skipping");
            return None;
        }

        if let Some(pos) = self.index.get_normalized(&normalized) {
            tracing::debug!(strategy = "normalized", "plate matched");
            return Some(self.result(pos, MatchType::Normalized, NORMALIZED_CONFIDENCE));
        }

        // 3. あいまい一致
        let (pos, score) = self.fuzzy_search(&normalized)?;
        let confidence = (score * 100.0).round().clamp(0.0, 100.0) as u8;
        tracing::debug!(strategy = "fuzzy", score, confidence, "plate matched");
        Some(self.result(pos, MatchType::Fuzzy, confidence))
    }

    /// 検索して、最低信頼度を満たす結果のみ返す
    pub fn lookup(&self, query: &str) -> Option<MatchResult<'_>> {
        self.search(query).filter(|m| self.is_acceptable(m))
    }

    /// 呼び出し側が採用してよい信頼度か
    pub fn is_acceptable(&self, result: &MatchResult<'_>) -> bool {
        result.confidence >= self.options.min_acceptable_confidence
    }

    /// 表示用にマスクする
    pub fn mask_personal_info(&self, record: &MemberRecord) -> MaskedView {
        mask_personal_info(record)
    }

    /// 入力途中の番号から候補を返す（名簿順、最大 `limit` 件）
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<Suggestion> {
        if partial.trim().chars().count() < MIN_SUGGESTION_INPUT {
            return Vec::new();
        }

        let prefix = normalize_plate(partial);
        if prefix.is_empty() {
            return Vec::new();
        }

        self.records
            .iter()
            .filter(|r| !r.plate_number.trim().is_empty())
            .filter(|r| normalize_plate(&r.plate_number).starts_with(&prefix))
            .take(limit)
            .map(|r| {
                let view = mask_personal_info(r);
                Suggestion {
                    display_text: format!("{} - {}", view.plate_number, view.display_name),
                    vehicle: view.vehicle(),
                    plate_number: view.plate_number,
                }
            })
            .collect()
    }

    /// 名簿の集計
    pub fn stats(&self) -> RosterStats {
        let mut seen_manufacturers = HashSet::new();
        let mut seen_car_types = HashSet::new();
        let mut stats = RosterStats {
            total_vehicles: self.records.len(),
            ..Default::default()
        };

        for record in &self.records {
            if record.is_active_member {
                stats.active_members += 1;
            }

            let manufacturer = record.manufacturer.trim();
            if !manufacturer.is_empty() && seen_manufacturers.insert(manufacturer) {
                stats.manufacturers.push(manufacturer.to_string());
            }

            let car_type = record.car_type.trim();
            if !car_type.is_empty() && seen_car_types.insert(car_type) {
                stats.car_types.push(car_type.to_string());
            }
        }

        stats
    }

    /// 正規化索引の全キーと比較し、最も類似度の高いものを返す
    fn fuzzy_search(&self, normalized: &str) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (key, &pos) in &self.index.normalized {
            let score = similarity(normalized, key);
            if score <= self.options.fuzzy_threshold {
                continue;
            }
            // 同点は先に見つかったもの（辞書順で小さいキー）を維持
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
        }

        best
    }

    fn result(&self, pos: usize, match_type: MatchType, confidence: u8) -> MatchResult<'_> {
        MatchResult {
            record: &self.records[pos],
            match_type,
            confidence,
        }
    }
}
