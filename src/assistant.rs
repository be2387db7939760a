//! チャットアシスタント
//!
//! 1. メッセージから登録番号らしい文字列を取り出してローカル検索
//! 2. LLMが設定されていれば、マスク済みコンテキスト付きで問い合わせ
//! 3. LLMが使えなければローカル結果・定型文で応答
//!
//! LLMに渡すのはマスク済みの1台分か集計値のみ。

use crate::llm::LlmClient;
use car_lookup_common::prompts::{build_privacy_context, build_system_prompt, CONTACT_NOTICE};
use car_lookup_common::{is_plausible_plate, normalize_plate, MaskedView, MatchType, PlateSearchEngine};
use regex::Regex;
use serde::Serialize;

/// 応答の出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Ai,
    Local,
}

/// ローカル検索で採用された結果（マスク済み）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMatch {
    pub view: MaskedView,
    pub match_type: MatchType,
    pub confidence: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub source: ReplySource,
    pub text: String,
    pub matched: Option<LocalMatch>,
}

/// 定型応答の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    BulkRequest,
    Greeting,
    Help,
    Maintenance,
    Other,
}

/// 一覧要求とみなすブランド名（名簿にないものも含む）
const KNOWN_BRANDS: &[&str] = &["jaguar", "bmw", "audi", "mercedes", "toyota", "honda"];
const BULK_PHRASES: &[&str] = &[
    "all cars",
    "list cars",
    "all members",
    "list members",
    "show all",
    "member list",
    "directory",
];

pub struct Assistant {
    engine: PlateSearchEngine,
    llm: Option<LlmClient>,
    organization: String,
}

impl Assistant {
    pub fn new(engine: PlateSearchEngine, llm: Option<LlmClient>, organization: impl Into<String>) -> Self {
        Self {
            engine,
            llm,
            organization: organization.into(),
        }
    }

    pub fn engine(&self) -> &PlateSearchEngine {
        &self.engine
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// メッセージ中の登録番号を解決する（最低信頼度を満たすもののみ）
    ///
    /// 問い合わせ対象は最初の候補1件だけ。見つからなければ他の候補は試さない。
    pub fn resolve_plate(&self, message: &str) -> Option<LocalMatch> {
        let candidate = primary_plate(message)?;
        let result = self.engine.lookup(&candidate)?;

        tracing::debug!(
            candidate = %candidate,
            match_type = %result.match_type,
            confidence = result.confidence,
            "plate resolved locally"
        );
        Some(LocalMatch {
            view: self.engine.mask_personal_info(result.record),
            match_type: result.match_type,
            confidence: result.confidence,
        })
    }

    /// メッセージに応答する
    pub async fn answer(&self, message: &str) -> Reply {
        let message = message.trim();
        let matched = self.resolve_plate(message);

        if let Some(llm) = &self.llm {
            let stats = self.engine.stats();
            let context = build_privacy_context(&self.organization, &stats, matched.as_ref().map(|m| &m.view));
            let system_prompt = build_system_prompt(&self.organization, &context);

            match llm.complete(&system_prompt, message).await {
                Ok(text) => {
                    return Reply {
                        source: ReplySource::Ai,
                        text,
                        matched,
                    }
                }
                Err(e) => {
                    tracing::warn!("LLM unavailable, falling back to local search: {}", e);
                }
            }
        }

        self.local_reply(message, matched)
    }

    /// LLMを使わない応答
    pub fn local_reply(&self, message: &str, matched: Option<LocalMatch>) -> Reply {
        let text = match &matched {
            Some(m) => format_vehicle_card(m),
            None => self.canned_response(message),
        };

        Reply {
            source: ReplySource::Local,
            text,
            matched,
        }
    }

    fn canned_response(&self, message: &str) -> String {
        if let Some(plate) = primary_plate(message) {
            return format!(
                "🔍 I don't have information about license plate {} in our database. Please check the number and try again.",
                plate.to_uppercase()
            );
        }

        let manufacturers = self.engine.stats().manufacturers;
        match classify_intent(message, &manufacturers) {
            Intent::BulkRequest => "🔒 **Privacy Protection**\n\nI don't share lists of cars or owners for privacy reasons.\n\nIf you need to identify a specific car owner, please provide the exact plate number, e.g. **ABC-1234**.".to_string(),
            Intent::Greeting => "👋 Welcome! I'm your car identification assistant. Give me a license plate number (e.g. ABC-1234) and I'll tell you whose car it is.".to_string(),
            Intent::Help => "🤖 I can help you with:\n• 🔍 Car owner identification by plate number (ABC-1234 or GJ-01-AB-1234)\n• 🚗 Car manufacturer and type for a given plate\n• 📋 Membership status of the owner\n\nJust type the plate number!".to_string(),
            Intent::Maintenance => "🚗 I'm here to help identify car owners, not to give maintenance advice. If you have a specific plate number, I can tell you whose car it is!".to_string(),
            Intent::Other => "🤖 I'm here to help identify car owners! Ask about a specific plate number (e.g. ABC-1234).".to_string(),
        }
    }
}

/// 問い合わせ対象の登録番号（メッセージ全体が番号ならそれ、なければ最初の候補）
pub fn primary_plate(message: &str) -> Option<String> {
    let message = message.trim();
    if is_plausible_plate(message) {
        return Some(message.to_string());
    }
    extract_plate_candidates(message).into_iter().next()
}

/// メッセージから登録番号の候補を取り出す（出現の優先度順）
///
/// 先に取り出した候補に含まれる部分文字列（`GJ-01-AB-1234` に対する `AB-1234` 等）は除く。
pub fn extract_plate_candidates(message: &str) -> Vec<String> {
    lazy_static::lazy_static! {
        static ref GJ_RE: Regex = Regex::new(r"(?i)\bGJ-\d{2}-[A-Z]{2}-\d{4}\b").unwrap();
        static ref DASHED_RE: Regex = Regex::new(r"(?i)\b[A-Z0-9]{2,4}-[A-Z0-9]{2,4}\b").unwrap();
        static ref BARE_RE: Regex = Regex::new(r"(?i)\b[A-Z0-9]{4,10}\b").unwrap();
    }

    let mut candidates: Vec<String> = Vec::new();
    let mut push = |s: &str| {
        let key = normalize_plate(s);
        if !candidates.iter().any(|c| normalize_plate(c).contains(&key)) {
            candidates.push(s.to_string());
        }
    };

    for m in GJ_RE.find_iter(message) {
        push(m.as_str());
    }
    for m in DASHED_RE.find_iter(message) {
        push(m.as_str());
    }
    for m in BARE_RE.find_iter(message) {
        if m.as_str().chars().any(|c| c.is_ascii_digit()) {
            push(m.as_str());
        }
    }

    candidates
}

/// 定型応答の分類
pub fn classify_intent(message: &str, manufacturers: &[String]) -> Intent {
    let lower = message.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has_word = |w: &str| words.contains(&w);

    let mentions_brand = KNOWN_BRANDS.iter().any(|b| has_word(*b))
        || manufacturers
            .iter()
            .map(|m| m.to_lowercase())
            .any(|m| !m.is_empty() && lower.contains(&m));

    if mentions_brand || BULK_PHRASES.iter().any(|p| lower.contains(p)) {
        return Intent::BulkRequest;
    }
    if ["hello", "hi", "hey"].iter().any(|w| has_word(*w)) {
        return Intent::Greeting;
    }
    if has_word("help") || lower.contains("what can you do") {
        return Intent::Help;
    }
    if ["maintenance", "oil", "service"].iter().any(|w| has_word(*w)) {
        return Intent::Maintenance;
    }
    Intent::Other
}

/// 車両カード（ローカル応答）
pub fn format_vehicle_card(m: &LocalMatch) -> String {
    let note = match m.match_type {
        MatchType::Fuzzy => format!("\n\n_Closest match ({}% confidence). Please double-check the plate._", m.confidence),
        _ => String::new(),
    };

    format!(
        "🚗 **{}**\n\n👤 **Owner:** {}\n🚙 **Vehicle:** {}\n📋 **Status:** {}{}\n\n{}",
        m.view.plate_number,
        m.view.display_name,
        m.view.vehicle(),
        m.view.member_status,
        note,
        CONTACT_NOTICE
    )
}
