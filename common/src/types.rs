//! 名簿・検索結果の型定義
//!
//! CLIとライブラリで共有される型:
//! - MemberRecord: 名簿の1行（デコード時に一度だけ構築）
//! - MatchResult: 検索エンジンの出力
//! - MaskedView: 画面・LLM・ログに出してよい唯一の表現

use serde::{Deserialize, Deserializer, Serialize};

/// 会員ステータスのラベル
pub const ACTIVE_MEMBER_LABEL: &str = "Active Member";
pub const NON_MEMBER_LABEL: &str = "Non-Member";

/// 名簿の1レコード
///
/// JSONは camelCase のキーと、CSVヘッダー由来のキー（`"First Name"` 等）の両方を受け付ける。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    #[serde(default, alias = "First Name")]
    pub first_name: String,

    #[serde(default, alias = "Last Name")]
    pub last_name: String,

    /// 登録番号（入力そのまま。区切り文字やスペースを含むことがある）
    #[serde(default, alias = "Plate Number", alias = "Car Number", alias = "carNumber")]
    pub plate_number: String,

    #[serde(default, alias = "Car Manufacturer")]
    pub manufacturer: String,

    #[serde(default, alias = "Car Type")]
    pub car_type: String,

    #[serde(
        default,
        alias = "Member",
        alias = "member",
        deserialize_with = "deserialize_member_flag"
    )]
    pub is_active_member: bool,
}

impl MemberRecord {
    pub fn member_status(&self) -> &'static str {
        if self.is_active_member {
            ACTIVE_MEMBER_LABEL
        } else {
            NON_MEMBER_LABEL
        }
    }
}

/// Y/N・true/false・1/0 のいずれでも受け付ける
fn deserialize_member_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Number(n) => n != 0,
        Flag::Text(s) => crate::roster::parse_member_flag(&s),
    })
}

/// マッチ種別（優先順位の高い順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Normalized,
    Fuzzy,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Exact => write!(f, "exact"),
            MatchType::Normalized => write!(f, "normalized"),
            MatchType::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// 検索結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult<'a> {
    pub record: &'a MemberRecord,
    pub match_type: MatchType,
    /// 0-100
    pub confidence: u8,
}

/// マスク済みの表示用レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedView {
    pub display_name: String,
    pub plate_number: String,
    pub manufacturer: String,
    pub car_type: String,
    pub member_status: String,
}

impl MaskedView {
    /// "Manufacturer CarType"
    pub fn vehicle(&self) -> String {
        format!("{} {}", self.manufacturer, self.car_type).trim().to_string()
    }
}

/// 入力補完の候補
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub plate_number: String,
    pub display_text: String,
    pub vehicle: String,
}

/// 名簿の集計（個人を特定しない情報のみ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStats {
    pub total_vehicles: usize,
    pub active_members: usize,
    /// 出現順
    pub manufacturers: Vec<String>,
    /// 出現順
    pub car_types: Vec<String>,
}
