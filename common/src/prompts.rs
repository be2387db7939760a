//! プロンプト生成モジュール
//!
//! LLMに渡すシステムプロンプトとコンテキストを組み立てる。
//! コンテキストに載せてよいのはマスク済みの表示用レコードか集計値のみ。

use crate::types::{MaskedView, RosterStats};

/// 一般コンテキストに載せるメーカー数・車種数の上限
const CONTEXT_MANUFACTURERS: usize = 3;
const CONTEXT_CAR_TYPES: usize = 4;

/// 車両カード末尾の案内文
pub const CONTACT_NOTICE: &str =
    "📞 Please contact the owner directly or connect with Trustee OR Secretary.";

/// 特定車両のコンテキスト（1行）
pub fn vehicle_context(view: &MaskedView) -> String {
    format!(
        "Car {}: Owner {}, {} - {}",
        view.plate_number,
        view.display_name,
        view.vehicle(),
        view.member_status
    )
}

/// 集計のみのコンテキスト
pub fn general_context(organization: &str, stats: &RosterStats) -> String {
    let manufacturers = stats
        .manufacturers
        .iter()
        .take(CONTEXT_MANUFACTURERS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    let car_types = stats
        .car_types
        .iter()
        .take(CONTEXT_CAR_TYPES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} has {} registered vehicles with {} active members. Popular brands include {}. Car types include {}.",
        organization, stats.total_vehicles, stats.active_members, manufacturers, car_types
    )
}

/// プライバシーに配慮したコンテキストを生成
///
/// 番号が特定できていればその1台のみ、できなければ集計値のみを返す。
pub fn build_privacy_context(
    organization: &str,
    stats: &RosterStats,
    matched: Option<&MaskedView>,
) -> String {
    match matched {
        Some(view) => vehicle_context(view),
        None => general_context(organization, stats),
    }
}

/// システムプロンプト生成
///
/// # Arguments
/// * `organization` - 組織名（例: "St. John's Indian Orthodox Church (SJIOC)"）
/// * `context` - `build_privacy_context` の出力
pub fn build_system_prompt(organization: &str, context: &str) -> String {
    format!(
        r#"You are the car lookup assistant for {organization}. You help members and visitors find out which member a parked car belongs to.

## Privacy rules
- First names may be shown in full.
- Last names: show ONLY the first 2 characters followed by one asterisk per remaining character (e.g. "Johnson" -> "Jo*****", "Smith" -> "Sm***").
- Never share addresses, phone numbers or other contact details.
- Never provide member lists, directories, or answers about "all members" or all cars of a brand.
- Only describe a vehicle when the user gives a specific plate number.

## Vehicle lookups
When a plate is resolved, answer with the plate, the masked owner name, the vehicle (manufacturer and type) and the membership status, and end with:
"{CONTACT_NOTICE}"

If the plate is unknown, ask the user to check the number (format like ABC-1234).

## Available data
{context}

Keep answers short (2-4 sentences) and friendly."#
    )
}
