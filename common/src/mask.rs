//! 個人情報マスク
//!
//! 表示用の変換のみ。アクセス制御ではない。

use crate::types::{MaskedView, MemberRecord};

/// 姓の先頭から表示する文字数
const VISIBLE_LAST_NAME_CHARS: usize = 2;

/// 姓をマスクする（先頭2文字 + 残りの文字数分の `*`）
///
/// 2文字未満の場合はそのまま返す。文字数は `char` 単位で数える。
///
/// # Examples
/// ```
/// use car_lookup_common::mask_last_name;
///
/// assert_eq!(mask_last_name("Johnson"), "Jo*****");
/// assert_eq!(mask_last_name("Li"), "Li");
/// ```
pub fn mask_last_name(last_name: &str) -> String {
    let len = last_name.chars().count();
    if len < VISIBLE_LAST_NAME_CHARS {
        return last_name.to_string();
    }

    let visible: String = last_name.chars().take(VISIBLE_LAST_NAME_CHARS).collect();
    format!("{}{}", visible, "*".repeat(len - VISIBLE_LAST_NAME_CHARS))
}

/// 表示名（名 + マスク済みの姓）
pub fn display_name(record: &MemberRecord) -> String {
    format!("{} {}", record.first_name, mask_last_name(&record.last_name))
}

/// レコードを表示用に変換する
///
/// 出力に含めるのはマスク済み氏名・登録番号・メーカー・車種・会員ステータスのみ。
pub fn mask_personal_info(record: &MemberRecord) -> MaskedView {
    MaskedView {
        display_name: display_name(record),
        plate_number: record.plate_number.clone(),
        manufacturer: record.manufacturer.clone(),
        car_type: record.car_type.clone(),
        member_status: record.member_status().to_string(),
    }
}
