//! 登録番号の正規化
//!
//! 「同じ番号の表記違い」を判定する唯一の基準。
//! 索引構築時と検索時の両方で同じ関数を通す。

/// 正規化後の長さがこの範囲外なら検索しない
pub const MIN_NORMALIZED_LEN: usize = 3;
pub const MAX_NORMALIZED_LEN: usize = 10;

/// ASCII英数字以外を除去して大文字化
///
/// # Examples
/// ```
/// use car_lookup_common::normalize_plate;
///
/// assert_eq!(normalize_plate("abc-1234"), "ABC1234");
/// assert_eq!(normalize_plate(" GJ 01 ab-1234 "), "GJ01AB1234");
/// ```
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// 正規化済み文字列の長さが検索対象範囲内か
pub fn is_searchable_len(normalized: &str) -> bool {
    (MIN_NORMALIZED_LEN..=MAX_NORMALIZED_LEN).contains(&normalized.len())
}

/// 登録番号らしい入力か（長さ範囲内かつ英字と数字を両方含む）
pub fn is_plausible_plate(input: &str) -> bool {
    let normalized = normalize_plate(input);
    if !is_searchable_len(&normalized) {
        return false;
    }

    let has_letter = normalized.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = normalized.chars().any(|c| c.is_ascii_digit());
    has_letter && has_digit
}
