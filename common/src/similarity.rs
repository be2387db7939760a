//! 編集距離ベースの類似度

/// 類似度を計算（0.0-1.0）
///
/// `(maxLen - distance) / maxLen`。両方空なら1.0、片方だけ空なら0.0。
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return if b_len == 0 { 1.0 } else { 0.0 };
    }
    if b_len == 0 {
        return 0.0;
    }

    let distance = levenshtein_distance(a, b);
    let max_len = a_len.max(b_len);

    (max_len - distance) as f64 / max_len as f64
}

/// レーベンシュタイン距離を計算
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // 2行だけ保持
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("ABC1234", "ABC12345"), 1);
    }

    #[test]
    fn test_similarity() {
        assert!((similarity("ABC1234", "ABC1234") - 1.0).abs() < 1e-9);
        assert!((similarity("ABD1234", "ABC1234") - 6.0 / 7.0).abs() < 1e-9);
        assert!((similarity("ABCDE", "ABCDX") - 0.8).abs() < 1e-9);
        assert!(similarity("ABC1234", "XYZ9876") < 0.5);
    }

    #[test]
    fn test_similarity_empty() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "ABC"), 0.0);
        assert_eq!(similarity("ABC", ""), 0.0);
    }
}
