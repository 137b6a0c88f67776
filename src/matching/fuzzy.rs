// ============================================================================
// Similarity scorers on a 0–100 scale
// ============================================================================
//
// All scorers work on Unicode scalar values and expect their inputs to be
// normalized already (see `matching::normalize`).

use crate::matching::normalize::tokens;

/// Indel similarity: `100 * 2 * LCS / (len(a) + len(b))`.
///
/// Two empty strings are identical (100).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Order-insensitive similarity: tokens of each string are sorted and
/// re-joined with single spaces before scoring with [`ratio`].
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Substring-tolerant similarity: the best [`ratio`] of the shorter string
/// against every alignment of it over the longer one, including alignments
/// that hang off either end.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let mut best = best_alignment(short, long);
    if short.len() == long.len() && best < 100.0 {
        best = best.max(best_alignment(long, short));
    }
    best
}

fn best_alignment(short: &[char], long: &[char]) -> f64 {
    let n = short.len();
    let m = long.len();
    let mut best: f64 = 0.0;

    // Needle hanging off the left edge
    for end in 1..n {
        best = best.max(ratio_chars(short, &long[..end]));
    }

    for start in 0..=(m - n) {
        let score = ratio_chars(short, &long[start..start + n]);
        if score >= 100.0 {
            return 100.0;
        }
        best = best.max(score);
    }

    // Needle hanging off the right edge
    for start in (m - n + 1)..m {
        best = best.max(ratio_chars(short, &long[start..]));
    }

    best
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    100.0 * (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Length of the longest common subsequence, two-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn sorted_tokens(s: &str) -> String {
    let mut parts = tokens(s);
    parts.sort_unstable();
    parts.join(" ")
}
