use once_cell::sync::Lazy;
use regex::Regex;

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));
static SYMBOLS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

/// Canonicalize raw label (or record key) text for comparison.
///
/// Line breaks and non-breaking spaces become plain spaces, parenthetical
/// notes such as `(out of 10)` are dropped, punctuation and symbols are
/// stripped, and the result is trimmed and lower-cased.
///
/// ```
/// use form_autofill::matching::normalize::normalize;
/// assert_eq!(normalize("  CGPA (out of 10)\n"), "cgpa");
/// ```
pub fn normalize(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\u{a0}' => ' ',
            other => other,
        })
        .collect();

    let without_notes = PARENTHETICAL.replace_all(&spaced, "");
    let without_symbols = SYMBOLS.replace_all(&without_notes, "");

    without_symbols.trim().to_lowercase()
}

/// Whitespace-separated tokens of an already-normalized string.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}
