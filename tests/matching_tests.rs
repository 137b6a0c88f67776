use form_autofill::matching::alias::AliasTable;
use form_autofill::matching::fuzzy::{partial_ratio, ratio, token_sort_ratio};
use form_autofill::matching::normalize::normalize;
use form_autofill::matching::resolver::{
    ALIAS_SCORE, DEFAULT_THRESHOLD, MatchResult, MatchStrategy, Resolver,
};

fn bare(threshold: f64) -> Resolver {
    Resolver::new(AliasTable::empty(), threshold)
}

// ============================================================================
// Normalizer
// ============================================================================

#[test]
fn normalize_is_idempotent_on_messy_labels() {
    for raw in [
        "  CGPA (out of 10)\n",
        "Date of Birth (DD/MM/YYYY) *",
        "BE / B.Tech %",
        "LeetCode\u{a0}Profile\r\nURL",
        "Name (first (and) last)",
        "",
    ] {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once, "not idempotent for {:?}", raw);
    }
}

#[test]
fn normalize_examples() {
    assert_eq!(normalize("  CGPA (out of 10)\n"), "cgpa");
    assert_eq!(normalize("Date of Birth (DD/MM/YYYY) *"), "date of birth");
    assert_eq!(normalize("10th Percentage (%)"), "10th percentage");
}

// ============================================================================
// Alias precedence
// ============================================================================

#[test]
fn alias_wins_over_a_better_fuzzy_candidate() {
    let resolver = Resolver::default();
    // "be btech" is closer to "bebtech" by fuzzy score, but the alias decides
    let result = resolver.resolve("BE/ BTech", &["bebtech", "BEPercent"]);
    assert_eq!(
        result,
        MatchResult {
            key: Some("BEPercent".into()),
            score: ALIAS_SCORE,
            strategy: MatchStrategy::ManualAlias,
        }
    );
}

#[test]
fn alias_applies_after_normalization() {
    let resolver = Resolver::default();
    let result = resolver.resolve("Date of Birth (as per records)", &["fullName", "dob"]);
    assert_eq!(result.key.as_deref(), Some("dob"));
    assert_eq!(result.strategy, MatchStrategy::ManualAlias);
}

#[test]
fn alias_key_is_returned_even_when_not_a_candidate() {
    let resolver = Resolver::default();
    let result = resolver.resolve("Gender", &["fullName"]);
    assert_eq!(result.key.as_deref(), Some("gender"));
}

#[test]
fn custom_alias_table_overrides_builtin_entry() {
    let overrides = [("Name".to_string(), "firstName".to_string())];
    let table = AliasTable::builtin().with_overrides(overrides.iter().map(|(p, k)| (p, k)));
    let resolver = Resolver::new(table, DEFAULT_THRESHOLD);
    assert_eq!(
        resolver.resolve("Name", &["fullName", "firstName"]).key.as_deref(),
        Some("firstName")
    );
}

// ============================================================================
// Fuzzy passes
// ============================================================================

#[test]
fn exact_normalized_match_returns_original_key_at_100() {
    let result = bare(DEFAULT_THRESHOLD).resolve("Branch", &["fullName", "branch"]);
    assert_eq!(
        result,
        MatchResult {
            key: Some("branch".into()),
            score: 100.0,
            strategy: MatchStrategy::FuzzyTokenSort,
        }
    );
}

#[test]
fn camel_case_keys_match_spaced_labels() {
    let result = bare(DEFAULT_THRESHOLD).resolve("Full Name", &["email", "fullName"]);
    assert_eq!(result.key.as_deref(), Some("fullName"));
    assert_eq!(result.strategy, MatchStrategy::FuzzyTokenSort);
}

#[test]
fn partial_pass_catches_embedded_labels() {
    let result =
        bare(DEFAULT_THRESHOLD).resolve("LeetCode", &["codechefLink", "leetcodeProfileUrl"]);
    assert_eq!(result.key.as_deref(), Some("leetcodeProfileUrl"));
    assert_eq!(result.strategy, MatchStrategy::FuzzyPartial);
    assert_eq!(result.score, 100.0);
}

#[test]
fn token_sort_score_equal_to_threshold_is_accepted() {
    assert_eq!(token_sort_ratio("abcdefghij", "axcdyfgzij"), 70.0);

    let result = bare(70.0).resolve("abcdefghij", &["axcdyfgzij"]);
    assert_eq!(result.key.as_deref(), Some("axcdyfgzij"));
    assert_eq!(result.strategy, MatchStrategy::FuzzyTokenSort);
}

#[test]
fn token_sort_score_below_threshold_is_rejected() {
    let result = bare(71.0).resolve("abcdefghij", &["axcdyfgzij"]);
    assert_eq!(result.key, None);
    assert_eq!(result.strategy, MatchStrategy::None);
    assert_eq!(result.score, 70.0);
}

#[test]
fn partial_score_equal_to_threshold_is_accepted() {
    assert!(token_sort_ratio("abcdefghij", "axcdyfgzijqqqq") < 70.0);
    assert_eq!(partial_ratio("abcdefghij", "axcdyfgzijqqqq"), 70.0);

    let result = bare(70.0).resolve("abcdefghij", &["axcdyfgzijqqqq"]);
    assert_eq!(result.key.as_deref(), Some("axcdyfgzijqqqq"));
    assert_eq!(result.strategy, MatchStrategy::FuzzyPartial);
}

#[test]
fn partial_score_below_threshold_is_rejected() {
    let result = bare(70.5).resolve("abcdefghij", &["axcdyfgzijqqqq"]);
    assert_eq!(result.key, None);
    assert_eq!(result.score, 70.0);
}

#[test]
fn unrelated_label_is_no_match() {
    let result = Resolver::default().resolve("Mother Tongue", &["fullName", "dob", "gender"]);
    assert_eq!(result.key, None);
    assert!(result.score < DEFAULT_THRESHOLD);
}

#[test]
fn first_candidate_wins_a_tie() {
    let result = bare(DEFAULT_THRESHOLD).resolve("Email", &["EMAIL", "email"]);
    assert_eq!(result.key.as_deref(), Some("EMAIL"));
}

// ============================================================================
// Scorer sanity
// ============================================================================

#[test]
fn scorers_are_symmetric_on_samples() {
    let pairs = [
        ("full name", "fullname"),
        ("leetcode", "leetcodeprofileurl"),
        ("date of birth", "dob"),
    ];
    for (a, b) in pairs {
        assert_eq!(ratio(a, b), ratio(b, a));
        assert_eq!(token_sort_ratio(a, b), token_sort_ratio(b, a));
        assert_eq!(partial_ratio(a, b), partial_ratio(b, a));
    }
}
