use serde::Serialize;

use crate::matching::alias::AliasTable;
use crate::matching::fuzzy::{partial_ratio, token_sort_ratio};
use crate::matching::normalize::normalize;

/// Default confidence threshold on the 0–100 scale.
pub const DEFAULT_THRESHOLD: f64 = 70.0;

/// Score reported for alias hits.
pub const ALIAS_SCORE: f64 = 100.0;

/// Which rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    ManualAlias,
    FuzzyTokenSort,
    FuzzyPartial,
    None,
}

/// Outcome of resolving one label against the record keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Original (non-normalized) record key, or the alias target.
    pub key: Option<String>,
    /// Winning score; for misses, the best score any pass reached.
    pub score: f64,
    pub strategy: MatchStrategy,
}

impl MatchResult {
    fn miss(score: f64) -> Self {
        Self {
            key: None,
            score,
            strategy: MatchStrategy::None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.key.is_some()
    }
}

/// Maps form labels onto record keys.
///
/// Alias hits win outright. Otherwise every candidate key is scored with
/// token-sort similarity, and if the best score is under the threshold a
/// second, partial-similarity pass is tried.
#[derive(Debug, Clone)]
pub struct Resolver {
    aliases: AliasTable,
    threshold: f64,
}

impl Resolver {
    pub fn new(aliases: AliasTable, threshold: f64) -> Self {
        Self { aliases, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn resolve<S: AsRef<str>>(&self, label: &str, candidates: &[S]) -> MatchResult {
        let cleaned = normalize(label);

        if let Some(key) = self.aliases.lookup(&cleaned) {
            return MatchResult {
                key: Some(key.to_string()),
                score: ALIAS_SCORE,
                strategy: MatchStrategy::ManualAlias,
            };
        }

        if cleaned.is_empty() || candidates.is_empty() {
            return MatchResult::miss(0.0);
        }

        let cleaned_keys: Vec<String> = candidates.iter().map(|k| normalize(k.as_ref())).collect();

        let (index, score) = best_candidate(&cleaned, &cleaned_keys, token_sort_ratio);
        if score >= self.threshold {
            return MatchResult {
                key: Some(candidates[index].as_ref().to_string()),
                score,
                strategy: MatchStrategy::FuzzyTokenSort,
            };
        }

        let (partial_index, partial_score) = best_candidate(&cleaned, &cleaned_keys, partial_ratio);
        if partial_score >= self.threshold {
            return MatchResult {
                key: Some(candidates[partial_index].as_ref().to_string()),
                score: partial_score,
                strategy: MatchStrategy::FuzzyPartial,
            };
        }

        // Best score seen by either pass
        MatchResult::miss(score.max(partial_score))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(AliasTable::builtin(), DEFAULT_THRESHOLD)
    }
}

/// First candidate with the maximum score.
fn best_candidate(label: &str, keys: &[String], scorer: fn(&str, &str) -> f64) -> (usize, f64) {
    let mut best = (0, f64::MIN);
    for (i, key) in keys.iter().enumerate() {
        let score = scorer(label, key);
        if score > best.1 {
            best = (i, score);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_maximum_wins_ties() {
        let keys = vec!["email".to_string(), "email".to_string()];
        assert_eq!(best_candidate("email", &keys, token_sort_ratio), (0, 100.0));
    }

    #[test]
    fn blank_label_never_matches() {
        let resolver = Resolver::new(AliasTable::empty(), DEFAULT_THRESHOLD);
        let result = resolver.resolve(" (optional) ", &["", "email"]);
        assert_eq!(result, MatchResult::miss(0.0));
    }

    #[test]
    fn miss_reports_best_score_of_both_passes() {
        let resolver = Resolver::new(AliasTable::empty(), 90.0);
        let result = resolver.resolve("City Home Town", &["town home"]);
        assert!(!result.is_match());
        // token sort: "city home town" vs "home town", LCS 9 of 23 chars
        assert_eq!(result.score, 100.0 * 18.0 / 23.0);
    }

    #[test]
    fn no_candidates_is_a_miss() {
        let resolver = Resolver::new(AliasTable::empty(), DEFAULT_THRESHOLD);
        let empty: [&str; 0] = [];
        assert!(!resolver.resolve("Email", &empty).is_match());
    }
}
