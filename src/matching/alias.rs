use std::collections::BTreeMap;

use crate::matching::normalize::normalize;

/// Label phrasings that fuzzy scoring gets wrong or cannot see at all
/// (abbreviations, class-level shorthands, platform names).
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("name", "fullName"),
    ("full name", "fullName"),
    ("first name", "firstName"),
    ("middle name", "middleName"),
    ("last name", "lastName"),
    ("mobile number", "mobileNumber"),
    ("date of birth", "dob"),
    ("dob", "dob"),
    ("gender", "gender"),
    ("email", "email"),
    ("college name", "collegeName"),
    ("graduation year", "graduationYear"),
    ("cgpa", "cgpa"),
    ("be percentage", "BEPercent"),
    ("be btech", "BEPercent"),
    ("be btech percent", "BEPercent"),
    ("10th", "tenthPercent"),
    ("12th", "twelfthPercent"),
    ("diploma", "diplomaPercent"),
    ("technical achievements", "technicalAchievements"),
    ("personal achievements", "personalAchievements"),
    ("project", "project"),
    ("codechef rating", "codechefRating"),
    ("codechef profile", "codechefLink"),
    ("hackerrank rating", "hackerrankRating"),
    ("hackerrank profile", "hackerrankLink"),
    ("leetcode profile", "leetcodeLink"),
    ("leetcode problems solved", "leetcodeproblemcount"),
    ("cocube score", "cocubeScore"),
];

/// Exact-match overrides from a normalized label phrase to a record key.
///
/// Phrases are stored in normalized form, so lookups must use the output of
/// [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The table shipped with the tool.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ALIASES.iter().copied())
    }

    /// Build a table from raw phrases; each phrase is normalized on insert.
    /// Later duplicates win.
    pub fn from_pairs<I, P, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, K)>,
        P: AsRef<str>,
        K: Into<String>,
    {
        let mut table = Self::empty();
        for (phrase, key) in pairs {
            table.insert(phrase.as_ref(), key);
        }
        table
    }

    /// Layer `overrides` on top of this table.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (phrase, key) in overrides {
            self.insert(phrase, key.clone());
        }
        self
    }

    pub fn insert(&mut self, phrase: &str, key: impl Into<String>) {
        let normalized = normalize(phrase);
        if normalized.is_empty() {
            tracing::warn!(phrase, "ignoring alias whose phrase normalizes to nothing");
            return;
        }
        self.entries.insert(normalized, key.into());
    }

    pub fn lookup(&self, normalized_label: &str) -> Option<&str> {
        self.entries.get(normalized_label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in phrase order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, k)| (p.as_str(), k.as_str()))
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}
