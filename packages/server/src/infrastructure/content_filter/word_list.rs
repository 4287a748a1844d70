//! Word-list content filter
//!
//! Text is split on every non-alphanumeric character and each word is
//! compared case-insensitively against the blocked set, so "Shit!" is flagged
//! while "shiitake" is not.

use std::collections::HashSet;

use crate::domain::ContentFilter;

/// Words blocked out of the box
pub const DEFAULT_BLOCKED_WORDS: &[&str] = &[
    "asshole", "bastard", "bitch", "bollocks", "cunt", "dick", "fuck", "fucker", "fucking",
    "motherfucker", "shit", "slut", "twat", "wanker", "whore",
];

#[derive(Debug, Clone, Default)]
pub struct WordListFilter {
    blocked: HashSet<String>,
}

impl WordListFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocked = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self { blocked }
    }

    /// Built-in list plus `extra`
    pub fn with_defaults<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::new(DEFAULT_BLOCKED_WORDS);
        filter.blocked.extend(Self::new(extra).blocked);
        filter
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }
}

impl ContentFilter for WordListFilter {
    fn is_flagged(&self, text: &str) -> bool {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| self.blocked.contains(&word.to_lowercase()))
    }
}
