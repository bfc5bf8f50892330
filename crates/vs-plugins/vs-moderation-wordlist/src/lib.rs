//! # vs-moderation-wordlist
//!
//! Word-list implementation of `Moderator`.
//! Matches whole words case-insensitively and masks each listed word with
//! one placeholder character per letter. Moderation never rejects text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use vs_core::traits::Moderator;

/// Compiled once; a "word" is any run of letters, digits or underscores.
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Built-in terms. Deployments extend or relax this via configuration.
pub const DEFAULT_WORDS: &[&str] = &[
    "arse", "arsehole", "ass", "asshole", "bastard", "bitch", "bitches", "bollocks",
    "bullshit", "crap", "cunt", "damn", "dick", "dickhead", "douche", "fag", "faggot",
    "fuck", "fucked", "fucker", "fucking", "goddamn", "jackass", "motherfucker",
    "nigga", "nigger", "piss", "prick", "pussy", "retard", "shit", "shitty", "slut",
    "twat", "wank", "wanker", "whore",
];

pub const DEFAULT_PLACEHOLDER: char = '*';

pub struct WordListFilter {
    words: HashSet<String>,
    placeholder: char,
}

impl WordListFilter {
    /// Filter loaded with [`DEFAULT_WORDS`].
    pub fn new() -> Self {
        Self::empty().with_words(DEFAULT_WORDS.iter().copied())
    }

    /// Filter with no terms at all.
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
            placeholder: DEFAULT_PLACEHOLDER,
        }
    }

    /// Adds terms to the block list.
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()).filter(|w| !w.is_empty()));
        self
    }

    /// Removes terms from the block list (e.g. a local exemption).
    pub fn without_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.words.remove(&word.as_ref().trim().to_lowercase());
        }
        self
    }

    pub fn with_placeholder(mut self, placeholder: char) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordListFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Moderator for WordListFilter {
    fn clean(&self, text: &str) -> String {
        let cleaned = WORD_RE.replace_all(text, |caps: &Captures<'_>| {
            let word = &caps[0];
            if self.words.contains(&word.to_lowercase()) {
                self.placeholder.to_string().repeat(word.chars().count())
            } else {
                word.to_string()
            }
        });
        if cleaned != text {
            tracing::debug!("moderation masked one or more terms");
        }
        cleaned.into_owned()
    }
}
