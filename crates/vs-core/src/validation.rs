//! Client-side validation rules applied before anything reaches the store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum vent length, in characters.
pub const MAX_CHARS: usize = 500;

/// Why a submission was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Empty,
    TooLong,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => f.write_str("message is empty"),
            Rejection::TooLong => write!(f, "message exceeds {MAX_CHARS} characters"),
        }
    }
}

/// Character count as shown by the counter.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Whether a draft of this length may still be typed.
pub fn fits(text: &str) -> bool {
    char_count(text) <= MAX_CHARS
}

/// The counter turns to a warning color above 90% of the limit.
pub fn is_near_limit(count: usize) -> bool {
    count * 10 > MAX_CHARS * 9
}

/// Checks raw input and returns the trimmed text to moderate.
///
/// The length limit applies to the raw input, before trimming.
pub fn validate_submission(raw: &str) -> Result<&str, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }
    if !fits(raw) {
        return Err(Rejection::TooLong);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(validate_submission(""), Err(Rejection::Empty));
        assert_eq!(validate_submission(" \n\t "), Err(Rejection::Empty));
    }

    #[test]
    fn over_length_is_rejected() {
        let raw = "a".repeat(MAX_CHARS + 1);
        assert_eq!(validate_submission(&raw), Err(Rejection::TooLong));
    }

    #[test]
    fn exactly_max_is_accepted() {
        let raw = "a".repeat(MAX_CHARS);
        assert_eq!(validate_submission(&raw), Ok(raw.as_str()));
    }

    #[test]
    fn accepted_text_is_trimmed() {
        assert_eq!(validate_submission("  rough day \n"), Ok("rough day"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let raw = "é".repeat(MAX_CHARS);
        assert!(fits(&raw));
        assert!(validate_submission(&raw).is_ok());
    }

    #[test]
    fn near_limit_threshold() {
        assert!(!is_near_limit(450));
        assert!(is_near_limit(451));
        assert!(is_near_limit(MAX_CHARS));
    }
}
