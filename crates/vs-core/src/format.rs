//! Relative timestamp formatting for the feed.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Renders `timestamp` relative to `now`, e.g. "5m ago".
///
/// An unresolved timestamp reads as "Just now". Clock skew that puts the
/// timestamp in the future is clamped to zero elapsed.
pub fn format_relative(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = timestamp else {
        return "Just now".to_string();
    };

    let elapsed = (now - at).num_seconds().max(0);
    match elapsed {
        e if e < MINUTE => "Just now".to_string(),
        e if e < HOUR => format!("{}m ago", e / MINUTE),
        e if e < DAY => format!("{}h ago", e / HOUR),
        e => format!("{}d ago", e / DAY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(secs: i64) -> String {
        let now = Utc::now();
        format_relative(Some(now - Duration::seconds(secs)), now)
    }

    #[test]
    fn boundaries() {
        let table = [
            (0, "Just now"),
            (59, "Just now"),
            (60, "1m ago"),
            (3599, "59m ago"),
            (3600, "1h ago"),
            (86399, "23h ago"),
            (86400, "1d ago"),
        ];
        for (elapsed, expected) in table {
            assert_eq!(ago(elapsed), expected, "elapsed={elapsed}");
        }
    }

    #[test]
    fn unresolved_is_just_now() {
        assert_eq!(format_relative(None, Utc::now()), "Just now");
    }

    #[test]
    fn future_timestamp_is_clamped() {
        assert_eq!(ago(-7200), "Just now");
    }

    #[test]
    fn many_days() {
        assert_eq!(ago(10 * 86400 + 5), "10d ago");
    }
}
