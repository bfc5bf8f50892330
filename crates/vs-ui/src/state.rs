//! # View State
//!
//! Everything the page shows lives in one immutable [`ViewState`]. The only
//! way to change it is [`ViewState::apply`], a pure transition driven by a
//! [`ViewEvent`].

use serde::Serialize;
use vs_core::models::{Snapshot, VentRecord};
use vs_core::validation::{self, MAX_CHARS};

/// Shown when the store rejects an append.
pub const FAILURE_MESSAGE: &str = "Failed to post your message. Please try again.";

/// Health of the live feed subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FeedStatus {
    #[default]
    Connecting,
    Live,
    /// Persistent until a resubscribe succeeds.
    Unavailable(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub draft: String,
    pub char_count: usize,
    pub is_submitting: bool,
    pub show_success: bool,
    /// Blocking failure notice, cleared on dismissal or the next submit
    pub alert: Option<String>,
    /// Latest snapshot, newest first
    pub vents: Vec<VentRecord>,
    pub feed: FeedStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    InputChanged(String),
    SubmitStarted,
    SubmitSucceeded,
    /// Carries the trimmed text so the user does not lose it.
    SubmitFailed { text: String },
    SuccessExpired,
    AlertDismissed,
    SnapshotReceived(Snapshot),
    FeedFailed(String),
    FeedReconnecting,
}

impl ViewState {
    pub fn apply(self, event: ViewEvent) -> Self {
        match event {
            ViewEvent::InputChanged(text) => {
                // The field is disabled while posting, and overflow is never stored.
                if self.is_submitting || !validation::fits(&text) {
                    return self;
                }
                Self {
                    char_count: validation::char_count(&text),
                    draft: text,
                    ..self
                }
            }
            ViewEvent::SubmitStarted => Self {
                is_submitting: true,
                alert: None,
                ..self
            },
            ViewEvent::SubmitSucceeded => Self {
                draft: String::new(),
                char_count: 0,
                is_submitting: false,
                show_success: true,
                ..self
            },
            ViewEvent::SubmitFailed { text } => Self {
                char_count: validation::char_count(&text),
                draft: text,
                is_submitting: false,
                show_success: false,
                alert: Some(FAILURE_MESSAGE.to_string()),
                ..self
            },
            ViewEvent::SuccessExpired => Self {
                show_success: false,
                ..self
            },
            ViewEvent::AlertDismissed => Self { alert: None, ..self },
            ViewEvent::SnapshotReceived(snapshot) => Self {
                vents: snapshot.vents,
                feed: FeedStatus::Live,
                ..self
            },
            ViewEvent::FeedFailed(reason) => Self {
                feed: FeedStatus::Unavailable(reason),
                ..self
            },
            ViewEvent::FeedReconnecting => Self {
                feed: FeedStatus::Connecting,
                ..self
            },
        }
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty() && !self.is_submitting && self.char_count <= MAX_CHARS
    }

    pub fn is_near_limit(&self) -> bool {
        validation::is_near_limit(self.char_count)
    }

    pub fn feed_error(&self) -> Option<&str> {
        match &self.feed {
            FeedStatus::Unavailable(reason) => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vs_core::models::NewVent;

    fn record(text: &str) -> VentRecord {
        NewVent::new(text).into_record(uuid::Uuid::now_v7(), Some(Utc::now()))
    }

    #[test]
    fn typing_updates_draft_and_counter() {
        let state = ViewState::default().apply(ViewEvent::InputChanged("héllo".into()));
        assert_eq!(state.draft, "héllo");
        assert_eq!(state.char_count, 5);
        assert!(state.can_submit());
    }

    #[test]
    fn overflow_input_is_ignored() {
        let state = ViewState::default().apply(ViewEvent::InputChanged("keep".into()));
        let state = state.apply(ViewEvent::InputChanged("x".repeat(MAX_CHARS + 1)));
        assert_eq!(state.draft, "keep");
        assert_eq!(state.char_count, 4);
    }

    #[test]
    fn input_is_ignored_while_submitting() {
        let state = ViewState::default()
            .apply(ViewEvent::InputChanged("first".into()))
            .apply(ViewEvent::SubmitStarted)
            .apply(ViewEvent::InputChanged("second".into()));
        assert_eq!(state.draft, "first");
        assert!(!state.can_submit());
    }

    #[test]
    fn success_clears_draft_and_raises_flag() {
        let state = ViewState::default()
            .apply(ViewEvent::InputChanged("vent".into()))
            .apply(ViewEvent::SubmitStarted)
            .apply(ViewEvent::SubmitSucceeded);
        assert_eq!(state.draft, "");
        assert_eq!(state.char_count, 0);
        assert!(!state.is_submitting);
        assert!(state.show_success);

        let state = state.apply(ViewEvent::SuccessExpired);
        assert!(!state.show_success);
    }

    #[test]
    fn failure_keeps_text_and_alerts() {
        let state = ViewState::default()
            .apply(ViewEvent::InputChanged("  vent  ".into()))
            .apply(ViewEvent::SubmitStarted)
            .apply(ViewEvent::SubmitFailed { text: "vent".into() });
        assert_eq!(state.draft, "vent");
        assert!(!state.is_submitting);
        assert!(!state.show_success);
        assert_eq!(state.alert.as_deref(), Some(FAILURE_MESSAGE));

        let state = state.apply(ViewEvent::AlertDismissed);
        assert!(state.alert.is_none());
    }

    #[test]
    fn snapshot_replaces_the_whole_list() {
        let a = record("a");
        let b = record("b");
        let state = ViewState::default()
            .apply(ViewEvent::SnapshotReceived(Snapshot { vents: vec![a.clone()] }))
            .apply(ViewEvent::SnapshotReceived(Snapshot { vents: vec![b.clone()] }));
        assert_eq!(state.vents, vec![b]);
        assert_eq!(state.feed, FeedStatus::Live);
    }

    #[test]
    fn feed_failure_keeps_last_snapshot() {
        let a = record("a");
        let state = ViewState::default()
            .apply(ViewEvent::SnapshotReceived(Snapshot { vents: vec![a.clone()] }))
            .apply(ViewEvent::FeedFailed("permission denied".into()));
        assert_eq!(state.vents, vec![a]);
        assert_eq!(state.feed_error(), Some("permission denied"));

        let state = state.apply(ViewEvent::FeedReconnecting);
        assert_eq!(state.feed, FeedStatus::Connecting);
    }

    #[test]
    fn counter_warns_near_limit() {
        let state = ViewState::default().apply(ViewEvent::InputChanged("x".repeat(451)));
        assert!(state.is_near_limit());
    }
}
