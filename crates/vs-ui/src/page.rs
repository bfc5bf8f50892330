use askama::Template;
use chrono::{DateTime, Utc};
use vs_core::format_relative;
use vs_core::models::VentRecord;
use vs_core::validation::MAX_CHARS;

use crate::state::ViewState;

#[derive(Template)]
#[template(path = "vent_space.html")]
pub struct VentSpaceTemplate<'a> {
    pub view: &'a ViewState,
    pub title: &'a str,
    pub now: DateTime<Utc>,
    pub max_chars: usize,
}

impl<'a> VentSpaceTemplate<'a> {
    pub fn new(view: &'a ViewState) -> Self {
        Self {
            view,
            title: "Emotional Vent Space",
            now: Utc::now(),
            max_chars: MAX_CHARS,
        }
    }

    /// Relative age shown under each vent. Unconfirmed vents read "Just now".
    pub fn age(&self, vent: &VentRecord) -> String {
        format_relative(vent.timestamp, self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use vs_core::models::{NewVent, Snapshot};

    use crate::state::ViewEvent;

    #[test]
    fn renders_empty_feed() {
        let view = ViewState::default().apply(ViewEvent::SnapshotReceived(Snapshot::default()));
        let html = VentSpaceTemplate::new(&view).render().unwrap();
        assert!(html.contains("Recent Vents (0)"));
        assert!(html.contains("No messages yet"));
        assert!(html.contains("0/500 characters"));
    }

    #[test]
    fn renders_vents_with_relative_age_and_escapes_text() {
        let old = NewVent::new("<b>first</b>")
            .into_record(uuid::Uuid::now_v7(), Some(Utc::now() - Duration::hours(2)));
        let view = ViewState::default().apply(ViewEvent::SnapshotReceived(Snapshot { vents: vec![old] }));
        let html = VentSpaceTemplate::new(&view).render().unwrap();
        assert!(html.contains("Recent Vents (1)"));
        assert!(html.contains("2h ago"));
        assert!(html.contains("&lt;b&gt;first"));
        assert!(!html.contains("<b>first</b>"));
    }

    #[test]
    fn unconfirmed_vent_reads_just_now_whatever_its_client_time() {
        let mut pending = NewVent::new("still sending");
        pending.created_at = Utc::now() - Duration::hours(3);
        let view = ViewState::default().apply(ViewEvent::SnapshotReceived(Snapshot {
            vents: vec![pending.into_record(uuid::Uuid::now_v7(), None)],
        }));
        let template = VentSpaceTemplate::new(&view);
        assert_eq!(template.age(&view.vents[0]), "Just now");

        let html = template.render().unwrap();
        assert!(html.contains("Just now"));
        assert!(!html.contains("3h ago"));
    }

    #[test]
    fn renders_alert_and_feed_problems() {
        let view = ViewState::default()
            .apply(ViewEvent::SubmitStarted)
            .apply(ViewEvent::SubmitFailed { text: "keep me".into() })
            .apply(ViewEvent::FeedFailed("permission denied".into()));
        let html = VentSpaceTemplate::new(&view).render().unwrap();
        assert!(html.contains("Failed to post your message"));
        assert!(html.contains("keep me"));
        assert!(html.contains("Feed unavailable"));
    }
}
