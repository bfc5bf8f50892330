//! # Submission Pipeline
//!
//! validate -> trim -> moderate -> append. Holds no view state of its own;
//! the component wraps it with the in-flight flag and notices.

use std::sync::Arc;

use vs_core::error::{AppError, Result};
use vs_core::models::{NewVent, VentId};
use vs_core::traits::{Moderator, VentStore};
use vs_core::validation::validate_submission;

#[derive(Clone)]
pub struct SubmissionPipeline {
    store: Arc<dyn VentStore>,
    moderator: Arc<dyn Moderator>,
}

impl SubmissionPipeline {
    pub fn new(store: Arc<dyn VentStore>, moderator: Arc<dyn Moderator>) -> Self {
        Self { store, moderator }
    }

    /// Validates and moderates `raw` without touching the store.
    pub fn prepare(&self, raw: &str) -> Result<NewVent> {
        let trimmed = validate_submission(raw).map_err(AppError::ValidationRejected)?;
        Ok(NewVent::new(self.moderator.clean(trimmed)))
    }

    pub async fn submit(&self, raw: &str) -> Result<VentId> {
        let vent = self.prepare(raw)?;
        let id = self.store.append(vent).await.map_err(|e| {
            tracing::warn!(error = %e, "failed to append vent");
            AppError::StoreUnavailable(e.to_string())
        })?;
        tracing::info!(%id, "vent posted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::function;
    use vs_core::traits::{MockModerator, MockVentStore};
    use vs_core::validation::{Rejection, MAX_CHARS};

    fn shouting_moderator() -> MockModerator {
        let mut moderator = MockModerator::new();
        moderator.expect_clean().returning(|text| text.to_uppercase());
        moderator
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_store() {
        let mut store = MockVentStore::new();
        store.expect_append().never();
        let pipeline = SubmissionPipeline::new(Arc::new(store), Arc::new(shouting_moderator()));

        let err = pipeline.submit("   \n").await.unwrap_err();
        assert_eq!(err, AppError::ValidationRejected(Rejection::Empty));
    }

    #[tokio::test]
    async fn over_length_input_never_reaches_the_store() {
        let mut store = MockVentStore::new();
        store.expect_append().never();
        let pipeline = SubmissionPipeline::new(Arc::new(store), Arc::new(shouting_moderator()));

        let err = pipeline.submit(&"a".repeat(MAX_CHARS + 1)).await.unwrap_err();
        assert_eq!(err, AppError::ValidationRejected(Rejection::TooLong));
    }

    #[tokio::test]
    async fn stores_moderated_trimmed_text() {
        let id = uuid::Uuid::now_v7();
        let mut store = MockVentStore::new();
        store
            .expect_append()
            .with(function(|vent: &NewVent| vent.text == "ROUGH DAY"))
            .times(1)
            .returning(move |_| Ok(id));
        let pipeline = SubmissionPipeline::new(Arc::new(store), Arc::new(shouting_moderator()));

        assert_eq!(pipeline.submit("  rough day  ").await.unwrap(), id);
    }

    #[tokio::test]
    async fn store_failure_is_store_unavailable() {
        let mut store = MockVentStore::new();
        store
            .expect_append()
            .returning(|_| Err(anyhow::anyhow!("permission denied")));
        let pipeline = SubmissionPipeline::new(Arc::new(store), Arc::new(shouting_moderator()));

        let err = pipeline.submit("hello").await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(ref msg) if msg.contains("permission")));
    }
}
