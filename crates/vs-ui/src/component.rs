//! # VentSpace
//!
//! The mounted component: owns the view state, one feed subscription and
//! the success-notice timer. State is published through a
//! `tokio::sync::watch` channel so renderers can observe every transition.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use vs_core::error::{AppError, Result};
use vs_core::models::VentId;
use vs_core::traits::{Moderator, VentStore};
use vs_core::validation::validate_submission;

use crate::feed::{FeedSynchronizer, FeedUpdate, Subscription};
use crate::state::{ViewEvent, ViewState};
use crate::submit::SubmissionPipeline;

/// How long the success notice stays up.
pub const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(3);

type StateTx = Arc<watch::Sender<ViewState>>;

fn dispatch(state: &watch::Sender<ViewState>, event: ViewEvent) {
    state.send_modify(|s| *s = std::mem::take(s).apply(event));
}

pub struct VentSpace {
    store: Arc<dyn VentStore>,
    pipeline: SubmissionPipeline,
    state: StateTx,
    feed: AsyncMutex<Option<Subscription>>,
    success_timer: Mutex<Option<JoinHandle<()>>>,
}

impl VentSpace {
    /// Creates the component and activates its feed.
    ///
    /// A refused subscription does not fail the mount; the view shows the
    /// feed as unavailable until [`VentSpace::resubscribe`] succeeds.
    pub async fn mount(store: Arc<dyn VentStore>, moderator: Arc<dyn Moderator>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        let space = Self {
            pipeline: SubmissionPipeline::new(Arc::clone(&store), moderator),
            store,
            state: Arc::new(state),
            feed: AsyncMutex::new(None),
            success_timer: Mutex::new(None),
        };
        space.resubscribe().await;
        space
    }

    pub fn watch(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn input_changed(&self, text: impl Into<String>) {
        dispatch(&self.state, ViewEvent::InputChanged(text.into()));
    }

    pub fn dismiss_alert(&self) {
        dispatch(&self.state, ViewEvent::AlertDismissed);
    }

    /// Posts `raw`.
    ///
    /// Rejected input leaves the view untouched. While an append is
    /// outstanding further calls return [`AppError::SubmissionInFlight`].
    pub async fn submit(&self, raw: &str) -> Result<VentId> {
        let trimmed = validate_submission(raw).map_err(AppError::ValidationRejected)?;

        let started = self.state.send_if_modified(|s| {
            if s.is_submitting {
                return false;
            }
            *s = std::mem::take(s).apply(ViewEvent::SubmitStarted);
            true
        });
        if !started {
            return Err(AppError::SubmissionInFlight);
        }

        match self.pipeline.submit(raw).await {
            Ok(id) => {
                dispatch(&self.state, ViewEvent::SubmitSucceeded);
                self.schedule_success_reset();
                Ok(id)
            }
            Err(e) => {
                dispatch(
                    &self.state,
                    ViewEvent::SubmitFailed {
                        text: trimmed.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    /// Submits whatever is currently in the input field.
    pub async fn submit_draft(&self) -> Result<VentId> {
        let draft = self.state.borrow().draft.clone();
        self.submit(&draft).await
    }

    /// Replaces the feed subscription with a fresh one. At most one is ever
    /// active.
    pub async fn resubscribe(&self) {
        let mut feed = self.feed.lock().await;
        if let Some(old) = feed.take() {
            old.unsubscribe().await;
        }
        dispatch(&self.state, ViewEvent::FeedReconnecting);

        let state = Arc::clone(&self.state);
        let on_update = move |update: FeedUpdate| match update {
            FeedUpdate::Snapshot(snapshot) => dispatch(&state, ViewEvent::SnapshotReceived(snapshot)),
            FeedUpdate::Unavailable(reason) => dispatch(&state, ViewEvent::FeedFailed(reason)),
        };

        match FeedSynchronizer::subscribe(self.store.as_ref(), on_update).await {
            Ok(subscription) => *feed = Some(subscription),
            Err(e) => dispatch(&self.state, ViewEvent::FeedFailed(e.to_string())),
        }
    }

    /// Tears the component down: releases the feed and cancels a pending
    /// success-notice reset. No state changes happen afterwards.
    pub async fn unmount(self) {
        if let Some(subscription) = self.feed.lock().await.take() {
            subscription.unsubscribe().await;
        }
        self.cancel_success_reset();
    }

    fn schedule_success_reset(&self) {
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(SUCCESS_NOTICE_TTL).await;
            dispatch(&state, ViewEvent::SuccessExpired);
        });
        let previous = self
            .success_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn cancel_success_reset(&self) {
        let pending = self
            .success_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pending) = pending {
            pending.abort();
        }
    }
}

impl Drop for VentSpace {
    fn drop(&mut self) {
        self.cancel_success_reset();
    }
}
