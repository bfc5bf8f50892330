//! # Live Feed Synchronizer
//!
//! Holds one store subscription and forwards every snapshot, in receipt
//! order and unmodified, to a callback. No diffing: each snapshot is the
//! whole feed.

use futures_util::StreamExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use vs_core::error::{AppError, Result};
use vs_core::models::Snapshot;
use vs_core::traits::VentStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedUpdate {
    Snapshot(Snapshot),
    /// The subscription broke; no further updates follow.
    Unavailable(String),
}

pub struct FeedSynchronizer;

impl FeedSynchronizer {
    /// Subscribes to the store and drives `on_update` from a background task.
    pub async fn subscribe<F>(store: &dyn VentStore, mut on_update: F) -> Result<Subscription>
    where
        F: FnMut(FeedUpdate) + Send + 'static,
    {
        let mut snapshots = store.subscribe().await.map_err(|e| {
            tracing::warn!(error = %e, "feed subscription refused");
            AppError::FeedUnavailable(e.to_string())
        })?;
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut cancel_rx => break,
                    next = snapshots.next() => match next {
                        Some(Ok(snapshot)) => on_update(FeedUpdate::Snapshot(snapshot)),
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "feed subscription failed");
                            on_update(FeedUpdate::Unavailable(e.to_string()));
                            break;
                        }
                        None => {
                            on_update(FeedUpdate::Unavailable("feed closed by store".to_string()));
                            break;
                        }
                    },
                }
            }
            tracing::debug!("feed task finished");
        });

        Ok(Subscription {
            cancel: Some(cancel_tx),
            task: Some(task),
        })
    }
}

/// Handle to an active feed. Dropping it aborts the feed task.
pub struct Subscription {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Releases the subscription. Once this returns, the callback is never
    /// invoked again.
    pub async fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
