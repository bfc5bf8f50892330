//! # vs-store-memory
//!
//! In-process implementation of `VentStore`.
//! Vents live in a `Vec` behind an async `RwLock`; every append pings a
//! `tokio::sync::broadcast` channel and each subscriber answers the ping by
//! reading a fresh, full snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures_util::stream::{self, StreamExt};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;
use vs_core::models::{NewVent, Snapshot, VentId, VentRecord};
use vs_core::traits::{SnapshotStream, VentStore};

/// Default buffer capacity for the change channel.
const DEFAULT_CAPACITY: usize = 64;

#[derive(Default)]
struct Inner {
    vents: Vec<VentRecord>,
    last_timestamp: Option<DateTime<Utc>>,
}

pub struct MemoryVentStore {
    inner: Arc<RwLock<Inner>>,
    changes: broadcast::Sender<()>,
}

impl MemoryVentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            changes,
        }
    }

    /// Number of stored vents.
    pub async fn len(&self) -> usize {
        self.inner.read().await.vents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Current contents, newest first.
    pub async fn snapshot(&self) -> Snapshot {
        read_snapshot(&self.inner).await
    }
}

impl Default for MemoryVentStore {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_snapshot(inner: &RwLock<Inner>) -> Snapshot {
    Snapshot::ordered(inner.read().await.vents.clone())
}

/// Server time for the next insert; strictly increasing per store.
fn next_timestamp(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match last {
        Some(last) if now <= last => last + Duration::microseconds(1),
        _ => now,
    }
}

#[async_trait]
impl VentStore for MemoryVentStore {
    async fn append(&self, vent: NewVent) -> anyhow::Result<VentId> {
        let id = Uuid::now_v7();
        {
            let mut inner = self.inner.write().await;
            let timestamp = next_timestamp(inner.last_timestamp);
            inner.last_timestamp = Some(timestamp);
            inner.vents.push(vent.into_record(id, Some(timestamp)));
        }
        tracing::debug!(%id, "vent appended");

        // Ignore the SendError; it only means there are zero subscribers.
        let _ = self.changes.send(());
        Ok(id)
    }

    async fn subscribe(&self) -> anyhow::Result<SnapshotStream> {
        // Subscribe before reading so no insert slips between the two.
        let rx = self.changes.subscribe();
        let initial = read_snapshot(&self.inner).await;
        let inner = Arc::clone(&self.inner);

        let updates = stream::unfold((rx, inner), |(mut rx, inner)| async move {
            loop {
                match rx.recv().await {
                    Ok(()) => break,
                    // Missed pings collapse into the one fresh snapshot below.
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "subscriber lagged");
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
            let snapshot = read_snapshot(&inner).await;
            Some((Ok::<_, anyhow::Error>(snapshot), (rx, inner)))
        });

        Ok(stream::once(async move { Ok::<_, anyhow::Error>(initial) }).chain(updates).boxed())
    }
}
