//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::models::{NewVent, Snapshot, VentId};

/// Lazy, unbounded stream of full snapshots. Ends after the first error.
pub type SnapshotStream = BoxStream<'static, anyhow::Result<Snapshot>>;

/// Real-time document store holding the vents.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VentStore: Send + Sync {
    /// Persists a new vent, stamping it with an id and a server time.
    async fn append(&self, vent: NewVent) -> anyhow::Result<VentId>;

    /// Subscribes to "all vents, newest first".
    ///
    /// The first item is the current snapshot; every later insert, by any
    /// client, yields a fresh full snapshot.
    async fn subscribe(&self) -> anyhow::Result<SnapshotStream>;
}

/// Profanity filter. Total: never fails, always returns text.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Moderator: Send + Sync {
    fn clean(&self, text: &str) -> String;
}
