//! # vs-store-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `vs-core` domain models, plus change notification so that
//! subscribers receive a fresh snapshot after every insert.
//!
//! Times are stored as integer microseconds since the epoch so that
//! `ORDER BY` is numeric rather than lexicographic.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tokio::sync::broadcast;
use uuid::Uuid;
use vs_core::models::{NewVent, Snapshot, VentId, VentRecord};
use vs_core::traits::{SnapshotStream, VentStore};

const DEFAULT_CAPACITY: usize = 64;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS vents (
    id           BLOB PRIMARY KEY,
    text         TEXT NOT NULL,
    timestamp_us INTEGER,
    created_at_us INTEGER NOT NULL
)";

pub struct SqliteVentStore {
    pool: SqlitePool,
    changes: broadcast::Sender<()>,
}

// Helpers for UUID and time conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> anyhow::Result<Uuid> {
    Ok(Uuid::from_slice(blob)?)
}

fn micros_to_time(micros: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| anyhow::anyhow!("timestamp out of range: {micros}"))
}

fn row_to_vent(row: &SqliteRow) -> anyhow::Result<VentRecord> {
    let timestamp = row
        .try_get::<Option<i64>, _>("timestamp_us")?
        .map(micros_to_time)
        .transpose()?;
    Ok(VentRecord {
        id: blob_to_uuid(row.try_get::<Vec<u8>, _>("id")?.as_slice())?,
        text: row.try_get("text")?,
        timestamp,
        created_at: micros_to_time(row.try_get("created_at_us")?)?,
    })
}

async fn fetch_snapshot(pool: &SqlitePool) -> anyhow::Result<Snapshot> {
    let rows = sqlx::query(
        "SELECT id, text, timestamp_us, created_at_us FROM vents \
         ORDER BY timestamp_us IS NULL DESC, timestamp_us DESC",
    )
    .fetch_all(pool)
    .await?;

    let vents = rows.iter().map(row_to_vent).collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Snapshot::ordered(vents))
}

impl SqliteVentStore {
    /// Connects (creating the database file if needed) and ensures the schema.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` is a separate database.
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().max_connections(5).connect_with(options).await?
        };
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        let (changes, _) = broadcast::channel(DEFAULT_CAPACITY);
        Ok(Self { pool, changes })
    }
}

#[async_trait]
impl VentStore for SqliteVentStore {
    /// Single statement: the server time is resolved inside the INSERT and
    /// stays strictly increasing across concurrent writers.
    async fn append(&self, vent: NewVent) -> anyhow::Result<VentId> {
        let id = Uuid::now_v7();

        sqlx::query(
            "INSERT INTO vents (id, text, timestamp_us, created_at_us) \
             VALUES (?, ?, MAX(?, COALESCE((SELECT MAX(timestamp_us) FROM vents) + 1, 0)), ?)",
        )
        .bind(uuid_to_blob(id))
        .bind(&vent.text)
        .bind(Utc::now().timestamp_micros())
        .bind(vent.created_at.timestamp_micros())
        .execute(&self.pool)
        .await?;
        tracing::debug!(%id, "vent inserted");

        let _ = self.changes.send(());
        Ok(id)
    }

    async fn subscribe(&self) -> anyhow::Result<SnapshotStream> {
        let rx = self.changes.subscribe();
        let initial = fetch_snapshot(&self.pool).await?;
        let pool = self.pool.clone();

        // `None` state means an error was already emitted; the stream ends.
        let updates = stream::unfold(Some((rx, pool)), |state| async move {
            let (mut rx, pool) = state?;
            match rx.recv().await {
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
            match fetch_snapshot(&pool).await {
                Ok(snapshot) => Some((Ok(snapshot), Some((rx, pool)))),
                Err(e) => {
                    tracing::warn!(error = %e, "snapshot query failed");
                    Some((Err(e), None))
                }
            }
        });

        Ok(stream::once(async move { Ok::<_, anyhow::Error>(initial) }).chain(updates).boxed())
    }
}
