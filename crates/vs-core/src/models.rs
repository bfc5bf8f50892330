//! # Domain Models
//!
//! These structs represent the core entities of Vent Space.
//! We use UUID v7 for time-ordered, globally unique identification.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned identifier of a vent.
pub type VentId = Uuid;

/// One anonymous message plus its timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VentRecord {
    pub id: VentId,
    /// Moderated message body
    pub text: String,
    /// Server-assigned creation time. `None` until the store resolves it.
    pub timestamp: Option<DateTime<Utc>>,
    /// Client wall clock at submission
    pub created_at: DateTime<Utc>,
}

/// A vent as handed to the store. The store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVent {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl NewVent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Materializes the record once the store has picked an id and time.
    pub fn into_record(self, id: VentId, timestamp: Option<DateTime<Utc>>) -> VentRecord {
        VentRecord {
            id,
            text: self.text,
            timestamp,
            created_at: self.created_at,
        }
    }
}

/// A complete, ordered view of all vents at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub vents: Vec<VentRecord>,
}

impl Snapshot {
    /// Builds a snapshot from records in any order.
    pub fn ordered(mut vents: Vec<VentRecord>) -> Self {
        order_feed(&mut vents);
        Self { vents }
    }

    pub fn len(&self) -> usize {
        self.vents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vents.is_empty()
    }
}

/// Sorts vents newest first. Records without a resolved timestamp count as
/// the most recent; their relative order is unspecified.
pub fn order_feed(vents: &mut [VentRecord]) {
    vents.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x),
    });
}
