//! # AppError
//!
//! Centralized error handling for the Vent Space crates.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

use crate::validation::Rejection;

/// The primary error type for all vs-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Empty or over-length input. Never surfaced beyond the disabled
    /// submit affordance.
    #[error("submission rejected: {0}")]
    ValidationRejected(Rejection),

    /// A submission from the same component is still outstanding.
    #[error("a submission is already in progress")]
    SubmissionInFlight,

    /// The store refused or failed the append (network, quota, permission).
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The live feed subscription could not be established or broke.
    #[error("feed unavailable: {0}")]
    FeedUnavailable(String),
}

/// A specialized Result type for Vent Space logic.
pub type Result<T> = std::result::Result<T, AppError>;
