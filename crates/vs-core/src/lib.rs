//! vent-space/crates/vs-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Vent Space.

pub mod error;
pub mod format;
pub mod models;
pub mod traits;
pub mod validation;

// Re-exporting for easier access in other crates
pub use error::*;
pub use format::format_relative;
pub use models::*;
pub use traits::*;
