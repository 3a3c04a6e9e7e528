//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory roster and mirror every mutation to persistence.
//! - Expose the presentation-facing dashboard contract.

pub mod dashboard;
pub mod roster_store;
