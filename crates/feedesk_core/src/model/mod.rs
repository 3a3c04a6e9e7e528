//! Domain model for student fee tracking.
//!
//! # Responsibility
//! - Define the canonical student record persisted in the roster slot.
//! - Define the derived aggregate statistics shown by the dashboard.
//!
//! # Invariants
//! - Every student is identified by a stable `StudentId`.
//! - `due_fees` is derived once at creation and never mutated afterwards.

pub mod stats;
pub mod student;
