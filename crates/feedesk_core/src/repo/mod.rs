//! Repository layer: durable storage contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract the roster is mirrored into.
//! - Keep SQLite details out of the persistence adapter and the store.
//! - Map whole-roster snapshots to and from one slot.
//!
//! # Invariants
//! - Slot writes overwrite; there are no partial or merged writes.
//! - Slot keys are non-blank.

pub mod roster_repo;
pub mod slot_repo;
