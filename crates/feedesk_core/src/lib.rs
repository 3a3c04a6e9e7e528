//! Core domain logic for the student fee desk.
//! This crate is the single source of truth for fee-tracking invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DeskConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::stats::Stats;
pub use model::student::{
    compute_due_fees, NewStudent, StudentId, StudentRecord, StudentValidationError,
};
pub use repo::roster_repo::{
    LoadError, RosterPersistence, SaveError, DEFAULT_ROSTER_KEY, ROSTER_FORMAT_VERSION,
};
pub use repo::slot_repo::{
    InMemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
};
pub use service::dashboard::{
    parse_float, preview_due_fees, ActionResponse, Dashboard, StudentForm,
};
pub use service::roster_store::RosterStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
