//! Roster persistence adapter over one fixed key-value slot.
//!
//! # Responsibility
//! - Mirror the whole roster into a single slot as versioned JSON.
//! - Read it back once at startup, migrating the legacy bare-array layout.
//!
//! # Invariants
//! - `load` and `save` never fail the caller; failures are logged and a
//!   safe default (empty roster / no write) is substituted.
//! - Persisted data that breaks record invariants is discarded, not masked.
//!
//! # Storage layout
//! - v1: `{"version":1,"students":[StudentRecord, ...]}`
//! - legacy (v0): `[StudentRecord, ...]`

use crate::model::student::{StudentId, StudentRecord, StudentValidationError};
use crate::repo::slot_repo::{RepoError, SlotRepository};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the roster unless configured otherwise.
pub const DEFAULT_ROSTER_KEY: &str = "feedesk_students";
/// Envelope version written by `save`.
pub const ROSTER_FORMAT_VERSION: u32 = 1;

/// Why a persisted roster could not be read.
#[derive(Debug)]
pub enum LoadError {
    Repo(RepoError),
    Malformed(serde_json::Error),
    UnsupportedVersion { found: u32, supported: u32 },
    InvalidRecord {
        index: usize,
        source: StudentValidationError,
    },
    DuplicateId(StudentId),
}

impl LoadError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Repo(_) => "slot_read_failed",
            Self::Malformed(_) => "roster_malformed",
            Self::UnsupportedVersion { .. } => "roster_version_unsupported",
            Self::InvalidRecord { .. } => "roster_record_invalid",
            Self::DuplicateId(_) => "roster_duplicate_id",
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "failed to read roster slot: {err}"),
            Self::Malformed(err) => write!(f, "roster payload is not valid JSON roster: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "roster format v{found} is newer than supported v{supported}"
            ),
            Self::InvalidRecord { index, source } => {
                write!(f, "roster record #{index} is invalid: {source}")
            }
            Self::DuplicateId(id) => write!(f, "roster contains duplicate id `{id}`"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Malformed(err) => Some(err),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::UnsupportedVersion { .. } | Self::DuplicateId(_) => None,
        }
    }
}

impl From<RepoError> for LoadError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

/// Why a roster snapshot could not be written.
#[derive(Debug)]
pub enum SaveError {
    Encode(serde_json::Error),
    Repo(RepoError),
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode roster: {err}"),
            Self::Repo(err) => write!(f, "failed to write roster slot: {err}"),
        }
    }
}

impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

#[derive(Serialize)]
struct RosterEnvelope<'a> {
    version: u32,
    students: &'a [StudentRecord],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRoster {
    Versioned {
        version: u32,
        students: Vec<StudentRecord>,
    },
    Legacy(Vec<StudentRecord>),
}

/// Loads and saves whole-roster snapshots through a `SlotRepository`.
pub struct RosterPersistence<R: SlotRepository> {
    repo: R,
    key: String,
}

impl<R: SlotRepository> RosterPersistence<R> {
    /// Binds the adapter to `DEFAULT_ROSTER_KEY`.
    pub fn new(repo: R) -> Self {
        Self::with_key(repo, DEFAULT_ROSTER_KEY)
    }

    pub fn with_key(repo: R, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Reads the roster, substituting an empty one on any failure.
    ///
    /// # Side effects
    /// - Emits `event=roster_load` with `status=error` and an `error_code`
    ///   when the persisted payload is discarded.
    pub fn load(&self) -> Vec<StudentRecord> {
        match self.try_load() {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=roster_load module=persistence status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Reads and validates the roster, surfacing the failure cause.
    ///
    /// An absent slot is an empty roster, not an error.
    pub fn try_load(&self) -> Result<Vec<StudentRecord>, LoadError> {
        let Some(payload) = self.repo.get_item(&self.key)? else {
            debug!("event=roster_load module=persistence status=ok source=absent count=0");
            return Ok(Vec::new());
        };

        let value: serde_json::Value = serde_json::from_str(&payload)?;
        if let Some(found) = value.get("version").and_then(serde_json::Value::as_u64) {
            if found > u64::from(ROSTER_FORMAT_VERSION) {
                return Err(LoadError::UnsupportedVersion {
                    found: u32::try_from(found).unwrap_or(u32::MAX),
                    supported: ROSTER_FORMAT_VERSION,
                });
            }
        }

        let (version, records) = match serde_json::from_value::<StoredRoster>(value)? {
            StoredRoster::Versioned { version, students } => (version, students),
            StoredRoster::Legacy(students) => (0, students),
        };

        let mut seen = HashSet::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|source| LoadError::InvalidRecord { index, source })?;
            if !seen.insert(&record.id) {
                return Err(LoadError::DuplicateId(record.id.clone()));
            }
        }

        info!(
            "event=roster_load module=persistence status=ok version={} count={}",
            version,
            records.len()
        );
        Ok(records)
    }

    /// Overwrites the slot with `records`; failures are logged and swallowed.
    pub fn save(&self, records: &[StudentRecord]) {
        if let Err(err) = self.try_save(records) {
            error!(
                "event=roster_save module=persistence status=error count={} error={}",
                records.len(),
                err
            );
        }
    }

    /// Overwrites the slot with `records` as a v1 envelope.
    pub fn try_save(&self, records: &[StudentRecord]) -> Result<(), SaveError> {
        let payload = serde_json::to_string(&RosterEnvelope {
            version: ROSTER_FORMAT_VERSION,
            students: records,
        })
        .map_err(SaveError::Encode)?;
        self.repo
            .set_item(&self.key, &payload)
            .map_err(SaveError::Repo)?;

        debug!(
            "event=roster_save module=persistence status=ok count={} bytes={}",
            records.len(),
            payload.len()
        );
        Ok(())
    }
}
