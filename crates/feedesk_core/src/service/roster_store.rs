//! Roster store: the single source of truth for student fee records.
//!
//! # Responsibility
//! - Hold the ordered roster (newest first) hydrated once at construction.
//! - Apply add/delete and immediately re-save the whole roster.
//! - Derive `Stats` on demand.
//!
//! # Invariants
//! - Student ids in the roster are distinct.
//! - Every successful mutation is followed by exactly one full save.
//! - Reads (`list`, `stats`, `get`) never touch persistence.

use crate::model::stats::Stats;
use crate::model::student::{NewStudent, StudentId, StudentRecord, StudentValidationError};
use crate::repo::roster_repo::RosterPersistence;
use crate::repo::slot_repo::SlotRepository;
use log::{info, warn};

/// In-memory roster with an injected persistence mirror.
pub struct RosterStore<R: SlotRepository> {
    persistence: RosterPersistence<R>,
    roster: Vec<StudentRecord>,
}

impl<R: SlotRepository> RosterStore<R> {
    /// Creates the store and hydrates it from persistence exactly once.
    pub fn open(persistence: RosterPersistence<R>) -> Self {
        let roster = persistence.load();
        info!(
            "event=roster_open module=store status=ok count={}",
            roster.len()
        );
        Self {
            persistence,
            roster,
        }
    }

    /// Adds a student at the front of the roster and re-saves.
    ///
    /// # Errors
    /// - Returns `StudentValidationError` for blank name/mobile or an
    ///   invalid total; the roster and storage stay untouched.
    pub fn add(&mut self, input: &NewStudent) -> Result<StudentRecord, StudentValidationError> {
        let record = match StudentRecord::create(input) {
            Ok(record) => record,
            Err(err) => {
                warn!("event=student_add module=store status=rejected reason={err}");
                return Err(err);
            }
        };

        self.roster.insert(0, record.clone());
        self.persistence.save(&self.roster);
        info!(
            "event=student_add module=store status=ok count={}",
            self.roster.len()
        );
        Ok(record)
    }

    /// Removes the student with `id`. Unknown ids are a no-op.
    ///
    /// Returns whether a record was removed; storage is only rewritten then.
    pub fn delete(&mut self, id: &StudentId) -> bool {
        let Some(position) = self.roster.iter().position(|record| &record.id == id) else {
            return false;
        };

        self.roster.remove(position);
        self.persistence.save(&self.roster);
        info!(
            "event=student_delete module=store status=ok count={}",
            self.roster.len()
        );
        true
    }

    /// Current roster, newest first.
    pub fn list(&self) -> &[StudentRecord] {
        &self.roster
    }

    pub fn get(&self, id: &StudentId) -> Option<&StudentRecord> {
        self.roster.iter().find(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Aggregate figures over the current roster.
    pub fn stats(&self) -> Stats {
        Stats::from_records(&self.roster)
    }

    pub fn persistence(&self) -> &RosterPersistence<R> {
        &self.persistence
    }
}
