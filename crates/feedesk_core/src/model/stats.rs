//! Aggregate fee statistics derived from the roster.
//!
//! # Invariants
//! - Stats are never stored; they are recomputed from the current roster.

use crate::model::student::StudentRecord;
use serde::{Deserialize, Serialize};

/// Dashboard summary figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_students: usize,
    pub total_fees: f64,
    pub total_due: f64,
    pub total_collected: f64,
}

impl Stats {
    /// Folds the given records into summary figures.
    pub fn from_records(records: &[StudentRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, record| Self {
            total_students: acc.total_students + 1,
            total_fees: acc.total_fees + record.total_fees,
            total_due: acc.total_due + record.due_fees,
            total_collected: acc.total_collected + record.paid_fees,
        })
    }
}
