//! Student fee record model.
//!
//! # Responsibility
//! - Define the record shape stored in the roster slot.
//! - Own the due-fee rule and add-time input validation.
//!
//! # Invariants
//! - `id` is generated once and never reused for another student.
//! - `due_fees == max(0, total_fees - paid_fees)` for every record.
//! - Amounts are finite and non-negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Opaque stable identifier of a student record.
///
/// Persisted as a plain JSON string. Generated values are UUID v4, but
/// any non-empty string loaded from storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StudentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StudentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Validation failures for student input and persisted records.
#[derive(Debug, Clone, PartialEq)]
pub enum StudentValidationError {
    /// A required text field is empty after trimming.
    MissingField(&'static str),
    /// `total_fees` is negative, NaN or infinite.
    InvalidTotalFees(f64),
    /// A persisted amount field is negative, NaN or infinite.
    InvalidAmount { field: &'static str, value: f64 },
    /// Persisted `due_fees` disagrees with the due-fee rule.
    DueFeesMismatch { expected: f64, actual: f64 },
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::InvalidTotalFees(value) => {
                write!(f, "total fees must be a non-negative number, got {value}")
            }
            Self::InvalidAmount { field, value } => {
                write!(f, "`{field}` must be a non-negative number, got {value}")
            }
            Self::DueFeesMismatch { expected, actual } => write!(
                f,
                "due fees ({actual}) must equal max(0, total - paid) ({expected})"
            ),
        }
    }
}

impl Error for StudentValidationError {}

/// Input for adding one student to the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub mobile: String,
    pub total_fees: f64,
    /// Absent or invalid values count as nothing paid.
    pub paid_fees: Option<f64>,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        mobile: impl Into<String>,
        total_fees: f64,
        paid_fees: Option<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            mobile: mobile.into(),
            total_fees,
            paid_fees,
        }
    }
}

/// One tracked student and their fee position.
///
/// Field names follow the camelCase storage layout of the roster slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub mobile: String,
    pub total_fees: f64,
    pub paid_fees: f64,
    pub due_fees: f64,
    /// Creation instant in Unix epoch milliseconds.
    pub date_added: i64,
}

impl StudentRecord {
    /// Builds a new record with a generated id and the current timestamp.
    ///
    /// # Errors
    /// - `MissingField` when `name` or `mobile` is blank.
    /// - `InvalidTotalFees` when `total_fees` is not a non-negative number.
    pub fn create(input: &NewStudent) -> Result<Self, StudentValidationError> {
        Self::create_at(input, StudentId::generate(), now_epoch_ms())
    }

    /// Builds a new record with caller-provided identity and timestamp.
    ///
    /// Used by import paths and deterministic tests.
    pub fn create_at(
        input: &NewStudent,
        id: StudentId,
        date_added: i64,
    ) -> Result<Self, StudentValidationError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(StudentValidationError::MissingField("name"));
        }
        let mobile = input.mobile.trim();
        if mobile.is_empty() {
            return Err(StudentValidationError::MissingField("mobile"));
        }
        if !is_valid_amount(input.total_fees) {
            return Err(StudentValidationError::InvalidTotalFees(input.total_fees));
        }

        let paid_fees = input.paid_fees.filter(|paid| is_valid_amount(*paid)).unwrap_or(0.0);

        Ok(Self {
            id,
            name: name.to_string(),
            mobile: mobile.to_string(),
            total_fees: input.total_fees,
            paid_fees,
            due_fees: compute_due_fees(input.total_fees, paid_fees),
            date_added,
        })
    }

    /// Checks record invariants, typically after reading persisted data.
    ///
    /// Text fields only need to be non-empty here; trimming applies to new
    /// input in `create_at`, not to records that were already stored.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.id.as_str().is_empty() {
            return Err(StudentValidationError::MissingField("id"));
        }
        if self.name.is_empty() {
            return Err(StudentValidationError::MissingField("name"));
        }
        if self.mobile.is_empty() {
            return Err(StudentValidationError::MissingField("mobile"));
        }
        for (field, value) in [
            ("totalFees", self.total_fees),
            ("paidFees", self.paid_fees),
            ("dueFees", self.due_fees),
        ] {
            if !is_valid_amount(value) {
                return Err(StudentValidationError::InvalidAmount { field, value });
            }
        }

        let expected = compute_due_fees(self.total_fees, self.paid_fees);
        if expected != self.due_fees {
            return Err(StudentValidationError::DueFeesMismatch {
                expected,
                actual: self.due_fees,
            });
        }

        Ok(())
    }

    /// Returns whether any amount is still owed.
    pub fn has_dues(&self) -> bool {
        self.due_fees > 0.0
    }
}

/// Amount still owed: `max(0, total - paid)`.
///
/// Overpayment clamps to zero; it never yields a negative due.
pub fn compute_due_fees(total_fees: f64, paid_fees: f64) -> f64 {
    (total_fees - paid_fees).max(0.0)
}

fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
