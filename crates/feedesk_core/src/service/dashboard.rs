//! Presentation-facing dashboard contract.
//!
//! # Responsibility
//! - Accept raw form text the way the add-student form collects it.
//! - Translate store results into simple, panic-free responses.
//!
//! # Invariants
//! - The dashboard never mutates the roster except through `RosterStore`.
//! - Numeric text is read with browser `parseFloat` semantics: the longest
//!   leading decimal literal wins, anything else is unparsable.

use crate::model::stats::Stats;
use crate::model::student::{compute_due_fees, NewStudent, StudentId, StudentRecord};
use crate::repo::roster_repo::RosterPersistence;
use crate::repo::slot_repo::SlotRepository;
use crate::service::roster_store::RosterStore;
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("valid number regex")
});

/// Raw add-student form fields, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub mobile: String,
    pub total_fees: String,
    pub paid_fees: String,
}

/// Outcome of a dashboard command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the command took effect.
    pub ok: bool,
    /// Id of the created student, when one was created.
    pub student_id: Option<String>,
    /// Human-readable outcome for display.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, student_id: Option<String>) -> Self {
        Self {
            ok: true,
            student_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            student_id: None,
            message: message.into(),
        }
    }
}

/// Dashboard session bound to one roster store.
pub struct Dashboard<R: SlotRepository> {
    store: RosterStore<R>,
}

impl<R: SlotRepository> Dashboard<R> {
    /// Loads the persisted roster; called once when the dashboard mounts.
    pub fn on_mount(persistence: RosterPersistence<R>) -> Self {
        Self {
            store: RosterStore::open(persistence),
        }
    }

    /// Submits the add-student form.
    ///
    /// # Contract
    /// - `name`, `mobile` and `total_fees` text are required.
    /// - Unparsable `paid_fees` text counts as 0.
    /// - Never panics; failures come back as `ok = false`.
    pub fn add_student(&mut self, form: &StudentForm) -> ActionResponse {
        for (field, value) in [
            ("name", &form.name),
            ("mobile", &form.mobile),
            ("total fees", &form.total_fees),
        ] {
            if value.trim().is_empty() {
                return ActionResponse::failure(format!("{field} is required"));
            }
        }

        let input = NewStudent::new(
            form.name.as_str(),
            form.mobile.as_str(),
            parse_float(&form.total_fees).unwrap_or(f64::NAN),
            parse_float(&form.paid_fees),
        );
        match self.store.add(&input) {
            Ok(record) => ActionResponse::success(
                format!("student added with {} due", record.due_fees),
                Some(record.id.to_string()),
            ),
            Err(err) => ActionResponse::failure(err.to_string()),
        }
    }

    /// Removes a student after the caller has obtained confirmation.
    ///
    /// Returns `false` when no student has that id.
    pub fn remove_student(&mut self, id: &str) -> bool {
        self.store.delete(&StudentId::from(id.trim()))
    }

    /// Roster in display order, newest first.
    pub fn students(&self) -> &[StudentRecord] {
        self.store.list()
    }

    pub fn get_stats(&self) -> Stats {
        self.store.stats()
    }
}

/// Live due-fee preview shown while the form is being filled.
///
/// Unparsable inputs count as 0.
pub fn preview_due_fees(total_text: &str, paid_text: &str) -> f64 {
    let total = parse_float(total_text).unwrap_or(0.0);
    let paid = parse_float(paid_text).unwrap_or(0.0);
    compute_due_fees(total, paid)
}

/// Reads the longest leading decimal literal of `text`.
pub fn parse_float(text: &str) -> Option<f64> {
    let literal = LEADING_NUMBER_RE.find(text)?.as_str().trim_start();
    literal.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_float, preview_due_fees};

    #[test]
    fn parse_float_takes_leading_literal() {
        assert_eq!(parse_float("1200"), Some(1200.0));
        assert_eq!(parse_float("  12.5kg"), Some(12.5));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("3."), Some(3.0));
        assert_eq!(parse_float("-4"), Some(-4.0));
        assert_eq!(parse_float("1e3x"), Some(1000.0));
        assert_eq!(parse_float("2e"), Some(2.0));
    }

    #[test]
    fn parse_float_rejects_non_numeric_text() {
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("$100"), None);
        assert_eq!(parse_float("."), None);
    }

    #[test]
    fn preview_treats_blank_fields_as_zero() {
        assert_eq!(preview_due_fees("", ""), 0.0);
        assert_eq!(preview_due_fees("500", ""), 500.0);
        assert_eq!(preview_due_fees("500", "650"), 0.0);
    }
}
