//! Key-value slot contract with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Provide `get_item`/`set_item`/`remove_item` over named slots, the
//!   durable equivalent of a browser local-storage area.
//!
//! # Invariants
//! - `set_item` replaces the whole slot value unconditionally.
//! - Blank keys are rejected before touching storage.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Slot storage error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid slot key `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named durable slots holding UTF-8 text.
pub trait SlotRepository {
    /// Returns the slot value, or `None` when the slot was never written.
    fn get_item(&self, key: &str) -> RepoResult<Option<String>>;
    /// Overwrites the slot with `value`.
    fn set_item(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Clears the slot. Returns whether a value was present.
    fn remove_item(&self, key: &str) -> RepoResult<bool>;
}

impl<R: SlotRepository + ?Sized> SlotRepository for &R {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> RepoResult<bool> {
        (**self).remove_item(key)
    }
}

/// Slots stored in the `kv_slots` table.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        let key = checked_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = checked_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> RepoResult<bool> {
        let key = checked_key(key)?;
        let removed = self
            .conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        Ok(removed > 0)
    }
}

/// Process-local slots, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemorySlotRepository {
    slots: RefCell<HashMap<String, String>>,
}

impl InMemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotRepository for InMemorySlotRepository {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        let key = checked_key(key)?;
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = checked_key(key)?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> RepoResult<bool> {
        let key = checked_key(key)?;
        Ok(self.slots.borrow_mut().remove(key).is_some())
    }
}

fn checked_key(key: &str) -> RepoResult<&str> {
    if key.trim().is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(key)
}
