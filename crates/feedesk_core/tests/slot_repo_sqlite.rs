use feedesk_core::db::{open_db, open_db_in_memory};
use feedesk_core::{RepoError, SlotRepository, SqliteSlotRepository};

#[test]
fn absent_slot_reads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    assert_eq!(repo.get_item("feedesk_students").unwrap(), None);
}

#[test]
fn set_item_overwrites_whole_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    repo.set_item("roster", "first").unwrap();
    repo.set_item("roster", "second").unwrap();

    assert_eq!(repo.get_item("roster").unwrap().as_deref(), Some("second"));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn slots_are_independent_by_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    repo.set_item("a", "1").unwrap();
    repo.set_item("b", "2").unwrap();
    assert!(repo.remove_item("a").unwrap());

    assert_eq!(repo.get_item("a").unwrap(), None);
    assert_eq!(repo.get_item("b").unwrap().as_deref(), Some("2"));
    assert!(!repo.remove_item("a").unwrap());
}

#[test]
fn blank_key_is_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    assert!(matches!(
        repo.get_item(" ").unwrap_err(),
        RepoError::InvalidKey(_)
    ));
}

#[test]
fn slot_value_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slots.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        SqliteSlotRepository::new(&conn)
            .set_item("roster", "[]")
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    assert_eq!(repo.get_item("roster").unwrap().as_deref(), Some("[]"));
}
