use feedesk_core::db::open_db;
use feedesk_core::{
    InMemorySlotRepository, NewStudent, RosterPersistence, RosterStore, SlotRepository,
    SqliteSlotRepository, Stats, StudentId, StudentValidationError, DEFAULT_ROSTER_KEY,
};

fn open_store(slots: &InMemorySlotRepository) -> RosterStore<&InMemorySlotRepository> {
    RosterStore::open(RosterPersistence::new(slots))
}

fn assert_stats_match_roster(store: &RosterStore<&InMemorySlotRepository>) {
    let stats = store.stats();
    let list = store.list();
    assert_eq!(stats.total_students, list.len());
    assert_eq!(stats.total_fees, list.iter().map(|r| r.total_fees).sum::<f64>());
    assert_eq!(stats.total_due, list.iter().map(|r| r.due_fees).sum::<f64>());
    assert_eq!(
        stats.total_collected,
        list.iter().map(|r| r.paid_fees).sum::<f64>()
    );
}

#[test]
fn single_add_matches_dashboard_figures() {
    let slots = InMemorySlotRepository::new();
    let mut store = open_store(&slots);

    let alice = store
        .add(&NewStudent::new("Alice", "555-0100", 1000.0, Some(400.0)))
        .unwrap();

    assert_eq!(alice.due_fees, 600.0);
    assert_eq!(
        store.stats(),
        Stats {
            total_students: 1,
            total_fees: 1000.0,
            total_due: 600.0,
            total_collected: 400.0,
        }
    );
}

#[test]
fn delete_first_of_two_leaves_remaining_due() {
    let slots = InMemorySlotRepository::new();
    let mut store = open_store(&slots);

    let paid_up = store
        .add(&NewStudent::new("Paid", "555-0001", 1000.0, Some(1000.0)))
        .unwrap();
    store
        .add(&NewStudent::new("Owing", "555-0002", 500.0, Some(0.0)))
        .unwrap();

    assert!(store.delete(&paid_up.id));
    assert_eq!(store.list().len(), 1);
    assert_eq!(store.list()[0].due_fees, 500.0);
    assert_eq!(store.stats().total_due, 500.0);
}

#[test]
fn add_prepends_newest_first() {
    let slots = InMemorySlotRepository::new();
    let mut store = open_store(&slots);

    let first = store.add(&NewStudent::new("First", "1", 1.0, None)).unwrap();
    let second = store.add(&NewStudent::new("Second", "2", 2.0, None)).unwrap();

    let ids: Vec<&StudentId> = store.list().iter().map(|r| &r.id).collect();
    assert_eq!(ids, vec![&second.id, &first.id]);
}

#[test]
fn delete_is_idempotent_and_unknown_ids_are_noops() {
    let slots = InMemorySlotRepository::new();
    let mut store = open_store(&slots);
    let kept = store.add(&NewStudent::new("Kept", "1", 10.0, None)).unwrap();
    let gone = store.add(&NewStudent::new("Gone", "2", 20.0, None)).unwrap();

    assert!(store.delete(&gone.id));
    let after_first = store.list().to_vec();
    assert!(!store.delete(&gone.id));
    assert_eq!(store.list(), after_first.as_slice());

    assert!(!store.delete(&StudentId::from("never-existed")));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&kept.id).unwrap().name, "Kept");
}

#[test]
fn stats_track_list_across_mutations() {
    let slots = InMemorySlotRepository::new();
    let mut store = open_store(&slots);
    assert_stats_match_roster(&store);

    let mut ids = Vec::new();
    for (index, (total, paid)) in [(100.0, 20.0), (50.0, 80.0), (10.5, 0.0), (999.0, 1.0)]
        .into_iter()
        .enumerate()
    {
        let record = store
            .add(&NewStudent::new(format!("s{index}"), "555", total, Some(paid)))
            .unwrap();
        ids.push(record.id);
        assert_stats_match_roster(&store);
    }

    for id in ids.iter().step_by(2) {
        store.delete(id);
        assert_stats_match_roster(&store);
    }
    assert_eq!(store.stats().total_students, 2);
}

#[test]
fn rejected_add_leaves_roster_and_storage_untouched() {
    let slots = InMemorySlotRepository::new();
    let mut store = open_store(&slots);

    let err = store
        .add(&NewStudent::new("", "555", 10.0, None))
        .unwrap_err();

    assert_eq!(err, StudentValidationError::MissingField("name"));
    assert!(store.is_empty());
    assert!(store.persistence().try_load().unwrap().is_empty());
    assert_eq!(slots.get_item(store.persistence().key()).unwrap(), None);
}

#[test]
fn every_mutation_is_mirrored_to_storage() {
    let slots = InMemorySlotRepository::new();
    let mut store = open_store(&slots);

    let record = store.add(&NewStudent::new("Mirror", "1", 10.0, None)).unwrap();
    assert_eq!(store.persistence().load(), store.list());

    store.delete(&record.id);
    assert!(store.persistence().load().is_empty());
}

#[test]
fn reopening_hydrates_from_persisted_roster() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedesk.sqlite3");

    let expected = {
        let conn = open_db(&path).unwrap();
        let persistence = RosterPersistence::new(SqliteSlotRepository::new(&conn));
        let mut store = RosterStore::open(persistence);
        store.add(&NewStudent::new("A", "1", 300.0, Some(100.0))).unwrap();
        store.add(&NewStudent::new("B", "2", 200.0, None)).unwrap();
        store.list().to_vec()
    };

    let conn = open_db(&path).unwrap();
    let store = RosterStore::open(RosterPersistence::new(SqliteSlotRepository::new(&conn)));
    assert_eq!(store.list(), expected.as_slice());
    assert_eq!(store.stats().total_due, 400.0);
}

#[test]
fn corrupt_storage_opens_empty_store() {
    let slots = InMemorySlotRepository::new();
    slots.set_item(DEFAULT_ROSTER_KEY, "[{]").unwrap();

    let mut store = open_store(&slots);
    assert!(store.is_empty());

    store.add(&NewStudent::new("Fresh", "1", 5.0, None)).unwrap();
    assert_eq!(store.persistence().try_load().unwrap().len(), 1);
}
