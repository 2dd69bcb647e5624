//! Tests for the persisted wishlist store.

use super::*;
use crate::error::StorageResult;
use crate::storage::MemoryStorage;
use crate::validation::RejectReason;
use serde_json::{json, Value};

fn charmander() -> Card {
    Card::new("A1", 4, "Charmander")
        .with_rarity("Common", "C")
        .with_packs(["Charizard"])
}

fn pikachu() -> Card {
    Card::new("A1", 25, "Pikachu")
        .with_rarity("Common", "C")
        .with_packs(["Pikachu"])
}

fn raw_blob(storage: &MemoryStorage) -> Option<String> {
    storage.get(WISHLIST_KEY).unwrap()
}

fn raw_len(storage: &MemoryStorage) -> usize {
    let raw = raw_blob(storage).expect("blob should be stored");
    serde_json::from_str::<Vec<Value>>(&raw).unwrap().len()
}

/// Backend whose every call fails with an I/O error
struct BrokenStorage;

impl Storage for BrokenStorage {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(std::io::Error::other("disk on fire").into())
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(std::io::Error::other("disk on fire").into())
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(std::io::Error::other("disk on fire").into())
    }
}

/// Backend that holds data but fails every read
struct ReadFailsStorage {
    inner: MemoryStorage,
}

impl Storage for ReadFailsStorage {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(std::io::Error::other("read error").into())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key)
    }
}

fn read_fails_with(entries: &[WishlistEntry]) -> ReadFailsStorage {
    let inner = MemoryStorage::new();
    inner
        .set(WISHLIST_KEY, &serde_json::to_string(entries).unwrap())
        .unwrap();
    ReadFailsStorage { inner }
}

// ── list / load ──────────────────────────────────────────────────────

#[test]
fn empty_storage_lists_nothing() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);

    let report = store.load();
    assert!(report.entries.is_empty());
    assert_eq!(report.outcome, LoadOutcome::Missing);
    assert!(raw_blob(&storage).is_none());
}

#[test]
fn written_entries_read_back_field_for_field() {
    let storage = MemoryStorage::new();
    let mut with_url = pikachu();
    with_url.image_url = Some("https://example.com/pikachu.webp".to_string());
    let written = vec![
        WishlistEntry::new(charmander(), "2025-01-01T08:00:00.000Z"),
        WishlistEntry::new(with_url, "2025-01-02T09:30:00.000Z"),
    ];
    storage
        .set(WISHLIST_KEY, &serde_json::to_string(&written).unwrap())
        .unwrap();

    let store = WishlistStore::new(&storage);
    let report = store.load();
    assert_eq!(report.outcome, LoadOutcome::Clean);
    assert_eq!(report.entries, written);
}

#[test]
fn syntactically_invalid_blob_is_cleared() {
    let storage = MemoryStorage::new();
    storage.set(WISHLIST_KEY, "[{\"card\":").unwrap();

    let store = WishlistStore::new(&storage);
    let report = store.load();
    assert!(report.entries.is_empty());
    assert_eq!(report.outcome, LoadOutcome::Reset);
    assert!(raw_blob(&storage).is_none());
}

#[test]
fn non_array_blob_is_cleared() {
    for blob in [r#"{"card": {}}"#, "\"wishlist\"", "42", "null"] {
        let storage = MemoryStorage::new();
        storage.set(WISHLIST_KEY, blob).unwrap();

        let store = WishlistStore::new(&storage);
        assert!(store.list().is_empty(), "blob {blob} should list nothing");
        assert!(raw_blob(&storage).is_none(), "blob {blob} should be removed");
    }
}

#[test]
fn partially_corrupt_array_heals_to_valid_subset() {
    let storage = MemoryStorage::new();
    let good = serde_json::to_value(WishlistEntry::new(charmander(), "2025-01-01T00:00:00.000Z"))
        .unwrap();
    let good2 =
        serde_json::to_value(WishlistEntry::new(pikachu(), "2025-01-02T00:00:00.000Z")).unwrap();
    let blob = json!([
        good,
        { "card": { "set": "A1", "number": "seven" }, "dateAdded": "2025-01-01" },
        good2,
        { "card": { "set": "A1", "number": 1 } },
        "not an entry"
    ]);
    storage.set(WISHLIST_KEY, &blob.to_string()).unwrap();

    let store = WishlistStore::new(&storage);
    let report = store.load();

    assert_eq!(report.outcome, LoadOutcome::Healed);
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].card.number, 4);
    assert_eq!(report.entries[1].card.number, 25);
    let reasons: Vec<(usize, RejectReason)> = report
        .rejected
        .iter()
        .map(|r| (r.index, r.reason.clone()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (1, RejectReason::InvalidNumber),
            (3, RejectReason::InvalidDateAdded),
            (4, RejectReason::NotAnObject),
        ]
    );

    // Storage now holds only the valid subset
    assert_eq!(raw_len(&storage), 2);
    assert_eq!(store.load().outcome, LoadOutcome::Clean);
}

#[test]
fn array_of_non_objects_heals_to_empty_array() {
    let storage = MemoryStorage::new();
    storage.set(WISHLIST_KEY, "[1, true, \"x\"]").unwrap();

    let store = WishlistStore::new(&storage);
    let report = store.load();
    assert_eq!(report.outcome, LoadOutcome::Healed);
    assert!(report.entries.is_empty());
    assert_eq!(report.rejected.len(), 3);
    assert_eq!(raw_blob(&storage).as_deref(), Some("[]"));
}

#[test]
fn duplicate_keys_in_storage_are_collapsed() {
    let storage = MemoryStorage::new();
    let first = WishlistEntry::new(charmander(), "2025-01-01T00:00:00.000Z");
    let second = WishlistEntry::new(charmander(), "2025-02-01T00:00:00.000Z");
    storage
        .set(
            WISHLIST_KEY,
            &serde_json::to_string(&vec![first.clone(), second]).unwrap(),
        )
        .unwrap();

    let store = WishlistStore::new(&storage);
    assert_eq!(store.list(), vec![first]);
    assert_eq!(raw_len(&storage), 1);
}

#[test]
fn unreadable_storage_lists_nothing() {
    let store = WishlistStore::new(BrokenStorage);
    let report = store.load();
    assert!(report.entries.is_empty());
    assert_eq!(report.outcome, LoadOutcome::Unreadable);
    assert!(!store.contains(&charmander().key()));
}

// ── add / contains ───────────────────────────────────────────────────

#[test]
fn add_then_contains() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);

    assert_eq!(store.add(&charmander()).unwrap(), AddOutcome::Added);
    assert!(store.contains(&CardKey::new("A1", 4)));
    assert!(!store.contains(&CardKey::new("A1", 25)));
    assert!(!store.contains(&CardKey::new("A2", 4)));
}

#[test]
fn add_is_idempotent() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);

    store.add(&charmander()).unwrap();
    let first_added = store.list()[0].date_added.clone();
    assert_eq!(store.add(&charmander()).unwrap(), AddOutcome::AlreadyPresent);

    let entries = store.list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date_added, first_added);
}

#[test]
fn add_preserves_insertion_order_and_snapshots_card() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);

    let mut card = pikachu();
    store.add(&card).unwrap();
    store.add(&charmander()).unwrap();
    card.label.eng = "Renamed".to_string();

    let entries = store.list();
    assert_eq!(entries[0].card.display_name(), Some("Pikachu"));
    assert_eq!(entries[1].card.number, 4);
}

#[test]
fn add_stamps_rfc3339_timestamp() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);
    store.add(&charmander()).unwrap();

    let date_added = &store.list()[0].date_added;
    assert!(chrono::DateTime::parse_from_rfc3339(date_added).is_ok());
    assert!(date_added.ends_with('Z'));
}

#[test]
fn add_over_quota_reports_quota_exceeded() {
    let storage = MemoryStorage::with_quota(64);
    let store = WishlistStore::new(&storage);

    let result = store.add(&charmander());
    match result {
        Err(WishlistError::QuotaExceeded(_)) => {}
        other => panic!("Expected QuotaExceeded, got: {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn add_with_failing_backend_reports_generic_error() {
    let store = WishlistStore::new(BrokenStorage);
    match store.add(&charmander()) {
        Err(WishlistError::Storage(_)) => {}
        other => panic!("Expected Storage error, got: {other:?}"),
    }
}

#[test]
fn mutations_do_not_overwrite_unreadable_wishlist() {
    let stored = vec![WishlistEntry::new(pikachu(), "2025-01-01T00:00:00.000Z")];
    let storage = read_fails_with(&stored);
    let original = storage.inner.get(WISHLIST_KEY).unwrap();
    let store = WishlistStore::new(&storage);

    assert_eq!(store.load().outcome, LoadOutcome::Unreadable);
    assert!(matches!(
        store.add(&charmander()),
        Err(WishlistError::Storage(_))
    ));
    assert!(matches!(
        store.add_all(&[charmander()]),
        Err(WishlistError::Storage(_))
    ));
    assert!(matches!(
        store.remove(&pikachu().key()),
        Err(WishlistError::Storage(_))
    ));

    assert_eq!(storage.inner.get(WISHLIST_KEY).unwrap(), original);
}

#[test]
fn add_all_skips_present_and_repeated_cards() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);
    store.add(&charmander()).unwrap();

    let added = store
        .add_all(&[charmander(), pikachu(), pikachu()])
        .unwrap();
    assert_eq!(added, 1);

    let keys: Vec<String> = store.list().iter().map(|e| e.key().to_string()).collect();
    assert_eq!(keys, vec!["A1-4", "A1-25"]);
}

#[test]
fn add_all_with_nothing_new_does_not_write() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);
    assert_eq!(store.add_all(&[]).unwrap(), 0);
    assert!(raw_blob(&storage).is_none());
}

// ── remove / clear ───────────────────────────────────────────────────

#[test]
fn remove_after_add_restores_prior_state() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);
    store.add(&pikachu()).unwrap();
    let before = store.list();

    store.add(&charmander()).unwrap();
    assert!(store.contains(&charmander().key()));
    assert_eq!(store.remove(&charmander().key()).unwrap(), 1);

    assert!(!store.contains(&charmander().key()));
    assert_eq!(store.list(), before);
}

#[test]
fn remove_missing_card_is_noop() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);
    store.add(&pikachu()).unwrap();

    assert_eq!(store.remove(&CardKey::new("A1", 4)).unwrap(), 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn readd_after_remove_creates_new_entry() {
    let storage = MemoryStorage::new();
    let stale = WishlistEntry::new(charmander(), "2020-01-01T00:00:00.000Z");
    storage
        .set(WISHLIST_KEY, &serde_json::to_string(&vec![stale]).unwrap())
        .unwrap();
    let store = WishlistStore::new(&storage);

    store.remove(&charmander().key()).unwrap();
    store.add(&charmander()).unwrap();

    let entries = store.list();
    assert_eq!(entries.len(), 1);
    assert_ne!(entries[0].date_added, "2020-01-01T00:00:00.000Z");
}

#[test]
fn clear_deletes_blob() {
    let storage = MemoryStorage::new();
    let store = WishlistStore::new(&storage);
    store.add(&pikachu()).unwrap();
    store.add(&charmander()).unwrap();

    store.clear().unwrap();
    assert!(raw_blob(&storage).is_none());
    assert!(store.is_empty());

    // Clearing an empty store is fine
    store.clear().unwrap();
}
