use chrono::Utc;
use licenseverify_store::{AuditLog, LicenseStore, Pool, StoreError};
use licenseverify_types::{
    LicenseId, LicenseRecord, VerificationLogEntry, VerificationResult,
};
use tempfile::TempDir;

fn open_store() -> (LicenseStore, AuditLog, TempDir) {
    let dir = TempDir::new().unwrap();
    let pool = Pool::open(dir.path().join("licenses.db"), 2).unwrap();
    (LicenseStore::new(pool.clone()), AuditLog::new(pool), dir)
}

fn acme(key: &str) -> LicenseRecord {
    LicenseRecord::new(key, "Acme Corp", "ops@acme.test", "Enterprise")
}

#[test]
fn insert_and_find_by_key() {
    let (store, _audit, _dir) = open_store();
    let record = acme("KEY-1");
    store.insert(&record).unwrap();

    let found = store.find_active_by_key("KEY-1").unwrap().unwrap();
    assert_eq!(found, record);
}

#[test]
fn unknown_key_is_absent() {
    let (store, _audit, _dir) = open_store();
    assert!(store.find_active_by_key("NOPE").unwrap().is_none());
}

#[test]
fn inactive_record_is_invisible_to_active_lookup() {
    let (store, _audit, _dir) = open_store();
    store
        .insert(&acme("KEY-1").with_status("inactive"))
        .unwrap();

    assert!(store.find_active_by_key("KEY-1").unwrap().is_none());
    // Still reachable without the status filter
    assert!(store.find_by_key("KEY-1").unwrap().is_some());
}

#[test]
fn duplicate_license_key_is_rejected() {
    let (store, _audit, _dir) = open_store();
    store.insert(&acme("KEY-1")).unwrap();

    let duplicate = LicenseRecord::new("KEY-1", "Other Inc", "ops@other.test", "Basic");
    assert!(matches!(
        store.insert(&duplicate),
        Err(StoreError::Database(_))
    ));
}

#[test]
fn record_verification_increments_and_appends_log() {
    let (store, audit, _dir) = open_store();
    let record = acme("KEY-1");
    store.insert(&record).unwrap();

    let now = Utc::now();
    let entry = VerificationLogEntry::new(
        "KEY-1",
        Some("203.0.113.9"),
        None,
        VerificationResult::Valid,
        now,
    );
    let count = store.record_verification(record.id, &entry, now).unwrap();
    assert_eq!(count, 1);

    let stored = store.find_by_key("KEY-1").unwrap().unwrap();
    assert_eq!(stored.verification_count, 1);
    assert_eq!(stored.last_verified, Some(now));
    assert_eq!(audit.count_for_key("KEY-1").unwrap(), 1);
}

#[test]
fn record_verification_returns_post_increment_count() {
    let (store, _audit, _dir) = open_store();
    let record = acme("KEY-1");
    store.insert(&record).unwrap();

    for expected in 1..=3 {
        let now = Utc::now();
        let entry =
            VerificationLogEntry::new("KEY-1", None, None, VerificationResult::Valid, now);
        let count = store.record_verification(record.id, &entry, now).unwrap();
        assert_eq!(count, expected);
    }
}

#[test]
fn record_verification_for_missing_license_fails() {
    let (store, audit, _dir) = open_store();
    let now = Utc::now();
    let entry = VerificationLogEntry::new("GHOST", None, None, VerificationResult::Valid, now);

    let result = store.record_verification(LicenseId::new(), &entry, now);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
    // The transaction rolled back; no orphan audit row
    assert_eq!(audit.count().unwrap(), 0);
}

#[test]
fn company_lookup_matches_substring_case_insensitively() {
    let (store, _audit, _dir) = open_store();
    store.insert(&acme("KEY-1")).unwrap();

    assert!(store.find_active_by_company("acme").unwrap().is_some());
    assert!(store.find_active_by_company("CME CO").unwrap().is_some());
    assert!(store.find_active_by_company("Globex").unwrap().is_none());
}

#[test]
fn list_active_is_ordered_and_filtered() {
    let (store, _audit, _dir) = open_store();
    store
        .insert(&LicenseRecord::new("K-Z", "Zenith Ltd", "z@z.test", "Basic"))
        .unwrap();
    store
        .insert(&LicenseRecord::new("K-A", "Aardvark Inc", "a@a.test", "Pro"))
        .unwrap();
    store
        .insert(&LicenseRecord::new("K-I", "Inactive Co", "i@i.test", "Basic").with_status("inactive"))
        .unwrap();

    let listings = store.list_active().unwrap();
    let names: Vec<_> = listings.iter().map(|l| l.company_name.as_str()).collect();
    assert_eq!(names, vec!["Aardvark Inc", "Zenith Ltd"]);
}

#[test]
fn count_includes_all_statuses() {
    let (store, _audit, _dir) = open_store();
    store.insert(&acme("KEY-1")).unwrap();
    store
        .insert(&LicenseRecord::new("KEY-2", "Globex", "g@g.test", "Basic").with_status("inactive"))
        .unwrap();

    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn pool_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("licenses.db");

    let record = acme("KEY-1");
    {
        let store = LicenseStore::new(Pool::open(&path, 1).unwrap());
        store.insert(&record).unwrap();
    }

    let store = LicenseStore::new(Pool::open(&path, 2).unwrap());
    assert_eq!(store.find_by_key("KEY-1").unwrap().unwrap(), record);
}
