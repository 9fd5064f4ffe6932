mod common;

use chrono::{Duration, TimeZone, Utc};
use common::open_stores;
use licenseverify_core::{CoreError, LicenseVerifier};
use licenseverify_types::{LicenseRecord, VerificationResult};

#[test]
fn empty_key_fails_validation_without_logging() {
    let (licenses, _tickets, audit, _dir) = open_stores();
    let verifier = LicenseVerifier::new(licenses, audit.clone());

    let result = verifier.verify("", Some("203.0.113.9"), Some("curl/8.5"));
    assert!(matches!(result, Err(CoreError::Validation(msg)) if msg == "license key is required"));
    assert_eq!(audit.count().unwrap(), 0);
}

#[test]
fn unknown_key_is_not_found_and_logged_invalid() {
    let (licenses, _tickets, audit, _dir) = open_stores();
    let verifier = LicenseVerifier::new(licenses, audit.clone());

    let result = verifier.verify("NO-SUCH-KEY", Some("203.0.113.9"), None);
    assert!(matches!(result, Err(CoreError::NotFound)));

    let entries = audit.entries_for_key("NO-SUCH-KEY").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result, VerificationResult::Invalid);
    assert_eq!(entries[0].ip_address.as_deref(), Some("203.0.113.9"));
}

#[test]
fn inactive_key_is_indistinguishable_from_unknown() {
    let (licenses, _tickets, audit, _dir) = open_stores();
    licenses
        .insert(
            &LicenseRecord::new("KEY-1", "Acme Corp", "ops@acme.test", "Enterprise")
                .with_status("inactive"),
        )
        .unwrap();
    let verifier = LicenseVerifier::new(licenses.clone(), audit.clone());

    let result = verifier.verify("KEY-1", None, None);
    assert!(matches!(result, Err(CoreError::NotFound)));

    let entries = audit.entries_for_key("KEY-1").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result, VerificationResult::Invalid);
    // Counter untouched
    assert_eq!(
        licenses.find_by_key("KEY-1").unwrap().unwrap().verification_count,
        0
    );
}

#[test]
fn valid_key_increments_counter_and_logs_valid() {
    let (licenses, _tickets, audit, _dir) = open_stores();
    licenses
        .insert(&LicenseRecord::new("KEY-1", "Acme Corp", "ops@acme.test", "Enterprise"))
        .unwrap();
    let verifier = LicenseVerifier::new(licenses.clone(), audit.clone());

    let verified = verifier.verify("KEY-1", Some("203.0.113.9"), Some("curl/8.5")).unwrap();
    assert_eq!(verified.company_name, "Acme Corp");
    assert_eq!(verified.license_type, "Enterprise");
    assert_eq!(verified.verification_count, 1);

    let stored = licenses.find_by_key("KEY-1").unwrap().unwrap();
    assert_eq!(stored.verification_count, verified.verification_count);
    assert!(stored.last_verified.is_some());

    let entries = audit.entries_for_key("KEY-1").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result, VerificationResult::Valid);
}

#[test]
fn expired_key_is_rejected_without_increment() {
    let (licenses, _tickets, audit, _dir) = open_stores();
    licenses
        .insert(
            &LicenseRecord::new("KEY-1", "Acme Corp", "ops@acme.test", "Enterprise")
                .with_expiry(Utc::now() - Duration::days(1)),
        )
        .unwrap();
    let verifier = LicenseVerifier::new(licenses.clone(), audit.clone());

    let result = verifier.verify("KEY-1", None, None);
    assert!(matches!(result, Err(CoreError::Expired)));

    let entries = audit.entries_for_key("KEY-1").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result, VerificationResult::Expired);
    assert_eq!(
        licenses.find_by_key("KEY-1").unwrap().unwrap().verification_count,
        0
    );
}

#[test]
fn demo_and_expired_seed_scenario() {
    let (licenses, _tickets, audit, _dir) = open_stores();
    licenses
        .insert(
            &LicenseRecord::new("DEMO-1234-5678-9ABC", "Demo Corp", "demo@demo.test", "Enterprise")
                .with_expiry(Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap()),
        )
        .unwrap();
    licenses
        .insert(
            &LicenseRecord::new("EXPIRED-1111-2222-3333", "Old Corp", "old@old.test", "Basic")
                .with_expiry(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()),
        )
        .unwrap();
    let verifier = LicenseVerifier::new(licenses, audit);

    // Evaluated before the demo key's expiry date
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let verified = verifier
        .verify_at("DEMO-1234-5678-9ABC", None, None, now)
        .unwrap();
    assert_eq!(verified.verification_count, 1);

    let result = verifier.verify_at("EXPIRED-1111-2222-3333", None, None, now);
    assert!(matches!(result, Err(CoreError::Expired)));
}

#[test]
fn every_outcome_appends_exactly_one_entry() {
    let (licenses, _tickets, audit, _dir) = open_stores();
    licenses
        .insert(&LicenseRecord::new("GOOD", "Acme Corp", "ops@acme.test", "Enterprise"))
        .unwrap();
    licenses
        .insert(
            &LicenseRecord::new("OLD", "Old Corp", "old@old.test", "Basic")
                .with_expiry(Utc::now() - Duration::days(1)),
        )
        .unwrap();
    let verifier = LicenseVerifier::new(licenses, audit.clone());

    verifier.verify("GOOD", None, None).unwrap();
    let _ = verifier.verify("OLD", None, None);
    let _ = verifier.verify("MISSING", None, None);
    let _ = verifier.verify("", None, None);

    assert_eq!(audit.count().unwrap(), 3);
}

#[test]
fn concurrent_verifications_do_not_lose_updates() {
    const THREADS: usize = 8;
    const CALLS_PER_THREAD: usize = 5;

    let (licenses, _tickets, audit, _dir) = open_stores();
    licenses
        .insert(&LicenseRecord::new("HOT-KEY", "Acme Corp", "ops@acme.test", "Enterprise"))
        .unwrap();
    let verifier = LicenseVerifier::new(licenses.clone(), audit.clone());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let verifier = verifier.clone();
            std::thread::spawn(move || {
                for _ in 0..CALLS_PER_THREAD {
                    verifier.verify("HOT-KEY", None, None).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = (THREADS * CALLS_PER_THREAD) as u64;
    let stored = licenses.find_by_key("HOT-KEY").unwrap().unwrap();
    assert_eq!(stored.verification_count, total);
    assert_eq!(audit.count_for_key("HOT-KEY").unwrap(), total);
}

#[test]
fn company_verification_hit_and_miss() {
    let (licenses, _tickets, audit, _dir) = open_stores();
    licenses
        .insert(&LicenseRecord::new("KEY-1", "Acme Corp", "ops@acme.test", "Enterprise"))
        .unwrap();
    let verifier = LicenseVerifier::new(licenses.clone(), audit.clone());

    let verified = verifier.verify_company("acme", None, None).unwrap();
    assert_eq!(verified.company_name, "Acme Corp");
    assert_eq!(verified.verification_count, 1);
    assert_eq!(audit.count_for_key("KEY-1").unwrap(), 1);

    let result = verifier.verify_company("Globex", None, None);
    assert!(matches!(result, Err(CoreError::NotFound)));
    let entries = audit.entries_for_key("UNLICENSED").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result, VerificationResult::Unlicensed);
}

#[test]
fn company_verification_respects_expiry() {
    let (licenses, _tickets, audit, _dir) = open_stores();
    licenses
        .insert(
            &LicenseRecord::new("KEY-1", "Old Corp", "old@old.test", "Basic")
                .with_expiry(Utc::now() - Duration::days(1)),
        )
        .unwrap();
    let verifier = LicenseVerifier::new(licenses.clone(), audit.clone());

    let result = verifier.verify_company("Old Corp", None, None);
    assert!(matches!(result, Err(CoreError::Expired)));
    // Logged under the matched record's key, not the sentinel
    let entries = audit.entries_for_key("KEY-1").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result, VerificationResult::Expired);
}
