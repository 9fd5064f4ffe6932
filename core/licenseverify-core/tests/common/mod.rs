use licenseverify_store::{AuditLog, LicenseStore, Pool, TicketStore};
use tempfile::TempDir;

/// Opens a fresh on-disk database and returns the three stores over one
/// pool. The `TempDir` must be kept alive for the duration of the test.
pub fn open_stores() -> (LicenseStore, TicketStore, AuditLog, TempDir) {
    let dir = TempDir::new().unwrap();
    let pool = Pool::open(dir.path().join("licenses.db"), 4).unwrap();
    (
        LicenseStore::new(pool.clone()),
        TicketStore::new(pool.clone()),
        AuditLog::new(pool),
        dir,
    )
}
