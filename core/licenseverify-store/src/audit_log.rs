//! Append-only verification audit log.

use crate::error::StoreResult;
use crate::pool::Pool;
use licenseverify_types::{LogEntryId, VerificationLogEntry, VerificationResult};
use rusqlite::{params, Connection};
use std::str::FromStr;

/// Store for the `verification_logs` table. Append-only: no update or
/// delete API exists.
#[derive(Clone)]
pub struct AuditLog {
    pool: Pool,
}

impl AuditLog {
    /// Creates an audit log over the given pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Appends one entry as an independent insert.
    pub fn append(&self, entry: &VerificationLogEntry) -> StoreResult<()> {
        let conn = self.pool.get()?;
        insert_entry(&conn, entry)?;
        Ok(())
    }

    /// Counts all entries.
    pub fn count(&self) -> StoreResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM verification_logs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Counts entries recorded for one license key.
    pub fn count_for_key(&self, license_key: &str) -> StoreResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM verification_logs WHERE license_key = ?1",
            params![license_key],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Returns all entries recorded for one license key, oldest first.
    pub fn entries_for_key(&self, license_key: &str) -> StoreResult<Vec<VerificationLogEntry>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, license_key, ip_address, user_agent, verification_result, timestamp
             FROM verification_logs WHERE license_key = ?1 ORDER BY timestamp",
        )?;
        let rows = stmt.query_map(params![license_key], |row| {
            let id: String = row.get(0)?;
            let id = LogEntryId::parse(&id).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            let result: String = row.get(4)?;
            let result = VerificationResult::from_str(&result).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(VerificationLogEntry {
                id,
                license_key: row.get(1)?,
                ip_address: row.get(2)?,
                user_agent: row.get(3)?,
                result,
                timestamp: row.get(5)?,
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

/// Inserts one entry on an existing connection or transaction. Shared
/// with `LicenseStore::record_verification` so the success-path append
/// can join the counter-increment transaction.
pub(crate) fn insert_entry(
    conn: &Connection,
    entry: &VerificationLogEntry,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO verification_logs
             (id, license_key, ip_address, user_agent, verification_result, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.id.to_string(),
            entry.license_key,
            entry.ip_address,
            entry.user_agent,
            entry.result.as_str(),
            entry.timestamp,
        ],
    )?;
    Ok(())
}
