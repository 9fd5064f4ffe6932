//! License record persistence.

use crate::audit_log;
use crate::error::{StoreError, StoreResult};
use crate::pool::Pool;
use chrono::{DateTime, Utc};
use licenseverify_types::{
    CompanyListing, LicenseId, LicenseRecord, VerificationLogEntry, STATUS_ACTIVE,
};
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

const LICENSE_COLUMNS: &str = "id, license_key, company_name, contact_email, contact_phone, \
     license_type, status, created_at, expires_at, last_verified, verification_count";

/// Store for the `licenses` table.
#[derive(Clone)]
pub struct LicenseStore {
    pool: Pool,
}

impl LicenseStore {
    /// Creates a store over the given pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Inserts a license record.
    ///
    /// # Errors
    ///
    /// Fails with a database error if the license key already exists
    /// (unique constraint).
    pub fn insert(&self, record: &LicenseRecord) -> StoreResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO licenses (id, license_key, company_name, contact_email, contact_phone,
                 license_type, status, created_at, expires_at, last_verified, verification_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.id.to_string(),
                record.license_key,
                record.company_name,
                record.contact_email,
                record.contact_phone,
                record.license_type,
                record.status,
                record.created_at,
                record.expires_at,
                record.last_verified,
                record.verification_count as i64,
            ],
        )?;
        Ok(())
    }

    /// Looks up a license by exact key, regardless of status.
    pub fn find_by_key(&self, license_key: &str) -> StoreResult<Option<LicenseRecord>> {
        let conn = self.pool.get()?;
        let record = conn
            .query_row(
                &format!("SELECT {LICENSE_COLUMNS} FROM licenses WHERE license_key = ?1"),
                params![license_key],
                map_license_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Looks up a license by exact key with status `"active"`. Inactive
    /// records are indistinguishable from absent ones here.
    pub fn find_active_by_key(&self, license_key: &str) -> StoreResult<Option<LicenseRecord>> {
        let conn = self.pool.get()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {LICENSE_COLUMNS} FROM licenses
                     WHERE license_key = ?1 AND status = ?2"
                ),
                params![license_key, STATUS_ACTIVE],
                map_license_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Looks up an active license whose company name contains
    /// `company_name` (case-insensitive substring match).
    pub fn find_active_by_company(&self, company_name: &str) -> StoreResult<Option<LicenseRecord>> {
        let conn = self.pool.get()?;
        let pattern = format!("%{company_name}%");
        let record = conn
            .query_row(
                &format!(
                    "SELECT {LICENSE_COLUMNS} FROM licenses
                     WHERE company_name LIKE ?1 AND status = ?2"
                ),
                params![pattern, STATUS_ACTIVE],
                map_license_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Returns the directory of active licenses, ordered by company name.
    pub fn list_active(&self) -> StoreResult<Vec<CompanyListing>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT company_name, license_type, status, expires_at, verification_count
             FROM licenses WHERE status = ?1 ORDER BY company_name",
        )?;
        let rows = stmt.query_map(params![STATUS_ACTIVE], |row| {
            Ok(CompanyListing {
                company_name: row.get(0)?,
                license_type: row.get(1)?,
                status: row.get(2)?,
                expires_at: row.get(3)?,
                verification_count: row.get::<_, i64>(4)? as u64,
            })
        })?;
        let mut listings = Vec::new();
        for row in rows {
            listings.push(row?);
        }
        Ok(listings)
    }

    /// Records a successful verification: increments the verification
    /// counter, stamps `last_verified`, and appends the audit entry, all
    /// in one immediate transaction. Returns the post-increment counter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the license row vanished
    /// between lookup and update.
    pub fn record_verification(
        &self,
        id: LicenseId,
        entry: &VerificationLogEntry,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let updated = tx.execute(
            "UPDATE licenses
             SET verification_count = verification_count + 1, last_verified = ?2
             WHERE id = ?1",
            params![id.to_string(), now],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("license {id}")));
        }

        audit_log::insert_entry(&tx, entry)?;

        let count: i64 = tx.query_row(
            "SELECT verification_count FROM licenses WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(count as u64)
    }

    /// Counts all license records, regardless of status.
    pub fn count(&self) -> StoreResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM licenses", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn map_license_row(row: &Row<'_>) -> rusqlite::Result<LicenseRecord> {
    let id: String = row.get(0)?;
    let id = LicenseId::parse(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(LicenseRecord {
        id,
        license_key: row.get(1)?,
        company_name: row.get(2)?,
        contact_email: row.get(3)?,
        contact_phone: row.get(4)?,
        license_type: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
        expires_at: row.get(8)?,
        last_verified: row.get(9)?,
        verification_count: row.get::<_, i64>(10)? as u64,
    })
}
