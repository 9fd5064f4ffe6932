//! License verification.
//!
//! Outcomes for a non-empty key are mutually exclusive and exhaustive:
//! not found (which conflates unknown and inactive keys), expired, or
//! valid. Every such attempt appends exactly one audit entry; an empty
//! key fails validation before anything is written.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use licenseverify_store::{AuditLog, LicenseStore};
use licenseverify_types::{VerificationLogEntry, VerificationResult, VerifiedLicense};
use tracing::{debug, warn};

/// Audit-log key recorded when a company-name lookup finds no license.
const UNLICENSED_KEY: &str = "UNLICENSED";

/// Decides license validity and records every attempt.
#[derive(Clone)]
pub struct LicenseVerifier {
    licenses: LicenseStore,
    audit: AuditLog,
}

impl LicenseVerifier {
    /// Creates a verifier over the given stores.
    #[must_use]
    pub fn new(licenses: LicenseStore, audit: AuditLog) -> Self {
        Self { licenses, audit }
    }

    /// Verifies a license key against the current wall clock.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] if the key is empty (nothing logged)
    /// - [`CoreError::NotFound`] if no active record matches
    /// - [`CoreError::Expired`] if the record's expiry has passed
    /// - [`CoreError::Storage`] if the success-path transaction fails
    pub fn verify(
        &self,
        license_key: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> CoreResult<VerifiedLicense> {
        self.verify_at(license_key, ip_address, user_agent, Utc::now())
    }

    /// Verifies a license key against an explicit evaluation instant.
    pub fn verify_at(
        &self,
        license_key: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        now: DateTime<Utc>,
    ) -> CoreResult<VerifiedLicense> {
        if license_key.is_empty() {
            return Err(CoreError::Validation("license key is required".to_string()));
        }

        let Some(record) = self.licenses.find_active_by_key(license_key)? else {
            debug!(license_key, "verification miss");
            self.log_attempt(license_key, ip_address, user_agent, VerificationResult::Invalid, now);
            return Err(CoreError::NotFound);
        };

        // Expiry is checked before the increment; expired keys never
        // bump the counter.
        if record.is_expired_at(now) {
            debug!(license_key, "verification of expired license");
            self.log_attempt(license_key, ip_address, user_agent, VerificationResult::Expired, now);
            return Err(CoreError::Expired);
        }

        let entry = VerificationLogEntry::new(
            license_key,
            ip_address,
            user_agent,
            VerificationResult::Valid,
            now,
        );
        let verification_count = self.licenses.record_verification(record.id, &entry, now)?;
        debug!(license_key, verification_count, "license verified");

        Ok(VerifiedLicense {
            company_name: record.company_name,
            license_type: record.license_type,
            expires_at: record.expires_at,
            verification_count,
        })
    }

    /// Verifies that a company holds an active license, by
    /// case-insensitive substring match on the company name.
    ///
    /// A miss is logged under the sentinel key `UNLICENSED` with result
    /// `unlicensed`; hits behave exactly like [`Self::verify`], logged
    /// under the matched record's key.
    pub fn verify_company(
        &self,
        company_name: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> CoreResult<VerifiedLicense> {
        self.verify_company_at(company_name, ip_address, user_agent, Utc::now())
    }

    /// Company verification against an explicit evaluation instant.
    pub fn verify_company_at(
        &self,
        company_name: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        now: DateTime<Utc>,
    ) -> CoreResult<VerifiedLicense> {
        if company_name.is_empty() {
            return Err(CoreError::Validation("company name is required".to_string()));
        }

        let Some(record) = self.licenses.find_active_by_company(company_name)? else {
            debug!(company_name, "company verification miss");
            self.log_attempt(
                UNLICENSED_KEY,
                ip_address,
                user_agent,
                VerificationResult::Unlicensed,
                now,
            );
            return Err(CoreError::NotFound);
        };

        if record.is_expired_at(now) {
            debug!(company_name, "company license expired");
            self.log_attempt(
                &record.license_key,
                ip_address,
                user_agent,
                VerificationResult::Expired,
                now,
            );
            return Err(CoreError::Expired);
        }

        let entry = VerificationLogEntry::new(
            &record.license_key,
            ip_address,
            user_agent,
            VerificationResult::Valid,
            now,
        );
        let verification_count = self.licenses.record_verification(record.id, &entry, now)?;

        Ok(VerifiedLicense {
            company_name: record.company_name,
            license_type: record.license_type,
            expires_at: record.expires_at,
            verification_count,
        })
    }

    /// Best-effort audit append for failure paths. The verification
    /// outcome is already decided; an append error must not change it.
    fn log_attempt(
        &self,
        license_key: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        result: VerificationResult,
        now: DateTime<Utc>,
    ) {
        let entry = VerificationLogEntry::new(license_key, ip_address, user_agent, result, now);
        if let Err(err) = self.audit.append(&entry) {
            warn!(%err, license_key, "failed to record verification attempt");
        }
    }
}
