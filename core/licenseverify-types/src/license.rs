//! License record types.
//!
//! A license record ties an opaque license key to the company that holds
//! it. The `status` column is a free-form string rather than an enum so
//! that administrative tooling can introduce new states without a
//! migration; only the literal `"active"` gates verification.

use crate::ids::LicenseId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The status value that makes a license eligible for verification.
pub const STATUS_ACTIVE: &str = "active";

/// A stored license record.
///
/// Invariants: `license_key` is globally unique, `verification_count`
/// only ever increases. `status` and `expires_at` are independent
/// signals; both must pass for a key to verify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Record identifier.
    pub id: LicenseId,
    /// The opaque license key presented by callers.
    pub license_key: String,
    /// Company holding the license.
    pub company_name: String,
    /// Contact email for the license holder.
    pub contact_email: String,
    /// Optional contact phone.
    pub contact_phone: Option<String>,
    /// Free-form license tier, e.g. "Enterprise".
    pub license_type: String,
    /// Record status; only `"active"` records verify.
    pub status: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Optional expiration instant; `None` means the license never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the key last verified successfully, if ever.
    pub last_verified: Option<DateTime<Utc>>,
    /// Number of successful verifications.
    pub verification_count: u64,
}

impl LicenseRecord {
    /// Creates a new active license record with a fresh ID and zeroed
    /// verification state.
    #[must_use]
    pub fn new(
        license_key: impl Into<String>,
        company_name: impl Into<String>,
        contact_email: impl Into<String>,
        license_type: impl Into<String>,
    ) -> Self {
        Self {
            id: LicenseId::new(),
            license_key: license_key.into(),
            company_name: company_name.into(),
            contact_email: contact_email.into(),
            contact_phone: None,
            license_type: license_type.into(),
            status: STATUS_ACTIVE.to_string(),
            created_at: Utc::now(),
            expires_at: None,
            last_verified: None,
            verification_count: 0,
        }
    }

    /// Sets the expiration instant.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets the record status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the contact phone.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.contact_phone = Some(phone.into());
        self
    }

    /// Returns true if the record carries an expiry strictly before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires) if expires < now)
    }
}

/// Summary returned to a caller whose key verified successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedLicense {
    /// Company holding the license.
    pub company_name: String,
    /// Free-form license tier.
    pub license_type: String,
    /// Expiration instant, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Verification counter after this call's increment.
    pub verification_count: u64,
}

/// One row of the licensed-company directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyListing {
    /// Company holding the license.
    pub company_name: String,
    /// Free-form license tier.
    pub license_type: String,
    /// Record status.
    pub status: String,
    /// Expiration instant, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Number of successful verifications.
    pub verification_count: u64,
}
