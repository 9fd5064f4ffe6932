//! Verification audit log types and service-wide stats.

use crate::ids::LogEntryId;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a single verification attempt, as recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationResult {
    /// Key matched an active, unexpired license.
    Valid,
    /// Key unknown, or known but not active.
    Invalid,
    /// Key matched an active license past its expiry.
    Expired,
    /// Company-name lookup found no active license.
    Unlicensed,
}

impl VerificationResult {
    /// Returns the canonical lowercase string for this result.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
            Self::Unlicensed => "unlicensed",
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationResult {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(Self::Valid),
            "invalid" => Ok(Self::Invalid),
            "expired" => Ok(Self::Expired),
            "unlicensed" => Ok(Self::Unlicensed),
            other => Err(Error::UnknownValue(format!("verification result: {other}"))),
        }
    }
}

/// One append-only audit log row. Entries are never updated or deleted,
/// and the key they reference is not required to exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationLogEntry {
    /// Entry identifier.
    pub id: LogEntryId,
    /// The license key the caller presented (verbatim).
    pub license_key: String,
    /// Caller IP, when the transport provides one.
    pub ip_address: Option<String>,
    /// Caller user-agent string, when supplied.
    pub user_agent: Option<String>,
    /// Outcome of the attempt.
    pub result: VerificationResult,
    /// When the attempt happened.
    pub timestamp: DateTime<Utc>,
}

impl VerificationLogEntry {
    /// Creates a log entry for an attempt observed at `now`.
    #[must_use]
    pub fn new(
        license_key: impl Into<String>,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        result: VerificationResult,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LogEntryId::new(),
            license_key: license_key.into(),
            ip_address: ip_address.map(str::to_string),
            user_agent: user_agent.map(str::to_string),
            result,
            timestamp: now,
        }
    }
}

/// Plain row counts across the three tables. Reads are point-in-time,
/// with no snapshot isolation against concurrent writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of license records, regardless of status.
    pub total_licenses: u64,
    /// Number of support tickets ever submitted.
    pub total_support_requests: u64,
    /// Number of audit log entries.
    pub total_verifications: u64,
}
