//! Core type definitions for the LicenseVerify service.
//!
//! This crate defines the record types shared by the storage layer, the
//! verification core, and the HTTP façade:
//! - License, ticket, and log-entry identifiers (UUID v7)
//! - License records and verified-license summaries
//! - Support tickets and ticket priorities
//! - Verification log entries, results, and service-wide stats
//!
//! Nothing here touches the database; persistence lives in
//! `licenseverify-store`.

mod ids;
mod license;
mod ticket;
mod verification;

pub use ids::{LicenseId, LogEntryId, TicketId};
pub use license::{CompanyListing, LicenseRecord, VerifiedLicense, STATUS_ACTIVE};
pub use ticket::{NewTicket, SupportTicket, TicketPriority, TICKET_STATUS_OPEN};
pub use verification::{Stats, VerificationLogEntry, VerificationResult};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown value: {0}")]
    UnknownValue(String),
}
