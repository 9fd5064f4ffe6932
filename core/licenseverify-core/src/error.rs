//! Error taxonomy for the verification core.
//!
//! Maps directly onto the HTTP façade's status codes: `Validation` is
//! 400, `NotFound` 404, `Expired` 403, `Storage` 500.

use licenseverify_store::StoreError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by the verification core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller input malformed or missing.
    #[error("{0}")]
    Validation(String),

    /// Key unknown, or known but not active. The two cases are
    /// deliberately indistinguishable to callers.
    #[error("invalid or expired license key")]
    NotFound,

    /// Key recognized but past its expiry.
    #[error("license has expired")]
    Expired,

    /// Persistence-layer failure. Detail stays server-side.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
