//! Verification core for the LicenseVerify service.
//!
//! This crate holds the three request-facing components, each injected
//! with the stores it reads and appends to:
//! - [`LicenseVerifier`]: decides whether a key (or company) is
//!   currently licensed, updates usage counters, and logs every attempt
//! - [`SupportIntake`]: validates and persists support tickets
//! - [`StatsReporter`]: counts rows across the three tables
//!
//! # Design Principles
//!
//! - **One log entry per attempt**: every verification with a non-empty
//!   key appends exactly one audit entry, whatever the outcome; only
//!   input-validation failures write nothing
//! - **No partial success**: the counter increment and the success-path
//!   audit entry commit together or not at all
//! - **Telemetry never masks the decision**: a failed audit append on a
//!   failure path is logged and swallowed, not surfaced to the caller

mod error;
mod stats;
mod support;
mod verifier;

pub use error::{CoreError, CoreResult};
pub use stats::StatsReporter;
pub use support::SupportIntake;
pub use verifier::LicenseVerifier;
