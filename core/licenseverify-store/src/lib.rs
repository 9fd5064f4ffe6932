//! SQLite storage layer for LicenseVerify.
//!
//! Provides persistent storage for license records, support tickets, and
//! the append-only verification audit log.
//!
//! # Architecture
//!
//! - A bounded [`Pool`] of SQLite connections (WAL journal mode) is the
//!   single shared resource; every store checks a connection out for the
//!   duration of one logical operation and returns it on drop.
//! - [`LicenseStore`] owns license rows and the read-then-increment
//!   sequence of a successful verification, which commits together with
//!   its audit entry in one immediate transaction.
//! - [`AuditLog`] appends are independent single-row inserts.
//! - Schema creation is idempotent and happens when the pool opens.

mod audit_log;
mod error;
mod license_store;
mod pool;
mod schema;
mod ticket_store;

pub use audit_log::AuditLog;
pub use error::{StoreError, StoreResult};
pub use license_store::LicenseStore;
pub use pool::{Pool, PooledConnection};
pub use ticket_store::TicketStore;
