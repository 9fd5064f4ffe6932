//! Service-wide row counts.

use crate::error::CoreResult;
use licenseverify_store::{AuditLog, LicenseStore, TicketStore};
use licenseverify_types::Stats;

/// Aggregates counts across the three tables. Each count is a plain
/// point-in-time read; concurrent writers may land between them.
#[derive(Clone)]
pub struct StatsReporter {
    licenses: LicenseStore,
    tickets: TicketStore,
    audit: AuditLog,
}

impl StatsReporter {
    /// Creates a reporter over the given stores.
    #[must_use]
    pub fn new(licenses: LicenseStore, tickets: TicketStore, audit: AuditLog) -> Self {
        Self {
            licenses,
            tickets,
            audit,
        }
    }

    /// Returns the three totals.
    pub fn stats(&self) -> CoreResult<Stats> {
        Ok(Stats {
            total_licenses: self.licenses.count()?,
            total_support_requests: self.tickets.count()?,
            total_verifications: self.audit.count()?,
        })
    }
}
