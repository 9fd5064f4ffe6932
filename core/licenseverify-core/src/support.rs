//! Support ticket intake.

use crate::error::{CoreError, CoreResult};
use chrono::Utc;
use licenseverify_store::TicketStore;
use licenseverify_types::{NewTicket, SupportTicket, TicketId};
use tracing::info;

/// Validates and persists support ticket submissions.
#[derive(Clone)]
pub struct SupportIntake {
    tickets: TicketStore,
}

impl SupportIntake {
    /// Creates an intake over the given store.
    #[must_use]
    pub fn new(tickets: TicketStore) -> Self {
        Self { tickets }
    }

    /// Validates a submission and persists it as an open ticket,
    /// returning the new ticket's ID. Resubmission creates a new ticket;
    /// there is no deduplication.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] naming the first empty required field
    /// - [`CoreError::Storage`] if the insert fails
    pub fn submit(&self, ticket: NewTicket) -> CoreResult<TicketId> {
        // Checked in a fixed order; the first missing field is the one
        // reported.
        let required = [
            ("company_name", &ticket.company_name),
            ("contact_name", &ticket.contact_name),
            ("contact_email", &ticket.contact_email),
            ("issue_description", &ticket.issue_description),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "required field missing: {field}"
                )));
            }
        }

        let ticket = SupportTicket::from_submission(ticket, Utc::now());
        let id = ticket.id;
        self.tickets.insert(&ticket)?;
        info!(ticket_id = %id, priority = %ticket.priority, "support ticket submitted");
        Ok(id)
    }
}
