//! Support ticket persistence.

use crate::error::StoreResult;
use crate::pool::Pool;
use licenseverify_types::{SupportTicket, TicketId, TicketPriority};
use rusqlite::{params, OptionalExtension};
use std::str::FromStr;

/// Store for the `support_requests` table.
#[derive(Clone)]
pub struct TicketStore {
    pool: Pool,
}

impl TicketStore {
    /// Creates a store over the given pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Inserts a ticket.
    pub fn insert(&self, ticket: &SupportTicket) -> StoreResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO support_requests (id, company_name, contact_name, contact_email,
                 contact_phone, issue_description, priority, status, created_at,
                 assigned_to, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                ticket.id.to_string(),
                ticket.company_name,
                ticket.contact_name,
                ticket.contact_email,
                ticket.contact_phone,
                ticket.issue_description,
                ticket.priority.as_str(),
                ticket.status,
                ticket.created_at,
                ticket.assigned_to,
                ticket.notes,
            ],
        )?;
        Ok(())
    }

    /// Looks up a ticket by ID.
    pub fn get(&self, id: TicketId) -> StoreResult<Option<SupportTicket>> {
        let conn = self.pool.get()?;
        let ticket = conn
            .query_row(
                "SELECT id, company_name, contact_name, contact_email, contact_phone,
                     issue_description, priority, status, created_at, assigned_to, notes
                 FROM support_requests WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    let id: String = row.get(0)?;
                    let id = TicketId::parse(&id).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            0,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                    let priority: String = row.get(6)?;
                    let priority = TicketPriority::from_str(&priority).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            6,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                    Ok(SupportTicket {
                        id,
                        company_name: row.get(1)?,
                        contact_name: row.get(2)?,
                        contact_email: row.get(3)?,
                        contact_phone: row.get(4)?,
                        issue_description: row.get(5)?,
                        priority,
                        status: row.get(7)?,
                        created_at: row.get(8)?,
                        assigned_to: row.get(9)?,
                        notes: row.get(10)?,
                    })
                },
            )
            .optional()?;
        Ok(ticket)
    }

    /// Counts all tickets.
    pub fn count(&self) -> StoreResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM support_requests", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
