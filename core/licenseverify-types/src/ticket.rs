//! Support ticket types.

use crate::ids::TicketId;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The status a freshly submitted ticket carries. Assignment and closure
/// are administrative actions outside this service.
pub const TICKET_STATUS_OPEN: &str = "open";

/// Ticket priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    /// Low priority.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// High priority.
    High,
    /// Critical priority.
    Critical,
}

impl TicketPriority {
    /// Returns the canonical lowercase string for this priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(Error::UnknownValue(format!("ticket priority: {other}"))),
        }
    }
}

/// Fields supplied by a caller submitting a support request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    /// Company the request is for. Required.
    pub company_name: String,
    /// Name of the person submitting. Required.
    pub contact_name: String,
    /// Email of the person submitting. Required.
    pub contact_email: String,
    /// Optional contact phone.
    #[serde(default)]
    pub contact_phone: Option<String>,
    /// Description of the issue. Required.
    pub issue_description: String,
    /// Optional priority, defaulting to medium.
    #[serde(default)]
    pub priority: Option<TicketPriority>,
}

/// A persisted support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    /// Ticket identifier.
    pub id: TicketId,
    /// Company the ticket is for.
    pub company_name: String,
    /// Name of the submitter.
    pub contact_name: String,
    /// Email of the submitter.
    pub contact_email: String,
    /// Contact phone; empty string when not supplied.
    pub contact_phone: String,
    /// Description of the issue.
    pub issue_description: String,
    /// Ticket priority.
    pub priority: TicketPriority,
    /// Ticket status; starts `"open"`, mutated only by external tooling.
    pub status: String,
    /// When the ticket was submitted.
    pub created_at: DateTime<Utc>,
    /// Assignee, set by external tooling.
    pub assigned_to: Option<String>,
    /// Free-form notes, set by external tooling.
    pub notes: Option<String>,
}

impl SupportTicket {
    /// Builds an open ticket from a validated submission, filling in the
    /// phone and priority defaults.
    #[must_use]
    pub fn from_submission(ticket: NewTicket, now: DateTime<Utc>) -> Self {
        Self {
            id: TicketId::new(),
            company_name: ticket.company_name,
            contact_name: ticket.contact_name,
            contact_email: ticket.contact_email,
            contact_phone: ticket.contact_phone.unwrap_or_default(),
            issue_description: ticket.issue_description,
            priority: ticket.priority.unwrap_or_default(),
            status: TICKET_STATUS_OPEN.to_string(),
            created_at: now,
            assigned_to: None,
            notes: None,
        }
    }
}
