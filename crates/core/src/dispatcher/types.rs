//! Core ticket data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a type or status name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

// ============================================================================
// Ticket Type
// ============================================================================

/// Kind of work a ticket represents. Each type has its own queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    /// Card problems (blocked card, limits, ...).
    Card,
    /// Loan requests.
    Loan,
    /// Anything else.
    Other,
}

impl TicketType {
    /// All ticket types, in attendant pool order.
    pub const ALL: [TicketType; 3] = [TicketType::Card, TicketType::Loan, TicketType::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Card => "CARD",
            TicketType::Loan => "LOAN",
            TicketType::Other => "OTHER",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CARD" => Ok(TicketType::Card),
            "LOAN" => Ok(TicketType::Loan),
            "OTHER" => Ok(TicketType::Other),
            _ => Err(ParseEnumError {
                kind: "type",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Ticket Status
// ============================================================================

/// Ticket lifecycle status.
///
/// ```text
/// QUEUED --(slot available)--> ACTIVE --> RESOLVED
///    ^                           |
///    +-------(demotion)----------+
/// ```
///
/// The legacy names `PEDING`/`PENDING` and `IN_PROGRESS` are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Waiting for a free attendant slot.
    #[serde(alias = "PEDING", alias = "PENDING")]
    Queued,
    /// Being handled by an attendant; occupies one of its slots.
    #[serde(alias = "IN_PROGRESS")]
    Active,
    /// Done. Terminal.
    Resolved,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Queued,
        TicketStatus::Active,
        TicketStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Queued => "QUEUED",
            TicketStatus::Active => "ACTIVE",
            TicketStatus::Resolved => "RESOLVED",
        }
    }

    /// Returns true if no further transition is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Resolved)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QUEUED" | "PEDING" | "PENDING" => Ok(TicketStatus::Queued),
            "ACTIVE" | "IN_PROGRESS" => Ok(TicketStatus::Active),
            "RESOLVED" => Ok(TicketStatus::Resolved),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Attendant
// ============================================================================

/// Identifier of an attendant (worker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendantId(pub u32);

impl fmt::Display for AttendantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ticket
// ============================================================================

/// A unit of customer work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique, monotonically increasing identifier.
    pub id: u64,
    /// Queue the ticket belongs to.
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub status: TicketStatus,
    /// Free text describing the request.
    pub description: String,
    /// Opaque external customer identifier.
    pub customer_id: String,
    /// Attendant currently or previously responsible.
    pub attendant_id: AttendantId,
    pub created_at: DateTime<Utc>,
    /// Set when the ticket becomes ACTIVE.
    pub start_date: Option<DateTime<Utc>>,
    /// Set when the ticket becomes RESOLVED.
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update of a ticket. Unset fields keep their current value.
///
/// `id`, `ticket_type`, `customer_id` and `created_at` cannot be patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPatch {
    pub status: Option<TicketStatus>,
    pub description: Option<String>,
    pub attendant_id: Option<AttendantId>,
}

impl TicketPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_attendant(mut self, attendant_id: AttendantId) -> Self {
        self.attendant_id = Some(attendant_id);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.description.is_none() && self.attendant_id.is_none()
    }
}

/// Filter for listing tickets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub ticket_type: Option<TicketType>,
}

impl TicketFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status.
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by ticket type.
    pub fn with_type(mut self, ticket_type: TicketType) -> Self {
        self.ticket_type = Some(ticket_type);
        self
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.status.is_none_or(|s| s == ticket.status)
            && self.ticket_type.is_none_or(|t| t == ticket.ticket_type)
    }
}
