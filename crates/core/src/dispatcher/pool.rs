//! Fixed attendant pool: one attendant per ticket type.

use serde::Serialize;

use super::types::{AttendantId, TicketType};

/// Maximum number of ACTIVE tickets an attendant can hold at once.
pub const ATTENDANT_CAPACITY: usize = 3;

impl TicketType {
    /// Attendant responsible for this ticket type.
    pub fn attendant(&self) -> AttendantId {
        match self {
            TicketType::Card => AttendantId(1),
            TicketType::Loan => AttendantId(2),
            TicketType::Other => AttendantId(3),
        }
    }
}

impl AttendantId {
    /// Ticket type whose queue this attendant serves, if it belongs to the pool.
    pub fn served_type(&self) -> Option<TicketType> {
        TicketType::ALL
            .into_iter()
            .find(|t| t.attendant() == *self)
    }

    pub fn is_known(&self) -> bool {
        self.served_type().is_some()
    }
}

/// Current load of one attendant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendantLoad {
    pub attendant_id: AttendantId,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub active: usize,
    pub capacity: usize,
}

impl AttendantLoad {
    pub fn is_full(&self) -> bool {
        self.active >= self.capacity
    }
}
