use thiserror::Error;

use super::types::{AttendantId, TicketStatus};

/// Error type for dispatcher operations.
///
/// Every variant is reported before any state is touched, so a failed
/// operation leaves all tickets and workloads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No ticket with this id.
    #[error("Service not found: {0}")]
    NotFound(u64),

    /// Target attendant already holds the maximum number of ACTIVE tickets.
    #[error(
        "Attendant {attendant_id} already has {current} services in progress (max: {max})"
    )]
    CapacityExceeded {
        attendant_id: AttendantId,
        current: usize,
        max: usize,
    },

    /// Blank field or unknown attendant.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Change requested on a ticket whose status does not allow it.
    #[error("Service {ticket_id} is {status} and cannot be changed")]
    InvalidTransition {
        ticket_id: u64,
        status: TicketStatus,
    },
}
