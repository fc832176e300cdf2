//! Service dispatcher: typed queues, capacity-bounded attendants and
//! automatic promotion of queued tickets.

mod error;
mod pool;
mod service;
mod state;
mod types;

pub use error::DispatchError;
pub use pool::{AttendantLoad, ATTENDANT_CAPACITY};
pub use service::Dispatcher;
pub use state::{DispatcherState, UpdateOutcome};
pub use types::{
    AttendantId, ParseEnumError, Ticket, TicketFilter, TicketPatch, TicketStatus, TicketType,
};
