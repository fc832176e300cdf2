//! Thread-safe dispatcher shared with the HTTP layer.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::error::DispatchError;
use super::pool::AttendantLoad;
use super::state::{DispatcherState, UpdateOutcome};
use super::types::{Ticket, TicketFilter, TicketPatch, TicketStatus, TicketType};
use crate::metrics::{
    ATTENDANT_WORKLOAD, AUTO_PROMOTIONS, CAPACITY_REJECTIONS, TICKETS_CREATED,
    TICKET_TRANSITIONS,
};

/// Owns every ticket and attendant workload.
///
/// Mutations hold the write lock for their whole check-then-act sequence, so
/// two updates targeting the same attendant can never both pass the capacity
/// check. Reads share the lock and always see a complete state.
#[derive(Debug, Default)]
pub struct Dispatcher {
    state: RwLock<DispatcherState>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ticket. It starts ACTIVE when the type's attendant has a free
    /// slot and QUEUED otherwise.
    pub fn create(
        &self,
        ticket_type: TicketType,
        description: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Result<Ticket, DispatchError> {
        let mut state = self.write();
        let ticket = state.create(
            ticket_type,
            description.into(),
            customer_id.into(),
            Utc::now(),
        )?;

        TICKETS_CREATED
            .with_label_values(&[ticket_type.as_str(), ticket.status.as_str()])
            .inc();
        record_workloads(&state);
        drop(state);

        info!(
            ticket_id = ticket.id,
            ticket_type = %ticket.ticket_type,
            status = %ticket.status,
            attendant_id = %ticket.attendant_id,
            "Service created"
        );
        Ok(ticket)
    }

    /// Apply a partial update; see [`DispatcherState::update`] for the rules.
    pub fn update(&self, id: u64, patch: TicketPatch) -> Result<Ticket, DispatchError> {
        let mut state = self.write();
        let result = state.update(id, patch, Utc::now());
        if result.is_ok() {
            record_workloads(&state);
        }
        drop(state);

        match result {
            Ok(outcome) => {
                log_outcome(&outcome);
                Ok(outcome.ticket)
            }
            Err(e) => {
                if let DispatchError::CapacityExceeded { attendant_id, .. } = &e {
                    CAPACITY_REJECTIONS
                        .with_label_values(&[&attendant_id.to_string()])
                        .inc();
                }
                warn!(ticket_id = id, error = %e, "Service update rejected");
                Err(e)
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<Ticket> {
        self.read().get(id).cloned()
    }

    /// All tickets, most recent first.
    pub fn list(&self) -> Vec<Ticket> {
        self.list_filtered(&TicketFilter::new())
    }

    pub fn list_by_status(&self, status: TicketStatus) -> Vec<Ticket> {
        self.list_filtered(&TicketFilter::new().with_status(status))
    }

    pub fn list_by_type(&self, ticket_type: TicketType) -> Vec<Ticket> {
        self.list_filtered(&TicketFilter::new().with_type(ticket_type))
    }

    pub fn list_by_status_and_type(
        &self,
        status: TicketStatus,
        ticket_type: TicketType,
    ) -> Vec<Ticket> {
        self.list_filtered(
            &TicketFilter::new()
                .with_status(status)
                .with_type(ticket_type),
        )
    }

    pub fn list_filtered(&self, filter: &TicketFilter) -> Vec<Ticket> {
        self.read().list(filter)
    }

    /// The ticket that would be promoted next for this type. Does not modify it.
    pub fn peek_next(&self, ticket_type: TicketType) -> Option<Ticket> {
        self.read().peek_next(ticket_type).cloned()
    }

    /// Current load of every attendant.
    pub fn workloads(&self) -> Vec<AttendantLoad> {
        self.read().workloads()
    }

    /// Ticket count per status, taken from a single snapshot.
    pub fn status_counts(&self) -> Vec<(TicketStatus, usize)> {
        self.read().status_counts()
    }

    // A panic while holding the lock cannot leave a half-applied update
    // behind, since updates validate before writing.
    fn read(&self) -> RwLockReadGuard<'_, DispatcherState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DispatcherState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn record_workloads(state: &DispatcherState) {
    for load in state.workloads() {
        ATTENDANT_WORKLOAD
            .with_label_values(&[&load.attendant_id.to_string()])
            .set(load.active as i64);
    }
}

fn log_outcome(outcome: &UpdateOutcome) {
    let ticket = &outcome.ticket;
    if outcome.previous_status != ticket.status {
        TICKET_TRANSITIONS
            .with_label_values(&[outcome.previous_status.as_str(), ticket.status.as_str()])
            .inc();
        info!(
            ticket_id = ticket.id,
            from = %outcome.previous_status,
            to = %ticket.status,
            attendant_id = %ticket.attendant_id,
            "Service status changed"
        );
    } else {
        debug!(ticket_id = ticket.id, "Service updated");
    }

    if let Some(promoted) = &outcome.promoted {
        TICKET_TRANSITIONS
            .with_label_values(&[TicketStatus::Queued.as_str(), TicketStatus::Active.as_str()])
            .inc();
        AUTO_PROMOTIONS
            .with_label_values(&[promoted.ticket_type.as_str()])
            .inc();
        info!(
            ticket_id = promoted.id,
            ticket_type = %promoted.ticket_type,
            attendant_id = %promoted.attendant_id,
            freed_by = ticket.id,
            "Queued service promoted"
        );
    }
}
