//! In-memory dispatcher state and transition logic.
//!
//! Tickets are stored in creation order, which is also ascending id order.
//! Per-attendant workloads are kept incrementally alongside every mutation
//! and always equal the number of ACTIVE tickets held by that attendant.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::error::DispatchError;
use super::pool::{AttendantLoad, ATTENDANT_CAPACITY};
use super::types::{AttendantId, Ticket, TicketFilter, TicketPatch, TicketStatus, TicketType};

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    /// The updated ticket.
    pub ticket: Ticket,
    /// Status before the update.
    pub previous_status: TicketStatus,
    /// Queued ticket promoted into the slot this update freed, if any.
    pub promoted: Option<Ticket>,
}

#[derive(Debug, Default)]
pub struct DispatcherState {
    tickets: Vec<Ticket>,
    workload: HashMap<AttendantId, usize>,
}

impl DispatcherState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a new ticket, ACTIVE if its attendant has a free slot, QUEUED otherwise.
    pub fn create(
        &mut self,
        ticket_type: TicketType,
        description: String,
        customer_id: String,
        now: DateTime<Utc>,
    ) -> Result<Ticket, DispatchError> {
        require_text("description", &description)?;
        require_text("customerId", &customer_id)?;

        let attendant_id = ticket_type.attendant();
        let status = if self.workload(attendant_id) < ATTENDANT_CAPACITY {
            TicketStatus::Active
        } else {
            TicketStatus::Queued
        };

        let ticket = Ticket {
            id: self.next_id(),
            ticket_type,
            status,
            description,
            customer_id,
            attendant_id,
            created_at: now,
            start_date: (status == TicketStatus::Active).then_some(now),
            end_date: None,
        };

        if status == TicketStatus::Active {
            self.occupy(attendant_id);
        }
        self.tickets.push(ticket.clone());
        debug_assert!(self.workloads_consistent());

        Ok(ticket)
    }

    /// Apply a patch to a ticket.
    ///
    /// All validation happens before the first write: on error nothing changes.
    pub fn update(
        &mut self,
        id: u64,
        patch: TicketPatch,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, DispatchError> {
        let index = self.index_of(id).ok_or(DispatchError::NotFound(id))?;
        let current = &self.tickets[index];
        let current_status = current.status;
        let current_attendant = current.attendant_id;
        let new_status = patch.status.unwrap_or(current_status);
        let new_attendant = patch.attendant_id.unwrap_or(current_attendant);

        if let Some(description) = &patch.description {
            require_text("description", description)?;
        }
        if !new_attendant.is_known() {
            return Err(DispatchError::InvalidArgument(format!(
                "unknown attendant {}",
                new_attendant
            )));
        }
        if current_status.is_terminal()
            && (new_status != current_status || new_attendant != current_attendant)
        {
            return Err(DispatchError::InvalidTransition {
                ticket_id: id,
                status: current_status,
            });
        }

        if new_status == TicketStatus::Active {
            let already_counted =
                current_status == TicketStatus::Active && current_attendant == new_attendant;
            let current_load = self.workload(new_attendant);
            if !already_counted && current_load >= ATTENDANT_CAPACITY {
                return Err(DispatchError::CapacityExceeded {
                    attendant_id: new_attendant,
                    current: current_load,
                    max: ATTENDANT_CAPACITY,
                });
            }
        }

        let was_active = current_status == TicketStatus::Active;
        let resolving = new_status == TicketStatus::Resolved && current_status != new_status;
        let releases_slot = resolving
            || (was_active
                && (new_status != TicketStatus::Active || new_attendant != current_attendant));

        let ticket = &mut self.tickets[index];
        if let Some(description) = patch.description {
            ticket.description = description;
        }
        ticket.status = new_status;
        ticket.attendant_id = new_attendant;
        match (current_status, new_status) {
            (TicketStatus::Queued, TicketStatus::Active) => ticket.start_date = Some(now),
            (TicketStatus::Active, TicketStatus::Queued) => ticket.start_date = None,
            _ => {}
        }
        if resolving {
            ticket.end_date = Some(now);
        }
        let ticket = ticket.clone();

        if was_active {
            self.release(current_attendant);
        }
        if new_status == TicketStatus::Active {
            self.occupy(new_attendant);
        }

        let promoted = if releases_slot {
            self.promote_next(ticket.ticket_type, id, now)
        } else {
            None
        };
        debug_assert!(self.workloads_consistent());

        Ok(UpdateOutcome {
            ticket,
            previous_status: current_status,
            promoted,
        })
    }

    pub fn get(&self, id: u64) -> Option<&Ticket> {
        self.index_of(id).map(|i| &self.tickets[i])
    }

    /// Tickets matching the filter, most recent first.
    pub fn list(&self, filter: &TicketFilter) -> Vec<Ticket> {
        self.tickets
            .iter()
            .rev()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Oldest QUEUED ticket of the given type.
    pub fn peek_next(&self, ticket_type: TicketType) -> Option<&Ticket> {
        self.next_queued(ticket_type, None)
            .map(|i| &self.tickets[i])
    }

    /// Number of ACTIVE tickets held by the attendant.
    pub fn workload(&self, attendant_id: AttendantId) -> usize {
        self.workload.get(&attendant_id).copied().unwrap_or(0)
    }

    /// Load of every attendant in the pool.
    pub fn workloads(&self) -> Vec<AttendantLoad> {
        TicketType::ALL
            .into_iter()
            .map(|ticket_type| {
                let attendant_id = ticket_type.attendant();
                AttendantLoad {
                    attendant_id,
                    ticket_type,
                    active: self.workload(attendant_id),
                    capacity: ATTENDANT_CAPACITY,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Number of tickets in each status, in `TicketStatus::ALL` order.
    pub fn status_counts(&self) -> Vec<(TicketStatus, usize)> {
        TicketStatus::ALL
            .into_iter()
            .map(|status| {
                let count = self.tickets.iter().filter(|t| t.status == status).count();
                (status, count)
            })
            .collect()
    }

    /// Promote the oldest queued ticket of `ticket_type` into its attendant,
    /// if that attendant has a free slot. `skip` is the ticket whose update
    /// freed the slot; a demoted ticket must not win its own slot back.
    fn promote_next(
        &mut self,
        ticket_type: TicketType,
        skip: u64,
        now: DateTime<Utc>,
    ) -> Option<Ticket> {
        let attendant_id = ticket_type.attendant();
        if self.workload(attendant_id) >= ATTENDANT_CAPACITY {
            return None;
        }
        let index = self.next_queued(ticket_type, Some(skip))?;

        let ticket = &mut self.tickets[index];
        ticket.status = TicketStatus::Active;
        ticket.attendant_id = attendant_id;
        ticket.start_date = Some(now);
        let ticket = ticket.clone();

        self.occupy(attendant_id);
        Some(ticket)
    }

    fn next_queued(&self, ticket_type: TicketType, skip: Option<u64>) -> Option<usize> {
        self.tickets.iter().position(|t| {
            t.status == TicketStatus::Queued
                && t.ticket_type == ticket_type
                && Some(t.id) != skip
        })
    }

    fn next_id(&self) -> u64 {
        self.tickets.last().map_or(1, |t| t.id + 1)
    }

    fn index_of(&self, id: u64) -> Option<usize> {
        self.tickets.binary_search_by_key(&id, |t| t.id).ok()
    }

    fn occupy(&mut self, attendant_id: AttendantId) {
        *self.workload.entry(attendant_id).or_insert(0) += 1;
    }

    fn release(&mut self, attendant_id: AttendantId) {
        if let Some(count) = self.workload.get_mut(&attendant_id) {
            *count = count.saturating_sub(1);
        }
    }

    /// Recount ACTIVE tickets per attendant from scratch.
    fn scan_workload(&self, attendant_id: AttendantId) -> usize {
        self.tickets
            .iter()
            .filter(|t| t.attendant_id == attendant_id && t.status == TicketStatus::Active)
            .count()
    }

    fn workloads_consistent(&self) -> bool {
        let mut attendants: Vec<AttendantId> = self.workload.keys().copied().collect();
        attendants.extend(self.tickets.iter().map(|t| t.attendant_id));
        attendants
            .into_iter()
            .all(|a| self.workload(a) == self.scan_workload(a) && self.workload(a) <= ATTENDANT_CAPACITY)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), DispatchError> {
    if value.trim().is_empty() {
        return Err(DispatchError::InvalidArgument(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}
