//! Prometheus metrics for the dispatcher.
//!
//! This module provides metrics for:
//! - Ticket admission (created, by initial status)
//! - Status transitions and automatic promotions
//! - Attendant capacity (rejections, current workload)

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, IntGaugeVec, Opts};

// =============================================================================
// Tickets
// =============================================================================

/// Tickets created, by type and initial status.
pub static TICKETS_CREATED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "servicedesk_tickets_created_total",
            "Total tickets created since startup",
        ),
        &["type", "status"],
    )
    .unwrap()
});

/// Status transitions applied by updates and promotions.
pub static TICKET_TRANSITIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "servicedesk_ticket_transitions_total",
            "Ticket status transitions",
        ),
        &["from_status", "to_status"],
    )
    .unwrap()
});

/// Queued tickets promoted automatically when a slot freed up.
pub static AUTO_PROMOTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "servicedesk_auto_promotions_total",
            "Queued tickets promoted into a freed attendant slot",
        ),
        &["type"],
    )
    .unwrap()
});

// =============================================================================
// Attendants
// =============================================================================

/// Updates rejected because the target attendant was full.
pub static CAPACITY_REJECTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "servicedesk_capacity_rejections_total",
            "Updates rejected because the attendant was at capacity",
        ),
        &["attendant"],
    )
    .unwrap()
});

/// ACTIVE tickets per attendant.
pub static ATTENDANT_WORKLOAD: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "servicedesk_attendant_workload",
            "Number of ACTIVE tickets held by each attendant",
        ),
        &["attendant"],
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(TICKETS_CREATED.clone()),
        Box::new(TICKET_TRANSITIONS.clone()),
        Box::new(AUTO_PROMOTIONS.clone()),
        Box::new(CAPACITY_REJECTIONS.clone()),
        Box::new(ATTENDANT_WORKLOAD.clone()),
    ]
}
