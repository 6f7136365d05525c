//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ticket lifecycle (creation, status transitions, agent assignment)
//! - Ticket threads (responses)

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

// =============================================================================
// Ticket Lifecycle Metrics
// =============================================================================

/// Tickets created total.
pub static TICKETS_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("helpdesk_tickets_created_total", "Total tickets created").unwrap()
});

/// Tickets deleted total.
pub static TICKETS_DELETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("helpdesk_tickets_deleted_total", "Total tickets deleted").unwrap()
});

/// Status transitions by source and target status.
pub static STATUS_TRANSITIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "helpdesk_ticket_status_transitions_total",
            "Ticket status changes by from/to status",
        ),
        &["from_status", "to_status"],
    )
    .unwrap()
});

/// Rejected status updates (value outside the status set).
pub static INVALID_STATUS_UPDATES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "helpdesk_invalid_status_updates_total",
        "Status updates rejected because the status is unknown",
    )
    .unwrap()
});

/// Agent assignments total.
pub static AGENT_ASSIGNMENTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "helpdesk_agent_assignments_total",
        "Total agent assignments",
    )
    .unwrap()
});

/// Payloads rejected by validation, by resource.
pub static VALIDATION_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "helpdesk_validation_failures_total",
            "Payloads rejected by field validation",
        ),
        &["resource"], // "ticket", "response"
    )
    .unwrap()
});

// =============================================================================
// Response Metrics
// =============================================================================

/// Responses added to ticket threads.
pub static RESPONSES_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "helpdesk_responses_created_total",
        "Total responses added to tickets",
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(TICKETS_CREATED.clone()),
        Box::new(TICKETS_DELETED.clone()),
        Box::new(STATUS_TRANSITIONS.clone()),
        Box::new(INVALID_STATUS_UPDATES.clone()),
        Box::new(AGENT_ASSIGNMENTS.clone()),
        Box::new(VALIDATION_FAILURES.clone()),
        Box::new(RESPONSES_CREATED.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        STATUS_TRANSITIONS
            .with_label_values(&["open", "resolved"])
            .inc();
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"helpdesk_ticket_status_transitions_total".to_string()));
    }
}
