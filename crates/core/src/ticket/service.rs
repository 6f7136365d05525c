//! Ticket lifecycle operations.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::{Ticket, TicketChanges, TicketFilter, TicketStatus, TicketStore, TicketValidator};
use crate::error::{Resource, ServiceError};
use crate::metrics;
use crate::pagination::{Page, PageRequest};
use crate::user::UserStore;

/// Fields a ticket update may touch. Anything else in the patch is ignored.
const UPDATABLE_FIELDS: [&str; 5] = ["user_id", "agent_id", "title", "description", "status"];

/// Optional filters for [`TicketService::list_tickets`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketQuery {
    pub status: Option<TicketStatus>,
    pub agent_id: Option<i64>,
}

/// Validates payloads and drives ticket writes through the store.
///
/// Every mutation is written through synchronously; there is no caching or
/// batching between the service and the store.
pub struct TicketService {
    tickets: Arc<dyn TicketStore>,
    users: Arc<dyn UserStore>,
}

impl TicketService {
    pub fn new(tickets: Arc<dyn TicketStore>, users: Arc<dyn UserStore>) -> Self {
        Self { tickets, users }
    }

    /// One page of tickets matching `query`, ordered by id.
    pub fn list_tickets(
        &self,
        request: PageRequest,
        query: TicketQuery,
    ) -> Result<Page<Ticket>, ServiceError> {
        let mut filter = TicketFilter::new()
            .with_limit(request.limit())
            .with_offset(request.offset());
        filter.status = query.status;
        filter.agent_id = query.agent_id;

        let total = self.tickets.count(&filter).map_err(store_error)?;
        let items = self.tickets.list(&filter).map_err(store_error)?;

        Ok(Page::new(items, request, total.max(0) as u64))
    }

    /// Validate `payload` and persist it as a new ticket.
    pub fn create_ticket(&self, payload: &Value) -> Result<Ticket, ServiceError> {
        let valid = self.validate(payload)?;
        let ticket = self.tickets.create(valid).map_err(store_error)?;

        metrics::TICKETS_CREATED.inc();
        info!(
            ticket_id = ticket.id,
            user_id = ticket.user_id,
            status = %ticket.status,
            "Ticket created"
        );

        Ok(ticket)
    }

    pub fn get_ticket(&self, id: i64) -> Result<Ticket, ServiceError> {
        self.tickets
            .get(id)
            .map_err(store_error)?
            .ok_or_else(|| ServiceError::not_found(Resource::Ticket, id))
    }

    /// Merge `patch` onto the stored ticket, validate the result with the
    /// create rules, then write it.
    pub fn update_ticket(&self, id: i64, patch: &Value) -> Result<Ticket, ServiceError> {
        let current = self.get_ticket(id)?;

        let candidate = merge_patch(&current, patch);
        let valid = self.validate(&candidate)?;

        let changes = TicketChanges {
            user_id: Some(valid.user_id),
            agent_id: Some(valid.agent_id),
            title: Some(valid.title),
            description: Some(valid.description),
            status: Some(valid.status),
        };
        let ticket = self.tickets.update(id, changes).map_err(store_error)?;

        if ticket.status != current.status {
            record_transition(current.status, ticket.status);
        }
        info!(ticket_id = id, "Ticket updated");

        Ok(ticket)
    }

    /// Delete a ticket and return what was removed. Responses on the ticket
    /// are left in place.
    pub fn delete_ticket(&self, id: i64) -> Result<Ticket, ServiceError> {
        let ticket = self.tickets.delete(id).map_err(store_error)?;

        metrics::TICKETS_DELETED.inc();
        info!(ticket_id = id, "Ticket deleted");

        Ok(ticket)
    }

    /// Assign an agent. The agent id is taken as given.
    pub fn assign_agent(&self, ticket_id: i64, agent_id: i64) -> Result<Ticket, ServiceError> {
        let ticket = self
            .tickets
            .update(ticket_id, TicketChanges::agent(agent_id))
            .map_err(store_error)?;

        metrics::AGENT_ASSIGNMENTS.inc();
        info!(ticket_id, agent_id, "Agent assigned");

        Ok(ticket)
    }

    /// Move a ticket to `status`. Any status may follow any other.
    ///
    /// A value outside the status set fails with `InvalidStatus` and leaves
    /// the ticket untouched.
    pub fn update_status(&self, ticket_id: i64, status: &str) -> Result<Ticket, ServiceError> {
        let current = self.get_ticket(ticket_id)?;

        let Ok(status) = status.parse::<TicketStatus>() else {
            metrics::INVALID_STATUS_UPDATES.inc();
            warn!(ticket_id, status, "Rejected unknown ticket status");
            return Err(ServiceError::InvalidStatus("Invalid status".to_string()));
        };

        let ticket = self
            .tickets
            .update(ticket_id, TicketChanges::status(status))
            .map_err(store_error)?;

        record_transition(current.status, ticket.status);
        info!(
            ticket_id,
            from = %current.status,
            to = %ticket.status,
            "Ticket status updated"
        );

        Ok(ticket)
    }

    fn validate(&self, payload: &Value) -> Result<super::ValidTicket, ServiceError> {
        TicketValidator::new(self.users.as_ref())
            .validate(payload)
            .inspect_err(|e| {
                if let ServiceError::Validation(errors) = e {
                    metrics::VALIDATION_FAILURES
                        .with_label_values(&["ticket"])
                        .inc();
                    warn!(%errors, "Ticket payload rejected");
                }
            })
    }
}

fn store_error(err: crate::error::StoreError) -> ServiceError {
    ServiceError::from_store(Resource::Ticket, err)
}

fn record_transition(from: TicketStatus, to: TicketStatus) {
    metrics::STATUS_TRANSITIONS
        .with_label_values(&[from.as_str(), to.as_str()])
        .inc();
}

/// The stored ticket as a payload, overlaid with the known fields of `patch`.
fn merge_patch(current: &Ticket, patch: &Value) -> Value {
    let mut merged = Map::new();
    merged.insert("user_id".into(), Value::from(current.user_id));
    merged.insert(
        "agent_id".into(),
        current.agent_id.map(Value::from).unwrap_or(Value::Null),
    );
    merged.insert("title".into(), Value::from(current.title.clone()));
    merged.insert(
        "description".into(),
        Value::from(current.description.clone()),
    );
    merged.insert("status".into(), Value::from(current.status.as_str()));

    match patch.as_object() {
        Some(fields) => {
            for field in UPDATABLE_FIELDS {
                if let Some(value) = fields.get(field) {
                    merged.insert(field.to_string(), value.clone());
                }
            }
            Value::Object(merged)
        }
        // Let the validator report the malformed body.
        None => patch.clone(),
    }
}
