use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::{NewResponse, Response, ResponseStore};
use crate::error::{Resource, ServiceError, StoreError};
use crate::metrics;
use crate::ticket::TicketStore;
use crate::user::UserStore;
use crate::validation::{invalid_selection_message, FieldErrors, Payload};

/// Manages the responses on ticket threads.
pub struct ResponseService {
    responses: Arc<dyn ResponseStore>,
    tickets: Arc<dyn TicketStore>,
    users: Arc<dyn UserStore>,
}

impl ResponseService {
    pub fn new(
        responses: Arc<dyn ResponseStore>,
        tickets: Arc<dyn TicketStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            responses,
            tickets,
            users,
        }
    }

    /// Responses on `ticket_id`, oldest first. A missing ticket yields an
    /// empty list rather than an error.
    pub fn list_responses(&self, ticket_id: i64) -> Result<Vec<Response>, ServiceError> {
        self.responses
            .list_for_ticket(ticket_id)
            .map_err(store_error)
    }

    /// Add a response from `{ticket_id, user_id, message}`.
    pub fn create_response(&self, payload: &Value) -> Result<Response, ServiceError> {
        let mut errors = FieldErrors::new();
        let fields = Payload::new(payload, &mut errors);

        let ticket_id = fields.required_integer("ticket_id", &mut errors);
        let user_id = fields.required_integer("user_id", &mut errors);
        let message = fields.required_string("message", None, &mut errors);

        if let Some(id) = ticket_id {
            if self
                .tickets
                .get(id)
                .map_err(ServiceError::Store)?
                .is_none()
            {
                errors.add("ticket_id", invalid_selection_message("ticket_id"));
            }
        }
        if let Some(id) = user_id {
            if !self.users.exists(id).map_err(ServiceError::Store)? {
                errors.add("user_id", invalid_selection_message("user_id"));
            }
        }

        let (Some(ticket_id), Some(user_id), Some(message)) = (ticket_id, user_id, message) else {
            return Err(rejected(errors));
        };
        if !errors.is_empty() {
            return Err(rejected(errors));
        }

        let response = self
            .responses
            .create(NewResponse {
                ticket_id,
                user_id,
                message,
            })
            .map_err(store_error)?;

        metrics::RESPONSES_CREATED.inc();
        info!(
            response_id = response.id,
            ticket_id = response.ticket_id,
            "Response added"
        );

        Ok(response)
    }

    pub fn get_response(&self, id: i64) -> Result<Response, ServiceError> {
        self.responses
            .get(id)
            .map_err(store_error)?
            .ok_or_else(|| ServiceError::not_found(Resource::Response, id))
    }

    /// Replace the message of a response from `{message}`.
    pub fn update_response(&self, id: i64, payload: &Value) -> Result<Response, ServiceError> {
        let mut errors = FieldErrors::new();
        let fields = Payload::new(payload, &mut errors);
        let message = fields.required_string("message", None, &mut errors);

        let Some(message) = message else {
            // The record must exist before its payload matters.
            self.get_response(id)?;
            return Err(rejected(errors));
        };

        let response = self
            .responses
            .update_message(id, &message)
            .map_err(store_error)?;
        info!(response_id = id, "Response updated");

        Ok(response)
    }

    pub fn delete_response(&self, id: i64) -> Result<Response, ServiceError> {
        let response = self.responses.delete(id).map_err(store_error)?;
        info!(response_id = id, "Response deleted");
        Ok(response)
    }
}

fn store_error(err: StoreError) -> ServiceError {
    ServiceError::from_store(Resource::Response, err)
}

fn rejected(errors: FieldErrors) -> ServiceError {
    metrics::VALIDATION_FAILURES
        .with_label_values(&["response"])
        .inc();
    warn!(%errors, "Response payload rejected");
    ServiceError::Validation(errors)
}
