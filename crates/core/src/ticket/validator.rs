//! Field validation for ticket payloads.

use serde_json::Value;

use super::{NewTicket, TicketStatus};
use crate::error::ServiceError;
use crate::user::UserStore;
use crate::validation::{invalid_selection_message, FieldErrors, Payload};

pub const MAX_TITLE_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 255;
pub const MAX_STATUS_CHARS: usize = 25;

/// A ticket payload that passed every rule, ready to persist.
pub type ValidTicket = NewTicket;

/// Checks candidate ticket payloads against the create rules.
///
/// The only side effect is a read of the user directory to confirm that
/// `user_id` refers to an existing user. `agent_id` is not looked up.
pub struct TicketValidator<'a> {
    users: &'a dyn UserStore,
}

impl<'a> TicketValidator<'a> {
    pub fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Validate a JSON object payload.
    ///
    /// Returns `ServiceError::Validation` listing every failing field, or
    /// `ServiceError::Store` if the user lookup itself fails.
    pub fn validate(&self, payload: &Value) -> Result<ValidTicket, ServiceError> {
        let mut errors = FieldErrors::new();
        let fields = Payload::new(payload, &mut errors);

        let user_id = fields.required_integer("user_id", &mut errors);
        let agent_id = fields.required_integer("agent_id", &mut errors);
        let title = fields.required_string("title", Some(MAX_TITLE_CHARS), &mut errors);
        let description =
            fields.required_string("description", Some(MAX_DESCRIPTION_CHARS), &mut errors);
        let status = fields
            .required_string("status", Some(MAX_STATUS_CHARS), &mut errors)
            .and_then(|raw| match raw.parse::<TicketStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.add("status", invalid_selection_message("status"));
                    None
                }
            });

        if let Some(id) = user_id {
            if !self.user_exists(id)? {
                errors.add("user_id", invalid_selection_message("user_id"));
            }
        }

        match (user_id, agent_id, title, description, status) {
            (Some(user_id), Some(agent_id), Some(title), Some(description), Some(status))
                if errors.is_empty() =>
            {
                Ok(NewTicket {
                    user_id,
                    agent_id: Some(agent_id),
                    title,
                    description,
                    status,
                })
            }
            _ => Err(ServiceError::Validation(errors)),
        }
    }

    fn user_exists(&self, id: i64) -> Result<bool, ServiceError> {
        self.users.exists(id).map_err(ServiceError::Store)
    }
}
