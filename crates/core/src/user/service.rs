use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::{NewUser, User, UserStore};
use crate::error::{Resource, ServiceError, StoreError};
use crate::validation::{FieldErrors, Payload};

const MAX_NAME_CHARS: usize = 255;
const MAX_EMAIL_CHARS: usize = 255;

/// Seeds and looks up users.
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Create a user from `{name, email}`.
    pub fn create_user(&self, payload: &Value) -> Result<User, ServiceError> {
        let mut errors = FieldErrors::new();
        let fields = Payload::new(payload, &mut errors);

        let name = fields.required_string("name", Some(MAX_NAME_CHARS), &mut errors);
        let email = fields.required_string("email", Some(MAX_EMAIL_CHARS), &mut errors);
        if let Some(ref email) = email {
            if !looks_like_email(email) {
                errors.add("email", "The email field must be a valid email address.");
            }
        }

        let (Some(name), Some(email)) = (name, email) else {
            return Err(ServiceError::Validation(errors));
        };
        let new_user = errors.into_result(NewUser::new(name, email.trim()))?;

        match self.users.create(new_user) {
            Ok(user) => {
                info!(user_id = user.id, "User created");
                Ok(user)
            }
            Err(StoreError::Conflict(_)) => Err(ServiceError::Validation(FieldErrors::single(
                "email",
                "The email has already been taken.",
            ))),
            Err(e) => Err(ServiceError::from_store(Resource::User, e)),
        }
    }

    pub fn get_user(&self, id: i64) -> Result<User, ServiceError> {
        self.users
            .get(id)
            .map_err(|e| ServiceError::from_store(Resource::User, e))?
            .ok_or_else(|| ServiceError::not_found(Resource::User, id))
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(' ')
        }
        None => false,
    }
}
