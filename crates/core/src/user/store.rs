use super::{NewUser, User};
use crate::error::StoreError;

/// Trait for user storage backends.
pub trait UserStore: Send + Sync {
    /// Insert a user. A duplicate email yields `StoreError::Conflict`.
    fn create(&self, user: NewUser) -> Result<User, StoreError>;

    fn get(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Whether a user with this id exists.
    fn exists(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.get(id)?.is_some())
    }
}
