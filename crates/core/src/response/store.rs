use super::{NewResponse, Response};
use crate::error::StoreError;

/// Trait for response storage backends.
pub trait ResponseStore: Send + Sync {
    fn create(&self, response: NewResponse) -> Result<Response, StoreError>;

    fn get(&self, id: i64) -> Result<Option<Response>, StoreError>;

    /// Replace the message text and refresh `updated_at`.
    fn update_message(&self, id: i64, message: &str) -> Result<Response, StoreError>;

    /// Permanently delete a response, returning it.
    fn delete(&self, id: i64) -> Result<Response, StoreError>;

    /// All responses on a ticket, oldest first. Empty if the ticket has none
    /// or does not exist.
    fn list_for_ticket(&self, ticket_id: i64) -> Result<Vec<Response>, StoreError>;
}
