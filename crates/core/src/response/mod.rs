//! Responses: messages appended to a ticket's thread.

mod service;
mod sqlite_store;
mod store;
mod types;

pub use service::ResponseService;
pub use sqlite_store::SqliteResponseStore;
pub use store::ResponseStore;
pub use types::{NewResponse, Response};
