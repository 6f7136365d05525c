//! Minimal user directory.
//!
//! Tickets and responses reference users by id; this module owns the table
//! those references are checked against. Credentials are not stored here.

mod service;
mod sqlite_store;
mod store;
mod types;

pub use service::UserService;
pub use sqlite_store::SqliteUserStore;
pub use store::UserStore;
pub use types::{NewUser, User};
