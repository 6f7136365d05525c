//! Ticket lifecycle: creation, validation, assignment, and status changes.

mod service;
mod sqlite_store;
mod store;
mod types;
mod validator;

pub use service::{TicketQuery, TicketService};
pub use sqlite_store::SqliteTicketStore;
pub use store::{NewTicket, TicketChanges, TicketFilter, TicketStore};
pub use types::{Ticket, TicketStatus, UnknownStatus};
pub use validator::{
    TicketValidator, ValidTicket, MAX_DESCRIPTION_CHARS, MAX_STATUS_CHARS, MAX_TITLE_CHARS,
};
