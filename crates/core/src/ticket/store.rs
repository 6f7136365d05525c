//! Ticket storage trait and types.

use super::{Ticket, TicketStatus};
use crate::error::StoreError;

/// Fields needed to insert a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub user_id: i64,
    pub agent_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
}

/// Partial update of a ticket. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketChanges {
    pub user_id: Option<i64>,
    /// `Some(None)` clears the assignee.
    pub agent_id: Option<Option<i64>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
}

impl TicketChanges {
    pub fn agent(agent_id: i64) -> Self {
        Self {
            agent_id: Some(Some(agent_id)),
            ..Self::default()
        }
    }

    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Filter for querying tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFilter {
    /// Filter by status.
    pub status: Option<TicketStatus>,
    /// Filter by assigned agent.
    pub agent_id: Option<i64>,
    /// Maximum number of results.
    pub limit: i64,
    /// Offset for pagination.
    pub offset: i64,
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketFilter {
    /// Create a new filter with defaults.
    pub fn new() -> Self {
        Self {
            status: None,
            agent_id: None,
            limit: 100,
            offset: 0,
        }
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_agent(mut self, agent_id: i64) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for ticket storage backends.
pub trait TicketStore: Send + Sync {
    /// Create a new ticket and return it with its assigned id.
    fn create(&self, ticket: NewTicket) -> Result<Ticket, StoreError>;

    /// Get a ticket by ID.
    fn get(&self, id: i64) -> Result<Option<Ticket>, StoreError>;

    /// Merge `changes` into the ticket in one atomic write and return the result.
    fn update(&self, id: i64, changes: TicketChanges) -> Result<Ticket, StoreError>;

    /// Permanently delete a ticket, returning it.
    fn delete(&self, id: i64) -> Result<Ticket, StoreError>;

    /// List tickets matching the filter, oldest first.
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError>;

    /// Count tickets matching the filter, ignoring limit and offset.
    fn count(&self, filter: &TicketFilter) -> Result<i64, StoreError>;
}
