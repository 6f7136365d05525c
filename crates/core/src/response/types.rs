use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message in a ticket thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: i64,

    /// Ticket the message belongs to. Checked only when the response is created.
    pub ticket_id: i64,

    /// Author.
    pub user_id: i64,

    pub message: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResponse {
    pub ticket_id: i64,
    pub user_id: i64,
    pub message: String,
}
