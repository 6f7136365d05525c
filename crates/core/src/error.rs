//! Error types shared by the stores and services.

use std::fmt;

use thiserror::Error;

use crate::validation::FieldErrors;

/// Persistence failure reported by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with this primary key.
    #[error("Record not found: {0}")]
    NotFound(i64),

    /// A uniqueness or reference constraint rejected the write.
    #[error("Constraint violation: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, _)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict(err.to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Kind of record an operation addressed, used in not-found reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Ticket,
    Response,
    User,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Ticket => "Ticket",
            Resource::Response => "Response",
            Resource::User => "User",
        };
        f.write_str(name)
    }
}

/// Outcome of a failed service operation.
///
/// Every service returns this one type; the transport layer maps each variant
/// to a response envelope.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The payload failed field-level checks.
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("{resource} not found: {id}")]
    NotFound { resource: Resource, id: i64 },

    /// A status outside the ticket status set was requested.
    #[error("{0}")]
    InvalidStatus(String),

    /// Unexpected persistence failure.
    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    pub fn not_found(resource: Resource, id: i64) -> Self {
        ServiceError::NotFound { resource, id }
    }

    /// Map a store failure, turning a missing row into a not-found for `resource`.
    pub fn from_store(resource: Resource, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound { resource, id },
            other => ServiceError::Store(other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}
