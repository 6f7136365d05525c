//! Mapping of service failures onto JSON error envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use helpdesk_core::{FieldErrors, ServiceError};
use serde::Serialize;
use tracing::error;

/// Error envelope: `{status: false, message, errors?}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// A failed API call.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self.0 {
            ServiceError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    status: false,
                    message: "Validation error".to_string(),
                    errors: Some(errors),
                },
            ),
            ServiceError::NotFound { resource, .. } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    status: false,
                    message: format!("{} not found", resource),
                    errors: None,
                },
            ),
            ServiceError::InvalidStatus(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    status: false,
                    message,
                    errors: None,
                },
            ),
            ServiceError::Store(e) => {
                error!(error = %e, "Store failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        status: false,
                        message: "Internal server error".to_string(),
                        errors: None,
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
