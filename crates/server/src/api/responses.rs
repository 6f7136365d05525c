//! Ticket response (thread message) handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use helpdesk_core::Response;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::error::ApiError;
use super::tickets::MessageEnvelope;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    pub status: bool,
    pub message: String,
    pub response: Response,
}

impl ResponseEnvelope {
    fn ok(message: &str, response: Response) -> Json<Self> {
        Json(Self {
            status: true,
            message: message.to_string(),
            response,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseListEnvelope {
    pub status: bool,
    pub message: String,
    pub responses: Vec<Response>,
}

/// List the responses on a ticket. An unknown ticket yields an empty list.
pub async fn list_responses(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<i64>,
) -> Result<Json<ResponseListEnvelope>, ApiError> {
    let responses = state.responses().list_responses(ticket_id)?;
    Ok(Json(ResponseListEnvelope {
        status: true,
        message: "Responses retrieved successfully".to_string(),
        responses,
    }))
}

pub async fn create_response(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ResponseEnvelope>), ApiError> {
    let response = state.responses().create_response(&body)?;
    Ok((
        StatusCode::CREATED,
        ResponseEnvelope::ok("Response added successfully", response),
    ))
}

pub async fn get_response(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let response = state.responses().get_response(id)?;
    Ok(ResponseEnvelope::ok("Response retrieved successfully", response))
}

pub async fn update_response(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let response = state.responses().update_response(id, &body)?;
    Ok(ResponseEnvelope::ok("Response updated successfully", response))
}

pub async fn delete_response(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    state.responses().delete_response(id)?;
    Ok(Json(MessageEnvelope {
        status: true,
        message: "Response deleted successfully".to_string(),
    }))
}
