//! Ticket API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use helpdesk_core::{
    FieldErrors, Page, PageRequest, ServiceError, Ticket, TicketQuery, TicketStatus,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing tickets.
///
/// Kept as raw strings so malformed numbers surface as field errors
/// instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListTicketsParams {
    /// 1-based page number; values below 1 read as page 1
    pub page: Option<String>,
    /// Page size, clamped to the configured maximum
    pub per_page: Option<String>,
    /// Filter by status
    pub status: Option<String>,
    /// Filter by assigned agent
    pub agent_id: Option<String>,
}

/// Request body for a status change
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

/// Envelope around a single ticket
#[derive(Debug, Serialize)]
pub struct TicketEnvelope {
    pub status: bool,
    pub message: String,
    pub ticket: Ticket,
}

impl TicketEnvelope {
    fn ok(message: &str, ticket: Ticket) -> Json<Self> {
        Json(Self {
            status: true,
            message: message.to_string(),
            ticket,
        })
    }
}

/// Confirmation without a payload
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub status: bool,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// List tickets, paginated, with optional status and agent filters
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTicketsParams>,
) -> Result<Json<Page<Ticket>>, ApiError> {
    let tickets_config = &state.config().tickets;
    let mut errors = FieldErrors::new();

    let page = integer_param("page", params.page.as_deref(), &mut errors).unwrap_or(1);
    let per_page = integer_param("per_page", params.per_page.as_deref(), &mut errors)
        .unwrap_or(i64::from(tickets_config.per_page))
        .clamp(1, i64::from(tickets_config.max_per_page));
    let agent_id = integer_param("agent_id", params.agent_id.as_deref(), &mut errors);

    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<TicketStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                errors.add("status", "The selected status is invalid.");
                None
            }
        },
    };

    errors.into_result(()).map_err(ServiceError::from)?;

    let request = PageRequest::new(to_u32(page), to_u32(per_page));
    let query = TicketQuery { status, agent_id };

    let page = state.tickets().list_tickets(request, query)?;
    Ok(Json(page))
}

/// An optional integer query parameter. Blank values count as absent.
fn integer_param(field: &str, raw: Option<&str>, errors: &mut FieldErrors) -> Option<i64> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match raw.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(
                field,
                format!("The {} field must be an integer.", field.replace('_', " ")),
            );
            None
        }
    }
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

/// Create a new ticket
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<TicketEnvelope>), ApiError> {
    let ticket = state.tickets().create_ticket(&body)?;
    Ok((
        StatusCode::CREATED,
        TicketEnvelope::ok("Ticket created successfully", ticket),
    ))
}

/// Get a ticket by ID
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TicketEnvelope>, ApiError> {
    let ticket = state.tickets().get_ticket(id)?;
    Ok(TicketEnvelope::ok("Ticket retrieved successfully", ticket))
}

/// Update a ticket; the merged result must pass the create rules
pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<TicketEnvelope>, ApiError> {
    let ticket = state.tickets().update_ticket(id, &body)?;
    Ok(TicketEnvelope::ok("Ticket updated successfully", ticket))
}

/// Delete a ticket
pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    state.tickets().delete_ticket(id)?;
    Ok(Json(MessageEnvelope {
        status: true,
        message: "Ticket deleted successfully".to_string(),
    }))
}

/// Assign an agent to a ticket
pub async fn assign_agent(
    State(state): State<Arc<AppState>>,
    Path((ticket_id, agent_id)): Path<(i64, i64)>,
) -> Result<Json<TicketEnvelope>, ApiError> {
    let ticket = state.tickets().assign_agent(ticket_id, agent_id)?;
    Ok(TicketEnvelope::ok("Agent assigned successfully", ticket))
}

/// Change a ticket's status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<TicketEnvelope>, ApiError> {
    let ticket = state.tickets().update_status(id, &body.status)?;
    Ok(TicketEnvelope::ok("Status updated successfully", ticket))
}
