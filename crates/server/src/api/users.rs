//! User directory handlers.

use axum::{extract::State, http::StatusCode, Json};
use helpdesk_core::{Identity, User};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::error::ApiError;
use super::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub status: bool,
    pub message: String,
    pub user: User,
}

/// The caller as seen by the auth layer
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub identity: Identity,
    /// Directory record for the identity, when it maps to a known user.
    pub user: Option<User>,
}

/// Seed a user from `{name, email}`
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    let user = state.users().create_user(&body)?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            status: true,
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// Return the authenticated principal
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = match identity.user_id {
        Some(id) => match state.users().get_user(id) {
            Ok(user) => Some(user),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    Ok(Json(CurrentUserResponse { identity, user }))
}
