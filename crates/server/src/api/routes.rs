use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::{auth_middleware, metrics_middleware};
use super::{handlers, responses, tickets, users};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Routes behind the auth middleware
    let protected = Router::new()
        // Config and metrics
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Users
        .route("/user", get(users::current_user))
        .route("/users", post(users::create_user))
        // Tickets
        .route(
            "/tickets",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route(
            "/tickets/{id}",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .route(
            "/tickets/{id}/assign/{agent_id}",
            post(tickets::assign_agent),
        )
        .route("/tickets/{id}/status", patch(tickets::update_status))
        .route("/tickets/{id}/responses", get(responses::list_responses))
        // Responses
        .route("/responses", post(responses::create_response))
        .route(
            "/responses/{id}",
            get(responses::get_response)
                .put(responses::update_response)
                .delete(responses::delete_response),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
