//! Route definitions for the API.

use axum::{
    middleware,
    routing::{get, patch},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::middleware::actor::resolve_actor_middleware;
use super::SharedState;

/// Create the main API router
pub fn create_router(state: SharedState) -> Router {
    // Build the OpenAPI spec once at startup
    let openapi = super::openapi::build_openapi();

    // Every /api/v1 route runs behind actor resolution; the handlers
    // receive the actor as an extension and thread it explicitly into
    // the access service.
    let api_routes = Router::new()
        .route(
            "/manager/reservations",
            get(handlers::reservations::list_reservations),
        )
        .route(
            "/reservations/:id",
            patch(handlers::reservations::update_reservation),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_actor_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { Json(openapi) }),
        )
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
