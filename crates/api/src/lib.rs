//! HTTP API layer with Axum routes and services.
//!
//! This crate provides:
//! - REST API routes
//! - The authenticated-user extractor
//! - Services driving the approval/sync, closure, and unlock flows

pub mod middleware;
pub mod routes;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use polifund_shared::hub::HubApi;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Hub registry client.
    pub hub: Arc<dyn HubApi>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
