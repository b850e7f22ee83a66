//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, health, points, rewards};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Points (member identity via gateway)
/// - `GET /v1/points/balance` - Current balance and lifetime totals
/// - `GET /v1/points/transactions` - Transaction history, newest first
///
/// ## Earning (service API key auth)
/// - `POST /v1/points/earn` - Credit points for an activity
///
/// ## Rewards (member identity via gateway)
/// - `POST /v1/rewards/redeem` - Redeem a catalog reward
///
/// ## Admin (admin key auth)
/// - `POST /v1/admin/adjust` - Manual balance correction
/// - `POST /v1/admin/expiration-sweep` - Run an expiration sweep now
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Points
        .route("/v1/points/balance", get(points::get_balance))
        .route("/v1/points/transactions", get(points::list_transactions))
        .route("/v1/points/earn", post(points::earn_points))
        // Rewards
        .route("/v1/rewards/redeem", post(rewards::redeem_reward))
        // Admin
        .route("/v1/admin/adjust", post(admin::adjust_balance))
        .route(
            "/v1/admin/expiration-sweep",
            post(admin::run_expiration_sweep),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
