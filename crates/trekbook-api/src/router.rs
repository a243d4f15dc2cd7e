//! Route definitions for the TrekBook HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(booking_routes())
        .merge(slot_routes())
        .merge(voucher_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Booking creation and self-service reads
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::booking::create_booking))
        .route("/bookings", get(handlers::booking::list_own_bookings))
        .route("/bookings/{id}", get(handlers::booking::get_booking))
        .route(
            "/bookings/{id}/participants",
            get(handlers::booking::get_participants),
        )
}

/// Public availability
fn slot_routes() -> Router<AppState> {
    Router::new().route("/treks/{slug}/slots", get(handlers::slot::availability))
}

/// Voucher preview
fn voucher_routes() -> Router<AppState> {
    Router::new().route("/vouchers/preview", post(handlers::voucher::preview))
}

/// Admin surface: slots, booking decisions, vouchers
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/slots", post(handlers::admin::slots::schedule))
        .route("/admin/slots/{id}/close", post(handlers::admin::slots::close))
        .route(
            "/admin/slots/{id}/reconcile",
            post(handlers::admin::slots::reconcile),
        )
        .route("/admin/bookings", get(handlers::admin::bookings::list_bookings))
        .route(
            "/admin/bookings/{id}/approve",
            post(handlers::admin::bookings::approve),
        )
        .route(
            "/admin/bookings/{id}/reject",
            post(handlers::admin::bookings::reject),
        )
        .route(
            "/admin/bookings/{id}/cancel",
            post(handlers::admin::bookings::cancel),
        )
        .route(
            "/admin/bookings/{id}/complete",
            post(handlers::admin::bookings::complete),
        )
        .route(
            "/admin/bookings/{id}/payment",
            put(handlers::admin::bookings::update_payment),
        )
        .route("/admin/vouchers", post(handlers::admin::vouchers::create))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build the CORS layer from configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let cors = &state.config.server.cors;
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(cors.max_age_seconds));

    if cors.allowed_origins.iter().any(|origin| origin == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}
