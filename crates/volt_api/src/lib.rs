//! SuryaVolt API Library
//!
//! HTTP API for booking charging sessions at community hosted EV stations.

mod app_state;
mod booking;
pub mod config;
mod error;
mod station;
mod wallet;

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use crate::app_state::{AppState, Marketplace, OpenWizard, SharedState};
pub use crate::config::{ConfigError, MarketplaceConfig, SessionConfig};
pub use crate::error::{ApiError, ErrorResponse};

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(app_state: AppState) -> Router {
    let shared_state = Arc::new(app_state);
    Router::new()
        .route("/health", get(health_check))
        .route("/stations", get(station::list_stations))
        .route("/stations/{station_id}", get(station::get_station))
        .route("/amenities", get(station::list_amenities))
        .route("/time-slots", get(station::list_time_slots))
        .route("/bookings", get(booking::list_bookings))
        .route("/bookings/wizards", post(booking::start_booking))
        .route("/bookings/wizards/{wizard_id}", get(booking::get_booking))
        .route("/bookings/wizards/{wizard_id}/slot", put(booking::update_slot))
        .route("/bookings/wizards/{wizard_id}/advance", post(booking::advance))
        .route("/bookings/wizards/{wizard_id}/back", post(booking::back))
        .route(
            "/bookings/wizards/{wizard_id}/amenities/{amenity_id}",
            post(booking::toggle_amenity),
        )
        .route(
            "/bookings/wizards/{wizard_id}/payment-methods",
            get(booking::payment_methods),
        )
        .route(
            "/bookings/wizards/{wizard_id}/payment-method",
            put(booking::select_payment_method),
        )
        .route("/bookings/wizards/{wizard_id}/submit", post(booking::submit))
        .route("/wallet", get(wallet::get_wallet))
        .route("/wallet/top-up", post(wallet::top_up))
        .route("/rewards/{points}", get(wallet::get_rewards))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}
