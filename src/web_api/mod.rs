//! WebAPI - Kiosk Action Endpoints
//!
//! ## Responsibilities
//!
//! - HTTP API routes for the kiosk frontend
//! - Request validation
//! - Response formatting

mod routes;

pub use routes::create_router;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::models::HealthResponse;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backend_ok = state.gate.health_check().await;

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend_connected: backend_ok,
        camera_ready: state.camera.has_source(),
        printer_configured: state.printer.has_printer(),
    };

    Json(response)
}

/// Status endpoint (device identity)
pub async fn device_status(State(_state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "device_type": "gatepass-kiosk",
        "firmware_version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
