//! API Routes

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::models::ApiResponse;
use crate::state::AppState;
use crate::visit_form::VisitForm;

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Status
        .route("/healthz", get(super::health_check))
        .route("/api/status", get(super::device_status))
        // Kiosk actions
        .route("/api/capture", post(capture))
        .route("/api/lookup", get(lookup))
        .route("/api/entry", post(submit_entry))
        .route("/api/exit", post(mark_exit))
        .route("/api/reset", post(reset))
        .route("/api/form", get(form_state))
        // Backend passthrough for the security dashboard panels
        .route("/api/next-id", get(next_pass_id))
        .route("/api/active-visitors", get(active_visitors))
        .route("/api/bookings/today", get(today_bookings))
        .with_state(state)
}

/// Take a photo into the pending capture slot
async fn capture(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.capture().await {
        Ok(outcome) => Json(ApiResponse::success(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Lookup query parameters
#[derive(Debug, Deserialize)]
struct LookupParams {
    #[serde(default)]
    mobile: String,
}

/// Look up a returning visitor by mobile number
async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> impl IntoResponse {
    let outcome = state.controller.lookup(&params.mobile).await;
    Json(ApiResponse::success(outcome))
}

/// Submit a visitor entry; returns the filled pass on success
async fn submit_entry(
    State(state): State<AppState>,
    Json(form): Json<VisitForm>,
) -> impl IntoResponse {
    match state.controller.submit_entry(form).await {
        Ok(outcome) => Json(ApiResponse::success(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Exit request body
#[derive(Debug, Deserialize)]
struct ExitParams {
    mobile: String,
    #[serde(default)]
    out_time: Option<String>,
}

/// Record a visitor exit
async fn mark_exit(
    State(state): State<AppState>,
    Json(params): Json<ExitParams>,
) -> impl IntoResponse {
    match state
        .controller
        .mark_exit(&params.mobile, params.out_time)
        .await
    {
        Ok(outcome) => Json(ApiResponse::success(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Explicit state reset (replaces the old post-print page reload)
async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.reset().await;
    Json(ApiResponse::success(serde_json::json!({"reset": true})))
}

/// Current kiosk view state
async fn form_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.controller.snapshot().await))
}

/// Preview the next pass number
async fn next_pass_id(State(state): State<AppState>) -> impl IntoResponse {
    match state.gate.next_pass_id().await {
        Ok(next) => Json(ApiResponse::success(next)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Visitors currently inside
async fn active_visitors(State(state): State<AppState>) -> impl IntoResponse {
    match state.gate.active_visitors().await {
        Ok(list) => Json(ApiResponse::success(list)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Today's expected visitors
async fn today_bookings(State(state): State<AppState>) -> impl IntoResponse {
    match state.gate.today_bookings().await {
        Ok(list) => Json(ApiResponse::success(list)).into_response(),
        Err(e) => e.into_response(),
    }
}
