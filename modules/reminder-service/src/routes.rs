//! Axum route handlers for the reminder HTTP API.
//!
//! Store access is blocking file I/O and runs directly on the request task;
//! a mutation holds the store lock for one load and one save.

use crate::service::{ErrorKind, ReminderError, ReminderService, parse_body};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use reminder_types::*;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

pub struct AppState {
    pub reminders: ReminderService,
    pub start_time: Instant,
}

impl IntoResponse for ReminderError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match self.detail() {
            Some(detail) => ErrorResponse::with_detail(self.to_string(), detail),
            None => ErrorResponse::new(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .route("/api/reminders", get(list_reminders))
        .route("/api/add", post(add_reminder))
        .route("/api/delete", post(delete_reminder))
        .route("/api/status", get(status))
        .with_state(state)
        .layer(cors)
}

// GET /
pub async fn root() -> Json<ServerInfo> {
    Json(ServerInfo {
        status: "ok".to_string(),
        message: "reminder server running".to_string(),
    })
}

// GET /api/reminders
pub async fn list_reminders(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    Json(state.reminders.list())
}

// POST /api/add
pub async fn add_reminder(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Reminder>, ReminderError> {
    let added = parse_body(&body)
        .and_then(|candidate| state.reminders.add(candidate))
        .inspect_err(|e| log::warn!("Rejected add: {}", e))?;
    Ok(Json(added))
}

// POST /api/delete
pub async fn delete_reminder(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DeleteResponse>, ReminderError> {
    parse_body(&body)
        .and_then(|request| state.reminders.delete(request))
        .inspect_err(|e| log::warn!("Rejected delete: {}", e))?;
    Ok(Json(DeleteResponse { ok: true }))
}

// GET /api/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_reminders: state.reminders.list().len(),
        data_path: state.reminders.store().path().display().to_string(),
    })
}
