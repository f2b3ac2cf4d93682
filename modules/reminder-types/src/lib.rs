//! Shared types for the reminder service and its HTTP clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =====================================================
// Domain Types
// =====================================================

/// A stored reminder. Only `id` is interpreted by the service; `title`,
/// `day`, `month` and `year` must be present on creation and every other
/// field is carried through untouched.
pub type Reminder = Map<String, Value>;

/// Fields a reminder must carry to be accepted.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "day", "month", "year"];

pub fn reminder_id(reminder: &Reminder) -> Option<&str> {
    reminder.get("id").and_then(Value::as_str)
}

// =====================================================
// Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerInfo {
    pub status: String,
    pub message: String,
}

// =====================================================
// Service Status
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub total_reminders: usize,
    pub data_path: String,
}
