//! Reminder list/add/delete operations on top of the record store.

use crate::id::generate_id;
use crate::store::{RecordStore, StoreError};
use reminder_types::{REQUIRED_FIELDS, Reminder, reminder_id};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

/// Failures surfaced to callers. The display text is the client-facing message.
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("empty body")]
    EmptyBody,
    #[error("invalid json")]
    InvalidJson { detail: String },
    #[error("invalid reminder shape")]
    InvalidShape,
    #[error("missing id")]
    MissingId,
    #[error("id not found")]
    NotFound,
    #[error("failed to save")]
    SaveFailed(#[source] StoreError),
    #[error("failed to save after delete")]
    DeleteSaveFailed(#[source] StoreError),
}

impl ReminderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyBody | Self::InvalidJson { .. } | Self::InvalidShape | Self::MissingId => {
                ErrorKind::Validation
            }
            Self::NotFound => ErrorKind::NotFound,
            Self::SaveFailed(_) | Self::DeleteSaveFailed(_) => ErrorKind::Storage,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::InvalidJson { detail } => Some(detail),
            _ => None,
        }
    }
}

/// Decodes a raw request body. Empty input and malformed JSON become
/// validation errors.
pub fn parse_body(body: &[u8]) -> Result<Value, ReminderError> {
    if body.is_empty() {
        return Err(ReminderError::EmptyBody);
    }
    serde_json::from_slice(body).map_err(|e| ReminderError::InvalidJson {
        detail: e.to_string(),
    })
}

pub struct ReminderService {
    store: Arc<RecordStore>,
}

impl ReminderService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn list(&self) -> Vec<Value> {
        self.store.load()
    }

    /// Validates `candidate`, assigns an id when it has none and appends it.
    /// Caller-supplied ids are stored as given, even if another record uses them.
    pub fn add(&self, candidate: Value) -> Result<Reminder, ReminderError> {
        let mut reminder = match candidate {
            Value::Object(map) if REQUIRED_FIELDS.iter().all(|f| map.contains_key(*f)) => map,
            _ => return Err(ReminderError::InvalidShape),
        };

        let needs_id = match reminder.get("id") {
            None | Some(Value::Null) => true,
            Some(Value::String(id)) => id.is_empty(),
            Some(other) => return Err(type_error(other)),
        };
        if needs_id {
            reminder.insert("id".to_string(), Value::String(generate_id()));
        }

        let mut tx = self.store.transaction();
        tx.records_mut().push(Value::Object(reminder.clone()));
        tx.commit().map_err(|e| {
            log::error!("Failed to save new reminder: {}", e);
            ReminderError::SaveFailed(e)
        })?;

        log::info!("Added reminder {}", reminder_id(&reminder).unwrap_or_default());
        Ok(reminder)
    }

    /// Removes the first record whose `id` equals the request's `id`.
    /// Records without an `id` are skipped; a stored non-string `id` met
    /// before the match is a type error.
    pub fn delete(&self, request: Value) -> Result<(), ReminderError> {
        let id = match request.get("id") {
            None => return Err(ReminderError::MissingId),
            Some(Value::String(id)) => id.clone(),
            Some(other) => return Err(type_error(other)),
        };

        let mut tx = self.store.transaction();
        let position = find_by_id(tx.records(), &id)?.ok_or(ReminderError::NotFound)?;
        tx.records_mut().remove(position);
        tx.commit().map_err(|e| {
            log::error!("Failed to save after deleting {}: {}", id, e);
            ReminderError::DeleteSaveFailed(e)
        })?;

        log::info!("Deleted reminder {}", id);
        Ok(())
    }
}

fn find_by_id(records: &[Value], id: &str) -> Result<Option<usize>, ReminderError> {
    for (index, record) in records.iter().enumerate() {
        match record.get("id") {
            None => {}
            Some(Value::String(stored)) if stored == id => return Ok(Some(index)),
            Some(Value::String(_)) => {}
            Some(other) => return Err(type_error(other)),
        }
    }
    Ok(None)
}

fn type_error(value: &Value) -> ReminderError {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ReminderError::InvalidJson {
        detail: format!("type must be string, but is {}", kind),
    }
}
