//! Identity normalization at the ingestion boundary.
//!
//! The remote task service names its identifier either `taskId` or `id`,
//! and may send it as a number or a string. [`normalize`] folds both into a
//! single canonical string field so nothing past this module has to care.

use super::{IdentityError, IngestError, Task, TaskRecord};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the canonical identifier after normalization.
pub const CANONICAL_ID_FIELD: &str = "id";

/// Alternative identifier field used by the remote task service.
pub const LEGACY_ID_FIELD: &str = "taskId";

/// Untyped task record as received from the remote task service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTaskRecord(Map<String, Value>);

impl RawTaskRecord {
    /// Wraps a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a record from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Malformed`] when the value is not an object.
    pub fn from_value(value: Value) -> Result<Self, IngestError> {
        Ok(Self(serde_json::from_value(value)?))
    }

    /// Returns the value of a field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns all fields.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts the record into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Canonicalizes a raw record to carry exactly one identifier field.
///
/// `taskId` takes precedence over `id` when both hold a usable value. Null
/// and blank values are treated as absent; numbers are rendered as their
/// decimal string. All other fields are preserved untouched. Normalizing an
/// already-normalized record returns it unchanged.
///
/// # Errors
///
/// Returns [`IdentityError::MissingId`] when neither field holds a usable
/// value, or [`IdentityError::InvalidId`] when the winning field holds a
/// boolean, array or object.
pub fn normalize(record: RawTaskRecord) -> Result<RawTaskRecord, IdentityError> {
    let mut fields = record.0;
    let legacy = fields.remove(LEGACY_ID_FIELD);
    let canonical = fields.remove(CANONICAL_ID_FIELD);

    let id = match id_text(legacy)? {
        Some(id) => id,
        None => id_text(canonical)?.ok_or(IdentityError::MissingId)?,
    };

    fields.insert(CANONICAL_ID_FIELD.to_owned(), Value::String(id));
    Ok(RawTaskRecord(fields))
}

/// Normalizes a raw record and maps it into a domain task.
///
/// # Errors
///
/// Returns [`IngestError::Identity`] when the identifier cannot be
/// canonicalized, or [`IngestError::Malformed`] when the remaining fields
/// do not fit the task record shape.
pub fn ingest(record: RawTaskRecord, clock: &impl Clock) -> Result<Task, IngestError> {
    let normalized = normalize(record)?;
    let typed: TaskRecord = serde_json::from_value(normalized.into_value())?;
    Ok(Task::from_record(typed, clock))
}

fn id_text(value: Option<Value>) -> Result<Option<String>, IdentityError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
        }
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(IdentityError::InvalidId(other.to_string())),
    }
}
