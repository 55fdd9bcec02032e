//! Wire shapes exchanged with the remote task service.

use super::{Task, TaskId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Typed task record decoded from a normalized [`RawTaskRecord`].
///
/// Field names follow the remote service (`taskTitle`, `taskStatus`, ...);
/// the plain names are accepted as aliases.
///
/// [`RawTaskRecord`]: super::RawTaskRecord
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskRecord {
    /// Canonical identifier.
    pub id: TaskId,
    /// Task title.
    #[serde(rename = "taskTitle", alias = "title")]
    pub title: String,
    /// Optional description.
    #[serde(rename = "taskDescription", alias = "description", default)]
    pub description: Option<String>,
    /// Status label, expected to name a column.
    #[serde(rename = "taskStatus", alias = "status", default)]
    pub status: Option<String>,
    /// Optional category.
    #[serde(rename = "taskCategory", alias = "category", default)]
    pub category: Option<String>,
    /// Due date.
    #[serde(
        rename = "taskDueDate",
        alias = "dueDate",
        default,
        deserialize_with = "lenient::date"
    )]
    pub due_date: Option<NaiveDate>,
    /// Creation date.
    #[serde(
        rename = "taskCreatedDate",
        alias = "createdDate",
        default,
        deserialize_with = "lenient::date"
    )]
    pub created_date: Option<NaiveDate>,
    /// Last modification timestamp.
    #[serde(rename = "lastModified", default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Archive timestamp, present only for archived records.
    #[serde(
        rename = "archivedDate",
        alias = "archivedAt",
        default,
        deserialize_with = "lenient::timestamp"
    )]
    pub archived_at: Option<DateTime<Utc>>,
}

/// Task fields sent to the remote service on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFields {
    /// Task title.
    #[serde(rename = "taskTitle")]
    pub title: String,
    /// Optional description.
    #[serde(rename = "taskDescription", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Status label.
    #[serde(rename = "taskStatus")]
    pub status: String,
    /// Optional category.
    #[serde(rename = "taskCategory", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Due date.
    #[serde(rename = "taskDueDate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Creation date.
    #[serde(rename = "taskCreatedDate")]
    pub created_date: NaiveDate,
    /// Last modification timestamp.
    #[serde(rename = "lastModified")]
    pub last_modified: DateTime<Utc>,
}

impl From<&Task> for TaskFields {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status().as_str().to_owned(),
            category: task.category().map(str::to_owned),
            due_date: task.due_date(),
            created_date: task.created_date(),
            last_modified: task.last_modified(),
        }
    }
}

/// Date parsing that tolerates the formats the remote service emits.
mod lenient {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use serde::{Deserialize, Deserializer, de};

    const DATE_FORMAT: &str = "%Y-%m-%d";
    const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    /// Accepts `null`, an empty string, `YYYY-MM-DD`, or an RFC 3339
    /// timestamp (date part kept).
    pub(super) fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        non_blank(raw.as_deref())
            .map(parse_date)
            .transpose()
            .map_err(de::Error::custom)
    }

    /// Accepts `null`, an empty string, an RFC 3339 timestamp, a zone-less
    /// local date-time (read as UTC), or `YYYY-MM-DD` (midnight UTC).
    pub(super) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        non_blank(raw.as_deref())
            .map(parse_timestamp)
            .transpose()
            .map_err(de::Error::custom)
    }

    fn non_blank(raw: Option<&str>) -> Option<&str> {
        raw.map(str::trim).filter(|value| !value.is_empty())
    }

    fn parse_date(value: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(value).map(|stamp| stamp.date_naive()))
            .map_err(|_| format!("invalid date '{value}'"))
    }

    fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
        DateTime::parse_from_rfc3339(value)
            .map(|stamp| stamp.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(value, LOCAL_DATE_TIME_FORMAT)
                    .map(|local| local.and_utc())
            })
            .or_else(|_| {
                NaiveDate::parse_from_str(value, DATE_FORMAT)
                    .map(|date| date.and_time(NaiveTime::MIN).and_utc())
            })
            .map_err(|_| format!("invalid timestamp '{value}'"))
    }
}
