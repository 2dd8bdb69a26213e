use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// The character used inside the list checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            TaskStatus::Pending => ' ',
            TaskStatus::InProgress => '>',
            TaskStatus::Completed => 'x',
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Next status in selector order (wraps)
    pub fn next(self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    /// Previous status in selector order (wraps)
    pub fn prev(self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::InProgress => TaskStatus::Pending,
            TaskStatus::Completed => TaskStatus::InProgress,
        }
    }

    /// Parse a wire/CLI string like `in_progress`
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn next(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn prev(self) -> Priority {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// A task as stored by the remote service.
///
/// The wire format is camelCase JSON. `dueDate` may arrive as either a
/// plain calendar date or a full RFC 3339 timestamp; either way only the
/// calendar date is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default, with = "date_only")]
    pub due_date: Option<NaiveDate>,
    pub project_id: i64,
}

/// Payload for `create_task`: everything but the server-assigned id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(with = "date_only")]
    pub due_date: Option<NaiveDate>,
    pub project_id: i64,
}

/// Payload for `update_task`: a full record including the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(with = "date_only")]
    pub due_date: Option<NaiveDate>,
    pub project_id: i64,
}

impl TaskPatch {
    /// Attach an id to a draft, turning it into an update payload
    pub fn from_new(id: i64, data: NewTask) -> Self {
        TaskPatch {
            id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            project_id: data.project_id,
        }
    }
}

/// Parse a due date from the wire: plain `YYYY-MM-DD` or RFC 3339,
/// truncated to the calendar date.
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Serde adapter: `Option<NaiveDate>` as `"YYYY-MM-DD"` / null on the
/// wire, accepting timestamps on input.
pub(crate) mod date_only {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => ser.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(de)? {
            None => Ok(None),
            Some(raw) => super::parse_due_date(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid due date: {raw}"))),
        }
    }
}
