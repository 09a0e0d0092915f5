/// Data models for database entities
///
/// All models map to database tables and use sqlx for type-safe queries.

use crate::error::TaskError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// Lifecycle of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TaskStatus {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(TaskError::InvalidArgument(format!(
                "unknown status '{}' (expected pending, in_progress or completed)",
                other
            ))),
        }
    }
}

/// Represents a stored task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
}

impl Task {
    /// Title and description joined by a single space.
    ///
    /// A missing description still contributes the separator, so "Buy milk"
    /// with no description becomes "Buy milk ". Two tasks are the same
    /// sequence state exactly when these strings are equal.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.description.as_deref().unwrap_or(""))
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Column a task listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    DueDate,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::DueDate => "due_date",
        }
    }
}

impl FromStr for SortField {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortField::CreatedAt),
            "due_date" => Ok(SortField::DueDate),
            other => Err(TaskError::InvalidArgument(format!(
                "unknown sort field '{}' (expected created_at or due_date)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(TaskError::InvalidArgument(format!(
                "unknown sort order '{}' (expected asc or desc)",
                other
            ))),
        }
    }
}

/// Filter and ordering for listing tasks
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl TaskQuery {
    pub fn with_status(status: Option<TaskStatus>) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, description: Option<&str>) -> Task {
        Task {
            id: 1,
            title: title.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
            due_date: None,
            status: TaskStatus::Pending,
        }
    }

    #[test]
    fn test_combined_text() {
        assert_eq!(task("Buy milk", Some("2 liters")).combined_text(), "Buy milk 2 liters");
        assert_eq!(task("Buy milk", None).combined_text(), "Buy milk ");
    }

    #[test]
    fn test_status_round_trip_through_display() {
        for status in TaskStatus::ALL {
            assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("due_date".parse::<SortField>().unwrap(), SortField::DueDate);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);

        let err = "title".parse::<SortField>().unwrap_err();
        assert!(matches!(err, TaskError::InvalidArgument(_)));
        assert!("up".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
