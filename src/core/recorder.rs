// Writes tasks to the database
//
// Cleans up titles before they land, because the suggestion engine compares
// raw text and "Buy  milk" vs "Buy milk" would look like two different tasks.

use crate::db::{Database, NewTask, Task, TaskStatus, TaskUpdate};
use crate::error::{Result, TaskError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;

// Long enough for any real title, short enough to keep the vocabulary sane
pub const MAX_TITLE_LENGTH: usize = 500;

// Accepts RFC 3339, a naive "YYYY-MM-DDTHH:MM:SS" (read as UTC) or a bare
// date (midnight UTC)
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(TaskError::InvalidArgument(format!(
        "could not parse due date '{}' (try 2026-10-18 or 2026-10-18T09:00:00Z)",
        raw
    )))
}

pub struct Recorder {
    db: Arc<Database>,
}

impl Recorder {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    // Validates and normalizes, then inserts. New tasks start as pending.
    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let title = self.clean_title(title)?;

        self.db
            .create_task(NewTask {
                title,
                description: self.clean_description(description),
                due_date,
            })
            .await
    }

    // Only the fields that are given get touched
    pub async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
        status: Option<TaskStatus>,
    ) -> Result<Task> {
        let title = title.map(|t| self.clean_title(t)).transpose()?;

        self.db
            .update_task(
                id,
                TaskUpdate {
                    title,
                    description: self.clean_description(description),
                    status,
                },
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.db.delete_task(id).await
    }

    fn clean_title(&self, title: &str) -> Result<String> {
        let sanitized = self.sanitize(title);

        if sanitized.is_empty() {
            return Err(TaskError::InvalidTask("empty title".to_string()));
        }

        if sanitized.chars().count() > MAX_TITLE_LENGTH {
            return Err(TaskError::TitleTooLong(MAX_TITLE_LENGTH));
        }

        Ok(sanitized)
    }

    // Blank descriptions are stored as absent
    fn clean_description(&self, description: Option<&str>) -> Option<String> {
        description
            .map(|d| d.replace('\0', "").trim().to_string())
            .filter(|d| !d.is_empty())
    }

    /// Sanitize a title
    ///
    /// - Removes null bytes
    /// - Normalizes whitespace (runs collapse to a single space)
    fn sanitize(&self, text: &str) -> String {
        text.replace('\0', "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
