/// Task corpus as the engine sees it
///
/// Wraps an ordered slice of tasks with their derived combined texts. The
/// engine only reads title, description and due date; ids and status are
/// the caller's business.

use crate::db::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A suggested follow-up task
///
/// Carries no record of which signal produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<&Task> for SuggestedTask {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
        }
    }
}

/// Ordered tasks plus their combined texts
pub struct Corpus<'a> {
    tasks: &'a [Task],
    texts: Vec<String>,
}

impl<'a> Corpus<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        let texts = tasks.iter().map(Task::combined_text).collect();
        Self { tasks, texts }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &'a [Task] {
        self.tasks
    }

    /// Combined texts in corpus order
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// The text that follows position `index`, if any
    ///
    /// This is the history shifted by one; the last task has no successor.
    pub fn successor(&self, index: usize) -> Option<&str> {
        self.texts.get(index + 1).map(String::as_str)
    }

    /// First position whose combined text equals `text`
    pub fn first_index_of(&self, text: &str) -> Option<usize> {
        self.texts.iter().position(|t| t == text)
    }

    /// Fresh suggestion built from the task at `index`
    pub fn suggestion(&self, index: usize) -> Option<SuggestedTask> {
        self.tasks.get(index).map(SuggestedTask::from)
    }
}
