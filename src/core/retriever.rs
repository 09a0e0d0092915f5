/// Task retriever
///
/// Handles fetching tasks from database with various filters.

use crate::db::{Database, Task, TaskQuery};
use crate::error::{Result, TaskError};
use std::sync::Arc;

/// Handles task retrieval operations
pub struct Retriever {
    db: Arc<Database>,
}

impl Retriever {
    /// Create a new retriever instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// List tasks matching a filter, in the requested order
    pub async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        self.db.list_tasks(query).await
    }

    /// Get task by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        self.db.get_task(id).await
    }

    /// Get task by ID, treating absence as an error
    pub async fn require(&self, id: i64) -> Result<Task> {
        self.get_by_id(id)
            .await?
            .ok_or(TaskError::TaskNotFound(id))
    }
}
