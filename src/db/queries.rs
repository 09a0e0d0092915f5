/// SQL query functions for database operations
///
/// All queries use sqlx for type safety.

use crate::db::models::*;
use crate::db::Database;
use crate::error::{Result, TaskError};
use chrono::Utc;

impl Database {
    /// Insert a new task
    ///
    /// New tasks always start as pending, stamped with the current time.
    ///
    /// # Arguments
    /// * `input` - Task input data (already validated)
    ///
    /// # Returns
    /// * `Ok(Task)` - The stored task
    /// * `Err(TaskError)` - If database operation fails
    pub async fn create_task(&self, input: NewTask) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, created_at, due_date, status)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(Utc::now())
        .bind(input.due_date)
        .bind(TaskStatus::Pending)
        .fetch_one(self.pool())
        .await?;

        tracing::info!(id = task.id, title = %task.title, "task created");

        Ok(task)
    }

    /// List tasks with an optional status filter
    ///
    /// Rows that tie on the sort column come back in insertion (id) order,
    /// so the sequence seen by the suggestion engine is reproducible.
    ///
    /// # Arguments
    /// * `query` - Status filter, sort column and direction
    pub async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        // Column and direction come from closed enums, never from user text
        let order_clause = format!(
            "ORDER BY {} {}, id ASC",
            query.sort_by.column(),
            query.order.keyword()
        );

        let tasks = if let Some(status) = query.status {
            sqlx::query_as::<_, Task>(&format!(
                "SELECT * FROM tasks WHERE status = ? {}",
                order_clause
            ))
            .bind(status)
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, Task>(&format!("SELECT * FROM tasks {}", order_clause))
                .fetch_all(self.pool())
                .await?
        };

        Ok(tasks)
    }

    /// Get task by ID
    pub async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(task)
    }

    /// Apply a partial update
    ///
    /// # Returns
    /// * `Ok(Task)` - The task after the update
    /// * `Err(TaskError::TaskNotFound)` - If no task has this id
    pub async fn update_task(&self, id: i64, update: TaskUpdate) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                status = COALESCE(?, status)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(update.title)
        .bind(update.description)
        .bind(update.status)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        task.ok_or(TaskError::TaskNotFound(id))
    }

    /// Delete a task
    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskError::TaskNotFound(id));
        }

        tracing::info!(id, "task deleted");

        Ok(())
    }
}
