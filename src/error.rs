/// Error types for taskmind
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.
///
/// The suggestion engine itself never fails: an empty corpus or a weak
/// sequence signal is a normal (empty or partial) result, not an error.

use thiserror::Error;

/// Main error type for taskmind operations
#[derive(Error, Debug)]
pub enum TaskError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No task with this id
    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    /// Task content failed validation
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// Title exceeds maximum length
    #[error("Task title exceeds maximum allowed length of {0} characters")]
    TitleTooLong(usize),

    /// Caller supplied an argument outside the accepted set
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for taskmind operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// Convert TaskError to a user-friendly error message
impl TaskError {
    pub fn user_message(&self) -> String {
        match self {
            TaskError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            TaskError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            TaskError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            TaskError::TaskNotFound(id) => {
                format!("Task {} not found", id)
            }
            TaskError::InvalidTask(reason) => {
                format!("Invalid task: {}", reason)
            }
            TaskError::TitleTooLong(max) => {
                format!("Task title exceeds maximum length of {} characters", max)
            }
            TaskError::InvalidArgument(msg) => {
                format!("Invalid argument: {}", msg)
            }
            TaskError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }
}
