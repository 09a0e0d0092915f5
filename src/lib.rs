/// taskmind library
///
/// Task tracking with follow-up suggestions mined from your own history.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod intelligence;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::{Result, TaskError};
