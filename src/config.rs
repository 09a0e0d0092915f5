// Where the database lives and how many suggestions to hand back by default.
//
// Everything comes from the environment. There's no config file.

use crate::error::{Result, TaskError};
use std::env;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "TASKMIND_DB";
pub const LIMIT_VAR: &str = "TASKMIND_LIMIT";

// Same default budget the old HTTP endpoint used
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub default_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_values(env::var(DB_PATH_VAR).ok(), env::var(LIMIT_VAR).ok())
    }

    // Split out so tests don't have to touch the process environment
    fn from_values(db_path: Option<String>, limit: Option<String>) -> Result<Self> {
        let db_path = match db_path.filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => {
                let home = dirs::home_dir().ok_or_else(|| {
                    TaskError::Config(format!(
                        "could not find home directory; set {} instead",
                        DB_PATH_VAR
                    ))
                })?;
                home.join(".taskmind").join("tasks.db")
            }
        };

        let default_limit = match limit {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                TaskError::Config(format!("{} must be a non-negative integer, got '{}'", LIMIT_VAR, raw))
            })?,
            None => DEFAULT_LIMIT,
        };

        Ok(Self {
            db_path,
            default_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values() {
        let config =
            Config::from_values(Some("/tmp/t.db".to_string()), Some("3".to_string())).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/t.db"));
        assert_eq!(config.default_limit, 3);
    }

    #[test]
    fn test_default_limit() {
        let config = Config::from_values(Some("/tmp/t.db".to_string()), None).unwrap();
        assert_eq!(config.default_limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_bad_limit() {
        let err = Config::from_values(Some("/tmp/t.db".to_string()), Some("-1".to_string()))
            .unwrap_err();
        assert!(matches!(err, TaskError::Config(_)));
    }
}
