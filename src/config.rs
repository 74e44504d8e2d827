//! Environment-backed settings.
//!
//! `.env` is loaded (if present) before reading variables, so a project-local
//! file can point the dashboard at a different dataset.

use std::path::PathBuf;

pub const DATA_PATH_VAR: &str = "TRAVEL_DATA_PATH";
pub const LOG_DIR_VAR: &str = "TRAVEL_LOG_DIR";

pub const DEFAULT_DATA_PATH: &str = "Travel details dataset.csv";
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(
            std::env::var(DATA_PATH_VAR).ok(),
            std::env::var(LOG_DIR_VAR).ok(),
        )
    }

    fn from_vars(data_path: Option<String>, log_dir: Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            data_path: non_empty(data_path)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            log_dir: non_empty(log_dir)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        }
    }

    /// Dataset path, preferring an explicit `--file`.
    pub fn data_path_or(&self, explicit: Option<&PathBuf>) -> PathBuf {
        explicit.cloned().unwrap_or_else(|| self.data_path.clone())
    }
}
