use std::path::{Path, PathBuf};

use anyhow::Context;
use gymtracker_domain as domain;

/// Start-up options of the application.
///
/// User preferences are not part of the configuration, they are kept in the database.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Database file, an in-memory database is used if absent.
    pub database: Option<PathBuf>,
    /// File keeping the most recent log entries.
    pub log_file: Option<PathBuf>,
    pub rest_seconds: u32,
    pub seed_catalog: bool,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse configuration {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            log_file: None,
            rest_seconds: domain::DEFAULT_REST_SECONDS,
            seed_catalog: true,
        }
    }
}
