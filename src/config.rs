// Dashboard configuration: defaults < JSON file < environment < CLI flags

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::data::{DataSource, DEFAULT_SOURCE};
use crate::RenderOptions;

pub const DATA_ENV: &str = "ALCODASH_DATA";
pub const SECRET_ENV: &str = "SECRET_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_source")]
    pub data_source: String,
    #[serde(default)]
    pub render: RenderOptions,
    /// Kept for parity with the hosted dashboard; nothing reads it yet.
    #[serde(default = "default_secret")]
    pub secret_key: String,
}

fn default_source() -> String { DEFAULT_SOURCE.to_string() }
fn default_secret() -> String { "my-secret-key".to_string() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_source: default_source(),
            render: RenderOptions::default(),
            secret_key: default_secret(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Defaults, then the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides through `lookup` so tests need not touch the real environment.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup(DATA_ENV).filter(|s| !s.is_empty()) {
            self.data_source = source;
        }
        if let Some(secret) = lookup(SECRET_ENV) {
            self.secret_key = secret;
        }
        self
    }

    pub fn source(&self) -> DataSource {
        DataSource::parse(&self.data_source)
    }
}
