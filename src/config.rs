//! Runtime configuration from the environment

use crate::splitter::{DelimiterError, Delimiters, DEFAULT_CLOSE, DEFAULT_OPEN};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid delimiters: {0}")]
    Delimiters(#[from] DelimiterError),
    #[error("Invalid THINKSTREAM_PORT value: {0}")]
    Port(String),
}

/// Settings shared by the CLI and the HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub open_tag: String,
    pub close_tag: String,
    pub history_path: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("THINKSTREAM_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Port(raw))?,
            None => DEFAULT_PORT,
        };

        let history_path = lookup("THINKSTREAM_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".thinkstream").join("history.json")
            });

        let config = Self {
            open_tag: lookup("THINKSTREAM_OPEN_TAG")
                .unwrap_or_else(|| DEFAULT_OPEN.to_string()),
            close_tag: lookup("THINKSTREAM_CLOSE_TAG")
                .unwrap_or_else(|| DEFAULT_CLOSE.to_string()),
            history_path,
            port,
        };
        config.delimiters()?;
        Ok(config)
    }

    pub fn delimiters(&self) -> Result<Delimiters, DelimiterError> {
        Delimiters::new(self.open_tag.clone(), self.close_tag.clone())
    }
}
