use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration or building the task list.
///
/// These are the only errors that surface out of supervisor construction;
/// everything that fails at runtime is contained by the restart loop.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid forwarding spec: {0}")]
    InvalidSpec(String),
    #[error("unknown mode: {0}")]
    UnknownMode(String),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Forwarding direction, mirroring ssh's `-L`/`-R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Mode {
    Local,
    Remote,
}

impl Mode {
    /// The ssh direction flag for this mode.
    pub const fn flag(self) -> char {
        match self {
            Mode::Local => 'L',
            Mode::Remote => 'R',
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "local" | "L" => Ok(Mode::Local),
            "remote" | "R" => Ok(Mode::Remote),
            _ => Err(ConfigError::UnknownMode(value)),
        }
    }
}

/// The ssh endpoint every tunnel connects to.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub host: String,
    pub user: String,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
}

/// Parsed configuration, created once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mode: Mode,
    /// Connect timeout for reachability probes, in seconds.
    #[serde(rename = "timeout", default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub remote: RemoteConfig,
    /// Raw colon-delimited forwarding specs, in supervision order.
    pub forwarding_list: Vec<String>,
}

impl Config {
    /// Loads a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_ssh_port() -> u16 {
    22
}

fn default_timeout_secs() -> u64 {
    2
}
