use thiserror::Error;

use std::time::Duration;

use crate::blockchain::ledger::DEFAULT_DIFFICULTY;

/// Errors that can occur while reading the node configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for a running node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Address to bind the HTTP server to
    pub host: String,

    /// Port to bind the HTTP server to
    pub port: u16,

    /// Initial proof difficulty
    pub difficulty: usize,

    /// Upper bound on a single proof search, if any
    pub mine_timeout: Option<Duration>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            difficulty: DEFAULT_DIFFICULTY,
            mine_timeout: None,
        }
    }
}

impl NodeConfig {
    /// Loads the configuration from the process environment
    ///
    /// A `.env` file in the working directory is read first if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a key lookup
    ///
    /// Recognised keys are `HOST`, `PORT`, `DIFFICULTY` and
    /// `MINE_TIMEOUT_SECS`. Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = NodeConfig::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse("PORT", port)?;
        }
        if let Some(difficulty) = lookup("DIFFICULTY") {
            config.difficulty = parse("DIFFICULTY", difficulty)?;
        }
        if let Some(timeout) = lookup("MINE_TIMEOUT_SECS") {
            config.mine_timeout = Some(Duration::from_secs(parse("MINE_TIMEOUT_SECS", timeout)?));
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
