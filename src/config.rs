//! Server configuration from the environment.
//!
//! `HOST` (default 0.0.0.0), `PORT` (default 8080), `BRACKET_SIZE` (default 16,
//! used when a tournament is created without one) and `RANKING_RULE`
//! (`sequential` or `points`, default sequential).

use crate::logic::RankingRule;
use crate::models::{is_valid_bracket_size, DEFAULT_BRACKET_SIZE};

/// Invalid value in an environment variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => write!(f, "Invalid value for {}: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub bracket_size: usize,
    pub ranking_rule: RankingRule,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            bracket_size: DEFAULT_BRACKET_SIZE,
            ranking_rule: RankingRule::Sequential,
        }
    }
}

impl ServerConfig {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup("HOST") {
            cfg.host = host;
        }
        if let Some(port) = lookup("PORT") {
            cfg.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(size) = lookup("BRACKET_SIZE") {
            cfg.bracket_size = size
                .trim()
                .parse()
                .ok()
                .filter(|s| is_valid_bracket_size(*s))
                .ok_or_else(|| ConfigError::Invalid {
                    key: "BRACKET_SIZE",
                    value: size.clone(),
                })?;
        }
        if let Some(rule) = lookup("RANKING_RULE") {
            cfg.ranking_rule = rule.parse().map_err(|_| ConfigError::Invalid {
                key: "RANKING_RULE",
                value: rule.clone(),
            })?;
        }
        Ok(cfg)
    }
}
