//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Tunables the source variants disagreed on (history window, pool
//! sizes, attempt ceilings, politeness delay) live here rather than
//! as hardcoded constants.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub generator: GeneratorSettings,
    pub source: SourceConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    pub name: String,
    /// Rounds walked backward when gathering frequency history.
    pub history_window: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorSettings {
    pub batch_size: usize,
    pub high_pool: usize,
    pub low_pool: usize,
    pub min_history: usize,
    pub max_attempts: u32,
    /// Relative weights for sampling 4, 5, or 6 high numbers.
    pub high_count_weights: [u32; 3],
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    /// Cooperative politeness delay between provider calls.
    pub min_interval_secs: u64,
    /// Transport attempts per fetch.
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub path: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
