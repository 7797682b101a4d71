//! Main application configuration
//!
//! This module defines the top-level configuration for the team balancer,
//! including environment variable loading, TOML files and validation.

use crate::config::{PartitionConfig, RatingConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub partition: PartitionConfig,
    pub rating: RatingConfig,
    pub history: HistorySettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Directory holding users.json and matches.json
    pub data_dir: PathBuf,
}

/// Match history display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Matches shown when no count is given
    pub default_count: usize,
    /// How many of the most recent matches may be edited (0 for no limit)
    pub editable_recent: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "team-balancer".to_string(),
            log_level: "info".to_string(),
            data_dir: PathBuf::from("."),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            default_count: 5,
            editable_recent: 8,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::parse_toml(&contents)?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse a TOML document; missing sections and keys fall back to defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config = Self::parse_toml(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    fn parse_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| anyhow!("Invalid configuration: {}", e))
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(data_dir) = env::var("DATA_DIR") {
            self.service.data_dir = PathBuf::from(data_dir);
        }

        // Partition settings
        if let Ok(max) = env::var("MAX_PARTICIPANTS") {
            self.partition.max_participants = max
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_PARTICIPANTS value: {}", max))?;
        }
        if let Ok(teams) = env::var("DEFAULT_TEAM_COUNT") {
            self.partition.default_team_count = teams
                .parse()
                .map_err(|_| anyhow!("Invalid DEFAULT_TEAM_COUNT value: {}", teams))?;
        }
        if let Ok(nodes) = env::var("MAX_SEARCH_NODES") {
            self.partition.max_search_nodes = nodes
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_SEARCH_NODES value: {}", nodes))?;
        }

        // Rating settings
        if let Ok(k) = env::var("RATING_K_FACTOR") {
            self.rating.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_K_FACTOR value: {}", k))?;
        }
        if let Ok(alpha) = env::var("RATING_ALPHA") {
            self.rating.alpha = alpha
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_ALPHA value: {}", alpha))?;
        }
        if let Ok(scale) = env::var("RATING_ELO_SCALE") {
            self.rating.elo_scale = scale
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_ELO_SCALE value: {}", scale))?;
        }

        // History settings
        if let Ok(count) = env::var("HISTORY_DEFAULT_COUNT") {
            self.history.default_count = count
                .parse()
                .map_err(|_| anyhow!("Invalid HISTORY_DEFAULT_COUNT value: {}", count))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.partition.validate()?;
    config.rating.validate()?;

    if config.history.default_count == 0 {
        return Err(anyhow!("Default history count must be greater than 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.partition.max_participants, 25);
        assert_eq!(config.history.editable_recent, 8);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [service]
            log_level = "debug"

            [rating]
            k_factor = 8.0
            "#,
        )
        .unwrap();

        assert_eq!(config.service.log_level, "debug");
        assert_eq!(config.service.name, "team-balancer");
        assert_eq!(config.rating.k_factor, 8.0);
        assert_eq!(config.rating.alpha, 0.6);
        assert_eq!(config.partition.default_team_count, 2);
    }

    #[test]
    fn test_env_override_repairs_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balancer.toml");
        std::fs::write(&path, "[rating]\nelo_scale = -1.0\n").unwrap();

        // Only this test touches RATING_ELO_SCALE
        env::set_var("RATING_ELO_SCALE", "250.0");
        let result = AppConfig::from_file(&path);
        env::remove_var("RATING_ELO_SCALE");

        let config = result.unwrap();
        assert_eq!(config.rating.elo_scale, 250.0);

        // Without the override the file value is still rejected
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AppConfig::from_toml_str("[service]\nlog_level = \"loud\"").is_err());
        assert!(AppConfig::from_toml_str("[rating]\nalpha = -0.5").is_err());
        assert!(AppConfig::from_toml_str("[history]\ndefault_count = 0").is_err());
    }
}
