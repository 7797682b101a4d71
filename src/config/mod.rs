//! Configuration management for the team balancer
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and the default tuning constants.

pub mod app;
pub mod partition;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, HistorySettings, ServiceSettings};
pub use partition::PartitionConfig;
pub use rating::RatingConfig;
