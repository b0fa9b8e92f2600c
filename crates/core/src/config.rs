//! Configuration structures for the supply-pulse system.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Aggregation engine configuration.
    pub engine: EngineConfig,
    /// Row mapping configuration.
    pub ingestion: IngestionConfig,
}

impl Config {
    /// Parse a JSON document. Missing sections and fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.engine.fulfilled_statuses.is_empty() {
            return Err(Error::config("fulfilled_statuses must not be empty"));
        }
        if self.engine.delivered_status.trim().is_empty() {
            return Err(Error::config("delivered_status must not be blank"));
        }
        if self.engine.cycle_time_decimals > MAX_DECIMALS {
            return Err(Error::config(format!(
                "cycle_time_decimals must be at most {MAX_DECIMALS}, got {}",
                self.engine.cycle_time_decimals
            )));
        }
        Ok(())
    }
}

const MAX_DECIMALS: u32 = 6;

/// Ordering of the status-distribution chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusOrder {
    /// Order of first occurrence in the input.
    #[default]
    FirstSeen,
    /// Descending count, ties broken alphabetically.
    CountDesc,
}

/// Aggregation engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Order statuses counted as fulfilled (fill rate, turnover numerator).
    pub fulfilled_statuses: Vec<String>,
    /// Order status eligible for cycle time.
    pub delivered_status: String,
    /// Location label substituted for blank inventory locations.
    pub unknown_location: String,
    /// Status chart ordering.
    pub status_order: StatusOrder,
    /// Decimals kept in the cycle time.
    pub cycle_time_decimals: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fulfilled_statuses: vec!["Shipped".to_string(), "Delivered".to_string()],
            delivered_status: "Delivered".to_string(),
            unknown_location: "Unknown".to_string(),
            status_order: StatusOrder::FirstSeen,
            cycle_time_decimals: 1,
        }
    }
}

impl EngineConfig {
    /// Is this status a fulfilled one? Exact, case-sensitive match.
    pub fn is_fulfilled(&self, status: &str) -> bool {
        self.fulfilled_statuses.iter().any(|s| s == status)
    }
}

/// Row mapping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Trim, lower-case and snake_case column names before matching.
    pub normalize_headers: bool,
    /// Record type assumed when a row carries none.
    pub default_record_type: String,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            normalize_headers: true,
            default_record_type: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.fulfilled_statuses, vec!["Shipped", "Delivered"]);
        assert_eq!(config.engine.unknown_location, "Unknown");
        assert_eq!(config.engine.status_order, StatusOrder::FirstSeen);
        assert_eq!(config.engine.cycle_time_decimals, 1);
        assert!(config.ingestion.normalize_headers);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json_str(r#"{"engine": {"status_order": "count_desc"}}"#).unwrap();
        assert_eq!(config.engine.status_order, StatusOrder::CountDesc);
        assert_eq!(config.engine.delivered_status, "Delivered");
        assert_eq!(config.ingestion.default_record_type, "");
    }

    #[test]
    fn test_validation_failures() {
        let err = Config::from_json_str(r#"{"engine": {"fulfilled_statuses": []}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_json_str(r#"{"engine": {"delivered_status": "  "}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_json_str(r#"{"engine": {"cycle_time_decimals": 9}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json_str("{engine").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_path("/nonexistent/supply-pulse.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_is_fulfilled_is_exact() {
        let engine = EngineConfig::default();
        assert!(engine.is_fulfilled("Shipped"));
        assert!(engine.is_fulfilled("Delivered"));
        assert!(!engine.is_fulfilled("shipped"));
        assert!(!engine.is_fulfilled("Processing"));
    }
}
