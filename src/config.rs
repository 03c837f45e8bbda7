//! Configuration management
//!
//! The process configuration is a YAML file holding logging settings, the
//! polling interval and a `vehicles` map. Each vehicle entry is kept as a raw
//! YAML value and decoded by the adapter registered for its `type`.

use crate::error::{Result, VehicleError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

mod defaults;

/// Base URI of the Tronity platform API
pub const TRONITY_URI: &str = "https://api.tronity.tech";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Polling interval in milliseconds, also the default telemetry cache TTL
    pub poll_interval_ms: u64,

    /// Sponsor token; adapters that require sponsorship refuse to start without it
    pub sponsor_token: String,

    /// Vehicle entries keyed by name, each carrying a `type` field
    pub vehicles: BTreeMap<String, serde_yaml::Value>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file or log directory
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Tronity adapter configuration, decoded from one `vehicles` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TronityConfig {
    /// Common vehicle metadata
    #[serde(flatten)]
    pub meta: VehicleMeta,

    /// OAuth2 client credentials
    pub credentials: ClientCredentials,

    /// Optional pre-issued token pair; app flow is used when absent
    pub tokens: Tokens,

    /// VIN of the vehicle to select; empty selects the only vehicle
    pub vin: String,

    /// Telemetry cache TTL in milliseconds; defaults to the poll interval
    pub cache_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Provider endpoints
    pub endpoints: TronityEndpoints,
}

/// Metadata shared by all vehicle types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VehicleMeta {
    /// Display title
    pub title: String,

    /// Battery capacity in kWh
    pub capacity: f64,

    /// Number of phases the on-board charger uses
    pub phases: Option<u8>,

    /// RFID or other identifiers mapped to this vehicle
    pub identifiers: Vec<String>,

    /// UI icon name
    pub icon: String,
}

/// OAuth2 client credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientCredentials {
    pub id: String,
    pub secret: String,
}

/// Stored OAuth2 token pair from a previous code-flow grant
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

/// Tronity endpoints, overridable for sandboxes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TronityEndpoints {
    /// API root, without trailing slash
    pub uri: String,

    /// OAuth2 token endpoint
    pub token_url: String,
}

impl ClientCredentials {
    /// Check both halves are present
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(VehicleError::config("missing credentials id"));
        }
        if self.secret.trim().is_empty() {
            return Err(VehicleError::config("missing credentials secret"));
        }
        Ok(())
    }
}

impl Tokens {
    /// Whether a usable pair was supplied
    pub fn is_present(&self) -> bool {
        !self.refresh.trim().is_empty()
    }
}

impl TronityConfig {
    /// Decode from a raw `vehicles` entry
    pub fn from_value(value: serde_yaml::Value) -> Result<Self> {
        Ok(serde_yaml::from_value(value)?)
    }

    /// VIN to match, if one is configured
    pub fn vin(&self) -> Option<&str> {
        if self.vin.is_empty() {
            None
        } else {
            Some(self.vin.as_str())
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = [
            "tronity_config.yaml",
            "/data/tronity_config.yaml",
            "/etc/tronity-vehicle/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(VehicleError::validation(
                "poll_interval_ms",
                "Must be greater than 0",
            ));
        }

        for (name, entry) in &self.vehicles {
            let has_type = entry
                .get("type")
                .and_then(|t| t.as_str())
                .is_some_and(|t| !t.trim().is_empty());
            if !has_type {
                return Err(VehicleError::validation(
                    format!("vehicles.{}.type", name),
                    "Missing vehicle type".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
poll_interval_ms: 60000
sponsor_token: abc
vehicles:
  ioniq:
    type: tronity
    title: Ioniq 5
    capacity: 77.4
    credentials:
      id: client-id
      secret: client-secret
    vin: KMHKM81CPNU000001
    cache_ms: 30000
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval_ms, 300_000);
        assert!(config.vehicles.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_sample_config() {
        let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.poll_interval_ms, 60_000);
        assert_eq!(config.logging.level, "INFO");
        assert!(config.validate().is_ok());

        let entry = config.vehicles.get("ioniq").cloned().unwrap();
        let tronity = TronityConfig::from_value(entry).unwrap();
        assert_eq!(tronity.meta.title, "Ioniq 5");
        assert_eq!(tronity.meta.capacity, 77.4);
        assert_eq!(tronity.credentials.id, "client-id");
        assert_eq!(tronity.vin(), Some("KMHKM81CPNU000001"));
        assert_eq!(tronity.cache_ms, Some(30_000));
        assert_eq!(tronity.timeout_ms, 10_000);
        assert_eq!(tronity.endpoints.uri, TRONITY_URI);
        assert!(!tronity.tokens.is_present());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.vehicles.insert(
            "car".to_string(),
            serde_yaml::from_str("title: untyped").unwrap(),
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vehicles.car.type"));
    }

    #[test]
    fn test_credentials_validation() {
        let mut creds = ClientCredentials::default();
        assert!(creds.validate().unwrap_err().to_string().contains("id"));
        creds.id = "id".to_string();
        assert!(creds.validate().unwrap_err().to_string().contains("secret"));
        creds.secret = "secret".to_string();
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_tokens_presence() {
        let mut tokens = Tokens::default();
        assert!(!tokens.is_present());
        tokens.access = "access".to_string();
        assert!(!tokens.is_present());
        tokens.refresh = "refresh".to_string();
        assert!(tokens.is_present());
    }
}
