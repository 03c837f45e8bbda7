//! Vehicle adapter registry
//!
//! Maps vehicle type names to constructors. The table is built once at
//! startup with [`Registry::with_defaults`] and handed to whoever creates
//! vehicles; there is no process-wide registration.

use crate::error::{Result, VehicleError};
use crate::logging::{StructuredLogger, get_logger};
use crate::vehicle::Vehicle;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future returned by adapter constructors
pub type VehicleFuture = Pin<Box<dyn Future<Output = Result<Box<dyn Vehicle>>> + Send>>;

/// Adapter constructor taking the raw config entry
pub type Constructor = fn(serde_yaml::Value, AdapterContext) -> VehicleFuture;

/// Process-level settings passed to every constructor
#[derive(Debug, Clone)]
pub struct AdapterContext {
    /// Cache TTL used when an adapter does not configure one
    pub default_cache: Duration,

    /// Whether a valid sponsorship is present
    pub sponsored: bool,
}

impl AdapterContext {
    pub fn new(default_cache: Duration) -> Self {
        Self {
            default_cache,
            sponsored: false,
        }
    }

    pub fn with_sponsor(mut self, sponsored: bool) -> Self {
        self.sponsored = sponsored;
        self
    }
}

/// Table of known vehicle types
pub struct Registry {
    constructors: BTreeMap<String, Constructor>,
    logger: StructuredLogger,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
            logger: get_logger("registry"),
        }
    }

    /// Registry with all built-in adapters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.add("tronity", crate::tronity::new_from_config);
        registry
    }

    /// Register a constructor; type names are case-insensitive
    pub fn add(&mut self, name: &str, constructor: Constructor) {
        self.constructors.insert(name.to_lowercase(), constructor);
    }

    /// Registered type names
    pub fn types(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Look up a constructor
    pub fn get(&self, name: &str) -> Result<Constructor> {
        self.constructors
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| VehicleError::UnknownProvider {
                name: name.to_string(),
            })
    }

    /// Create a vehicle of the given type
    pub async fn create(
        &self,
        name: &str,
        other: serde_yaml::Value,
        ctx: &AdapterContext,
    ) -> Result<Box<dyn Vehicle>> {
        let constructor = self.get(name)?;
        self.logger.debug(&format!("creating {} vehicle", name));
        constructor(other, ctx.clone()).await
    }

    /// Create a vehicle from a config entry carrying its own `type` field
    pub async fn create_from_entry(
        &self,
        entry: serde_yaml::Value,
        ctx: &AdapterContext,
    ) -> Result<Box<dyn Vehicle>> {
        let name = entry
            .get("type")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or_else(|| VehicleError::validation("type", "Missing vehicle type"))?;
        self.create(&name, entry, ctx).await
    }
}
