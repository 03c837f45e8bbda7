//! # tronity-vehicle - Tronity cloud vehicle adapter
//!
//! Reads state of charge, range, odometer and plug/charge status of an
//! electric vehicle through the Tronity platform API and starts or stops
//! charging remotely.
//!
//! ## Features
//!
//! - **OAuth2**: app flow from client credentials or user flow from a stored
//!   token pair, refreshed transparently (including on 401)
//! - **Scope gating**: status, odometer and charge control exist on the
//!   adapter only when the vehicle's OAuth scopes grant them
//! - **Consistent telemetry**: one TTL-cached, single-flight fetch of the
//!   vehicle's last record backs every read
//! - **Configuration**: YAML-based configuration with validation
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `error`: Error types
//! - `vehicle`: Vehicle capability traits
//! - `cache`: TTL-memoized values
//! - `registry`: Vehicle type registry
//! - `tronity`: Tronity API adapter

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod tronity;
pub mod vehicle;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, VehicleError};
pub use registry::{AdapterContext, Registry};
pub use tronity::Tronity;
pub use vehicle::{ChargeStatus, Vehicle};
