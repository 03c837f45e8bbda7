//! Tronity platform integration
//!
//! Tronity aggregates many vehicle brands behind one OAuth2-protected REST
//! API. The adapter authenticates either as an application or with a stored
//! user token pair, selects one vehicle of the account and exposes only the
//! capabilities the vehicle's scopes grant.

pub mod adapter;
pub mod auth;
pub mod client;
pub mod types;

pub use adapter::{Capabilities, Tronity, resolve, vehicles};
pub use auth::{Token, TokenMode, TokenSource};
pub use client::AuthenticatedClient;
pub use types::{Bulk, Vehicle as TronityVehicle};

use crate::config::TronityConfig;
use crate::error::VehicleError;
use crate::registry::{AdapterContext, VehicleFuture};
use crate::vehicle::Vehicle;

/// Registry constructor for `type: tronity`
pub fn new_from_config(other: serde_yaml::Value, ctx: AdapterContext) -> VehicleFuture {
    Box::pin(async move {
        let cfg = TronityConfig::from_value(other)?;
        let vehicle = Tronity::new(cfg, &ctx).await?;
        Ok::<Box<dyn Vehicle>, VehicleError>(Box::new(vehicle))
    })
}
