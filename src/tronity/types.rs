use crate::vehicle::ChargeStatus;
use serde::Deserialize;

/// Scope granting read access to charge state
pub const READ_CHARGE: &str = "read_charge";
/// Scope granting read access to the odometer
pub const READ_ODOMETER: &str = "read_odometer";
/// Scope granting remote charge start/stop
pub const WRITE_CHARGE_START_STOP: &str = "write_charge_start_stop";

/// Charging indicator value signalling an active charge
pub const CHARGING: &str = "Charging";

/// Vehicle record from the vehicle list
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Vehicle {
    pub id: String,
    pub vin: String,
    pub scopes: Vec<String>,
}

impl Vehicle {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// Vehicle list response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Vehicles {
    pub data: Vec<Vehicle>,
}

/// Last record of a vehicle (bulk telemetry)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Bulk {
    pub level: f64,
    pub range: f64,
    pub odometer: f64,
    pub charging: String,
    pub plugged: bool,
}

impl Bulk {
    /// Derive the charge status; an active charge beats the plug flag
    pub fn charge_status(&self) -> ChargeStatus {
        if self.charging == CHARGING {
            ChargeStatus::Charging
        } else if self.plugged {
            ChargeStatus::Connected
        } else {
            ChargeStatus::Disconnected
        }
    }

    /// Range truncated to whole provider units
    pub fn range_units(&self) -> i64 {
        self.range as i64
    }
}
