//! Vehicle capability interfaces
//!
//! Every adapter implements [`Vehicle`]. Optional capabilities are exposed
//! through accessor methods returning `Option<&dyn ...>`: an adapter that was
//! not granted a capability returns `None`, so there is nothing to call.

use crate::config::VehicleMeta;
use crate::error::Result;

/// Vehicle charge status (IEC 61851 letters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeStatus {
    /// Not connected
    #[default]
    Disconnected,
    /// Plugged in, not charging
    Connected,
    /// Charging
    Charging,
}

impl ChargeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "A",
            Self::Connected => "B",
            Self::Charging => "C",
        }
    }
}

impl std::fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base vehicle interface
#[async_trait::async_trait]
pub trait Vehicle: Send + Sync {
    /// Static metadata from configuration
    fn meta(&self) -> &VehicleMeta;

    /// State of charge in percent
    async fn soc(&self) -> Result<f64>;

    /// Remaining range, if the vehicle reports it
    fn as_range(&self) -> Option<&dyn VehicleRange> {
        None
    }

    /// Charge status, if granted
    fn as_charge_state(&self) -> Option<&dyn ChargeState> {
        None
    }

    /// Odometer, if granted
    fn as_odometer(&self) -> Option<&dyn VehicleOdometer> {
        None
    }

    /// Remote start/stop, if granted
    fn as_charge_controller(&self) -> Option<&dyn ChargeController> {
        None
    }
}

/// Remaining range in provider units
#[async_trait::async_trait]
pub trait VehicleRange: Send + Sync {
    async fn range(&self) -> Result<i64>;
}

/// Charge/plug state
#[async_trait::async_trait]
pub trait ChargeState: Send + Sync {
    async fn status(&self) -> Result<ChargeStatus>;
}

/// Odometer reading in provider units
#[async_trait::async_trait]
pub trait VehicleOdometer: Send + Sync {
    async fn odometer(&self) -> Result<f64>;
}

/// Remote charge start/stop
#[async_trait::async_trait]
pub trait ChargeController: Send + Sync {
    async fn start_charge(&self) -> Result<()>;
    async fn stop_charge(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SocOnly(VehicleMeta);

    #[async_trait::async_trait]
    impl Vehicle for SocOnly {
        fn meta(&self) -> &VehicleMeta {
            &self.0
        }

        async fn soc(&self) -> Result<f64> {
            Ok(42.0)
        }
    }

    #[tokio::test]
    async fn optional_capabilities_default_to_absent() {
        let v = SocOnly(VehicleMeta::default());
        assert_eq!(v.soc().await.unwrap(), 42.0);
        assert!(v.as_range().is_none());
        assert!(v.as_charge_state().is_none());
        assert!(v.as_odometer().is_none());
        assert!(v.as_charge_controller().is_none());
    }

    #[test]
    fn charge_status_letters() {
        assert_eq!(ChargeStatus::default(), ChargeStatus::Disconnected);
        assert_eq!(ChargeStatus::Connected.as_str(), "B");
        assert_eq!(ChargeStatus::Charging.to_string(), "C");
    }
}
