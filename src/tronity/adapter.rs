use crate::cache::Cached;
use crate::config::{TronityConfig, VehicleMeta};
use crate::error::{Result, VehicleError};
use crate::logging::{StructuredLogger, get_logger};
use crate::registry::AdapterContext;
use crate::tronity::auth::{TokenMode, TokenSource};
use crate::tronity::client::{AuthenticatedClient, http_client};
use crate::tronity::types::{
    Bulk, READ_CHARGE, READ_ODOMETER, Vehicle as TronityVehicle, Vehicles,
    WRITE_CHARGE_START_STOP,
};
use crate::vehicle::{
    ChargeController, ChargeState, ChargeStatus, Vehicle, VehicleOdometer, VehicleRange,
};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// Optional capabilities granted by the vehicle's OAuth scopes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub charge_state: bool,
    pub odometer: bool,
    pub charge_control: bool,
}

impl Capabilities {
    pub fn from_vehicle(vehicle: &TronityVehicle) -> Self {
        Self {
            charge_state: vehicle.has_scope(READ_CHARGE),
            odometer: vehicle.has_scope(READ_ODOMETER),
            charge_control: vehicle.has_scope(WRITE_CHARGE_START_STOP),
        }
    }
}

/// Select the configured vehicle from the account's vehicle list.
///
/// With a VIN the match is exact; without one the account must hold
/// exactly one vehicle.
pub fn resolve(vin: Option<&str>, vehicles: Vec<TronityVehicle>) -> Result<TronityVehicle> {
    match vin {
        Some(vin) => vehicles
            .into_iter()
            .find(|v| v.vin == vin)
            .ok_or_else(|| VehicleError::vehicle_not_found(format!("no vehicle with vin {}", vin))),
        None => match <[TronityVehicle; 1]>::try_from(vehicles) {
            Ok([vehicle]) => Ok(vehicle),
            Err(list) => Err(VehicleError::vehicle_not_found(format!(
                "{} vehicles available, please specify vin",
                list.len()
            ))),
        },
    }
}

/// List the vehicles of the account
pub async fn vehicles(client: &AuthenticatedClient, uri: &str) -> Result<Vec<TronityVehicle>> {
    let url = format!("{}/tronity/vehicles", uri);
    let res: Vehicles = client.get_json(&url).await?;
    Ok(res.data)
}

// Shared state behind every capability of one adapter instance
struct TronityCore {
    client: AuthenticatedClient,
    uri: String,
    vid: String,
    bulk: Cached<Bulk>,
    logger: StructuredLogger,
}

impl TronityCore {
    async fn bulk(&self) -> Result<Bulk> {
        self.bulk.get(|| self.fetch_bulk()).await
    }

    async fn fetch_bulk(&self) -> Result<Bulk> {
        let url = format!("{}/tronity/vehicles/{}/last_record", self.uri, self.vid);
        self.client.get_json(&url).await.inspect_err(|e| {
            self.logger.warn(&format!("last record failed: {}", e));
        })
    }

    async fn post_action(&self, action: &str) -> Result<()> {
        let url = format!("{}/tronity/vehicles/{}/{}", self.uri, self.vid, action);
        match self.client.post_empty(&url).await {
            // vehicle does not support this command remotely
            Err(VehicleError::Http { status, .. })
                if status == StatusCode::METHOD_NOT_ALLOWED.as_u16() =>
            {
                self.logger.debug(&format!("{} not allowed for vehicle, ignored", action));
                Ok(())
            }
            res => res,
        }
    }
}

struct StatusReader(Arc<TronityCore>);

#[async_trait::async_trait]
impl ChargeState for StatusReader {
    async fn status(&self) -> Result<ChargeStatus> {
        Ok(self.0.bulk().await?.charge_status())
    }
}

struct OdometerReader(Arc<TronityCore>);

#[async_trait::async_trait]
impl VehicleOdometer for OdometerReader {
    async fn odometer(&self) -> Result<f64> {
        Ok(self.0.bulk().await?.odometer)
    }
}

struct ChargeControl(Arc<TronityCore>);

#[async_trait::async_trait]
impl ChargeController for ChargeControl {
    async fn start_charge(&self) -> Result<()> {
        self.0.post_action("start_charging").await
    }

    async fn stop_charge(&self) -> Result<()> {
        self.0.post_action("stop_charging").await
    }
}

/// Tronity vehicle adapter
pub struct Tronity {
    meta: VehicleMeta,
    vehicle: TronityVehicle,
    core: Arc<TronityCore>,
    status: Option<StatusReader>,
    odometer: Option<OdometerReader>,
    control: Option<ChargeControl>,
}

impl Tronity {
    /// Authenticate, resolve the configured vehicle and wire the granted capabilities
    pub async fn new(cfg: TronityConfig, ctx: &AdapterContext) -> Result<Self> {
        cfg.credentials.validate()?;

        if !ctx.sponsored {
            return Err(VehicleError::sponsor_required(
                "tronity requires a sponsor token",
            ));
        }

        let logger = get_logger("tronity")
            .redact([cfg.credentials.id.clone(), cfg.credentials.secret.clone()]);

        let http = http_client(Duration::from_millis(cfg.timeout_ms))?;
        let source = TokenSource::new(
            cfg.credentials.clone(),
            &cfg.tokens,
            cfg.endpoints.token_url.clone(),
            http.clone(),
            logger.clone(),
        );
        let client = AuthenticatedClient::new(http, source, logger.clone());
        if client.token_source().mode() == TokenMode::App {
            logger.debug("no stored tokens, using app flow");
        }

        let uri = cfg.endpoints.uri.trim_end_matches('/').to_string();
        let list = vehicles(&client, &uri).await?;
        let vehicle = resolve(cfg.vin(), list)?;

        let logger = logger.for_vehicle(&vehicle.id);
        let caps = Capabilities::from_vehicle(&vehicle);
        let ttl = cfg
            .cache_ms
            .map(Duration::from_millis)
            .unwrap_or(ctx.default_cache);
        logger.info(&format!(
            "resolved vehicle, scopes: [{}], cache: {:?}",
            vehicle.scopes.join(","),
            ttl
        ));

        let core = Arc::new(TronityCore {
            client,
            uri,
            vid: vehicle.id.clone(),
            bulk: Cached::new(ttl),
            logger,
        });

        Ok(Self::compose(cfg.meta, vehicle, core, caps))
    }

    fn compose(
        meta: VehicleMeta,
        vehicle: TronityVehicle,
        core: Arc<TronityCore>,
        caps: Capabilities,
    ) -> Self {
        Self {
            status: caps.charge_state.then(|| StatusReader(core.clone())),
            odometer: caps.odometer.then(|| OdometerReader(core.clone())),
            control: caps.charge_control.then(|| ChargeControl(core.clone())),
            meta,
            vehicle,
            core,
        }
    }

    /// Provider id of the resolved vehicle
    pub fn vehicle_id(&self) -> &str {
        &self.vehicle.id
    }

    pub fn vin(&self) -> &str {
        &self.vehicle.vin
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            charge_state: self.status.is_some(),
            odometer: self.odometer.is_some(),
            charge_control: self.control.is_some(),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        self.core.bulk.ttl()
    }
}

#[async_trait::async_trait]
impl Vehicle for Tronity {
    fn meta(&self) -> &VehicleMeta {
        &self.meta
    }

    async fn soc(&self) -> Result<f64> {
        Ok(self.core.bulk().await?.level)
    }

    fn as_range(&self) -> Option<&dyn VehicleRange> {
        Some(self)
    }

    fn as_charge_state(&self) -> Option<&dyn ChargeState> {
        self.status.as_ref().map(|s| s as &dyn ChargeState)
    }

    fn as_odometer(&self) -> Option<&dyn VehicleOdometer> {
        self.odometer.as_ref().map(|o| o as &dyn VehicleOdometer)
    }

    fn as_charge_controller(&self) -> Option<&dyn ChargeController> {
        self.control.as_ref().map(|c| c as &dyn ChargeController)
    }
}

#[async_trait::async_trait]
impl VehicleRange for Tronity {
    async fn range(&self) -> Result<i64> {
        Ok(self.core.bulk().await?.range_units())
    }
}
