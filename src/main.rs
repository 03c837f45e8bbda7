use anyhow::Result;
use std::time::Duration;
use tracing::{error, info, warn};
use tronity_vehicle::logging::init_logging;
use tronity_vehicle::{AdapterContext, Config, Registry, Vehicle};

async fn poll(name: &str, vehicle: &dyn Vehicle) {
    match vehicle.soc().await {
        Ok(soc) => info!("{}: soc {:.1}%", name, soc),
        Err(e) => {
            warn!("{}: soc failed: {}", name, e);
            return;
        }
    }
    if let Some(range) = vehicle.as_range()
        && let Ok(km) = range.range().await
    {
        info!("{}: range {}", name, km);
    }
    if let Some(state) = vehicle.as_charge_state()
        && let Ok(status) = state.status().await
    {
        info!("{}: status {}", name, status);
    }
    if let Some(odometer) = vehicle.as_odometer()
        && let Ok(odo) = odometer.odometer().await
    {
        info!("{}: odometer {:.0}", name, odo);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    config.validate()?;
    init_logging(&config.logging)?;

    info!(
        "tronity-vehicle {} starting, {} vehicle(s) configured",
        env!("APP_VERSION"),
        config.vehicles.len()
    );

    let interval = Duration::from_millis(config.poll_interval_ms);
    let ctx = AdapterContext::new(interval).with_sponsor(!config.sponsor_token.trim().is_empty());
    let registry = Registry::with_defaults();

    let mut vehicles = Vec::new();
    for (name, entry) in &config.vehicles {
        match registry.create_from_entry(entry.clone(), &ctx).await {
            Ok(vehicle) => vehicles.push((name.clone(), vehicle)),
            Err(e) => error!("{}: {}", name, e),
        }
    }
    if vehicles.is_empty() {
        anyhow::bail!("no vehicle could be created");
    }

    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for (name, vehicle) in &vehicles {
                    poll(name, vehicle.as_ref()).await;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                return Ok(());
            }
        }
    }
}
