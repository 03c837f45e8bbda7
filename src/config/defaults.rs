use super::*;

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/tronity-vehicle.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for VehicleMeta {
    fn default() -> Self {
        Self {
            title: "Tronity".to_string(),
            capacity: 0.0,
            phases: None,
            identifiers: Vec::new(),
            icon: "car".to_string(),
        }
    }
}

impl Default for TronityEndpoints {
    fn default() -> Self {
        Self {
            uri: TRONITY_URI.to_string(),
            token_url: format!("{}/authentication", TRONITY_URI),
        }
    }
}

impl Default for TronityConfig {
    fn default() -> Self {
        Self {
            meta: VehicleMeta::default(),
            credentials: ClientCredentials::default(),
            tokens: Tokens::default(),
            vin: String::new(),
            cache_ms: None,
            timeout_ms: 10_000,
            endpoints: TronityEndpoints::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            poll_interval_ms: 300_000,
            sponsor_token: String::new(),
            vehicles: BTreeMap::new(),
        }
    }
}
