use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use super::ConfigError;

/// Environment configuration
/// Loads process-level settings; the sensor itself is described by the JSON file
pub struct Config {
    pub bind_addr: SocketAddr,
    pub sensor_config_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("BIND_ADDR: {}", e)))?;

        let sensor_config_path = env::var("SENSOR_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("sensor.json"));

        Ok(Self {
            bind_addr,
            sensor_config_path,
        })
    }
}
