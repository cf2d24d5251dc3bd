use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use validator::Validate;

use super::ConfigError;

pub const DEFAULT_FIELD_NAME: &str = "co2";
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_INTERVAL_MS: u64 = 120_000;
const DEFAULT_THRESHOLD: f64 = 1500.0;
const DEADLINE_GRACE_MS: u64 = 1000;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
});

/// Accessory configuration for one HTTP CO2 sensor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SensorConfig {
    #[validate(url(message = "url must be an absolute URL"))]
    pub url: String,
    #[serde(default = "default_http_method")]
    pub http_method: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default = "default_not_available")]
    pub model: String,
    #[serde(default = "default_not_available")]
    pub serial: String,
    /// `None` (absent or null) means `co2`; an explicit empty string reads the raw body
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Milliseconds; 0 falls back to the default
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub auth: Option<SensorAuth>,
    /// Milliseconds; 0 disables background polling
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,
    #[serde(default)]
    pub debug: bool,
    /// Milliseconds; upper bound for one whole poll cycle
    #[serde(default)]
    pub poll_deadline: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorAuth {
    pub user: String,
    pub pass: String,
}

fn default_http_method() -> String {
    "GET".to_string()
}

fn default_name() -> String {
    "CO2 Sensor".to_string()
}

fn default_not_available() -> String {
    "N/A".to_string()
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_update_interval() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl SensorConfig {
    /// Configuration with every optional field at its default
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_method: default_http_method(),
            name: default_name(),
            manufacturer: None,
            model: default_not_available(),
            serial: default_not_available(),
            field_name: None,
            threshold: DEFAULT_THRESHOLD,
            timeout: DEFAULT_TIMEOUT_MS,
            auth: None,
            update_interval: DEFAULT_INTERVAL_MS,
            debug: false,
            poll_deadline: None,
        }
    }

    pub fn field_name(&self) -> &str {
        self.field_name.as_deref().unwrap_or(DEFAULT_FIELD_NAME)
    }

    pub fn timeout(&self) -> Duration {
        match self.timeout {
            0 => Duration::from_millis(DEFAULT_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        }
    }

    /// Detection bound in ppm; 0 falls back to the default like `timeout`
    pub fn threshold(&self) -> f64 {
        if self.threshold == 0.0 {
            DEFAULT_THRESHOLD
        } else {
            self.threshold
        }
    }

    /// `None` when background polling is disabled
    pub fn update_interval(&self) -> Option<Duration> {
        match self.update_interval {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn poll_deadline(&self) -> Duration {
        match self.poll_deadline {
            Some(ms) if ms > 0 => Duration::from_millis(ms),
            _ => self.timeout() + Duration::from_millis(DEADLINE_GRACE_MS),
        }
    }

    pub fn method(&self) -> Result<reqwest::Method, ConfigError> {
        reqwest::Method::from_bytes(self.http_method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| ConfigError::Invalid(format!("unknown http_method: {}", self.http_method)))
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.method()?;

        if !self.threshold.is_finite() {
            return Err(ConfigError::Invalid("threshold must be a finite number".to_string()));
        }

        Ok(())
    }
}

/// Load a sensor configuration from a JSON file with `${VAR}` substitution
pub fn load_sensor_config(path: impl AsRef<Path>) -> Result<SensorConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    parse_sensor_config(&content)
}

pub fn parse_sensor_config(content: &str) -> Result<SensorConfig, ConfigError> {
    let content = substitute_env_vars(content);
    let config: SensorConfig = serde_json::from_str(&content)?;
    config.check()?;
    Ok(config)
}

/// Substitute ${VAR_NAME} with environment variable values, leaving unknown
/// variables untouched
fn substitute_env_vars(content: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
