use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::{ConfigError, SensorConfig};
use super::classifier::{classify, DetectionState};
use super::coordinator::{PollCoordinator, SampleObserver};
use super::fetcher::{HttpSampleFetcher, SampleSource};
use super::types::SampleResult;

/// Range advertised for the CarbonDioxideLevel characteristic (ppm)
pub const LEVEL_MIN_PPM: f64 = 400.0;
pub const LEVEL_MAX_PPM: f64 = 5000.0;

/// Write-only target for one characteristic value
pub trait CharacteristicSink<T>: Send + Sync {
    fn update_value(&self, value: T);
}

/// In-process characteristic that keeps the last pushed value
pub struct WatchCharacteristic<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> WatchCharacteristic<T> {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn value(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Default for WatchCharacteristic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync> CharacteristicSink<T> for WatchCharacteristic<T> {
    fn update_value(&self, value: T) {
        self.tx.send_replace(Some(value));
    }
}

/// The two outputs a CO2 sensor pushes after every successful poll
#[derive(Clone)]
pub struct SensorSinks {
    pub level: Arc<dyn CharacteristicSink<f64>>,
    pub detected: Arc<dyn CharacteristicSink<DetectionState>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessoryInformation {
    pub name: String,
    pub manufacturer: Option<String>,
    pub model: String,
    pub serial: String,
    pub threshold: f64,
    pub level_min: f64,
    pub level_max: f64,
    pub update_interval_ms: u64,
}

/// Derives the detection state and pushes both values outward
struct SensorOutputs {
    name: String,
    threshold: f64,
    sinks: SensorSinks,
    last_detection: watch::Sender<DetectionState>,
}

impl SampleObserver for SensorOutputs {
    fn on_sample(&self, result: &SampleResult, _elapsed: Duration) {
        match result {
            Ok(level) => {
                let state = classify(*level, self.threshold);
                self.sinks.level.update_value(*level);
                self.last_detection.send_replace(state);
                self.sinks.detected.update_value(state);
                tracing::debug!("{}: level {} ppm, detection {}", self.name, level, state.as_str());
            }
            Err(e) => {
                // Pushed state is left as it was
                tracing::warn!("{}: poll failed: {}", self.name, e);
            }
        }
    }
}

/// HTTP-backed CO2 sensor accessory
pub struct Co2Sensor {
    information: AccessoryInformation,
    coordinator: PollCoordinator,
    outputs: Arc<SensorOutputs>,
    update_interval: Option<Duration>,
}

impl Co2Sensor {
    /// Build a sensor reading from the configured HTTP endpoint
    pub fn from_config(
        config: &SensorConfig,
        sinks: SensorSinks,
        observers: Vec<Arc<dyn SampleObserver>>,
    ) -> Result<Self, ConfigError> {
        let fetcher = HttpSampleFetcher::new(config)?;
        Ok(Self::new(config, Arc::new(fetcher), sinks, observers))
    }

    pub fn new(
        config: &SensorConfig,
        source: Arc<dyn SampleSource>,
        sinks: SensorSinks,
        mut observers: Vec<Arc<dyn SampleObserver>>,
    ) -> Self {
        let (last_detection, _) = watch::channel(DetectionState::default());
        let outputs = Arc::new(SensorOutputs {
            name: config.name.clone(),
            threshold: config.threshold(),
            sinks,
            last_detection,
        });

        // Outputs first so sinks are current before other observers run
        observers.insert(0, outputs.clone() as Arc<dyn SampleObserver>);
        let coordinator = PollCoordinator::spawn(source, Some(config.poll_deadline()), observers);

        let information = AccessoryInformation {
            name: config.name.clone(),
            manufacturer: config.manufacturer.clone(),
            model: config.model.clone(),
            serial: config.serial.clone(),
            threshold: config.threshold(),
            level_min: LEVEL_MIN_PPM,
            level_max: LEVEL_MAX_PPM,
            update_interval_ms: config.update_interval,
        };

        Self {
            information,
            coordinator,
            outputs,
            update_interval: config.update_interval(),
        }
    }

    /// Current CO2 level, joining any poll already in progress
    pub async fn get_value(&self) -> SampleResult {
        tracing::debug!("{}: level requested", self.name());
        self.coordinator.request_sample().await
    }

    /// Last pushed detection state; never polls
    pub fn get_detection_state(&self) -> DetectionState {
        *self.outputs.last_detection.borrow()
    }

    pub fn last_known(&self) -> Option<SampleResult> {
        self.coordinator.last_known()
    }

    pub fn name(&self) -> &str {
        &self.information.name
    }

    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    /// Start background polling. Returns `None` when the update interval is 0.
    /// The first poll fires one interval after start.
    pub fn start_timer(&self) -> Option<JoinHandle<()>> {
        let period = self.update_interval?;
        let coordinator = self.coordinator.clone();
        let name = self.name().to_string();

        tracing::info!("{}: polling every {:?}", name, period);

        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                tracing::debug!("{}: timer poll", name);
                coordinator.tick();
            }
        }))
    }
}
