use axum_test::TestServer;
use http_co2_sensor::config::SensorConfig;
use http_co2_sensor::AppState;
use http_co2_sensor::services::metrics::{MetricsRegistry, PollMetricsCollector};
use http_co2_sensor::services::sensor::{
    Co2Sensor, DetectionState, SampleObserver, SensorSinks, WatchCharacteristic,
};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SENSOR_PATH: &str = "/api/air";

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct SensorHarness {
    pub sensor: Arc<Co2Sensor>,
    pub level: Arc<WatchCharacteristic<f64>>,
    pub detected: Arc<WatchCharacteristic<DetectionState>>,
    pub metrics: Arc<MetricsRegistry>,
}

#[allow(dead_code)]
impl SensorHarness {
    pub fn new(config: &SensorConfig) -> Self {
        let level = Arc::new(WatchCharacteristic::<f64>::new());
        let detected = Arc::new(WatchCharacteristic::<DetectionState>::new());
        let metrics = MetricsRegistry::new().expect("Failed to create metrics registry");
        let collector: Arc<dyn SampleObserver> =
            Arc::new(PollMetricsCollector::new(metrics.clone(), config.threshold()));

        let sinks = SensorSinks {
            level: level.clone(),
            detected: detected.clone(),
        };
        let sensor = Co2Sensor::from_config(config, sinks, vec![collector])
            .expect("Failed to build sensor");

        Self {
            sensor: Arc::new(sensor),
            level,
            detected,
            metrics,
        }
    }

    pub fn server(&self) -> TestServer {
        let state = AppState {
            sensor: self.sensor.clone(),
            level: self.level.clone(),
            detected: self.detected.clone(),
        };
        let app = http_co2_sensor::create_app(state, self.metrics.clone());
        TestServer::new(app).expect("Failed to create test server")
    }
}

/// Sensor config pointing at the mock server, with background polling off
#[allow(dead_code)]
pub fn sensor_config(server: &MockServer) -> SensorConfig {
    let mut config = SensorConfig::new(format!("{}{}", server.uri(), SENSOR_PATH));
    config.update_interval = 0;
    config
}

/// Mock sensor endpoint answering every GET with `body`
#[allow(dead_code)]
pub async fn mock_sensor(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SENSOR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}
