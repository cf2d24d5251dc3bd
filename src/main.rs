use std::sync::Arc;

use http_co2_sensor::config::{load_sensor_config, Config};
use http_co2_sensor::AppState;
use http_co2_sensor::services::metrics::{MetricsRegistry, PollMetricsCollector};
use http_co2_sensor::services::sensor::{
    Co2Sensor, DetectionState, SampleObserver, SensorSinks, WatchCharacteristic,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");
    let sensor_config = load_sensor_config(&config.sensor_config_path)
        .expect("Failed to load sensor configuration");

    let default_filter = if sensor_config.debug {
        "http_co2_sensor=debug,tower_http=debug"
    } else {
        "http_co2_sensor=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let metrics = MetricsRegistry::new().expect("Failed to initialize metrics registry");
    let collector: Arc<dyn SampleObserver> = Arc::new(PollMetricsCollector::new(
        metrics.clone(),
        sensor_config.threshold(),
    ));

    let level = Arc::new(WatchCharacteristic::<f64>::new());
    let detected = Arc::new(WatchCharacteristic::<DetectionState>::new());
    let sinks = SensorSinks {
        level: level.clone(),
        detected: detected.clone(),
    };

    let sensor = Co2Sensor::from_config(&sensor_config, sinks, vec![collector])
        .expect("Failed to build sensor");
    let sensor = Arc::new(sensor);
    tracing::info!("Sensor '{}' reading {}", sensor.name(), sensor_config.url);

    let _timer = sensor.start_timer();

    let state = AppState {
        sensor,
        level,
        detected,
    };
    let app = http_co2_sensor::create_app(state, metrics);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.expect("Server error");
}
