use http_co2_sensor::config::{SensorAuth, SensorConfig};
use http_co2_sensor::services::sensor::{HttpSampleFetcher, SampleError, SampleSource};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{mock_sensor, sensor_config, SENSOR_PATH};

// =============================================================================
// INTEGRATION TESTS - HTTP SAMPLE FETCHER
// =============================================================================

#[tokio::test]
async fn test_fetch_json_field() {
    let server = mock_sensor(json!({"co2": 812, "temperature": 21.5})).await;
    let fetcher = HttpSampleFetcher::new(&sensor_config(&server)).unwrap();

    assert_eq!(fetcher.fetch().await, Ok(812.0));
}

#[tokio::test]
async fn test_fetch_nested_field_path() {
    let server = mock_sensor(json!({"data": {"sensors": [{"ppm": "645"}]}})).await;
    let mut config = sensor_config(&server);
    config.field_name = Some("data.sensors[0].ppm".to_string());
    let fetcher = HttpSampleFetcher::new(&config).unwrap();

    assert_eq!(fetcher.fetch().await, Ok(645.0));
}

#[tokio::test]
async fn test_fetch_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SENSOR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("1024\n"))
        .mount(&server)
        .await;

    let mut config = sensor_config(&server);
    config.field_name = Some(String::new());
    let fetcher = HttpSampleFetcher::new(&config).unwrap();

    assert_eq!(fetcher.fetch().await, Ok(1024.0));
}

#[tokio::test]
async fn test_fetch_raw_body_not_a_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SENSOR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not-a-number"))
        .mount(&server)
        .await;

    let mut config = sensor_config(&server);
    config.field_name = Some(String::new());
    let fetcher = HttpSampleFetcher::new(&config).unwrap();

    match fetcher.fetch().await {
        Err(SampleError::Parse(message)) => assert!(message.contains("not-a-number")),
        other => panic!("expected parse failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_uses_method_and_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SENSOR_PATH))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"co2": 990})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = sensor_config(&server);
    config.http_method = "POST".to_string();
    config.auth = Some(SensorAuth {
        user: "user".to_string(),
        pass: "pass".to_string(),
    });
    let fetcher = HttpSampleFetcher::new(&config).unwrap();

    assert_eq!(fetcher.fetch().await, Ok(990.0));
    server.verify().await;
}

#[tokio::test]
async fn test_error_status_body_still_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SENSOR_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"co2": 600})))
        .mount(&server)
        .await;

    let fetcher = HttpSampleFetcher::new(&sensor_config(&server)).unwrap();
    assert_eq!(fetcher.fetch().await, Ok(600.0));
}

#[tokio::test]
async fn test_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SENSOR_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"co2": 500}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut config = sensor_config(&server);
    config.timeout = 100;
    let fetcher = HttpSampleFetcher::new(&config).unwrap();

    assert!(matches!(fetcher.fetch().await, Err(SampleError::Transport(_))));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = SensorConfig::new(format!("http://{}/api/air", addr));
    config.timeout = 1000;
    let fetcher = HttpSampleFetcher::new(&config).unwrap();

    assert!(matches!(fetcher.fetch().await, Err(SampleError::Transport(_))));
}
