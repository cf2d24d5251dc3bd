use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{mock_sensor, sensor_config, SensorHarness, SENSOR_PATH};

// =============================================================================
// INTEGRATION TESTS - SENSOR HTTP API
// =============================================================================

#[tokio::test]
async fn test_get_level_then_detected() {
    let upstream = mock_sensor(json!({"co2": 1800})).await;
    let harness = SensorHarness::new(&sensor_config(&upstream));
    let server = harness.server();

    let response = server.get("/sensor/level").await;
    response.assert_status_ok();
    response.assert_json(&json!({"level": 1800.0}));

    let response = server.get("/sensor/detected").await;
    response.assert_status_ok();
    response.assert_json(&json!({"state": "abnormal", "code": 1}));
}

#[tokio::test]
async fn test_detected_defaults_to_normal() {
    let upstream = mock_sensor(json!({"co2": 1800})).await;
    let harness = SensorHarness::new(&sensor_config(&upstream));
    let server = harness.server();

    let response = server.get("/sensor/detected").await;
    response.assert_status_ok();
    response.assert_json(&json!({"state": "normal", "code": 0}));
}

#[tokio::test]
async fn test_last_before_any_poll() {
    let upstream = mock_sensor(json!({"co2": 500})).await;
    let harness = SensorHarness::new(&sensor_config(&upstream));
    let server = harness.server();

    let response = server.get("/sensor/last").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_last_after_poll() {
    let upstream = mock_sensor(json!({"co2": 500})).await;
    let harness = SensorHarness::new(&sensor_config(&upstream));
    let server = harness.server();

    server.get("/sensor/level").await.assert_status_ok();

    let response = server.get("/sensor/last").await;
    response.assert_status_ok();
    response.assert_json(&json!({"status": "ok", "level": 500.0}));
}

#[tokio::test]
async fn test_unparseable_upstream_is_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SENSOR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&upstream)
        .await;

    let harness = SensorHarness::new(&sensor_config(&upstream));
    let server = harness.server();

    let response = server.get("/sensor/level").await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["kind"], "parse");
    assert!(body["error"].as_str().unwrap().contains("oops"));

    let response = server.get("/sensor/last").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "parse");
}

#[tokio::test]
async fn test_get_info() {
    let upstream = mock_sensor(json!({"co2": 500})).await;
    let mut config = sensor_config(&upstream);
    config.name = "Office".to_string();
    config.manufacturer = Some("Acme".to_string());
    config.threshold = 1200.0;
    let harness = SensorHarness::new(&config);
    let server = harness.server();

    let response = server.get("/sensor/info").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Office");
    assert_eq!(body["manufacturer"], "Acme");
    assert_eq!(body["model"], "N/A");
    assert_eq!(body["threshold"], 1200.0);
    assert_eq!(body["level_min"], 400.0);
    assert_eq!(body["level_max"], 5000.0);
    assert_eq!(body["update_interval_ms"], 0);
}

#[tokio::test]
async fn test_health_check() {
    let upstream = mock_sensor(json!({"co2": 500})).await;
    let harness = SensorHarness::new(&sensor_config(&upstream));
    let server = harness.server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_characteristics_reflect_pushed_values() {
    let upstream = mock_sensor(json!({"co2": 1650})).await;
    let harness = SensorHarness::new(&sensor_config(&upstream));
    let server = harness.server();

    let response = server.get("/sensor/characteristics").await;
    response.assert_status_ok();
    response.assert_json(&json!({"level": null, "detected": null}));

    server.get("/sensor/level").await.assert_status_ok();

    let response = server.get("/sensor/characteristics").await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "level": 1650.0,
        "detected": {"state": "abnormal", "code": 1}
    }));
}

#[tokio::test]
async fn test_characteristics_do_not_poll() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SENSOR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"co2": 500})))
        .expect(0)
        .mount(&upstream)
        .await;

    let harness = SensorHarness::new(&sensor_config(&upstream));
    let server = harness.server();

    server.get("/sensor/characteristics").await.assert_status_ok();
    server.get("/sensor/detected").await.assert_status_ok();
    upstream.verify().await;
}
