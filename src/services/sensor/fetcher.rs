use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

use crate::config::{ConfigError, SensorAuth, SensorConfig};
use super::extractor::extract;
use super::types::{SampleError, SampleResult};

const BODY_EXCERPT_CHARS: usize = 100;

/// One remote reading per call
#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn fetch(&self) -> SampleResult;
}

/// Reads the CO2 level from an HTTP endpoint
pub struct HttpSampleFetcher {
    client: Client,
    url: String,
    method: Method,
    timeout: Duration,
    auth: Option<SensorAuth>,
    field_name: String,
}

impl HttpSampleFetcher {
    pub fn new(config: &SensorConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            method: config.method()?,
            timeout: config.timeout(),
            auth: config.auth.clone(),
            field_name: config.field_name().to_string(),
        })
    }

    async fn fetch_body(&self) -> Result<String, SampleError> {
        let mut request = self
            .client
            .request(self.method.clone(), &self.url)
            .timeout(self.timeout);

        if let Some(auth) = &self.auth {
            request = request.basic_auth(&auth.user, Some(&auth.pass));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SampleError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Sensor endpoint {} answered with status {}", self.url, status);
        }

        response
            .text()
            .await
            .map_err(|e| SampleError::Transport(e.to_string()))
    }
}

#[async_trait]
impl SampleSource for HttpSampleFetcher {
    async fn fetch(&self) -> SampleResult {
        tracing::debug!("Requesting data on \"{}\", method {}", self.url, self.method);

        let body = match self.fetch_body().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("HTTP bad response ({}): {}", self.url, e);
                return Err(e);
            }
        };

        let result = parse_sample(&body, &self.field_name);
        match &result {
            Ok(value) => tracing::debug!("HTTP successful response: {}", value),
            Err(e) => tracing::debug!("Error processing received information: {}", e),
        }
        result
    }
}

/// Turn a response body into a reading. An empty `field_name` treats the
/// whole body as the value; otherwise the body must be JSON.
pub fn parse_sample(body: &str, field_name: &str) -> SampleResult {
    if field_name.is_empty() {
        return coerce_text(body).ok_or_else(|| not_a_number(body, body));
    }

    let document: Value = serde_json::from_str(body).map_err(|e| {
        SampleError::Parse(format!("Body is not valid JSON: {} (\"{}\")", e, excerpt(body)))
    })?;

    let default = Value::String(String::new());
    let candidate = extract(&document, field_name, &default);

    coerce_value(candidate).ok_or_else(|| {
        let shown = match candidate {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        not_a_number(&shown, body)
    })
}

/// Numeric reading of a JSON value. Follows loose number conversion:
/// `null`, `false`, `[]` and blank text read as 0, `true` as 1, and a
/// one-element array as its element's text.
fn coerce_value(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => coerce_text(s),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [only] => coerce_element(only),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

// Array elements convert through their text form, where null is blank and
// booleans are words
fn coerce_element(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(_) => None,
        other => coerce_value(other),
    }
}

fn coerce_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&trimmed[2..], radix).ok().map(|v| v as f64);
    }

    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn not_a_number(candidate: &str, body: &str) -> SampleError {
    SampleError::Parse(format!(
        "Received value is not a number: \"{}\" (\"{}\")",
        excerpt(candidate),
        excerpt(body)
    ))
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
