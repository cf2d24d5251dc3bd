use prometheus::{
    Registry, Counter, CounterVec, Histogram, HistogramVec, HistogramOpts, Gauge, Opts,
    Encoder, TextEncoder,
};
use std::sync::Arc;

/// Central metrics registry for the sensor bridge
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Poll Metrics
    pub sensor_polls_total: CounterVec,
    pub sensor_polls_coalesced_total: Counter,
    pub sensor_poll_duration_seconds: Histogram,

    // Reading Metrics
    pub sensor_level_ppm: Gauge,
    pub sensor_detected: Gauge,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        // HTTP Metrics
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests")
                .namespace("co2"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("co2")
                .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        // Poll Metrics
        let sensor_polls_total = CounterVec::new(
            Opts::new("sensor_polls_total", "Completed sensor polls by outcome")
                .namespace("co2"),
            &["outcome"],
        )?;
        registry.register(Box::new(sensor_polls_total.clone()))?;

        let sensor_polls_coalesced_total = Counter::with_opts(
            Opts::new("sensor_polls_coalesced_total", "Sample requests joined to an in-flight poll")
                .namespace("co2"),
        )?;
        registry.register(Box::new(sensor_polls_coalesced_total.clone()))?;

        let sensor_poll_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("sensor_poll_duration_seconds", "Sensor poll duration")
                .namespace("co2")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        registry.register(Box::new(sensor_poll_duration_seconds.clone()))?;

        // Reading Metrics
        let sensor_level_ppm = Gauge::with_opts(
            Opts::new("sensor_level_ppm", "Last CO2 level read")
                .namespace("co2"),
        )?;
        registry.register(Box::new(sensor_level_ppm.clone()))?;

        let sensor_detected = Gauge::with_opts(
            Opts::new("sensor_detected", "Last detection state (0 normal, 1 abnormal)")
                .namespace("co2"),
        )?;
        registry.register(Box::new(sensor_detected.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            sensor_polls_total,
            sensor_polls_coalesced_total,
            sensor_poll_duration_seconds,
            sensor_level_ppm,
            sensor_detected,
        }))
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
