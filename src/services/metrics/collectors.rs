use std::sync::Arc;
use std::time::Duration;

use super::MetricsRegistry;
use crate::services::sensor::{classify, SampleObserver, SampleResult};

/// Collector for sensor poll metrics
pub struct PollMetricsCollector {
    metrics: Arc<MetricsRegistry>,
    threshold: f64,
}

impl PollMetricsCollector {
    pub fn new(metrics: Arc<MetricsRegistry>, threshold: f64) -> Self {
        Self { metrics, threshold }
    }
}

impl SampleObserver for PollMetricsCollector {
    fn on_coalesced(&self) {
        self.metrics.sensor_polls_coalesced_total.inc();
    }

    fn on_sample(&self, result: &SampleResult, elapsed: Duration) {
        self.metrics
            .sensor_poll_duration_seconds
            .observe(elapsed.as_secs_f64());

        match result {
            Ok(level) => {
                self.metrics
                    .sensor_polls_total
                    .with_label_values(&["success"])
                    .inc();
                self.metrics.sensor_level_ppm.set(*level);
                self.metrics
                    .sensor_detected
                    .set(classify(*level, self.threshold).code() as f64);
            }
            Err(e) => {
                self.metrics
                    .sensor_polls_total
                    .with_label_values(&[e.kind().as_str()])
                    .inc();
            }
        }
    }
}
