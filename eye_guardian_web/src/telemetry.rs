use eye_guardian_inference::Diagnosis;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, MeterProvider},
    KeyValue,
};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("failed to build prometheus exporter: {0}")]
    Exporter(String),
    #[error("failed to encode metrics: {0}")]
    Encode(String),
}

pub struct Metrics {
    request_counter: Counter<u64>,
    prediction_duration: Histogram<u64>,
    prediction_counter: Counter<u64>,
    error_counter: Counter<u64>,
    registry: Registry,
    _provider: SdkMeterProvider,
}

impl Metrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()
            .map_err(|e| MetricsError::Exporter(e.to_string()))?;

        let provider = SdkMeterProvider::builder().with_reader(exporter).build();

        let meter = provider.meter("eye_guardian_web");
        global::set_meter_provider(provider.clone());

        let request_counter = meter
            .u64_counter("requests_total")
            .with_description("Total number of requests")
            .build();

        let boundaries = generate_boundaries((10, 30, 50, 250, 1000));

        let prediction_duration = meter
            .u64_histogram("prediction_duration_ms")
            .with_boundaries(boundaries)
            .with_description("Duration of decode, preprocessing and inference in milliseconds")
            .build();

        let prediction_counter = meter
            .u64_counter("predictions_total")
            .with_description("Completed predictions by diagnosis")
            .build();

        let error_counter = meter
            .u64_counter("prediction_errors_total")
            .with_description("Uploads that could not be classified")
            .build();

        Ok(Metrics {
            request_counter,
            prediction_duration,
            prediction_counter,
            error_counter,
            registry,
            _provider: provider,
        })
    }

    pub fn record_request(&self, route: &str) {
        let attributes = [KeyValue::new("route", route.to_string())];
        self.request_counter.add(1, &attributes);
    }

    pub fn record_prediction_duration(&self, duration_ms: u64, route: &str) {
        let attributes = [KeyValue::new("route", route.to_string())];
        self.prediction_duration.record(duration_ms, &attributes);
    }

    pub fn record_diagnosis(&self, diagnosis: Diagnosis) {
        let attributes = [KeyValue::new("diagnosis", diagnosis.as_str())];
        self.prediction_counter.add(1, &attributes);
    }

    pub fn record_error(&self, route: &str) {
        let attributes = [KeyValue::new("route", route.to_string())];
        self.error_counter.add(1, &attributes);
    }

    pub fn encode(&self) -> Result<String, MetricsError> {
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encode(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encode(e.to_string()))
    }
}

fn generate_boundaries(parts: (i32, i32, i32, i32, i32)) -> Vec<f64> {
    let first_step: usize = 10;
    let middle_step: usize = 5;
    let end_step: usize = 25;
    let tail_step: usize = 250;
    let first_part = (parts.0..=parts.1).step_by(first_step);
    let middle_part = (parts.1..=parts.2).step_by(middle_step);
    let end_part = (parts.2..=parts.3).step_by(end_step);
    let tail_part = (parts.3..=parts.4).step_by(tail_step);

    let mut seen = HashSet::new();
    first_part
        .chain(middle_part)
        .chain(end_part)
        .chain(tail_part)
        .filter(|&x| seen.insert(x))
        .map(|x| x as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_boundaries() {
        let parts = (10, 30, 40, 90, 590);
        let get = generate_boundaries(parts);
        let expected = vec![10.0, 20.0, 30.0, 35.0, 40.0, 65.0, 90.0, 340.0, 590.0];

        assert_eq!(get, expected);
    }

    #[test]
    fn test_boundaries_are_increasing() {
        let boundaries = generate_boundaries((10, 30, 50, 250, 1000));
        assert!(boundaries.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(boundaries.first(), Some(&10.0));
        assert_eq!(boundaries.last(), Some(&1000.0));
    }

    #[test]
    fn test_encode_exposes_recorded_counters() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("/");
        metrics.record_diagnosis(Diagnosis::Healthy);

        let text = metrics.encode().unwrap();
        assert!(text.contains("requests_total"));
        assert!(text.contains("predictions_total"));
    }
}
