use std::fmt;

use serde::{Deserialize, Serialize};

pub const LOGS_PATH: &str = "/logs";
pub const SENSOR_PATH: &str = "/sensor";
pub const SENSOR_SEQ_PATH: &str = "/sensor_seq";

/// One unstructured line of server output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLine(String);

impl LogLine {
    #[must_use]
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl From<String> for LogLine {
    fn from(line: String) -> Self {
        Self(line)
    }
}

impl From<&str> for LogLine {
    fn from(line: &str) -> Self {
        Self(line.to_string())
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two comparable sensor processing paths exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Parallel,
    Sequential,
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Parallel => SENSOR_PATH,
            Self::Sequential => SENSOR_SEQ_PATH,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parallel => f.write_str("parallel"),
            Self::Sequential => f.write_str("sequential"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRequest {
    pub id: String,
    pub value: f64,
    pub sensor_type: String,
    pub timestamp: i64,
}

/// Body returned by both sensor endpoints.
///
/// Only `processing_ms` is meaningful to the harness; the resource fields are
/// passed through when the parallel path reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorResponse {
    #[serde(default)]
    pub processing_ms: Option<f64>,
    #[serde(default)]
    pub cpu_usage_before: Option<f64>,
    #[serde(default)]
    pub cpu_usage_after: Option<f64>,
    #[serde(default)]
    pub ram_used_before_kb: Option<f64>,
    #[serde(default)]
    pub ram_used_after_kb: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorMetrics {
    pub processing_ms: f64,
    pub cpu_usage_before: Option<f64>,
    pub cpu_usage_after: Option<f64>,
    pub ram_used_before_kb: Option<f64>,
    pub ram_used_after_kb: Option<f64>,
}

impl SensorResponse {
    /// Metrics are only shown when the backend reported a processing time.
    #[must_use]
    pub fn into_metrics(self) -> Option<SensorMetrics> {
        Some(SensorMetrics {
            processing_ms: self.processing_ms?,
            cpu_usage_before: self.cpu_usage_before,
            cpu_usage_after: self.cpu_usage_after,
            ram_used_before_kb: self.ram_used_before_kb,
            ram_used_after_kb: self.ram_used_after_kb,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_request_uses_backend_field_names() {
        let request = SensorRequest {
            id: "loadtest_3".to_string(),
            value: 42.5,
            sensor_type: "LoadTest".to_string(),
            timestamp: 1_700_000_000,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "loadtest_3",
                "value": 42.5,
                "sensor_type": "LoadTest",
                "timestamp": 1_700_000_000,
            })
        );
    }

    #[test]
    fn sequential_response_has_no_resource_fields() {
        let response: SensorResponse = serde_json::from_str(r#"{"processing_ms": 12.5}"#).unwrap();
        let metrics = response.into_metrics().unwrap();
        assert!((metrics.processing_ms - 12.5).abs() < f64::EPSILON);
        assert_eq!(metrics.cpu_usage_before, None);
        assert_eq!(metrics.ram_used_after_kb, None);
    }

    #[test]
    fn response_without_processing_time_yields_no_metrics() {
        let response: SensorResponse =
            serde_json::from_str(r#"{"cpu_usage_before": 3.0, "status": "ok"}"#).unwrap();
        assert_eq!(response.into_metrics(), None);
    }

    #[test]
    fn log_lines_deserialize_from_plain_strings() {
        let lines: Vec<LogLine> = serde_json::from_str(r#"["INFO boot", "ERROR disk"]"#).unwrap();
        assert_eq!(lines, vec![LogLine::from("INFO boot"), LogLine::from("ERROR disk")]);
    }
}
