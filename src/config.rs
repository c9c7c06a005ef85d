use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8090";
pub const DEFAULT_PUSH_URL: &str = "ws://localhost:8090/ws/logs";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_LOG_CAPACITY: usize = 200;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LOAD_TEST_REQUESTS: usize = 50;
pub const DEFAULT_SENSOR_TYPE: &str = "LoadTest";

/// Connection and scheduling settings shared by the aggregator and the harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub push_url: String,
    pub poll_interval: Duration,
    pub log_capacity: usize,
    pub request_timeout: Duration,
    pub load_test_requests: usize,
    pub sensor_type: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            push_url: DEFAULT_PUSH_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            log_capacity: DEFAULT_LOG_CAPACITY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            load_test_requests: DEFAULT_LOAD_TEST_REQUESTS,
            sensor_type: DEFAULT_SENSOR_TYPE.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by any `DASHBOARD_*` variables present in the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Durations accept humantime syntax (`2s`, `1500ms`).
    /// Values that fail to parse keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("DASHBOARD_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("DASHBOARD_PUSH_URL") {
            config.push_url = url;
        }
        if let Some(interval) = parse_var(&lookup, "DASHBOARD_POLL_INTERVAL", parse_duration) {
            config.poll_interval = interval;
        }
        if let Some(timeout) = parse_var(&lookup, "DASHBOARD_REQUEST_TIMEOUT", parse_duration) {
            config.request_timeout = timeout;
        }
        if let Some(requests) = parse_var(
            &lookup,
            "DASHBOARD_LOAD_TEST_REQUESTS",
            parse_positive::<usize>,
        ) {
            config.load_test_requests = requests;
        }

        config
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!(key, value = %raw, "ignoring invalid configuration value");
    }
    parsed
}

fn parse_duration(raw: &str) -> Option<Duration> {
    humantime::parse_duration(raw)
        .ok()
        .filter(|duration| !duration.is_zero())
}

fn parse_positive<T: FromStr + PartialOrd + Default>(raw: &str) -> Option<T> {
    raw.parse::<T>().ok().filter(|value| *value > T::default())
}
