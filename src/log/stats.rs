use serde::Serialize;

use crate::types::LogLine;

pub const ERROR_MARKER: &str = "ERROR";
pub const INFO_MARKER: &str = "INFO";
/// Emitted by the backend when a global anomaly has been detected.
pub const ANOMALY_MARKER: &str = "Anomalia global detectada";

/// Markers found in a single line. They are independent of one another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogClass {
    pub error: bool,
    pub info: bool,
    pub anomaly: bool,
}

impl LogClass {
    #[must_use]
    pub fn of(line: &LogLine) -> Self {
        let text = line.as_str();
        Self {
            error: text.contains(ERROR_MARKER),
            info: text.contains(INFO_MARKER),
            anomaly: text.contains(ANOMALY_MARKER),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub error_count: usize,
    pub info_count: usize,
    pub last_anomaly: Option<LogLine>,
}

/// Full scan of `lines`; the most recent anomaly wins.
#[must_use]
pub fn parse_dashboard_stats<'a>(lines: impl IntoIterator<Item = &'a LogLine>) -> DashboardStats {
    lines
        .into_iter()
        .fold(DashboardStats::default(), |mut stats, line| {
            let class = LogClass::of(line);
            if class.error {
                stats.error_count += 1;
            }
            if class.info {
                stats.info_count += 1;
            }
            if class.anomaly {
                stats.last_anomaly = Some(line.clone());
            }
            stats
        })
}
