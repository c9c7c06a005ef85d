mod aggregator;
mod buffer;
mod stats;
mod stream;

pub use aggregator::{LogAggregator, LogSnapshot, FETCH_ERROR_PLACEHOLDER};
pub use buffer::{LogBuffer, MAX_LOGS};
pub use stats::{
    parse_dashboard_stats, DashboardStats, LogClass, ANOMALY_MARKER, ERROR_MARKER, INFO_MARKER,
};
pub use stream::{start_log_stream, Subscription};
