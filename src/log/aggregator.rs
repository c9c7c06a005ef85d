use tokio::sync::watch;
use tracing::{debug, error};

use crate::cancel::CancelToken;
use crate::error::Error;
use crate::request::ApiClient;
use crate::types::{LogLine, LOGS_PATH};

use super::buffer::LogBuffer;
use super::stats::{parse_dashboard_stats, DashboardStats};

/// Sole line shown when the snapshot endpoint cannot be read.
pub const FETCH_ERROR_PLACEHOLDER: &str = "Failed to fetch logs from the backend.";

/// A committed aggregator state: the buffer and the stats derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSnapshot {
    pub buffer: LogBuffer,
    pub stats: DashboardStats,
    /// Set by a failed snapshot fetch and cleared by the next successful
    /// snapshot or push, even if the placeholder line is still buffered.
    pub degraded: bool,
}

impl LogSnapshot {
    fn empty(capacity: usize) -> Self {
        Self {
            buffer: LogBuffer::new(capacity),
            stats: DashboardStats::default(),
            degraded: false,
        }
    }

    fn recompute(&mut self) {
        self.stats = parse_dashboard_stats(&self.buffer);
    }
}

/// Rolling log buffer fed by snapshot fetches and push messages.
///
/// State lives in a `watch` channel. Each update mutates the buffer and
/// recomputes the stats inside a single `send_modify`, so readers and
/// subscribers never see stats that lag the buffer they came with.
#[derive(Debug)]
pub struct LogAggregator {
    client: ApiClient,
    state: watch::Sender<LogSnapshot>,
}

impl LogAggregator {
    #[must_use]
    pub fn new(client: ApiClient, capacity: usize) -> Self {
        let (state, _) = watch::channel(LogSnapshot::empty(capacity));
        Self { client, state }
    }

    /// Replaces the buffer with the backend's current log set.
    ///
    /// Failures never propagate: they are logged and the buffer is replaced
    /// by [`FETCH_ERROR_PLACEHOLDER`] with zeroed stats. A cancelled fetch
    /// leaves the state untouched.
    pub async fn refresh_snapshot(&self, cancel: &CancelToken) {
        match self.client.get_json::<Vec<LogLine>>(LOGS_PATH, cancel).await {
            Ok(lines) => {
                debug!(count = lines.len(), "log snapshot fetched");
                self.apply_snapshot(lines);
            }
            Err(Error::Cancelled) => debug!("log snapshot cancelled"),
            Err(err) => {
                error!("log snapshot error: {err}");
                self.apply_fetch_failure();
            }
        }
    }

    pub fn on_push_message(&self, line: impl Into<LogLine>) {
        let line = line.into();
        self.state.send_modify(|snapshot| {
            snapshot.buffer.push(line);
            snapshot.degraded = false;
            snapshot.recompute();
        });
    }

    #[must_use]
    pub fn current_stats(&self) -> DashboardStats {
        self.state.borrow().stats.clone()
    }

    #[must_use]
    pub fn current_buffer(&self) -> Vec<LogLine> {
        self.state.borrow().buffer.to_vec()
    }

    #[must_use]
    pub fn snapshot(&self) -> LogSnapshot {
        self.state.borrow().clone()
    }

    /// Receives every committed update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LogSnapshot> {
        self.state.subscribe()
    }

    fn apply_snapshot(&self, lines: Vec<LogLine>) {
        self.state.send_modify(|snapshot| {
            snapshot.buffer.replace(lines);
            snapshot.degraded = false;
            snapshot.recompute();
        });
    }

    fn apply_fetch_failure(&self) {
        self.state.send_modify(|snapshot| {
            snapshot
                .buffer
                .replace([LogLine::from(FETCH_ERROR_PLACEHOLDER)]);
            snapshot.degraded = true;
            snapshot.stats = DashboardStats::default();
        });
    }
}
