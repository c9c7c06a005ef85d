use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::datetime::display_datetime;
use crate::error::{Error, Result};

/// Number of samples a latency chart displays.
pub const DEFAULT_MAX_BARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadTestResult {
    pub client_elapsed_ms: f64,
    /// `None` when the response lacked `processing_ms`.
    pub server_processing_ms: Option<f64>,
}

pub type RequestOutcome = Result<LoadTestResult>;

#[derive(Debug)]
pub struct RequestFailure {
    pub index: usize,
    pub error: Error,
}

/// Raw timings of one batch, index-aligned with submission order.
#[derive(Debug)]
pub struct LoadTestSummary {
    pub run_id: Uuid,
    pub endpoint: String,
    pub started_at: DateTime<Utc>,
    pub wall_clock: Duration,
    /// Client elapsed time per request; `None` where the request failed.
    pub times: Vec<Option<f64>>,
    /// Server processing time per request; `None` for failures and gaps.
    pub backend_times: Vec<Option<f64>>,
    pub failures: Vec<RequestFailure>,
}

impl LoadTestSummary {
    /// `outcomes[i]` must be the outcome of request `i`.
    #[must_use]
    pub fn from_outcomes(
        run_id: Uuid,
        endpoint: String,
        started_at: DateTime<Utc>,
        wall_clock: Duration,
        outcomes: Vec<RequestOutcome>,
    ) -> Self {
        let mut times = Vec::with_capacity(outcomes.len());
        let mut backend_times = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(result) => {
                    times.push(Some(result.client_elapsed_ms));
                    backend_times.push(result.server_processing_ms);
                }
                Err(error) => {
                    times.push(None);
                    backend_times.push(None);
                    failures.push(RequestFailure { index, error });
                }
            }
        }

        Self {
            run_id,
            endpoint,
            started_at,
            wall_clock,
            times,
            backend_times,
            failures,
        }
    }

    #[must_use]
    pub fn requests(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.requests() - self.failures.len()
    }

    /// Completed requests whose response carried no processing time.
    #[must_use]
    pub fn backend_gaps(&self) -> usize {
        self.times
            .iter()
            .zip(&self.backend_times)
            .filter(|(client, backend)| client.is_some() && backend.is_none())
            .count()
    }

    /// Client times of completed requests, in submission order.
    #[must_use]
    pub fn client_samples(&self) -> Vec<f64> {
        self.times.iter().flatten().copied().collect()
    }

    #[must_use]
    pub fn backend_samples(&self) -> Vec<f64> {
        self.backend_times.iter().flatten().copied().collect()
    }

    /// Reduces the batch. Failed requests and backend gaps are left out of
    /// every denominator rather than counted as zero.
    #[must_use]
    pub fn report(&self) -> BatchReport {
        BatchReport {
            run_id: self.run_id,
            endpoint: self.endpoint.clone(),
            started_at: self.started_at,
            requests: self.requests(),
            failures: self.failures.len(),
            backend_gaps: self.backend_gaps(),
            wall_clock_ms: self.wall_clock.as_secs_f64() * 1000.0,
            client: SeriesStats::from_samples(self.client_samples()),
            backend_avg_ms: SeriesStats::from_samples(self.backend_samples()).map(|stats| stats.avg),
        }
    }
}

/// Min, max and mean of a latency series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl SeriesStats {
    /// `None` for an empty series.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(samples: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut samples = samples.into_iter();
        let first = samples.next()?;

        let mut stats = Self {
            count: 1,
            min: first,
            max: first,
            avg: 0.0,
        };
        let mut total = first;
        for value in samples {
            stats.count += 1;
            stats.min = stats.min.min(value);
            stats.max = stats.max.max(value);
            total += value;
        }
        stats.avg = total / stats.count as f64;

        Some(stats)
    }

    /// Stats over the samples a chart shows: the first `max_bars` of them.
    #[must_use]
    pub fn over(samples: &[f64], max_bars: usize) -> Option<Self> {
        Self::from_samples(samples.iter().take(max_bars).copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub endpoint: String,
    pub started_at: DateTime<Utc>,
    pub requests: usize,
    pub failures: usize,
    pub backend_gaps: usize,
    pub wall_clock_ms: f64,
    pub client: Option<SeriesStats>,
    pub backend_avg_ms: Option<f64>,
}

impl BatchReport {
    pub fn log(&self) {
        info!(
            run_id = %self.run_id,
            endpoint = %self.endpoint,
            requests = self.requests,
            failures = self.failures,
            backend_gaps = self.backend_gaps,
            wall_clock_ms = self.wall_clock_ms,
            avg_ms = self.client.map(|stats| stats.avg),
            min_ms = self.client.map(|stats| stats.min),
            max_ms = self.client.map(|stats| stats.max),
            avg_backend_ms = self.backend_avg_ms,
            "load test finished"
        );
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Endpoint: {}", self.endpoint)?;
        writeln!(f, "Started: {}", display_datetime(self.started_at))?;
        writeln!(
            f,
            "Requests: {} ({} failed, {} without processing_ms)",
            self.requests, self.failures, self.backend_gaps
        )?;
        match self.client {
            Some(stats) => {
                writeln!(f, "Avg response time (client): {:.2} ms", stats.avg)?;
                writeln!(f, "Min: {:.2} ms, Max: {:.2} ms", stats.min, stats.max)?;
            }
            None => writeln!(f, "Avg response time (client): n/a")?,
        }
        match self.backend_avg_ms {
            Some(avg) => writeln!(f, "Avg processing_ms (backend): {avg:.2} ms")?,
            None => writeln!(f, "Avg processing_ms (backend): n/a")?,
        }
        write!(f, "Wall clock: {:.2} ms", self.wall_clock_ms)
    }
}
