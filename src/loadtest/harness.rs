use std::time::Instant;

use chrono::Utc;
use futures_util::future::join_all;
use rand::Rng;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::config::DashboardConfig;
use crate::datetime::unix_seconds;
use crate::error::{Error, Result};
use crate::request::ApiClient;
use crate::types::{Endpoint, SensorRequest, SensorResponse};

use super::summary::{LoadTestResult, LoadTestSummary, RequestOutcome};

pub const LOAD_TEST_ID_PREFIX: &str = "loadtest_";

/// Fires bursts of identical sensor requests and records their timings.
#[derive(Debug, Clone)]
pub struct LoadTestHarness {
    client: ApiClient,
    sensor_type: String,
}

impl LoadTestHarness {
    #[must_use]
    pub fn new(client: ApiClient, sensor_type: impl Into<String>) -> Self {
        Self {
            client,
            sensor_type: sensor_type.into(),
        }
    }

    #[must_use]
    pub fn from_config(client: ApiClient, config: &DashboardConfig) -> Self {
        Self::new(client, config.sensor_type.clone())
    }

    pub async fn run(&self, endpoint: Endpoint, n: usize) -> Result<LoadTestSummary> {
        self.run_with_cancel(endpoint, n, &CancelToken::new()).await
    }

    /// Issues all `n` requests at once, without waiting for any response, and
    /// returns after every one of them has resolved.
    ///
    /// Individual failures are kept in [`LoadTestSummary::failures`] at their
    /// index and never abort the batch. Requests still pending when `cancel`
    /// fires resolve as [`Error::Cancelled`].
    pub async fn run_with_cancel(
        &self,
        endpoint: Endpoint,
        n: usize,
        cancel: &CancelToken,
    ) -> Result<LoadTestSummary> {
        if n == 0 {
            return Err(Error::InvalidBatchSize);
        }

        let run_id = Uuid::new_v4();
        let url = self.client.url(endpoint.path());
        debug!(%run_id, url = %url, requests = n, "load test starting");

        let requests: Vec<SensorRequest> = (0..n).map(|index| self.build_request(index)).collect();

        let started_at = Utc::now();
        let started = Instant::now();
        let outcomes = join_all(
            requests
                .iter()
                .map(|request| self.send_request(endpoint, request, cancel)),
        )
        .await;
        let wall_clock = started.elapsed();

        for (index, outcome) in outcomes.iter().enumerate() {
            if let Err(err) = outcome {
                warn!(%run_id, index, "load test request failed: {err}");
            }
        }

        let summary = LoadTestSummary::from_outcomes(run_id, url, started_at, wall_clock, outcomes);
        summary.report().log();

        Ok(summary)
    }

    fn build_request(&self, index: usize) -> SensorRequest {
        SensorRequest {
            id: format!("{LOAD_TEST_ID_PREFIX}{index}"),
            value: rand::thread_rng().gen_range(0.0..100.0),
            sensor_type: self.sensor_type.clone(),
            timestamp: unix_seconds(Utc::now()),
        }
    }

    async fn send_request(
        &self,
        endpoint: Endpoint,
        request: &SensorRequest,
        cancel: &CancelToken,
    ) -> RequestOutcome {
        let start = Instant::now();
        let response: SensorResponse = self
            .client
            .post_json(endpoint.path(), request, cancel)
            .await?;
        let elapsed = start.elapsed();

        Ok(LoadTestResult {
            client_elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            server_processing_ms: response.processing_ms,
        })
    }
}
