use chrono::Utc;
use rand::Rng;
use tracing::{debug, error};

use crate::cancel::CancelToken;
use crate::datetime::unix_seconds;
use crate::request::ApiClient;
use crate::types::{Endpoint, SensorMetrics, SensorRequest, SensorResponse};

pub const PROBE_SENSOR_TYPE: &str = "Frontend";

/// Posts a single sensor update and returns the metrics the backend reported.
///
/// Errors are logged and yield `None`, as does a response without
/// `processing_ms`.
pub async fn send_sensor_update(
    client: &ApiClient,
    endpoint: Endpoint,
    cancel: &CancelToken,
) -> Option<SensorMetrics> {
    let request = probe_request(endpoint);

    match client
        .post_json::<SensorResponse>(endpoint.path(), &request, cancel)
        .await
    {
        Ok(response) => {
            let metrics = response.into_metrics();
            if metrics.is_none() {
                debug!(%endpoint, "sensor response carried no processing_ms");
            }
            metrics
        }
        Err(err) => {
            error!(%endpoint, "sensor update error: {err}");
            None
        }
    }
}

fn probe_request(endpoint: Endpoint) -> SensorRequest {
    let id = match endpoint {
        Endpoint::Parallel => "frontend_test",
        Endpoint::Sequential => "frontend_seq_test",
    };

    SensorRequest {
        id: id.to_string(),
        value: rand::thread_rng().gen_range(0.0..100.0),
        sensor_type: PROBE_SENSOR_TYPE.to_string(),
        timestamp: unix_seconds(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_ids_follow_endpoint() {
        assert_eq!(probe_request(Endpoint::Parallel).id, "frontend_test");
        assert_eq!(probe_request(Endpoint::Sequential).id, "frontend_seq_test");
        assert_eq!(probe_request(Endpoint::Parallel).sensor_type, "Frontend");
    }
}
