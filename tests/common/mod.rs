#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use sensor_dashboard::ApiClient;
use serde_json::Value;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    format!("http://{addr}")
}

pub fn client(base_url: &str, timeout: Duration) -> ApiClient {
    ApiClient::new(base_url, timeout)
}

/// Index encoded in a `loadtest_<i>` request id.
pub fn request_index(body: &Value) -> usize {
    body["id"]
        .as_str()
        .and_then(|id| id.strip_prefix("loadtest_"))
        .and_then(|index| index.parse().ok())
        .expect("load test id")
}
