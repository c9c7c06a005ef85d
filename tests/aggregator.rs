mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Json, Router};
use sensor_dashboard::log::FETCH_ERROR_PLACEHOLDER;
use sensor_dashboard::{CancelToken, DashboardStats, LogAggregator, LogLine};
use serde_json::json;

use common::{client, spawn_server};

fn aggregator(base_url: &str, timeout: Duration) -> LogAggregator {
    LogAggregator::new(client(base_url, timeout), 200)
}

fn line(text: &str) -> LogLine {
    LogLine::from(text)
}

#[tokio::test]
async fn snapshot_replaces_buffer_with_last_lines() {
    let router = Router::new().route(
        "/logs",
        get(|| async {
            let lines: Vec<String> = (0..250).map(|i| format!("INFO tick {i}")).collect();
            Json(lines)
        }),
    );
    let base_url = spawn_server(router).await;
    let aggregator = aggregator(&base_url, Duration::from_secs(5));
    aggregator.on_push_message("ERROR pushed before the snapshot");

    aggregator.refresh_snapshot(&CancelToken::new()).await;

    let buffer = aggregator.current_buffer();
    assert_eq!(buffer.len(), 200);
    assert_eq!(buffer.first(), Some(&line("INFO tick 50")));
    assert_eq!(buffer.last(), Some(&line("INFO tick 249")));
    assert_eq!(
        aggregator.current_stats(),
        DashboardStats {
            error_count: 0,
            info_count: 200,
            last_anomaly: None,
        }
    );
    assert!(!aggregator.snapshot().degraded);
}

#[tokio::test]
async fn pushes_after_snapshot_update_stats_immediately() {
    let router = Router::new().route(
        "/logs",
        get(|| async { Json(json!(["INFO boot", "WARN Anomalia global detectada A"])) }),
    );
    let base_url = spawn_server(router).await;
    let aggregator = aggregator(&base_url, Duration::from_secs(5));

    aggregator.refresh_snapshot(&CancelToken::new()).await;
    aggregator.on_push_message("ERROR sensor 4 Anomalia global detectada B");

    let stats = aggregator.current_stats();
    assert_eq!(stats.error_count, 1);
    assert_eq!(stats.info_count, 1);
    assert_eq!(
        stats.last_anomaly,
        Some(line("ERROR sensor 4 Anomalia global detectada B"))
    );
    assert_eq!(aggregator.current_buffer().len(), 3);
}

async fn assert_placeholder(aggregator: &LogAggregator) {
    aggregator.on_push_message("ERROR stale line");
    aggregator.refresh_snapshot(&CancelToken::new()).await;

    let snapshot = aggregator.snapshot();
    assert!(snapshot.degraded);
    assert_eq!(snapshot.buffer.to_vec(), vec![line(FETCH_ERROR_PLACEHOLDER)]);
    assert_eq!(snapshot.stats, DashboardStats::default());
}

#[tokio::test]
async fn server_error_falls_back_to_placeholder() {
    let router = Router::new().route("/logs", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let base_url = spawn_server(router).await;
    assert_placeholder(&aggregator(&base_url, Duration::from_secs(5))).await;
}

#[tokio::test]
async fn malformed_payload_falls_back_to_placeholder() {
    let router = Router::new().route(
        "/logs",
        get(|| async { Json(json!({ "logs": "not an array" })) }),
    );
    let base_url = spawn_server(router).await;
    assert_placeholder(&aggregator(&base_url, Duration::from_secs(5))).await;
}

#[tokio::test]
async fn slow_snapshot_times_out_to_placeholder() {
    let router = Router::new().route(
        "/logs",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!(["INFO late"]))
        }),
    );
    let base_url = spawn_server(router).await;
    assert_placeholder(&aggregator(&base_url, Duration::from_millis(100))).await;
}

#[tokio::test]
async fn successful_snapshot_clears_degraded_state() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let router = Router::new().route(
        "/logs",
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                } else {
                    Ok(Json(json!(["INFO recovered"])))
                }
            }
        }),
    );
    let base_url = spawn_server(router).await;
    let aggregator = aggregator(&base_url, Duration::from_secs(5));
    let cancel = CancelToken::new();

    aggregator.refresh_snapshot(&cancel).await;
    assert!(aggregator.snapshot().degraded);

    aggregator.refresh_snapshot(&cancel).await;
    let snapshot = aggregator.snapshot();
    assert!(!snapshot.degraded);
    assert_eq!(snapshot.buffer.to_vec(), vec![line("INFO recovered")]);
    assert_eq!(snapshot.stats.info_count, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cancelled_snapshot_keeps_current_state() {
    let router = Router::new().route(
        "/logs",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!(["INFO never"]))
        }),
    );
    let base_url = spawn_server(router).await;
    let aggregator = aggregator(&base_url, Duration::from_secs(30));
    aggregator.on_push_message("INFO kept");

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });
    aggregator.refresh_snapshot(&cancel).await;

    let snapshot = aggregator.snapshot();
    assert!(!snapshot.degraded);
    assert_eq!(snapshot.buffer.to_vec(), vec![line("INFO kept")]);
}
