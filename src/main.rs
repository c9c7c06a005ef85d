use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sensor_dashboard::probe::send_sensor_update;
use sensor_dashboard::{
    start_log_stream, ApiClient, CancelToken, DashboardConfig, Endpoint, LoadTestHarness,
    LogAggregator,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensor_dashboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DashboardConfig::from_env();
    info!(base_url = %config.base_url, "sensor dashboard starting");

    let client = ApiClient::from_config(&config);
    let aggregator = Arc::new(LogAggregator::new(client.clone(), config.log_capacity));
    let subscription = start_log_stream(Arc::clone(&aggregator), &config);

    let cancel = CancelToken::new();
    let harness = LoadTestHarness::from_config(client.clone(), &config);

    for endpoint in [Endpoint::Parallel, Endpoint::Sequential] {
        if let Some(metrics) = send_sensor_update(&client, endpoint, &cancel).await {
            info!(%endpoint, ?metrics, "sensor probe");
        }

        let summary = harness
            .run_with_cancel(endpoint, config.load_test_requests, &cancel)
            .await?;
        println!("{}\n", summary.report());
    }

    let stats = aggregator.current_stats();
    info!(
        errors = stats.error_count,
        infos = stats.info_count,
        last_anomaly = stats.last_anomaly.as_ref().map(|line| line.as_str()),
        "dashboard stats"
    );

    subscription.stop().await;

    Ok(())
}
