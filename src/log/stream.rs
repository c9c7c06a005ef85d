use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::DashboardConfig;
use crate::error::{Error, Result};

use super::aggregator::LogAggregator;

/// Handle to the running snapshot poller and push consumer.
///
/// Dropping the handle cancels both tasks; [`Subscription::stop`] also waits
/// for them to finish.
#[derive(Debug)]
pub struct Subscription {
    cancel: CancelToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Subscription {
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.tasks.iter().all(JoinHandle::is_finished)
    }

    pub async fn stop(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(err) = task.await {
                warn!("log stream task failed: {err}");
            }
        }
        debug!("log stream stopped");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Starts polling `/logs` on the configured interval (first fetch immediately)
/// and consuming the push channel. Must be called inside a Tokio runtime.
pub fn start_log_stream(aggregator: Arc<LogAggregator>, config: &DashboardConfig) -> Subscription {
    let cancel = CancelToken::new();

    let poller = tokio::spawn(poll_snapshots(
        Arc::clone(&aggregator),
        config.poll_interval,
        cancel.clone(),
    ));
    let pusher = tokio::spawn(consume_push_stream(
        aggregator,
        config.push_url.clone(),
        cancel.clone(),
    ));

    info!(
        poll_interval = %humantime::format_duration(config.poll_interval),
        push_url = %config.push_url,
        "log stream started"
    );

    Subscription {
        cancel,
        tasks: vec![poller, pusher],
    }
}

async fn poll_snapshots(aggregator: Arc<LogAggregator>, interval: Duration, cancel: CancelToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,
            _ = ticker.tick() => aggregator.refresh_snapshot(&cancel).await,
        }
    }
}

async fn consume_push_stream(aggregator: Arc<LogAggregator>, url: String, cancel: CancelToken) {
    match read_push_stream(&aggregator, &url, &cancel).await {
        Ok(()) => info!(url = %url, "push stream closed"),
        Err(Error::Cancelled) => debug!(url = %url, "push stream cancelled before connecting"),
        Err(err) => warn!(url = %url, "push stream error: {err}"),
    }
}

/// One frame is one log line. Reconnection is left to the caller.
async fn read_push_stream(aggregator: &LogAggregator, url: &str, cancel: &CancelToken) -> Result<()> {
    let (mut socket, _) = tokio::select! {
        biased;

        () = cancel.cancelled() => return Err(Error::Cancelled),
        connection = connect_async(url) => connection?,
    };
    debug!(url, "push stream connected");

    loop {
        let message = tokio::select! {
            biased;

            () = cancel.cancelled() => {
                if let Err(err) = socket.close(None).await {
                    debug!(url, "push stream close error: {err}");
                }
                return Ok(());
            }
            message = socket.next() => message,
        };

        match message {
            Some(Ok(Message::Text(text))) => aggregator.on_push_message(text),
            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                Ok(text) => aggregator.on_push_message(text),
                Err(err) => warn!(url, "dropping non UTF-8 log frame: {err}"),
            },
            Some(Ok(Message::Close(_))) | None => return Ok(()),
            Some(Ok(_)) => {}
            Some(Err(err)) => return Err(err.into()),
        }
    }
}
