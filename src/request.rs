use std::time::Duration;

use reqwest::RequestBuilder;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cancel::CancelToken;
use crate::config::DashboardConfig;
use crate::error::{Error, Result};

/// JSON client for the dashboard backend.
///
/// Every call is bounded by the configured timeout and aborts as soon as the
/// supplied [`CancelToken`] fires.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str, cancel: &CancelToken) -> Result<R> {
        let url = self.url(path);
        let request = self.client.get(&url);
        self.perform_request(url, request, cancel).await
    }

    pub async fn post_json<R: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        cancel: &CancelToken,
    ) -> Result<R> {
        let url = self.url(path);
        let request = self.client.post(&url).json(body);
        self.perform_request(url, request, cancel).await
    }

    async fn perform_request<R: DeserializeOwned>(
        &self,
        url: String,
        request: RequestBuilder,
        cancel: &CancelToken,
    ) -> Result<R> {
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::Status {
                    url: url.clone(),
                    status,
                });
            }

            let bytes = response.bytes().await?;
            debug!(url = %url, bytes = bytes.len(), "response received");

            let value = serde_json::from_slice::<R>(&bytes).map_err(|source| Error::Decode {
                url: url.clone(),
                source,
            })?;
            Ok::<R, Error>(value)
        };

        tokio::select! {
            biased;

            () = cancel.cancelled() => Err(Error::Cancelled),
            result = tokio::time::timeout(self.timeout, exchange) => {
                result.unwrap_or_else(|_| Err(Error::Timeout {
                    url: url.clone(),
                    after: self.timeout,
                }))
            }
        }
    }
}
