use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("operation cancelled")]
    Cancelled,

    #[error("push channel error: {0}")]
    PushChannel(Box<tungstenite::Error>),

    #[error("load test batch size must be positive")]
    InvalidBatchSize,
}

impl From<tungstenite::Error> for Error {
    fn from(err: tungstenite::Error) -> Self {
        Self::PushChannel(Box::new(err))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
