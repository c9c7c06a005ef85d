#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

//! Telemetry core of the sensor dashboard.
//!
//! Two independent pieces live here: a rolling [`log::LogAggregator`] fed by
//! periodic snapshots and a push stream, and a [`loadtest::LoadTestHarness`]
//! that fires a burst of identical sensor requests and reduces their timings.

pub mod cancel;
pub mod config;
pub mod datetime;
pub mod error;
pub mod loadtest;
pub mod log;
pub mod probe;
pub mod request;
pub mod types;

pub use cancel::CancelToken;
pub use config::DashboardConfig;
pub use error::{Error, Result};
pub use loadtest::{BatchReport, LoadTestHarness, LoadTestSummary, SeriesStats};
pub use log::{start_log_stream, DashboardStats, LogAggregator, LogBuffer, Subscription};
pub use request::ApiClient;
pub use types::{Endpoint, LogLine};
