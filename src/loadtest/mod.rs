mod harness;
mod summary;

pub use harness::{LoadTestHarness, LOAD_TEST_ID_PREFIX};
pub use summary::{
    BatchReport, LoadTestResult, LoadTestSummary, RequestFailure, RequestOutcome, SeriesStats,
    DEFAULT_MAX_BARS,
};
