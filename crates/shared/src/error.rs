use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed feed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feature {index} has an out-of-range timestamp: {time_ms}")]
    Timestamp { index: usize, time_ms: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order '{0}'; expected one of time, time-asc, magnitude, magnitude-asc")]
pub struct ParseOrderByError(pub String);
