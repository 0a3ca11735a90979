use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("problem building the request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("error response code: {0}")]
    Status(StatusCode),
    #[error("problem retrieving the feed: {0}")]
    Transport(#[from] reqwest::Error),
}
