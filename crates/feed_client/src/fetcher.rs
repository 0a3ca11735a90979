use std::time::Duration;

use reqwest::{Client, StatusCode};
use shared::domain::OrderBy;
use tracing::{error, info};
use url::Url;

use crate::error::FetchError;

pub const DEFAULT_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";
pub const FEED_FORMAT: &str = "geojson";
pub const START_TIME: &str = "2000-01-01";
pub const END_TIME: &str = "2020-02-24";
pub const RESULT_LIMIT: u32 = 20;
pub const DEFAULT_MIN_MAGNITUDE: &str = "6";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Parameters of one feed request. Only `min_magnitude`, `order_by` and
/// `endpoint` come from user settings; the rest are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub endpoint: String,
    pub min_magnitude: String,
    pub order_by: OrderBy,
    pub start_time: String,
    pub end_time: String,
    pub limit: u32,
    pub format: String,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            min_magnitude: DEFAULT_MIN_MAGNITUDE.into(),
            order_by: OrderBy::default(),
            start_time: START_TIME.into(),
            end_time: END_TIME.into(),
            limit: RESULT_LIMIT,
            format: FEED_FORMAT.into(),
        }
    }
}

impl FeedQuery {
    pub fn new(
        endpoint: impl Into<String>,
        min_magnitude: impl Into<String>,
        order_by: OrderBy,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            min_magnitude: min_magnitude.into(),
            order_by,
            ..Self::default()
        }
    }

    /// Query values are percent-encoded, so a setting such as `"5&limit=1"`
    /// stays inside its own parameter.
    pub fn request_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(self.endpoint.trim())?;
        url.query_pairs_mut()
            .append_pair("format", &self.format)
            .append_pair("starttime", &self.start_time)
            .append_pair("endtime", &self.end_time)
            .append_pair("minmagnitude", self.min_magnitude.trim())
            .append_pair("limit", &self.limit.to_string())
            .append_pair("orderby", self.order_by.as_str());
        Ok(url)
    }
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    http: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    pub async fn try_fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }
        Ok(response.text().await?)
    }

    /// Single GET for `query`. Failures are logged and come back as an
    /// empty body.
    pub async fn fetch_text(&self, query: &FeedQuery) -> String {
        let url = match query.request_url() {
            Ok(url) => url,
            Err(err) => {
                error!(endpoint = %query.endpoint, error = %err, "problem building the feed URL");
                return String::new();
            }
        };
        info!(%url, "requesting earthquake feed");

        match self.try_fetch(&url).await {
            Ok(body) => body,
            Err(FetchError::Status(status)) => {
                error!(%url, %status, "error response code from feed");
                String::new()
            }
            Err(err) => {
                error!(%url, error = %err, "problem retrieving the earthquake feed");
                String::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;
