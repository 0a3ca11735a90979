use std::sync::Arc;

use async_trait::async_trait;
use shared::feed::{parse_feed, ParsedFeed};
use tracing::info;

use crate::fetcher::{FeedQuery, Fetcher};

/// Where response bodies come from. Implementations swallow their own
/// failures and hand back an empty string.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_text(&self, query: &FeedQuery) -> String;
}

#[async_trait]
impl FeedSource for Fetcher {
    async fn fetch_text(&self, query: &FeedQuery) -> String {
        Fetcher::fetch_text(self, query).await
    }
}

#[async_trait]
impl<T: FeedSource + ?Sized> FeedSource for Arc<T> {
    async fn fetch_text(&self, query: &FeedQuery) -> String {
        (**self).fetch_text(query).await
    }
}

pub struct FeedLoader<S> {
    source: S,
}

impl<S: FeedSource> FeedLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// One fetch followed by one parse.
    pub async fn load(&self, query: &FeedQuery) -> ParsedFeed {
        let body = self.source.fetch_text(query).await;
        let parsed = parse_feed(&body);
        match &parsed {
            ParsedFeed::NoInput => info!("feed load returned no data"),
            ParsedFeed::Malformed(_) => info!("feed load returned a malformed document"),
            ParsedFeed::Events(events) => info!(count = events.len(), "feed load finished"),
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct CannedSource {
        body: String,
        seen: Mutex<Vec<FeedQuery>>,
    }

    impl CannedSource {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FeedSource for CannedSource {
        async fn fetch_text(&self, query: &FeedQuery) -> String {
            self.seen.lock().expect("lock").push(query.clone());
            self.body.clone()
        }
    }

    #[tokio::test]
    async fn load_fetches_once_and_parses_the_body() {
        let body = r#"{"features":[{"properties":{"place":"5km NW of Example City","mag":4.3,"time":1582556820000,"url":"https://x"}}]}"#;
        let loader = FeedLoader::new(CannedSource::new(body));
        let query = FeedQuery::default();

        let parsed = loader.load(&query).await;

        assert_eq!(parsed.len(), 1);
        assert_eq!(loader.source.seen.lock().expect("lock").as_slice(), &[query]);
    }

    #[tokio::test]
    async fn empty_body_is_no_input() {
        let loader = FeedLoader::new(CannedSource::new(""));
        assert_eq!(loader.load(&FeedQuery::default()).await, ParsedFeed::NoInput);
    }
}
