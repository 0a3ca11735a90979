//! Backend commands queued from the interactive thread to the load worker.

use feed_client::FeedQuery;

#[derive(Debug, Clone)]
pub enum BackendCommand {
    Load { query: FeedQuery },
}
