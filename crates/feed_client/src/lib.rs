pub mod connectivity;
pub mod error;
pub mod fetcher;
pub mod loader;

pub use connectivity::{AlwaysOnline, ConnectivityProbe, TcpProbe};
pub use error::FetchError;
pub use fetcher::{FeedQuery, Fetcher};
pub use loader::{FeedLoader, FeedSource};
