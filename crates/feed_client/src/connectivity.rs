use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::warn;
use url::Url;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Answers "is there a network path to the feed?" before any load starts.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_connected(&self, endpoint: &str) -> bool;
}

/// Treats a successful TCP connect to the endpoint host as connectivity.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self {
            timeout: PROBE_TIMEOUT,
        }
    }
}

impl TcpProbe {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_connected(&self, endpoint: &str) -> bool {
        let Ok(url) = Url::parse(endpoint.trim()) else {
            warn!(%endpoint, "cannot probe connectivity for unparsable endpoint");
            return false;
        };
        let Some(host) = url.host_str() else {
            warn!(%endpoint, "endpoint has no host to probe");
            return false;
        };
        let port = url.port_or_known_default().unwrap_or(443);

        match tokio::time::timeout(self.timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(_)) => true,
            Ok(Err(err)) => {
                warn!(%host, port, error = %err, "connectivity probe failed");
                false
            }
            Err(_) => {
                warn!(%host, port, "connectivity probe timed out");
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

#[async_trait]
impl ConnectivityProbe for AlwaysOnline {
    async fn is_connected(&self, _endpoint: &str) -> bool {
        true
    }
}
