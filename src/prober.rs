use crate::transport::{Transport, TransportError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use url::Url;

/// Per-probe timeout used unless configured otherwise
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Concurrent dead-link checker.
///
/// Every link gets its own task. Rotten links are reported over a channel
/// that is drained once all tasks have finished, so no partial result is ever
/// observable.
#[derive(Clone)]
pub struct Prober {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    max_concurrency: Option<usize>,
}

impl Prober {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_PROBE_TIMEOUT,
            max_concurrency: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Caps the number of in-flight probes. `None` or zero means unbounded.
    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency.filter(|limit| *limit > 0);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Probes every link and returns the ones that are unreachable
    pub async fn probe(&self, links: &[String]) -> HashSet<String> {
        if links.is_empty() {
            return HashSet::new();
        }

        // One slot per link: units never wait on the collector
        let (rotten_tx, mut rotten_rx) = mpsc::channel(links.len());
        let limiter = self.max_concurrency.map(|limit| Arc::new(Semaphore::new(limit)));
        let mut units = JoinSet::new();

        for link in links {
            let link = link.clone();
            let transport = Arc::clone(&self.transport);
            let rotten_tx = rotten_tx.clone();
            let limiter = limiter.clone();
            let timeout = self.timeout;

            units.spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                if !is_reachable(transport.as_ref(), &link, timeout).await {
                    let _ = rotten_tx.send(link).await;
                }
            });
        }
        drop(rotten_tx);

        while let Some(joined) = units.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Probe task did not complete");
            }
        }

        let mut rotten = HashSet::new();
        while let Some(link) = rotten_rx.recv().await {
            rotten.insert(link);
        }

        tracing::debug!(
            probed = links.len(),
            rotten = rotten.len(),
            "Reachability probing finished"
        );

        rotten
    }
}

async fn is_reachable(transport: &dyn Transport, link: &str, timeout: Duration) -> bool {
    let url = match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        Ok(url) => {
            tracing::debug!(link = %link, scheme = %url.scheme(), "Unsupported scheme, link is unreachable");
            return false;
        }
        Err(e) => {
            tracing::debug!(link = %link, error = %e, "Malformed link, request cannot be built");
            return false;
        }
    };

    let outcome = match tokio::time::timeout(timeout, transport.get(&url)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(TransportError::Timeout {
            url: link.to_string(),
            timeout,
        }),
    };

    match outcome {
        Ok(response) if response.status < 400 => true,
        Ok(response) => {
            tracing::debug!(link = %link, status = response.status, "Link answered with an error status");
            false
        }
        Err(e) => {
            tracing::debug!(link = %link, error = %e, "Link probe failed");
            false
        }
    }
}
