use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Outcome of a completed request/response exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {message}")]
    Scripted { url: String, message: String },
}

/// The capability to perform one GET exchange against a URL
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<ProbeResponse, TransportError>;
}

/// Transport backed by a shared reqwest client
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<ProbeResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();

        // Dropping the response releases the body and its connection
        drop(response);

        Ok(ProbeResponse { status })
    }
}

/// Canned behaviour for one URL of a `ScriptedTransport`
#[derive(Debug, Clone)]
pub enum Scripted {
    Status(u16),
    Error(String),
    /// Responds with the status after sleeping
    Delayed(Duration, u16),
}

/// Transport returning canned outcomes per URL, for tests and dry runs.
///
/// URLs without a script answer with the fallback status (200 unless set).
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    scripts: HashMap<String, Scripted>,
    fallback: Scripted,
    requests: Arc<AtomicUsize>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            fallback: Scripted::Status(200),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn respond(mut self, url: &str, script: Scripted) -> Self {
        self.scripts.insert(url.to_string(), script);
        self
    }

    pub fn fallback(mut self, script: Scripted) -> Self {
        self.fallback = script;
        self
    }

    /// Number of requests issued so far, shared between clones
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn script_for(&self, url: &Url) -> &Scripted {
        // Url::parse adds a trailing slash to bare hosts
        let key = url.as_str();
        self.scripts
            .get(key)
            .or_else(|| self.scripts.get(key.trim_end_matches('/')))
            .unwrap_or(&self.fallback)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<ProbeResponse, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        match self.script_for(url).clone() {
            Scripted::Status(status) => Ok(ProbeResponse { status }),
            Scripted::Error(message) => Err(TransportError::Scripted {
                url: url.to_string(),
                message,
            }),
            Scripted::Delayed(delay, status) => {
                tokio::time::sleep(delay).await;
                Ok(ProbeResponse { status })
            }
        }
    }
}
