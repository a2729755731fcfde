use crate::classifier::{compute_stats, normalize};
use crate::extractor::extract_stream;
use crate::http_client::build_http_client;
use crate::models::PageReport;
use crate::prober::{DEFAULT_PROBE_TIMEOUT, Prober};
use crate::transport::ReqwestTransport;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failures that abort an analysis. Anything that goes wrong below the origin
/// fetch is folded into the report instead.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("url not defined")]
    MissingUrl,

    #[error("malformed url '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("can not make request to {url}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl AnalyzeError {
    /// Message safe to hand back to API callers
    pub fn public_message(&self) -> &'static str {
        match self {
            AnalyzeError::MissingUrl => "url not defined",
            AnalyzeError::MalformedUrl { .. } => "malformed url",
            AnalyzeError::Unreachable { .. } => "can not make request to the specified url",
        }
    }
}

/// Configuration for the analyzer
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Timeout for the page fetch and for each link probe
    pub timeout: Duration,
    /// Upper bound on in-flight link probes, unbounded when `None`
    pub max_concurrency: Option<usize>,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            max_concurrency: None,
        }
    }
}

pub struct Analyzer {
    client: reqwest::Client,
    prober: Prober,
}

impl Analyzer {
    pub fn new(settings: &AnalyzerSettings) -> anyhow::Result<Self> {
        let client = build_http_client(settings.timeout)?;
        let prober = Prober::new(ReqwestTransport::new(client.clone()))
            .with_timeout(settings.timeout)
            .with_max_concurrency(settings.max_concurrency);

        Ok(Self { client, prober })
    }

    /// Replaces the link prober, keeping the page-fetch client
    pub fn with_prober(mut self, prober: Prober) -> Self {
        self.prober = prober;
        self
    }

    pub async fn analyze(&self, target: &str) -> Result<PageReport, AnalyzeError> {
        let origin = parse_target(target)?;

        tracing::debug!(url = %origin, "Fetching page");
        let response = self
            .client
            .get(origin.clone())
            .send()
            .await
            .map_err(|source| AnalyzeError::Unreachable {
                url: origin.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            tracing::warn!(
                url = %origin,
                status = %response.status(),
                "Page answered with a non-success status, analyzing body anyway"
            );
        }

        let facts = extract_stream(response.bytes_stream()).await;
        tracing::debug!(
            url = %origin,
            links = facts.links.len(),
            title = %facts.title,
            "Extracted page facts"
        );

        let mut link_stats = compute_stats(&origin, &facts.links);
        let links = normalize(&origin, &facts.links);
        let rotten = self.prober.probe(&links).await;
        link_stats.unreachable = rotten.len();

        Ok(facts.into_report(link_stats))
    }
}

/// Validates the analysis target: it must be an absolute http(s) URL
pub fn parse_target(target: &str) -> Result<Url, AnalyzeError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(AnalyzeError::MissingUrl);
    }

    let url = Url::parse(target).map_err(|e| AnalyzeError::MalformedUrl {
        url: target.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AnalyzeError::MalformedUrl {
            url: target.to_string(),
            reason: format!("unsupported scheme '{}', only http and https are supported", scheme),
        }),
    }
}
