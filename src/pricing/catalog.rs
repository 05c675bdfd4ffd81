//! Price catalog: one memoized load of a service's price documents.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{try_join_all, BoxFuture, Shared};
use futures::FutureExt;

use crate::config::PricingSourceConfig;
use crate::core::PricingError;
use crate::pricing::document::PricingDocument;
use crate::pricing::parser::parse_document;
use crate::pricing::prices::{PricingData, RegionPrices};

/// Source of raw price documents.
#[async_trait]
pub trait PriceFetcher: Send + Sync + 'static {
    /// Fetch and decode the document at `url`.
    async fn fetch(&self, url: &str) -> Result<PricingDocument, PricingError>;
}

/// Fetcher serving documents registered in memory, keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceFetcher {
    documents: HashMap<String, PricingDocument>,
}

impl StaticPriceFetcher {
    /// Fetcher with no documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` for `url`.
    #[must_use]
    pub fn with_document(mut self, url: impl Into<String>, document: PricingDocument) -> Self {
        self.documents.insert(url.into(), document);
        self
    }

    /// Serve the JSON document `json` for `url`.
    pub fn with_json(self, url: impl Into<String>, json: &str) -> Result<Self, PricingError> {
        let url = url.into();
        let document = PricingDocument::from_json_str(json).map_err(|e| PricingError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        Ok(self.with_document(url, document))
    }
}

#[async_trait]
impl PriceFetcher for StaticPriceFetcher {
    async fn fetch(&self, url: &str) -> Result<PricingDocument, PricingError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| PricingError::Fetch {
                url: url.to_owned(),
                reason: "no document registered".into(),
            })
    }
}

/// HTTP fetcher, optionally going through a relay that takes the target
/// URL (without scheme) appended to its own.
#[cfg(feature = "http-fetch")]
#[derive(Debug, Clone)]
pub struct HttpPriceFetcher {
    client: reqwest::Client,
    relay: Option<String>,
}

#[cfg(feature = "http-fetch")]
impl HttpPriceFetcher {
    /// Fetcher with a 30 second request timeout.
    pub fn new() -> Result<Self, PricingError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PricingError::Fetch {
                url: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            relay: None,
        })
    }

    /// Route every request through `relay`.
    #[must_use]
    pub fn with_relay(mut self, relay: Option<String>) -> Self {
        self.relay = relay;
        self
    }

    /// URL actually requested for `url`.
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> String {
        match &self.relay {
            Some(relay) => {
                let bare = url
                    .strip_prefix("https://")
                    .or_else(|| url.strip_prefix("http://"))
                    .unwrap_or(url);
                format!("{relay}{bare}")
            }
            None => url.to_owned(),
        }
    }
}

#[cfg(feature = "http-fetch")]
#[async_trait]
impl PriceFetcher for HttpPriceFetcher {
    async fn fetch(&self, url: &str) -> Result<PricingDocument, PricingError> {
        let target = self.resolve_url(url);
        tracing::info!(%url, %target, "downloading price document");

        let fetch_err = |reason: String| PricingError::Fetch {
            url: url.to_owned(),
            reason,
        };

        let response = self
            .client
            .get(&target)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_err(format!("failed to read response: {e}")))?;
        tracing::debug!(%url, bytes = body.len(), "downloaded price document");

        PricingDocument::from_json_str(&body).map_err(|e| PricingError::Decode {
            url: url.to_owned(),
            reason: e.to_string(),
        })
    }
}

type LoadFuture = Shared<BoxFuture<'static, Result<Arc<PricingData>, PricingError>>>;

/// Region-keyed prices of one service.
///
/// All sources are fetched concurrently once per catalog; the result (or
/// the error) is shared by every [`for_region`](Self::for_region) call.
/// Construct one catalog per service and hand it to every region worker.
pub struct PriceCatalog {
    sources: Vec<PricingSourceConfig>,
    load: LoadFuture,
}

impl std::fmt::Debug for PriceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceCatalog")
            .field("sources", &self.sources.iter().map(|s| &s.url).collect::<Vec<_>>())
            .field("loaded", &self.load.peek().is_some())
            .finish()
    }
}

impl PriceCatalog {
    /// Create a catalog and, inside a tokio runtime, start loading it.
    pub fn new(sources: Vec<PricingSourceConfig>, fetcher: Arc<dyn PriceFetcher>) -> Self {
        let load = load_all(sources.clone(), fetcher).boxed().shared();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let warm = load.clone();
            handle.spawn(async move {
                if let Err(e) = warm.await {
                    tracing::error!(error = %e, "price catalog load failed");
                }
            });
        }

        Self { sources, load }
    }

    /// Configured sources.
    #[must_use]
    pub fn sources(&self) -> &[PricingSourceConfig] {
        &self.sources
    }

    /// Prices for a region code.
    pub async fn for_region(&self, region: &str) -> Result<Arc<RegionPrices>, PricingError> {
        let data = self.load.clone().await?;
        data.get(region)
            .cloned()
            .ok_or_else(|| PricingError::RegionNotFound(region.to_owned()))
    }

    /// Region codes with prices, sorted.
    pub async fn regions(&self) -> Result<Vec<String>, PricingError> {
        let data = self.load.clone().await?;
        let mut regions: Vec<String> = data.keys().cloned().collect();
        regions.sort();
        Ok(regions)
    }
}

async fn load_all(
    sources: Vec<PricingSourceConfig>,
    fetcher: Arc<dyn PriceFetcher>,
) -> Result<Arc<PricingData>, PricingError> {
    tracing::info!(sources = sources.len(), "loading price catalog");

    let parsed = try_join_all(sources.iter().map(|source| {
        let fetcher = Arc::clone(&fetcher);
        async move {
            let document = fetcher.fetch(&source.url).await?;
            parse_document(&document, source)
        }
    }))
    .await?;

    let mut merged: HashMap<String, RegionPrices> = HashMap::new();
    for data in parsed {
        for (region, prices) in data {
            merged.entry(region).or_default().merge(prices);
        }
    }

    tracing::info!(regions = merged.len(), "price catalog loaded");
    Ok(Arc::new(
        merged
            .into_iter()
            .map(|(region, prices)| (region, Arc::new(prices)))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "http-fetch")]
    #[test]
    fn test_relay_url_strips_scheme() {
        let fetcher = HttpPriceFetcher::new()
            .unwrap()
            .with_relay(Some("https://relay.example/".into()));
        assert_eq!(
            fetcher.resolve_url("https://calculator.aws/pricing/kms.json"),
            "https://relay.example/calculator.aws/pricing/kms.json"
        );

        let direct = HttpPriceFetcher::new().unwrap();
        assert_eq!(direct.resolve_url("http://a/b"), "http://a/b");
    }

    #[tokio::test]
    async fn test_missing_document_is_fetch_error() {
        let catalog = PriceCatalog::new(
            vec![PricingSourceConfig::new("https://nowhere/prices.json")],
            Arc::new(StaticPriceFetcher::new()),
        );

        let err = catalog.for_region("us-east-1").await.unwrap_err();
        assert!(matches!(err, PricingError::Fetch { .. }));
    }
}
