//! Retrieval of remote image sources.

use crate::common::error::{Error, Result};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

/// Raw bytes of a fetched resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// `Content-Type` reported by the server
    pub content_type: Option<String>,
}

/// Source of remote image bytes.
///
/// Implementations must not attach credentials to requests.
pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<FetchedImage>>;
}

/// Plain HTTP(S) fetcher.
#[cfg(feature = "remote")]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "remote")]
impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "remote")]
impl ImageFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<FetchedImage>> {
        async move {
            let response = self.client.get(url).send().await?.error_for_status()?;
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = response.bytes().await?.to_vec();
            Ok::<_, Error>(FetchedImage {
                bytes,
                content_type,
            })
        }
        .boxed()
    }
}

/// Fetcher that refuses every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl ImageFetcher for OfflineFetcher {
    fn fetch<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<FetchedImage>> {
        futures::future::ready(Err(Error::FeatureDisabled("remote".to_string()))).boxed()
    }
}

/// HTTP fetcher when remote sources are enabled, otherwise [`OfflineFetcher`].
pub fn default_fetcher() -> Arc<dyn ImageFetcher> {
    #[cfg(feature = "remote")]
    {
        Arc::new(HttpFetcher::new())
    }
    #[cfg(not(feature = "remote"))]
    {
        Arc::new(OfflineFetcher)
    }
}
