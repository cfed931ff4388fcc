//! Paginated access to the media catalog.

use super::credentials::CredentialsProvider;
use super::models::{parse_page, Collection, MediaItem, Page};
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};

use futures::stream::{self, Stream, TryStreamExt};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default number of entries requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Catalog connection settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API root, e.g. `https://cms.example.com/`. Collections live under `api/`.
    pub base_url: Url,
    pub page_size: u32,
    pub retries: u32,
    pub headers: Option<HeaderMap>,
}

impl CatalogConfig {
    /// Settings for the API at `base_url`.
    ///
    /// A missing trailing slash is added so that relative joins keep the
    /// base path.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            page_size: DEFAULT_PAGE_SIZE,
            retries: 3,
            headers: None,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// Client for the catalog's collection endpoints.
#[derive(Clone)]
pub struct CatalogClient {
    config: CatalogConfig,
    client: ClientWithMiddleware,
    credentials: Arc<dyn CredentialsProvider>,
}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Build a client with its own HTTP stack.
    pub fn new(config: CatalogConfig, credentials: Arc<dyn CredentialsProvider>) -> Result<Self> {
        let client = create_http_client(HttpClientConfig {
            retries: config.retries,
            headers: config.headers.clone(),
            ..Default::default()
        })?;
        Ok(Self::with_client(config, client, credentials))
    }

    /// Build a client sharing an existing HTTP stack.
    pub fn with_client(
        config: CatalogConfig,
        client: ClientWithMiddleware,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        Self {
            config,
            client,
            credentials,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// URL of one page of `collection`, with media relations populated.
    pub fn collection_url(&self, collection: Collection, page: u32) -> Result<Url> {
        let mut url = self
            .config
            .base_url
            .join(&format!("api/{}", collection.path()))
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("pagination[page]", &page.to_string())
            .append_pair("pagination[pageSize]", &self.config.page_size.to_string())
            .append_pair("populate", "*");
        Ok(url)
    }

    /// Fetch and validate one page.
    ///
    /// A 401 clears the injected credentials before returning
    /// [`Error::Unauthorized`].
    pub async fn fetch_page(&self, collection: Collection, page: u32) -> Result<Page> {
        let url = self.collection_url(collection, page)?;
        debug!("Fetching {}", url);

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = self.credentials.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => {
                warn!("Catalog rejected the session token, logging out");
                self.credentials.clear();
                return Err(Error::Unauthorized);
            }
            status if !status.is_success() => return Err(Error::Status(status)),
            _ => {}
        }

        let body = response.bytes().await?;
        let page = parse_page(&body, &self.config.base_url, collection, page)?;
        info!(
            "Fetched {} page {}/{} ({} items, {} rejected)",
            collection,
            page.page,
            page.page_count,
            page.items.len(),
            page.rejected
        );
        Ok(page)
    }

    /// Stream every page of `collection`, starting at page 1.
    ///
    /// The stream ends after the last page or after the first error.
    pub fn pages(&self, collection: Collection) -> impl Stream<Item = Result<Page>> + '_ {
        stream::unfold(Some(1u32), move |next| async move {
            let page = next?;
            match self.fetch_page(collection, page).await {
                Ok(fetched) => {
                    let next = fetched.has_more().then(|| page + 1);
                    Some((Ok(fetched), next))
                }
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Collect every valid item of `collection`.
    pub async fn fetch_all(&self, collection: Collection) -> Result<Vec<MediaItem>> {
        self.pages(collection)
            .map_ok(|page| page.items)
            .try_concat()
            .await
    }
}
