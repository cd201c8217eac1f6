//! Client for the upstream reference catalog (villagers and gyroids).
//!
//! The [`CatalogSource`] trait is the seam between the HTTP handlers and the upstream API. In
//! production it is backed by [`ReqwestCatalog`], which sends the configured API key and version
//! headers on every request. Responses are not cached: every call is one round trip.

pub mod models;

use crate::config::CatalogConfig;
use async_trait::async_trait;
use models::{GyroidRecord, VillagerRecord};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Header carrying the upstream API key
pub const API_KEY_HEADER: &str = "X-API-KEY";
/// Header carrying the requested upstream API version
pub const API_VERSION_HEADER: &str = "Accept-Version";

/// Errors raised while talking to the upstream catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The upstream answered with a non-success status
    #[error("catalog API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be sent or the response could not be read
    #[error("catalog API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a body that is not the expected JSON
    #[error("failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Source of catalog records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full villager catalog
    async fn fetch_villagers(&self) -> Result<Vec<VillagerRecord>, CatalogError>;

    /// Fetch the full gyroid catalog
    async fn fetch_gyroids(&self) -> Result<Vec<GyroidRecord>, CatalogError>;
}

/// The concrete, reqwest-backed implementation of [`CatalogSource`].
pub struct ReqwestCatalog {
    client: Client,
    base_url: Url,
    api_key: String,
    accept_version: String,
}

impl ReqwestCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: ensure_slash(&config.base_url),
            api_key: config.api_key.clone(),
            accept_version: config.accept_version.clone(),
        })
    }

    #[instrument(skip(self), err)]
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.base_url.join(path)?;
        debug!("Fetching catalog records from {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_VERSION_HEADER, &self.accept_version)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Catalog API returned {} for {}", status, url);
            return Err(CatalogError::Status { status, body });
        }

        let body_text = response.text().await?;
        serde_json::from_str::<T>(&body_text).map_err(|e| {
            tracing::error!("Failed to parse catalog response from {}: {}", url, e);
            CatalogError::Decode(e)
        })
    }
}

#[async_trait]
impl CatalogSource for ReqwestCatalog {
    async fn fetch_villagers(&self) -> Result<Vec<VillagerRecord>, CatalogError> {
        self.get_json("villagers").await
    }

    async fn fetch_gyroids(&self) -> Result<Vec<GyroidRecord>, CatalogError> {
        self.get_json("nh/gyroids").await
    }
}

/// Makes sure a url has a trailing slash.
///
/// Joining `/api` with `villagers` gives `/villagers`, but joining `/api/` gives
/// `/api/villagers`. Call this before calling `.join`.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let path = format!("{}/", url.path());
        new_url.set_path(&path);
        new_url
    }
}

/// Whether a transport failure was a timeout, used to pick between 502 and 504.
pub(crate) fn is_timeout(err: &CatalogError) -> bool {
    matches!(err, CatalogError::Transport(e) if e.is_timeout())
}
