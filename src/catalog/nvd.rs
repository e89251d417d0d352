//! NVD CPE dictionary client.
//!
//! Queries `https://services.nvd.nist.gov/rest/json/cpes/2.0` in one of
//! two modes: `cpeMatchString` for exact lookups or `keywordSearch` for
//! phrases, always with `resultsPerPage=10`. Only `totalResults` and the
//! per-product `cpeName`, `cpeNameId`, `deprecated`, and title list are
//! consumed; the rest of the envelope passes through unread.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;

use super::http_client::create_shared_client;
use super::{CatalogPage, CatalogQuery, CatalogRecord, CpeCatalog};
use crate::error::DiscoveryError;

const NVD_API_BASE: &str = "https://services.nvd.nist.gov/rest/json/cpes/2.0";

/// Page size requested from the catalog.
const RESULTS_PER_PAGE: u32 = 10;

/// Client for the NVD products API.
pub struct NvdClient {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl NvdClient {
    /// Creates a client using the provided shared HTTP client.
    pub fn with_client(client: Arc<Client>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: NVD_API_BASE.to_string(),
            api_key,
        }
    }

    /// Creates a client with its own HTTP client and no API key.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::UpstreamUnavailable`] if the HTTP client
    /// cannot be built.
    pub fn new() -> Result<Self, DiscoveryError> {
        let client = create_shared_client()
            .map_err(|e| DiscoveryError::UpstreamUnavailable(e.to_string()))?;
        Ok(Self::with_client(client, None))
    }

    /// Create with a custom base URL (for testing against a local server).
    pub fn with_base_url(client: Arc<Client>, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

impl CpeCatalog for NvdClient {
    async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage, DiscoveryError> {
        let (param, value) = query.as_param();
        let params = [
            ("resultsPerPage", RESULTS_PER_PAGE.to_string()),
            (param, value.to_string()),
        ];

        let request = self.client.get(&self.base_url).query(&params);
        let request = if let Some(ref api_key) = self.api_key {
            request.header("apiKey", api_key)
        } else {
            request
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DiscoveryError::UpstreamUnavailable(format!("catalog request timed out: {e}"))
            } else {
                DiscoveryError::UpstreamUnavailable(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(DiscoveryError::UpstreamUnavailable(format!(
                "catalog returned status {}",
                response.status()
            )));
        }

        let envelope: CpeDictionaryResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::UpstreamMalformed(e.to_string()))?;

        Ok(envelope.into_page())
    }
}

// NVD API envelope. Missing `totalResults` or `products` is a decode
// error, surfaced as UpstreamMalformed.

#[derive(Debug, Deserialize)]
struct CpeDictionaryResponse {
    #[serde(rename = "totalResults")]
    total_results: u64,
    products: Vec<ProductEntry>,
}

#[derive(Debug, Deserialize)]
struct ProductEntry {
    cpe: CpeEntry,
}

#[derive(Debug, Deserialize)]
struct CpeEntry {
    #[serde(rename = "cpeName")]
    cpe_name: String,
    #[serde(rename = "cpeNameId")]
    cpe_name_id: String,
    #[serde(default)]
    deprecated: bool,
    #[serde(default)]
    titles: Vec<TitleEntry>,
}

#[derive(Debug, Deserialize)]
struct TitleEntry {
    title: String,
    lang: String,
}

impl CpeDictionaryResponse {
    fn into_page(self) -> CatalogPage {
        let records = self
            .products
            .into_iter()
            .map(|entry| {
                let title = entry
                    .cpe
                    .titles
                    .iter()
                    .find(|t| t.lang == "en")
                    .or_else(|| entry.cpe.titles.first())
                    .map(|t| t.title.clone())
                    .unwrap_or_else(|| entry.cpe.cpe_name.clone());

                CatalogRecord {
                    cpe_name: entry.cpe.cpe_name,
                    cpe_name_id: entry.cpe.cpe_name_id,
                    title,
                    deprecated: entry.cpe.deprecated,
                }
            })
            .collect();

        CatalogPage {
            total_results: self.total_results,
            records,
        }
    }
}
