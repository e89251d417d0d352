//! Catalog clients for querying the NVD CPE dictionary.

use serde::Serialize;

use crate::error::DiscoveryError;

pub mod gate;
pub mod http_client;
pub mod nvd;

pub use gate::CachedCatalog;
pub use nvd::NvdClient;

/// A single query against the catalog: exactly one of an exact CPE match
/// or a keyword phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    /// `cpeMatchString` lookup for one CPE 2.3 URI.
    Exact(String),
    /// `keywordSearch` lookup for a free-text phrase.
    Keyword(String),
}

impl CatalogQuery {
    /// Canonical cache fingerprint of `(exactCpeOrEmpty, keywordOrEmpty)`.
    pub fn fingerprint(&self) -> String {
        match self {
            CatalogQuery::Exact(cpe) => format!("exact={cpe}|keyword="),
            CatalogQuery::Keyword(phrase) => format!("exact=|keyword={phrase}"),
        }
    }

    /// The query-string parameter this variant maps onto.
    pub fn as_param(&self) -> (&'static str, &str) {
        match self {
            CatalogQuery::Exact(cpe) => ("cpeMatchString", cpe),
            CatalogQuery::Keyword(phrase) => ("keywordSearch", phrase),
        }
    }
}

/// One product record from the catalog, reduced to the fields consumed
/// downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRecord {
    /// The CPE 2.3 URI.
    pub cpe_name: String,
    /// Stable catalog identifier (UUID).
    pub cpe_name_id: String,
    /// Display title: the first English title, falling back to the first
    /// title of any language, then to the URI itself.
    pub title: String,
    /// Whether the catalog marks the record deprecated. Reported, never
    /// repaired.
    pub deprecated: bool,
}

/// One page of catalog results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    /// Total matches reported by the catalog, which can exceed the page.
    pub total_results: u64,
    /// The records on this page.
    pub records: Vec<CatalogRecord>,
}

/// A queryable CPE catalog.
///
/// Implemented by [`NvdClient`] for the real service and by in-memory
/// fakes in tests; [`CachedCatalog`] wraps any implementation with the
/// rate limiter and response cache. The returned future is `Send` so a
/// pipeline can drive searches from a spawned task; implementations just
/// write `async fn search`.
pub trait CpeCatalog: Send + Sync {
    /// Runs one query and returns the decoded page.
    fn search(
        &self,
        query: &CatalogQuery,
    ) -> impl std::future::Future<Output = Result<CatalogPage, DiscoveryError>> + Send;
}

impl<T: CpeCatalog> CpeCatalog for std::sync::Arc<T> {
    async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage, DiscoveryError> {
        (**self).search(query).await
    }
}
