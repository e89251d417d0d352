//! Progressive narrowing of catalog keyword queries.
//!
//! A broad query against the CPE dictionary can match thousands of
//! records; a query one token too specific matches none. The orchestrator
//! walks between those cliffs: it starts from the vendor/product base
//! query and appends version material one step at a time, stopping at the
//! first result set at or below the narrow target, and backing off when a
//! step overshoots to zero.

use crate::catalog::{CatalogPage, CatalogQuery, CatalogRecord, CpeCatalog};
use crate::error::DiscoveryError;
use crate::event::{Phase, ProgressSender};
use crate::parser::ParsedAsset;

/// What a search run produced.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// The selected result set, de-duplicated by CPE name, catalog order
    /// preserved.
    pub records: Vec<CatalogRecord>,
    /// Total matches the catalog reported for the selected query.
    pub total_found: u64,
    /// True when a mid-narrowing failure forced a best-effort return.
    pub partial: bool,
}

impl SearchOutcome {
    fn from_page(page: CatalogPage, partial: bool) -> Self {
        let mut seen = std::collections::HashSet::new();
        let records = page
            .records
            .into_iter()
            .filter(|r| seen.insert(r.cpe_name.clone()))
            .collect();
        Self {
            records,
            total_found: page.total_results,
            partial,
        }
    }
}

/// Progressive search orchestrator.
pub struct ProgressiveSearch<'a, C> {
    catalog: &'a C,
    narrow_target: usize,
}

impl<'a, C: CpeCatalog> ProgressiveSearch<'a, C> {
    pub fn new(catalog: &'a C, narrow_target: usize) -> Self {
        Self {
            catalog,
            narrow_target,
        }
    }

    /// Runs the narrowing loop for a parsed asset.
    ///
    /// The first query is load-bearing: an upstream failure there is
    /// fatal. Failures after a usable set exists degrade to returning the
    /// best set so far, flagged partial, with a warning event.
    pub async fn run(
        &self,
        asset: &ParsedAsset,
        events: &ProgressSender,
    ) -> Result<SearchOutcome, DiscoveryError> {
        let base_query = compose_base_query(asset);

        let r0 = self.fetch(&base_query, 0, events).await?;
        let total0 = r0.total_results;

        if self.is_narrow(&r0) {
            return Ok(SearchOutcome::from_page(r0, false));
        }

        if let Some(ref version) = asset.version {
            let query = format!("{base_query} {version}");
            let rv = match self.fetch(&query, total0, events).await {
                Ok(page) => page,
                Err(DiscoveryError::Cancelled) => return Err(DiscoveryError::Cancelled),
                Err(err) => return self.degrade(r0, &err, events).await,
            };

            if rv.total_results == 0 {
                // Too specific; the catalog does not key this entry by
                // version text. Back off to the broad set.
                return Ok(SearchOutcome::from_page(r0, false));
            }
            if self.is_narrow(&rv) {
                return Ok(SearchOutcome::from_page(rv, false));
            }
        }

        if asset.version_candidates.is_empty() {
            return Ok(SearchOutcome::from_page(r0, false));
        }

        // Iterative narrowing: keep appending version-shaped tokens until
        // the set is small enough, overshoots to zero, or we run out.
        let mut current = r0;
        let mut query = base_query;

        for candidate in &asset.version_candidates {
            query = format!("{query} {candidate}");
            let rn = match self.fetch(&query, current.total_results, events).await {
                Ok(page) => page,
                Err(DiscoveryError::Cancelled) => return Err(DiscoveryError::Cancelled),
                Err(err) => return self.degrade(current, &err, events).await,
            };

            if rn.total_results == 0 {
                // Overshot: the previous, looser set was as good as it
                // gets.
                return Ok(SearchOutcome::from_page(current, false));
            }
            if self.is_narrow(&rn) {
                return Ok(SearchOutcome::from_page(rn, false));
            }
            current = rn;
        }

        Ok(SearchOutcome::from_page(current, false))
    }

    fn is_narrow(&self, page: &CatalogPage) -> bool {
        (page.total_results as usize) <= self.narrow_target
    }

    async fn fetch(
        &self,
        query: &str,
        current_count: u64,
        events: &ProgressSender,
    ) -> Result<CatalogPage, DiscoveryError> {
        events
            .progress(
                Phase::Searching,
                format!("Searching catalog for \"{query}\" ({current_count} matches so far)..."),
            )
            .await?;

        self.catalog
            .search(&CatalogQuery::Keyword(query.to_string()))
            .await
    }

    async fn degrade(
        &self,
        best: CatalogPage,
        err: &DiscoveryError,
        events: &ProgressSender,
    ) -> Result<SearchOutcome, DiscoveryError> {
        tracing::warn!(error = %err, "narrowing interrupted, returning best set so far");
        events
            .progress(
                Phase::Searching,
                format!("Warning: narrowing interrupted ({err}); keeping best results so far"),
            )
            .await?;
        Ok(SearchOutcome::from_page(best, true))
    }
}

/// Composes the base keyword query: vendor and product joined by one
/// space, collapsed when they name the same thing, falling back to the
/// raw text when the parse produced neither.
fn compose_base_query(asset: &ParsedAsset) -> String {
    match (asset.vendor.as_deref(), asset.product.as_deref()) {
        (Some(vendor), Some(product)) if vendor == product => vendor.to_string(),
        (Some(vendor), Some(product)) => format!("{vendor} {product}"),
        (Some(vendor), None) => vendor.to_string(),
        (None, Some(product)) => product.to_string(),
        (None, None) => asset.raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use tokio::sync::mpsc;

    use super::*;
    use crate::parser::AssetParser;

    /// Scripted catalog: maps keyword text to a canned page and records
    /// the queries it served.
    struct ScriptedCatalog {
        pages: HashMap<String, CatalogPage>,
        log: Mutex<Vec<String>>,
    }

    impl ScriptedCatalog {
        fn new(pages: Vec<(&str, CatalogPage)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                log: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl CpeCatalog for ScriptedCatalog {
        async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage, DiscoveryError> {
            let CatalogQuery::Keyword(text) = query else {
                panic!("progressive search only issues keyword queries");
            };
            self.log.lock().unwrap().push(text.clone());
            match self.pages.get(text) {
                Some(page) => Ok(page.clone()),
                None => Err(DiscoveryError::UpstreamUnavailable("unscripted query".into())),
            }
        }
    }

    fn page(total: u64, names: &[&str]) -> CatalogPage {
        CatalogPage {
            total_results: total,
            records: names
                .iter()
                .map(|n| CatalogRecord {
                    cpe_name: n.to_string(),
                    cpe_name_id: format!("id-{n}"),
                    title: n.to_string(),
                    deprecated: false,
                })
                .collect(),
        }
    }

    fn events() -> (ProgressSender, mpsc::Receiver<crate::event::ProgressEvent>) {
        let (tx, rx) = mpsc::channel(64);
        (ProgressSender::new(tx), rx)
    }

    async fn run(
        catalog: &ScriptedCatalog,
        asset_text: &str,
    ) -> Result<SearchOutcome, DiscoveryError> {
        let asset = AssetParser::new().parse(asset_text);
        let (sender, _rx) = events();
        ProgressiveSearch::new(catalog, 10).run(&asset, &sender).await
    }

    #[tokio::test]
    async fn test_narrow_first_page_makes_one_call() {
        let catalog = ScriptedCatalog::new(vec![(
            "nginx",
            page(3, &["cpe:2.3:a:nginx:nginx:1.24.0:*:*:*:*:*:*:*"]),
        )]);

        let outcome = run(&catalog, "nginx 1.24.0").await.unwrap();
        assert_eq!(outcome.total_found, 3);
        assert!(!outcome.partial);
        assert_eq!(catalog.queries(), vec!["nginx"]);
    }

    #[tokio::test]
    async fn test_version_refinement_returns_narrow_set() {
        let catalog = ScriptedCatalog::new(vec![
            ("apache http server", page(120, &["broad"])),
            (
                "apache http server 2.4.51",
                page(2, &["cpe:2.3:a:apache:http_server:2.4.51:*:*:*:*:*:*:*"]),
            ),
        ]);

        let outcome = run(&catalog, "Apache HTTP Server 2.4.51").await.unwrap();
        assert_eq!(outcome.total_found, 2);
        assert_eq!(
            catalog.queries(),
            vec!["apache http server", "apache http server 2.4.51"]
        );
    }

    #[tokio::test]
    async fn test_version_overshoot_backs_off_to_broad_set() {
        let catalog = ScriptedCatalog::new(vec![
            ("apache http server", page(120, &["broad"])),
            ("apache http server 2.4.51", page(0, &[])),
        ]);

        let outcome = run(&catalog, "Apache HTTP Server 2.4.51").await.unwrap();
        // Exactly two calls, and the broad set comes back.
        assert_eq!(catalog.queries().len(), 2);
        assert_eq!(outcome.total_found, 120);
        assert_eq!(outcome.records[0].cpe_name, "broad");
    }

    #[tokio::test]
    async fn test_iterative_narrowing_keeps_largest_nonzero_set() {
        // No primary version, two version-shaped candidates; the second
        // overshoots to zero so the first narrowed set wins.
        let catalog = ScriptedCatalog::new(vec![
            ("siemens simatic", page(500, &["broad"])),
            ("siemens simatic 1500", page(40, &["narrower"])),
            ("siemens simatic 1500 7", page(0, &[])),
        ]);

        let asset = AssetParser::new().parse("Siemens SIMATIC 1500 7");
        assert_eq!(asset.version, None);
        assert_eq!(asset.version_candidates, vec!["1500", "7"]);

        let (sender, _rx) = events();
        let outcome = ProgressiveSearch::new(&catalog, 10)
            .run(&asset, &sender)
            .await
            .unwrap();

        assert_eq!(outcome.total_found, 40);
        assert_eq!(outcome.records[0].cpe_name, "narrower");
    }

    #[tokio::test]
    async fn test_no_candidates_returns_broad_set() {
        let catalog = ScriptedCatalog::new(vec![("openssl", page(80, &["broad"]))]);

        let outcome = run(&catalog, "OpenSSL").await.unwrap();
        assert_eq!(outcome.total_found, 80);
        assert_eq!(catalog.queries(), vec!["openssl"]);
    }

    #[tokio::test]
    async fn test_first_query_failure_is_fatal() {
        let catalog = ScriptedCatalog::new(vec![]);
        let result = run(&catalog, "nginx 1.24.0").await;
        assert!(matches!(result, Err(DiscoveryError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_mid_narrowing_failure_degrades_to_partial() {
        // The version query is unscripted, so it fails; the broad set is
        // returned flagged partial.
        let catalog = ScriptedCatalog::new(vec![("apache http server", page(120, &["broad"]))]);

        let outcome = run(&catalog, "Apache HTTP Server 2.4.51").await.unwrap();
        assert!(outcome.partial);
        assert_eq!(outcome.total_found, 120);
    }

    #[tokio::test]
    async fn test_duplicate_records_collapse() {
        let catalog = ScriptedCatalog::new(vec![(
            "nginx",
            page(2, &["cpe:2.3:a:nginx:nginx:1.24.0:*:*:*:*:*:*:*",
                      "cpe:2.3:a:nginx:nginx:1.24.0:*:*:*:*:*:*:*"]),
        )]);

        let outcome = run(&catalog, "nginx 1.24.0").await.unwrap();
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn test_compose_base_query() {
        let parser = AssetParser::new();

        let asset = parser.parse("Apache HTTP Server 2.4.51");
        assert_eq!(compose_base_query(&asset), "apache http server");

        // Self-named products collapse to a single term.
        let asset = parser.parse("OpenSSL");
        assert_eq!(compose_base_query(&asset), "openssl");

        // Neither vendor nor product: fall back to the raw text.
        let asset = parser.parse("2.4.51");
        assert_eq!(compose_base_query(&asset), "2.4.51");
    }
}
