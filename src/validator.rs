//! Syntactic and catalog validation of CPE 2.3 URIs.

use serde::Serialize;

use crate::catalog::{CatalogQuery, CpeCatalog};
use crate::cpe::{CPE22_PREFIX, CPE23_PREFIX, DeconstructedCpe};
use crate::error::DiscoveryError;

/// Outcome of validating a CPE string.
#[derive(Debug, Clone, Serialize)]
pub struct CpeValidation {
    /// Whether the string is a syntactically valid CPE 2.3 URI.
    pub is_valid: bool,
    /// Whether the catalog knows the CPE. `None` when the catalog was not
    /// consulted (syntactic failure, or upstream unavailable).
    pub exists_in_catalog: Option<bool>,
    /// Whether a catalog record matches the URI exactly.
    pub exact_match: Option<bool>,
    /// Deprecation flag of the matched record, surfaced unchanged.
    pub deprecated: Option<bool>,
    /// Deconstructed attributes, present when syntax checks passed.
    pub parsed: Option<DeconstructedCpe>,
    /// Number of catalog records the lookup returned.
    pub matches_found: u64,
    /// Human-readable summary of the outcome.
    pub message: String,
}

impl CpeValidation {
    fn invalid(message: String) -> Self {
        Self {
            is_valid: false,
            exists_in_catalog: None,
            exact_match: None,
            deprecated: None,
            parsed: None,
            matches_found: 0,
            message,
        }
    }
}

/// Validates CPE 2.3 URIs, optionally confirming catalog presence.
pub struct CpeValidator;

impl CpeValidator {
    /// Syntactic checks only: the 2.3 prefix, a legal `part`, and a
    /// concrete vendor. The legacy `cpe:/` prefix gets its own message
    /// and is never auto-upgraded.
    pub fn check_syntax(cpe: &str) -> Result<DeconstructedCpe, DiscoveryError> {
        let cpe = cpe.trim();

        if cpe.starts_with(CPE22_PREFIX) {
            return Err(DiscoveryError::InvalidCpeFormat(
                "this is a CPE 2.2 URI; please supply the CPE 2.3 form (cpe:2.3:...)".into(),
            ));
        }
        if !cpe.starts_with(CPE23_PREFIX) {
            return Err(DiscoveryError::InvalidCpeFormat(
                "a CPE 2.3 URI must start with \"cpe:2.3:\"".into(),
            ));
        }

        let parsed = DeconstructedCpe::from_uri(cpe);
        if !parsed.valid {
            return Err(DiscoveryError::InvalidCpeFormat(
                "a CPE 2.3 URI needs at least part, vendor, and product fields".into(),
            ));
        }

        if !matches!(parsed.part.as_str(), "a" | "o" | "h") {
            return Err(DiscoveryError::InvalidCpeFormat(format!(
                "part must be one of a, o, h (got \"{}\")",
                parsed.part
            )));
        }

        if parsed.vendor.is_empty() || parsed.vendor == "*" {
            return Err(DiscoveryError::InvalidCpeFormat(
                "vendor must be present, not a wildcard".into(),
            ));
        }

        Ok(parsed)
    }

    /// Full validation: syntax first, then an exact-match catalog lookup
    /// classifying the record as exact, partial, or absent.
    ///
    /// An upstream failure never turns a syntactically valid CPE into an
    /// invalid one; the result reports it as valid but unverified.
    pub async fn validate<C: CpeCatalog>(catalog: &C, cpe: &str) -> CpeValidation {
        let parsed = match Self::check_syntax(cpe) {
            Ok(parsed) => parsed,
            Err(err) => return CpeValidation::invalid(err.to_string()),
        };

        let query = CatalogQuery::Exact(parsed.raw.clone());
        let page = match catalog.search(&query).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(error = %err, "catalog lookup failed during validation");
                return CpeValidation {
                    is_valid: true,
                    exists_in_catalog: None,
                    exact_match: None,
                    deprecated: None,
                    parsed: Some(parsed),
                    matches_found: 0,
                    message: format!("syntactically valid; catalog not reachable ({err})"),
                };
            }
        };

        let exact = page
            .records
            .iter()
            .find(|r| r.cpe_name.eq_ignore_ascii_case(&parsed.raw));
        let matches_found = page.records.len() as u64;

        match exact {
            Some(record) => CpeValidation {
                is_valid: true,
                exists_in_catalog: Some(true),
                exact_match: Some(true),
                deprecated: Some(record.deprecated),
                parsed: Some(parsed),
                matches_found,
                message: if record.deprecated {
                    "exact match found in catalog (deprecated)".into()
                } else {
                    "exact match found in catalog".into()
                },
            },
            None if !page.records.is_empty() => CpeValidation {
                is_valid: true,
                exists_in_catalog: Some(true),
                exact_match: Some(false),
                deprecated: Some(page.records.iter().any(|r| r.deprecated)),
                parsed: Some(parsed),
                matches_found,
                message: format!("{matches_found} partial matches found in catalog"),
            },
            None => CpeValidation {
                is_valid: true,
                exists_in_catalog: Some(false),
                exact_match: Some(false),
                deprecated: None,
                parsed: Some(parsed),
                matches_found: 0,
                message: "syntactically valid but absent from catalog".into(),
            },
        }
    }
}
