//! Multi-signal similarity scoring between a parsed asset and catalog
//! candidates.
//!
//! Four sub-scores in `[0, 1]` — vendor, product, version, token overlap —
//! combine into a weighted composite percentage. Every rule degrades
//! gracefully: wildcards and absent fields map to fixed partial credit,
//! and the scorer never fails.

use serde::Serialize;

use crate::catalog::CatalogRecord;
use crate::config::ScoringWeights;
use crate::cpe::DeconstructedCpe;
use crate::parser::ParsedAsset;
use crate::similarity::{jaccard, levenshtein_distance, levenshtein_ratio};

/// Partial credit when either side has no version to compare: versionless
/// matches are legitimate, just weaker evidence.
const VERSIONLESS_CREDIT: f64 = 0.3;

/// Partial credit for a wildcard CPE vendor.
const WILDCARD_VENDOR_CREDIT: f64 = 0.3;

/// Partial credit for a wildcard CPE product.
const WILDCARD_PRODUCT_CREDIT: f64 = 0.2;

/// The four sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub vendor: f64,
    pub product: f64,
    pub version: f64,
    pub token_overlap: f64,
}

/// A catalog record scored against a parsed asset.
#[derive(Debug, Clone, Serialize)]
pub struct CpeCandidate {
    /// The CPE 2.3 URI.
    pub cpe_name: String,
    /// Stable catalog identifier.
    pub cpe_name_id: String,
    /// Catalog display title.
    pub title: String,
    /// Deprecation flag from the catalog, surfaced unchanged.
    pub deprecated: bool,
    /// Deconstructed view of the URI.
    pub cpe: DeconstructedCpe,
    /// Composite score in `[0, 100]`, rounded to two decimals.
    pub score: f64,
    /// The sub-scores behind `score`.
    pub breakdown: ScoreBreakdown,
}

/// Deterministic scoring engine.
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Scores one catalog record against the asset.
    pub fn score_record(&self, asset: &ParsedAsset, record: &CatalogRecord) -> CpeCandidate {
        let cpe = DeconstructedCpe::from_uri(&record.cpe_name);
        let breakdown = self.breakdown(asset, &cpe);
        let score = self.composite(&breakdown);

        CpeCandidate {
            cpe_name: record.cpe_name.clone(),
            cpe_name_id: record.cpe_name_id.clone(),
            title: record.title.clone(),
            deprecated: record.deprecated,
            cpe,
            score,
            breakdown,
        }
    }

    /// Computes the four sub-scores.
    pub fn breakdown(&self, asset: &ParsedAsset, cpe: &DeconstructedCpe) -> ScoreBreakdown {
        ScoreBreakdown {
            vendor: vendor_score(asset.vendor.as_deref(), &cpe.vendor),
            product: product_score(asset.product.as_deref(), &cpe.product),
            version: version_score(asset.version.as_deref(), &cpe.version),
            token_overlap: jaccard(&asset.tokens, &cpe.tokens),
        }
    }

    /// Weighted composite percentage, rounded to two decimals.
    pub fn composite(&self, breakdown: &ScoreBreakdown) -> f64 {
        let weighted = self.weights.vendor * breakdown.vendor
            + self.weights.product * breakdown.product
            + self.weights.version * breakdown.version
            + self.weights.token_overlap * breakdown.token_overlap;

        round2(100.0 * weighted).clamp(0.0, 100.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Vendor comparison: exact → substring → near-miss, with fixed credit
/// for wildcards. An empty CPE vendor (sentinel deconstruction) scores 0.
fn vendor_score(asset_vendor: Option<&str>, cpe_vendor: &str) -> f64 {
    let Some(asset_vendor) = asset_vendor else {
        return 0.0;
    };
    if asset_vendor.is_empty() || cpe_vendor.is_empty() {
        return 0.0;
    }
    if cpe_vendor == "*" {
        return WILDCARD_VENDOR_CREDIT;
    }

    let a = asset_vendor.to_lowercase();
    let b = cpe_vendor.to_lowercase();

    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return 0.7;
    }
    if levenshtein_distance(&a, &b) <= 2 {
        return 0.5;
    }
    0.0
}

/// Product comparison: the better of a tokenized Jaccard and a
/// whole-string Levenshtein ratio, so both word-order changes and small
/// spelling drift are tolerated.
fn product_score(asset_product: Option<&str>, cpe_product: &str) -> f64 {
    let Some(asset_product) = asset_product else {
        return 0.0;
    };
    if asset_product.is_empty() || cpe_product.is_empty() {
        return 0.0;
    }
    if cpe_product == "*" {
        return WILDCARD_PRODUCT_CREDIT;
    }

    let a = asset_product.to_lowercase();
    let b = cpe_product.to_lowercase().replace('_', " ");

    let token_similarity = jaccard(&product_tokens(&a), &product_tokens(&b));
    let edit_similarity = levenshtein_ratio(&a, &b);

    token_similarity.max(edit_similarity)
}

/// Splits a product string on `_`, `-`, and whitespace, dropping empties.
fn product_tokens(product: &str) -> Vec<String> {
    product
        .split(['_', '-', ' ', '\t'])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Numeric fields of a version string plus any letter suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFields {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Trailing non-numeric remainder of a segment (`10.0s0` → `s0`).
    pub suffix: String,
}

impl VersionFields {
    /// Canonical dotted form; parsing it again yields the same fields.
    pub fn joined(&self) -> String {
        format!("{}.{}.{}{}", self.major, self.minor, self.patch, self.suffix)
    }
}

/// Parses up to three dotted numeric segments, capturing the first
/// non-numeric remainder as the suffix. The leading `v`/`V` is stripped
/// and the input lowercased.
pub fn parse_version_fields(version: &str) -> VersionFields {
    let lowered = version.to_lowercase();
    let trimmed = lowered.strip_prefix('v').unwrap_or(&lowered);

    let mut fields = [0u64; 3];
    let mut suffix = String::new();

    for (i, segment) in trimmed.split('.').take(3).enumerate() {
        let digits_end = segment
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(segment.len());
        fields[i] = segment[..digits_end].parse().unwrap_or(0);
        if digits_end < segment.len() && suffix.is_empty() {
            suffix = segment[digits_end..].to_string();
        }
    }

    VersionFields {
        major: fields[0],
        minor: fields[1],
        patch: fields[2],
        suffix,
    }
}

/// A 4-digit year form (`2019`), often used as a whole product version.
fn as_year(version: &str) -> Option<i64> {
    if version.len() == 4 && version.chars().all(|c| c.is_ascii_digit()) {
        version.parse().ok()
    } else {
        None
    }
}

/// Version comparison with structured fallback: exact equality, then
/// field-by-field agreement, then adjacent-year tolerance.
fn version_score(asset_version: Option<&str>, cpe_version: &str) -> f64 {
    let Some(asset_version) = asset_version else {
        return VERSIONLESS_CREDIT;
    };
    if asset_version.is_empty() {
        return VERSIONLESS_CREDIT;
    }
    if cpe_version == "*" {
        return VERSIONLESS_CREDIT;
    }
    if cpe_version.is_empty() {
        return 0.0;
    }

    let a = asset_version.to_lowercase();
    let b = cpe_version.to_lowercase();

    if a == b {
        return 1.0;
    }

    let fa = parse_version_fields(&a);
    let fb = parse_version_fields(&b);

    if fa.major == fb.major {
        if fa.minor == fb.minor {
            if fa.patch == fb.patch {
                // Same numbers, different suffix (10.0 vs 10.0s0).
                return 0.95;
            }
            return 0.8;
        }
        return 0.5;
    }

    if let (Some(year_a), Some(year_b)) = (as_year(&a), as_year(&b)) {
        if (year_a - year_b).abs() <= 1 {
            return 0.6;
        }
    }

    0.0
}
