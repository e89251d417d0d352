//! Heuristic parser turning free-text asset descriptors into structured
//! vendor / product / version guesses.
//!
//! The rules are intentionally deterministic so a bad parse is always
//! explainable from the input; there is no learned model here.

use serde::Serialize;

use crate::lexicon::{is_known_vendor, is_stop_word, known_vendor_form, strip_corporate_suffix};
use crate::normalize::{extract_version, is_version_shaped, tokenize, tokenize_preserving_versions};

/// Structured view of a raw asset descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedAsset {
    /// Original text, preserved verbatim.
    pub raw: String,
    /// Lowercased, punctuation-stripped form of `raw`.
    pub normalized: String,
    /// Word tokens with the version substring already removed.
    pub tokens: Vec<String>,
    /// Best-guess vendor token.
    pub vendor: Option<String>,
    /// Best-guess product phrase (one or two tokens).
    pub product: Option<String>,
    /// Canonical version string, leading `v` stripped.
    pub version: Option<String>,
    /// Fallback version-shaped tokens, used only when primary extraction
    /// found nothing.
    pub version_candidates: Vec<String>,
}

/// Parser for free-text asset names.
#[derive(Debug, Default)]
pub struct AssetParser;

impl AssetParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a raw asset descriptor.
    ///
    /// Empty input produces a `ParsedAsset` with every optional field
    /// absent; a pure version string parses with no vendor or product.
    pub fn parse(&self, raw: &str) -> ParsedAsset {
        let extraction = extract_version(raw);
        let version = extraction.version;

        let mut tokens = tokenize(&extraction.rest);
        // The version substring is removed before tokenization, but a
        // repeated version can survive as a token; the invariant is that
        // it never does.
        if let Some(ref v) = version {
            tokens.retain(|t| t != v);
        }

        let vendor_pick = pick_vendor(&tokens);
        let vendor = vendor_pick.as_ref().map(|p| p.vendor.clone());
        let product = pick_product(&tokens, vendor_pick.as_ref());

        let version_candidates = match version {
            Some(ref v) => vec![v.clone()],
            None => tokenize_preserving_versions(&extraction.rest)
                .into_iter()
                .filter(|t| is_version_shaped(t))
                .collect(),
        };

        ParsedAsset {
            raw: raw.to_string(),
            normalized: crate::normalize::normalize(raw),
            tokens,
            vendor,
            product,
            version,
            version_candidates,
        }
    }
}

/// A vendor choice: the canonical vendor string plus the token it came
/// from (which may carry a corporate suffix the vendor does not).
struct VendorPick {
    vendor: String,
    source_token: String,
}

/// Vendor extraction, first match wins:
/// known-vendor table (suffix-stripped lookup), then the first
/// non-stop-word token longer than one character, then the first token.
fn pick_vendor(tokens: &[String]) -> Option<VendorPick> {
    for token in tokens {
        if let Some(form) = known_vendor_form(token) {
            return Some(VendorPick {
                vendor: form.to_string(),
                source_token: token.clone(),
            });
        }
    }

    for token in tokens {
        if token.len() > 1 && !is_stop_word(token) {
            return Some(VendorPick {
                vendor: strip_corporate_suffix(token).to_string(),
                source_token: token.clone(),
            });
        }
    }

    tokens.first().map(|token| VendorPick {
        vendor: token.clone(),
        source_token: token.clone(),
    })
}

/// Product extraction over the tokens left after removing every occurrence
/// of the vendor's source token.
fn pick_product(tokens: &[String], vendor: Option<&VendorPick>) -> Option<String> {
    let vendor = vendor?;

    let remaining: Vec<&str> = tokens
        .iter()
        .filter(|t| t.as_str() != vendor.source_token)
        .map(String::as_str)
        .collect();

    // Self-named products: "OpenSSL" is both vendor and product.
    if remaining.is_empty() {
        return Some(vendor.vendor.clone());
    }

    // A second vendor name in front position is itself the product line
    // ("HMS Ewon ..." names the Ewon product family).
    if is_known_vendor(remaining[0]) {
        return Some(remaining[0].to_string());
    }

    if let Some(token) = remaining
        .iter()
        .copied()
        .find(|t| t.len() > 1 && !is_stop_word(t))
    {
        return Some(token.to_string());
    }

    // Nothing qualified outright; take up to the first two tokens as a
    // phrase ("http server", "firmware").
    Some(remaining.iter().take(2).copied().collect::<Vec<_>>().join(" "))
}
