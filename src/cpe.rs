//! Deconstruction of CPE 2.3 URIs into their component attributes.
//!
//! A CPE 2.3 name is a colon-delimited 13-field URI:
//! `cpe:2.3:<part>:<vendor>:<product>:<version>:<update>:<edition>:`
//! `<language>:<sw_edition>:<target_sw>:<target_hw>:<other>`.

use serde::Serialize;

/// The CPE 2.3 URI prefix.
pub const CPE23_PREFIX: &str = "cpe:2.3:";

/// The legacy CPE 2.2 URI prefix. Recognized only to produce a dedicated
/// error; never translated.
pub const CPE22_PREFIX: &str = "cpe:/";

/// An immutable view of a CPE 2.3 URI split into its 11 attributes.
///
/// An input that does not start with `cpe:2.3:` or has fewer than 5
/// colon-separated fields produces a sentinel with `valid = false`, every
/// attribute empty, and no tokens; the scorer can still run against it and
/// contributes zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeconstructedCpe {
    /// The original URI.
    pub raw: String,
    /// Whether the URI was well-formed enough to deconstruct.
    pub valid: bool,
    /// `a` (application), `o` (operating system), or `h` (hardware).
    pub part: String,
    pub vendor: String,
    pub product: String,
    pub version: String,
    pub update: String,
    pub edition: String,
    pub language: String,
    pub sw_edition: String,
    pub target_sw: String,
    pub target_hw: String,
    pub other: String,
    /// Lowercased comparison tokens from vendor + product + non-wildcard
    /// version, split on `_`, `-`, `.`, and whitespace.
    pub tokens: Vec<String>,
}

impl DeconstructedCpe {
    /// Splits a CPE 2.3 URI into attributes.
    ///
    /// Attributes absent from a short-but-valid URI read as `*` (CPE
    /// semantics for an unspecified attribute).
    pub fn from_uri(raw: &str) -> Self {
        if !raw.starts_with(CPE23_PREFIX) {
            return Self::sentinel(raw);
        }

        let fields: Vec<&str> = raw.split(':').collect();
        if fields.len() < 5 {
            return Self::sentinel(raw);
        }

        let attr = |i: usize| fields.get(i).copied().unwrap_or("*").to_string();

        let vendor = attr(3);
        let product = attr(4);
        let version = attr(5);

        let mut tokens = Vec::new();
        collect_tokens(&vendor, &mut tokens);
        collect_tokens(&product, &mut tokens);
        if version != "*" {
            collect_tokens(&version, &mut tokens);
        }

        Self {
            raw: raw.to_string(),
            valid: true,
            part: attr(2),
            vendor,
            product,
            version,
            update: attr(6),
            edition: attr(7),
            language: attr(8),
            sw_edition: attr(9),
            target_sw: attr(10),
            target_hw: attr(11),
            other: attr(12),
            tokens,
        }
    }

    fn sentinel(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            valid: false,
            part: String::new(),
            vendor: String::new(),
            product: String::new(),
            version: String::new(),
            update: String::new(),
            edition: String::new(),
            language: String::new(),
            sw_edition: String::new(),
            target_sw: String::new(),
            target_hw: String::new(),
            other: String::new(),
            tokens: Vec::new(),
        }
    }
}

/// Appends the lowercased segments of a non-wildcard attribute, split on
/// `_`, `-`, `.`, and whitespace, skipping empty segments and duplicates.
fn collect_tokens(attribute: &str, out: &mut Vec<String>) {
    if attribute == "*" {
        return;
    }
    for segment in attribute.split(['_', '-', '.', ' ', '\t']) {
        if segment.is_empty() {
            continue;
        }
        let lowered = segment.to_lowercase();
        if !out.contains(&lowered) {
            out.push(lowered);
        }
    }
}
