//! Text normalization, tokenization, and version pre-extraction.
//!
//! Version substrings are pulled out of the raw text *before* tokenization
//! so a version like `2.4.51` is kept whole instead of fragmenting into
//! `["2", "4", "51"]` and leaking into product tokens.

use std::sync::LazyLock;

use regex::Regex;

/// Version patterns, most specific first. The first pattern that matches
/// anywhere in the input wins.
///
/// 1. `v?D.D.D(.D)?(suffix)?` — `2.4.51`, `1.2.3.4`, `2.4.51a1`
/// 2. `v?D.D(suffix)?`        — `2.4`, `1.0a`, `10.0s0`
/// 3. `vD(.D)*`               — `v2`, `v2.3`
static VERSION_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)v?\d+\.\d+\.\d+(\.\d+)?([a-z]\d*)?").expect("version pattern 1"),
        Regex::new(r"(?i)v?\d+\.\d+([a-z]\d*)?").expect("version pattern 2"),
        Regex::new(r"(?i)v\d+(\.\d+)*").expect("version pattern 3"),
    ]
});

/// Shape check for fallback version candidates: bare or `v`-prefixed
/// numerics, optionally dotted, optionally with a trailing letter suffix
/// (`2`, `1500`, `17.3.1`, `10.0s0`, `v2`).
static VERSION_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^v?\d+(\.\d+)*([a-z]\d*)?$").expect("version shape pattern")
});

/// Result of version pre-extraction on raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionExtraction {
    /// Canonical version string with the leading `v`/`V` stripped, if any
    /// pattern matched.
    pub version: Option<String>,
    /// The input with the matched substring removed.
    pub rest: String,
}

/// Extracts the first version-looking substring from raw text.
///
/// Patterns are tried in order of specificity; the matched substring is
/// removed from the input and its leading `v`/`V` stripped from the
/// returned version.
pub fn extract_version(raw: &str) -> VersionExtraction {
    for pattern in VERSION_PATTERNS.iter() {
        if let Some(found) = pattern.find(raw) {
            let mut rest = String::with_capacity(raw.len());
            rest.push_str(&raw[..found.start()]);
            rest.push_str(&raw[found.end()..]);

            let matched = found.as_str();
            let version = matched
                .strip_prefix(['v', 'V'])
                .unwrap_or(matched)
                .to_lowercase();

            return VersionExtraction {
                version: Some(version),
                rest,
            };
        }
    }

    VersionExtraction {
        version: None,
        rest: raw.to_string(),
    }
}

/// Lowercases and strips punctuation, dropping `.` along with everything
/// else that is not alphanumeric. `_` and `-` become spaces; whitespace is
/// collapsed.
pub fn normalize(text: &str) -> String {
    normalize_inner(text, false)
}

/// Like [`normalize`] but keeps `.` so dotted version strings survive
/// intact. Used when version-shaped tokens must stay recognizable.
pub fn normalize_preserving_versions(text: &str) -> String {
    normalize_inner(text, true)
}

fn normalize_inner(text: &str, keep_dots: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;

    for ch in text.chars() {
        match ch {
            '_' | '-' => push_space(&mut out, &mut last_was_space),
            c if c.is_whitespace() => push_space(&mut out, &mut last_was_space),
            '.' if keep_dots => {
                out.push('.');
                last_was_space = false;
            }
            c if c.is_alphanumeric() => {
                // Unicode-aware lowercasing; a single char can lowercase
                // to several.
                out.extend(c.to_lowercase());
                last_was_space = false;
            }
            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn push_space(out: &mut String, last_was_space: &mut bool) {
    if !*last_was_space {
        out.push(' ');
        *last_was_space = true;
    }
}

/// Normalizes (default mode) and splits on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Normalizes in version-preserving mode and splits on whitespace.
pub fn tokenize_preserving_versions(text: &str) -> Vec<String> {
    normalize_preserving_versions(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Whether a token looks like a version (used only for fallback candidates
/// when primary extraction found nothing).
pub fn is_version_shaped(token: &str) -> bool {
    !token.is_empty() && VERSION_SHAPE.is_match(token)
}
