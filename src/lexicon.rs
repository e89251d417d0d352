//! Fixed lexicons used by the asset parser.
//!
//! The vendor and stop-word tables are data, not code: they are embedded
//! from `data/*.txt` so the lists can evolve without touching parsing or
//! scoring logic.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Vendors recognized during vendor extraction (all lowercase).
pub static KNOWN_VENDORS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    include_str!("../data/known_vendors.txt")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
});

/// Generic tech nouns and filler words that never name a vendor or product.
pub static NON_VENDOR_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    include_str!("../data/non_vendor_words.txt")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
});

/// Trailing corporate suffixes stripped before vendor-table lookups.
const CORPORATE_SUFFIXES: [&str; 6] = ["inc", "corp", "ltd", "llc", "gmbh", "co"];

/// Strips a trailing corporate suffix (`inc`, `corp`, `ltd`, `llc`, `gmbh`,
/// `co`) from a lowercased token.
///
/// Only the suffix is removed; `ciscoinc` becomes `cisco` but `cisco` is
/// returned unchanged. A token that *is* a suffix is not emptied.
pub fn strip_corporate_suffix(token: &str) -> &str {
    for suffix in CORPORATE_SUFFIXES {
        if token.len() > suffix.len() && token.ends_with(suffix) {
            return &token[..token.len() - suffix.len()];
        }
    }
    token
}

/// Returns the vendor-table form of a token: the token itself when it is
/// already a known vendor, otherwise its suffix-stripped form when that is
/// known.
///
/// The direct lookup runs first so vendors that happen to end in a suffix
/// (`cisco` ends in `co`) are not mangled by stripping.
pub fn known_vendor_form(token: &str) -> Option<&str> {
    if KNOWN_VENDORS.contains(token) {
        return Some(token);
    }
    let stripped = strip_corporate_suffix(token);
    if KNOWN_VENDORS.contains(stripped) {
        return Some(stripped);
    }
    None
}

/// Whether a lowercased token is in the known-vendor table, directly or
/// after suffix stripping.
pub fn is_known_vendor(token: &str) -> bool {
    known_vendor_form(token).is_some()
}

/// Whether a lowercased token is a stop word for vendor/product extraction.
pub fn is_stop_word(token: &str) -> bool {
    NON_VENDOR_WORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vendor_table_loaded() {
        assert!(KNOWN_VENDORS.contains("microsoft"));
        assert!(KNOWN_VENDORS.contains("ewon"));
        assert!(KNOWN_VENDORS.contains("honeywell"));
        assert_eq!(KNOWN_VENDORS.len(), 44);
    }

    #[test]
    fn test_stop_word_table_loaded() {
        assert!(NON_VENDOR_WORDS.contains("server"));
        assert!(NON_VENDOR_WORDS.contains("release"));
        assert!(!NON_VENDOR_WORDS.contains("siemens"));
        assert_eq!(NON_VENDOR_WORDS.len(), 34);
    }

    #[test]
    fn test_strip_corporate_suffix() {
        assert_eq!(strip_corporate_suffix("ciscoinc"), "cisco");
        assert_eq!(strip_corporate_suffix("siemensgmbh"), "siemens");
        assert_eq!(strip_corporate_suffix("oracleltd"), "oracle");
        assert_eq!(strip_corporate_suffix("cisco"), "cisco");
    }

    #[test]
    fn test_strip_does_not_empty_bare_suffix() {
        assert_eq!(strip_corporate_suffix("inc"), "inc");
        assert_eq!(strip_corporate_suffix("co"), "co");
    }

    #[test]
    fn test_is_known_vendor_with_suffix() {
        assert!(is_known_vendor("microsoft"));
        assert!(is_known_vendor("microsoftcorp"));
        assert!(!is_known_vendor("contoso"));
    }

    #[test]
    fn test_suffix_shaped_vendors_survive_lookup() {
        // "cisco" ends in "co"; the direct table hit must win over stripping.
        assert_eq!(known_vendor_form("cisco"), Some("cisco"));
        assert_eq!(known_vendor_form("ciscoinc"), Some("cisco"));
        assert_eq!(known_vendor_form("hp"), Some("hp"));
    }
}
