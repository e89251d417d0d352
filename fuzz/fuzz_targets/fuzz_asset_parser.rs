#![no_main]

use cpescout::cpe::DeconstructedCpe;
use cpescout::normalize::is_version_shaped;
use cpescout::parser::AssetParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let parser = AssetParser::new();
        let asset = parser.parse(content);

        assert_eq!(asset.raw, content, "raw must be preserved verbatim");

        for token in &asset.tokens {
            assert!(!token.is_empty(), "empty token");
            assert!(
                !token.chars().any(|c| c.is_whitespace() || c.is_uppercase()),
                "token {token:?} is not a lowercase word"
            );
            if let Some(ref version) = asset.version {
                assert_ne!(token, version, "version leaked into tokens");
            }
        }

        if asset.version.is_none() {
            for candidate in &asset.version_candidates {
                assert!(
                    is_version_shaped(candidate),
                    "candidate {candidate:?} is not version-shaped"
                );
            }
        }

        // The deconstructor must accept arbitrary input without
        // panicking, producing a sentinel for anything malformed.
        let cpe = DeconstructedCpe::from_uri(content);
        if !cpe.valid {
            assert!(cpe.tokens.is_empty());
            assert!(cpe.vendor.is_empty());
        }
    }
});
