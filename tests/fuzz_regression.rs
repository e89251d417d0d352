//! Regression tests for inputs the fuzzer found interesting.

use cpescout::cpe::DeconstructedCpe;
use cpescout::normalize::is_version_shaped;
use cpescout::parser::{AssetParser, ParsedAsset};

/// Structural invariants every parse must satisfy, whatever the input.
fn validate_parse(asset: &ParsedAsset, input: &str) {
    assert_eq!(asset.raw, input, "raw must be preserved verbatim");

    for token in &asset.tokens {
        assert!(!token.is_empty(), "empty token for input {input:?}");
        assert!(
            !token.chars().any(|c| c.is_whitespace() || c.is_uppercase()),
            "token {token:?} not a lowercase word for input {input:?}"
        );
        if let Some(ref version) = asset.version {
            assert_ne!(token, version, "version leaked into tokens for {input:?}");
        }
    }

    assert!(
        !asset.normalized.chars().any(|c| c.is_uppercase()),
        "normalized form must be lowercase for {input:?}"
    );

    if asset.version.is_none() {
        for candidate in &asset.version_candidates {
            assert!(
                is_version_shaped(candidate),
                "candidate {candidate:?} not version-shaped for {input:?}"
            );
        }
    }
}

#[test]
fn test_punctuation_storm() {
    let inputs = [
        "!!!@@@###",
        "....",
        "-_-_-_-",
        ":::cpe:::",
        "v",
        "v.",
        ".v1",
    ];
    let parser = AssetParser::new();
    for input in inputs {
        validate_parse(&parser.parse(input), input);
    }
}

#[test]
fn test_version_like_noise() {
    // Dots and digits arranged to stress the version pre-extraction.
    let inputs = [
        "1.2.3.4.5.6.7.8",
        "v1v2v3",
        "1..2",
        "a1.2b3.4c",
        "10.0s0s0s0",
        "....1.2....",
        "2.4 2.4 2.4",
    ];
    let parser = AssetParser::new();
    for input in inputs {
        validate_parse(&parser.parse(input), input);
    }
}

#[test]
fn test_unicode_input() {
    let inputs = [
        "日本語サーバ 2.0",
        "Ɯeird Ʋendor 1.0",
        "🦀 firmware 1.2.3",
        "ПО Сервер v3",
    ];
    let parser = AssetParser::new();
    for input in inputs {
        validate_parse(&parser.parse(input), input);
    }
}

#[test]
fn test_very_long_input() {
    let long = "vendor product ".repeat(500) + "1.2.3";
    validate_parse(&AssetParser::new().parse(&long), &long);
}

#[test]
fn test_whitespace_only_input() {
    let parser = AssetParser::new();
    for input in ["", " ", "\t\t", "\n \n"] {
        let asset = parser.parse(input);
        validate_parse(&asset, input);
        assert!(asset.tokens.is_empty());
        assert_eq!(asset.vendor, None);
    }
}

#[test]
fn test_deconstructor_never_panics_on_noise() {
    let inputs = [
        "",
        ":",
        "::::::::::::::::",
        "cpe:2.3:",
        "cpe:2.3:::::",
        "cpe:2.3:a:b",
        "cpe:/o:legacy:format:1.0",
        "cpe:2.3:a:v:p:1.0:extra:extra:extra:extra:extra:extra:extra:extra:extra",
    ];
    for input in inputs {
        let cpe = DeconstructedCpe::from_uri(input);
        if !cpe.valid {
            assert!(cpe.tokens.is_empty(), "sentinel must have no tokens: {input:?}");
            assert!(cpe.vendor.is_empty(), "sentinel must have empty vendor: {input:?}");
        }
    }
}

#[test]
fn test_deconstructor_empty_middle_fields() {
    // Empty fields split fine; they just produce no tokens.
    let cpe = DeconstructedCpe::from_uri("cpe:2.3:a:::*:*:*:*:*:*:*:*");
    assert!(cpe.valid);
    assert_eq!(cpe.vendor, "");
    assert!(cpe.tokens.is_empty());
}
