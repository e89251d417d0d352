//! Error taxonomy for the discovery pipeline.
//!
//! Variants are deliberately coarse: callers branch on the *kind* of
//! failure (bad input, bad CPE, upstream down, upstream garbage,
//! cancelled), not on transport details. `UpstreamUnavailable` and
//! `UpstreamMalformed` surface identically to clients but stay
//! distinguishable in logs.

/// Failures surfaced by the discovery pipeline and validator.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Asset name too short, `top_n` out of range, and similar caller
    /// mistakes. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed CPE syntax: 2.2 prefix, missing vendor, bad part.
    #[error("invalid cpe format: {0}")]
    InvalidCpeFormat(String),

    /// Network error, non-2xx response, or timeout from the catalog.
    #[error("catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The catalog answered, but the envelope did not decode.
    #[error("catalog response malformed: {0}")]
    UpstreamMalformed(String),

    /// Consumer-initiated cancellation.
    #[error("discovery cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DiscoveryError::UpstreamMalformed(err.to_string())
        } else {
            DiscoveryError::UpstreamUnavailable(err.to_string())
        }
    }
}
