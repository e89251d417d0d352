//! Configuration for the discovery engine.
//!
//! Every section has serde defaults, so a partial (or absent) JSON blob
//! yields a fully usable configuration.

use std::time::Duration;

use serde::Deserialize;

/// Default gap between outbound catalog requests without an API key.
/// The unauthenticated NVD budget is roughly 5 requests per 30 seconds.
const DEFAULT_MIN_INTERVAL_SECS: f64 = 6.0;

/// Default gap when an API key is configured.
const KEYED_MIN_INTERVAL_SECS: f64 = 0.6;

/// Default response cache TTL (5 minutes).
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default result-set size at or below which narrowing stops.
const DEFAULT_NARROW_TARGET: usize = 10;

/// Default number of ranked candidates returned.
pub const DEFAULT_TOP_N: usize = 5;

/// Default hard cap on a caller's `top_n`.
const DEFAULT_TOP_N_MAX: usize = 20;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// NVD client configuration.
    pub nvd: NvdConfig,
    /// Response cache configuration.
    pub cache: CacheConfig,
    /// Progressive search configuration.
    pub search: SearchConfig,
    /// Scoring weights.
    pub scoring: ScoringConfig,
    /// Ranking configuration.
    pub ranking: RankingConfig,
}

/// NVD client configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NvdConfig {
    /// Optional API key, sent via the `apiKey` header. Its presence also
    /// lowers the default request interval.
    pub api_key: Option<String>,
    /// Explicit gap between outbound requests, in seconds. Overrides the
    /// keyed/unkeyed defaults.
    pub min_interval_secs: Option<f64>,
}

impl NvdConfig {
    /// The rate-limit gap in effect: an explicit setting wins, otherwise
    /// 0.6 s with an API key and 6 s without.
    pub fn effective_min_interval(&self) -> Duration {
        let secs = self.min_interval_secs.unwrap_or(if self.api_key.is_some() {
            KEYED_MIN_INTERVAL_SECS
        } else {
            DEFAULT_MIN_INTERVAL_SECS
        });
        Duration::from_secs_f64(secs.max(0.0))
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache TTL in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Progressive search configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Target upper bound for a "good" result set.
    pub narrow_target: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            narrow_target: DEFAULT_NARROW_TARGET,
        }
    }
}

/// Scoring configuration. The recognized option is `scoring.weights`.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Sub-score weights.
    pub weights: ScoringWeights,
}

/// The four sub-score weights. The defaults sum to 1.0; custom values
/// are taken as-is.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub vendor: f64,
    pub product: f64,
    pub version: f64,
    pub token_overlap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            vendor: 0.25,
            product: 0.35,
            version: 0.25,
            token_overlap: 0.15,
        }
    }
}

/// Ranking configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Hard cap on a caller's `top_n`.
    pub top_n_max: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n_max: DEFAULT_TOP_N_MAX,
        }
    }
}

impl Config {
    /// Parses configuration from a JSON value, falling back to defaults
    /// when absent or malformed.
    pub fn from_json(value: Option<serde_json::Value>) -> Self {
        match value {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None => Self::default(),
        }
    }
}
