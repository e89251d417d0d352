//! cpescout - CPE discovery for free-text asset descriptors
//!
//! Given an asset name like `"Siemens SIMATIC S7-1500 Firmware v2.9.4"`,
//! this crate parses out vendor / product / version, runs a progressively
//! narrowing keyword search against the NVD CPE dictionary, scores every
//! candidate with a transparent similarity breakdown, and streams ranked
//! results as ordered progress events.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod cpe;
pub mod error;
pub mod event;
pub mod lexicon;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod rank;
pub mod score;
pub mod search;
pub mod similarity;
pub mod validator;

// --- Public API re-exports ---

pub use catalog::{CachedCatalog, CatalogQuery, CpeCatalog, NvdClient};
pub use config::Config;
pub use cpe::DeconstructedCpe;
pub use error::DiscoveryError;
pub use event::{DiscoveryReport, Phase, ProgressEvent};
pub use parser::{AssetParser, ParsedAsset};
pub use pipeline::DiscoveryEngine;
pub use score::{CpeCandidate, ScoreBreakdown};
pub use validator::CpeValidation;
