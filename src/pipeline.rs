//! The discovery pipeline: parse → search → score → rank, streamed as
//! ordered progress events.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::catalog::CpeCatalog;
use crate::config::{Config, DEFAULT_TOP_N};
use crate::error::DiscoveryError;
use crate::event::{DiscoveryReport, Phase, ProgressEvent, ProgressSender};
use crate::parser::AssetParser;
use crate::rank::rank;
use crate::score::Scorer;
use crate::search::ProgressiveSearch;
use crate::validator::{CpeValidation, CpeValidator};

/// Progress channel depth. The channel is bounded so a slow consumer
/// applies backpressure instead of losing events.
const PROGRESS_CHANNEL_CAPACITY: usize = 16;

/// Minimum asset name length after trimming.
const MIN_ASSET_NAME_LEN: usize = 2;

/// The discovery engine: one instance per catalog/config pairing, shared
/// across any number of concurrent pipelines.
///
/// The catalog dependency is explicit so tests inject fakes and multiple
/// isolated engines can coexist; the rate limiter and cache live inside
/// whatever catalog is passed in (normally a
/// [`crate::catalog::CachedCatalog`]).
pub struct DiscoveryEngine<C> {
    catalog: Arc<C>,
    config: Config,
}

impl<C: CpeCatalog + 'static> DiscoveryEngine<C> {
    pub fn new(catalog: C, config: Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config,
        }
    }

    /// Starts a discovery pipeline for a free-text asset name and returns
    /// its progress stream.
    ///
    /// Events arrive strictly ordered; the last one is `completed` or
    /// `error`, after which the channel closes. Dropping the receiver
    /// cancels the pipeline at its next suspension point; cache entries
    /// already written stay valid.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidInput`] before any work starts
    /// when the asset name is shorter than two characters after trimming
    /// or `top_n` is out of range.
    pub fn find_cpe(
        &self,
        asset_name: &str,
        top_n: Option<usize>,
    ) -> Result<mpsc::Receiver<ProgressEvent>, DiscoveryError> {
        let asset_name = asset_name.trim().to_string();
        if asset_name.chars().count() < MIN_ASSET_NAME_LEN {
            return Err(DiscoveryError::InvalidInput(
                "asset name must be at least 2 characters".into(),
            ));
        }

        let top_n = top_n.unwrap_or(DEFAULT_TOP_N);
        let top_n_max = self.config.ranking.top_n_max;
        if top_n == 0 || top_n > top_n_max {
            return Err(DiscoveryError::InvalidInput(format!(
                "top_n must be between 1 and {top_n_max} (got {top_n})"
            )));
        }

        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let catalog = Arc::clone(&self.catalog);
        let config = self.config.clone();

        tokio::spawn(async move {
            let events = ProgressSender::new(tx);
            if let Err((phase, err)) =
                run_pipeline(&catalog, &config, &asset_name, top_n, &events).await
            {
                match err {
                    DiscoveryError::Cancelled => {
                        tracing::debug!(asset = %asset_name, "pipeline cancelled by consumer");
                    }
                    err => {
                        tracing::warn!(asset = %asset_name, error = %err, "pipeline failed");
                        events.error(phase, err.to_string()).await;
                    }
                }
            }
        });

        Ok(rx)
    }

    /// Validates a CPE 2.3 URI, consulting the catalog when the syntax
    /// checks pass. Non-streaming.
    pub async fn validate_cpe(&self, cpe: &str) -> CpeValidation {
        CpeValidator::validate(self.catalog.as_ref(), cpe).await
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Drives one pipeline to its terminal event. Errors come back with the
/// phase they occurred in.
async fn run_pipeline<C: CpeCatalog>(
    catalog: &Arc<C>,
    config: &Config,
    asset_name: &str,
    top_n: usize,
    events: &ProgressSender,
) -> Result<(), (Phase, DiscoveryError)> {
    events
        .progress(Phase::Parsing, "Parsing asset name...")
        .await
        .map_err(|e| (Phase::Parsing, e))?;

    let parsed = AssetParser::new().parse(asset_name);
    tracing::debug!(
        vendor = ?parsed.vendor,
        product = ?parsed.product,
        version = ?parsed.version,
        "asset parsed"
    );

    let search = ProgressiveSearch::new(catalog.as_ref(), config.search.narrow_target);
    let outcome = search
        .run(&parsed, events)
        .await
        .map_err(|e| (Phase::Searching, e))?;

    events
        .progress(
            Phase::Scoring,
            format!("Scoring {} candidates...", outcome.records.len()),
        )
        .await
        .map_err(|e| (Phase::Scoring, e))?;

    let scorer = Scorer::new(config.scoring.weights);
    let candidates: Vec<_> = outcome
        .records
        .iter()
        .map(|record| scorer.score_record(&parsed, record))
        .collect();

    let ranked = rank(candidates, top_n);
    let count = ranked.len();
    let total_found = outcome.total_found;
    let message = if outcome.partial {
        format!("Top {count} of {total_found} matches selected (search was cut short)")
    } else {
        format!("Top {count} of {total_found} matches selected")
    };

    events
        .completed(
            message,
            DiscoveryReport {
                parsed,
                candidates: ranked,
                count,
                total_found,
            },
        )
        .await
        .map_err(|e| (Phase::Ranking, e))?;

    Ok(())
}
