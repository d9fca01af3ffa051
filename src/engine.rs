//! One-shot recommendation runs.
//!
//! [`RecommendationEngine`] wires the pipeline together: index the crawled
//! records, extract engaged observations, train a factor model on the
//! caller's [`TrainingContext`], then produce top-N lists for every indexed
//! user. Each run is self-contained; nothing persists between runs except
//! what the caller writes out.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::als::{AlsConfig, AlsTrainer, TrainingContext};
use crate::catalog::Catalog;
use crate::error::{GamerecError, Result};
use crate::index::UserIndex;
use crate::interactions::extract_observations;
use crate::inventory::RawInventoryRecord;
use crate::recommend::Recommender;

/// Configuration for a recommendation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Training configuration.
    pub als: AlsConfig,
    /// Number of recommendations per user.
    pub top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            als: AlsConfig::default(),
            top_n: 10,
        }
    }
}

impl EngineConfig {
    /// Validates the configuration before any work starts.
    pub fn validate(&self) -> Result<()> {
        self.als.validate()?;
        if self.top_n == 0 {
            return Err(GamerecError::invalid_config("top_n must be positive"));
        }
        Ok(())
    }
}

/// Counters describing one finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Distinct users in the input.
    pub total_users: usize,
    /// Users that ended up with trained factors.
    pub trained_users: usize,
    /// Items that ended up with trained factors.
    pub trained_items: usize,
    /// Engaged observations extracted from the input.
    pub observations: usize,
    /// Users that received a recommendation list.
    pub recommended_users: usize,
    /// Users skipped for having no trained factors.
    pub skipped_users: Vec<String>,
    /// Time spent in training, in milliseconds.
    pub training_ms: u64,
    /// Wall time of the whole run, in milliseconds.
    pub total_ms: u64,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Recommended application ids per user id, best first.
    pub recommendations: BTreeMap<String, Vec<u32>>,
    /// Run statistics.
    pub summary: RunSummary,
}

/// End-to-end pipeline from crawled records to per-user recommendations.
pub struct RecommendationEngine {
    config: EngineConfig,
}

impl RecommendationEngine {
    /// Creates an engine, validating the configuration up front.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(RecommendationEngine { config })
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the full pipeline over decoded inventory records.
    ///
    /// With a catalog, recommendations are bounded to the applications it
    /// lists. Fails with [`GamerecError::EmptyObservations`] when no record
    /// carries positive play time.
    pub fn run(
        &self,
        records: &[RawInventoryRecord],
        catalog: Option<&Catalog>,
        ctx: &TrainingContext,
    ) -> Result<RunOutcome> {
        let run_start = Instant::now();

        let index = UserIndex::from_records(records);
        let observations = extract_observations(&index, records)?;
        tracing::info!(
            "indexed {} users, extracted {} engaged observations",
            index.len(),
            observations.len()
        );

        let trainer = AlsTrainer::new(self.config.als.clone())?;
        let training_start = Instant::now();
        let model = trainer.train(&observations, ctx)?;
        let training_ms = training_start.elapsed().as_millis() as u64;
        tracing::info!(
            "trained {} user and {} item factor vectors in {} ms",
            model.user_count(),
            model.item_count(),
            training_ms
        );

        let mut recommender = Recommender::new(&model, &index);
        if let Some(catalog) = catalog {
            tracing::info!("bounding candidates to {} cataloged apps", catalog.len());
            recommender = recommender.with_catalog(catalog);
        }
        let batch = recommender.recommend_batch(self.config.top_n)?;
        tracing::info!(
            "recommended for {} users, skipped {}",
            batch.recommendations.len(),
            batch.skipped_users.len()
        );

        let summary = RunSummary {
            total_users: index.len(),
            trained_users: model.user_count(),
            trained_items: model.item_count(),
            observations: observations.len(),
            recommended_users: batch.recommendations.len(),
            skipped_users: batch.skipped_users,
            training_ms,
            total_ms: run_start.elapsed().as_millis() as u64,
        };

        Ok(RunOutcome {
            recommendations: batch.recommendations,
            summary,
        })
    }
}
