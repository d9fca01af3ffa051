//! ALS training over a shared worker pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ahash::AHashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::als::AlsConfig;
use crate::als::model::{FactorModel, dot};
use crate::als::solver::NormalEquations;
use crate::error::{GamerecError, Result};
use crate::interactions::Observation;

/// Execution context shared by training runs.
///
/// Owns the worker pool used to fan per-entity solves out across cores and a
/// cancellation token checked at every half-pass boundary. Constructing one
/// is the caller's job, so the same process can run several trainings
/// against one pool with explicit lifetimes.
pub struct TrainingContext {
    pool: Arc<ThreadPool>,
    cancel_token: Arc<AtomicBool>,
}

impl TrainingContext {
    /// Creates a context with one worker per logical CPU.
    pub fn new() -> Result<Self> {
        Self::with_threads(num_cpus::get())
    }

    /// Creates a context with an explicit worker count.
    pub fn with_threads(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(GamerecError::invalid_config("threads must be positive"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("als-worker-{i}"))
            .build()
            .map_err(|e| GamerecError::internal(format!("Failed to create thread pool: {e}")))?;
        Ok(Self {
            pool: Arc::new(pool),
            cancel_token: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Number of worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Requests cancellation. Training stops at the next half-pass boundary.
    pub fn cancel(&self) {
        self.cancel_token.store(true, Ordering::SeqCst);
    }

    /// Checks whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.load(Ordering::SeqCst)
    }

    /// Returns a clonable handle for cancelling from another thread.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_token)
    }

    pub(crate) fn pool(&self) -> &ThreadPool {
        &self.pool
    }
}

/// Observations grouped per entity, in ascending key order.
///
/// The sorted order fixes which random vector initializes which entity, so a
/// seeded run is reproducible regardless of thread count.
struct GroupedObservations {
    by_user: Vec<(usize, Vec<(u32, f32)>)>,
    by_item: Vec<(u32, Vec<(usize, f32)>)>,
}

impl GroupedObservations {
    fn build(observations: &[Observation]) -> Self {
        let mut by_user: AHashMap<usize, Vec<(u32, f32)>> = AHashMap::new();
        let mut by_item: AHashMap<u32, Vec<(usize, f32)>> = AHashMap::new();
        for obs in observations {
            by_user
                .entry(obs.user_index)
                .or_default()
                .push((obs.appid, obs.weight));
            by_item
                .entry(obs.appid)
                .or_default()
                .push((obs.user_index, obs.weight));
        }
        let mut by_user: Vec<_> = by_user.into_iter().collect();
        by_user.sort_unstable_by_key(|(user_index, _)| *user_index);
        let mut by_item: Vec<_> = by_item.into_iter().collect();
        by_item.sort_unstable_by_key(|(appid, _)| *appid);
        GroupedObservations { by_user, by_item }
    }
}

/// Alternating least squares trainer.
pub struct AlsTrainer {
    config: AlsConfig,
}

impl AlsTrainer {
    /// Creates a trainer, validating the configuration up front.
    pub fn new(config: AlsConfig) -> Result<Self> {
        config.validate()?;
        Ok(AlsTrainer { config })
    }

    /// The configuration this trainer was built with.
    pub fn config(&self) -> &AlsConfig {
        &self.config
    }

    /// Trains a factor model over the observation set.
    ///
    /// Factors are created for exactly the users and items present in
    /// `observations`. Every pass rebuilds one side completely against the
    /// frozen other side, users first, then items. Between half-passes the
    /// context's cancellation token is honored.
    pub fn train(
        &self,
        observations: &[Observation],
        ctx: &TrainingContext,
    ) -> Result<FactorModel> {
        if observations.is_empty() {
            return Err(GamerecError::EmptyObservations);
        }

        let rank = self.config.factors;
        let lambda = self.config.regularization as f64;
        let grouped = GroupedObservations::build(observations);

        let mut rng: StdRng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut user_factors: AHashMap<usize, Vec<f32>> =
            AHashMap::with_capacity(grouped.by_user.len());
        for (user_index, _) in &grouped.by_user {
            user_factors.insert(*user_index, random_factor(&mut rng, rank));
        }
        let mut item_factors: AHashMap<u32, Vec<f32>> =
            AHashMap::with_capacity(grouped.by_item.len());
        for (appid, _) in &grouped.by_item {
            item_factors.insert(*appid, random_factor(&mut rng, rank));
        }

        tracing::info!(
            "training rank-{} model: {} observations, {} users, {} items, {} passes on {} threads",
            rank,
            observations.len(),
            grouped.by_user.len(),
            grouped.by_item.len(),
            self.config.iterations,
            ctx.threads()
        );

        for pass in 0..self.config.iterations {
            self.ensure_not_cancelled(ctx, pass, "user")?;
            let updated: Vec<(usize, Vec<f32>)> = ctx.pool().install(|| {
                grouped
                    .by_user
                    .par_iter()
                    .map(|(user_index, entries)| {
                        self.solve_entity(entries, &item_factors)
                            .map(|factor| (*user_index, factor))
                    })
                    .collect::<Result<Vec<_>>>()
            })?;
            for (user_index, factor) in updated {
                user_factors.insert(user_index, factor);
            }

            self.ensure_not_cancelled(ctx, pass, "item")?;
            let updated: Vec<(u32, Vec<f32>)> = ctx.pool().install(|| {
                grouped
                    .by_item
                    .par_iter()
                    .map(|(appid, entries)| {
                        self.solve_entity(entries, &user_factors)
                            .map(|factor| (*appid, factor))
                    })
                    .collect::<Result<Vec<_>>>()
            })?;
            for (appid, factor) in updated {
                item_factors.insert(appid, factor);
            }

            let objective = self.objective_of_maps(&grouped, &user_factors, &item_factors, lambda);
            tracing::debug!("ALS pass {}: objective = {:.6}", pass + 1, objective);
        }

        FactorModel::from_factors(rank, user_factors, item_factors)
    }

    /// Regularized weighted squared error of a model on an observation set.
    ///
    /// This is the quantity each training pass minimizes blockwise, so it is
    /// non-increasing across passes of a single run. Observation pairs the
    /// model never saw contribute nothing.
    pub fn objective(&self, observations: &[Observation], model: &FactorModel) -> f64 {
        let mut loss = 0.0;
        for obs in observations {
            let Some(predicted) = model.predict(obs.user_index, obs.appid) else {
                continue;
            };
            let (confidence, preference) = self.weighting(obs.weight);
            let residual = preference - predicted as f64;
            loss += confidence * residual * residual;
        }
        let mut penalty = 0.0;
        for (_, factor) in model.users() {
            penalty += norm_sq(factor);
        }
        for (_, factor) in model.items() {
            penalty += norm_sq(factor);
        }
        loss + self.config.regularization as f64 * penalty
    }

    /// Solves one entity's ridge system against the opposite side's factors.
    fn solve_entity<K: std::hash::Hash + Eq + std::fmt::Display>(
        &self,
        entries: &[(K, f32)],
        opposite: &AHashMap<K, Vec<f32>>,
    ) -> Result<Vec<f32>> {
        let mut equations = NormalEquations::new(self.config.factors);
        for (key, weight) in entries {
            let factor = opposite.get(key).ok_or_else(|| {
                GamerecError::internal(format!("no opposite factor for entity {key}"))
            })?;
            let (confidence, preference) = self.weighting(*weight);
            equations.add(factor, confidence, preference);
        }
        equations.regularize(self.config.regularization as f64);
        equations.solve()
    }

    /// Maps an observation weight to its `(confidence, preference)` pair.
    fn weighting(&self, weight: f32) -> (f64, f64) {
        match self.config.implicit_alpha {
            Some(alpha) => (1.0 + alpha as f64 * weight as f64, 1.0),
            None => (1.0, weight as f64),
        }
    }

    fn ensure_not_cancelled(&self, ctx: &TrainingContext, pass: usize, side: &str) -> Result<()> {
        if ctx.is_cancelled() {
            return Err(GamerecError::cancelled(format!(
                "training stopped before the {side} half-pass of pass {}",
                pass + 1
            )));
        }
        Ok(())
    }

    fn objective_of_maps(
        &self,
        grouped: &GroupedObservations,
        user_factors: &AHashMap<usize, Vec<f32>>,
        item_factors: &AHashMap<u32, Vec<f32>>,
        lambda: f64,
    ) -> f64 {
        let mut loss = 0.0;
        for (user_index, entries) in &grouped.by_user {
            let Some(user) = user_factors.get(user_index) else {
                continue;
            };
            for (appid, weight) in entries {
                let Some(item) = item_factors.get(appid) else {
                    continue;
                };
                let (confidence, preference) = self.weighting(*weight);
                let residual = preference - dot(user, item) as f64;
                loss += confidence * residual * residual;
            }
        }
        let mut penalty = 0.0;
        for factor in user_factors.values() {
            penalty += norm_sq(factor);
        }
        for factor in item_factors.values() {
            penalty += norm_sq(factor);
        }
        loss + lambda * penalty
    }
}

fn random_factor(rng: &mut StdRng, rank: usize) -> Vec<f32> {
    (0..rank).map(|_| rng.random_range(-0.1..0.1f32)).collect()
}

fn norm_sq(factor: &[f32]) -> f64 {
    factor.iter().map(|v| (*v as f64) * (*v as f64)).sum()
}
