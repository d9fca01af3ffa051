//! Top-N recommendation over a trained factor model.
//!
//! Scoring is the plain dot product between a user's factor vector and every
//! candidate item's. Candidates are all items the model trained factors for,
//! optionally narrowed to the applications a [`Catalog`] lists. Ties are
//! broken by ascending application id so repeated calls rank identically.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::als::model::{FactorModel, dot};
use crate::catalog::Catalog;
use crate::error::{GamerecError, Result};
use crate::index::UserIndex;

/// Result of recommending for every indexed user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Recommended application ids per user id, best first.
    pub recommendations: BTreeMap<String, Vec<u32>>,
    /// User ids skipped because they had no trained factors.
    pub skipped_users: Vec<String>,
}

/// Recommends games for indexed users from a trained model.
pub struct Recommender<'a> {
    model: &'a FactorModel,
    index: &'a UserIndex,
    catalog: Option<&'a Catalog>,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender over a model and the run's user index.
    pub fn new(model: &'a FactorModel, index: &'a UserIndex) -> Self {
        Recommender {
            model,
            index,
            catalog: None,
        }
    }

    /// Bounds candidates to the applications a catalog lists.
    pub fn with_catalog(mut self, catalog: &'a Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Returns the `top_n` highest-scoring application ids for one user.
    ///
    /// Fails with [`GamerecError::UnknownUser`] when the user index has no
    /// trained factors. Fewer than `top_n` ids come back when the candidate
    /// set is smaller.
    pub fn recommend(&self, user_index: usize, top_n: usize) -> Result<Vec<u32>> {
        if top_n == 0 {
            return Err(GamerecError::invalid_config("top_n must be positive"));
        }
        let user = self
            .model
            .user_factor(user_index)
            .ok_or(GamerecError::UnknownUser(user_index))?;

        let mut scored: Vec<(u32, f32)> = self
            .model
            .items()
            .filter(|(appid, _)| {
                self.catalog
                    .map(|catalog| catalog.contains(*appid))
                    .unwrap_or(true)
            })
            .map(|(appid, item)| (appid, dot(user, item)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(top_n);

        Ok(scored.into_iter().map(|(appid, _)| appid).collect())
    }

    /// Recommends for every user in the index, skipping cold-start users.
    ///
    /// A user indexed during the run but absent from the trained factor set
    /// (private inventory, nothing played) is recorded in `skipped_users`
    /// instead of failing the batch. Any other error aborts the batch.
    pub fn recommend_batch(&self, top_n: usize) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        for (user_index, user_id) in self.index.iter() {
            match self.recommend(user_index, top_n) {
                Ok(appids) => {
                    outcome.recommendations.insert(user_id.to_string(), appids);
                }
                Err(GamerecError::UnknownUser(_)) => {
                    tracing::warn!("no trained factors for user '{}'; skipping", user_id);
                    outcome.skipped_users.push(user_id.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(outcome)
    }
}
