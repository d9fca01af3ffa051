//! Learned latent factors.

use ahash::AHashMap;

use crate::error::{GamerecError, Result};

/// Low-rank factors learned from the observation set.
///
/// Factors exist exactly for the users and items that appeared in at least
/// one observation. Entities absent from training have no entry, which is
/// the cold-start condition callers must handle.
#[derive(Debug, Clone)]
pub struct FactorModel {
    rank: usize,
    user_factors: AHashMap<usize, Vec<f32>>,
    item_factors: AHashMap<u32, Vec<f32>>,
}

impl FactorModel {
    /// Builds a model from explicit factor maps, checking every vector
    /// against the declared rank.
    pub fn from_factors(
        rank: usize,
        user_factors: AHashMap<usize, Vec<f32>>,
        item_factors: AHashMap<u32, Vec<f32>>,
    ) -> Result<Self> {
        if rank == 0 {
            return Err(GamerecError::invalid_config("rank must be positive"));
        }
        for (user_index, factor) in &user_factors {
            if factor.len() != rank {
                return Err(GamerecError::invalid_config(format!(
                    "factor vector for user index {user_index} has dimension {}, expected {rank}",
                    factor.len()
                )));
            }
        }
        for (appid, factor) in &item_factors {
            if factor.len() != rank {
                return Err(GamerecError::invalid_config(format!(
                    "factor vector for app {appid} has dimension {}, expected {rank}",
                    factor.len()
                )));
            }
        }
        Ok(FactorModel {
            rank,
            user_factors,
            item_factors,
        })
    }

    /// The number of latent factors per entity.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the factor vector of a user index, if the user was trained.
    pub fn user_factor(&self, user_index: usize) -> Option<&[f32]> {
        self.user_factors.get(&user_index).map(Vec::as_slice)
    }

    /// Returns the factor vector of an application id, if the item was trained.
    pub fn item_factor(&self, appid: u32) -> Option<&[f32]> {
        self.item_factors.get(&appid).map(Vec::as_slice)
    }

    /// Number of users with trained factors.
    pub fn user_count(&self) -> usize {
        self.user_factors.len()
    }

    /// Number of items with trained factors.
    pub fn item_count(&self) -> usize {
        self.item_factors.len()
    }

    /// Iterates over `(user_index, factor)` pairs in no particular order.
    pub fn users(&self) -> impl Iterator<Item = (usize, &[f32])> {
        self.user_factors
            .iter()
            .map(|(&user_index, factor)| (user_index, factor.as_slice()))
    }

    /// Iterates over `(appid, factor)` pairs in no particular order.
    pub fn items(&self) -> impl Iterator<Item = (u32, &[f32])> {
        self.item_factors
            .iter()
            .map(|(&appid, factor)| (appid, factor.as_slice()))
    }

    /// Predicted affinity of a user for an item, or `None` when either side
    /// is untrained.
    pub fn predict(&self, user_index: usize, appid: u32) -> Option<f32> {
        let user = self.user_factor(user_index)?;
        let item = self.item_factor(appid)?;
        Some(dot(user, item))
    }
}

/// Dot product of two equal-length factor vectors.
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_model() -> FactorModel {
        let mut user_factors = AHashMap::new();
        user_factors.insert(0, vec![1.0, 2.0]);
        user_factors.insert(1, vec![0.5, -1.0]);
        let mut item_factors = AHashMap::new();
        item_factors.insert(10, vec![3.0, 1.0]);
        item_factors.insert(20, vec![0.0, 4.0]);
        FactorModel::from_factors(2, user_factors, item_factors).unwrap()
    }

    #[test]
    fn test_accessors() {
        let model = small_model();
        assert_eq!(model.rank(), 2);
        assert_eq!(model.user_count(), 2);
        assert_eq!(model.item_count(), 2);
        assert_eq!(model.user_factor(0), Some(&[1.0, 2.0][..]));
        assert_eq!(model.user_factor(9), None);
        assert_eq!(model.item_factor(10), Some(&[3.0, 1.0][..]));
        assert_eq!(model.item_factor(99), None);
    }

    #[test]
    fn test_predict() {
        let model = small_model();
        // [1, 2] . [3, 1] = 5
        assert_eq!(model.predict(0, 10), Some(5.0));
        // [0.5, -1] . [0, 4] = -4
        assert_eq!(model.predict(1, 20), Some(-4.0));
        assert_eq!(model.predict(7, 10), None);
        assert_eq!(model.predict(0, 999), None);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let mut user_factors = AHashMap::new();
        user_factors.insert(0, vec![1.0, 2.0, 3.0]);
        let result = FactorModel::from_factors(2, user_factors, AHashMap::new());
        assert!(matches!(result, Err(GamerecError::InvalidConfig(_))));
    }

    #[test]
    fn test_dot() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(dot(&[], &[]), 0.0);
    }
}
