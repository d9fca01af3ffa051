//! Per-entity ridge solves.
//!
//! Each ALS half-pass solves, for one entity at a time, the regularized
//! normal equations
//!
//! ```text
//! (sum_j c_j v_j v_j^T + lambda I) x = sum_j c_j p_j v_j
//! ```
//!
//! where `v_j` are the opposite side's fixed factors, `c_j` the observation
//! confidences and `p_j` the regression targets. Accumulation and the solve
//! run in f64; the resulting factors are stored as f32.

use crate::error::{GamerecError, Result};

/// Accumulator for one entity's regularized normal equations.
#[derive(Debug, Clone)]
pub struct NormalEquations {
    rank: usize,
    /// Row-major `rank * rank` coefficient matrix.
    a: Vec<f64>,
    b: Vec<f64>,
}

impl NormalEquations {
    /// Creates a zeroed system of the given rank.
    pub fn new(rank: usize) -> Self {
        NormalEquations {
            rank,
            a: vec![0.0; rank * rank],
            b: vec![0.0; rank],
        }
    }

    /// Folds one observation into the system.
    ///
    /// `factor` is the opposite entity's current factor vector, `confidence`
    /// the observation confidence and `preference` the regression target.
    pub fn add(&mut self, factor: &[f32], confidence: f64, preference: f64) {
        debug_assert_eq!(factor.len(), self.rank);
        for i in 0..self.rank {
            let fi = factor[i] as f64;
            self.b[i] += confidence * preference * fi;
            for j in 0..self.rank {
                self.a[i * self.rank + j] += confidence * fi * factor[j] as f64;
            }
        }
    }

    /// Adds `lambda` to the diagonal.
    pub fn regularize(&mut self, lambda: f64) {
        for i in 0..self.rank {
            self.a[i * self.rank + i] += lambda;
        }
    }

    /// Solves the accumulated system by Cholesky decomposition.
    ///
    /// Fails when the matrix is not positive definite, which can only happen
    /// with zero regularization and too few independent observations.
    pub fn solve(self) -> Result<Vec<f32>> {
        let n = self.rank;
        let mut lower = vec![0.0f64; n * n];

        for i in 0..n {
            for j in 0..=i {
                let mut sum = self.a[i * n + j];
                for k in 0..j {
                    sum -= lower[i * n + k] * lower[j * n + k];
                }
                if i == j {
                    if sum <= 0.0 {
                        return Err(GamerecError::other(
                            "normal equations are not positive definite; raise regularization",
                        ));
                    }
                    lower[i * n + j] = sum.sqrt();
                } else {
                    lower[i * n + j] = sum / lower[j * n + j];
                }
            }
        }

        // Forward substitution: L y = b.
        let mut y = vec![0.0f64; n];
        for i in 0..n {
            let mut sum = self.b[i];
            for k in 0..i {
                sum -= lower[i * n + k] * y[k];
            }
            y[i] = sum / lower[i * n + i];
        }

        // Back substitution: L^T x = y.
        let mut x = vec![0.0f64; n];
        for i in (0..n).rev() {
            let mut sum = y[i];
            for k in (i + 1)..n {
                sum -= lower[k * n + i] * x[k];
            }
            x[i] = sum / lower[i * n + i];
        }

        Ok(x.into_iter().map(|v| v as f32).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(
                (a - e).abs() < 1e-5,
                "expected {expected:?}, got {actual:?}"
            );
        }
    }

    #[test]
    fn test_diagonal_system() {
        let mut eq = NormalEquations::new(2);
        // A = [[2, 0], [0, 2]], b = [2, 4]
        eq.add(&[1.0, 0.0], 2.0, 1.0);
        eq.add(&[0.0, 1.0], 2.0, 2.0);

        let x = eq.solve().unwrap();
        assert_close(&x, &[1.0, 2.0]);
    }

    #[test]
    fn test_exact_recovery_without_regularization() {
        // Targets generated from x = [1.5, 2.0] over a spanning factor set.
        let truth = [1.5f32, 2.0];
        let factors = [[1.0f32, 0.0], [0.0, 1.0], [1.0, 1.0]];

        let mut eq = NormalEquations::new(2);
        for factor in &factors {
            let target = (factor[0] * truth[0] + factor[1] * truth[1]) as f64;
            eq.add(factor, 1.0, target);
        }

        let x = eq.solve().unwrap();
        assert_close(&x, &truth);
    }

    #[test]
    fn test_regularized_empty_system_solves_to_zero() {
        let mut eq = NormalEquations::new(3);
        eq.regularize(0.5);

        let x = eq.solve().unwrap();
        assert_close(&x, &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_regularization_shrinks_solution() {
        let mut plain = NormalEquations::new(1);
        plain.add(&[1.0], 1.0, 10.0);
        let mut ridged = plain.clone();
        ridged.regularize(1.0);

        let x_plain = plain.solve().unwrap();
        let x_ridged = ridged.solve().unwrap();
        assert_close(&x_plain, &[10.0]);
        assert_close(&x_ridged, &[5.0]);
    }

    #[test]
    fn test_singular_system_fails() {
        // One rank-1 update cannot determine two unknowns.
        let mut eq = NormalEquations::new(2);
        eq.add(&[1.0, 1.0], 1.0, 1.0);

        assert!(eq.solve().is_err());
    }
}
