//! # Linear Q-Function
//!
//! `Q(s, a) = w · φ(s, a)` over the five features of [`crate::features`].
//!
//! Learning is semi-gradient TD(0). Each friendly unit with a pending
//! decision proposes its own candidate weight vector; the candidates of a
//! turn are averaged and then max-normalized, so the squad always shares
//! exactly one weight vector whatever its size.
//!
//! ```rust
//! use vanguard::model::{combine_candidates, td_update};
//! use ndarray::array;
//!
//! let w = array![0.0, 0.0, 0.0, 0.0, 0.0];
//! let phi = array![1.0, 1.0, 0.5, 0.0, 0.0];
//! let candidate = td_update(&w, &phi, 2.0, 0.0, 0.0, 0.5, 0.9);
//! let combined = combine_candidates(&[candidate]).unwrap();
//! assert!((combined.iter().fold(0.0f64, |m, v| m.max(v.abs())) - 1.0).abs() < 1e-12);
//! ```

pub mod store;

use log::debug;
use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;

use crate::error::{Result, VanguardError};
use crate::features::{FeatureVector, NUM_FEATURES};

pub use store::{BincodeWeightStore, MemoryWeightStore, TextWeightStore, WeightStore};

/// Inner product of a weight vector and a feature vector
pub fn q_value(weights: &Array1<f64>, features: &FeatureVector) -> f64 {
    weights.dot(features)
}

/// One TD(0) step for a single observation:
/// `w[i] - lr * (reward + gamma * next_max_q - current_q) * φ[i]`
pub fn td_update(
    weights: &Array1<f64>,
    features: &FeatureVector,
    reward: f64,
    next_max_q: f64,
    current_q: f64,
    learning_rate: f64,
    gamma: f64,
) -> Array1<f64> {
    let td_error = reward + gamma * next_max_q - current_q;
    weights - &(features * (learning_rate * td_error))
}

/// Average the candidates and rescale by the largest absolute component.
///
/// `None` when there are no candidates. An all-zero average is returned
/// unscaled.
pub fn combine_candidates(candidates: &[Array1<f64>]) -> Option<Array1<f64>> {
    let first = candidates.first()?;
    let mut mean = Array1::<f64>::zeros(first.len());
    for candidate in candidates {
        mean += candidate;
    }
    mean /= candidates.len() as f64;

    let max_abs = mean.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if max_abs > 0.0 {
        mean /= max_abs;
    }
    Some(mean)
}

/// The learned weights plus the fixed learning hyperparameters
#[derive(Clone, Debug)]
pub struct LinearQModel {
    weights: Array1<f64>,
    learning_rate: f64,
    gamma: f64,
}

impl LinearQModel {
    /// Wrap existing weights; they must have one entry per feature
    pub fn new(weights: Array1<f64>, learning_rate: f64, gamma: f64) -> Result<Self> {
        if weights.len() != NUM_FEATURES {
            return Err(VanguardError::dimension_mismatch(NUM_FEATURES, weights.len()));
        }
        Ok(LinearQModel {
            weights,
            learning_rate,
            gamma,
        })
    }

    /// Fresh weights drawn uniformly from `[-1, 1]`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, learning_rate: f64, gamma: f64) -> Self {
        let weights = Array1::random_using(NUM_FEATURES, Uniform::new_inclusive(-1.0, 1.0), rng);
        LinearQModel {
            weights,
            learning_rate,
            gamma,
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn value(&self, features: &FeatureVector) -> f64 {
        q_value(&self.weights, features)
    }

    /// The weights one unit's observation would move us to
    pub fn candidate(&self, features: &FeatureVector, reward: f64, next_max_q: f64) -> Array1<f64> {
        td_update(
            &self.weights,
            features,
            reward,
            next_max_q,
            self.value(features),
            self.learning_rate,
            self.gamma,
        )
    }

    /// Replace the weights with the combined candidates of one turn.
    ///
    /// Returns `false` (and leaves the weights alone) if there were none.
    pub fn apply(&mut self, candidates: &[Array1<f64>]) -> bool {
        match combine_candidates(candidates) {
            Some(next) => {
                let shift = (&next - &self.weights).iter().fold(0.0f64, |m, v| m.max(v.abs()));
                debug!("weights updated from {} candidates, max shift {:.6}", candidates.len(), shift);
                self.weights = next;
                true
            }
            None => false,
        }
    }
}
