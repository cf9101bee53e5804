//! # Target Selection
//!
//! Epsilon-greedy choice of which enemy a friendly unit attacks.
//!
//! - **Training**: one uniform draw per decision; at or below the decayed
//!   epsilon a uniformly random candidate is taken, otherwise the argmax.
//! - **Evaluation**: always the argmax. The random generator is never
//!   touched, so a frozen model replays identical choices.
//!
//! Argmax ties go to the first candidate in iteration order.

pub mod exploration;

use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, VanguardError};
use crate::features::{FeatureExtractor, FeatureVector};
use crate::model::LinearQModel;
use crate::roster::Roster;
use crate::simulation::{HistoryView, StateView};
use crate::types::UnitId;

pub use exploration::ExplorationSchedule;

/// Whether exploration is allowed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyMode {
    Train,
    Evaluate,
}

/// Everything needed to score a candidate target this turn
pub struct DecisionContext<'a, S: ?Sized, H: ?Sized> {
    pub state: &'a S,
    pub history: &'a H,
    pub roster: &'a Roster,
    pub extractor: &'a FeatureExtractor,
    pub model: &'a LinearQModel,
}

impl<'a, S, H> DecisionContext<'a, S, H>
where
    S: StateView + ?Sized,
    H: HistoryView + ?Sized,
{
    /// Features and Q-value of `attacker` hitting `candidate`
    pub fn score(&self, attacker: UnitId, candidate: UnitId) -> Decision {
        let features = self
            .extractor
            .extract(self.state, self.history, self.roster, attacker, candidate);
        let q_value = self.model.value(&features);
        Decision {
            target: candidate,
            features,
            q_value,
        }
    }

    /// Highest-valued candidate, first one winning ties
    pub fn greedy(&self, attacker: UnitId, candidates: &[UnitId]) -> Option<Decision> {
        let mut best: Option<Decision> = None;
        for &candidate in candidates {
            let scored = self.score(attacker, candidate);
            match &best {
                Some(current) if scored.q_value <= current.q_value => {}
                _ => best = Some(scored),
            }
        }
        best
    }

    /// `max_a Q(s, a)` over the candidates
    pub fn max_q(&self, attacker: UnitId, candidates: &[UnitId]) -> Option<f64> {
        self.greedy(attacker, candidates).map(|d| d.q_value)
    }
}

/// A chosen target together with the features it was judged on
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub target: UnitId,
    pub features: FeatureVector,
    pub q_value: f64,
}

/// Epsilon-greedy selector with a per-episode exploration rate
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    schedule: ExplorationSchedule,
    epsilon: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(schedule: ExplorationSchedule, rng: StdRng) -> Self {
        let epsilon = schedule.epsilon_at(0);
        EpsilonGreedy {
            schedule,
            epsilon,
            rng,
        }
    }

    /// Recompute epsilon for the given training episode count
    pub fn begin_episode(&mut self, training_episode: usize) {
        self.epsilon = self.schedule.epsilon_at(training_episode);
    }

    /// Exploration rate in effect for the current episode
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn select<S, H>(
        &mut self,
        ctx: &DecisionContext<'_, S, H>,
        attacker: UnitId,
        candidates: &[UnitId],
        mode: PolicyMode,
    ) -> Result<Decision>
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        if candidates.is_empty() {
            return Err(VanguardError::EmptyCandidates);
        }

        if mode == PolicyMode::Train && self.rng.gen::<f64>() <= self.epsilon {
            if let Some(&target) = candidates.choose(&mut self.rng) {
                trace!("unit {} explores toward {}", attacker, target);
                return Ok(ctx.score(attacker, target));
            }
        }

        ctx.greedy(attacker, candidates)
            .ok_or(VanguardError::EmptyCandidates)
    }
}
