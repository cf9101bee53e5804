use serde::{Serialize, Deserialize};

/// Exploration-rate schedules, indexed by training episode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExplorationSchedule {
    /// Same epsilon for every episode
    Constant { epsilon: f64 },

    /// Exponential decay: epsilon = initial * decay_rate^episode
    ExponentialDecay {
        initial: f64,
        decay_rate: f64,
    },
}

impl ExplorationSchedule {
    /// Epsilon to use throughout training episode `episode`
    pub fn epsilon_at(&self, episode: usize) -> f64 {
        match self {
            ExplorationSchedule::Constant { epsilon } => *epsilon,

            ExplorationSchedule::ExponentialDecay { initial, decay_rate } => {
                let exponent = i32::try_from(episode).unwrap_or(i32::MAX);
                initial * decay_rate.powi(exponent)
            }
        }
    }

    pub fn constant(epsilon: f64) -> Self {
        ExplorationSchedule::Constant { epsilon }
    }

    pub fn exponential(initial: f64, decay_rate: f64) -> Self {
        ExplorationSchedule::ExponentialDecay { initial, decay_rate }
    }
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        ExplorationSchedule::exponential(0.02, 0.9)
    }
}
