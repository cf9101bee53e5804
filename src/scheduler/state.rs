//! Episode bookkeeping as plain data with pure transitions.

use serde::{Serialize, Deserialize};

use crate::config::RunConfig;

/// Phase of the run for the current episode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Training,
    Evaluating,
    /// Episode limit exceeded; no further episodes
    Finished,
}

/// Fixed shape of the training/evaluation alternation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpisodePlan {
    pub episode_limit: usize,
    pub evaluation_interval: usize,
    pub evaluation_block: usize,
}

impl From<&RunConfig> for EpisodePlan {
    fn from(config: &RunConfig) -> Self {
        EpisodePlan {
            episode_limit: config.episode_limit,
            evaluation_interval: config.evaluation_interval,
            evaluation_block: config.evaluation_block,
        }
    }
}

/// Outcome of a completed evaluation block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockResult {
    pub mean: f64,
    /// At least as good as every earlier block
    pub is_best: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeCounters {
    pub training_episodes: usize,
    /// Evaluation episodes run in the current block
    pub evaluation_episodes: usize,
    /// Summed reward of the current block
    pub evaluation_reward: f64,
    /// Mean reward of every completed block, oldest first
    pub block_means: Vec<f64>,
}

impl EpisodeCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next episode and report which phase it runs in.
    ///
    /// Whenever the training count is a multiple of the interval, a block of
    /// evaluation episodes runs before training resumes.
    pub fn begin_episode(&mut self, plan: &EpisodePlan) -> Phase {
        let evaluating = self.training_episodes % plan.evaluation_interval == 0
            && (self.evaluation_episodes == 0
                || self.evaluation_episodes % plan.evaluation_block != 0);

        if evaluating {
            self.evaluation_episodes += 1;
        } else {
            self.evaluation_episodes = 0;
            self.training_episodes += 1;
        }

        if self.training_episodes > plan.episode_limit {
            Phase::Finished
        } else if evaluating {
            Phase::Evaluating
        } else {
            Phase::Training
        }
    }

    pub fn record_evaluation_reward(&mut self, reward: f64) {
        self.evaluation_reward += reward;
    }

    pub fn block_complete(&self, plan: &EpisodePlan) -> bool {
        self.evaluation_episodes != 0 && self.evaluation_episodes % plan.evaluation_block == 0
    }

    /// Close the current block if its last episode just ended.
    ///
    /// Appends the block mean to the history and resets the running total.
    pub fn close_block(&mut self, plan: &EpisodePlan) -> Option<BlockResult> {
        if !self.block_complete(plan) {
            return None;
        }
        let mean = self.evaluation_reward / plan.evaluation_block as f64;
        let is_best = self.block_means.iter().all(|prior| mean >= *prior);
        self.block_means.push(mean);
        self.evaluation_reward = 0.0;
        Some(BlockResult { mean, is_best })
    }
}
