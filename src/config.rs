use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::error::{Result, VanguardError};
use crate::policy::ExplorationSchedule;
use crate::reward::RewardConfig;
use crate::types::PlayerId;

/// Run-wide settings, supplied once at startup.
///
/// Every field has a default, so a partial (or empty) JSON document is a
/// valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Training episodes to run before stopping
    pub episode_limit: usize,
    /// Start from stored weights instead of random ones
    pub load_weights: bool,
    pub learning_rate: f64,
    pub gamma: f64,
    /// Base exploration rate
    pub epsilon: f64,
    /// Per-training-episode multiplier applied to `epsilon`
    pub epsilon_decay: f64,
    /// An evaluation block runs whenever the training count is a multiple of this
    pub evaluation_interval: usize,
    /// Evaluation episodes per block
    pub evaluation_block: usize,
    pub player: PlayerId,
    pub enemy: PlayerId,
    pub seed: u64,
    pub weights_path: PathBuf,
    pub reward: RewardConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            episode_limit: 10,
            load_weights: false,
            learning_rate: 0.0001,
            gamma: 0.9,
            epsilon: 0.02,
            epsilon_decay: 0.9,
            evaluation_interval: 10,
            evaluation_block: 5,
            player: PlayerId(0),
            enemy: PlayerId(1),
            seed: 12345,
            weights_path: PathBuf::from("agent_weights/weights.txt"),
            reward: RewardConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn exploration(&self) -> ExplorationSchedule {
        ExplorationSchedule::exponential(self.epsilon, self.epsilon_decay)
    }

    pub fn validate(&self) -> Result<()> {
        if self.episode_limit == 0 {
            return Err(VanguardError::invalid_parameter("episode_limit", "must be positive"));
        }
        if self.evaluation_interval == 0 {
            return Err(VanguardError::invalid_parameter("evaluation_interval", "must be positive"));
        }
        if self.evaluation_block == 0 {
            return Err(VanguardError::invalid_parameter("evaluation_block", "must be positive"));
        }
        if !(self.learning_rate > 0.0) {
            return Err(VanguardError::invalid_parameter("learning_rate", "must be positive"));
        }
        for (name, value) in [
            ("gamma", self.gamma),
            ("epsilon", self.epsilon),
            ("epsilon_decay", self.epsilon_decay),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(VanguardError::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("{} is outside [0, 1]", value),
                });
            }
        }
        if self.player == self.enemy {
            return Err(VanguardError::invalid_parameter("enemy", "must differ from player"));
        }
        Ok(())
    }
}

/// Builder pattern for RunConfig
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        RunConfigBuilder {
            config: RunConfig::default(),
        }
    }

    pub fn episode_limit(mut self, limit: usize) -> Self {
        self.config.episode_limit = limit;
        self
    }

    pub fn load_weights(mut self, load: bool) -> Self {
        self.config.load_weights = load;
        self
    }

    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.config.learning_rate = lr;
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn epsilon(mut self, epsilon: f64, decay: f64) -> Self {
        self.config.epsilon = epsilon;
        self.config.epsilon_decay = decay;
        self
    }

    pub fn evaluation(mut self, interval: usize, block: usize) -> Self {
        self.config.evaluation_interval = interval;
        self.config.evaluation_block = block;
        self
    }

    pub fn players(mut self, player: PlayerId, enemy: PlayerId) -> Self {
        self.config.player = player;
        self.config.enemy = enemy;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn weights_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.weights_path = path.into();
        self
    }

    pub fn reward(mut self, reward: RewardConfig) -> Self {
        self.config.reward = reward;
        self
    }

    pub fn build(self) -> Result<RunConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
