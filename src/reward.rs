//! Per-unit reward for one elapsed turn.

use serde::{Serialize, Deserialize};

use crate::simulation::HistoryView;
use crate::types::{PastTurn, PlayerId, UnitId};

/// Reward shaping constants
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Multiplied by the elapsed turn index and subtracted
    pub turn_penalty: f64,
    /// Added for every enemy death in the turn
    pub kill_bonus: f64,
    /// Subtracted for every friendly death in the turn
    pub death_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig {
            turn_penalty: 0.1,
            kill_bonus: 100.0,
            death_penalty: 100.0,
        }
    }
}

/// Scores what happened to one unit during one turn
#[derive(Clone, Debug)]
pub struct RewardFunction {
    config: RewardConfig,
    player: PlayerId,
    enemy: PlayerId,
}

impl RewardFunction {
    pub fn new(config: RewardConfig, player: PlayerId, enemy: PlayerId) -> Self {
        RewardFunction { config, player, enemy }
    }

    /// Reward attributable to `unit` for `turn`.
    ///
    /// `-turn_penalty * t`, plus damage dealt, minus damage taken, plus the
    /// kill bonus per enemy death and minus the death penalty per friendly
    /// death anywhere on the field. A pure sum, so event order is irrelevant.
    /// `unit` is a friendly id, so damage only counts when the event's owner
    /// on that side is our player.
    pub fn reward<H: HistoryView + ?Sized>(&self, history: &H, turn: PastTurn, unit: UnitId) -> f64 {
        let mut reward = -self.config.turn_penalty * turn.index() as f64;

        for event in history.damage_events(turn) {
            if event.attacker == unit && event.attacker_owner == self.player {
                reward += event.damage as f64;
            } else if event.defender == unit && event.defender_owner == self.player {
                reward -= event.damage as f64;
            }
        }

        for death in history.death_events(turn) {
            if death.owner == self.player {
                reward -= self.config.death_penalty;
            } else if death.owner == self.enemy {
                reward += self.config.kill_bonus;
            }
        }

        reward
    }
}
