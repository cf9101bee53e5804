//! Decides whether a turn warrants re-planning.

use std::fmt;

use crate::simulation::{HistoryView, StateView};
use crate::types::PlayerId;

/// Why re-planning was triggered, in priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerReason {
    EpisodeStart,
    Death,
    Damage,
    CommandResolved,
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriggerReason::EpisodeStart => "episode start",
            TriggerReason::Death => "death",
            TriggerReason::Damage => "damage",
            TriggerReason::CommandResolved => "command resolved",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug)]
pub struct TriggerDetector {
    player: PlayerId,
}

impl TriggerDetector {
    pub fn new(player: PlayerId) -> Self {
        TriggerDetector { player }
    }

    pub fn detect<S, H>(&self, state: &S, history: &H) -> Option<TriggerReason>
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        let Some(last) = state.last_turn() else {
            return Some(TriggerReason::EpisodeStart);
        };
        if !history.death_events(last).is_empty() {
            return Some(TriggerReason::Death);
        }
        if !history.damage_events(last).is_empty() {
            return Some(TriggerReason::Damage);
        }
        history
            .command_feedback(self.player, last)
            .iter()
            .any(|(_, feedback)| feedback.is_resolved())
            .then_some(TriggerReason::CommandResolved)
    }

    pub fn should_replan<S, H>(&self, state: &S, history: &H) -> bool
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        self.detect(state, history).is_some()
    }
}
