use std::collections::BTreeSet;

use crate::simulation::StateView;
use crate::types::{DeathEvent, PlayerId, UnitId};

/// Liveness sets for both sides of the battle.
///
/// Populated once per episode from the state and afterwards only shrunk
/// by observed deaths. Iteration is in ascending id order, which is the
/// order target selection breaks ties in. Ids are only unique within a
/// side, so deaths are matched on their owner as well.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    player: PlayerId,
    friendly: BTreeSet<UnitId>,
    enemy: BTreeSet<UnitId>,
}

impl Roster {
    pub fn new<F, E>(player: PlayerId, friendly: F, enemy: E) -> Self
    where
        F: IntoIterator<Item = UnitId>,
        E: IntoIterator<Item = UnitId>,
    {
        Roster {
            player,
            friendly: friendly.into_iter().collect(),
            enemy: enemy.into_iter().collect(),
        }
    }

    /// Build the roster from the units each player controls right now
    pub fn from_state<S: StateView + ?Sized>(state: &S, player: PlayerId, enemy: PlayerId) -> Self {
        Roster::new(player, state.unit_ids(player), state.unit_ids(enemy))
    }

    /// Drop every unit named in `deaths`. Returns how many were removed.
    pub fn apply_deaths(&mut self, deaths: &[DeathEvent]) -> usize {
        deaths
            .iter()
            .filter(|d| {
                if d.owner == self.player {
                    self.friendly.remove(&d.unit)
                } else {
                    self.enemy.remove(&d.unit)
                }
            })
            .count()
    }

    pub fn friendly(&self) -> &BTreeSet<UnitId> {
        &self.friendly
    }

    pub fn enemy(&self) -> &BTreeSet<UnitId> {
        &self.enemy
    }

    pub fn friendly_count(&self) -> usize {
        self.friendly.len()
    }

    pub fn is_friendly(&self, id: UnitId) -> bool {
        self.friendly.contains(&id)
    }

    /// One side has been wiped out
    pub fn is_decided(&self) -> bool {
        self.friendly.is_empty() || self.enemy.is_empty()
    }
}
