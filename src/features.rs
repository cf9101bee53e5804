//! # Feature Extraction
//!
//! Encodes an (attacker, candidate target) pair as a fixed five-element
//! vector for the linear Q-function:
//!
//! | idx | feature | range |
//! |-----|---------|-------|
//! | 0 | bias | always `1.0` |
//! | 1 | inverse Chebyshev distance | `(0, 1]`, `-1` if a unit is gone |
//! | 2 | attacker hit-point share `hp_a / (hp_a + hp_c)` | `[0, 1]`, `-1` if a unit is gone |
//! | 3 | friendly units that hit the candidate last turn / friendly roster size | `[0, 1]` |
//! | 4 | candidate hit this attacker last turn | `0` or `1` |
//!
//! Features 3 and 4 are `0` on the first turn of an episode.

use std::collections::BTreeSet;

use ndarray::Array1;

use crate::roster::Roster;
use crate::simulation::{HistoryView, StateView};
use crate::types::{PlayerId, UnitId};

/// Length of every feature (and weight) vector
pub const NUM_FEATURES: usize = 5;

/// Value used for geometric features when either unit no longer exists
pub const ABSENT: f64 = -1.0;

pub type FeatureVector = Array1<f64>;

/// Computes feature vectors for one controlling player
#[derive(Clone, Debug)]
pub struct FeatureExtractor {
    player: PlayerId,
}

impl FeatureExtractor {
    pub fn new(player: PlayerId) -> Self {
        FeatureExtractor { player }
    }

    /// Feature vector for `attacker` choosing to hit `candidate`
    pub fn extract<S, H>(
        &self,
        state: &S,
        history: &H,
        roster: &Roster,
        attacker: UnitId,
        candidate: UnitId,
    ) -> FeatureVector
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        Array1::from(vec![
            1.0,
            inverse_distance(state, attacker, candidate),
            hit_point_share(state, attacker, candidate),
            self.concurrent_attackers(state, history, roster, candidate),
            self.reciprocal_attack(state, history, attacker, candidate),
        ])
    }

    /// Share of the friendly roster that damaged `candidate` last turn
    fn concurrent_attackers<S, H>(&self, state: &S, history: &H, roster: &Roster, candidate: UnitId) -> f64
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        let Some(last) = state.last_turn() else {
            return 0.0;
        };
        if roster.friendly_count() == 0 {
            return 0.0;
        }
        let attackers: BTreeSet<UnitId> = history
            .damage_events(last)
            .iter()
            .filter(|e| {
                e.defender == candidate && e.defender_owner != self.player && e.attacker_owner == self.player
            })
            .map(|e| e.attacker)
            .collect();
        attackers.len() as f64 / roster.friendly_count() as f64
    }

    /// 1.0 if the enemy `candidate` damaged our `attacker` last turn
    fn reciprocal_attack<S, H>(&self, state: &S, history: &H, attacker: UnitId, candidate: UnitId) -> f64
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        let Some(last) = state.last_turn() else {
            return 0.0;
        };
        let hit = history.damage_events(last).iter().any(|e| {
            e.attacker == candidate
                && e.attacker_owner != self.player
                && e.defender == attacker
                && e.defender_owner == self.player
        });
        if hit {
            1.0
        } else {
            0.0
        }
    }
}

fn inverse_distance<S: StateView + ?Sized>(state: &S, attacker: UnitId, candidate: UnitId) -> f64 {
    match (state.unit(attacker), state.unit(candidate)) {
        (Some(a), Some(c)) => {
            // Units never share a tile; clamp so a stacked pair reads as adjacent
            let distance = a.position.chebyshev(&c.position).max(1);
            1.0 / distance as f64
        }
        _ => ABSENT,
    }
}

fn hit_point_share<S: StateView + ?Sized>(state: &S, attacker: UnitId, candidate: UnitId) -> f64 {
    match (state.unit(attacker), state.unit(candidate)) {
        (Some(a), Some(c)) => {
            let total = u64::from(a.hit_points) + u64::from(c.hit_points);
            if total == 0 {
                ABSENT
            } else {
                a.hit_points as f64 / total as f64
            }
        }
        _ => ABSENT,
    }
}
