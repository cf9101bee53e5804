//! # Simulation Interface
//!
//! The host simulation owns positions, hit points, combat and turn
//! advancement. The controller only reads it through two views:
//!
//! - [`StateView`]: the world at the current turn boundary
//! - [`HistoryView`]: what happened during an already elapsed turn
//!
//! History is addressed by [`PastTurn`], which cannot name turn -1.
//! [`memory`] holds plain in-memory implementations used by tests and
//! benches.

pub mod memory;

use crate::types::{ActionFeedback, DamageEvent, DeathEvent, PastTurn, PlayerId, UnitId, UnitView};

pub use memory::{EventLog, Snapshot, TurnEvents};

/// Read-only view of the simulation at a turn boundary
pub trait StateView {
    /// Current turn number, starting at 0
    fn turn_number(&self) -> u32;

    /// Look up a unit; `None` once it no longer exists
    fn unit(&self, id: UnitId) -> Option<UnitView>;

    /// Ids of the live units controlled by `player`
    fn unit_ids(&self, player: PlayerId) -> Vec<UnitId>;

    /// The turn that just elapsed, if any
    fn last_turn(&self) -> Option<PastTurn> {
        PastTurn::before(self.turn_number())
    }
}

/// Read-only view of the per-turn event logs
pub trait HistoryView {
    fn damage_events(&self, turn: PastTurn) -> &[DamageEvent];

    fn death_events(&self, turn: PastTurn) -> &[DeathEvent];

    /// Feedback for the commands `player` issued, keyed by unit
    fn command_feedback(&self, player: PlayerId, turn: PastTurn) -> Vec<(UnitId, ActionFeedback)>;
}
