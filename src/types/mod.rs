use serde::{Serialize, Deserialize};
use std::fmt;

/// Identifier of a unit, unique within a side and stable for its lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Player (controller) number as reported by the host simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Grid position of a unit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Chebyshev (king-move) distance: `max(|dx|, |dy|)`
    pub fn chebyshev(&self, other: &Position) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

/// Read-only view of one live unit at a turn boundary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub owner: PlayerId,
    pub position: Position,
    pub hit_points: u32,
}

/// One damage event from the history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub attacker: UnitId,
    pub attacker_owner: PlayerId,
    pub defender: UnitId,
    pub defender_owner: PlayerId,
    pub damage: u32,
}

/// One death event from the history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeathEvent {
    pub unit: UnitId,
    pub owner: PlayerId,
}

/// Host feedback on a previously issued command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionFeedback {
    Incomplete,
    Success,
    Failed,
}

impl ActionFeedback {
    /// Whether the command finished, successfully or not
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ActionFeedback::Incomplete)
    }
}

/// The only command kind the controller emits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackCommand {
    pub attacker: UnitId,
    pub target: UnitId,
}

/// A turn that has already elapsed.
///
/// Only obtainable from a current turn number of at least 1, so history
/// can never be queried for turn -1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PastTurn(u32);

impl PastTurn {
    /// The turn immediately before `current`, if there is one
    pub fn before(current: u32) -> Option<Self> {
        current.checked_sub(1).map(PastTurn)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}
