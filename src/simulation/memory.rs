use std::collections::BTreeMap;

use super::{HistoryView, StateView};
use crate::types::{
    ActionFeedback, DamageEvent, DeathEvent, PastTurn, PlayerId, Position, UnitId, UnitView,
};

/// Owned snapshot of the world at one turn boundary
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    turn: u32,
    units: BTreeMap<UnitId, UnitView>,
}

impl Snapshot {
    pub fn new(turn: u32) -> Self {
        Snapshot {
            turn,
            units: BTreeMap::new(),
        }
    }

    /// Builder-style unit insertion
    pub fn with_unit(mut self, id: u32, owner: u32, x: i32, y: i32, hit_points: u32) -> Self {
        self.insert(UnitView {
            id: UnitId(id),
            owner: PlayerId(owner),
            position: Position::new(x, y),
            hit_points,
        });
        self
    }

    pub fn insert(&mut self, unit: UnitView) {
        self.units.insert(unit.id, unit);
    }

    pub fn remove(&mut self, id: UnitId) -> Option<UnitView> {
        self.units.remove(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitView> {
        self.units.get_mut(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitView> {
        self.units.values()
    }

    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    pub fn advance(&mut self) {
        self.turn += 1;
    }
}

impl StateView for Snapshot {
    fn turn_number(&self) -> u32 {
        self.turn
    }

    fn unit(&self, id: UnitId) -> Option<UnitView> {
        self.units.get(&id).cloned()
    }

    fn unit_ids(&self, player: PlayerId) -> Vec<UnitId> {
        self.units
            .values()
            .filter(|u| u.owner == player)
            .map(|u| u.id)
            .collect()
    }
}

/// Everything logged during a single turn
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnEvents {
    pub damage: Vec<DamageEvent>,
    pub deaths: Vec<DeathEvent>,
    pub feedback: Vec<(PlayerId, UnitId, ActionFeedback)>,
}

impl TurnEvents {
    pub fn is_empty(&self) -> bool {
        self.damage.is_empty() && self.deaths.is_empty() && self.feedback.is_empty()
    }
}

/// Append-only event history indexed by turn
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    turns: Vec<TurnEvents>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { turns: Vec::new() }
    }

    /// Mutable access to a turn's events, growing the log as needed
    pub fn turn_mut(&mut self, turn: u32) -> &mut TurnEvents {
        let idx = turn as usize;
        if self.turns.len() <= idx {
            self.turns.resize_with(idx + 1, TurnEvents::default);
        }
        &mut self.turns[idx]
    }

    pub fn record_damage(&mut self, turn: u32, attacker: &UnitView, defender: &UnitView, damage: u32) {
        self.turn_mut(turn).damage.push(DamageEvent {
            attacker: attacker.id,
            attacker_owner: attacker.owner,
            defender: defender.id,
            defender_owner: defender.owner,
            damage,
        });
    }

    pub fn record_death(&mut self, turn: u32, unit: UnitId, owner: PlayerId) {
        self.turn_mut(turn).deaths.push(DeathEvent { unit, owner });
    }

    pub fn record_feedback(&mut self, turn: u32, player: PlayerId, unit: UnitId, feedback: ActionFeedback) {
        self.turn_mut(turn).feedback.push((player, unit, feedback));
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    fn events(&self, turn: PastTurn) -> Option<&TurnEvents> {
        self.turns.get(turn.index() as usize)
    }
}

impl HistoryView for EventLog {
    fn damage_events(&self, turn: PastTurn) -> &[DamageEvent] {
        self.events(turn).map(|e| e.damage.as_slice()).unwrap_or(&[])
    }

    fn death_events(&self, turn: PastTurn) -> &[DeathEvent] {
        self.events(turn).map(|e| e.deaths.as_slice()).unwrap_or(&[])
    }

    fn command_feedback(&self, player: PlayerId, turn: PastTurn) -> Vec<(UnitId, ActionFeedback)> {
        self.events(turn)
            .map(|e| {
                e.feedback
                    .iter()
                    .filter(|(p, _, _)| *p == player)
                    .map(|(_, unit, fb)| (*unit, *fb))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookup_by_owner() {
        let state = Snapshot::new(0)
            .with_unit(1, 0, 0, 0, 10)
            .with_unit(2, 0, 1, 0, 10)
            .with_unit(7, 1, 5, 5, 10);
        assert_eq!(state.unit_ids(PlayerId(0)), vec![UnitId(1), UnitId(2)]);
        assert_eq!(state.unit_ids(PlayerId(1)), vec![UnitId(7)]);
        assert!(state.unit(UnitId(3)).is_none());
    }

    #[test]
    fn test_event_log_unrecorded_turn_is_empty() {
        let mut log = EventLog::new();
        log.record_death(2, UnitId(4), PlayerId(1));

        let t0 = PastTurn::before(1).unwrap();
        let t2 = PastTurn::before(3).unwrap();
        let t9 = PastTurn::before(10).unwrap();
        assert!(log.death_events(t0).is_empty());
        assert_eq!(log.death_events(t2).len(), 1);
        assert!(log.damage_events(t9).is_empty());
    }

    #[test]
    fn test_feedback_filtered_by_player() {
        let mut log = EventLog::new();
        log.record_feedback(0, PlayerId(0), UnitId(1), ActionFeedback::Success);
        log.record_feedback(0, PlayerId(1), UnitId(9), ActionFeedback::Failed);

        let t0 = PastTurn::before(1).unwrap();
        assert_eq!(
            log.command_feedback(PlayerId(0), t0),
            vec![(UnitId(1), ActionFeedback::Success)]
        );
    }
}
