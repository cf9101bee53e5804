pub mod test_model;
pub mod test_policy;

use crate::simulation::Snapshot;

/// Two footmen of player 0 facing two of player 1.
///
/// Unit 1 is adjacent to enemy 10; enemy 11 stands far off.
pub fn skirmish(turn: u32) -> Snapshot {
    Snapshot::new(turn)
        .with_unit(1, 0, 0, 0, 10)
        .with_unit(2, 0, 0, 1, 10)
        .with_unit(10, 1, 1, 0, 10)
        .with_unit(11, 1, 5, 5, 10)
}
