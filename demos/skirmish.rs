//! Grid Skirmish
//!
//! A squad steered by the learning controller fights a squad that always
//! charges the nearest opponent. Units step one tile per turn toward their
//! target and strike when adjacent.
//!
//! Usage: `cargo run --example skirmish -- [episodes] [config.json]`

use std::env;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vanguard::config::RunConfig;
use vanguard::model::TextWeightStore;
use vanguard::scheduler::{EpisodeScheduler, EpisodeStart, TableReport};
use vanguard::simulation::{HistoryView, StateView};
use vanguard::types::{
    ActionFeedback, AttackCommand, DamageEvent, DeathEvent, PastTurn, PlayerId, Position, UnitId,
    UnitView,
};

const GRID: i32 = 12;
const SQUAD: u32 = 4;
const MAX_TURNS: u32 = 150;

struct Soldier {
    view: UnitView,
    order: Option<UnitId>,
}

#[derive(Default)]
struct TurnLog {
    damage: Vec<DamageEvent>,
    deaths: Vec<DeathEvent>,
    feedback: Vec<(PlayerId, UnitId, ActionFeedback)>,
}

struct Battle {
    turn: u32,
    player: PlayerId,
    enemy: PlayerId,
    soldiers: Vec<Soldier>,
    log: Vec<TurnLog>,
    rng: StdRng,
}

impl Battle {
    fn new(player: PlayerId, enemy: PlayerId, mut rng: StdRng) -> Self {
        let mut soldiers = Vec::new();
        for i in 0..SQUAD * 2 {
            let (owner, id, column) = if i < SQUAD {
                (player, i + 1, rng.gen_range(0..3))
            } else {
                (enemy, 100 + i, rng.gen_range(GRID - 3..GRID))
            };
            soldiers.push(Soldier {
                view: UnitView {
                    id: UnitId(id),
                    owner,
                    position: Position::new(column, rng.gen_range(0..GRID)),
                    hit_points: rng.gen_range(8..=14),
                },
                order: None,
            });
        }
        Battle {
            turn: 0,
            player,
            enemy,
            soldiers,
            log: Vec::new(),
            rng,
        }
    }

    fn order(&mut self, commands: &[AttackCommand]) {
        for command in commands {
            if let Some(soldier) = self.soldier_mut(command.attacker) {
                soldier.order = Some(command.target);
            }
        }
    }

    fn soldier_mut(&mut self, id: UnitId) -> Option<&mut Soldier> {
        self.soldiers.iter_mut().find(|s| s.view.id == id)
    }

    fn alive(&self, owner: PlayerId) -> usize {
        self.soldiers.iter().filter(|s| s.view.owner == owner).count()
    }

    fn winner(&self) -> Option<PlayerId> {
        match (self.alive(self.player), self.alive(self.enemy)) {
            (0, _) => Some(self.enemy),
            (_, 0) => Some(self.player),
            _ => None,
        }
    }

    fn is_over(&self) -> bool {
        self.winner().is_some() || self.turn >= MAX_TURNS
    }

    /// Every enemy goes for the closest friendly, lowest id on ties
    fn enemy_orders(&mut self) {
        let targets: Vec<UnitView> = self
            .soldiers
            .iter()
            .filter(|s| s.view.owner == self.player)
            .map(|s| s.view.clone())
            .collect();
        let enemy = self.enemy;
        for soldier in self.soldiers.iter_mut().filter(|s| s.view.owner == enemy) {
            let from = soldier.view.position;
            soldier.order = targets
                .iter()
                .min_by_key(|t| (from.chebyshev(&t.position), t.id))
                .map(|t| t.id);
        }
    }

    fn resolve(&mut self) {
        self.enemy_orders();
        let mut events = TurnLog::default();
        let ids: Vec<UnitId> = self.soldiers.iter().map(|s| s.view.id).collect();

        for id in ids {
            let Some(attacker) = self.unit(id) else { continue };
            let Some(target_id) = self.soldiers.iter().find(|s| s.view.id == id).and_then(|s| s.order) else {
                continue;
            };
            let Some(target) = self.unit(target_id) else {
                events.feedback.push((attacker.owner, id, ActionFeedback::Failed));
                if let Some(soldier) = self.soldier_mut(id) {
                    soldier.order = None;
                }
                continue;
            };

            let feedback = if attacker.position.chebyshev(&target.position) <= 1 {
                let dealt = self.rng.gen_range(2u32..=5).min(target.hit_points);
                events.damage.push(DamageEvent {
                    attacker: id,
                    attacker_owner: attacker.owner,
                    defender: target_id,
                    defender_owner: target.owner,
                    damage: dealt,
                });
                if dealt == target.hit_points {
                    self.soldiers.retain(|s| s.view.id != target_id);
                    events.deaths.push(DeathEvent {
                        unit: target_id,
                        owner: target.owner,
                    });
                    ActionFeedback::Success
                } else {
                    if let Some(soldier) = self.soldier_mut(target_id) {
                        soldier.view.hit_points -= dealt;
                    }
                    ActionFeedback::Incomplete
                }
            } else {
                if let Some(soldier) = self.soldier_mut(id) {
                    let pos = &mut soldier.view.position;
                    pos.x += (target.position.x - pos.x).signum();
                    pos.y += (target.position.y - pos.y).signum();
                }
                ActionFeedback::Incomplete
            };
            events.feedback.push((attacker.owner, id, feedback));
        }

        debug!(
            "turn {}: {} hits, {} deaths",
            self.turn,
            events.damage.len(),
            events.deaths.len()
        );
        self.log.push(events);
        self.turn += 1;
    }

    fn turn_log(&self, turn: PastTurn) -> Option<&TurnLog> {
        self.log.get(turn.index() as usize)
    }
}

impl StateView for Battle {
    fn turn_number(&self) -> u32 {
        self.turn
    }

    fn unit(&self, id: UnitId) -> Option<UnitView> {
        self.soldiers
            .iter()
            .find(|s| s.view.id == id)
            .map(|s| s.view.clone())
    }

    fn unit_ids(&self, player: PlayerId) -> Vec<UnitId> {
        self.soldiers
            .iter()
            .filter(|s| s.view.owner == player)
            .map(|s| s.view.id)
            .collect()
    }
}

impl HistoryView for Battle {
    fn damage_events(&self, turn: PastTurn) -> &[DamageEvent] {
        self.turn_log(turn).map(|t| t.damage.as_slice()).unwrap_or(&[])
    }

    fn death_events(&self, turn: PastTurn) -> &[DeathEvent] {
        self.turn_log(turn).map(|t| t.deaths.as_slice()).unwrap_or(&[])
    }

    fn command_feedback(&self, player: PlayerId, turn: PastTurn) -> Vec<(UnitId, ActionFeedback)> {
        self.turn_log(turn)
            .map(|t| {
                t.feedback
                    .iter()
                    .filter(|(owner, _, _)| *owner == player)
                    .map(|(_, unit, feedback)| (*unit, *feedback))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn run() -> vanguard::Result<()> {
    let mut args = env::args().skip(1);
    let episodes = args.next().and_then(|a| a.parse::<usize>().ok());
    let mut config = match args.next() {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(limit) = episodes {
        config.episode_limit = limit;
    }

    let (player, enemy) = (config.player, config.enemy);
    let mut layouts = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let store = TextWeightStore::new(config.weights_path.clone());
    let mut scheduler = EpisodeScheduler::new(config, store, TableReport::stdout())?;

    let mut played = 0;
    let mut wins = 0;
    loop {
        let mut battle = Battle::new(player, enemy, StdRng::seed_from_u64(layouts.gen()));
        match scheduler.begin_episode(&battle, &battle) {
            EpisodeStart::Running(commands) => battle.order(&commands),
            EpisodeStart::LimitReached(_) => break,
        }

        while !battle.is_over() {
            battle.resolve();
            if battle.is_over() {
                break;
            }
            let commands = scheduler.step(&battle, &battle);
            battle.order(&commands);
        }
        scheduler.end_episode(&battle, &battle);

        played += 1;
        if battle.winner() == Some(player) {
            wins += 1;
        }
        info!(
            "battle {} ended on turn {} ({:?})",
            played,
            battle.turn,
            battle.winner()
        );
    }

    info!("won {} of {} battles", wins, played);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    if let Err(e) = run() {
        eprintln!("skirmish failed: {}", e);
        std::process::exit(1);
    }
}
