//! # Episode Scheduler
//!
//! The control loop the host simulation drives. Per episode the host calls:
//!
//! 1. [`EpisodeScheduler::begin_episode`] on turn 0
//! 2. [`EpisodeScheduler::step`] on every following turn
//! 3. [`EpisodeScheduler::end_episode`] on the terminal turn
//!
//! Episodes alternate between training and blocks of evaluation episodes
//! (see [`EpisodeCounters::begin_episode`]). On each triggered turn the
//! scheduler prunes dead units, learns from the previous decisions (training
//! only), and assigns every friendly unit a new target. Completed evaluation
//! blocks checkpoint the weights when they match or beat every earlier block.

pub mod report;
pub mod state;

use std::collections::BTreeMap;

use log::{debug, error, info, warn};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::RunConfig;
use crate::error::Result;
use crate::features::FeatureExtractor;
use crate::model::{LinearQModel, WeightStore};
use crate::policy::{Decision, DecisionContext, EpsilonGreedy, PolicyMode};
use crate::reward::RewardFunction;
use crate::roster::Roster;
use crate::simulation::{HistoryView, StateView};
use crate::trigger::TriggerDetector;
use crate::types::{AttackCommand, UnitId};

pub use report::{render_table, ReportRow, ReportSink, RunSummary, TableReport};
pub use state::{BlockResult, EpisodeCounters, EpisodePlan, Phase};

/// Last turn's decision per friendly unit, with the features it was made on
pub type PendingAssignment = BTreeMap<UnitId, Decision>;

/// Result of starting an episode
#[derive(Clone, Debug, PartialEq)]
pub enum EpisodeStart {
    /// Orders for turn 0
    Running(Vec<AttackCommand>),
    /// The episode limit has been passed; the run is over
    LimitReached(RunSummary),
}

pub struct EpisodeScheduler<W: WeightStore, R: ReportSink> {
    config: RunConfig,
    plan: EpisodePlan,
    counters: EpisodeCounters,
    phase: Phase,
    roster: Roster,
    pending: PendingAssignment,
    model: LinearQModel,
    policy: EpsilonGreedy,
    extractor: FeatureExtractor,
    trigger: TriggerDetector,
    reward: RewardFunction,
    store: W,
    reporter: R,
    reported: bool,
}

impl<W: WeightStore, R: ReportSink> EpisodeScheduler<W, R> {
    /// Set up a run.
    ///
    /// With `load_weights` set, weights come from `store`; an empty store
    /// falls back to random weights, unreadable contents abort.
    pub fn new(config: RunConfig, store: W, reporter: R) -> Result<Self> {
        config.validate()?;
        info!(
            "running {} episodes (load weights: {}, seed: {})",
            config.episode_limit, config.load_weights, config.seed
        );

        let mut rng = StdRng::seed_from_u64(config.seed);
        let stored = if config.load_weights { store.load()? } else { None };
        let model = match stored {
            Some(weights) => LinearQModel::new(weights, config.learning_rate, config.gamma)?,
            None => {
                if config.load_weights {
                    warn!("no stored weights, starting from random weights");
                }
                LinearQModel::random(&mut rng, config.learning_rate, config.gamma)
            }
        };

        Ok(EpisodeScheduler {
            plan: EpisodePlan::from(&config),
            counters: EpisodeCounters::new(),
            phase: Phase::Training,
            roster: Roster::default(),
            pending: PendingAssignment::new(),
            model,
            policy: EpsilonGreedy::new(config.exploration(), rng),
            extractor: FeatureExtractor::new(config.player),
            trigger: TriggerDetector::new(config.player),
            reward: RewardFunction::new(config.reward.clone(), config.player, config.enemy),
            store,
            reporter,
            reported: false,
            config,
        })
    }

    /// Start an episode on its first turn
    pub fn begin_episode<S, H>(&mut self, state: &S, history: &H) -> EpisodeStart
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        if self.phase != Phase::Finished {
            self.phase = self.counters.begin_episode(&self.plan);
        }
        if self.phase == Phase::Finished {
            info!("{} episodes completed, stopping", self.plan.episode_limit);
            return EpisodeStart::LimitReached(self.finish());
        }

        self.policy.begin_episode(self.counters.training_episodes);
        self.roster = Roster::from_state(state, self.config.player, self.config.enemy);
        self.pending.clear();
        info!(
            "episode start: {:?} (training {}, evaluation {}, epsilon {:.5})",
            self.phase,
            self.counters.training_episodes,
            self.counters.evaluation_episodes,
            self.policy.epsilon()
        );

        EpisodeStart::Running(self.step(state, history))
    }

    /// Handle one turn; returns no commands when nothing warrants re-planning
    pub fn step<S, H>(&mut self, state: &S, history: &H) -> Vec<AttackCommand>
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        if self.phase == Phase::Finished {
            return Vec::new();
        }
        let Some(reason) = self.trigger.detect(state, history) else {
            return Vec::new();
        };
        debug!("turn {}: re-planning on {}", state.turn_number(), reason);

        if let Some(last) = state.last_turn() {
            self.roster.apply_deaths(history.death_events(last));
        }
        let candidates: Vec<UnitId> = self.roster.enemy().iter().copied().collect();

        if self.phase == Phase::Training && self.counters.training_episodes > 1 {
            self.learn(state, history, &candidates);
        }
        self.decide(state, history, &candidates)
    }

    /// Close an episode on its terminal turn.
    ///
    /// Returns the run summary if this episode completed the final report.
    pub fn end_episode<S, H>(&mut self, state: &S, history: &H) -> Option<RunSummary>
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        if self.phase != Phase::Evaluating {
            return None;
        }

        if let Some(last) = state.last_turn() {
            self.roster.apply_deaths(history.death_events(last));
            for &unit in self.roster.friendly() {
                let reward = self.reward.reward(history, last, unit);
                self.counters.record_evaluation_reward(reward);
            }
        }

        let result = self.counters.close_block(&self.plan)?;
        info!(
            "evaluation block {} mean reward {:.2}",
            self.counters.block_means.len(),
            result.mean
        );
        if result.is_best {
            match self.store.save(self.model.weights()) {
                Ok(()) => info!("checkpointed weights {:?}", self.model.weights().to_vec()),
                Err(e) => error!("failed to checkpoint weights: {}", e),
            }
        }

        if self.counters.training_episodes >= self.plan.episode_limit && !self.reported {
            return Some(self.finish());
        }
        None
    }

    /// One TD candidate per friendly unit with a pending decision, averaged
    fn learn<S, H>(&mut self, state: &S, history: &H, candidates: &[UnitId])
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        let Some(last) = state.last_turn() else {
            return;
        };
        let ctx = DecisionContext {
            state,
            history,
            roster: &self.roster,
            extractor: &self.extractor,
            model: &self.model,
        };
        let proposals: Vec<Array1<f64>> = self
            .roster
            .friendly()
            .iter()
            .filter_map(|unit| {
                let previous = self.pending.get(unit)?;
                let reward = self.reward.reward(history, last, *unit);
                let next_max_q = ctx.max_q(*unit, candidates).unwrap_or(0.0);
                Some(self.model.candidate(&previous.features, reward, next_max_q))
            })
            .collect();

        self.model.apply(&proposals);
    }

    fn decide<S, H>(&mut self, state: &S, history: &H, candidates: &[UnitId]) -> Vec<AttackCommand>
    where
        S: StateView + ?Sized,
        H: HistoryView + ?Sized,
    {
        let mut pending = PendingAssignment::new();
        let mut commands = Vec::new();
        let mode = match self.phase {
            Phase::Evaluating => PolicyMode::Evaluate,
            _ => PolicyMode::Train,
        };

        if !candidates.is_empty() {
            let ctx = DecisionContext {
                state,
                history,
                roster: &self.roster,
                extractor: &self.extractor,
                model: &self.model,
            };
            for &unit in self.roster.friendly() {
                match self.policy.select(&ctx, unit, candidates, mode) {
                    Ok(decision) => {
                        commands.push(AttackCommand {
                            attacker: unit,
                            target: decision.target,
                        });
                        pending.insert(unit, decision);
                    }
                    Err(e) => warn!("no target for unit {}: {}", unit, e),
                }
            }
        }

        self.pending = pending;
        commands
    }

    /// Build the summary, emitting the report the first time only
    fn finish(&mut self) -> RunSummary {
        let summary = RunSummary::from_block_means(
            &self.counters.block_means,
            self.plan.evaluation_interval,
            self.counters.training_episodes.min(self.plan.episode_limit),
        );
        if !self.reported {
            if let Err(e) = self.reporter.report(&summary) {
                error!("failed to write report: {}", e);
            }
            self.reported = true;
        }
        summary
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn counters(&self) -> &EpisodeCounters {
        &self.counters
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn pending(&self) -> &PendingAssignment {
        &self.pending
    }

    pub fn model(&self) -> &LinearQModel {
        &self.model
    }

    pub fn epsilon(&self) -> f64 {
        self.policy.epsilon()
    }

    pub fn store(&self) -> &W {
        &self.store
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}
