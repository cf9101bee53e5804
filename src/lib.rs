//! # Vanguard - Online Target Selection by Linear Q-Learning
//!
//! Vanguard is the decision-and-learning core of a squad controller for a
//! turn-based battle simulation. Each friendly unit picks one enemy to attack;
//! the choice is scored by a linear Q-function over five hand-built features
//! and learned online with semi-gradient TD(0) updates.
//!
//! The host simulation stays in charge of the world. Vanguard reads it through
//! the [`simulation::StateView`] and [`simulation::HistoryView`] traits and
//! answers with [`types::AttackCommand`]s.
//!
//! ## Key Features
//!
//! - **Features**: distance, hit-point share, focus fire and retaliation
//! - **Learning**: per-unit TD candidates averaged into one max-normalized weight vector
//! - **Exploration**: epsilon-greedy with per-episode exponential decay
//! - **Scheduling**: training episodes interleaved with evaluation blocks
//! - **Checkpoints**: best-so-far weights saved through a pluggable [`model::WeightStore`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vanguard::config::RunConfig;
//! use vanguard::model::TextWeightStore;
//! use vanguard::scheduler::{EpisodeScheduler, EpisodeStart, TableReport};
//! use vanguard::simulation::{EventLog, Snapshot};
//!
//! let config = RunConfig::default();
//! let store = TextWeightStore::new(config.weights_path.clone());
//! let mut scheduler = EpisodeScheduler::new(config, store, TableReport::stdout()).unwrap();
//!
//! let state = Snapshot::new(0).with_unit(1, 0, 0, 0, 10).with_unit(2, 1, 1, 0, 10);
//! let history = EventLog::new();
//! if let EpisodeStart::Running(commands) = scheduler.begin_episode(&state, &history) {
//!     assert_eq!(commands.len(), 1);
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Run configuration and its builder
//! - [`error`] - Error types and result handling
//! - [`features`] - Feature vectors for (attacker, target) pairs
//! - [`model`] - Linear Q-function, TD update and weight persistence
//! - [`policy`] - Epsilon-greedy target selection and exploration schedules
//! - [`reward`] - Per-unit reward for an elapsed turn
//! - [`roster`] - Liveness sets for both sides
//! - [`scheduler`] - Episode state machine and host-facing control loop
//! - [`simulation`] - Views the host provides, plus in-memory implementations
//! - [`trigger`] - Re-planning trigger detection
//! - [`types`] - Ids, events and commands

pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod policy;
pub mod reward;
pub mod roster;
pub mod scheduler;
pub mod simulation;
pub mod trigger;
pub mod types;

pub use error::{Result, VanguardError};

#[cfg(test)]
mod tests;
