//! External-sampling Monte Carlo CFR with negative-regret pruning and
//! linear discounting, computing a blueprint strategy for multiplayer
//! no-limit hold'em.
//!
//! - [`counter::Counter`] — the regret (`i32`) / average-strategy (`f32`)
//!   counter abstraction backing [`storage::StrategyStorage`].
//! - [`storage::StrategyStorage`] — concurrent, append-only per-history
//!   strategy counters.
//! - [`config::TrainerConfig`] — schedule, table-stakes, and action-menu
//!   parameters for one training run.
//! - [`snapshot::Snapshot`] — serialisable training-state checkpoint.
//! - [`trainer::BlueprintTrainer`] — the solver itself.

mod config;
mod counter;
mod snapshot;
mod storage;
mod trainer;

pub use config::TrainerConfig;
pub use counter::{AtomicF32, Counter};
pub use snapshot::Snapshot;
pub use storage::{n_clusters_for_round, StorageDto, StrategyStorage};
pub use trainer::BlueprintTrainer;
