//! Engine plumbing: constants, configuration and the virtual-time scheduler.

pub mod config;
pub mod constants;
pub mod scheduler;

pub use config::{ConfigError, Difficulty, EngineConfig, FightTuning, ProgressionConfig, RarityTable};
pub use scheduler::{FiredTimer, Scheduler, TimerHandle};
