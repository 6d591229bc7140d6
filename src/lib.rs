//! Angler - Fishing Encounter Engine
//!
//! A single cast-to-capture cycle as an explicit state machine over virtual
//! time: cast, wait for a bite, fight the fish by keeping line tension
//! below the breaking point until its stamina runs out.
//!
//! The engine never renders and never persists. A host calls the action
//! methods on [`Encounter`], advances time, and reads events or snapshots.
//!
//! ```no_run
//! use std::time::Duration;
//! use angler::{Encounter, EngineConfig, FishCatalog};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut encounter = Encounter::new(
//!     EngineConfig::default(),
//!     FishCatalog::default(),
//!     ChaCha8Rng::seed_from_u64(7),
//! )
//! .unwrap();
//! encounter.cast();
//! for event in encounter.advance(Duration::from_secs(5)) {
//!     println!("{:?}", event);
//! }
//! ```

pub mod core;
pub mod fishing;
pub mod ledger;
pub mod progression;

pub use crate::core::{ConfigError, Difficulty, EngineConfig};
pub use fishing::{
    CaptureOutcome, Encounter, EncounterEvent, EncounterPhase, EncounterSnapshot, EscapeReason,
    FishCatalog, FishInstance, FishRarity, FishSpecies,
};
pub use ledger::{CaptureLedger, CaptureRecord, LedgerStats, RecordFlags};
pub use progression::{PlayerProfile, ProfileSummary};
