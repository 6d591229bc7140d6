//! Fishing system: species catalog, fish generation, the fight simulation
//! and the encounter state machine that drives them.

pub mod catalog;
pub mod encounter;
pub mod events;
pub mod generation;
pub mod tension;
pub mod types;

pub use catalog::{CatalogError, FishCatalog};
pub use encounter::{Encounter, EncounterTimer, SubscriptionId};
pub use events::{CaptureOutcome, EncounterEvent, EncounterSnapshot};
pub use generation::{draw_fish, generate_fish, pick_species, roll_bite_delay, roll_fish_rarity};
pub use tension::{slack_allowed, FightState, FightStatus};
pub use types::*;
