//! Scoring, experience and the player profile.

pub mod calculator;
pub mod profile;

pub use calculator::{experience, experience_required_for_level, level_multiplier, market_value, points};
pub use profile::{PlayerProfile, ProfileSummary, ProfileUpdate};
