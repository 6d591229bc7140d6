//! Fishing data structures: species templates, rolled fish and encounter
//! display state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::constants::{
    LURE_BOTTOM_Y, LURE_MAX_DEPTH, LURE_REEL_DEPTH, LURE_REEL_RISE, LURE_SLACK_DEPTH,
    LURE_SLACK_SINK, LURE_SURFACE_Y, LURE_X, TENSION_BAND_HIGH, TENSION_BAND_MEDIUM,
    TENSION_CRITICAL,
};

/// Rarity tiers for fish, driving both draw odds and reward multipliers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FishRarity {
    Common = 0,
    Rare = 1,
    Epic = 2,
    Legendary = 3,
}

impl FishRarity {
    /// All tiers, most common first.
    pub const ALL: [FishRarity; 4] = [
        FishRarity::Common,
        FishRarity::Rare,
        FishRarity::Epic,
        FishRarity::Legendary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FishRarity::Common => "Common",
            FishRarity::Rare => "Rare",
            FishRarity::Epic => "Epic",
            FishRarity::Legendary => "Legendary",
        }
    }

    /// Multiplier applied to a species' base points.
    pub fn point_multiplier(&self) -> f64 {
        match self {
            FishRarity::Common => 1.0,
            FishRarity::Rare => 1.5,
            FishRarity::Epic => 2.5,
            FishRarity::Legendary => 5.0,
        }
    }

    /// Multiplier applied to capture experience.
    pub fn xp_multiplier(&self) -> f64 {
        match self {
            FishRarity::Common => 1.0,
            FishRarity::Rare => 1.5,
            FishRarity::Epic => 2.5,
            FishRarity::Legendary => 4.0,
        }
    }

    /// Multiplier applied to a fish's market value.
    pub fn market_multiplier(&self) -> f64 {
        match self {
            FishRarity::Common => 1.0,
            FishRarity::Rare => 2.0,
            FishRarity::Epic => 4.0,
            FishRarity::Legendary => 8.0,
        }
    }
}

/// Inclusive numeric range for rolled size attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

impl SizeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Immutable catalog entry describing a species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishSpecies {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub rarity: FishRarity,
    /// 1 (docile) to 10 (monster).
    pub difficulty: u8,
    /// Kilograms.
    pub weight: SizeRange,
    /// Centimetres.
    pub length: SizeRange,
    pub base_points: u32,
    pub habitat: String,
    pub description: String,
    /// Presentation-only attributes (image path, colour, season). The engine
    /// never reads these.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// A hooked fish with its rolled attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishInstance {
    pub species: FishSpecies,
    pub weight_kg: f64,
    pub length_cm: f64,
    /// Starting stamina; the live value is tracked by the fight state.
    pub stamina: f64,
    pub struggle_force: f64,
}

impl FishInstance {
    pub fn species_id(&self) -> &str {
        &self.species.id
    }

    pub fn rarity(&self) -> FishRarity {
        self.species.rarity
    }
}

/// Phase of the cast-to-capture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterPhase {
    Idle,
    /// Lure is sinking.
    Casting,
    /// Lure settled, waiting for a bite.
    Waiting,
    /// A fish is hooked and fighting.
    Fighting,
    Paused,
    Captured,
    Escaped,
}

impl EncounterPhase {
    pub fn name(&self) -> &'static str {
        match self {
            EncounterPhase::Idle => "idle",
            EncounterPhase::Casting => "casting",
            EncounterPhase::Waiting => "waiting",
            EncounterPhase::Fighting => "fighting",
            EncounterPhase::Paused => "paused",
            EncounterPhase::Captured => "captured",
            EncounterPhase::Escaped => "escaped",
        }
    }

    /// Phases that auto-return to idle after a display delay.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EncounterPhase::Captured | EncounterPhase::Escaped)
    }

    /// Phases `toggle_pause` may suspend.
    pub fn is_pausable(&self) -> bool {
        matches!(
            self,
            EncounterPhase::Casting | EncounterPhase::Waiting | EncounterPhase::Fighting
        )
    }
}

/// Why a hooked fish got away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeReason {
    /// Tension hit the maximum and the line snapped.
    TensionMax,
    /// The fight outlasted the configured time limit.
    TimeLimit,
}

impl EscapeReason {
    pub fn code(&self) -> &'static str {
        match self {
            EscapeReason::TensionMax => "tension_max",
            EscapeReason::TimeLimit => "time_limit",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            EscapeReason::TensionMax => "The line snapped!",
            EscapeReason::TimeLimit => "The fish slipped away after a long fight.",
        }
    }
}

/// Coarse tension reading for gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensionBand {
    Low,
    Medium,
    High,
}

impl TensionBand {
    pub fn from_tension(tension: f64) -> Self {
        if tension < TENSION_BAND_MEDIUM {
            TensionBand::Low
        } else if tension < TENSION_BAND_HIGH {
            TensionBand::Medium
        } else {
            TensionBand::High
        }
    }
}

/// Whether `tension` is in the red zone.
pub fn is_tension_critical(tension: f64) -> bool {
    tension >= TENSION_CRITICAL
}

/// Lure position in display units: `x`/`y` in a 0-100 viewport and line
/// depth in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LurePosition {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

impl Default for LurePosition {
    fn default() -> Self {
        Self {
            x: LURE_X,
            y: LURE_SURFACE_Y,
            depth: 0.0,
        }
    }
}

impl LurePosition {
    /// Lure on the line at `depth` percent, sinking straight down.
    pub fn at_depth(depth: f64) -> Self {
        let depth = depth.clamp(0.0, LURE_MAX_DEPTH);
        Self {
            x: LURE_X,
            y: LURE_SURFACE_Y + depth / LURE_MAX_DEPTH * (LURE_BOTTOM_Y - LURE_SURFACE_Y),
            depth,
        }
    }

    /// Reeling pulls the lure up toward the surface.
    pub fn reel(&mut self) {
        self.depth = (self.depth - LURE_REEL_DEPTH).max(0.0);
        self.y = (self.y - LURE_REEL_RISE).max(LURE_SURFACE_Y);
    }

    /// Slack lets the lure drop.
    pub fn slack(&mut self) {
        self.depth = (self.depth + LURE_SLACK_DEPTH).min(LURE_MAX_DEPTH);
        self.y = (self.y + LURE_SLACK_SINK).min(LURE_BOTTOM_Y);
    }
}
