//! What the encounter tells the outside world.

use std::time::Duration;

use serde::Serialize;

use super::types::{EncounterPhase, EscapeReason, FishInstance, LurePosition, TensionBand};
use crate::ledger::CaptureRecord;
use crate::progression::{ProfileSummary, ProfileUpdate};

/// Result of landing a fish.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureOutcome {
    /// Includes points, experience, market value and record flags.
    pub record: CaptureRecord,
    pub update: ProfileUpdate,
}

/// A single event produced by the encounter.
///
/// Presentation-facing text travels in `message` fields.
#[derive(Debug, Clone, PartialEq)]
pub enum EncounterEvent {
    PhaseChanged {
        from: EncounterPhase,
        to: EncounterPhase,
    },

    /// The lure settled and the wait for a bite began.
    LureSettled { bite_in: Duration, message: String },

    /// Waiting was cancelled by reeling in an empty line.
    LineRetrieved { message: String },

    /// A fish took the lure; the fight starts.
    FishHooked { fish: FishInstance, message: String },

    /// Tension or stamina moved (tick, reel or slack).
    FightUpdated {
        tension: f64,
        stamina: f64,
        elapsed: Duration,
    },

    /// Emitted once per landed fish, after rewards were applied.
    Captured {
        outcome: Box<CaptureOutcome>,
        message: String,
    },

    /// Emitted once per lost fish.
    Escaped {
        reason: EscapeReason,
        fish: FishInstance,
        message: String,
    },

    /// The profile changed; the host may persist it.
    ProfileUpdated { summary: ProfileSummary },

    Paused,
    Resumed,
    Reset,
}

/// Read model pushed to observers alongside every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterSnapshot {
    pub phase: EncounterPhase,
    /// Phase a paused encounter resumes into.
    pub resume_phase: Option<EncounterPhase>,
    pub tension: f64,
    pub band: TensionBand,
    pub critical: bool,
    /// Live stamina of the hooked fish.
    pub stamina: Option<f64>,
    pub fight_elapsed: Duration,
    pub fish: Option<FishInstance>,
    pub lure: LurePosition,
    pub profile: ProfileSummary,
    pub can_cast: bool,
    pub can_reel: bool,
    pub can_slack: bool,
    pub can_pause: bool,
    pub last_capture: Option<CaptureOutcome>,
    pub last_escape: Option<EscapeReason>,
}
