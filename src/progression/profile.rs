//! Player profile and the single apply-reward step.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::calculator::experience_required_for_level;
use crate::core::config::ProgressionConfig;
use crate::fishing::catalog::FishCatalog;
use crate::ledger::{newly_unlocked, AchievementId, CaptureLedger, CaptureRecord};

/// Persistent player state. The engine hydrates from one and reports every
/// change so the host can persist it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub level: u32,
    /// Progress inside the current level.
    pub experience: u64,
    pub score: u64,
    #[serde(default)]
    pub ledger: CaptureLedger,
    #[serde(default)]
    pub achievements: BTreeSet<AchievementId>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            score: 0,
            ledger: CaptureLedger::new(),
            achievements: BTreeSet::new(),
        }
    }
}

/// What one capture did to the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub leveled_up: bool,
    pub level: u32,
    pub achievements: Vec<AchievementId>,
    /// Score from unlocked achievements, on top of the capture points.
    pub bonus_score: u64,
}

/// Read-only view for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub level: u32,
    pub experience: u64,
    pub experience_required: u64,
    pub score: u64,
    pub capture_count: usize,
}

impl PlayerProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a completed capture: score, experience, ledger and
    /// achievements.
    ///
    /// At most one level is gained per capture. Experience past the
    /// threshold carries into the next level.
    pub fn apply_capture(
        &mut self,
        record: CaptureRecord,
        catalog: &FishCatalog,
        config: &ProgressionConfig,
    ) -> ProfileUpdate {
        self.level = self.level.max(1);
        self.score += record.points as u64;
        self.experience += record.experience;

        let required = experience_required_for_level(self.level, config);
        let leveled_up = self.experience >= required;
        if leveled_up {
            self.experience -= required;
            self.level += 1;
            log::info!("Level up! Now level {}", self.level);
        }

        self.ledger.append(record);

        let unlocked = newly_unlocked(&self.ledger, catalog, &self.achievements);
        let mut bonus_score = 0;
        for id in &unlocked {
            let def = id.def();
            bonus_score += def.bonus_score;
            log::info!("Achievement unlocked: {} (+{})", def.name, def.bonus_score);
        }
        self.score += bonus_score;
        self.achievements.extend(unlocked.iter().copied());

        ProfileUpdate {
            leveled_up,
            level: self.level,
            achievements: unlocked,
            bonus_score,
        }
    }

    pub fn experience_required(&self, config: &ProgressionConfig) -> u64 {
        experience_required_for_level(self.level, config)
    }

    pub fn summary(&self, config: &ProgressionConfig) -> ProfileSummary {
        ProfileSummary {
            level: self.level,
            experience: self.experience,
            experience_required: self.experience_required(config),
            score: self.score,
            capture_count: self.ledger.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RecordFlags;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn record(species_id: &str, points: u32, experience: u64) -> CaptureRecord {
        CaptureRecord {
            id: Uuid::nil(),
            species_id: species_id.to_string(),
            species_name: species_id.to_string(),
            rarity: crate::fishing::types::FishRarity::Common,
            weight_kg: 1.0,
            length_cm: 30.0,
            fight_seconds: 10.0,
            points,
            experience,
            market_value: 10,
            caught_at: DateTime::<Utc>::default(),
            flags: RecordFlags::all(),
        }
    }

    #[test]
    fn test_level_up_carries_remainder() {
        let config = ProgressionConfig {
            base_xp_per_level: 15.0,
            ..Default::default()
        };
        let catalog = FishCatalog::default();
        let mut profile = PlayerProfile::new();

        let update = profile.apply_capture(record("bocachico", 200, 20), &catalog, &config);

        assert!(update.leveled_up);
        assert_eq!(profile.level, 2);
        assert_eq!(profile.experience, 5);
    }

    #[test]
    fn test_single_level_per_capture_keeps_overflow() {
        let config = ProgressionConfig {
            base_xp_per_level: 10.0,
            ..Default::default()
        };
        let catalog = FishCatalog::default();
        let mut profile = PlayerProfile::new();

        profile.apply_capture(record("bocachico", 150, 100), &catalog, &config);
        assert_eq!(profile.level, 2);
        assert_eq!(profile.experience, 90);

        // Next capture levels again from the carried XP.
        profile.apply_capture(record("bocachico", 150, 0), &catalog, &config);
        assert_eq!(profile.level, 3);
        assert_eq!(profile.experience, 78);
    }

    #[test]
    fn test_no_level_up_below_threshold() {
        let config = ProgressionConfig::default();
        let catalog = FishCatalog::default();
        let mut profile = PlayerProfile::new();

        let update = profile.apply_capture(record("bocachico", 150, 40), &catalog, &config);
        assert!(!update.leveled_up);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.experience, 40);
    }

    #[test]
    fn test_first_catch_bonus_added_once() {
        let config = ProgressionConfig::default();
        let catalog = FishCatalog::default();
        let mut profile = PlayerProfile::new();

        let first = profile.apply_capture(record("bocachico", 150, 10), &catalog, &config);
        assert_eq!(first.achievements, vec![AchievementId::FirstCatch]);
        assert_eq!(first.bonus_score, 100);
        assert_eq!(profile.score, 250);

        let second = profile.apply_capture(record("bocachico", 150, 10), &catalog, &config);
        assert!(second.achievements.is_empty());
        assert_eq!(profile.score, 400);
    }

    #[test]
    fn test_summary() {
        let config = ProgressionConfig::default();
        let catalog = FishCatalog::default();
        let mut profile = PlayerProfile::new();
        profile.apply_capture(record("sabalo", 400, 30), &catalog, &config);

        let summary = profile.summary(&config);
        assert_eq!(summary.level, 1);
        assert_eq!(summary.experience, 30);
        assert_eq!(summary.experience_required, 100);
        assert_eq!(summary.score, 500);
        assert_eq!(summary.capture_count, 1);
    }

    #[test]
    fn test_profile_round_trips_through_json() {
        let config = ProgressionConfig::default();
        let catalog = FishCatalog::default();
        let mut profile = PlayerProfile::new();
        profile.apply_capture(record("nicuro", 300, 25), &catalog, &config);

        let json = serde_json::to_string(&profile).unwrap();
        let restored: PlayerProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, profile);
    }
}
