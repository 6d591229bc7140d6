//! Engine configuration.
//!
//! Every tunable lives here with the defaults from [`crate::core::constants`].
//! All structs are `#[serde(default)]`, so a JSON file only needs to name the
//! values it overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::constants::*;
use crate::fishing::types::FishRarity;

/// Errors raised when configuration invariants are violated or a config
/// file cannot be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[error("bite delay minimum {min}ms exceeds maximum {max}ms")]
    BiteDelayRange { min: u64, max: u64 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must not be negative (got {value:.2})")]
    Negative { field: &'static str, value: f64 },
    #[error("level growth factor must be greater than 1 (got {0:.2})")]
    LevelGrowth(f64),
    #[error("rarity weights must sum to a positive value")]
    EmptyRarityTable,
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tension and stamina tuning for the fight phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightTuning {
    /// Chance per tick that the fish struggles.
    pub struggle_probability: f64,
    pub base_tension_increment: f64,
    /// Upper bound of the uniform jitter added to the base increment.
    pub tension_jitter: f64,
    /// Scales every struggle increment (difficulty presets).
    pub tension_multiplier: f64,
    /// Stamina lost every tick regardless of input.
    pub fatigue_per_tick: f64,
    pub reel_reduction: f64,
    pub slack_reduction: f64,
    /// When set, `give_slack` only works at or above this tension.
    pub slack_min_tension: Option<f64>,
    pub initial_tension: f64,
    pub stamina_per_difficulty: f64,
    pub min_struggle_force: f64,
}

impl Default for FightTuning {
    fn default() -> Self {
        Self {
            struggle_probability: STRUGGLE_PROBABILITY,
            base_tension_increment: BASE_TENSION_INCREMENT,
            tension_jitter: TENSION_JITTER,
            tension_multiplier: 1.0,
            fatigue_per_tick: FATIGUE_PER_TICK,
            reel_reduction: REEL_TENSION_REDUCTION,
            slack_reduction: SLACK_TENSION_REDUCTION,
            slack_min_tension: None,
            initial_tension: INITIAL_FIGHT_TENSION,
            stamina_per_difficulty: STAMINA_PER_DIFFICULTY,
            min_struggle_force: MIN_STRUGGLE_FORCE,
        }
    }
}

/// Rarity draw weights and the per-level bonus for the non-common tiers.
///
/// Common absorbs whatever the other tiers do not claim, so the table always
/// sums to one once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityTable {
    pub rare: f64,
    pub epic: f64,
    pub legendary: f64,
    pub rare_level_bonus: f64,
    pub epic_level_bonus: f64,
    pub legendary_level_bonus: f64,
    /// Level at which the bonus is fully applied.
    pub full_bonus_level: u32,
}

impl Default for RarityTable {
    fn default() -> Self {
        Self {
            rare: 0.25,
            epic: 0.12,
            legendary: 0.03,
            rare_level_bonus: 0.05,
            epic_level_bonus: 0.03,
            legendary_level_bonus: 0.02,
            full_bonus_level: RARITY_BONUS_FULL_LEVEL,
        }
    }
}

impl RarityTable {
    /// Probability of each tier at `level`, indexed by `FishRarity as usize`.
    ///
    /// Level 1 gets no bonus; the bonus grows linearly until
    /// `full_bonus_level` and stays flat afterwards.
    pub fn probabilities(&self, level: u32) -> [f64; 4] {
        let span = self.full_bonus_level.max(1) as f64;
        let factor = (level.saturating_sub(1) as f64 / (span - 1.0).max(1.0)).min(1.0);

        let rare = self.rare + self.rare_level_bonus * factor;
        let epic = self.epic + self.epic_level_bonus * factor;
        let legendary = self.legendary + self.legendary_level_bonus * factor;
        let common = (1.0 - rare - epic - legendary).max(0.0);

        let total = common + rare + epic + legendary;
        if total <= 0.0 {
            return [1.0, 0.0, 0.0, 0.0];
        }
        [
            common / total,
            rare / total,
            epic / total,
            legendary / total,
        ]
    }

    pub fn probability(&self, rarity: FishRarity, level: u32) -> f64 {
        self.probabilities(level)[rarity as usize]
    }
}

/// Scoring and leveling constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub base_xp_per_level: f64,
    pub level_growth: f64,
    pub base_capture_xp: f64,
    pub xp_per_difficulty: f64,
    pub xp_per_fight_second: f64,
    pub time_point_multiplier: f64,
    pub weight_point_multiplier: f64,
    pub length_point_multiplier: f64,
    pub level_point_bonus: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_xp_per_level: XP_PER_LEVEL_BASE,
            level_growth: XP_LEVEL_GROWTH,
            base_capture_xp: BASE_CAPTURE_XP,
            xp_per_difficulty: XP_PER_DIFFICULTY,
            xp_per_fight_second: XP_PER_FIGHT_SECOND,
            time_point_multiplier: TIME_POINT_MULTIPLIER,
            weight_point_multiplier: WEIGHT_POINT_MULTIPLIER,
            length_point_multiplier: LENGTH_POINT_MULTIPLIER,
            level_point_bonus: LEVEL_POINT_BONUS,
        }
    }
}

/// Difficulty presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Expert,
        Difficulty::Master,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Expert => "Expert",
            Difficulty::Master => "Master",
        }
    }

    /// Scale applied to every struggle increment.
    pub fn tension_multiplier(&self) -> f64 {
        match self {
            Difficulty::Beginner => 0.7,
            Difficulty::Intermediate => 1.0,
            Difficulty::Expert => 1.3,
            Difficulty::Master => 1.5,
        }
    }

    /// Offset added to both bite delay bounds, in milliseconds.
    pub fn bite_delay_offset_ms(&self) -> i64 {
        match self {
            Difficulty::Beginner => 2000,
            Difficulty::Intermediate => 0,
            Difficulty::Expert => -1000,
            Difficulty::Master => -2000,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tick_interval_ms: u64,
    pub cast_duration_ms: u64,
    pub bite_delay_min_ms: u64,
    pub bite_delay_max_ms: u64,
    pub capture_display_ms: u64,
    pub escape_display_ms: u64,
    /// Fights longer than this end in an escape. `None` disables the limit.
    pub fight_time_limit_ms: Option<u64>,
    pub fight: FightTuning,
    pub rarity: RarityTable,
    pub progression: ProgressionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            cast_duration_ms: CAST_DURATION_MS,
            bite_delay_min_ms: BITE_DELAY_MIN_MS,
            bite_delay_max_ms: BITE_DELAY_MAX_MS,
            capture_display_ms: CAPTURE_DISPLAY_MS,
            escape_display_ms: ESCAPE_DISPLAY_MS,
            fight_time_limit_ms: None,
            fight: FightTuning::default(),
            rarity: RarityTable::default(),
            progression: ProgressionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Returns a copy adjusted for `difficulty`.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.fight.tension_multiplier = difficulty.tension_multiplier();

        let offset = difficulty.bite_delay_offset_ms();
        let shift = |value: u64| -> u64 {
            (value as i64 + offset).max(MIN_BITE_DELAY_FLOOR_MS as i64) as u64
        };
        self.bite_delay_min_ms = shift(self.bite_delay_min_ms);
        self.bite_delay_max_ms = shift(self.bite_delay_max_ms).max(self.bite_delay_min_ms);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn cast_duration(&self) -> Duration {
        Duration::from_millis(self.cast_duration_ms)
    }

    pub fn capture_display(&self) -> Duration {
        Duration::from_millis(self.capture_display_ms)
    }

    pub fn escape_display(&self) -> Duration {
        Duration::from_millis(self.escape_display_ms)
    }

    pub fn fight_time_limit(&self) -> Option<Duration> {
        self.fight_time_limit_ms.map(Duration::from_millis)
    }

    /// Checks every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "tick_interval_ms",
            });
        }
        if self.bite_delay_min_ms > self.bite_delay_max_ms {
            return Err(ConfigError::BiteDelayRange {
                min: self.bite_delay_min_ms,
                max: self.bite_delay_max_ms,
            });
        }
        if self.fight_time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroDuration {
                field: "fight_time_limit_ms",
            });
        }

        let fight = &self.fight;
        check_range("struggle_probability", fight.struggle_probability, 0.0, 1.0)?;
        check_range("initial_tension", fight.initial_tension, TENSION_MIN, TENSION_MAX)?;
        if let Some(gate) = fight.slack_min_tension {
            check_range("slack_min_tension", gate, TENSION_MIN, TENSION_MAX)?;
        }
        for (field, value) in [
            ("base_tension_increment", fight.base_tension_increment),
            ("tension_jitter", fight.tension_jitter),
            ("tension_multiplier", fight.tension_multiplier),
            ("fatigue_per_tick", fight.fatigue_per_tick),
            ("reel_reduction", fight.reel_reduction),
            ("slack_reduction", fight.slack_reduction),
            ("stamina_per_difficulty", fight.stamina_per_difficulty),
            ("min_struggle_force", fight.min_struggle_force),
        ] {
            check_non_negative(field, value)?;
        }

        let rarity = &self.rarity;
        for (field, value) in [
            ("rarity.rare", rarity.rare),
            ("rarity.epic", rarity.epic),
            ("rarity.legendary", rarity.legendary),
            ("rarity.rare_level_bonus", rarity.rare_level_bonus),
            ("rarity.epic_level_bonus", rarity.epic_level_bonus),
            ("rarity.legendary_level_bonus", rarity.legendary_level_bonus),
        ] {
            check_non_negative(field, value)?;
        }
        if rarity.probabilities(1).iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::EmptyRarityTable);
        }

        let progression = &self.progression;
        if progression.level_growth <= 1.0 {
            return Err(ConfigError::LevelGrowth(progression.level_growth));
        }
        if progression.base_xp_per_level < 1.0 {
            return Err(ConfigError::RangeViolation {
                field: "base_xp_per_level",
                min: 1.0,
                max: f64::MAX,
                value: progression.base_xp_per_level,
            });
        }
        for (field, value) in [
            ("base_capture_xp", progression.base_capture_xp),
            ("xp_per_difficulty", progression.xp_per_difficulty),
            ("xp_per_fight_second", progression.xp_per_fight_second),
            ("time_point_multiplier", progression.time_point_multiplier),
            ("weight_point_multiplier", progression.weight_point_multiplier),
            ("length_point_multiplier", progression.length_point_multiplier),
            ("level_point_bonus", progression.level_point_bonus),
        ] {
            check_non_negative(field, value)?;
        }

        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_level_one_rarity_table_matches_base_weights() {
        let probs = RarityTable::default().probabilities(1);
        assert!((probs[0] - 0.60).abs() < 1e-9);
        assert!((probs[1] - 0.25).abs() < 1e-9);
        assert!((probs[2] - 0.12).abs() < 1e-9);
        assert!((probs[3] - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_rarity_bonus_is_bounded() {
        let table = RarityTable::default();
        let at_cap = table.probabilities(10);
        let far_beyond = table.probabilities(500);

        assert_eq!(at_cap, far_beyond);
        assert!((at_cap[0] - 0.50).abs() < 1e-9);
        assert!((at_cap[1] - 0.30).abs() < 1e-9);
        assert!((at_cap[2] - 0.15).abs() < 1e-9);
        assert!((at_cap[3] - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_legendary_chance_grows_with_level() {
        let table = RarityTable::default();
        let mut previous = 0.0;
        for level in 1..=12 {
            let chance = table.probability(FishRarity::Legendary, level);
            assert!(chance >= previous, "legendary odds dropped at level {level}");
            previous = chance;
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "tick_interval_ms": 50, "fight": { "slack_min_tension": 50.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.fight.slack_min_tension, Some(50.0));
        assert_eq!(config.fight.reel_reduction, REEL_TENSION_REDUCTION);
        assert_eq!(config.cast_duration_ms, CAST_DURATION_MS);
    }

    #[test]
    fn test_rejects_inverted_bite_window() {
        let config = EngineConfig {
            bite_delay_min_ms: 2000,
            bite_delay_max_ms: 1000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BiteDelayRange { min: 2000, max: 1000 })
        ));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut config = EngineConfig::default();
        config.fight.struggle_probability = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RangeViolation {
                field: "struggle_probability",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_flat_level_curve() {
        let mut config = EngineConfig::default();
        config.progression.level_growth = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::LevelGrowth(_))));
    }

    #[test]
    fn test_rejects_zero_tick() {
        let config = EngineConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDuration { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_difficulty_presets() {
        let beginner = EngineConfig::default().with_difficulty(Difficulty::Beginner);
        assert_eq!(beginner.fight.tension_multiplier, 0.7);
        assert_eq!(beginner.bite_delay_min_ms, BITE_DELAY_MIN_MS + 2000);
        assert_eq!(beginner.bite_delay_max_ms, BITE_DELAY_MAX_MS + 2000);

        let master = EngineConfig::default().with_difficulty(Difficulty::Master);
        assert_eq!(master.fight.tension_multiplier, 1.5);
        assert_eq!(master.bite_delay_min_ms, MIN_BITE_DELAY_FLOOR_MS);
        assert!(master.bite_delay_max_ms >= master.bite_delay_min_ms);
        assert!(master.validate().is_ok());
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("expert"), Some(Difficulty::Expert));
        assert_eq!(Difficulty::parse("MASTER"), Some(Difficulty::Master));
        assert_eq!(Difficulty::parse("godlike"), None);
    }
}
