//! Reward arithmetic. Pure functions of their arguments.

use crate::core::config::ProgressionConfig;
use crate::core::constants::{MARKET_VALUE_PER_KG, MARKET_VALUE_POINT_SHARE};
use crate::fishing::types::FishInstance;

/// Score multiplier for a player level: +10% per level above 1.
pub fn level_multiplier(level: u32, config: &ProgressionConfig) -> f64 {
    1.0 + level.saturating_sub(1) as f64 * config.level_point_bonus
}

/// Points for landing `fish` after a fight of `fight_seconds`.
///
/// `floor((base × rarity + time + weight + length) × level)`, where each
/// bonus is floored on its own. Never less than the species' base points.
pub fn points(fish: &FishInstance, fight_seconds: f64, level: u32, config: &ProgressionConfig) -> u32 {
    let base = fish.species.base_points as f64;
    let rarity_points = base * fish.rarity().point_multiplier();

    let time_bonus = (fight_seconds.max(0.0) * config.time_point_multiplier * rarity_points).floor();
    let weight_bonus = (fish.weight_kg * config.weight_point_multiplier).floor();
    let length_bonus = (fish.length_cm * config.length_point_multiplier).floor();

    let total = ((rarity_points + time_bonus + weight_bonus + length_bonus)
        * level_multiplier(level, config))
    .floor();

    (total as u32).max(fish.species.base_points)
}

/// Experience for landing `fish`.
pub fn experience(fish: &FishInstance, fight_seconds: f64, config: &ProgressionConfig) -> u64 {
    let difficulty_bonus = fish.species.difficulty as f64 * config.xp_per_difficulty;
    let time_bonus = (fight_seconds.max(0.0) * config.xp_per_fight_second).floor();

    ((config.base_capture_xp + difficulty_bonus + time_bonus) * fish.rarity().xp_multiplier()).floor()
        as u64
}

/// XP needed to clear `level`. Exponential in the level.
pub fn experience_required_for_level(level: u32, config: &ProgressionConfig) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (config.base_xp_per_level * config.level_growth.powi(exponent)).floor() as u64
}

/// Sale value of a fish in coins.
pub fn market_value(fish: &FishInstance) -> u32 {
    let base = fish.species.base_points as f64 * MARKET_VALUE_POINT_SHARE;
    let weight = fish.weight_kg * MARKET_VALUE_PER_KG;
    ((base + weight) * fish.rarity().market_multiplier()).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fishing::catalog::FishCatalog;

    fn fish(species_id: &str, weight_kg: f64, length_cm: f64) -> FishInstance {
        let species = FishCatalog::default().get(species_id).unwrap().clone();
        FishInstance {
            species,
            weight_kg,
            length_cm,
            stamina: 20.0,
            struggle_force: 1.5,
        }
    }

    #[test]
    fn test_points_common_level_one() {
        let config = ProgressionConfig::default();
        // bocachico: 150 base, common
        let caught = fish("bocachico", 1.5, 30.0);
        // 150 + floor(10 × 0.1 × 150) + floor(15) + floor(60) = 375
        assert_eq!(points(&caught, 10.0, 1, &config), 375);
    }

    #[test]
    fn test_points_rarity_and_level() {
        let config = ProgressionConfig::default();
        // pavon: 1500 base, epic ×2.5 → 3750
        let caught = fish("pavon", 4.0, 50.0);
        // (3750 + 0 + 40 + 100) × 1.2 = 4668
        assert_eq!(points(&caught, 0.0, 3, &config), 4668);
    }

    #[test]
    fn test_points_never_below_base() {
        let config = ProgressionConfig {
            time_point_multiplier: 0.0,
            weight_point_multiplier: 0.0,
            length_point_multiplier: 0.0,
            level_point_bonus: 0.0,
            ..Default::default()
        };
        let catalog = FishCatalog::default();
        for species in catalog.species() {
            let caught = FishInstance {
                species: species.clone(),
                weight_kg: species.weight.min,
                length_cm: species.length.min,
                stamina: 1.0,
                struggle_force: 1.0,
            };
            for seconds in [0.0, 0.5, 30.0] {
                for level in [1, 2, 20] {
                    assert!(points(&caught, seconds, level, &config) >= species.base_points);
                    assert!(
                        points(&caught, seconds, level, &ProgressionConfig::default())
                            >= species.base_points
                    );
                }
            }
        }
    }

    #[test]
    fn test_negative_duration_treated_as_zero() {
        let config = ProgressionConfig::default();
        let caught = fish("nicuro", 2.0, 40.0);
        assert_eq!(
            points(&caught, -5.0, 1, &config),
            points(&caught, 0.0, 1, &config)
        );
        assert_eq!(experience(&caught, -5.0, &config), experience(&caught, 0.0, &config));
    }

    #[test]
    fn test_experience_formula() {
        let config = ProgressionConfig::default();
        // sabaleta: difficulty 3, common. 10 + 15 + floor(12.7) = 37
        assert_eq!(experience(&fish("sabaleta", 1.0, 30.0), 12.7, &config), 37);
        // arapaima: difficulty 9, legendary ×4. (10 + 45 + 20) × 4 = 300
        assert_eq!(experience(&fish("arapaima", 50.0, 200.0), 20.0, &config), 300);
    }

    #[test]
    fn test_experience_required_curve() {
        let config = ProgressionConfig::default();
        assert_eq!(experience_required_for_level(1, &config), 100);
        assert_eq!(experience_required_for_level(2, &config), 120);
        assert_eq!(experience_required_for_level(3, &config), 144);

        let mut previous = 0;
        for level in 1..30 {
            let required = experience_required_for_level(level, &config);
            assert!(required > previous, "curve flattened at level {level}");
            previous = required;
        }
    }

    #[test]
    fn test_market_value() {
        // bocachico: (75 + 15) × 1
        assert_eq!(market_value(&fish("bocachico", 1.5, 30.0)), 90);
        // bagre: (450 + 100) × 2
        assert_eq!(market_value(&fish("bagre", 10.0, 100.0)), 1100);
    }
}
