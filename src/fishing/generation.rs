//! Fish generation.
//!
//! Handles rarity rolling, species selection and per-instance attribute
//! rolls. Every function takes the random source as an argument so a seeded
//! RNG reproduces a draw exactly.

use std::time::Duration;

use rand::Rng;

use super::catalog::FishCatalog;
use super::types::{FishInstance, FishRarity, FishSpecies};
use crate::core::config::{EngineConfig, FightTuning, RarityTable};
use crate::core::constants::{STAMINA_JITTER, STRUGGLE_FORCE_JITTER};

/// Rolls a rarity tier for a player of `level`.
///
/// The roll walks the cumulative table from the rarest tier down, the way
/// the drop tables elsewhere in the game do.
pub fn roll_fish_rarity(level: u32, table: &RarityTable, rng: &mut impl Rng) -> FishRarity {
    let chances = table.probabilities(level);
    let roll: f64 = rng.gen_range(0.0..1.0);

    let mut cumulative = 1.0;
    for rarity in FishRarity::ALL.iter().rev() {
        if *rarity == FishRarity::Common {
            break;
        }
        cumulative -= chances[*rarity as usize];
        if roll >= cumulative {
            return *rarity;
        }
    }

    FishRarity::Common
}

/// Picks a species of `rarity` uniformly, falling back to the common bucket
/// when the requested one is empty.
pub fn pick_species<'a>(
    catalog: &'a FishCatalog,
    rarity: FishRarity,
    rng: &mut impl Rng,
) -> &'a FishSpecies {
    let rarity = if catalog.count_by_rarity(rarity) > 0 {
        rarity
    } else {
        log::debug!(
            "no {} species in catalog, falling back to common",
            rarity.name()
        );
        FishRarity::Common
    };

    let count = catalog.count_by_rarity(rarity);
    let index = rng.gen_range(0..count);
    match catalog.nth_of_rarity(rarity, index) {
        Some(species) => species,
        // Catalog construction guarantees a non-empty common bucket.
        None => &catalog.species()[0],
    }
}

/// Rolls weight, length, stamina and struggle force for `species`.
///
/// - weight: uniform in range, rounded to 0.1 kg
/// - length: uniform in range, whole centimetres
/// - stamina: difficulty × stamina_per_difficulty × U[0.8, 1.2]
/// - struggle force: (difficulty × 0.5 + √weight × 0.3) × U[0.7, 1.3],
///   never below `min_struggle_force`
pub fn generate_fish(
    species: &FishSpecies,
    tuning: &FightTuning,
    rng: &mut impl Rng,
) -> FishInstance {
    let weight_kg = roll_in_range(species.weight.min, species.weight.max, rng);
    let weight_kg = ((weight_kg * 10.0).round() / 10.0).clamp(species.weight.min, species.weight.max);

    let length_cm = roll_in_range(species.length.min, species.length.max, rng)
        .floor()
        .clamp(species.length.min, species.length.max);

    let difficulty = species.difficulty as f64;
    let stamina = difficulty
        * tuning.stamina_per_difficulty
        * rng.gen_range(STAMINA_JITTER.0..=STAMINA_JITTER.1);

    let base_force = difficulty * 0.5 + weight_kg.sqrt() * 0.3;
    let struggle_force = (base_force
        * rng.gen_range(STRUGGLE_FORCE_JITTER.0..=STRUGGLE_FORCE_JITTER.1))
    .max(tuning.min_struggle_force);

    FishInstance {
        species: species.clone(),
        weight_kg,
        length_cm,
        stamina,
        struggle_force,
    }
}

/// Draws a complete fish for a player of `level`: rarity, then species,
/// then instance attributes.
pub fn draw_fish(
    catalog: &FishCatalog,
    level: u32,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> FishInstance {
    let rarity = roll_fish_rarity(level, &config.rarity, rng);
    let species = pick_species(catalog, rarity, rng);
    generate_fish(species, &config.fight, rng)
}

/// Returns a random bite delay within the configured window.
pub fn roll_bite_delay(config: &EngineConfig, rng: &mut impl Rng) -> Duration {
    let ms = rng.gen_range(config.bite_delay_min_ms..=config.bite_delay_max_ms);
    Duration::from_millis(ms)
}

fn roll_in_range(min: f64, max: f64, rng: &mut impl Rng) -> f64 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}
