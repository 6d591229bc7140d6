//! Line tension and fish stamina simulation.
//!
//! [`FightState`] is the numeric core of a fight. It knows nothing about
//! timers or phases: the encounter calls [`FightState::tick`] on every fight
//! tick and the reel/slack methods when the player acts.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::types::FishInstance;
use crate::core::config::FightTuning;
use crate::core::constants::{TENSION_MAX, TENSION_MIN};

/// Outcome of a single fight tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightStatus {
    /// The fight continues.
    Ongoing,
    /// Tension reached the maximum and the line broke.
    LineSnapped,
    /// The fish has no stamina left and can be landed.
    Exhausted,
}

/// Live tension/stamina pair for the hooked fish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FightState {
    pub tension: f64,
    pub stamina: f64,
    /// Ticks simulated so far.
    pub ticks: u32,
    /// Ticks in which the fish struggled.
    pub struggles: u32,
}

impl FightState {
    pub fn new(fish: &FishInstance, tuning: &FightTuning) -> Self {
        Self {
            tension: clamp_tension(tuning.initial_tension),
            stamina: fish.stamina.max(0.0),
            ticks: 0,
            struggles: 0,
        }
    }

    /// Advances one tick.
    ///
    /// Order: the fish may struggle (tension up), fatigue drains stamina,
    /// then the terminal checks run with a snapped line taking priority over
    /// an exhausted fish.
    pub fn tick(
        &mut self,
        fish: &FishInstance,
        tuning: &FightTuning,
        rng: &mut impl Rng,
    ) -> FightStatus {
        self.ticks += 1;

        if rng.gen_bool(tuning.struggle_probability.clamp(0.0, 1.0)) {
            let jitter = if tuning.tension_jitter > 0.0 {
                rng.gen_range(0.0..tuning.tension_jitter)
            } else {
                0.0
            };
            let increment = fish.struggle_force
                * (tuning.base_tension_increment + jitter)
                * tuning.tension_multiplier;
            self.tension = clamp_tension(self.tension + increment);
            self.struggles += 1;
        }

        self.stamina = (self.stamina - tuning.fatigue_per_tick).max(0.0);

        self.status()
    }

    /// Terminal status for the current values without advancing.
    pub fn status(&self) -> FightStatus {
        if self.tension >= TENSION_MAX {
            FightStatus::LineSnapped
        } else if self.stamina <= 0.0 {
            FightStatus::Exhausted
        } else {
            FightStatus::Ongoing
        }
    }

    /// Reels in: one discrete tension reduction. Stamina is untouched.
    pub fn reel_in(&mut self, tuning: &FightTuning) {
        self.tension = clamp_tension(self.tension - tuning.reel_reduction);
    }

    /// Gives slack: a smaller tension reduction, optionally gated by a
    /// minimum tension. Returns false if the gate rejected it.
    pub fn give_slack(&mut self, tuning: &FightTuning) -> bool {
        if !slack_allowed(self.tension, tuning) {
            return false;
        }
        self.tension = clamp_tension(self.tension - tuning.slack_reduction);
        true
    }

    /// Fraction of the starting stamina left, for gauges.
    pub fn stamina_fraction(&self, fish: &FishInstance) -> f64 {
        if fish.stamina <= 0.0 {
            0.0
        } else {
            (self.stamina / fish.stamina).clamp(0.0, 1.0)
        }
    }
}

/// Whether `give_slack` is available at `tension`.
pub fn slack_allowed(tension: f64, tuning: &FightTuning) -> bool {
    match tuning.slack_min_tension {
        Some(gate) => tension >= gate,
        None => true,
    }
}

fn clamp_tension(value: f64) -> f64 {
    if value.is_nan() {
        TENSION_MIN
    } else {
        value.clamp(TENSION_MIN, TENSION_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fishing::types::{FishRarity, FishSpecies, SizeRange};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    /// Common fish, difficulty 3, stamina 24.
    fn scenario_fish(struggle_force: f64) -> FishInstance {
        FishInstance {
            species: FishSpecies {
                id: "sabaleta".to_string(),
                name: "Sabaleta".to_string(),
                scientific_name: "Brycon henni".to_string(),
                rarity: FishRarity::Common,
                difficulty: 3,
                weight: SizeRange::new(0.5, 2.0),
                length: SizeRange::new(20.0, 40.0),
                base_points: 250,
                habitat: String::new(),
                description: String::new(),
                metadata: BTreeMap::new(),
            },
            weight_kg: 1.0,
            length_cm: 30.0,
            stamina: 24.0,
            struggle_force,
        }
    }

    #[test]
    fn test_new_fight_starts_with_small_tension() {
        let fish = scenario_fish(1.8);
        let fight = FightState::new(&fish, &FightTuning::default());
        assert!(fight.tension > 0.0 && fight.tension < 30.0);
        assert_eq!(fight.stamina, 24.0);
    }

    #[test]
    fn test_tension_and_stamina_stay_in_bounds() {
        let mut rng = create_test_rng();
        let tuning = FightTuning {
            struggle_probability: 1.0,
            ..Default::default()
        };
        let fish = scenario_fish(50.0);
        let mut fight = FightState::new(&fish, &tuning);

        for _ in 0..500 {
            fight.tick(&fish, &tuning, &mut rng);
            assert!(fight.tension >= 0.0 && fight.tension <= 100.0);
            assert!(fight.stamina >= 0.0);
        }
    }

    #[test]
    fn test_stamina_never_increases() {
        let mut rng = create_test_rng();
        let tuning = FightTuning::default();
        let fish = scenario_fish(1.8);
        let mut fight = FightState::new(&fish, &tuning);

        let mut previous = fight.stamina;
        for step in 0..200 {
            if step % 3 == 0 {
                fight.give_slack(&tuning);
            } else {
                fight.reel_in(&tuning);
            }
            fight.tick(&fish, &tuning, &mut rng);
            assert!(fight.stamina <= previous);
            previous = fight.stamina;
        }
    }

    #[test]
    fn test_stamina_fraction_tracks_fatigue() {
        let mut rng = create_test_rng();
        let tuning = FightTuning {
            struggle_probability: 0.0,
            fatigue_per_tick: 6.0,
            ..Default::default()
        };
        let fish = scenario_fish(1.8);
        let mut fight = FightState::new(&fish, &tuning);
        assert_eq!(fight.stamina_fraction(&fish), 1.0);

        fight.tick(&fish, &tuning, &mut rng);
        assert!((fight.stamina_fraction(&fish) - 0.75).abs() < 1e-9);

        for _ in 0..10 {
            fight.tick(&fish, &tuning, &mut rng);
        }
        assert_eq!(fight.stamina_fraction(&fish), 0.0);

        let spent = FishInstance {
            stamina: 0.0,
            ..scenario_fish(1.8)
        };
        assert_eq!(fight.stamina_fraction(&spent), 0.0);
    }

    #[test]
    fn test_reeling_every_tick_lands_the_fish() {
        let tuning = FightTuning::default();
        let fish = scenario_fish(1.8);

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut fight = FightState::new(&fish, &tuning);
            let status = loop {
                let status = fight.tick(&fish, &tuning, &mut rng);
                if status != FightStatus::Ongoing {
                    break status;
                }
                fight.reel_in(&tuning);
            };
            assert_eq!(status, FightStatus::Exhausted, "seed {seed}");
            // 24 stamina at 0.15 per tick
            assert!((160..=161).contains(&fight.ticks), "seed {seed}");
        }
    }

    #[test]
    fn test_idle_player_loses_the_fish() {
        let tuning = FightTuning::default();
        let fish = scenario_fish(1.8);

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut fight = FightState::new(&fish, &tuning);
            let status = loop {
                let status = fight.tick(&fish, &tuning, &mut rng);
                if status != FightStatus::Ongoing {
                    break status;
                }
            };
            assert_eq!(status, FightStatus::LineSnapped, "seed {seed}");
            assert!(fight.stamina > 0.0, "seed {seed}");
        }
    }

    #[test]
    fn test_weakest_fish_tires_without_player_action() {
        // Minimum force and stamina of a difficulty-1 fish: even a struggle
        // on every tick cannot reach the breaking point first.
        let tuning = FightTuning::default();
        let fish = FishInstance {
            stamina: 6.4,
            ..scenario_fish(tuning.min_struggle_force)
        };

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut fight = FightState::new(&fish, &tuning);
            let status = loop {
                let status = fight.tick(&fish, &tuning, &mut rng);
                if status != FightStatus::Ongoing {
                    break status;
                }
            };
            assert_eq!(status, FightStatus::Exhausted, "seed {seed}");
            assert!(fight.tension < 100.0);
        }
    }

    #[test]
    fn test_snap_beats_exhaustion_on_same_tick() {
        let mut rng = create_test_rng();
        let tuning = FightTuning {
            struggle_probability: 1.0,
            fatigue_per_tick: 1.0,
            ..Default::default()
        };
        let mut fish = scenario_fish(1000.0);
        fish.stamina = 1.0;
        let mut fight = FightState::new(&fish, &tuning);

        assert_eq!(fight.tick(&fish, &tuning, &mut rng), FightStatus::LineSnapped);
        assert_eq!(fight.stamina, 0.0);
    }

    #[test]
    fn test_reel_in_clamps_at_zero() {
        let tuning = FightTuning::default();
        let fish = scenario_fish(1.8);
        let mut fight = FightState::new(&fish, &tuning);

        fight.reel_in(&tuning);
        fight.reel_in(&tuning);
        assert_eq!(fight.tension, 0.0);
    }

    #[test]
    fn test_slack_is_smaller_than_reel() {
        let tuning = FightTuning::default();
        let fish = scenario_fish(1.8);

        let mut reeled = FightState::new(&fish, &tuning);
        reeled.tension = 60.0;
        reeled.reel_in(&tuning);

        let mut slacked = FightState::new(&fish, &tuning);
        slacked.tension = 60.0;
        assert!(slacked.give_slack(&tuning));

        assert!(slacked.tension > reeled.tension);
    }

    #[test]
    fn test_gated_slack_needs_tension() {
        let tuning = FightTuning {
            slack_min_tension: Some(50.0),
            slack_reduction: 25.0,
            ..Default::default()
        };
        let fish = scenario_fish(1.8);
        let mut fight = FightState::new(&fish, &tuning);

        fight.tension = 40.0;
        assert!(!fight.give_slack(&tuning));
        assert_eq!(fight.tension, 40.0);

        fight.tension = 70.0;
        assert!(fight.give_slack(&tuning));
        assert_eq!(fight.tension, 45.0);
    }

    #[test]
    fn test_tension_multiplier_scales_struggle() {
        let fish = scenario_fish(2.0);
        let base = FightTuning {
            struggle_probability: 1.0,
            tension_jitter: 0.0,
            initial_tension: 0.0,
            ..Default::default()
        };
        let doubled = FightTuning {
            tension_multiplier: 2.0,
            ..base.clone()
        };

        let mut rng = create_test_rng();
        let mut normal = FightState::new(&fish, &base);
        normal.tick(&fish, &base, &mut rng);
        let mut hard = FightState::new(&fish, &doubled);
        hard.tick(&fish, &doubled, &mut rng);

        assert_eq!(normal.tension, 4.0);
        assert_eq!(hard.tension, 8.0);
    }
}
