//! Progression and ledger integration tests
//!
//! Tests the reward path a capture takes through the public API:
//! - Leveling with carried experience
//! - Personal records across a session
//! - Achievements unlocked by the ledger
//! - Profile persistence through JSON

use angler::core::{FightTuning, ProgressionConfig};
use angler::fishing::{generate_fish, FishCatalog, FishInstance};
use angler::ledger::{AchievementId, CaptureRecord, RecordFlags};
use angler::progression::{experience_required_for_level, PlayerProfile};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

fn create_test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(12345)
}

fn hooked(species_id: &str, weight_kg: f64, length_cm: f64) -> FishInstance {
    let catalog = FishCatalog::default();
    let species = catalog.get(species_id).unwrap();
    let mut fish = generate_fish(species, &FightTuning::default(), &mut create_test_rng());
    fish.weight_kg = weight_kg;
    fish.length_cm = length_cm;
    fish
}

fn record_for(
    profile: &PlayerProfile,
    fish: &FishInstance,
    fight_seconds: f64,
    experience: u64,
) -> CaptureRecord {
    CaptureRecord {
        id: Uuid::new_v4(),
        species_id: fish.species.id.clone(),
        species_name: fish.species.name.clone(),
        rarity: fish.rarity(),
        weight_kg: fish.weight_kg,
        length_cm: fish.length_cm,
        fight_seconds,
        points: 100,
        experience,
        market_value: 10,
        caught_at: DateTime::<Utc>::default(),
        flags: profile.ledger.is_new_record(fish, fight_seconds),
    }
}

// ============================================================================
// Leveling Tests
// ============================================================================

#[test]
fn test_level_up_carries_remainder() {
    let config = ProgressionConfig {
        base_xp_per_level: 15.0,
        ..Default::default()
    };
    let catalog = FishCatalog::default();
    let mut profile = PlayerProfile::new();
    let fish = hooked("bocachico", 1.0, 30.0);

    let record = record_for(&profile, &fish, 10.0, 20);
    let update = profile.apply_capture(record, &catalog, &config);

    assert!(update.leveled_up);
    assert_eq!(update.level, 2);
    assert_eq!(profile.level, 2);
    assert_eq!(profile.experience, 5);
    assert_eq!(profile.summary(&config).experience_required, 18);
}

#[test]
fn test_huge_gain_still_one_level() {
    let config = ProgressionConfig::default();
    let catalog = FishCatalog::default();
    let mut profile = PlayerProfile::new();
    let fish = hooked("bocachico", 1.0, 30.0);

    let record = record_for(&profile, &fish, 10.0, 10_000);
    let update = profile.apply_capture(record, &catalog, &config);

    assert!(update.leveled_up);
    assert_eq!(profile.level, 2);
    assert_eq!(profile.experience, 10_000 - experience_required_for_level(1, &config));
}

#[test]
fn test_no_level_below_threshold() {
    let config = ProgressionConfig::default();
    let catalog = FishCatalog::default();
    let mut profile = PlayerProfile::new();
    let fish = hooked("bocachico", 1.0, 30.0);

    let record = record_for(&profile, &fish, 10.0, 99);
    let update = profile.apply_capture(record, &catalog, &config);

    assert!(!update.leveled_up);
    assert_eq!(profile.level, 1);
    assert_eq!(profile.experience, 99);
}

// ============================================================================
// Personal Record Tests
// ============================================================================

#[test]
fn test_heavier_catch_sets_weight_record() {
    let config = ProgressionConfig::default();
    let catalog = FishCatalog::default();
    let mut profile = PlayerProfile::new();

    for weight in [2.0, 3.5, 1.0] {
        let fish = hooked("bocachico", weight, 30.0);
        let record = record_for(&profile, &fish, 20.0, 10);
        profile.apply_capture(record, &catalog, &config);
    }

    let heavier = hooked("bocachico", 5.0, 30.0);
    let flags = profile.ledger.is_new_record(&heavier, 20.0);
    assert!(flags.heaviest);
    assert!(!flags.first_of_species);
    assert!(!flags.longest);
    assert!(!flags.fastest);

    let tie = hooked("bocachico", 3.5, 30.0);
    assert!(!profile.ledger.is_new_record(&tie, 20.0).heaviest);
}

#[test]
fn test_records_are_per_species() {
    let config = ProgressionConfig::default();
    let catalog = FishCatalog::default();
    let mut profile = PlayerProfile::new();

    let big = hooked("bocachico", 3.0, 40.0);
    let record = record_for(&profile, &big, 20.0, 10);
    assert_eq!(record.flags, RecordFlags::all());
    profile.apply_capture(record, &catalog, &config);

    let other = hooked("nicuro", 0.5, 15.0);
    let flags = profile.ledger.is_new_record(&other, 60.0);
    assert_eq!(flags, RecordFlags::all());

    let best = profile.ledger.best_for("bocachico").unwrap();
    assert_eq!(best.count, 1);
    assert_eq!(best.heaviest_kg, 3.0);
}

// ============================================================================
// Achievement and Persistence Tests
// ============================================================================

#[test]
fn test_first_catch_unlocks_once() {
    let config = ProgressionConfig::default();
    let catalog = FishCatalog::default();
    let mut profile = PlayerProfile::new();

    let fish = hooked("bocachico", 1.0, 30.0);
    let first = profile.apply_capture(record_for(&profile, &fish, 10.0, 10), &catalog, &config);
    assert_eq!(first.achievements, vec![AchievementId::FirstCatch]);
    assert_eq!(profile.score, 100 + 100);

    let second = profile.apply_capture(record_for(&profile, &fish, 10.0, 10), &catalog, &config);
    assert!(second.achievements.is_empty());
    assert_eq!(second.bonus_score, 0);
    assert_eq!(profile.score, 300);
}

#[test]
fn test_profile_survives_json_round_trip() {
    let config = ProgressionConfig::default();
    let catalog = FishCatalog::default();
    let mut profile = PlayerProfile::new();
    for weight in [1.0, 2.5] {
        let fish = hooked("bocachico", weight, 30.0);
        let record = record_for(&profile, &fish, 15.0, 40);
        profile.apply_capture(record, &catalog, &config);
    }

    let json = serde_json::to_string(&profile).unwrap();
    let restored: PlayerProfile = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, profile);
    assert_eq!(restored.ledger.best_for("bocachico").unwrap().heaviest_kg, 2.5);
    assert!(restored.achievements.contains(&AchievementId::FirstCatch));

    let stats = restored.ledger.stats();
    assert_eq!(stats.total_captures, 2);
    assert!((stats.average_weight_kg - 1.75).abs() < 1e-9);
    assert_eq!(stats.most_captured, Some(("bocachico".to_string(), 2)));
}
