//! Capture history, personal bests and aggregate statistics.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fishing::types::{FishInstance, FishRarity};

/// Which personal records a capture set.
///
/// A species' first capture sets every flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFlags {
    pub first_of_species: bool,
    pub heaviest: bool,
    pub longest: bool,
    pub fastest: bool,
}

impl RecordFlags {
    pub fn all() -> Self {
        Self {
            first_of_species: true,
            heaviest: true,
            longest: true,
            fastest: true,
        }
    }

    pub fn any(&self) -> bool {
        self.first_of_species || self.heaviest || self.longest || self.fastest
    }
}

/// Immutable snapshot of a completed capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    pub id: Uuid,
    pub species_id: String,
    pub species_name: String,
    pub rarity: FishRarity,
    pub weight_kg: f64,
    pub length_cm: f64,
    pub fight_seconds: f64,
    pub points: u32,
    pub experience: u64,
    pub market_value: u32,
    pub caught_at: DateTime<Utc>,
    pub flags: RecordFlags,
}

/// Best values for one species.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub count: u32,
    pub heaviest_kg: f64,
    pub longest_cm: f64,
    pub fastest_seconds: f64,
}

impl PersonalBest {
    fn first(record: &CaptureRecord) -> Self {
        Self {
            count: 1,
            heaviest_kg: record.weight_kg,
            longest_cm: record.length_cm,
            fastest_seconds: record.fight_seconds,
        }
    }

    fn absorb(&mut self, record: &CaptureRecord) {
        self.count += 1;
        self.heaviest_kg = self.heaviest_kg.max(record.weight_kg);
        self.longest_cm = self.longest_cm.max(record.length_cm);
        self.fastest_seconds = self.fastest_seconds.min(record.fight_seconds);
    }

    fn flags_for(&self, weight_kg: f64, length_cm: f64, fight_seconds: f64) -> RecordFlags {
        RecordFlags {
            first_of_species: false,
            heaviest: weight_kg > self.heaviest_kg,
            longest: length_cm > self.longest_cm,
            fastest: fight_seconds < self.fastest_seconds,
        }
    }
}

/// Compares a fresh catch against prior captures of the same species.
///
/// Other species never count: a 90 kg arapaima is not a record for a
/// bocachico.
pub fn is_new_record(fish: &FishInstance, fight_seconds: f64, history: &[CaptureRecord]) -> RecordFlags {
    let best = history
        .iter()
        .filter(|record| record.species_id == fish.species_id())
        .fold(None, |best: Option<PersonalBest>, record| match best {
            None => Some(PersonalBest::first(record)),
            Some(mut best) => {
                best.absorb(record);
                Some(best)
            }
        });

    match best {
        None => RecordFlags::all(),
        Some(best) => best.flags_for(fish.weight_kg, fish.length_cm, fight_seconds),
    }
}

/// Append-only capture history with per-species bests kept in step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CaptureRecord>", into = "Vec<CaptureRecord>")]
pub struct CaptureLedger {
    records: Vec<CaptureRecord>,
    bests: HashMap<String, PersonalBest>,
}

impl From<Vec<CaptureRecord>> for CaptureLedger {
    fn from(records: Vec<CaptureRecord>) -> Self {
        let mut ledger = CaptureLedger::new();
        for record in records {
            ledger.append(record);
        }
        ledger
    }
}

impl From<CaptureLedger> for Vec<CaptureRecord> {
    fn from(ledger: CaptureLedger) -> Self {
        ledger.records
    }
}

impl CaptureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CaptureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&CaptureRecord> {
        self.records.last()
    }

    pub fn best_for(&self, species_id: &str) -> Option<&PersonalBest> {
        self.bests.get(species_id)
    }

    pub fn has_caught(&self, species_id: &str) -> bool {
        self.bests.contains_key(species_id)
    }

    /// Distinct species caught so far.
    pub fn species_caught(&self) -> usize {
        self.bests.len()
    }

    /// Same answer as [`is_new_record`] over this history, from the cached
    /// bests.
    pub fn is_new_record(&self, fish: &FishInstance, fight_seconds: f64) -> RecordFlags {
        match self.bests.get(fish.species_id()) {
            None => RecordFlags::all(),
            Some(best) => best.flags_for(fish.weight_kg, fish.length_cm, fight_seconds),
        }
    }

    pub fn append(&mut self, record: CaptureRecord) {
        self.bests
            .entry(record.species_id.clone())
            .and_modify(|best| best.absorb(&record))
            .or_insert_with(|| PersonalBest::first(&record));
        self.records.push(record);
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats::from_records(&self.records)
    }
}

/// Aggregates over the whole history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerStats {
    pub total_captures: usize,
    pub total_weight_kg: f64,
    pub average_weight_kg: f64,
    pub average_fight_seconds: f64,
    pub distinct_species: usize,
    pub heaviest: Option<CaptureRecord>,
    pub lightest: Option<CaptureRecord>,
    /// Species id and count; ties go to the alphabetically first id.
    pub most_captured: Option<(String, usize)>,
    /// Capture counts indexed by `FishRarity as usize`.
    pub rarity_distribution: [usize; 4],
}

impl LedgerStats {
    pub fn from_records(records: &[CaptureRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total = records.len();
        let total_weight_kg: f64 = records.iter().map(|r| r.weight_kg).sum();
        let total_seconds: f64 = records.iter().map(|r| r.fight_seconds).sum();

        let mut per_species: BTreeMap<&str, usize> = BTreeMap::new();
        let mut rarity_distribution = [0usize; 4];
        for record in records {
            *per_species.entry(record.species_id.as_str()).or_insert(0) += 1;
            rarity_distribution[record.rarity as usize] += 1;
        }

        let mut most_captured: Option<(&str, usize)> = None;
        for (species, count) in &per_species {
            if most_captured.map_or(true, |(_, best)| *count > best) {
                most_captured = Some((*species, *count));
            }
        }

        let heaviest = records
            .iter()
            .max_by(|a, b| a.weight_kg.total_cmp(&b.weight_kg))
            .cloned();
        let lightest = records
            .iter()
            .min_by(|a, b| a.weight_kg.total_cmp(&b.weight_kg))
            .cloned();

        Self {
            total_captures: total,
            total_weight_kg,
            average_weight_kg: total_weight_kg / total as f64,
            average_fight_seconds: total_seconds / total as f64,
            distinct_species: per_species.len(),
            heaviest,
            lightest,
            most_captured: most_captured.map(|(id, count)| (id.to_string(), count)),
            rarity_distribution,
        }
    }
}
