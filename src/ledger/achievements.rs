//! Angling achievements.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::records::CaptureLedger;
use crate::fishing::catalog::FishCatalog;

/// Unique identifier for each achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    FirstCatch,         // 1 capture
    MasterAngler,       // 100 captures
    CompleteCollection, // every catalog species
}

/// Static definition of an achievement.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    /// Added to the player's score once, on unlock.
    pub bonus_score: u64,
}

pub const ALL_ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: AchievementId::FirstCatch,
        name: "First Catch",
        description: "Land your first fish",
        bonus_score: 100,
    },
    AchievementDef {
        id: AchievementId::MasterAngler,
        name: "Master Angler",
        description: "Land 100 fish",
        bonus_score: 1000,
    },
    AchievementDef {
        id: AchievementId::CompleteCollection,
        name: "Complete Collection",
        description: "Land every species in the catalog",
        bonus_score: 2000,
    },
];

const MASTER_ANGLER_CAPTURES: usize = 100;

impl AchievementId {
    pub fn def(&self) -> &'static AchievementDef {
        // Table order matches variant order.
        &ALL_ACHIEVEMENTS[*self as usize]
    }

    fn is_met(&self, ledger: &CaptureLedger, catalog: &FishCatalog) -> bool {
        match self {
            AchievementId::FirstCatch => !ledger.is_empty(),
            AchievementId::MasterAngler => ledger.len() >= MASTER_ANGLER_CAPTURES,
            AchievementId::CompleteCollection => {
                !catalog.is_empty()
                    && catalog
                        .species()
                        .iter()
                        .all(|species| ledger.has_caught(&species.id))
            }
        }
    }
}

/// Achievements met by `ledger` that are not in `unlocked` yet.
pub fn newly_unlocked(
    ledger: &CaptureLedger,
    catalog: &FishCatalog,
    unlocked: &BTreeSet<AchievementId>,
) -> Vec<AchievementId> {
    ALL_ACHIEVEMENTS
        .iter()
        .map(|def| def.id)
        .filter(|id| !unlocked.contains(id) && id.is_met(ledger, catalog))
        .collect()
}
