//! Capture ledger: history, personal records, statistics and achievements.

pub mod achievements;
pub mod records;

pub use achievements::{newly_unlocked, AchievementDef, AchievementId, ALL_ACHIEVEMENTS};
pub use records::{is_new_record, CaptureLedger, CaptureRecord, LedgerStats, PersonalBest, RecordFlags};
