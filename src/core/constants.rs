// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 100;
pub const CAST_DURATION_MS: u64 = 2500;
pub const BITE_DELAY_MIN_MS: u64 = 500;
pub const BITE_DELAY_MAX_MS: u64 = 1500;
pub const CAPTURE_DISPLAY_MS: u64 = 5000;
pub const ESCAPE_DISPLAY_MS: u64 = 2000;
pub const MIN_BITE_DELAY_FLOOR_MS: u64 = 100;

// Line tension
pub const TENSION_MIN: f64 = 0.0;
pub const TENSION_MAX: f64 = 100.0;
pub const TENSION_CRITICAL: f64 = 85.0;
pub const TENSION_BAND_MEDIUM: f64 = 30.0;
pub const TENSION_BAND_HIGH: f64 = 60.0;
pub const INITIAL_FIGHT_TENSION: f64 = 5.0;
pub const REEL_TENSION_REDUCTION: f64 = 15.0;
pub const SLACK_TENSION_REDUCTION: f64 = 8.0;
pub const BASE_TENSION_INCREMENT: f64 = 2.0;
pub const TENSION_JITTER: f64 = 2.0;

// Fish fight
pub const STRUGGLE_PROBABILITY: f64 = 0.3;
pub const FATIGUE_PER_TICK: f64 = 0.15;
pub const STAMINA_PER_DIFFICULTY: f64 = 8.0;
pub const STAMINA_JITTER: (f64, f64) = (0.8, 1.2);
pub const STRUGGLE_FORCE_JITTER: (f64, f64) = (0.7, 1.3);
pub const MIN_STRUGGLE_FORCE: f64 = 0.5;

// Lure (display units)
pub const LURE_X: f64 = 50.0;
pub const LURE_SURFACE_Y: f64 = 20.0;
pub const LURE_BOTTOM_Y: f64 = 80.0;
pub const LURE_MAX_DEPTH: f64 = 100.0;
pub const LURE_REEL_DEPTH: f64 = 5.0;
pub const LURE_REEL_RISE: f64 = 2.0;
pub const LURE_SLACK_DEPTH: f64 = 10.0;
pub const LURE_SLACK_SINK: f64 = 3.0;

// XP and leveling
pub const XP_PER_LEVEL_BASE: f64 = 100.0;
pub const XP_LEVEL_GROWTH: f64 = 1.2;
pub const BASE_CAPTURE_XP: f64 = 10.0;
pub const XP_PER_DIFFICULTY: f64 = 5.0;
pub const XP_PER_FIGHT_SECOND: f64 = 1.0;

// Scoring
pub const TIME_POINT_MULTIPLIER: f64 = 0.1;
pub const WEIGHT_POINT_MULTIPLIER: f64 = 10.0;
pub const LENGTH_POINT_MULTIPLIER: f64 = 2.0;
pub const LEVEL_POINT_BONUS: f64 = 0.1;
pub const MARKET_VALUE_POINT_SHARE: f64 = 0.5;
pub const MARKET_VALUE_PER_KG: f64 = 10.0;

// Rarity roll: level bonus reaches its cap at this level
pub const RARITY_BONUS_FULL_LEVEL: u32 = 10;
