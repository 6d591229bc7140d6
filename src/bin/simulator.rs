//! Angler Headless Encounter Simulator
//!
//! Plays fishing encounters against the virtual clock with a scripted
//! player, collecting capture/escape metrics for balance analysis. Uses the
//! same `Encounter` state machine a real front end drives.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --casts N          Encounters per run (default: 100)
//!   --runs N           Number of runs with incrementing seeds (default: 1)
//!   --seed N           RNG seed (default: 42)
//!   --level N          Starting player level (default: 1)
//!   --policy NAME      reel | idle | alternate | smart (default: smart)
//!   --difficulty NAME  beginner | intermediate | expert | master
//!   --config FILE      JSON engine config
//!   --time-limit SECS  Fight time limit
//!   --verbose          Per-event logging
//!   --quiet            Only final summary line
//!
//! Set `RUST_LOG=debug` for engine-level tracing.

use angler::core::{Difficulty, EngineConfig};
use angler::fishing::{Encounter, EncounterEvent, EncounterPhase, EscapeReason, FishCatalog, FishRarity};
use angler::progression::PlayerProfile;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Duration;

// ── CLI Configuration ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    /// Reel on every tick.
    Reel,
    /// Never act.
    Idle,
    /// Reel and give slack on alternating ticks.
    Alternate,
    /// Reel when tension climbs, slack in the middle band.
    Smart,
}

impl Policy {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "reel" => Some(Policy::Reel),
            "idle" => Some(Policy::Idle),
            "alternate" => Some(Policy::Alternate),
            "smart" => Some(Policy::Smart),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Policy::Reel => "reel",
            Policy::Idle => "idle",
            Policy::Alternate => "alternate",
            Policy::Smart => "smart",
        }
    }
}

struct SimConfig {
    casts: u32,
    runs: u32,
    seed: u64,
    level: u32,
    policy: Policy,
    difficulty: Option<Difficulty>,
    config_path: Option<PathBuf>,
    time_limit_secs: Option<u64>,
    verbose: bool,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            casts: 100,
            runs: 1,
            seed: 42,
            level: 1,
            policy: Policy::Smart,
            difficulty: None,
            config_path: None,
            time_limit_secs: None,
            verbose: false,
            quiet: false,
        }
    }
}

fn parse_args() -> SimConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--casts" => {
                i += 1;
                config.casts = args[i].parse().expect("--casts requires a number");
            }
            "--runs" => {
                i += 1;
                config.runs = args[i].parse().expect("--runs requires a number");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("--seed requires a number");
            }
            "--level" => {
                i += 1;
                config.level = args[i].parse().expect("--level requires a number");
            }
            "--policy" => {
                i += 1;
                config.policy = Policy::parse(&args[i])
                    .expect("--policy must be one of reel, idle, alternate, smart");
            }
            "--difficulty" => {
                i += 1;
                config.difficulty = Some(
                    Difficulty::parse(&args[i])
                        .expect("--difficulty must be beginner, intermediate, expert or master"),
                );
            }
            "--config" => {
                i += 1;
                config.config_path = Some(PathBuf::from(&args[i]));
            }
            "--time-limit" => {
                i += 1;
                config.time_limit_secs =
                    Some(args[i].parse().expect("--time-limit requires a number"));
            }
            "--verbose" => config.verbose = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    config
}

fn print_usage() {
    eprintln!(
        "Angler Headless Encounter Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --casts N          Encounters per run (default: 100)\n\
         \x20 --runs N           Number of runs with incrementing seeds (default: 1)\n\
         \x20 --seed N           RNG seed (default: 42)\n\
         \x20 --level N          Starting player level (default: 1)\n\
         \x20 --policy NAME      reel | idle | alternate | smart (default: smart)\n\
         \x20 --difficulty NAME  beginner | intermediate | expert | master\n\
         \x20 --config FILE      JSON engine config\n\
         \x20 --time-limit SECS  Fight time limit\n\
         \x20 --verbose          Per-event logging\n\
         \x20 --quiet            Only final summary line\n\
         \x20 --help, -h         Show this help"
    );
}

fn build_engine_config(sim: &SimConfig) -> EngineConfig {
    let mut config = match &sim.config_path {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };
    if let Some(difficulty) = sim.difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(secs) = sim.time_limit_secs {
        config.fight_time_limit_ms = Some(secs * 1000);
    }
    config
}

// ── Simulation Statistics ────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct SimStats {
    casts: u64,
    captures: u64,
    escapes_tension: u64,
    escapes_time: u64,
    total_capture_secs: f64,
    total_points: u64,
    total_xp: u64,
    total_market_value: u64,
    records_set: u64,
    level_ups: u64,
    achievements_unlocked: u64,
    captures_by_rarity: [u64; 4],
    virtual_time: Duration,
    // Final state snapshot
    final_level: u32,
    final_score: u64,
    final_species: usize,
}

impl SimStats {
    fn process_events(&mut self, events: &[EncounterEvent]) {
        for event in events {
            match event {
                EncounterEvent::Captured { outcome, .. } => {
                    let record = &outcome.record;
                    self.captures += 1;
                    self.total_capture_secs += record.fight_seconds;
                    self.total_points += record.points as u64;
                    self.total_xp += record.experience;
                    self.total_market_value += record.market_value as u64;
                    self.captures_by_rarity[record.rarity as usize] += 1;
                    if record.flags.any() && !record.flags.first_of_species {
                        self.records_set += 1;
                    }
                    if outcome.update.leveled_up {
                        self.level_ups += 1;
                    }
                    self.achievements_unlocked += outcome.update.achievements.len() as u64;
                }
                EncounterEvent::Escaped { reason, .. } => match reason {
                    EscapeReason::TensionMax => self.escapes_tension += 1,
                    EscapeReason::TimeLimit => self.escapes_time += 1,
                },
                _ => {}
            }
        }
    }

    fn escapes(&self) -> u64 {
        self.escapes_tension + self.escapes_time
    }

    fn capture_rate(&self) -> f64 {
        let fights = self.captures + self.escapes();
        if fights == 0 {
            0.0
        } else {
            self.captures as f64 / fights as f64 * 100.0
        }
    }

    fn avg_capture_secs(&self) -> f64 {
        if self.captures == 0 {
            0.0
        } else {
            self.total_capture_secs / self.captures as f64
        }
    }

    fn finalize(&mut self, profile: &PlayerProfile, virtual_time: Duration) {
        self.final_level = profile.level;
        self.final_score = profile.score;
        self.final_species = profile.ledger.species_caught();
        self.virtual_time = virtual_time;
    }
}

// ── Core Simulation Loop ─────────────────────────────────────────────

/// Upper bound on steps per encounter so a misconfigured run cannot spin.
const MAX_STEPS_PER_CAST: u32 = 100_000;

fn act(encounter: &mut Encounter<ChaCha8Rng>, policy: Policy, tick: u32) {
    if encounter.phase() != EncounterPhase::Fighting {
        return;
    }
    match policy {
        Policy::Reel => encounter.reel_in(),
        Policy::Idle => {}
        Policy::Alternate => {
            if tick % 2 == 0 {
                encounter.reel_in();
            } else {
                encounter.give_slack();
            }
        }
        Policy::Smart => {
            let tension = encounter.tension();
            if tension >= 40.0 {
                encounter.reel_in();
            } else if tension >= 25.0 && encounter.can_slack() {
                encounter.give_slack();
            }
        }
    }
}

fn run_simulation(sim: &SimConfig, engine: &EngineConfig, seed: u64) -> SimStats {
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let profile = PlayerProfile {
        level: sim.level.max(1),
        ..PlayerProfile::default()
    };
    let mut encounter = match Encounter::new(engine.clone(), FishCatalog::default(), rng) {
        Ok(encounter) => encounter.with_profile(profile),
        Err(e) => {
            eprintln!("Invalid engine config: {e}");
            std::process::exit(1);
        }
    };

    let step = engine.tick_interval();
    let mut stats = SimStats::default();

    for _ in 0..sim.casts {
        encounter.cast();
        stats.casts += 1;

        let mut finished = false;
        for tick in 0..MAX_STEPS_PER_CAST {
            let events = encounter.advance(step);
            stats.process_events(&events);
            if sim.verbose {
                print_events(encounter.now(), &events);
            }

            finished |= events.iter().any(|e| {
                matches!(
                    e,
                    EncounterEvent::Captured { .. } | EncounterEvent::Escaped { .. }
                )
            });
            if finished && encounter.phase() == EncounterPhase::Idle {
                break;
            }
            act(&mut encounter, sim.policy, tick);
        }

        if encounter.phase() != EncounterPhase::Idle {
            log::warn!("encounter stuck in {} phase, resetting", encounter.phase().name());
            encounter.reset();
            encounter.take_events();
        }
    }

    stats.finalize(encounter.profile(), encounter.now());
    stats
}

// ── Verbose Output ───────────────────────────────────────────────────

fn print_events(now: Duration, events: &[EncounterEvent]) {
    for event in events {
        let label = match event {
            EncounterEvent::LureSettled { bite_in, .. } => {
                format!("Lure settled (bite in {:.1}s)", bite_in.as_secs_f64())
            }
            EncounterEvent::FishHooked { fish, .. } => format!(
                "Hooked {} ({}, {:.1} kg, stamina {:.1})",
                fish.species.name,
                fish.rarity().name(),
                fish.weight_kg,
                fish.stamina
            ),
            EncounterEvent::Captured { outcome, message } => format!(
                "{message} +{} pts, +{} XP in {:.1}s",
                outcome.record.points, outcome.record.experience, outcome.record.fight_seconds
            ),
            EncounterEvent::Escaped { reason, fish, .. } => {
                format!("{} escaped ({})", fish.species.name, reason.code())
            }
            EncounterEvent::ProfileUpdated { summary } => format!(
                "Profile: L{} {}/{} XP, score {}",
                summary.level, summary.experience, summary.experience_required, summary.score
            ),
            _ => continue,
        };
        println!("[t={:>8.1}s] {label}", now.as_secs_f64());
    }
}

// ── Report Output ────────────────────────────────────────────────────

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

fn print_summary(stats: &SimStats, seed: u64, sim: &SimConfig) {
    if sim.quiet {
        println!(
            "seed={seed} casts={} captures={} escapes={} rate={:.1}% level={} score={}",
            stats.casts,
            stats.captures,
            stats.escapes(),
            stats.capture_rate(),
            stats.final_level,
            stats.final_score,
        );
        return;
    }

    println!("============================================================");
    println!("  Angler Simulation Report  (seed={seed})");
    println!("============================================================");
    println!();

    println!(
        "Casts: {}  |  Policy: {}  |  Virtual time: {}",
        stats.casts,
        sim.policy.name(),
        format_duration(stats.virtual_time)
    );
    println!();

    println!("--- Fights ---");
    println!(
        "Captures: {}  |  Escapes: {}  |  Capture rate: {:.1}%",
        stats.captures,
        stats.escapes(),
        stats.capture_rate()
    );
    println!(
        "Line snapped: {}  |  Time limit: {}",
        stats.escapes_tension, stats.escapes_time
    );
    println!("Avg fight to capture: {:.1}s", stats.avg_capture_secs());
    println!();

    println!("--- Rewards ---");
    println!(
        "Points: {}  |  XP: {}  |  Market value: {}",
        stats.total_points, stats.total_xp, stats.total_market_value
    );
    println!(
        "Records broken: {}  |  Level ups: {}  |  Achievements: {}",
        stats.records_set, stats.level_ups, stats.achievements_unlocked
    );
    println!();

    println!("--- Catches by Rarity ---");
    for rarity in FishRarity::ALL {
        let count = stats.captures_by_rarity[rarity as usize];
        if count > 0 {
            println!("  {}: {count}", rarity.name());
        }
    }
    println!();

    println!("--- Final State ---");
    println!(
        "Level: {}  |  Score: {}  |  Species caught: {}",
        stats.final_level, stats.final_score, stats.final_species
    );
    println!();
}

fn print_multi_run_summary(all_stats: &[SimStats]) {
    let n = all_stats.len() as f64;
    println!("============================================================");
    println!("  Aggregate Results ({} runs)", all_stats.len());
    println!("============================================================");
    println!();

    let avg = |vals: &[f64]| -> f64 { vals.iter().sum::<f64>() / n };
    let min_max = |vals: &[f64]| -> (f64, f64) {
        vals.iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            })
    };

    let rows: [(&str, Vec<f64>); 6] = [
        (
            "Capture Rate %",
            all_stats.iter().map(|s| s.capture_rate()).collect(),
        ),
        (
            "Captures",
            all_stats.iter().map(|s| s.captures as f64).collect(),
        ),
        (
            "Avg Fight (s)",
            all_stats.iter().map(|s| s.avg_capture_secs()).collect(),
        ),
        (
            "Points",
            all_stats.iter().map(|s| s.total_points as f64).collect(),
        ),
        (
            "Final Level",
            all_stats.iter().map(|s| s.final_level as f64).collect(),
        ),
        (
            "Species Caught",
            all_stats.iter().map(|s| s.final_species as f64).collect(),
        ),
    ];

    println!("{:<20} {:>10} {:>10} {:>10}", "Metric", "Min", "Avg", "Max");
    println!("{}", "-".repeat(52));
    for (name, vals) in &rows {
        let (lo, hi) = min_max(vals);
        println!("{:<20} {:>10.1} {:>10.1} {:>10.1}", name, lo, avg(vals), hi);
    }
    println!();
}

// ── Main ─────────────────────────────────────────────────────────────

fn main() {
    env_logger::init();
    let sim = parse_args();
    let engine = build_engine_config(&sim);

    if !sim.quiet {
        eprintln!(
            "Angler Simulator: {} cast(s) x {} run(s), seed={}, level={}, policy={}, difficulty={}",
            sim.casts,
            sim.runs,
            sim.seed,
            sim.level,
            sim.policy.name(),
            sim.difficulty.map_or("custom", |d| d.name()),
        );
    }

    let mut all_stats = Vec::with_capacity(sim.runs as usize);

    for run in 0..sim.runs {
        let seed = sim.seed + run as u64;

        if !sim.quiet && sim.runs > 1 {
            eprintln!("--- Run {}/{} (seed={seed}) ---", run + 1, sim.runs);
        }

        let stats = run_simulation(&sim, &engine, seed);

        if sim.runs == 1 {
            print_summary(&stats, seed, &sim);
        } else if !sim.quiet {
            println!(
                "  Run {}: captures={} escapes={} rate={:.1}% L{} score={}",
                run + 1,
                stats.captures,
                stats.escapes(),
                stats.capture_rate(),
                stats.final_level,
                stats.final_score,
            );
        }

        all_stats.push(stats);
    }

    if sim.runs > 1 {
        println!();
        print_multi_run_summary(&all_stats);
    }
}
