//! Core type aliases, constants, and runtime plumbing for the blueprint
//! trainer workspace.
#![allow(dead_code)]

mod error;
pub use error::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Chip amounts: stack sizes, bets, pots. Wide enough for the default
/// 10,000-chip stack and a full ring's worth of preflop action without
/// overflow headroom concerns.
pub type Chips = i32;
/// Seat index around the table (0 = first to post a blind).
pub type Position = usize;
/// Training iteration counter. `t` in the MCCFR literature.
pub type Epoch = u64;
/// Terminal-state payoff in chips, relative to a player's starting stack.
/// Regret counters accumulate these, so this matches their integer width
/// rather than the probability/entropy float aliases below.
pub type Utility = i32;
/// Strategy weights, sampling distributions, and reach probabilities.
pub type Probability = f32;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for property tests and Monte Carlo sampling.
pub trait Arbitrary {
    fn random() -> Self;
}

// ============================================================================
// GAME PARAMETERS
// ============================================================================
/// Default number of seats when no configuration is supplied.
pub const N_DEFAULT: usize = 2;
/// Default starting stack, in chips.
pub const STACK_DEFAULT: Chips = 10_000;
/// Default small blind.
pub const SMALL_BLIND_DEFAULT: Chips = 50;
/// Default big blind.
pub const BIG_BLIND_DEFAULT: Chips = 100;
/// Default ante (0 = disabled).
pub const ANTE_DEFAULT: Chips = 0;

/// Cluster count for histories confined to preflop.
pub const PREFLOP_CLUSTERS: usize = 169;
/// Cluster count for histories that have seen the flop or later.
pub const POSTFLOP_CLUSTERS: usize = 200;

// ============================================================================
// REGRET MATCHING / MCCFR SCHEDULE DEFAULTS
// ============================================================================
/// Minimum policy weight so normalization never divides by zero.
pub const POLICY_MIN: Probability = Probability::MIN_POSITIVE;
/// Floor for cumulative regret storage (prevents unbounded negative drift).
pub const REGRET_FLOOR_DEFAULT: Utility = -310_000_000;
/// Regret magnitude past which an update is treated as an overflow bug.
pub const REGRET_OVERFLOW_BOUND: i64 = 2_000_000_000;
/// Actions at or below this stored regret are pruning candidates under MCCFR-P.
pub const PRUNE_CUTOFF_DEFAULT: Utility = -300_000_000;
/// Probability of ignoring the prune cutoff and exploring anyway.
pub const PRUNE_EXPLORE_PROBABILITY: f64 = 0.05;

/// Default schedule thresholds, measured in iterations. Mirrors the
/// `BlueprintTimingConfig` of the source this spec was distilled from,
/// scaled by an assumed throughput of iterations/minute at construction
/// time rather than hard-coded per-minute counts.
pub const STRATEGY_INTERVAL_DEFAULT: Epoch = 10_000;
pub const PREFLOP_THRESHOLD_DEFAULT: Epoch = 800 * STRATEGY_INTERVAL_DEFAULT;
pub const SNAPSHOT_INTERVAL_DEFAULT: Epoch = 200 * STRATEGY_INTERVAL_DEFAULT;
pub const PRUNE_THRESH_DEFAULT: Epoch = 200 * STRATEGY_INTERVAL_DEFAULT;
pub const LCFR_THRESH_DEFAULT: Epoch = 400 * STRATEGY_INTERVAL_DEFAULT;
pub const DISCOUNT_INTERVAL_DEFAULT: Epoch = 10 * STRATEGY_INTERVAL_DEFAULT;
pub const LOG_INTERVAL_DEFAULT: Epoch = STRATEGY_INTERVAL_DEFAULT;

/// Interval between progress log messages during training.
pub const TRAINING_LOG_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initializes dual logging (terminal + timestamped file under `logs/`).
#[cfg(feature = "server")]
pub fn install_logger() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Registers a hard Ctrl+C handler that exits immediately, bypassing the
/// cooperative shutdown path below. Useful in development when a stuck
/// batch needs to be killed rather than waited out.
#[cfg(feature = "server")]
pub fn kill_on_ctrl_c() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("hard interrupt received, exiting immediately");
        std::process::exit(1);
    });
}

#[cfg(feature = "server")]
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
#[cfg(feature = "server")]
static DEADLINE: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// True once graceful shutdown has been requested (stdin "Q") or the
/// configured training deadline has passed. Polled by the trainer between
/// iteration batches; never checked mid-batch.
#[cfg(feature = "server")]
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
        || DEADLINE.get().is_some_and(|d| std::time::Instant::now() >= *d)
}
#[cfg(not(feature = "server"))]
pub fn interrupted() -> bool {
    false
}

/// Spawns the stdin listener for graceful shutdown ("Q" + Enter stops
/// training after the in-flight batch) and, if `deadline` is given, arms a
/// wall-clock deadline instead. Takes the parsed duration directly rather
/// than reading an environment variable, so callers with no concurrent
/// readers/writers of process env are needed.
#[cfg(feature = "server")]
pub fn listen_for_stop(deadline: Option<std::time::Duration>) {
    if let Some(deadline) = deadline {
        let _ = DEADLINE.set(std::time::Instant::now() + deadline);
        log::info!("training will stop after {deadline:?}");
    }
    std::thread::spawn(|| loop {
        let mut buffer = String::new();
        if std::io::stdin().read_line(&mut buffer).is_ok() {
            if buffer.trim().eq_ignore_ascii_case("q") {
                log::warn!("graceful interrupt requested, finishing current batch...");
                INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
                break;
            }
        }
    });
}

/// Parses a wall-clock duration string like "30m", "2h", or "1d".
#[cfg(feature = "server")]
pub fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    let (num, unit) = s.split_at(s.len().checked_sub(1)?);
    let value: u64 = num.parse().ok()?;
    match unit {
        "s" => Some(std::time::Duration::from_secs(value)),
        "m" => Some(std::time::Duration::from_secs(value * 60)),
        "h" => Some(std::time::Duration::from_secs(value * 3600)),
        "d" => Some(std::time::Duration::from_secs(value * 86400)),
        _ => None,
    }
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use super::*;

    /// "5m" parses to five minutes; a missing/garbage unit is rejected.
    #[test]
    fn duration_parsing() {
        assert_eq!(parse_duration("5m"), Some(std::time::Duration::from_secs(300)));
        assert_eq!(parse_duration("2h"), Some(std::time::Duration::from_secs(7200)));
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("10x"), None);
    }
}
