//! Tick metrics and structured logging.

use crate::scheduler::TickReport;
use ecogrid_data::Census;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Running totals across the ticks of a session.
pub struct Metrics {
    tick_count: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    meals: AtomicU64,
    moves: AtomicU64,
    seeds: AtomicU64,
    rejected_seeds: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Metrics {
    /// Creates a collector that logs an info summary every `log_interval` ticks.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            meals: AtomicU64::new(0),
            moves: AtomicU64::new(0),
            seeds: AtomicU64::new(0),
            rejected_seeds: AtomicU64::new(0),
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick.
    pub fn record_tick(&self, report: &TickReport, census: &Census) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        let o = &report.outcome;
        self.births.fetch_add(u64::from(o.births), Ordering::Relaxed);
        self.deaths.fetch_add(u64::from(o.deaths), Ordering::Relaxed);
        self.meals.fetch_add(u64::from(o.meals), Ordering::Relaxed);
        self.moves.fetch_add(u64::from(o.moves), Ordering::Relaxed);

        tracing::debug!(
            tick = report.tick,
            births = o.births,
            deaths = o.deaths,
            meals = o.meals,
            moves = o.moves,
            evaluated = report.evaluated(),
            "Tick complete"
        );

        if tick % self.log_interval == 0 {
            tracing::info!(
                tick = report.tick,
                plants = census.plants,
                herbivores = census.herbivores,
                carnivores = census.carnivores,
                duration_us = report.duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    /// Records an accepted seed request.
    pub fn record_seed(&self, census: &Census) {
        self.seeds.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            plants = census.plants,
            herbivores = census.herbivores,
            carnivores = census.carnivores,
            "Grid seeded"
        );
    }

    /// Records a seed request the grid could not hold.
    pub fn record_rejected_seed(&self, reason: &str) {
        self.rejected_seeds.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(reason, "Seed request rejected");
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn meals(&self) -> u64 {
        self.meals.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn moves(&self) -> u64 {
        self.moves.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn seeds(&self) -> u64 {
        self.seeds.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rejected_seeds(&self) -> u64 {
        self.rejected_seeds.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
///
/// Honors `RUST_LOG` and writes to stderr so grid output on stdout stays clean.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
