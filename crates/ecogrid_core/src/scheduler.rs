//! Tick scheduling: one pass over the grid per call.
//!
//! Both sweeps skip cells in the [`FinalizeSet`] and clear it at tick start
//! and end, so an entity that moved (or was born) into a cell is never
//! evaluated again in the same tick.

use crate::chance::{Chance, SharedChance};
use crate::config::{SchedulerMode, SimConfig};
use crate::grid::{FinalizeSet, Grid};
use crate::rules::{self, Neighborhood, Outcome, SweepView};
use ecogrid_data::Coord;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Handler invocations per cell, row-major.
    #[serde(skip)]
    pub evaluations: Vec<u32>,
    #[serde(skip)]
    pub duration: Duration,
}

impl TickReport {
    /// Total handler invocations.
    #[must_use]
    pub fn evaluated(&self) -> u32 {
        self.evaluations.iter().sum()
    }
}

/// Runs one tick with the configured scheduler.
pub fn run_tick<C: Chance + Send>(
    grid: &mut Grid,
    finalized: &mut FinalizeSet,
    config: &SimConfig,
    chance: &mut C,
    tick: u64,
) -> TickReport {
    let start = Instant::now();
    finalized.clear();

    let (outcome, evaluations) = match config.grid.scheduler {
        SchedulerMode::Sequential => sweep_sequential(grid, finalized, config, chance),
        SchedulerMode::Parallel => sweep_parallel(grid, finalized, config, chance),
    };

    finalized.clear();
    TickReport {
        tick,
        outcome,
        evaluations,
        duration: start.elapsed(),
    }
}

/// Row-major sweep with exclusive access to the grid.
pub fn sweep_sequential<C: Chance + ?Sized>(
    grid: &mut Grid,
    finalized: &FinalizeSet,
    config: &SimConfig,
    chance: &mut C,
) -> (Outcome, Vec<u32>) {
    let mut evaluations = vec![0u32; grid.capacity()];
    let mut outcome = Outcome::default();
    let cols = grid.cols();

    for coord in Coord::row_major(grid.rows(), cols) {
        if finalized.contains(coord) {
            continue;
        }
        let mut view = SweepView::new(grid, finalized, coord);
        if view.get(coord).is_empty() {
            continue;
        }
        evaluations[coord.row * cols + coord.col] += 1;
        outcome += rules::evaluate(&mut view, config, chance);
    }

    (outcome, evaluations)
}

/// One rayon task per cell. Each task holds its neighborhood's locks for the
/// whole evaluation; the random source is locked per draw, after the cells.
pub fn sweep_parallel<C: Chance + Send>(
    grid: &Grid,
    finalized: &FinalizeSet,
    config: &SimConfig,
    chance: &mut C,
) -> (Outcome, Vec<u32>) {
    let cols = grid.cols();
    let counters: Vec<AtomicU32> = (0..grid.capacity()).map(|_| AtomicU32::new(0)).collect();
    let shared = Mutex::new(chance);
    let coords: Vec<Coord> = grid.coords().collect();

    let outcome = coords
        .par_iter()
        .map(|&coord| {
            let mut hood = grid.lock_neighborhood(coord, finalized);
            if finalized.contains(coord) || Neighborhood::get(&mut hood, coord).is_empty() {
                return Outcome::default();
            }
            counters[coord.row * cols + coord.col].fetch_add(1, Ordering::Relaxed);
            let mut chance = SharedChance::new(&shared);
            rules::evaluate(&mut hood, config, &mut chance)
        })
        .reduce(Outcome::default, |a, b| a + b);

    let evaluations = counters.into_iter().map(AtomicU32::into_inner).collect();
    (outcome, evaluations)
}
