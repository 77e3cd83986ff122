//! A simulation session: grid, random source and per-tick bookkeeping owned
//! together, so independent sessions never share state.

use crate::chance::{Chance, SimRng};
use crate::config::{SimConfig, MAX_GRID_SIZE};
use crate::error::{Result, SimError};
use crate::grid::{FinalizeSet, Grid};
use crate::metrics::Metrics;
use crate::scheduler::{self, TickReport};
use ecogrid_data::{Census, Coord, Entity, GridSnapshot, Kind};
use serde::{Deserialize, Serialize};

fn default_side() -> usize {
    MAX_GRID_SIZE
}

/// Population requested for a fresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRequest {
    #[serde(default = "default_side")]
    pub rows: usize,
    #[serde(default = "default_side")]
    pub cols: usize,
    pub plants: usize,
    pub herbivores: usize,
    pub carnivores: usize,
}

impl SeedRequest {
    /// A request for the full-size grid.
    #[must_use]
    pub fn new(plants: usize, herbivores: usize, carnivores: usize) -> Self {
        Self {
            rows: MAX_GRID_SIZE,
            cols: MAX_GRID_SIZE,
            plants,
            herbivores,
            carnivores,
        }
    }

    #[must_use]
    pub fn with_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Total entities requested. Saturates instead of overflowing.
    #[must_use]
    pub fn total(&self) -> usize {
        self.plants
            .saturating_add(self.herbivores)
            .saturating_add(self.carnivores)
    }
}

pub struct Session<C: Chance = SimRng> {
    config: SimConfig,
    grid: Grid,
    finalized: FinalizeSet,
    chance: C,
    tick: u64,
    metrics: Metrics,
    last_report: Option<TickReport>,
}

impl Session<SimRng> {
    /// A session drawing from a ChaCha8 stream seeded from the config, or from
    /// entropy when no seed is set.
    pub fn new(config: SimConfig) -> Result<Self> {
        let rng = SimRng::from_seed_option(config.grid.seed);
        Self::with_chance(config, rng)
    }
}

impl<C: Chance + Send> Session<C> {
    /// A session drawing from an injected random source.
    pub fn with_chance(config: SimConfig, chance: C) -> Result<Self> {
        config.validate()?;
        let (rows, cols) = (config.grid.rows, config.grid.cols);
        let metrics = Metrics::new(config.metrics.log_interval);
        Ok(Self {
            config,
            grid: Grid::new(rows, cols),
            finalized: FinalizeSet::new(rows, cols),
            chance,
            tick: 0,
            metrics,
            last_report: None,
        })
    }

    /// Clears the grid and places the requested population on uniformly random
    /// empty cells: plants first, then herbivores, then carnivores.
    ///
    /// Oversized requests are rejected before anything is touched.
    pub fn reset_and_seed(&mut self, request: &SeedRequest) -> Result<GridSnapshot> {
        let (rows, cols) = (request.rows, request.cols);
        if rows == 0 || cols == 0 || rows > MAX_GRID_SIZE || cols > MAX_GRID_SIZE {
            let err = SimError::InvalidDimensions {
                rows,
                cols,
                max: MAX_GRID_SIZE,
            };
            self.metrics.record_rejected_seed(&err.to_string());
            return Err(err);
        }
        let capacity = rows * cols;
        if request.total() > capacity {
            let err = SimError::too_many_entities(request.total(), capacity);
            self.metrics.record_rejected_seed(&err.to_string());
            return Err(err);
        }

        if self.grid.rows() == rows && self.grid.cols() == cols {
            self.grid.clear();
        } else {
            self.grid = Grid::new(rows, cols);
            self.finalized = FinalizeSet::new(rows, cols);
        }
        self.tick = 0;
        self.last_report = None;

        let initial_energy = self.config.energy.initial_energy;
        let mut open: Vec<Coord> = self.grid.coords().collect();
        let batches = [
            (Kind::Plant, request.plants),
            (Kind::Herbivore, request.herbivores),
            (Kind::Carnivore, request.carnivores),
        ];
        for (kind, count) in batches {
            for _ in 0..count {
                if open.is_empty() {
                    return Err(SimError::too_many_entities(request.total(), capacity));
                }
                let idx = self.chance.pick(open.len()).min(open.len() - 1);
                let coord = open.swap_remove(idx);
                self.grid.set(coord, Entity::spawn(kind, initial_energy));
            }
        }

        let snapshot = self.grid.snapshot();
        self.metrics.record_seed(&snapshot.census());
        Ok(snapshot)
    }

    /// Runs exactly one tick and returns the resulting grid.
    pub fn advance_tick(&mut self) -> GridSnapshot {
        self.tick += 1;
        if self.config.grid.deterministic {
            let seed = self.config.grid.seed.unwrap_or(0);
            self.chance
                .reseed(seed.wrapping_add(self.tick).wrapping_add(0x5EED));
        }

        let report = scheduler::run_tick(
            &mut self.grid,
            &mut self.finalized,
            &self.config,
            &mut self.chance,
            self.tick,
        );
        let snapshot = self.grid.snapshot();
        self.metrics.record_tick(&report, &snapshot.census());
        self.last_report = Some(report);
        snapshot
    }

    /// Places one entity directly, replacing whatever was there.
    pub fn place(&mut self, coord: Coord, entity: Entity) -> Result<()> {
        if self.grid.set(coord, entity) {
            Ok(())
        } else {
            Err(SimError::OutOfBounds {
                coord,
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            })
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    #[must_use]
    pub fn census(&self) -> Census {
        self.grid.snapshot().census()
    }

    #[must_use]
    pub fn get(&self, coord: Coord) -> Entity {
        self.grid.get(coord)
    }

    /// Ticks run since the last seed.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn chance_mut(&mut self) -> &mut C {
        &mut self.chance
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::{Draw, Scripted};
    use crate::config::GridConfig;

    fn scripted(chance: Scripted) -> Session<Scripted> {
        Session::with_chance(SimConfig::default(), chance).unwrap()
    }

    #[test]
    fn test_seed_places_requested_population() {
        let mut session = Session::new(SimConfig::default()).unwrap();
        let snapshot = session
            .reset_and_seed(&SeedRequest::new(30, 20, 10))
            .unwrap();
        let census = snapshot.census();
        assert_eq!(census.plants, 30);
        assert_eq!(census.herbivores, 20);
        assert_eq!(census.carnivores, 10);
        assert_eq!(census.empty, 225 - 60);
        for (_, e) in snapshot.iter() {
            match e.kind {
                Kind::Herbivore | Kind::Carnivore => assert_eq!(e.energy, 100),
                _ => assert_eq!(e.energy, 0),
            }
            assert_eq!(e.age, 0);
        }
    }

    #[test]
    fn test_full_grid_seed_terminates() {
        let mut session = Session::new(SimConfig::default()).unwrap();
        let snapshot = session
            .reset_and_seed(&SeedRequest::new(100, 100, 25))
            .unwrap();
        assert_eq!(snapshot.census().empty, 0);
    }

    #[test]
    fn test_too_many_entities_leaves_grid_untouched() {
        let mut session = Session::new(SimConfig::default()).unwrap();
        let before = session.reset_and_seed(&SeedRequest::new(5, 5, 5)).unwrap();
        let err = session
            .reset_and_seed(&SeedRequest::new(100, 100, 26))
            .unwrap_err();
        assert_eq!(err, SimError::too_many_entities(226, 225));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.metrics().rejected_seeds(), 1);
    }

    #[test]
    fn test_overflowing_counts_are_rejected() {
        let mut session = Session::new(SimConfig::default()).unwrap();
        let err = session
            .reset_and_seed(&SeedRequest::new(usize::MAX, 1, 1))
            .unwrap_err();
        assert!(matches!(err, SimError::TooManyEntities { .. }));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let mut session = Session::new(SimConfig::default()).unwrap();
        let err = session
            .reset_and_seed(&SeedRequest::new(1, 0, 0).with_size(16, 15))
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidDimensions { rows: 16, .. }));
        assert_eq!(session.grid().rows(), 15);
    }

    #[test]
    fn test_seed_resizes_grid() {
        let mut session = Session::new(SimConfig::default()).unwrap();
        let snapshot = session
            .reset_and_seed(&SeedRequest::new(2, 1, 1).with_size(4, 6))
            .unwrap();
        assert_eq!(snapshot.rows(), 4);
        assert_eq!(snapshot.cols(), 6);
        let err = session
            .reset_and_seed(&SeedRequest::new(25, 0, 0).with_size(4, 6))
            .unwrap_err();
        assert_eq!(err, SimError::too_many_entities(25, 24));
        session.advance_tick();
        assert_eq!(session.snapshot().rows(), 4);
    }

    #[test]
    fn test_seed_resets_tick_counter() {
        let mut session = Session::new(SimConfig::default()).unwrap();
        session.reset_and_seed(&SeedRequest::new(10, 0, 0)).unwrap();
        session.advance_tick();
        session.advance_tick();
        assert_eq!(session.tick(), 2);
        session.reset_and_seed(&SeedRequest::new(10, 0, 0)).unwrap();
        assert_eq!(session.tick(), 0);
        assert!(session.last_report().is_none());
    }

    #[test]
    fn test_seed_request_defaults_to_full_grid() {
        let request: SeedRequest =
            serde_json::from_str(r#"{"plants":1,"herbivores":2,"carnivores":3}"#).unwrap();
        assert_eq!(request, SeedRequest::new(1, 2, 3));
    }

    #[test]
    fn test_predation_scenario() {
        let mut session = scripted(Scripted::never().with(Draw::Eat, true));
        session
            .place(Coord::new(5, 5), Entity::carnivore(50))
            .unwrap();
        session
            .place(Coord::new(5, 6), Entity::herbivore(10))
            .unwrap();
        let snapshot = session.advance_tick();
        assert_eq!(snapshot.get(Coord::new(5, 6)), Some(&Entity::EMPTY));
        let predator = snapshot.get(Coord::new(5, 5)).copied().unwrap();
        assert_eq!(predator.kind, Kind::Carnivore);
        assert_eq!(predator.energy, 80);
    }

    #[test]
    fn test_place_out_of_bounds_fails() {
        let mut session = scripted(Scripted::never());
        let err = session.place(Coord::new(15, 0), Entity::plant()).unwrap_err();
        assert_eq!(
            err,
            SimError::OutOfBounds {
                coord: Coord::new(15, 0),
                rows: 15,
                cols: 15,
            }
        );
        assert_eq!(session.census().living(), 0);
    }

    #[test]
    fn test_deterministic_sessions_replay() {
        let config = SimConfig {
            grid: GridConfig {
                seed: Some(2024),
                deterministic: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut a = Session::new(config.clone()).unwrap();
        let mut b = Session::new(config).unwrap();
        let request = SeedRequest::new(40, 25, 8);
        assert_eq!(
            a.reset_and_seed(&request).unwrap(),
            b.reset_and_seed(&request).unwrap()
        );
        for _ in 0..50 {
            assert_eq!(a.advance_tick(), b.advance_tick());
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            grid: GridConfig {
                rows: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            Session::new(config),
            Err(SimError::Config(_))
        ));
    }
}
