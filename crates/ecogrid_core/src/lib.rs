//! # Ecogrid Core
//!
//! The tick engine for Ecogrid - a predator-prey cellular automaton on a small
//! rectangular grid.
//!
//! This crate contains the simulation logic, including:
//! - Plant, herbivore and carnivore update rules
//! - Sequential and parallel tick schedulers
//! - Per-cell locking and the per-tick finalize set
//! - Session lifecycle (seeding and advancing)
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! - **Cells own state**: every cell holds at most one entity behind its own lock
//! - **Neighborhood updates**: a handler only touches its cell and the four
//!   orthogonal neighbors
//! - **Parallel processing**: Rayon-powered sweep with ordered lock acquisition
//! - **Injectable randomness**: every roll goes through [`Chance`], so tests can
//!   force outcomes and seeded runs replay exactly
//!
//! ## Example
//!
//! ```
//! use ecogrid_core::{SeedRequest, Session, SimConfig};
//!
//! let mut session = Session::new(SimConfig::default()).unwrap();
//! let seeded = session.reset_and_seed(&SeedRequest::new(20, 10, 5)).unwrap();
//! assert_eq!(seeded.census().living(), 35);
//!
//! let next = session.advance_tick();
//! assert_eq!(next.rows(), 15);
//! ```

/// Injectable random source used by every probabilistic rule
pub mod chance;
/// Configuration management for simulation parameters
pub mod config;
/// Error types for seeding and configuration
pub mod error;
/// Locked cell grid and the per-tick finalize set
pub mod grid;
/// Performance metrics collection and logging
pub mod metrics;
/// Plant and animal update rules
pub mod rules;
/// Sequential and parallel tick sweeps
pub mod scheduler;
/// Session lifecycle: seeding and advancing
pub mod session;

pub use chance::{Chance, Draw, Scripted, SimRng};
pub use config::{SchedulerMode, SimConfig, MAX_GRID_SIZE};
pub use error::{Result, SimError};
pub use grid::{FinalizeSet, Grid};
pub use metrics::{init_logging, Metrics};
pub use rules::Outcome;
pub use scheduler::TickReport;
pub use session::{SeedRequest, Session};
