//! # Ecogrid Data
//!
//! Plain data shared between the simulation core, the HTTP adapter and the CLI:
//! the per-cell [`Entity`] value, grid coordinates and the serializable
//! [`GridSnapshot`] matrix.

pub mod data;

pub use data::entity::{Entity, Kind};
pub use data::grid::{Census, Coord, GridSnapshot};
