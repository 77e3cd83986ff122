//! Core data structures for the Ecogrid simulation.

pub mod entity;
pub mod grid;
