//! Per-species rules: aging and death, feeding, reproduction, movement.
//!
//! Handlers see the grid only through a [`Neighborhood`], a cell plus its
//! up-to-4 orthogonal neighbors, and draw every random decision from a
//! [`Chance`]. They report what happened as an [`Outcome`].

use crate::chance::{Chance, Draw};
use crate::config::{AnimalConfig, EnergyConfig, PlantConfig, SimConfig};
use crate::grid::{FinalizeSet, Grid, LockedNeighborhood};
use ecogrid_data::{Coord, Entity, Kind};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Exclusive access to one cell and its orthogonal neighbors for the duration
/// of a handler.
pub trait Neighborhood {
    /// The cell being evaluated.
    fn center(&self) -> Coord;

    /// Grid `(rows, cols)`.
    fn bounds(&self) -> (usize, usize);

    /// Reads a cell of the neighborhood.
    fn get(&mut self, at: Coord) -> Entity;

    /// Writes a cell of the neighborhood.
    fn set(&mut self, at: Coord, entity: Entity);

    /// Marks a cell as settled for the rest of the tick.
    fn finalize(&mut self, at: Coord);
}

/// Lock-free view used by the sequential sweep, which owns the whole grid.
pub struct SweepView<'a> {
    grid: &'a mut Grid,
    finalized: &'a FinalizeSet,
    center: Coord,
}

impl<'a> SweepView<'a> {
    pub fn new(grid: &'a mut Grid, finalized: &'a FinalizeSet, center: Coord) -> Self {
        Self {
            grid,
            finalized,
            center,
        }
    }
}

impl Neighborhood for SweepView<'_> {
    fn center(&self) -> Coord {
        self.center
    }

    fn bounds(&self) -> (usize, usize) {
        (self.grid.rows(), self.grid.cols())
    }

    fn get(&mut self, at: Coord) -> Entity {
        debug_assert!(self.center.is_adjacent_or_self(at));
        self.grid.cell_mut(at).map_or(Entity::EMPTY, |cell| *cell)
    }

    fn set(&mut self, at: Coord, entity: Entity) {
        debug_assert!(self.center.is_adjacent_or_self(at));
        self.grid.set(at, entity);
    }

    fn finalize(&mut self, at: Coord) {
        self.finalized.mark(at);
    }
}

impl Neighborhood for LockedNeighborhood<'_> {
    fn center(&self) -> Coord {
        LockedNeighborhood::center(self)
    }

    fn bounds(&self) -> (usize, usize) {
        LockedNeighborhood::bounds(self)
    }

    fn get(&mut self, at: Coord) -> Entity {
        debug_assert!(self.center().is_adjacent_or_self(at));
        self.slot(at).map_or(Entity::EMPTY, |cell| *cell)
    }

    fn set(&mut self, at: Coord, entity: Entity) {
        debug_assert!(self.center().is_adjacent_or_self(at));
        if let Some(cell) = self.slot(at) {
            *cell = entity;
        }
    }

    fn finalize(&mut self, at: Coord) {
        self.finalized().mark(at);
    }
}

/// Events produced by one or more handler invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Outcome {
    /// Offspring placed (plants and animals).
    pub births: u32,
    /// Deaths from old age or starvation.
    pub deaths: u32,
    /// Neighbors eaten.
    pub meals: u32,
    pub moves: u32,
}

impl Outcome {
    fn died() -> Self {
        Self {
            deaths: 1,
            ..Self::default()
        }
    }
}

impl Add for Outcome {
    type Output = Outcome;

    fn add(mut self, rhs: Outcome) -> Outcome {
        self += rhs;
        self
    }
}

impl AddAssign for Outcome {
    fn add_assign(&mut self, rhs: Outcome) {
        self.births += rhs.births;
        self.deaths += rhs.deaths;
        self.meals += rhs.meals;
        self.moves += rhs.moves;
    }
}

/// Runs the handler matching the kind at the neighborhood's center.
pub fn evaluate<N, C>(view: &mut N, config: &SimConfig, chance: &mut C) -> Outcome
where
    N: Neighborhood + ?Sized,
    C: Chance + ?Sized,
{
    let here = view.center();
    match view.get(here).kind {
        Kind::Empty => Outcome::default(),
        Kind::Plant => plant(view, &config.plant, chance),
        Kind::Herbivore => animal(view, &config.herbivore, &config.energy, chance),
        Kind::Carnivore => animal(view, &config.carnivore, &config.energy, chance),
    }
}

/// Picks a uniformly random empty orthogonal neighbor. The candidate list is
/// rebuilt on every call.
pub fn pick_empty_neighbor<N, C>(view: &mut N, chance: &mut C) -> Option<Coord>
where
    N: Neighborhood + ?Sized,
    C: Chance + ?Sized,
{
    let (rows, cols) = view.bounds();
    let candidates: Vec<Coord> = view
        .center()
        .neighbors(rows, cols)
        .filter(|c| view.get(*c).is_empty())
        .collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.get(chance.pick(candidates.len())).copied()
}

pub fn plant<N, C>(view: &mut N, rules: &PlantConfig, chance: &mut C) -> Outcome
where
    N: Neighborhood + ?Sized,
    C: Chance + ?Sized,
{
    let here = view.center();
    let mut me = view.get(here);

    if me.age >= rules.max_age {
        view.set(here, Entity::EMPTY);
        return Outcome::died();
    }

    me.age += 1;
    view.set(here, me);

    let mut outcome = Outcome::default();
    if chance.chance(Draw::Spread, rules.reproduction_probability) {
        if let Some(target) = pick_empty_neighbor(view, chance) {
            view.set(target, Entity::plant());
            view.finalize(target);
            outcome.births += 1;
        }
    }
    outcome
}

/// Herbivore and carnivore rules. What counts as food comes from the kind at
/// the center.
pub fn animal<N, C>(
    view: &mut N,
    rules: &AnimalConfig,
    energy: &EnergyConfig,
    chance: &mut C,
) -> Outcome
where
    N: Neighborhood + ?Sized,
    C: Chance + ?Sized,
{
    let here = view.center();
    let mut me = view.get(here);

    if me.age >= rules.max_age || me.energy <= 0 {
        view.set(here, Entity::EMPTY);
        return Outcome::died();
    }

    me.age += 1;
    let mut outcome = Outcome::default();

    if let Some(prey) = me.kind.prey() {
        let (rows, cols) = view.bounds();
        for target in here.neighbors(rows, cols) {
            if view.get(target).kind == prey && chance.chance(Draw::Eat, rules.eat_probability) {
                view.set(target, Entity::EMPTY);
                me.gain_energy(rules.eat_gain, energy.max_energy);
                outcome.meals += 1;
            }
        }
    }
    view.set(here, me);

    if chance.chance(Draw::Reproduce, rules.reproduction_probability)
        && me.energy >= energy.reproduction_threshold
    {
        if let Some(target) = pick_empty_neighbor(view, chance) {
            me.spend_energy(rules.reproduction_cost);
            view.set(here, me);
            view.set(target, Entity::spawn(me.kind, rules.offspring_energy));
            view.finalize(target);
            outcome.births += 1;
        }
    }

    if chance.chance(Draw::Move, rules.move_probability) {
        if let Some(target) = pick_empty_neighbor(view, chance) {
            me.spend_energy(rules.move_cost);
            view.set(here, Entity::EMPTY);
            view.set(target, me);
            view.finalize(target);
            outcome.moves += 1;
        }
    }

    outcome
}
