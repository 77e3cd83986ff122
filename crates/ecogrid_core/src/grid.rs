//! Fixed-size cell grid with one lock per cell.
//!
//! The sequential scheduler works through `&mut Grid` and never locks. The
//! parallel scheduler shares `&Grid` and locks a cell's 5-cell neighborhood
//! through [`Grid::lock_neighborhood`], always in ascending row-major order.

use ecogrid_data::{Coord, Entity, GridSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Mutex<Entity>>,
}

impl Grid {
    /// An all-empty grid.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: (0..rows * cols).map(|_| Mutex::new(Entity::EMPTY)).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    #[inline(always)]
    fn index(&self, coord: Coord) -> usize {
        coord.row * self.cols + coord.col
    }

    #[inline]
    #[must_use]
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        self.contains(coord).then(|| self.index(coord))
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        Coord::row_major(self.rows, self.cols)
    }

    /// In-bounds orthogonal neighbors in south, north, east, west order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        coord.neighbors(self.rows, self.cols)
    }

    /// Reads a cell through its lock. Out-of-bounds reads see an empty cell.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Entity {
        self.index_of(coord)
            .map(|idx| *self.cells[idx].lock().unwrap_or_else(|e| e.into_inner()))
            .unwrap_or(Entity::EMPTY)
    }

    /// Exclusive access without locking.
    pub fn cell_mut(&mut self, coord: Coord) -> Option<&mut Entity> {
        let idx = self.index_of(coord)?;
        Some(self.cells[idx].get_mut().unwrap_or_else(|e| e.into_inner()))
    }

    /// Writes a cell. Out-of-bounds writes are ignored and reported as `false`.
    pub fn set(&mut self, coord: Coord, entity: Entity) -> bool {
        match self.cell_mut(coord) {
            Some(cell) => {
                *cell = entity;
                true
            }
            None => false,
        }
    }

    /// Resets every cell to empty.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell.get_mut().unwrap_or_else(|e| e.into_inner()) = Entity::EMPTY;
        }
    }

    /// Coordinates of every empty cell, row-major.
    #[must_use]
    pub fn empty_coords(&self) -> Vec<Coord> {
        self.coords().filter(|c| self.get(*c).is_empty()).collect()
    }

    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        let cells = (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| self.get(Coord::new(row, col)))
                    .collect()
            })
            .collect();
        GridSnapshot::new(cells)
    }

    /// Locks `center` and its in-bounds orthogonal neighbors in ascending
    /// row-major order. Every caller uses the same global order, so two
    /// overlapping neighborhoods can never wait on each other in a cycle.
    pub fn lock_neighborhood<'a>(
        &'a self,
        center: Coord,
        finalized: &'a FinalizeSet,
    ) -> LockedNeighborhood<'a> {
        let mut members: Vec<Coord> = std::iter::once(center)
            .chain(self.neighbors(center))
            .filter(|c| self.contains(*c))
            .collect();
        members.sort_unstable();

        let guards = members
            .into_iter()
            .map(|coord| {
                let guard = self.cells[self.index(coord)]
                    .lock()
                    .unwrap_or_else(|e| e.into_inner());
                (coord, guard)
            })
            .collect();

        LockedNeighborhood {
            center,
            rows: self.rows,
            cols: self.cols,
            guards,
            finalized,
        }
    }
}

/// Guards for one cell and its neighbors, held until dropped.
pub struct LockedNeighborhood<'a> {
    center: Coord,
    rows: usize,
    cols: usize,
    guards: Vec<(Coord, MutexGuard<'a, Entity>)>,
    finalized: &'a FinalizeSet,
}

impl LockedNeighborhood<'_> {
    #[must_use]
    pub fn center(&self) -> Coord {
        self.center
    }

    #[must_use]
    pub fn bounds(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Coordinates held, in acquisition order.
    #[must_use]
    pub fn locked(&self) -> Vec<Coord> {
        self.guards.iter().map(|(c, _)| *c).collect()
    }

    pub fn slot(&mut self, at: Coord) -> Option<&mut Entity> {
        self.guards
            .iter_mut()
            .find(|(c, _)| *c == at)
            .map(|(_, guard)| &mut **guard)
    }

    #[must_use]
    pub fn finalized(&self) -> &FinalizeSet {
        self.finalized
    }
}

/// Cells already settled this tick.
///
/// Marks are only written while the marked cell is exclusively held (its lock
/// or `&mut Grid`), so relaxed atomics are enough.
#[derive(Debug)]
pub struct FinalizeSet {
    cols: usize,
    marks: Vec<AtomicBool>,
}

impl FinalizeSet {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            marks: (0..rows * cols).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    #[inline(always)]
    fn index(&self, coord: Coord) -> Option<usize> {
        (coord.col < self.cols)
            .then(|| coord.row * self.cols + coord.col)
            .filter(|idx| *idx < self.marks.len())
    }

    pub fn mark(&self, coord: Coord) {
        if let Some(idx) = self.index(coord) {
            self.marks[idx].store(true, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.index(coord)
            .is_some_and(|idx| self.marks[idx].load(Ordering::Relaxed))
    }

    pub fn clear(&mut self) {
        for mark in &mut self.marks {
            *mark.get_mut() = false;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marks
            .iter()
            .filter(|m| m.load(Ordering::Relaxed))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
