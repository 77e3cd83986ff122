use super::entity::{Entity, Kind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position. Ordering is row-major, which is also the canonical
/// lock-acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// In-bounds orthogonal neighbors of an in-bounds coordinate, in the fixed
    /// order south, north, east, west.
    pub fn neighbors(self, rows: usize, cols: usize) -> impl Iterator<Item = Coord> {
        let Coord { row, col } = self;
        [
            (row + 1 < rows).then(|| Coord::new(row + 1, col)),
            (row > 0).then(|| Coord::new(row - 1, col)),
            (col + 1 < cols).then(|| Coord::new(row, col + 1)),
            (col > 0).then(|| Coord::new(row, col - 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// True when `other` is this cell or one of its orthogonal neighbors.
    #[must_use]
    pub fn is_adjacent_or_self(self, other: Coord) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) <= 1
    }

    /// Every coordinate of a `rows x cols` grid in row-major order.
    pub fn row_major(rows: usize, cols: usize) -> impl Iterator<Item = Coord> {
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Coord::new(row, col)))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row-major matrix of cell records, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridSnapshot {
    pub cells: Vec<Vec<Entity>>,
}

impl GridSnapshot {
    #[must_use]
    pub fn new(cells: Vec<Vec<Entity>>) -> Self {
        Self { cells }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Entity> {
        self.cells.get(coord.row).and_then(|row| row.get(coord.col))
    }

    /// Iterates `(coord, entity)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Entity)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, e)| (Coord::new(row, col), e))
        })
    }

    #[must_use]
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for (_, e) in self.iter() {
            census.record(e.kind);
        }
        census
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row.iter().map(|e| e.kind.symbol()).collect();
            writeln!(f, "|{line}|")?;
        }
        Ok(())
    }
}

/// Population counts per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Census {
    pub empty: usize,
    pub plants: usize,
    pub herbivores: usize,
    pub carnivores: usize,
}

impl Census {
    pub fn record(&mut self, kind: Kind) {
        match kind {
            Kind::Empty => self.empty += 1,
            Kind::Plant => self.plants += 1,
            Kind::Herbivore => self.herbivores += 1,
            Kind::Carnivore => self.carnivores += 1,
        }
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn living(&self) -> usize {
        self.plants + self.herbivores + self.carnivores
    }
}

impl fmt::Display for Census {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plants={} herbivores={} carnivores={} empty={}",
            self.plants, self.herbivores, self.carnivores, self.empty
        )
    }
}
