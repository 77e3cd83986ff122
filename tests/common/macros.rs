/// Asserts the kind of the entity at `(row, col)` in a session.
#[macro_export]
macro_rules! assert_kind {
    ($grid:expr, $row:expr, $col:expr, $kind:expr) => {
        let coord = ecogrid_lib::model::Coord::new($row, $col);
        let entity = $grid.get(coord);
        assert_eq!(
            entity.kind, $kind,
            "Expected {:?} at {} but found {:?}",
            $kind, coord, entity
        );
    };
}

/// Asserts the full record at `(row, col)` in a session.
#[macro_export]
macro_rules! assert_cell {
    ($session:expr, $row:expr, $col:expr, $entity:expr) => {
        let coord = ecogrid_lib::model::Coord::new($row, $col);
        assert_eq!($session.get(coord), $entity, "Cell {} mismatch", coord);
    };
}

/// Asserts population counts as `(plants, herbivores, carnivores)`.
#[macro_export]
macro_rules! assert_census {
    ($session:expr, $plants:expr, $herbivores:expr, $carnivores:expr) => {
        let census = $session.census();
        assert_eq!(
            (census.plants, census.herbivores, census.carnivores),
            ($plants, $herbivores, $carnivores),
            "Population mismatch: {}",
            census
        );
    };
}
