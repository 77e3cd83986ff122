pub mod macros;

use ecogrid_lib::model::config::SimConfig;
use ecogrid_lib::model::session::Session;
use ecogrid_lib::model::{Coord, Entity, Scripted};

#[allow(dead_code)]
pub struct GridBuilder {
    config: SimConfig,
    entities: Vec<(Coord, Entity)>,
    chance: Scripted,
}

#[allow(dead_code)]
impl GridBuilder {
    pub fn new() -> Self {
        Self {
            config: SimConfig::default(),
            entities: Vec::new(),
            chance: Scripted::never(),
        }
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Random source used by the built session. Every roll fails by default.
    pub fn with_chance(mut self, chance: Scripted) -> Self {
        self.chance = chance;
        self
    }

    pub fn with_entity(mut self, row: usize, col: usize, entity: Entity) -> Self {
        self.entities.push((Coord::new(row, col), entity));
        self
    }

    pub fn with_plant(self, row: usize, col: usize, age: u32) -> Self {
        self.with_entity(row, col, Entity::plant().with_age(age))
    }

    pub fn with_herbivore(self, row: usize, col: usize, energy: i32) -> Self {
        self.with_entity(row, col, Entity::herbivore(energy))
    }

    pub fn with_carnivore(self, row: usize, col: usize, energy: i32) -> Self {
        self.with_entity(row, col, Entity::carnivore(energy))
    }

    pub fn build(self) -> Session<Scripted> {
        let mut session = Session::with_chance(self.config, self.chance)
            .expect("Failed to create session in test builder");
        for (coord, entity) in self.entities {
            session
                .place(coord, entity)
                .expect("Test entity placed out of bounds");
        }
        session
    }
}
