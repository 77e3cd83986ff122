use serde::{Deserialize, Serialize};

/// The category of entity occupying a cell.
///
/// Serializes to the single-character tags used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Kind {
    /// Nothing lives here.
    #[default]
    #[serde(rename = " ")]
    Empty,
    /// Static producer, spreads into adjacent empty cells.
    #[serde(rename = "P")]
    Plant,
    /// Prey. Eats plants.
    #[serde(rename = "H")]
    Herbivore,
    /// Predator. Eats herbivores.
    #[serde(rename = "C")]
    Carnivore,
}

impl Kind {
    /// Display symbol, identical to the wire tag.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Kind::Empty => ' ',
            Kind::Plant => 'P',
            Kind::Herbivore => 'H',
            Kind::Carnivore => 'C',
        }
    }

    /// Herbivores and carnivores carry energy; plants and empty cells do not.
    #[must_use]
    pub fn is_animal(self) -> bool {
        matches!(self, Kind::Herbivore | Kind::Carnivore)
    }

    /// What this kind feeds on, if anything.
    #[must_use]
    pub fn prey(self) -> Option<Kind> {
        match self {
            Kind::Herbivore => Some(Kind::Plant),
            Kind::Carnivore => Some(Kind::Herbivore),
            Kind::Empty | Kind::Plant => None,
        }
    }
}

/// State of a single grid cell.
///
/// An empty cell always has `energy == 0` and `age == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: Kind,
    pub energy: i32,
    pub age: u32,
}

impl Entity {
    pub const EMPTY: Entity = Entity {
        kind: Kind::Empty,
        energy: 0,
        age: 0,
    };

    /// A freshly sprouted plant.
    #[must_use]
    pub fn plant() -> Self {
        Self {
            kind: Kind::Plant,
            energy: 0,
            age: 0,
        }
    }

    #[must_use]
    pub fn herbivore(energy: i32) -> Self {
        Self::spawn(Kind::Herbivore, energy)
    }

    #[must_use]
    pub fn carnivore(energy: i32) -> Self {
        Self::spawn(Kind::Carnivore, energy)
    }

    /// A newborn of the given kind. Energy is dropped for kinds that don't carry it.
    #[must_use]
    pub fn spawn(kind: Kind, energy: i32) -> Self {
        match kind {
            Kind::Empty => Self::EMPTY,
            Kind::Plant => Self::plant(),
            Kind::Herbivore | Kind::Carnivore => Self {
                kind,
                energy: energy.max(0),
                age: 0,
            },
        }
    }

    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        if self.kind != Kind::Empty {
            self.age = age;
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind == Kind::Empty
    }

    /// Resets the cell to [`Entity::EMPTY`].
    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    /// Adds energy, never exceeding `cap`.
    pub fn gain_energy(&mut self, amount: i32, cap: i32) {
        self.energy = self.energy.saturating_add(amount).min(cap);
    }

    /// Removes energy, never going below zero.
    pub fn spend_energy(&mut self, amount: i32) {
        self.energy = self.energy.saturating_sub(amount).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_tags() {
        assert_eq!(serde_json::to_string(&Kind::Empty).unwrap(), r#"" ""#);
        assert_eq!(serde_json::to_string(&Kind::Plant).unwrap(), r#""P""#);
        assert_eq!(serde_json::to_string(&Kind::Herbivore).unwrap(), r#""H""#);
        assert_eq!(serde_json::to_string(&Kind::Carnivore).unwrap(), r#""C""#);
    }

    #[test]
    fn test_entity_serializes_type_field() {
        let json = serde_json::to_value(Entity::herbivore(100).with_age(3)).unwrap();
        assert_eq!(json["type"], "H");
        assert_eq!(json["energy"], 100);
        assert_eq!(json["age"], 3);
    }

    #[test]
    fn test_entity_parses_wire_record() {
        let e: Entity = serde_json::from_str(r#"{"type":"C","energy":42,"age":7}"#).unwrap();
        assert_eq!(e, Entity::carnivore(42).with_age(7));
    }

    #[test]
    fn test_energy_gain_is_capped() {
        let mut e = Entity::herbivore(190);
        e.gain_energy(30, 200);
        assert_eq!(e.energy, 200);
    }

    #[test]
    fn test_energy_spend_floors_at_zero() {
        let mut e = Entity::carnivore(3);
        e.spend_energy(5);
        assert_eq!(e.energy, 0);
    }

    #[test]
    fn test_empty_cell_carries_no_state() {
        assert_eq!(Entity::spawn(Kind::Empty, 100), Entity::EMPTY);
        assert_eq!(Entity::EMPTY.with_age(9), Entity::EMPTY);
        let mut e = Entity::herbivore(50).with_age(12);
        e.clear();
        assert_eq!(e, Entity::EMPTY);
    }

    #[test]
    fn test_plants_have_no_energy() {
        assert_eq!(Entity::spawn(Kind::Plant, 100).energy, 0);
    }

    #[test]
    fn test_prey_chain() {
        assert_eq!(Kind::Herbivore.prey(), Some(Kind::Plant));
        assert_eq!(Kind::Carnivore.prey(), Some(Kind::Herbivore));
        assert_eq!(Kind::Plant.prey(), None);
    }
}
