//! Configuration management for simulation parameters.
//!
//! Strongly-typed structures that map to `config.toml`. Every section is
//! optional; missing sections fall back to the built-in rule constants.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [grid]
//! rows = 15
//! cols = 15
//! seed = 42
//! deterministic = true
//!
//! [plant]
//! max_age = 10
//! reproduction_probability = 0.2
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Largest supported grid side.
pub const MAX_GRID_SIZE: usize = 15;

/// How a tick walks the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerMode {
    /// Single-threaded row-major sweep. No locks.
    #[default]
    Sequential,
    /// One rayon task per cell, each locking its 5-cell neighborhood.
    Parallel,
}

/// Grid dimensions and random-source settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub seed: Option<u64>,
    /// Reseed the random source from `seed` and the tick number every tick.
    pub deterministic: bool,
    pub scheduler: SchedulerMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: MAX_GRID_SIZE,
            cols: MAX_GRID_SIZE,
            seed: None,
            deterministic: false,
            scheduler: SchedulerMode::Sequential,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlantConfig {
    pub max_age: u32,
    pub reproduction_probability: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            max_age: 10,
            reproduction_probability: 0.2,
        }
    }
}

/// Rules shared by herbivores and carnivores.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnimalConfig {
    pub max_age: u32,
    pub eat_probability: f64,
    pub reproduction_probability: f64,
    pub move_probability: f64,
    /// Energy gained per neighbor eaten.
    pub eat_gain: i32,
    /// Energy the parent pays per offspring.
    pub reproduction_cost: i32,
    pub move_cost: i32,
    pub offspring_energy: i32,
}

impl AnimalConfig {
    #[must_use]
    pub fn herbivore() -> Self {
        Self {
            max_age: 50,
            eat_probability: 0.9,
            reproduction_probability: 0.075,
            move_probability: 0.7,
            eat_gain: 30,
            reproduction_cost: 10,
            move_cost: 5,
            offspring_energy: 100,
        }
    }

    #[must_use]
    pub fn carnivore() -> Self {
        Self {
            max_age: 80,
            eat_probability: 1.0,
            reproduction_probability: 0.025,
            move_probability: 0.5,
            ..Self::herbivore()
        }
    }
}

/// An animal section as written in TOML. Fields left out keep the species
/// defaults.
#[derive(Deserialize, Debug, Default)]
struct AnimalOverrides {
    max_age: Option<u32>,
    eat_probability: Option<f64>,
    reproduction_probability: Option<f64>,
    move_probability: Option<f64>,
    eat_gain: Option<i32>,
    reproduction_cost: Option<i32>,
    move_cost: Option<i32>,
    offspring_energy: Option<i32>,
}

impl AnimalOverrides {
    fn apply(self, base: AnimalConfig) -> AnimalConfig {
        AnimalConfig {
            max_age: self.max_age.unwrap_or(base.max_age),
            eat_probability: self.eat_probability.unwrap_or(base.eat_probability),
            reproduction_probability: self
                .reproduction_probability
                .unwrap_or(base.reproduction_probability),
            move_probability: self.move_probability.unwrap_or(base.move_probability),
            eat_gain: self.eat_gain.unwrap_or(base.eat_gain),
            reproduction_cost: self.reproduction_cost.unwrap_or(base.reproduction_cost),
            move_cost: self.move_cost.unwrap_or(base.move_cost),
            offspring_energy: self.offspring_energy.unwrap_or(base.offspring_energy),
        }
    }
}

fn herbivore_section<'de, D: Deserializer<'de>>(d: D) -> Result<AnimalConfig, D::Error> {
    AnimalOverrides::deserialize(d).map(|o| o.apply(AnimalConfig::herbivore()))
}

fn carnivore_section<'de, D: Deserializer<'de>>(d: D) -> Result<AnimalConfig, D::Error> {
    AnimalOverrides::deserialize(d).map(|o| o.apply(AnimalConfig::carnivore()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EnergyConfig {
    pub max_energy: i32,
    pub reproduction_threshold: i32,
    /// Energy of animals placed by a seed request.
    pub initial_energy: i32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max_energy: 200,
            reproduction_threshold: 20,
            initial_energy: 100,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Directory served at `/`.
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            static_dir: "public".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    /// Ticks between info-level summaries.
    pub log_interval: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { log_interval: 100 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub plant: PlantConfig,
    #[serde(deserialize_with = "herbivore_section")]
    pub herbivore: AnimalConfig,
    #[serde(deserialize_with = "carnivore_section")]
    pub carnivore: AnimalConfig,
    pub energy: EnergyConfig,
    pub server: ServerConfig,
    pub metrics: MetricsConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            plant: PlantConfig::default(),
            herbivore: AnimalConfig::herbivore(),
            carnivore: AnimalConfig::carnivore(),
            energy: EnergyConfig::default(),
            server: ServerConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

fn ensure_probability(value: f64, name: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&value),
        "{name} must be in [0.0, 1.0], got {value}"
    );
    Ok(())
}

fn validate_animal(animal: &AnimalConfig, species: &str) -> anyhow::Result<()> {
    anyhow::ensure!(animal.max_age > 0, "{species} max age must be positive");
    ensure_probability(animal.eat_probability, &format!("{species} eat probability"))?;
    ensure_probability(
        animal.reproduction_probability,
        &format!("{species} reproduction probability"),
    )?;
    ensure_probability(animal.move_probability, &format!("{species} move probability"))?;
    anyhow::ensure!(animal.eat_gain >= 0, "{species} eat gain must be non-negative");
    anyhow::ensure!(
        animal.reproduction_cost >= 0,
        "{species} reproduction cost must be non-negative"
    );
    anyhow::ensure!(animal.move_cost >= 0, "{species} move cost must be non-negative");
    anyhow::ensure!(
        animal.offspring_energy > 0,
        "{species} offspring energy must be positive"
    );
    Ok(())
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// # Validation Rules
    /// - Grid sides must be in `1..=15`
    /// - Probabilities must be in `[0.0, 1.0]`
    /// - Costs and gains must be non-negative, energy caps positive
    /// - Parallel scheduling cannot be combined with deterministic replay
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.grid.rows > 0, "Grid rows must be positive");
        anyhow::ensure!(
            self.grid.rows <= MAX_GRID_SIZE,
            "Grid rows too large (max {MAX_GRID_SIZE})"
        );
        anyhow::ensure!(self.grid.cols > 0, "Grid cols must be positive");
        anyhow::ensure!(
            self.grid.cols <= MAX_GRID_SIZE,
            "Grid cols too large (max {MAX_GRID_SIZE})"
        );
        anyhow::ensure!(
            !(self.grid.deterministic && self.grid.scheduler == SchedulerMode::Parallel),
            "Deterministic replay requires the sequential scheduler"
        );
        anyhow::ensure!(
            !self.grid.deterministic || self.grid.seed.is_some(),
            "Deterministic replay requires a seed"
        );

        anyhow::ensure!(self.plant.max_age > 0, "Plant max age must be positive");
        ensure_probability(
            self.plant.reproduction_probability,
            "Plant reproduction probability",
        )?;

        validate_animal(&self.herbivore, "Herbivore")?;
        validate_animal(&self.carnivore, "Carnivore")?;

        anyhow::ensure!(self.energy.max_energy > 0, "Max energy must be positive");
        anyhow::ensure!(
            self.energy.reproduction_threshold >= 0,
            "Reproduction threshold must be non-negative"
        );
        anyhow::ensure!(
            self.energy.initial_energy > 0 && self.energy.initial_energy <= self.energy.max_energy,
            "Initial energy must be in (0, max_energy]"
        );
        anyhow::ensure!(
            self.herbivore.offspring_energy <= self.energy.max_energy
                && self.carnivore.offspring_energy <= self.energy.max_energy,
            "Offspring energy cannot exceed max energy"
        );

        anyhow::ensure!(
            self.metrics.log_interval > 0,
            "Metrics log interval must be positive"
        );
        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path, "No config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Hash of the rule parameters. Two configs with the same fingerprint
    /// evolve a grid identically given the same random stream.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.plant).as_bytes());
        hasher.update(format!("{:?}", self.herbivore).as_bytes());
        hasher.update(format!("{:?}", self.carnivore).as_bytes());
        hasher.update(format!("{:?}", self.energy).as_bytes());
        hex::encode(hasher.finalize())
    }
}
