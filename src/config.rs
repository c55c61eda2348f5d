// Simulation configuration: the tunable physics constants of a run.
use crate::data::atomic_number;
use crate::error::{BcaError, BcaResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Immutable physics configuration consumed by the cascade engine.
///
/// Every field has a serde default, so a JSON file only needs to name the
/// values it changes. The defaults are the usual TRIM choices: 25 eV
/// displacement threshold, 3 eV lattice binding and an ion cutoff energy of
/// `max(5 eV, 1e-5 * E0)`.
///
/// A single instance is built at startup (see [`SimConfig::from_file`]) and
/// shared by reference for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Lowest cutoff energy an ion may have, eV.
    pub cutoff_energy_floor: f64,
    /// Cutoff energy as a fraction of the ion's starting energy.
    pub cutoff_energy_fraction: f64,
    /// Energy a struck atom needs to leave its site, eV.
    pub displacement_energy: f64,
    /// Energy a displaced atom loses to the lattice, eV.
    pub lattice_binding_energy: f64,
    /// Per-element overrides of the two thresholds above.
    pub species: Vec<SpeciesThresholds>,
    /// Upper bound on collisions followed for a single ion.
    pub max_collisions_per_ion: usize,
    /// Shortest free flight path as a fraction of the mean atomic spacing.
    pub min_flight_path_fraction: f64,
    /// Smallest energy transfer worth following, eV. Sets the maximum
    /// impact parameter and with it the mean free path.
    pub min_energy_transfer: f64,
    /// Reduced energy above which the Rutherford cross section is used.
    pub rutherford_threshold: f64,
    /// Let a slowed same-species projectile take the struck atom's site.
    pub replacement_collisions: bool,
    /// Tabulated electronic stopping curves that replace Lindhard-Scharff.
    pub stopping_tables: Vec<StoppingTable>,
}

/// An element in a config file: an atomic number or a symbol such as `"Cu"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ElementRef {
    Z(u32),
    Symbol(String),
}

fn deserialize_element<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match ElementRef::deserialize(deserializer)? {
        ElementRef::Z(z) => Ok(z),
        ElementRef::Symbol(symbol) => atomic_number(&symbol)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown element '{}'", symbol))),
    }
}

/// Threshold overrides for one target element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesThresholds {
    #[serde(deserialize_with = "deserialize_element")]
    pub z: u32,
    #[serde(default)]
    pub displacement_energy: Option<f64>,
    #[serde(default)]
    pub lattice_binding_energy: Option<f64>,
}

/// Electronic stopping cross section of projectile `z1` in element `z2`.
///
/// `energies` in eV (ascending), `stopping` in eV Å² per atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoppingTable {
    #[serde(deserialize_with = "deserialize_element")]
    pub z1: u32,
    #[serde(deserialize_with = "deserialize_element")]
    pub z2: u32,
    pub energies: Vec<f64>,
    pub stopping: Vec<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            cutoff_energy_floor: 5.0,
            cutoff_energy_fraction: 1.0e-5,
            displacement_energy: 25.0,
            lattice_binding_energy: 3.0,
            species: Vec::new(),
            max_collisions_per_ion: 100_000,
            min_flight_path_fraction: 1.0e-3,
            min_energy_transfer: 1.0,
            rutherford_threshold: 10.0,
            replacement_collisions: false,
            stopping_tables: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> BcaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> BcaResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BcaResult<()> {
        if !(self.cutoff_energy_floor > 0.0) {
            return Err(BcaError::Config(format!(
                "cutoff_energy_floor must be positive, got {}",
                self.cutoff_energy_floor
            )));
        }
        if !(self.cutoff_energy_fraction >= 0.0) {
            return Err(BcaError::Config(
                "cutoff_energy_fraction cannot be negative".to_string(),
            ));
        }
        if self.max_collisions_per_ion == 0 {
            return Err(BcaError::Config(
                "max_collisions_per_ion must be at least 1".to_string(),
            ));
        }
        if !(self.min_flight_path_fraction > 0.0) {
            return Err(BcaError::Config(
                "min_flight_path_fraction must be positive".to_string(),
            ));
        }
        if !(self.min_energy_transfer > 0.0) {
            return Err(BcaError::Config(
                "min_energy_transfer must be positive".to_string(),
            ));
        }
        let thresholds = std::iter::once((self.displacement_energy, self.lattice_binding_energy))
            .chain(self.species.iter().map(|s| {
                (
                    self.displacement_energy(s.z),
                    self.lattice_binding_energy(s.z),
                )
            }));
        for (ed, eb) in thresholds {
            if !(ed >= 0.0) || !(eb >= 0.0) {
                return Err(BcaError::Config(format!(
                    "displacement and binding energies cannot be negative (Ed={}, Eb={})",
                    ed, eb
                )));
            }
            if eb > ed {
                return Err(BcaError::Config(format!(
                    "lattice binding energy {} exceeds displacement energy {}",
                    eb, ed
                )));
            }
        }
        for table in &self.stopping_tables {
            if table.energies.len() != table.stopping.len() || table.energies.len() < 2 {
                return Err(BcaError::Config(format!(
                    "stopping table {}->{} needs matching energy/stopping columns with at least two rows",
                    table.z1, table.z2
                )));
            }
            if table.energies.windows(2).any(|w| w[1] <= w[0]) {
                return Err(BcaError::Config(format!(
                    "stopping table {}->{} energies must be strictly ascending",
                    table.z1, table.z2
                )));
            }
            if table.energies[0] <= 0.0 || table.stopping.iter().any(|&s| s <= 0.0) {
                return Err(BcaError::Config(format!(
                    "stopping table {}->{} must be positive for log-log interpolation",
                    table.z1, table.z2
                )));
            }
        }
        Ok(())
    }

    /// Cutoff energy for an ion starting with `energy` eV.
    pub fn cutoff_energy(&self, energy: f64) -> f64 {
        self.cutoff_energy_floor
            .max(self.cutoff_energy_fraction * energy)
    }

    pub fn displacement_energy(&self, z: u32) -> f64 {
        self.species
            .iter()
            .find(|s| s.z == z)
            .and_then(|s| s.displacement_energy)
            .unwrap_or(self.displacement_energy)
    }

    pub fn lattice_binding_energy(&self, z: u32) -> f64 {
        self.species
            .iter()
            .find(|s| s.z == z)
            .and_then(|s| s.lattice_binding_energy)
            .unwrap_or(self.lattice_binding_energy)
    }

    pub fn stopping_table(&self, z1: u32, z2: u32) -> Option<&StoppingTable> {
        self.stopping_tables
            .iter()
            .find(|t| t.z1 == z1 && t.z2 == z2)
    }
}
