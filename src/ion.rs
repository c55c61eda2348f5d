use crate::config::SimConfig;
use crate::error::{BcaError, BcaResult};
use nalgebra::Vector3;

/// One ion or recoil atom in flight.
///
/// The direction is kept at unit length: it can only be replaced through
/// [`Ion::set_direction`], which normalises and rejects degenerate vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Ion {
    /// Atomic number
    pub z: u32,
    /// Mass in amu
    pub mass: f64,
    /// Kinetic energy in eV
    pub energy: f64,
    /// Sample-local position in Å
    pub position: Vector3<f64>,
    direction: Vector3<f64>,
    /// 0 for a primary, parent generation + 1 for a recoil
    pub generation: u32,
    /// Lineage label, carried unchanged to recoils
    pub tag: i64,
    /// The ion is at rest once its energy drops to this value, eV
    pub cutoff_energy: f64,
}

impl Ion {
    pub fn new(
        z: u32,
        mass: f64,
        energy: f64,
        position: Vector3<f64>,
        direction: Vector3<f64>,
    ) -> BcaResult<Self> {
        if z == 0 || !(mass > 0.0) {
            return Err(BcaError::InvalidElement(format!(
                "ion needs Z >= 1 and positive mass, got Z={} m={}",
                z, mass
            )));
        }
        let mut ion = Ion {
            z,
            mass,
            energy,
            position,
            direction: Vector3::z(),
            generation: 0,
            tag: -1,
            cutoff_energy: 0.0,
        };
        ion.set_direction(direction)?;
        Ok(ion)
    }

    pub fn direction(&self) -> &Vector3<f64> {
        &self.direction
    }

    /// Replace the direction with the normalised `direction`.
    pub fn set_direction(&mut self, direction: Vector3<f64>) -> BcaResult<()> {
        let norm = direction.norm();
        if !(norm > 0.0) || !norm.is_finite() {
            return Err(BcaError::DegenerateSampling {
                what: "direction norm",
                value: norm,
            });
        }
        self.direction = direction / norm;
        Ok(())
    }

    /// Set the rest energy from the configured floor and fraction of the
    /// current energy.
    pub fn set_cutoff_energy(&mut self, config: &SimConfig) {
        self.cutoff_energy = config.cutoff_energy(self.energy);
    }

    pub fn is_stopped(&self) -> bool {
        self.energy <= self.cutoff_energy
    }

    /// Advance along the current direction by `length` Å.
    pub fn move_by(&mut self, length: f64) {
        self.position += self.direction * length;
    }

    /// Build the record for an atom knocked out by this ion at its current
    /// position.
    pub fn spawn_recoil(
        &self,
        z: u32,
        mass: f64,
        energy: f64,
        direction: Vector3<f64>,
    ) -> BcaResult<Ion> {
        let mut recoil = Ion::new(z, mass, energy, self.position, direction)?;
        recoil.generation = self.generation + 1;
        recoil.tag = self.tag;
        Ok(recoil)
    }
}
