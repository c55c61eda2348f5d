// Cascade engine
//
// Follows one ion through the sample collision by collision: free flight,
// electronic loss along the flight, then an elastic collision with an atom
// drawn from the local material. Struck atoms that receive more than their
// displacement energy are banked as recoils and leave a vacancy behind.

use crate::bank::IonBank;
use crate::config::SimConfig;
use crate::damage::DamageGrid;
use crate::element::Element;
use crate::error::{BcaError, BcaResult};
use crate::ion::Ion;
use crate::material::Material;
use crate::physics;
use crate::sample::Sample;
use crate::stopping;
use log::{trace, warn};
use rand::Rng;
use rand_distr::{Distribution, Exp};
use std::f64::consts::PI;

/// Why [`Trim::advance`] handed an ion back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Energy fell to the cutoff inside the sample.
    Stopped,
    /// The ion left the sample.
    Exited,
    /// The ion dropped into the site of a same-species atom it knocked out.
    Replaced,
    /// The per-ion collision cap was reached.
    CollisionLimit,
}

/// Counters accumulated over every ion the engine has advanced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeStatistics {
    pub collisions: u64,
    pub displacements: u64,
    pub replacements: u64,
    pub capped: u64,
}

/// One sampled free flight.
#[derive(Debug, Clone, Copy)]
struct Flight {
    path_length: f64,
    max_impact_parameter: f64,
}

/// Binary-collision transport through a [`Sample`].
///
/// The engine owns the vacancy grid: every displacement is binned at the
/// collision site under the struck species.
pub struct Trim<'a, S: Sample + ?Sized> {
    config: &'a SimConfig,
    sample: &'a S,
    vacancies: DamageGrid,
    statistics: CascadeStatistics,
}

impl<'a, S: Sample + ?Sized> Trim<'a, S> {
    pub fn new(config: &'a SimConfig, sample: &'a S, vacancies: DamageGrid) -> Self {
        Trim {
            config,
            sample,
            vacancies,
            statistics: CascadeStatistics::default(),
        }
    }

    pub fn vacancies(&self) -> &DamageGrid {
        &self.vacancies
    }

    pub fn into_vacancies(self) -> DamageGrid {
        self.vacancies
    }

    pub fn statistics(&self) -> &CascadeStatistics {
        &self.statistics
    }

    /// Transport `ion` until it stops, leaves the sample, or hits the
    /// collision cap. Recoils go into `bank`.
    ///
    /// A [`BcaError::DegenerateSampling`] means this trajectory is unusable;
    /// the caller drops the ion. Recoils banked before the error stand.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        ion: &mut Ion,
        bank: &mut IonBank,
        rng: &mut R,
    ) -> BcaResult<Termination> {
        let sample = self.sample;
        let mut collisions = 0usize;
        loop {
            let Some(material) = sample.lookup_material(&ion.position) else {
                return Ok(Termination::Exited);
            };
            if ion.is_stopped() {
                return Ok(Termination::Stopped);
            }
            if collisions >= self.config.max_collisions_per_ion {
                warn!(
                    "ion Z={} (generation {}) hit the cap of {} collisions with {:.3} eV left",
                    ion.z, ion.generation, collisions, ion.energy
                );
                self.statistics.capped += 1;
                return Ok(Termination::CollisionLimit);
            }

            let flight = self.sample_flight(ion, material, rng)?;
            let loss = stopping::electronic_energy_loss(
                self.config,
                ion.z,
                ion.mass,
                ion.energy,
                material,
                flight.path_length,
            )?;
            ion.energy -= loss;
            ion.move_by(flight.path_length);
            sample.apply_boundaries(&mut ion.position);

            // the collision happens in whatever material is at the new site
            let Some(site) = sample.lookup_material(&ion.position) else {
                return Ok(Termination::Exited);
            };
            if ion.is_stopped() {
                return Ok(Termination::Stopped);
            }
            let partner = site.sample_element(rng)?;
            collisions += 1;
            if self.collide(ion, partner, flight.max_impact_parameter, bank, rng)? {
                return Ok(Termination::Replaced);
            }
        }
    }

    fn sample_flight<R: Rng + ?Sized>(
        &self,
        ion: &Ion,
        material: &Material,
        rng: &mut R,
    ) -> BcaResult<Flight> {
        if !ion.energy.is_finite() {
            return Err(BcaError::DegenerateSampling {
                what: "ion energy",
                value: ion.energy,
            });
        }
        let density = material.atomic_density()?;
        let (max_impact_parameter, mean_free_path) = physics::free_flight_parameters(
            ion.energy,
            ion.z as f64,
            ion.mass,
            material.mean_z()?,
            material.mean_mass()?,
            density,
            self.config.min_energy_transfer,
        );
        if !(mean_free_path > 0.0) || !mean_free_path.is_finite() {
            return Err(BcaError::DegenerateSampling {
                what: "mean free path",
                value: mean_free_path,
            });
        }
        let exp = Exp::new(1.0 / mean_free_path).map_err(|_| BcaError::DegenerateSampling {
            what: "mean free path",
            value: mean_free_path,
        })?;
        let floor = self.config.min_flight_path_fraction * material.atomic_spacing()?;
        let path_length = exp.sample(rng).max(floor);
        if !path_length.is_finite() {
            return Err(BcaError::DegenerateSampling {
                what: "flight path",
                value: path_length,
            });
        }
        Ok(Flight {
            path_length,
            max_impact_parameter,
        })
    }

    /// Elastic collision with `partner` at the ion's current position.
    /// Returns true when the ion replaced the struck atom.
    fn collide<R: Rng + ?Sized>(
        &mut self,
        ion: &mut Ion,
        partner: &Element,
        max_impact_parameter: f64,
        bank: &mut IonBank,
        rng: &mut R,
    ) -> BcaResult<bool> {
        let z1 = ion.z as f64;
        let z2 = partner.z as f64;
        let a = physics::screening_length(z1, z2);
        let eps = physics::reduced_energy(ion.energy, ion.mass, partner.mass, z1, z2, a);
        let impact = max_impact_parameter * rng.gen::<f64>().sqrt();
        let b = impact / a;
        let sin2_half = if eps > self.config.rutherford_threshold {
            physics::rutherford_sin2_half(eps, b)
        } else {
            physics::magic_sin2_half(eps, b)
        };
        if !sin2_half.is_finite() {
            return Err(BcaError::DegenerateSampling {
                what: "scattering angle",
                value: sin2_half,
            });
        }

        let collision = physics::binary_collision(ion.energy, ion.mass, partner.mass, sin2_half);
        let azimuth = 2.0 * PI * rng.gen::<f64>();
        let incoming = *ion.direction();
        ion.set_direction(physics::rotate_direction_3d(
            &incoming,
            collision.projectile_cos,
            azimuth,
        ))?;
        ion.energy = collision.projectile_energy;
        self.statistics.collisions += 1;

        let displacement_energy = self.config.displacement_energy(partner.z);
        if collision.energy_transfer <= displacement_energy {
            return Ok(false);
        }

        let replaced = self.config.replacement_collisions
            && ion.z == partner.z
            && ion.energy < displacement_energy;
        if replaced {
            ion.energy = 0.0;
            self.statistics.replacements += 1;
        } else {
            self.vacancies
                .record(&ion.position, self.sample.extents(), partner.z);
            self.statistics.displacements += 1;
        }

        let recoil_energy =
            collision.energy_transfer - self.config.lattice_binding_energy(partner.z);
        let recoil_direction =
            physics::rotate_direction_3d(&incoming, collision.recoil_cos, azimuth + PI);
        let mut recoil = ion.spawn_recoil(partner.z, partner.mass, recoil_energy, recoil_direction)?;
        recoil.set_cutoff_energy(self.config);
        trace!(
            "Z={} knocked out Z={} with {:.2} eV at {:?}",
            ion.z,
            partner.z,
            recoil.energy,
            recoil.position
        );
        bank.bank_recoil(recoil);
        Ok(replaced)
    }
}
