use crate::config::SimConfig;
use crate::error::{BcaError, BcaResult};
use crate::ion::Ion;
use crate::sample::{Sample, WireSample};
use nalgebra::Vector3;

/// Depth below the wire surface at which primaries start, Å.
const SURFACE_OFFSET: f64 = 0.5;

/// Monoenergetic beam striking a wire from above.
///
/// Every primary starts just under the upper wire surface at a uniform
/// random x and z and travels along `(0, -cos θ, sin θ)`, so θ = 0 is a
/// beam perpendicular to the wire axis.
#[derive(Debug, Clone, PartialEq)]
pub struct WireSource {
    /// Primary energy in eV
    pub energy: f64,
    /// Incidence angle in radians
    pub angle: f64,
    pub z: u32,
    /// Primary mass in amu
    pub mass: f64,
}

impl WireSource {
    pub fn new(energy: f64, angle_degrees: f64, z: u32, mass: f64) -> BcaResult<Self> {
        if !(energy > 0.0) || !energy.is_finite() {
            return Err(BcaError::Config(format!(
                "primary energy must be positive, got {}",
                energy
            )));
        }
        if !angle_degrees.is_finite() {
            return Err(BcaError::Config(format!(
                "incidence angle must be finite, got {}",
                angle_degrees
            )));
        }
        if z == 0 || !(mass > 0.0) {
            return Err(BcaError::InvalidElement(format!(
                "primary needs Z >= 1 and positive mass, got Z={} m={}",
                z, mass
            )));
        }
        Ok(WireSource {
            energy,
            angle: angle_degrees.to_radians(),
            z,
            mass,
        })
    }

    pub fn direction(&self) -> Vector3<f64> {
        Vector3::new(0.0, -self.angle.cos(), self.angle.sin())
    }

    /// Draw one primary for `wire`.
    pub fn sample<R: rand::Rng + ?Sized>(
        &self,
        wire: &WireSample,
        config: &SimConfig,
        rng: &mut R,
    ) -> BcaResult<Ion> {
        let [w, _, d] = wire.extents();
        let x = rng.gen::<f64>() * w;
        let z = rng.gen::<f64>() * d;
        let surface = wire
            .surface_height(x)
            .ok_or(BcaError::DegenerateSampling {
                what: "source x",
                value: x,
            })?;
        let y = surface - SURFACE_OFFSET;

        let mut ion = Ion::new(
            self.z,
            self.mass,
            self.energy,
            Vector3::new(x, y, z),
            self.direction(),
        )?;
        ion.set_cutoff_energy(config);
        Ok(ion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::material::Material;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn copper_wire(diameter: f64) -> WireSample {
        let mut material = Material::new(8.92).unwrap();
        material.add_element(Element::new(29, 63.546, 1.0).unwrap()).unwrap();
        material.prepare().unwrap();
        let mut wire = WireSample::new(diameter, diameter, 100.0).unwrap();
        wire.add_material(material).unwrap();
        wire
    }

    #[test]
    fn test_source_construction() {
        let source = WireSource::new(1.0e4, 90.0, 29, 63.546).unwrap();
        assert!((source.angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        let dir = source.direction();
        assert!(dir.y.abs() < 1e-12);
        assert!((dir.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_sources() {
        assert!(WireSource::new(0.0, 0.0, 29, 63.546).is_err());
        assert!(WireSource::new(1.0e4, f64::NAN, 29, 63.546).is_err());
        assert!(WireSource::new(1.0e4, 0.0, 0, 63.546).is_err());
        assert!(WireSource::new(1.0e4, 0.0, 29, -1.0).is_err());
    }

    #[test]
    fn test_primaries_start_under_the_surface() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = SimConfig::default();
        let source = WireSource::new(1.0e4, 0.0, 29, 63.546).unwrap();
        let wire = copper_wire(60.0);

        for _ in 0..100 {
            let ion = source.sample(&wire, &config, &mut rng).unwrap();
            let p = ion.position;
            assert!(p.x >= 0.0 && p.x < 60.0);
            assert!(p.z >= 0.0 && p.z < 100.0);
            let u = 2.0 * p.x / 60.0 - 1.0;
            let surface = 30.0 * (1.0 + (1.0 - u * u).sqrt());
            assert!((surface - p.y - 0.5).abs() < 1e-9);

            assert_eq!(ion.generation, 0);
            assert_eq!(ion.tag, -1);
            assert_eq!(ion.energy, 1.0e4);
            assert_eq!(ion.cutoff_energy, 5.0);
            assert!((ion.direction() - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_same_seed_same_primary() {
        let config = SimConfig::default();
        let source = WireSource::new(1.0e4, 30.0, 22, 47.867).unwrap();
        let wire = copper_wire(20.0);
        let a = source
            .sample(&wire, &config, &mut StdRng::seed_from_u64(7))
            .unwrap();
        let b = source
            .sample(&wire, &config, &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a, b);
    }
}
