// Continuous electronic energy loss
//
// Stopping cross sections are in eV Å² per atom; multiplied by the atomic
// density (atoms/Å³) they give dE/dx in eV/Å.

use crate::config::SimConfig;
use crate::error::BcaResult;
use crate::material::Material;
use crate::utilities::interpolate_log_log;

/// Lindhard-Scharff electronic stopping cross section of projectile
/// (`z1`, `m1`) at `energy` eV in element `z2`.
///
/// S_e = 1.212 Z1^(7/6) Z2 / (Z1^(2/3) + Z2^(2/3))^(3/2) * sqrt(E / M1)
pub fn lindhard_scharff(z1: u32, m1: f64, z2: u32, energy: f64) -> f64 {
    if energy <= 0.0 {
        return 0.0;
    }
    let z1 = z1 as f64;
    let z2 = z2 as f64;
    let k = 1.212 * z1.powf(7.0 / 6.0) * z2
        / (z1.powf(2.0 / 3.0) + z2.powf(2.0 / 3.0)).powf(1.5);
    k * (energy / m1).sqrt()
}

/// Stopping cross section for one projectile/target pair: the configured
/// table when there is one, Lindhard-Scharff otherwise.
pub fn stopping_cross_section(config: &SimConfig, z1: u32, m1: f64, z2: u32, energy: f64) -> f64 {
    match config.stopping_table(z1, z2) {
        Some(table) => interpolate_log_log(&table.energies, &table.stopping, energy),
        None => lindhard_scharff(z1, m1, z2, energy),
    }
}

/// Stopping cross section of a compound by Bragg additivity: the
/// atomic-fraction weighted sum over its elements.
pub fn material_stopping_cross_section(
    config: &SimConfig,
    z1: u32,
    m1: f64,
    material: &Material,
    energy: f64,
) -> BcaResult<f64> {
    let fractions = material.atomic_fractions()?;
    Ok(material
        .elements()
        .iter()
        .zip(fractions)
        .map(|(element, fraction)| {
            fraction * stopping_cross_section(config, z1, m1, element.z, energy)
        })
        .sum())
}

/// Energy lost to electrons over a flight of `path_length` Å, evaluated at
/// the energy at the start of the flight. Never exceeds `energy`.
pub fn electronic_energy_loss(
    config: &SimConfig,
    z1: u32,
    m1: f64,
    energy: f64,
    material: &Material,
    path_length: f64,
) -> BcaResult<f64> {
    let se = material_stopping_cross_section(config, z1, m1, material, energy)?;
    let loss = path_length * material.atomic_density()? * se;
    Ok(loss.clamp(0.0, energy.max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoppingTable;
    use crate::element::Element;

    fn copper() -> Material {
        let mut material = Material::new(8.92).unwrap();
        material.add_element(Element::new(29, 63.546, 1.0).unwrap()).unwrap();
        material.prepare().unwrap();
        material
    }

    #[test]
    fn test_lindhard_scharff_scales_with_velocity() {
        let s1 = lindhard_scharff(29, 63.546, 29, 1000.0);
        let s4 = lindhard_scharff(29, 63.546, 29, 4000.0);
        assert!(s1 > 0.0);
        assert!((s4 / s1 - 2.0).abs() < 1e-12);
        assert_eq!(lindhard_scharff(29, 63.546, 29, 0.0), 0.0);
    }

    #[test]
    fn test_proton_in_silicon_magnitude() {
        // roughly 1e-14 eV cm² = 100 eV Å² at 10 keV
        let s = lindhard_scharff(1, 1.008, 14, 1.0e4);
        assert!(s > 50.0 && s < 200.0, "S = {}", s);
    }

    #[test]
    fn test_table_overrides_lindhard_scharff() {
        let config = SimConfig {
            stopping_tables: vec![StoppingTable {
                z1: 29,
                z2: 29,
                energies: vec![10.0, 1.0e6],
                stopping: vec![1.0, 1.0],
            }],
            ..SimConfig::default()
        };
        assert!((stopping_cross_section(&config, 29, 63.546, 29, 5000.0) - 1.0).abs() < 1e-12);
        // other pairs keep the analytic form
        let analytic = lindhard_scharff(29, 63.546, 22, 5000.0);
        assert_eq!(stopping_cross_section(&config, 29, 63.546, 22, 5000.0), analytic);
    }

    #[test]
    fn test_bragg_additivity() {
        let config = SimConfig::default();
        let mut alloy = Material::new(7.0).unwrap();
        alloy.add_element(Element::new(29, 63.546, 1.0).unwrap()).unwrap();
        alloy.add_element(Element::new(22, 47.867, 3.0).unwrap()).unwrap();
        alloy.prepare().unwrap();
        let expected = 0.25 * lindhard_scharff(29, 63.546, 29, 2000.0)
            + 0.75 * lindhard_scharff(29, 63.546, 22, 2000.0);
        let s = material_stopping_cross_section(&config, 29, 63.546, &alloy, 2000.0).unwrap();
        assert!((s - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn test_energy_loss_is_clamped() {
        let config = SimConfig::default();
        let material = copper();
        let small = electronic_energy_loss(&config, 29, 63.546, 1.0e4, &material, 1.0).unwrap();
        assert!(small > 0.0 && small < 1.0e4);
        let huge = electronic_energy_loss(&config, 29, 63.546, 10.0, &material, 1.0e9).unwrap();
        assert_eq!(huge, 10.0);
    }

    #[test]
    fn test_unprepared_material_fails() {
        let config = SimConfig::default();
        let material = Material::new(8.92).unwrap();
        assert!(electronic_energy_loss(&config, 29, 63.546, 100.0, &material, 1.0).is_err());
    }
}
