use crate::element::Element;
use crate::error::{BcaError, BcaResult};

/// Avogadro constant, 1/mol
const AVOGADRO: f64 = 6.02214076e23;
/// Å^3 per cm^3
const ANGSTROM3_PER_CM3: f64 = 1.0e24;

/// A homogeneous region of the target: a list of elements plus a bulk
/// mass density.
///
/// A `Material` starts empty; elements are added with
/// [`Material::add_element`] and the composition is then frozen with
/// [`Material::prepare`], which normalises the stoichiometric weights into
/// atomic fractions and precomputes everything collision sampling needs.
///
/// Typical workflow:
/// 1. Create with [`Material::new`] (density in g/cm³).
/// 2. Add every element.
/// 3. Call [`Material::prepare`] exactly once.
/// 4. Sample collision partners with [`Material::sample_element`].
///
/// Sampling methods fail with [`BcaError::MaterialNotPrepared`] rather than
/// drawing against empty weights.
#[derive(Debug, Clone)]
pub struct Material {
    /// Optional name of the material
    pub name: Option<String>,
    /// Density in g/cm³
    density: f64,
    elements: Vec<Element>,
    prepared: Option<PreparedComposition>,
}

/// Derived quantities, valid only after `prepare()`.
#[derive(Debug, Clone, PartialEq)]
struct PreparedComposition {
    fractions: Vec<f64>,
    cumulative: Vec<f64>,
    /// atoms/Å^3
    atomic_density: f64,
    mean_mass: f64,
    mean_z: f64,
}

impl Material {
    pub fn new(density: f64) -> BcaResult<Self> {
        if !(density > 0.0) || !density.is_finite() {
            return Err(BcaError::Config(format!(
                "Density must be positive, got {}",
                density
            )));
        }
        Ok(Material {
            name: None,
            density,
            elements: Vec::new(),
            prepared: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn add_element(&mut self, element: Element) -> BcaResult<()> {
        if self.prepared.is_some() {
            return Err(BcaError::MaterialAlreadyPrepared);
        }
        self.elements.push(element);
        Ok(())
    }

    /// Freeze the composition and build the sampling table.
    pub fn prepare(&mut self) -> BcaResult<()> {
        if self.prepared.is_some() {
            return Err(BcaError::MaterialAlreadyPrepared);
        }
        if self.elements.is_empty() {
            return Err(BcaError::EmptyMaterial);
        }

        let total_weight: f64 = self.elements.iter().map(|e| e.weight).sum();
        let fractions: Vec<f64> = self
            .elements
            .iter()
            .map(|e| e.weight / total_weight)
            .collect();

        let mut cumulative = Vec::with_capacity(fractions.len());
        let mut accum = 0.0;
        for &fraction in &fractions {
            accum += fraction;
            cumulative.push(accum);
        }
        // absorb rounding so the last bin always catches u < 1
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }

        let mean_mass: f64 = self
            .elements
            .iter()
            .zip(&fractions)
            .map(|(e, f)| e.mass * f)
            .sum();
        let mean_z: f64 = self
            .elements
            .iter()
            .zip(&fractions)
            .map(|(e, f)| e.z as f64 * f)
            .sum();
        let atomic_density = self.density * AVOGADRO / mean_mass / ANGSTROM3_PER_CM3;

        self.prepared = Some(PreparedComposition {
            fractions,
            cumulative,
            atomic_density,
            mean_mass,
            mean_z,
        });
        Ok(())
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    fn composition(&self) -> BcaResult<&PreparedComposition> {
        self.prepared.as_ref().ok_or(BcaError::MaterialNotPrepared)
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Normalised atomic fractions, in element order.
    pub fn atomic_fractions(&self) -> BcaResult<&[f64]> {
        Ok(&self.composition()?.fractions)
    }

    /// Atomic number density in atoms/Å^3.
    pub fn atomic_density(&self) -> BcaResult<f64> {
        Ok(self.composition()?.atomic_density)
    }

    /// Mean interatomic spacing N^(-1/3) in Å.
    pub fn atomic_spacing(&self) -> BcaResult<f64> {
        Ok(self.composition()?.atomic_density.powf(-1.0 / 3.0))
    }

    /// Fraction-weighted mean atomic mass in amu.
    pub fn mean_mass(&self) -> BcaResult<f64> {
        Ok(self.composition()?.mean_mass)
    }

    /// Fraction-weighted mean atomic number.
    pub fn mean_z(&self) -> BcaResult<f64> {
        Ok(self.composition()?.mean_z)
    }

    /// Pick the element the moving ion collides with, weighted by atomic
    /// fraction (cumulative-weight inversion against one uniform draw).
    pub fn sample_element<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> BcaResult<&Element> {
        let composition = self.composition()?;
        let xi: f64 = rng.gen();
        let index = composition
            .cumulative
            .iter()
            .position(|&c| xi < c)
            .unwrap_or(composition.cumulative.len() - 1);
        Ok(&self.elements[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn alloy() -> Material {
        let mut mat = Material::new(8.0).unwrap().with_name("CuTiAg");
        mat.add_element(Element::new(29, 63.546, 56.0).unwrap()).unwrap();
        mat.add_element(Element::new(22, 47.867, 38.0).unwrap()).unwrap();
        mat.add_element(Element::new(47, 107.87, 8.0).unwrap()).unwrap();
        mat.prepare().unwrap();
        mat
    }

    #[test]
    fn test_invalid_density() {
        assert!(Material::new(0.0).is_err());
        assert!(Material::new(-1.0).is_err());
        assert!(Material::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_unprepared_material_refuses_sampling() {
        let mut mat = Material::new(8.92).unwrap();
        mat.add_element(Element::new(29, 63.546, 1.0).unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            mat.sample_element(&mut rng),
            Err(BcaError::MaterialNotPrepared)
        ));
        assert!(mat.atomic_density().is_err());
    }

    #[test]
    fn test_prepare_twice_is_an_error() {
        let mut mat = alloy();
        assert!(matches!(
            mat.prepare(),
            Err(BcaError::MaterialAlreadyPrepared)
        ));
        assert!(mat
            .add_element(Element::new(8, 16.0, 1.0).unwrap())
            .is_err());
    }

    #[test]
    fn test_empty_material() {
        let mut mat = Material::new(1.0).unwrap();
        assert!(matches!(mat.prepare(), Err(BcaError::EmptyMaterial)));
    }

    #[test]
    fn test_fractions_are_normalised() {
        let mat = alloy();
        let fractions = mat.atomic_fractions().unwrap();
        assert!((fractions.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((fractions[0] - 56.0 / 102.0).abs() < 1e-12);
        assert!((fractions[2] - 8.0 / 102.0).abs() < 1e-12);
    }

    #[test]
    fn test_copper_atomic_density() {
        let mut cu = Material::new(8.92).unwrap();
        cu.add_element(Element::new(29, 63.546, 1.0).unwrap()).unwrap();
        cu.prepare().unwrap();
        // 8.45e22 atoms/cm3
        assert!((cu.atomic_density().unwrap() - 0.08453).abs() < 1e-4);
        assert!((cu.atomic_spacing().unwrap() - 2.278).abs() < 1e-2);
        assert_eq!(cu.mean_z().unwrap(), 29.0);
    }

    #[test]
    fn test_sample_element_boundaries() {
        let mat = alloy();
        // StepRng(0, 0) always yields 0 -> first element
        let mut low = StepRng::new(0, 0);
        assert_eq!(mat.sample_element(&mut low).unwrap().z, 29);
        // all bits set -> u just below 1 -> last element
        let mut high = StepRng::new(u64::MAX, 0);
        assert_eq!(mat.sample_element(&mut high).unwrap().z, 47);
    }

    #[test]
    fn test_sample_element_frequencies() {
        let mat = alloy();
        let mut rng = StdRng::seed_from_u64(7);
        let n = 100_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            match mat.sample_element(&mut rng).unwrap().z {
                29 => counts[0] += 1,
                22 => counts[1] += 1,
                47 => counts[2] += 1,
                z => panic!("unexpected element {}", z),
            }
        }
        let expected = [56.0 / 102.0, 38.0 / 102.0, 8.0 / 102.0];
        for (count, p) in counts.iter().zip(expected) {
            let observed = *count as f64 / n as f64;
            assert!((observed - p).abs() < 0.01, "observed {} expected {}", observed, p);
        }
    }
}
