use crate::error::{BcaError, BcaResult};

/// One constituent of a [`crate::Material`].
///
/// `weight` is the stoichiometric weight of the element. Weights are
/// relative: `Cu56 Ti38 Ag8` and `Cu0.56 Ti0.38 Ag0.08` describe the same
/// alloy. They are normalised into atomic fractions by
/// [`crate::Material::prepare`].
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Atomic number
    pub z: u32,
    /// Atomic mass in amu
    pub mass: f64,
    /// Relative stoichiometric weight
    pub weight: f64,
}

impl Element {
    pub fn new(z: u32, mass: f64, weight: f64) -> BcaResult<Self> {
        if z == 0 {
            return Err(BcaError::InvalidElement(
                "atomic number must be at least 1".to_string(),
            ));
        }
        if !(mass > 0.0) {
            return Err(BcaError::InvalidElement(format!(
                "mass of Z={} must be positive, got {}",
                z, mass
            )));
        }
        if !(weight > 0.0) {
            return Err(BcaError::InvalidElement(format!(
                "stoichiometric weight of Z={} must be positive, got {}",
                z, weight
            )));
        }
        Ok(Element { z, mass, weight })
    }

    /// Chemical symbol, when the atomic number is tabulated.
    pub fn symbol(&self) -> Option<&'static str> {
        crate::data::element_symbol(self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_construction() {
        let cu = Element::new(29, 63.546, 56.0).unwrap();
        assert_eq!(cu.z, 29);
        assert_eq!(cu.symbol(), Some("Cu"));
    }

    #[test]
    fn test_element_validation() {
        assert!(Element::new(0, 1.0, 1.0).is_err());
        assert!(Element::new(29, 0.0, 1.0).is_err());
        assert!(Element::new(29, 63.5, -1.0).is_err());
        assert!(Element::new(29, f64::NAN, 1.0).is_err());
    }
}
