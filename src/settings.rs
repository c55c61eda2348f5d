use crate::element::Element;
use crate::error::{BcaError, BcaResult};
use crate::fast_rng::{FastRng, DEFAULT_ENTROPY_SOURCE};
use crate::material::Material;
use crate::sample::WireSample;
use crate::source::WireSource;
use std::str::FromStr;

/// Wire diameter in Å per nm of the radius argument.
pub const WIRE_SCALE: f64 = 20.0;
/// Length of the periodic wire segment, Å.
pub const WIRE_DEPTH: f64 = 100.0;
/// Damage map resolution across the wire.
pub const DEFAULT_BINS: [usize; 2] = [20, 20];

/// One constituent of the wire alloy. Its damage is tracked and written
/// out under `symbol`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedSpecies {
    pub z: u32,
    pub symbol: String,
    /// Atomic mass in amu
    pub mass: f64,
    /// Stoichiometric weight in the alloy
    pub weight: f64,
    /// Density of the pure element, g/cm³
    pub density: f64,
}

impl TrackedSpecies {
    pub fn new(z: u32, symbol: &str, mass: f64, weight: f64, density: f64) -> Self {
        TrackedSpecies {
            z,
            symbol: symbol.to_string(),
            mass,
            weight,
            density,
        }
    }
}

/// The Cu-Ti-Ag wire alloy, Cu56 Ti38 Ag8.
pub fn default_alloy() -> Vec<TrackedSpecies> {
    vec![
        TrackedSpecies::new(29, "Cu", 63.546, 56.0, 8.920),
        TrackedSpecies::new(22, "Ti", 47.867, 38.0, 4.507),
        TrackedSpecies::new(47, "Ag", 107.87, 8.0, 10.490),
    ]
}

/// Everything a wire run needs besides the physics configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Prefix of the output files
    pub basename: String,
    pub primaries: usize,
    pub source: WireSource,
    /// Radius argument in nm
    pub radius: f64,
    pub bins: [usize; 2],
    pub species: Vec<TrackedSpecies>,
    /// Fixed seed; `None` reads one from the entropy device
    pub seed: Option<u64>,
}

fn parse_arg<T: FromStr>(value: &str, name: &str) -> BcaResult<T> {
    value
        .parse()
        .map_err(|_| BcaError::Config(format!("could not parse {} from '{}'", name, value)))
}

impl Settings {
    /// Build from the command line:
    /// `prog basename Eion[eV] angle[deg] numpka zpka mpka r[nm]`
    pub fn from_args(args: &[String]) -> BcaResult<Self> {
        if args.len() != 8 {
            let program = args.first().map(String::as_str).unwrap_or("bca-wire");
            return Err(BcaError::Usage {
                program: program.to_string(),
            });
        }
        let energy: f64 = parse_arg(&args[2], "Eion")?;
        let angle: f64 = parse_arg(&args[3], "angle")?;
        let primaries: usize = parse_arg(&args[4], "numpka")?;
        let z: u32 = parse_arg(&args[5], "zpka")?;
        let mass: f64 = parse_arg(&args[6], "mpka")?;
        let radius: f64 = parse_arg(&args[7], "r")?;
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(BcaError::Config(format!(
                "wire radius must be positive, got {}",
                radius
            )));
        }

        Ok(Settings {
            basename: args[1].clone(),
            primaries,
            source: WireSource::new(energy, angle, z, mass)?,
            radius,
            bins: DEFAULT_BINS,
            species: default_alloy(),
            seed: None,
        })
    }

    pub fn wire_diameter(&self) -> f64 {
        self.radius * WIRE_SCALE
    }

    pub fn extents(&self) -> [f64; 3] {
        let d = self.wire_diameter();
        [d, d, WIRE_DEPTH]
    }

    pub fn tracked_z(&self) -> Vec<u32> {
        self.species.iter().map(|s| s.z).collect()
    }

    /// Output labels, parallel to [`Settings::tracked_z`].
    pub fn species_labels(&self) -> Vec<String> {
        self.species.iter().map(|s| s.symbol.clone()).collect()
    }

    /// Stoichiometry-weighted mean of the constituent densities, g/cm³.
    pub fn alloy_density(&self) -> f64 {
        let total: f64 = self.species.iter().map(|s| s.weight).sum();
        self.species
            .iter()
            .map(|s| s.weight * s.density)
            .sum::<f64>()
            / total
    }

    /// The prepared wire alloy.
    pub fn build_material(&self) -> BcaResult<Material> {
        let mut material = Material::new(self.alloy_density())?.with_name(
            self.species
                .iter()
                .map(|s| s.symbol.as_str())
                .collect::<Vec<_>>()
                .join("-"),
        );
        for species in &self.species {
            material.add_element(Element::new(species.z, species.mass, species.weight)?)?;
        }
        material.prepare()?;
        Ok(material)
    }

    pub fn build_sample(&self) -> BcaResult<WireSample> {
        let [w, h, d] = self.extents();
        let mut sample = WireSample::new(w, h, d)?;
        sample.add_material(self.build_material()?)?;
        Ok(sample)
    }

    /// The run's random stream, with the seed it was started from.
    pub fn rng(&self) -> BcaResult<(FastRng, u64)> {
        match self.seed {
            Some(seed) => Ok((FastRng::new(seed), seed)),
            None => FastRng::from_entropy_file(DEFAULT_ENTROPY_SOURCE),
        }
    }
}
