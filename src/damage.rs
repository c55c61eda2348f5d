// Spatial damage histograms
//
// Counts are kept per (x-bin, y-bin, tracked species) in a flat vector.
// Grids only ever grow: there is no decrement, and the net displacement
// map is derived from the two grids when it is read.

use crate::error::{BcaError, BcaResult};
use nalgebra::Vector3;

/// Bin of `coord` on an axis of length `extent` split into `n` bins.
///
/// Floor-based, then wrapped modulo `n`, so `coord == extent` (and any
/// other excursion past the edges) still lands in `[0, n)`.
pub fn bin_index(coord: f64, extent: f64, n: usize) -> usize {
    let n_i = n as i64;
    let raw = (coord * n as f64 / extent).floor() as i64;
    raw.rem_euclid(n_i) as usize
}

/// Histogram over the sample cross-section, one layer per tracked species.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageGrid {
    nx: usize,
    ny: usize,
    species: Vec<u32>,
    counts: Vec<u64>,
}

impl DamageGrid {
    /// `species` lists the tracked atomic numbers; their order is the
    /// species index used by every accessor.
    pub fn new(nx: usize, ny: usize, species: Vec<u32>) -> BcaResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(BcaError::Config(format!(
                "damage grid needs at least one bin per axis, got {}x{}",
                nx, ny
            )));
        }
        if species.is_empty() {
            return Err(BcaError::Config(
                "damage grid needs at least one tracked species".to_string(),
            ));
        }
        for (i, z) in species.iter().enumerate() {
            if species[..i].contains(z) {
                return Err(BcaError::Config(format!(
                    "species Z={} is tracked twice",
                    z
                )));
            }
        }
        let counts = vec![0; nx * ny * species.len()];
        Ok(DamageGrid {
            nx,
            ny,
            species,
            counts,
        })
    }

    /// (nx, ny, number of species)
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.species.len())
    }

    pub fn species(&self) -> &[u32] {
        &self.species
    }

    pub fn species_index(&self, z: u32) -> Option<usize> {
        self.species.iter().position(|&s| s == z)
    }

    /// Bin of a sample-local position; `extents` are the sample extents.
    pub fn bin(&self, position: &Vector3<f64>, extents: [f64; 3]) -> (usize, usize) {
        (
            bin_index(position.x, extents[0], self.nx),
            bin_index(position.y, extents[1], self.ny),
        )
    }

    fn offset(&self, x: usize, y: usize, species: usize) -> BcaResult<usize> {
        if x >= self.nx || y >= self.ny || species >= self.species.len() {
            return Err(BcaError::GridOutOfBounds { x, y, species });
        }
        Ok((species * self.ny + y) * self.nx + x)
    }

    pub fn increment(&mut self, x: usize, y: usize, species: usize) -> BcaResult<()> {
        let offset = self.offset(x, y, species)?;
        self.counts[offset] += 1;
        Ok(())
    }

    pub fn get(&self, x: usize, y: usize, species: usize) -> BcaResult<u64> {
        Ok(self.counts[self.offset(x, y, species)?])
    }

    /// Count one event of species `z` at `position`. Untracked species are
    /// ignored; the return value says whether anything was counted.
    pub fn record(&mut self, position: &Vector3<f64>, extents: [f64; 3], z: u32) -> bool {
        let Some(species) = self.species_index(z) else {
            return false;
        };
        let (x, y) = self.bin(position, extents);
        let offset = (species * self.ny + y) * self.nx + x;
        self.counts[offset] += 1;
        true
    }

    /// Sum over all bins of one species layer.
    pub fn total(&self, species: usize) -> u64 {
        if species >= self.species.len() {
            return 0;
        }
        let layer = self.nx * self.ny;
        self.counts[species * layer..(species + 1) * layer].iter().sum()
    }

    /// Add another grid of identical shape into this one.
    pub fn merge(&mut self, other: &DamageGrid) -> BcaResult<()> {
        if self.nx != other.nx || self.ny != other.ny || self.species != other.species {
            return Err(BcaError::Config(
                "cannot merge damage grids of different shape".to_string(),
            ));
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        Ok(())
    }
}

/// The interstitial and vacancy grids of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageMaps {
    pub interstitials: DamageGrid,
    pub vacancies: DamageGrid,
}

impl DamageMaps {
    pub fn new(nx: usize, ny: usize, species: Vec<u32>) -> BcaResult<Self> {
        let interstitials = DamageGrid::new(nx, ny, species)?;
        let vacancies = interstitials.clone();
        Ok(DamageMaps {
            interstitials,
            vacancies,
        })
    }

    /// Interstitials minus vacancies in one bin.
    pub fn net(&self, x: usize, y: usize, species: usize) -> BcaResult<i64> {
        let interstitials = self.interstitials.get(x, y, species)? as i64;
        let vacancies = self.vacancies.get(x, y, species)? as i64;
        Ok(interstitials - vacancies)
    }

    pub fn merge(&mut self, other: &DamageMaps) -> BcaResult<()> {
        self.interstitials.merge(&other.interstitials)?;
        self.vacancies.merge(&other.vacancies)
    }
}
