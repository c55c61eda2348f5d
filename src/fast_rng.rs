// Uniform deviate source for the cascade engine.
//
// A PCG-LCG generator: 64-bit LCG state with an RXS-M-XS output permutation.
// It is seeded exactly once per run; every sampling decision in the engine
// draws from the same stream, so a fixed seed reproduces a run bit for bit.

use crate::error::{BcaError, BcaResult};
use rand::{RngCore, SeedableRng};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// LCG multiplier
const PRN_MULT: u64 = 6364136223846793005;
/// LCG additive constant
const PRN_ADD: u64 = 1442695040888963407;

/// Default entropy device used to seed a run.
pub const DEFAULT_ENTROPY_SOURCE: &str = "/dev/urandom";

/// Fast PCG-LCG random number generator.
///
/// Reference: Melissa E. O'Neill, "PCG: A Family of Simple Fast Space-Efficient
/// Statistically Good Algorithms for Random Number Generation"
#[derive(Clone, Copy, Debug)]
pub struct FastRng {
    seed: u64,
}

impl FastRng {
    /// Create a new FastRng with the given seed
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the first 8 bytes of an entropy device such as `/dev/urandom`.
    ///
    /// Returns the generator together with the seed that was read, so a run
    /// can be logged and replayed.
    pub fn from_entropy_file(path: impl AsRef<Path>) -> BcaResult<(Self, u64)> {
        let path = path.as_ref();
        let mut bytes = [0u8; 8];
        File::open(path)
            .and_then(|mut f| f.read_exact(&mut bytes))
            .map_err(|source| BcaError::Entropy {
                path: path.display().to_string(),
                source,
            })?;
        let seed = u64::from_le_bytes(bytes);
        Ok((Self::new(seed), seed))
    }

    #[inline(always)]
    fn step(&mut self) -> u64 {
        self.seed = PRN_MULT.wrapping_mul(self.seed).wrapping_add(PRN_ADD);
        let word = ((self.seed >> ((self.seed >> 59) + 5)) ^ self.seed)
            .wrapping_mul(12605985483714917081);
        (word >> 43) ^ word
    }

    /// Generate a uniform f64 in [0, 1)
    #[inline(always)]
    pub fn random(&mut self) -> f64 {
        // top 53 bits keep the result strictly below 1.0
        (self.step() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Reset the stream. Only valid before a run starts.
    #[inline]
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

impl SeedableRng for FastRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            seed: u64::from_le_bytes(seed),
        }
    }
}

impl RngCore for FastRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut left = dest;
        while left.len() >= 8 {
            let bytes = self.next_u64().to_le_bytes();
            left[..8].copy_from_slice(&bytes);
            left = &mut left[8..];
        }
        if !left.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            left.copy_from_slice(&bytes[..left.len()]);
        }
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
