// Binary collision physics for ion transport
//
// Screened-Coulomb scattering with the ZBL universal potential. Lengths are
// in Å, energies in eV, masses in amu. Quantities written in capitals in the
// literature (reduced impact parameter B, reduced distance R) are lengths
// divided by the screening length; `eps` is the reduced energy.

use nalgebra::Vector3;
use std::f64::consts::PI;

/// Bohr radius in Å
pub const BOHR_RADIUS: f64 = 0.529177;
/// e²/(4πε0) in eV·Å
pub const E2: f64 = 14.3996;

/// ZBL universal screening function coefficients (c_i, d_i).
const ZBL: [(f64, f64); 4] = [
    (0.18175, 3.1998),
    (0.50986, 0.94229),
    (0.28022, 0.40290),
    (0.028171, 0.20162),
];

/// Biersack-Haggmark magic formula constants for the universal potential.
const MAGIC_C1: f64 = 0.99229;
const MAGIC_C2: f64 = 0.011615;
const MAGIC_C3: f64 = 0.0071222;
const MAGIC_C4: f64 = 9.3066;
const MAGIC_C5: f64 = 14.813;

/// ZBL universal screening length in Å.
pub fn screening_length(z1: f64, z2: f64) -> f64 {
    0.8854 * BOHR_RADIUS / (z1.powf(0.23) + z2.powf(0.23))
}

/// Universal screening function Φ(R).
pub fn universal_screening(r: f64) -> f64 {
    ZBL.iter().map(|(c, d)| c * (-d * r).exp()).sum()
}

/// dΦ/dR
fn universal_screening_derivative(r: f64) -> f64 {
    -ZBL.iter().map(|(c, d)| c * d * (-d * r).exp()).sum::<f64>()
}

/// Reduced energy of a projectile with lab energy `energy` striking a
/// target at rest.
pub fn reduced_energy(energy: f64, m1: f64, m2: f64, z1: f64, z2: f64, a: f64) -> f64 {
    a * energy * m2 / ((m1 + m2) * z1 * z2 * E2)
}

/// Fraction of the projectile energy transferred in a head-on collision,
/// 4 m1 m2 / (m1 + m2)².
pub fn max_energy_transfer_fraction(m1: f64, m2: f64) -> f64 {
    4.0 * m1 * m2 / ((m1 + m2) * (m1 + m2))
}

/// Reduced distance of closest approach for reduced energy `eps` and
/// reduced impact parameter `b`.
///
/// Solves R - Φ(R)/ε - B²/R = 0. The left side is increasing and concave
/// in R, so Newton's method started left of the root (at R = B) climbs
/// monotonically onto it.
pub fn closest_approach(eps: f64, b: f64) -> f64 {
    let mut r = b.max(1.0e-8);
    for _ in 0..100 {
        let f = r - universal_screening(r) / eps - b * b / r;
        let df = 1.0 - universal_screening_derivative(r) / eps + b * b / (r * r);
        let step = f / df;
        r -= step;
        if step.abs() <= 1.0e-10 * r {
            break;
        }
    }
    r
}

/// sin²(θ/2) of the centre-of-mass scattering angle from the magic formula.
pub fn magic_sin2_half(eps: f64, b: f64) -> f64 {
    let r0 = closest_approach(eps, b);
    let phi = universal_screening(r0);
    // reduced potential u = Φ(R)/R and its slope at R0
    let u = phi / r0;
    let du = universal_screening_derivative(r0) / r0 - phi / (r0 * r0);
    let rc = 2.0 * (eps - u) / (-du);

    let sqe = eps.sqrt();
    let alpha = 1.0 + MAGIC_C1 / sqe;
    let beta = (MAGIC_C2 + sqe) / (MAGIC_C3 + sqe);
    let gamma = (MAGIC_C4 + eps) / (MAGIC_C5 + eps);
    let a = 2.0 * alpha * eps * b.powf(beta);
    // γ / (sqrt(1 + A²) - A), written without the cancellation
    let g = gamma * ((1.0 + a * a).sqrt() + a);
    let delta = a * (r0 - b) / (1.0 + g);

    let cos_half = ((b + rc + delta) / (r0 + rc)).clamp(0.0, 1.0);
    (1.0 - cos_half * cos_half).max(0.0)
}

/// sin²(θ/2) for unscreened Coulomb scattering.
pub fn rutherford_sin2_half(eps: f64, b: f64) -> f64 {
    let x = 2.0 * eps * b;
    1.0 / (1.0 + x * x)
}

/// Maximum impact parameter and mean free path for an ion in a medium.
///
/// TRIM-85 scheme: impact parameters beyond `pmax` transfer less than
/// `min_transfer`; `pmax` never exceeds the lattice limit N^(-1/3)/√π, so
/// the mean free path is at least the atomic spacing.
pub fn free_flight_parameters(
    energy: f64,
    z1: f64,
    m1: f64,
    mean_z2: f64,
    mean_m2: f64,
    atomic_density: f64,
    min_transfer: f64,
) -> (f64, f64) {
    let a = screening_length(z1, mean_z2);
    let eps = reduced_energy(energy, m1, mean_m2, z1, mean_z2, a);
    let gamma = max_energy_transfer_fraction(m1, mean_m2);
    let eps_min = eps * min_transfer / (gamma * energy);
    let eeg = (eps * eps_min).sqrt();
    let pmax_energy = a / (eeg + eeg.sqrt() + 0.125 * eeg.powf(0.1));
    let pmax_lattice = atomic_density.powf(-1.0 / 3.0) / PI.sqrt();
    let pmax = pmax_energy.min(pmax_lattice);
    let mean_free_path = 1.0 / (PI * pmax * pmax * atomic_density);
    (pmax, mean_free_path)
}

/// Outcome of an elastic two-body collision with a target at rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Energy handed to the struck atom, eV
    pub energy_transfer: f64,
    /// Projectile energy after the collision, eV
    pub projectile_energy: f64,
    /// Cosine of the projectile's lab deflection
    pub projectile_cos: f64,
    /// Cosine of the recoil direction relative to the incoming direction
    pub recoil_cos: f64,
}

/// Lab-frame kinematics for a centre-of-mass deflection with the given
/// sin²(θ/2). Energy is conserved exactly between the two bodies.
pub fn binary_collision(energy: f64, m1: f64, m2: f64, sin2_half: f64) -> Collision {
    let s2 = sin2_half.clamp(0.0, 1.0);
    let energy_transfer = max_energy_transfer_fraction(m1, m2) * energy * s2;
    let cos_cm = 1.0 - 2.0 * s2;
    let mass_ratio = m2 / m1;
    let denom = (1.0 + mass_ratio * mass_ratio + 2.0 * mass_ratio * cos_cm).sqrt();
    let projectile_cos = if denom > 1.0e-12 {
        ((1.0 + mass_ratio * cos_cm) / denom).clamp(-1.0, 1.0)
    } else {
        // equal masses head-on: the projectile is left at rest
        0.0
    };
    Collision {
        energy_transfer,
        projectile_energy: (energy - energy_transfer).max(0.0),
        projectile_cos,
        recoil_cos: s2.sqrt(),
    }
}

/// Rotate a direction vector by angle theta (cos(theta)=mu) at azimuth phi
/// around the original direction.
pub fn rotate_direction_3d(u_old: &Vector3<f64>, mu: f64, phi: f64) -> Vector3<f64> {
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();

    let perp = if u_old.x.abs() < 0.99 {
        Vector3::new(1.0, 0.0, 0.0).cross(u_old).normalize()
    } else {
        Vector3::new(0.0, 1.0, 0.0).cross(u_old).normalize()
    };
    let ortho = u_old.cross(&perp);

    mu * u_old + sin_theta * phi.cos() * perp + sin_theta * phi.sin() * ortho
}
