// src/data.rs
// Static element tables used to label species in output and configuration.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Chemical symbols indexed by atomic number minus one (H .. U).
pub const ELEMENT_SYMBOLS: [&str; 92] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U",
];

/// Map from chemical symbol to atomic number, derived from [`ELEMENT_SYMBOLS`].
pub static ATOMIC_NUMBERS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    ELEMENT_SYMBOLS
        .iter()
        .enumerate()
        .map(|(i, &symbol)| (symbol, i as u32 + 1))
        .collect()
});

/// Chemical symbol for an atomic number, if it is in the table.
pub fn element_symbol(z: u32) -> Option<&'static str> {
    if z == 0 {
        return None;
    }
    ELEMENT_SYMBOLS.get(z as usize - 1).copied()
}

/// Atomic number for a chemical symbol (case-sensitive, e.g. `"Cu"`).
pub fn atomic_number(symbol: &str) -> Option<u32> {
    ATOMIC_NUMBERS.get(symbol).copied()
}
