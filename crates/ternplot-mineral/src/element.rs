//! Element table
//!
//! Standard atomic weights for the elements that occur in common
//! rock-forming minerals and geochemical datasets.

use std::fmt;

use phf::phf_map;

use crate::error::{MineralError, MineralResult};

/// A chemical element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub symbol: &'static str,
    pub name: &'static str,
    pub atomic_number: u8,
    /// Standard atomic weight (g/mol)
    pub mass: f64,
}

impl Element {
    /// Look up an element by its case-sensitive symbol (`"Co"`, not `"CO"`)
    pub fn from_symbol(symbol: &str) -> MineralResult<&'static Element> {
        ELEMENTS
            .get(symbol)
            .ok_or_else(|| MineralError::UnknownElement(symbol.to_string()))
    }

    /// All elements in the table, ordered by atomic number
    pub fn all() -> Vec<&'static Element> {
        let mut elements: Vec<_> = ELEMENTS.values().collect();
        elements.sort_by_key(|e| e.atomic_number);
        elements
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

macro_rules! element {
    ($symbol:literal, $name:literal, $z:literal, $mass:literal) => {
        Element {
            symbol: $symbol,
            name: $name,
            atomic_number: $z,
            mass: $mass,
        }
    };
}

static ELEMENTS: phf::Map<&'static str, Element> = phf_map! {
    "H" => element!("H", "Hydrogen", 1, 1.008),
    "Li" => element!("Li", "Lithium", 3, 6.94),
    "Be" => element!("Be", "Beryllium", 4, 9.0122),
    "B" => element!("B", "Boron", 5, 10.81),
    "C" => element!("C", "Carbon", 6, 12.011),
    "N" => element!("N", "Nitrogen", 7, 14.007),
    "O" => element!("O", "Oxygen", 8, 15.999),
    "F" => element!("F", "Fluorine", 9, 18.998),
    "Na" => element!("Na", "Sodium", 11, 22.990),
    "Mg" => element!("Mg", "Magnesium", 12, 24.305),
    "Al" => element!("Al", "Aluminum", 13, 26.982),
    "Si" => element!("Si", "Silicon", 14, 28.085),
    "P" => element!("P", "Phosphorus", 15, 30.974),
    "S" => element!("S", "Sulfur", 16, 32.06),
    "Cl" => element!("Cl", "Chlorine", 17, 35.45),
    "K" => element!("K", "Potassium", 19, 39.098),
    "Ca" => element!("Ca", "Calcium", 20, 40.078),
    "Sc" => element!("Sc", "Scandium", 21, 44.956),
    "Ti" => element!("Ti", "Titanium", 22, 47.867),
    "V" => element!("V", "Vanadium", 23, 50.942),
    "Cr" => element!("Cr", "Chromium", 24, 51.996),
    "Mn" => element!("Mn", "Manganese", 25, 54.938),
    "Fe" => element!("Fe", "Iron", 26, 55.845),
    "Co" => element!("Co", "Cobalt", 27, 58.933),
    "Ni" => element!("Ni", "Nickel", 28, 58.693),
    "Cu" => element!("Cu", "Copper", 29, 63.546),
    "Zn" => element!("Zn", "Zinc", 30, 65.38),
    "Ga" => element!("Ga", "Gallium", 31, 69.723),
    "Rb" => element!("Rb", "Rubidium", 37, 85.468),
    "Sr" => element!("Sr", "Strontium", 38, 87.62),
    "Y" => element!("Y", "Yttrium", 39, 88.906),
    "Zr" => element!("Zr", "Zirconium", 40, 91.224),
    "Nb" => element!("Nb", "Niobium", 41, 92.906),
    "Cs" => element!("Cs", "Cesium", 55, 132.91),
    "Ba" => element!("Ba", "Barium", 56, 137.33),
    "La" => element!("La", "Lanthanum", 57, 138.91),
    "Ce" => element!("Ce", "Cerium", 58, 140.12),
    "Pr" => element!("Pr", "Praseodymium", 59, 140.91),
    "Nd" => element!("Nd", "Neodymium", 60, 144.24),
    "Sm" => element!("Sm", "Samarium", 62, 150.36),
    "Eu" => element!("Eu", "Europium", 63, 151.96),
    "Gd" => element!("Gd", "Gadolinium", 64, 157.25),
    "Tb" => element!("Tb", "Terbium", 65, 158.93),
    "Dy" => element!("Dy", "Dysprosium", 66, 162.50),
    "Ho" => element!("Ho", "Holmium", 67, 164.93),
    "Er" => element!("Er", "Erbium", 68, 167.26),
    "Tm" => element!("Tm", "Thulium", 69, 168.93),
    "Yb" => element!("Yb", "Ytterbium", 70, 173.05),
    "Lu" => element!("Lu", "Lutetium", 71, 174.97),
    "Hf" => element!("Hf", "Hafnium", 72, 178.49),
    "Ta" => element!("Ta", "Tantalum", 73, 180.95),
    "W" => element!("W", "Tungsten", 74, 183.84),
    "Pb" => element!("Pb", "Lead", 82, 207.2),
    "Th" => element!("Th", "Thorium", 90, 232.04),
    "U" => element!("U", "Uranium", 92, 238.03),
};
