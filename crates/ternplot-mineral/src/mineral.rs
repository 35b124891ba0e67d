//! Static database of common rock-forming minerals

use std::fmt;

use ahash::AHashMap;
use phf::phf_map;

use crate::error::{MineralError, MineralResult};
use crate::formula::Formula;

/// Structural or chemical group of a mineral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MineralGroup {
    Olivine,
    Pyroxene,
    Amphibole,
    Garnet,
    Mica,
    Feldspar,
    Silica,
    Spinel,
    Oxide,
    Carbonate,
    Phosphate,
    Sulfate,
}

impl MineralGroup {
    pub fn name(&self) -> &'static str {
        match self {
            MineralGroup::Olivine => "olivine",
            MineralGroup::Pyroxene => "pyroxene",
            MineralGroup::Amphibole => "amphibole",
            MineralGroup::Garnet => "garnet",
            MineralGroup::Mica => "mica",
            MineralGroup::Feldspar => "feldspar",
            MineralGroup::Silica => "silica",
            MineralGroup::Spinel => "spinel",
            MineralGroup::Oxide => "oxide",
            MineralGroup::Carbonate => "carbonate",
            MineralGroup::Phosphate => "phosphate",
            MineralGroup::Sulfate => "sulfate",
        }
    }
}

impl fmt::Display for MineralGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named end-member mineral
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mineral {
    pub name: &'static str,
    pub formula: &'static str,
    pub group: MineralGroup,
}

impl Mineral {
    /// Find a mineral by name, ignoring case and surrounding whitespace
    pub fn lookup(name: &str) -> MineralResult<&'static Mineral> {
        let key = name.trim().to_lowercase();
        MINERALS.get(key.as_str()).ok_or_else(|| {
            log::debug!("no mineral named '{name}'");
            MineralError::NotFound(name.to_string())
        })
    }

    /// All minerals, sorted by name
    pub fn all() -> Vec<&'static Mineral> {
        let mut minerals: Vec<_> = MINERALS.values().collect();
        minerals.sort_by_key(|m| m.name);
        minerals
    }

    /// Minerals of one group, sorted by name
    pub fn in_group(group: MineralGroup) -> Vec<&'static Mineral> {
        Self::all().into_iter().filter(|m| m.group == group).collect()
    }

    /// Parsed formula unit
    pub fn composition(&self) -> MineralResult<Formula> {
        Formula::parse(self.formula)
    }

    /// Molar mass of the formula unit in g/mol
    pub fn molecular_weight(&self) -> MineralResult<f64> {
        Ok(self.composition()?.molecular_weight())
    }

    /// Elemental mass fractions
    pub fn weight_fractions(&self) -> MineralResult<AHashMap<&'static str, f64>> {
        Ok(self.composition()?.weight_fractions())
    }
}

impl fmt::Display for Mineral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.formula)
    }
}

macro_rules! mineral {
    ($name:literal, $formula:literal, $group:ident) => {
        Mineral {
            name: $name,
            formula: $formula,
            group: MineralGroup::$group,
        }
    };
}

// Keys are lowercase names
static MINERALS: phf::Map<&'static str, Mineral> = phf_map! {
    // Olivine
    "forsterite" => mineral!("forsterite", "Mg2SiO4", Olivine),
    "fayalite" => mineral!("fayalite", "Fe2SiO4", Olivine),
    "tephroite" => mineral!("tephroite", "Mn2SiO4", Olivine),
    // Pyroxene
    "enstatite" => mineral!("enstatite", "MgSiO3", Pyroxene),
    "ferrosilite" => mineral!("ferrosilite", "FeSiO3", Pyroxene),
    "wollastonite" => mineral!("wollastonite", "CaSiO3", Pyroxene),
    "diopside" => mineral!("diopside", "CaMgSi2O6", Pyroxene),
    "hedenbergite" => mineral!("hedenbergite", "CaFeSi2O6", Pyroxene),
    "jadeite" => mineral!("jadeite", "NaAlSi2O6", Pyroxene),
    "aegirine" => mineral!("aegirine", "NaFeSi2O6", Pyroxene),
    // Amphibole
    "tremolite" => mineral!("tremolite", "Ca2Mg5Si8O22(OH)2", Amphibole),
    "actinolite" => mineral!("actinolite", "Ca2Fe5Si8O22(OH)2", Amphibole),
    // Garnet
    "pyrope" => mineral!("pyrope", "Mg3Al2(SiO4)3", Garnet),
    "almandine" => mineral!("almandine", "Fe3Al2(SiO4)3", Garnet),
    "grossular" => mineral!("grossular", "Ca3Al2(SiO4)3", Garnet),
    "spessartine" => mineral!("spessartine", "Mn3Al2(SiO4)3", Garnet),
    // Mica
    "muscovite" => mineral!("muscovite", "KAl2(AlSi3O10)(OH)2", Mica),
    "phlogopite" => mineral!("phlogopite", "KMg3(AlSi3O10)(OH)2", Mica),
    "annite" => mineral!("annite", "KFe3(AlSi3O10)(OH)2", Mica),
    // Feldspar
    "albite" => mineral!("albite", "NaAlSi3O8", Feldspar),
    "anorthite" => mineral!("anorthite", "CaAl2Si2O8", Feldspar),
    "orthoclase" => mineral!("orthoclase", "KAlSi3O8", Feldspar),
    // Silica
    "quartz" => mineral!("quartz", "SiO2", Silica),
    // Spinel
    "spinel" => mineral!("spinel", "MgAl2O4", Spinel),
    "hercynite" => mineral!("hercynite", "FeAl2O4", Spinel),
    "magnetite" => mineral!("magnetite", "Fe3O4", Spinel),
    "chromite" => mineral!("chromite", "FeCr2O4", Spinel),
    "ulvospinel" => mineral!("ulvospinel", "Fe2TiO4", Spinel),
    // Oxides
    "ilmenite" => mineral!("ilmenite", "FeTiO3", Oxide),
    "rutile" => mineral!("rutile", "TiO2", Oxide),
    "hematite" => mineral!("hematite", "Fe2O3", Oxide),
    "corundum" => mineral!("corundum", "Al2O3", Oxide),
    // Carbonates
    "calcite" => mineral!("calcite", "CaCO3", Carbonate),
    "dolomite" => mineral!("dolomite", "CaMg(CO3)2", Carbonate),
    "magnesite" => mineral!("magnesite", "MgCO3", Carbonate),
    "siderite" => mineral!("siderite", "FeCO3", Carbonate),
    // Phosphates and sulfates
    "apatite" => mineral!("apatite", "Ca5(PO4)3(OH)", Phosphate),
    "monazite" => mineral!("monazite", "CePO4", Phosphate),
    "gypsum" => mineral!("gypsum", "CaSO4·2H2O", Sulfate),
    "anhydrite" => mineral!("anhydrite", "CaSO4", Sulfate),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        let fo = Mineral::lookup("Forsterite").unwrap();
        assert_eq!(fo.formula, "Mg2SiO4");
        assert_eq!(fo.group, MineralGroup::Olivine);
        assert_eq!(Mineral::lookup("  ALBITE ").unwrap().name, "albite");
        assert_eq!(
            Mineral::lookup("kryptonite"),
            Err(MineralError::NotFound("kryptonite".to_string()))
        );
    }

    #[test]
    fn test_table_formulas_parse() {
        for mineral in Mineral::all() {
            let f = mineral.composition().unwrap();
            assert!(!f.is_empty(), "{mineral}");
            let total: f64 = mineral.weight_fractions().unwrap().values().sum();
            assert!((total - 1.0).abs() < 1e-9, "{mineral}");
        }
        for (key, mineral) in MINERALS.entries() {
            assert_eq!(*key, mineral.name);
        }
    }

    #[test]
    fn test_molecular_weight() {
        let qz = Mineral::lookup("quartz").unwrap();
        assert!((qz.molecular_weight().unwrap() - 60.083).abs() < 1e-9);
        let ab = Mineral::lookup("albite").unwrap();
        assert!((ab.molecular_weight().unwrap() - 262.22).abs() < 0.01);
    }

    #[test]
    fn test_groups() {
        let feldspars: Vec<_> = Mineral::in_group(MineralGroup::Feldspar)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(feldspars, vec!["albite", "anorthite", "orthoclase"]);
        let all = Mineral::all();
        assert!(all.windows(2).all(|w| w[0].name < w[1].name));
    }
}
