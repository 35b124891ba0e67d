//! Chemical formula parsing
//!
//! Accepts the usual mineral notation: element symbols with integer or
//! decimal subscripts, nested `(...)`/`[...]` groups with multipliers, and
//! hydrate or adduct parts separated by `·` or `*` with an optional leading
//! coefficient.
//!
//! ```text
//! Mg2SiO4
//! Ca2Mg5Si8O22(OH)2
//! (Mg0.9Fe0.1)2SiO4
//! CaSO4·2H2O
//! ```

use std::fmt;

use ahash::AHashMap;

use crate::element::Element;
use crate::error::{MineralError, MineralResult};

/// Element counts of a formula unit, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formula {
    counts: Vec<(&'static Element, f64)>,
}

impl Formula {
    /// Parse a formula string
    pub fn parse(text: &str) -> MineralResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MineralError::invalid(text, "empty formula"));
        }
        let mut formula = Formula::default();
        for part in text.split(['·', '*']) {
            let mut parser = Parser::new(text, part);
            let coefficient = parser.number()?.unwrap_or(1.0);
            let group = parser.group(0)?;
            if group.is_empty() {
                return Err(MineralError::invalid(text, "empty formula part"));
            }
            for (element, n) in group.counts {
                formula.add(element, n * coefficient);
            }
        }
        Ok(formula)
    }

    fn add(&mut self, element: &'static Element, n: f64) {
        match self.counts.iter_mut().find(|(e, _)| e.symbol == element.symbol) {
            Some((_, count)) => *count += n,
            None => self.counts.push((element, n)),
        }
    }

    fn scaled(mut self, factor: f64) -> Self {
        for (_, n) in &mut self.counts {
            *n *= factor;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Elements and their atom counts
    pub fn counts(&self) -> &[(&'static Element, f64)] {
        &self.counts
    }

    /// Atom count of one element, zero when absent
    pub fn count(&self, symbol: &str) -> f64 {
        self.counts
            .iter()
            .find(|(e, _)| e.symbol == symbol)
            .map_or(0.0, |(_, n)| *n)
    }

    /// Total atoms per formula unit
    pub fn atoms(&self) -> f64 {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Molar mass in g/mol
    pub fn molecular_weight(&self) -> f64 {
        self.counts.iter().map(|(e, n)| e.mass * n).sum()
    }

    /// Mass fraction of each element; fractions sum to one
    pub fn weight_fractions(&self) -> AHashMap<&'static str, f64> {
        let total = self.molecular_weight();
        self.counts
            .iter()
            .map(|(e, n)| (e.symbol, e.mass * n / total))
            .collect()
    }
}

impl std::str::FromStr for Formula {
    type Err = MineralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (element, n) in &self.counts {
            f.write_str(element.symbol)?;
            if *n != 1.0 {
                write!(f, "{n}")?;
            }
        }
        Ok(())
    }
}

struct Parser<'a> {
    full: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(full: &'a str, part: &str) -> Self {
        Parser {
            full,
            chars: part.trim().chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn error(&self, reason: impl Into<String>) -> MineralError {
        MineralError::invalid(self.full, reason)
    }

    /// Elements up to the end of input (depth 0) or the closing bracket
    fn group(&mut self, depth: usize) -> MineralResult<Formula> {
        let mut formula = Formula::default();
        while let Some(c) = self.peek() {
            match c {
                '(' | '[' => {
                    self.pos += 1;
                    let close = if c == '(' { ')' } else { ']' };
                    let inner = self.group(depth + 1)?;
                    if self.peek() != Some(close) {
                        return Err(self.error(format!("expected '{close}'")));
                    }
                    self.pos += 1;
                    let n = self.number()?.unwrap_or(1.0);
                    for (element, count) in inner.scaled(n).counts {
                        formula.add(element, count);
                    }
                }
                ')' | ']' if depth > 0 => return Ok(formula),
                c if c.is_ascii_uppercase() => {
                    let element = self.symbol()?;
                    let n = self.number()?.unwrap_or(1.0);
                    formula.add(element, n);
                }
                other => {
                    return Err(self.error(format!("unexpected '{other}' at {}", self.pos)));
                }
            }
        }
        if depth > 0 {
            return Err(self.error("unbalanced brackets"));
        }
        Ok(formula)
    }

    fn symbol(&mut self) -> MineralResult<&'static Element> {
        let start = self.pos;
        self.pos += 1;
        while self.peek().is_some_and(|c| c.is_ascii_lowercase()) {
            self.pos += 1;
        }
        let symbol: String = self.chars[start..self.pos].iter().collect();
        Element::from_symbol(&symbol)
    }

    fn number(&mut self) -> MineralResult<Option<f64>> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match text.parse::<f64>() {
            Ok(n) if n > 0.0 => Ok(Some(n)),
            _ => Err(self.error(format!("bad count '{text}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_simple() {
        let f = Formula::parse("Mg2SiO4").unwrap();
        assert_eq!(f.count("Mg"), 2.0);
        assert_eq!(f.count("Si"), 1.0);
        assert_eq!(f.count("O"), 4.0);
        assert_eq!(f.count("Fe"), 0.0);
        assert_eq!(f.atoms(), 7.0);
        assert_eq!(f.to_string(), "Mg2SiO4");
        assert!(close(f.molecular_weight(), 2.0 * 24.305 + 28.085 + 4.0 * 15.999));
    }

    #[test]
    fn test_groups() {
        let f = Formula::parse("Ca2Mg5Si8O22(OH)2").unwrap();
        assert_eq!(f.count("O"), 24.0);
        assert_eq!(f.count("H"), 2.0);
        let f = Formula::parse("KAl2[AlSi3O10](OH)2").unwrap();
        assert_eq!(f.count("Al"), 3.0);
        assert_eq!(f.count("O"), 12.0);
        let f = Formula::parse("Mg3Al2(SiO4)3").unwrap();
        assert_eq!(f.count("O"), 12.0);
    }

    #[test]
    fn test_solid_solution() {
        let f = Formula::parse("(Mg0.9Fe0.1)2SiO4").unwrap();
        assert!(close(f.count("Mg"), 1.8));
        assert!(close(f.count("Fe"), 0.2));
    }

    #[test]
    fn test_hydrate() {
        let f: Formula = "CaSO4·2H2O".parse().unwrap();
        assert_eq!(f.count("H"), 4.0);
        assert_eq!(f.count("O"), 6.0);
        assert_eq!(Formula::parse("CaSO4*2H2O").unwrap(), f);
    }

    #[test]
    fn test_weight_fractions() {
        let f = Formula::parse("SiO2").unwrap();
        let w = f.weight_fractions();
        let total: f64 = w.values().sum();
        assert!(close(total, 1.0));
        assert!(close(w["Si"], 28.085 / (28.085 + 2.0 * 15.999)));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(Formula::parse(""), Err(MineralError::InvalidFormula { .. })));
        assert!(matches!(Formula::parse("Xx2O"), Err(MineralError::UnknownElement(_))));
        assert!(matches!(Formula::parse("Mg2(SiO4"), Err(MineralError::InvalidFormula { .. })));
        assert!(matches!(Formula::parse("MgO)"), Err(MineralError::InvalidFormula { .. })));
        assert!(matches!(Formula::parse("mgO"), Err(MineralError::InvalidFormula { .. })));
        assert!(matches!(Formula::parse("Mg1.2.3O"), Err(MineralError::InvalidFormula { .. })));
        assert!(matches!(Formula::parse("CaSO4·"), Err(MineralError::InvalidFormula { .. })));
    }
}
