use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

static ELEMENT_NUMBERS: Map<&'static str, u8> = phf_map! {
    "H" => 1, "He" => 2, "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8,
    "F" => 9, "Ne" => 10, "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15,
    "S" => 16, "Cl" => 17, "Ar" => 18, "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22,
    "V" => 23, "Cr" => 24, "Mn" => 25, "Fe" => 26, "Co" => 27, "Ni" => 28, "Cu" => 29,
    "Zn" => 30, "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34, "Br" => 35, "Kr" => 36,
    "Rb" => 37, "Sr" => 38, "Y" => 39, "Zr" => 40, "Nb" => 41, "Mo" => 42, "Tc" => 43,
    "Ru" => 44, "Rh" => 45, "Pd" => 46, "Ag" => 47, "Cd" => 48, "In" => 49, "Sn" => 50,
    "Sb" => 51, "Te" => 52, "I" => 53, "Xe" => 54, "Cs" => 55, "Ba" => 56, "La" => 57,
    "Ce" => 58, "Pr" => 59, "Nd" => 60, "Pm" => 61, "Sm" => 62, "Eu" => 63, "Gd" => 64,
    "Tb" => 65, "Dy" => 66, "Ho" => 67, "Er" => 68, "Tm" => 69, "Yb" => 70, "Lu" => 71,
    "Hf" => 72, "Ta" => 73, "W" => 74, "Re" => 75, "Os" => 76, "Ir" => 77, "Pt" => 78,
    "Au" => 79, "Hg" => 80, "Tl" => 81, "Pb" => 82, "Bi" => 83, "Po" => 84, "At" => 85,
    "Rn" => 86, "Fr" => 87, "Ra" => 88, "Ac" => 89, "Th" => 90, "Pa" => 91, "U" => 92,
    "Np" => 93, "Pu" => 94, "Am" => 95, "Cm" => 96, "Bk" => 97, "Cf" => 98, "Es" => 99,
    "Fm" => 100, "Md" => 101, "No" => 102, "Lr" => 103, "Rf" => 104, "Db" => 105,
    "Sg" => 106, "Bh" => 107, "Hs" => 108, "Mt" => 109, "Ds" => 110, "Rg" => 111,
    "Cn" => 112, "Nh" => 113, "Fl" => 114, "Mc" => 115, "Lv" => 116, "Ts" => 117,
    "Og" => 118,
};

const SYMBOLS: [&str; 119] = [
    "*", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P",
    "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh",
    "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re",
    "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db",
    "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// A chemical element identified by its atomic number.
///
/// Atomic number 0 is reserved for the SMILES wildcard atom (`*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    pub const WILDCARD: Element = Element(0);
    pub const HYDROGEN: Element = Element(1);
    pub const BORON: Element = Element(5);
    pub const CARBON: Element = Element(6);
    pub const NITROGEN: Element = Element(7);
    pub const OXYGEN: Element = Element(8);
    pub const FLUORINE: Element = Element(9);
    pub const PHOSPHORUS: Element = Element(15);
    pub const SULFUR: Element = Element(16);
    pub const CHLORINE: Element = Element(17);
    pub const ARSENIC: Element = Element(33);
    pub const SELENIUM: Element = Element(34);
    pub const BROMINE: Element = Element(35);
    pub const TELLURIUM: Element = Element(52);
    pub const IODINE: Element = Element(53);

    pub fn from_atomic_number(number: u8) -> Option<Self> {
        ((number as usize) < SYMBOLS.len()).then_some(Element(number))
    }

    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOLS[self.0 as usize]
    }

    pub fn is_heavy(&self) -> bool {
        self.0 > 1
    }

    /// Allowed neutral valences, lowest first, for elements with a well-defined
    /// covalent valence model.
    pub fn default_valences(&self) -> Option<&'static [u8]> {
        match self.0 {
            1 => Some(&[1]),
            5 => Some(&[3]),
            6 => Some(&[4]),
            7 => Some(&[3]),
            8 => Some(&[2]),
            9 => Some(&[1]),
            14 => Some(&[4]),
            15 => Some(&[3, 5]),
            16 => Some(&[2, 4, 6]),
            17 => Some(&[1]),
            33 => Some(&[3, 5]),
            34 => Some(&[2, 4, 6]),
            35 => Some(&[1]),
            52 => Some(&[2, 4, 6]),
            53 => Some(&[1, 3, 5]),
            _ => None,
        }
    }

    /// Maximum valence after shifting to the isoelectronic element for `charge`.
    ///
    /// `N+` behaves like carbon, `O-` like fluorine, `C-` like nitrogen.
    pub fn max_valence(&self, charge: i8) -> Option<u8> {
        let shifted = self.0 as i16 - charge as i16;
        if !(1..=118).contains(&shifted) {
            return None;
        }
        // Shifting across a period boundary (e.g. F- to O2-) has no sensible model.
        if period(shifted as u8) != period(self.0) {
            return None;
        }
        Element(shifted as u8)
            .default_valences()
            .and_then(|v| v.last().copied())
    }
}

fn period(atomic_number: u8) -> u8 {
    match atomic_number {
        0..=2 => 1,
        3..=10 => 2,
        11..=18 => 3,
        19..=36 => 4,
        37..=54 => 5,
        55..=86 => 6,
        _ => 7,
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(Element::WILDCARD);
        }
        ELEMENT_NUMBERS
            .get(s)
            .map(|&n| Element(n))
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip_through_atomic_numbers() {
        for symbol in ["H", "C", "Cl", "Br", "Se", "Og"] {
            let element: Element = symbol.parse().unwrap();
            assert_eq!(element.symbol(), symbol);
        }
        assert_eq!("Cl".parse::<Element>().unwrap().atomic_number(), 17);
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert!("Xx".parse::<Element>().is_err());
        assert!("cl".parse::<Element>().is_err());
    }

    #[test]
    fn wildcard_is_not_heavy() {
        assert!(!Element::WILDCARD.is_heavy());
        assert!(!Element::HYDROGEN.is_heavy());
        assert!(Element::CARBON.is_heavy());
    }

    #[test]
    fn charged_atoms_use_isoelectronic_valence() {
        assert_eq!(Element::NITROGEN.max_valence(0), Some(3));
        assert_eq!(Element::NITROGEN.max_valence(1), Some(4));
        assert_eq!(Element::OXYGEN.max_valence(-1), Some(1));
        assert_eq!(Element::OXYGEN.max_valence(1), Some(3));
        assert_eq!(Element::CARBON.max_valence(-1), Some(3));
        assert_eq!(Element::SULFUR.max_valence(0), Some(6));
        assert_eq!(Element::from_atomic_number(26).unwrap().max_valence(0), None);
    }
}
