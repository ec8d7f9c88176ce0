//! SMILES parsing into a [`MolecularGraph`].
//!
//! Covers the OpenSMILES grammar needed for small-molecule solutes: the organic
//! subset, bracket atoms, bond symbols, branches, ring closures, and dot-separated
//! components. Stereo marks are accepted and discarded.
//!
//! Parsing happens in two stages. Syntax is always enforced; chemistry
//! (valences, aromatic atoms outside rings) is only enforced in strict mode, which
//! lets callers fall back to a relaxed parse for structures a force field happily
//! simulates but a valence model rejects.

use super::element::Element;
use super::graph::{Atom, AtomId, BondOrder, MolecularGraph};
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    #[error("SMILES string is empty")]
    Empty,

    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("unknown element '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },

    #[error("unterminated bracket atom starting at position {position}")]
    UnterminatedBracket { position: usize },

    #[error("unbalanced parentheses at position {position}")]
    UnbalancedParentheses { position: usize },

    #[error("bond at position {position} is not attached to an atom")]
    DanglingBond { position: usize },

    #[error("ring closure {label} was never closed")]
    UnclosedRing { label: u16 },

    #[error("ring closure {label} uses conflicting bond symbols")]
    ConflictingRingBond { label: u16 },

    #[error("invalid bond created by ring closure {label} (self-loop or duplicate bond)")]
    InvalidRingBond { label: u16 },

    #[error("{field} '{value}' at position {position} is out of range")]
    OutOfRange {
        field: &'static str,
        value: String,
        position: usize,
    },

    #[error("explicit valence {valence} of {element} (charge {charge}) exceeds the permitted {allowed}")]
    Valence {
        element: Element,
        charge: i8,
        valence: u16,
        allowed: u8,
    },

    #[error("aromatic atom {element} is not part of a ring")]
    NonRingAromaticAtom { element: Element },
}

/// Parses a SMILES string.
///
/// With `strict` set the parsed graph is also sanitized: every atom must respect
/// its charge-adjusted maximum valence and every aromatic atom must lie in a ring.
pub fn parse(smiles: &str, strict: bool) -> Result<MolecularGraph, SmilesError> {
    let mut graph = Parser::new(smiles).run()?;

    graph
        .update_property_cache(strict)
        .map_err(|v| SmilesError::Valence {
            element: v.element,
            charge: v.charge,
            valence: v.valence,
            allowed: v.allowed,
        })?;

    if strict {
        let misplaced = graph
            .atoms_iter()
            .find(|(id, atom)| atom.aromatic && !graph.is_ring_atom(*id));
        if let Some((_, atom)) = misplaced {
            return Err(SmilesError::NonRingAromaticAtom {
                element: atom.element,
            });
        }
    }

    Ok(graph)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondSymbol {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
    /// `/` or `\`; directional single bonds.
    Directional,
}

impl BondSymbol {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(BondSymbol::Single),
            '=' => Some(BondSymbol::Double),
            '#' => Some(BondSymbol::Triple),
            '$' => Some(BondSymbol::Quadruple),
            ':' => Some(BondSymbol::Aromatic),
            '/' | '\\' => Some(BondSymbol::Directional),
            _ => None,
        }
    }

    fn order(&self) -> BondOrder {
        match self {
            BondSymbol::Single | BondSymbol::Directional => BondOrder::Single,
            BondSymbol::Double => BondOrder::Double,
            BondSymbol::Triple => BondOrder::Triple,
            BondSymbol::Quadruple => BondOrder::Quadruple,
            BondSymbol::Aromatic => BondOrder::Aromatic,
        }
    }
}

struct OpenRing {
    atom: AtomId,
    bond: Option<BondSymbol>,
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    graph: MolecularGraph,
    previous: Option<AtomId>,
    pending_bond: Option<(BondSymbol, usize)>,
    branches: Vec<(AtomId, usize)>,
    rings: BTreeMap<u16, OpenRing>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            graph: MolecularGraph::new(),
            previous: None,
            pending_bond: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
        }
    }

    fn run(mut self) -> Result<MolecularGraph, SmilesError> {
        if self.input.trim().is_empty() {
            return Err(SmilesError::Empty);
        }

        while let Some(&(position, c)) = self.chars.peek() {
            match c {
                ' ' | '\t' | '\n' | '\r' => break,
                '[' => {
                    self.chars.next();
                    let atom = self.bracket_atom(position)?;
                    self.attach(atom, position)?;
                }
                '(' => {
                    self.chars.next();
                    let anchor = self
                        .previous
                        .ok_or(SmilesError::UnbalancedParentheses { position })?;
                    if self.pending_bond.is_some() {
                        return Err(SmilesError::UnexpectedCharacter {
                            character: c,
                            position,
                        });
                    }
                    self.branches.push((anchor, position));
                }
                ')' => {
                    self.chars.next();
                    if let Some((_, bond_position)) = self.pending_bond {
                        return Err(SmilesError::DanglingBond {
                            position: bond_position,
                        });
                    }
                    let (anchor, _) = self
                        .branches
                        .pop()
                        .ok_or(SmilesError::UnbalancedParentheses { position })?;
                    self.previous = Some(anchor);
                }
                '.' => {
                    self.chars.next();
                    if let Some((_, bond_position)) = self.pending_bond {
                        return Err(SmilesError::DanglingBond {
                            position: bond_position,
                        });
                    }
                    self.previous = None;
                }
                '%' | '0'..='9' => {
                    let label = self.ring_label(position)?;
                    self.ring_closure(label, position)?;
                }
                _ if BondSymbol::from_char(c).is_some() => {
                    self.chars.next();
                    if self.previous.is_none() || self.pending_bond.is_some() {
                        return Err(SmilesError::DanglingBond { position });
                    }
                    self.pending_bond = BondSymbol::from_char(c).map(|b| (b, position));
                }
                _ => {
                    let atom = self.organic_atom(position)?;
                    self.attach(atom, position)?;
                }
            }
        }

        if let Some((_, position)) = self.pending_bond {
            return Err(SmilesError::DanglingBond { position });
        }
        if let Some(&(_, position)) = self.branches.last() {
            return Err(SmilesError::UnbalancedParentheses { position });
        }
        if let Some(&label) = self.rings.keys().next() {
            return Err(SmilesError::UnclosedRing { label });
        }
        if self.graph.atom_count() == 0 {
            return Err(SmilesError::Empty);
        }
        Ok(self.graph)
    }

    fn attach(&mut self, atom: Atom, position: usize) -> Result<(), SmilesError> {
        let id = self.graph.add_atom(atom);
        match (self.previous, self.pending_bond.take()) {
            (Some(prev), bond) => {
                let order = self.resolve_order(prev, id, bond.map(|(b, _)| b));
                // A freshly added atom cannot already be bonded to `prev`.
                if self.graph.add_bond(prev, id, order).is_none() {
                    return Err(SmilesError::UnexpectedCharacter {
                        character: self.input[position..].chars().next().unwrap_or('?'),
                        position,
                    });
                }
            }
            (None, Some((_, bond_position))) => {
                return Err(SmilesError::DanglingBond {
                    position: bond_position,
                });
            }
            (None, None) => {}
        }
        self.previous = Some(id);
        Ok(())
    }

    fn resolve_order(&self, a: AtomId, b: AtomId, symbol: Option<BondSymbol>) -> BondOrder {
        match symbol {
            Some(s) => s.order(),
            None => {
                let both_aromatic = self.graph.atom(a).is_some_and(|x| x.aromatic)
                    && self.graph.atom(b).is_some_and(|x| x.aromatic);
                if both_aromatic {
                    BondOrder::Aromatic
                } else {
                    BondOrder::Single
                }
            }
        }
    }

    fn ring_label(&mut self, position: usize) -> Result<u16, SmilesError> {
        let Some((_, c)) = self.chars.next() else {
            return Err(SmilesError::Empty);
        };
        if c != '%' {
            return Ok(c.to_digit(10).unwrap_or(0) as u16);
        }
        let mut digits = String::new();
        for _ in 0..2 {
            match self.chars.next() {
                Some((_, d)) if d.is_ascii_digit() => digits.push(d),
                Some((p, d)) => {
                    return Err(SmilesError::UnexpectedCharacter {
                        character: d,
                        position: p,
                    });
                }
                None => {
                    return Err(SmilesError::UnexpectedCharacter {
                        character: '%',
                        position,
                    });
                }
            }
        }
        Ok(digits.parse().unwrap_or(0))
    }

    fn ring_closure(&mut self, label: u16, position: usize) -> Result<(), SmilesError> {
        let current = self
            .previous
            .ok_or(SmilesError::DanglingBond { position })?;
        let bond = self.pending_bond.take().map(|(b, _)| b);

        match self.rings.remove(&label) {
            Some(open) => {
                let symbol = match (open.bond, bond) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(SmilesError::ConflictingRingBond { label });
                    }
                    (Some(a), _) => Some(a),
                    (None, b) => b,
                };
                let order = self.resolve_order(open.atom, current, symbol);
                self.graph
                    .add_bond(open.atom, current, order)
                    .ok_or(SmilesError::InvalidRingBond { label })?;
            }
            None => {
                self.rings.insert(
                    label,
                    OpenRing {
                        atom: current,
                        bond,
                    },
                );
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self, position: usize) -> Result<Atom, SmilesError> {
        let Some((_, c)) = self.chars.next() else {
            return Err(SmilesError::Empty);
        };
        let (element, aromatic) = match c {
            'C' if self.next_is('l') => {
                self.chars.next();
                (Element::CHLORINE, false)
            }
            'B' if self.next_is('r') => {
                self.chars.next();
                (Element::BROMINE, false)
            }
            'B' => (Element::BORON, false),
            'C' => (Element::CARBON, false),
            'N' => (Element::NITROGEN, false),
            'O' => (Element::OXYGEN, false),
            'P' => (Element::PHOSPHORUS, false),
            'S' => (Element::SULFUR, false),
            'F' => (Element::FLUORINE, false),
            'I' => (Element::IODINE, false),
            'b' => (Element::BORON, true),
            'c' => (Element::CARBON, true),
            'n' => (Element::NITROGEN, true),
            'o' => (Element::OXYGEN, true),
            'p' => (Element::PHOSPHORUS, true),
            's' => (Element::SULFUR, true),
            '*' => (Element::WILDCARD, false),
            _ if c.is_ascii_alphabetic() => {
                return Err(SmilesError::UnknownElement {
                    symbol: c.to_string(),
                    position,
                });
            }
            _ => {
                return Err(SmilesError::UnexpectedCharacter {
                    character: c,
                    position,
                });
            }
        };
        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        Ok(atom)
    }

    fn bracket_atom(&mut self, start: usize) -> Result<Atom, SmilesError> {
        let close = self.input[start..]
            .find(']')
            .map(|offset| start + offset)
            .ok_or(SmilesError::UnterminatedBracket { position: start })?;
        let body = &self.input[start + 1..close];
        while self.chars.peek().is_some_and(|&(p, _)| p <= close) {
            self.chars.next();
        }
        BracketBody::new(body, start + 1).parse()
    }

    fn next_is(&mut self, expected: char) -> bool {
        self.chars.peek().is_some_and(|&(_, c)| c == expected)
    }
}

/// Largest bracket charge magnitude OpenSMILES permits.
const MAX_CHARGE: i8 = 15;

/// Cursor over the text between `[` and `]`.
struct BracketBody<'a> {
    text: &'a str,
    offset: usize,
    cursor: usize,
}

impl<'a> BracketBody<'a> {
    fn new(text: &'a str, offset: usize) -> Self {
        Self {
            text,
            offset,
            cursor: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.cursor..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    /// Reads a run of digits, returning the value and its position.
    fn number(&mut self, field: &'static str) -> Result<Option<(u32, usize)>, SmilesError> {
        let position = self.offset + self.cursor;
        let digits: String = self.text[self.cursor..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return Ok(None);
        }
        self.cursor += digits.len();
        match digits.parse() {
            Ok(value) => Ok(Some((value, position))),
            Err(_) => Err(SmilesError::OutOfRange {
                field,
                value: digits,
                position,
            }),
        }
    }

    fn out_of_range(field: &'static str, value: impl ToString, position: usize) -> SmilesError {
        SmilesError::OutOfRange {
            field,
            value: value.to_string(),
            position,
        }
    }

    fn unexpected(&self) -> SmilesError {
        SmilesError::UnexpectedCharacter {
            character: self.peek().unwrap_or(']'),
            position: self.offset + self.cursor,
        }
    }

    fn parse(mut self) -> Result<Atom, SmilesError> {
        let isotope = match self.number("isotope")? {
            Some((n, position)) => Some(
                u16::try_from(n).map_err(|_| Self::out_of_range("isotope", n, position))?,
            ),
            None => None,
        };
        let (element, aromatic) = self.symbol()?;

        // Chirality: @, @@, or @TH1-style classes.
        if self.peek() == Some('@') {
            while self.peek() == Some('@') {
                self.bump();
            }
            let rest = &self.text[self.cursor..];
            if ["TH", "AL", "SP", "TB", "OH"]
                .iter()
                .any(|class| rest.starts_with(class))
            {
                self.cursor += 2;
                self.number("chirality class")?;
            }
        }

        let mut hydrogens = 0;
        if self.peek() == Some('H') {
            self.bump();
            hydrogens = match self.number("hydrogen count")? {
                Some((n, position)) => u8::try_from(n)
                    .map_err(|_| Self::out_of_range("hydrogen count", n, position))?,
                None => 1,
            };
        }

        let mut charge: i8 = 0;
        if let Some(sign @ ('+' | '-')) = self.peek() {
            let position = self.offset + self.cursor;
            let unit: i8 = if sign == '+' { 1 } else { -1 };
            self.bump();
            let magnitude = match self.number("charge")? {
                Some((n, _)) => n,
                None => {
                    let mut count: u32 = 1;
                    while self.peek() == Some(sign) {
                        self.bump();
                        count = count.checked_add(1).ok_or_else(|| {
                            Self::out_of_range("charge", sign, position)
                        })?;
                    }
                    count
                }
            };
            charge = i8::try_from(magnitude)
                .ok()
                .filter(|m| *m <= MAX_CHARGE)
                .map(|m| unit * m)
                .ok_or_else(|| {
                    Self::out_of_range("charge", format!("{sign}{magnitude}"), position)
                })?;
        }

        if self.peek() == Some(':') {
            self.bump();
            if self.number("atom class")?.is_none() {
                return Err(self.unexpected());
            }
        }

        if self.cursor != self.text.len() {
            return Err(self.unexpected());
        }

        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        atom.charge = charge;
        atom.isotope = isotope;
        atom.bracket_hydrogens = Some(hydrogens);
        Ok(atom)
    }

    fn symbol(&mut self) -> Result<(Element, bool), SmilesError> {
        let position = self.offset + self.cursor;
        let first = self.bump().ok_or(SmilesError::UnterminatedBracket {
            position: self.offset.saturating_sub(1),
        })?;

        if first == '*' {
            return Ok((Element::WILDCARD, false));
        }

        if first.is_ascii_lowercase() {
            // Two-letter aromatic symbols first: se, as, te.
            if let Some(second) = self.peek() {
                let candidate = match (first, second) {
                    ('s', 'e') => Some(Element::SELENIUM),
                    ('a', 's') => Some(Element::ARSENIC),
                    ('t', 'e') => Some(Element::TELLURIUM),
                    _ => None,
                };
                if let Some(element) = candidate {
                    self.bump();
                    return Ok((element, true));
                }
            }
            let element = match first {
                'b' => Element::BORON,
                'c' => Element::CARBON,
                'n' => Element::NITROGEN,
                'o' => Element::OXYGEN,
                'p' => Element::PHOSPHORUS,
                's' => Element::SULFUR,
                _ => {
                    return Err(SmilesError::UnknownElement {
                        symbol: first.to_string(),
                        position,
                    });
                }
            };
            return Ok((element, true));
        }

        if !first.is_ascii_uppercase() {
            return Err(SmilesError::UnexpectedCharacter {
                character: first,
                position,
            });
        }

        if let Some(second) = self.peek().filter(|c| c.is_ascii_lowercase()) {
            let two: String = [first, second].iter().collect();
            if let Ok(element) = two.parse::<Element>() {
                self.bump();
                return Ok((element, false));
            }
        }

        first
            .to_string()
            .parse::<Element>()
            .map(|e| (e, false))
            .map_err(|_| SmilesError::UnknownElement {
                symbol: first.to_string(),
                position,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heavy(smiles: &str) -> usize {
        parse(smiles, true).unwrap().heavy_atom_count()
    }

    #[test]
    fn parses_linear_chain_with_implicit_hydrogens() {
        let graph = parse("CCO", true).unwrap();
        assert_eq!(graph.atom_count(), 3);
        assert_eq!(graph.bond_count(), 2);
        let hydrogens: Vec<_> = graph
            .atoms_iter()
            .map(|(id, _)| graph.total_hydrogens(id))
            .collect();
        assert_eq!(hydrogens, vec![3, 2, 1]);
    }

    #[test]
    fn parses_two_letter_organic_symbols() {
        let graph = parse("ClCBr", true).unwrap();
        assert_eq!(graph.count_element(Element::CHLORINE), 1);
        assert_eq!(graph.count_element(Element::BROMINE), 1);
        assert_eq!(graph.count_element(Element::CARBON), 1);
    }

    #[test]
    fn parses_branches_and_bond_symbols() {
        let graph = parse("CC(=O)O", true).unwrap();
        assert_eq!(graph.atom_count(), 4);
        let doubles = graph
            .bonds_iter()
            .filter(|(_, b)| b.order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 1);
    }

    #[test]
    fn aromatic_ring_gets_aromatic_bonds_and_one_hydrogen_per_carbon() {
        let graph = parse("c1ccccc1", true).unwrap();
        assert_eq!(graph.ring_count(), 1);
        assert!(
            graph
                .bonds_iter()
                .all(|(_, b)| b.order == BondOrder::Aromatic && b.in_ring)
        );
        assert!(graph.atoms_iter().all(|(id, _)| graph.total_hydrogens(id) == 1));
    }

    #[test]
    fn five_membered_heteroaromatics_take_no_extra_hydrogen_on_the_heteroatom() {
        let thiophene = parse("c1ccsc1", true).unwrap();
        let sulfur = thiophene
            .atoms_iter()
            .find(|(_, a)| a.element == Element::SULFUR)
            .map(|(id, _)| id)
            .unwrap();
        assert_eq!(thiophene.total_hydrogens(sulfur), 0);

        let pyrrole = parse("c1cc[nH]c1", true).unwrap();
        let nitrogen = pyrrole
            .atoms_iter()
            .find(|(_, a)| a.element == Element::NITROGEN)
            .map(|(id, _)| id)
            .unwrap();
        assert_eq!(pyrrole.total_hydrogens(nitrogen), 1);
    }

    #[test]
    fn bracket_atoms_carry_charge_isotope_and_hydrogens() {
        let graph = parse("[13CH3][NH3+]", true).unwrap();
        let atoms: Vec<_> = graph.atoms_iter().map(|(_, a)| a.clone()).collect();
        assert_eq!(atoms[0].isotope, Some(13));
        assert_eq!(atoms[0].bracket_hydrogens, Some(3));
        assert_eq!(atoms[1].charge, 1);
        assert_eq!(atoms[1].bracket_hydrogens, Some(3));
    }

    #[test]
    fn bracket_charges_accept_repeated_and_numeric_forms() {
        let graph = parse("[Fe++].[O-2].[Cu+2]", false).unwrap();
        let charges: Vec<_> = graph.atoms_iter().map(|(_, a)| a.charge).collect();
        assert_eq!(charges, vec![2, -2, 2]);
    }

    #[test]
    fn two_letter_bracket_symbols_win_over_element_plus_hydrogen() {
        let graph = parse("[Sc]", true).unwrap();
        assert_eq!(graph.atoms_iter().next().unwrap().1.element.symbol(), "Sc");
        let methane = parse("[CH4]", true).unwrap();
        assert_eq!(methane.total_hydrogens(methane.atoms_iter().next().unwrap().0), 4);
    }

    #[test]
    fn stereo_marks_are_ignored() {
        assert_eq!(heavy("F/C=C/F"), 4);
        assert_eq!(heavy("N[C@@H](C)C(=O)O"), 6);
        assert_eq!(heavy("C[C@TH1H](O)F"), 4);
    }

    #[test]
    fn percent_ring_labels_and_dot_components() {
        let graph = parse("C%10CCCCC%10.O", true).unwrap();
        assert_eq!(graph.ring_count(), 1);
        assert_eq!(graph.component_count(), 2);
    }

    #[test]
    fn trailing_title_is_ignored() {
        assert_eq!(heavy("CCO ethanol"), 3);
    }

    #[test]
    fn explicit_hydrogen_atoms_are_not_heavy() {
        let graph = parse("[H]OC", true).unwrap();
        assert_eq!(graph.atom_count(), 3);
        assert_eq!(graph.heavy_atom_count(), 2);
    }

    #[test]
    fn syntax_errors_fail_in_both_modes() {
        for bad in ["", "C(C", "CC)", "C1CC", "C=", "[CH3", "Xy", "C((C))=", "C==C", "=C"] {
            assert!(parse(bad, true).is_err(), "strict accepted {bad:?}");
            assert!(parse(bad, false).is_err(), "relaxed accepted {bad:?}");
        }
    }

    #[test]
    fn ring_closure_errors_are_reported() {
        assert_eq!(
            parse("C1CC1C1", true).unwrap_err(),
            SmilesError::UnclosedRing { label: 1 }
        );
        assert_eq!(
            parse("C=1CC-1", true).unwrap_err(),
            SmilesError::ConflictingRingBond { label: 1 }
        );
        assert_eq!(
            parse("C11", true).unwrap_err(),
            SmilesError::InvalidRingBond { label: 1 }
        );
    }

    #[test]
    fn valence_violations_only_fail_strict_parsing() {
        let pentavalent = "C(C)(C)(C)(C)C";
        assert!(matches!(
            parse(pentavalent, true),
            Err(SmilesError::Valence { .. })
        ));
        assert_eq!(parse(pentavalent, false).unwrap().heavy_atom_count(), 6);
    }

    #[test]
    fn aromatic_atoms_outside_rings_only_fail_strict_parsing() {
        assert!(matches!(
            parse("cc", true),
            Err(SmilesError::NonRingAromaticAtom { .. })
        ));
        assert!(parse("cc", false).is_ok());
    }

    #[test]
    fn bracket_fields_outside_their_range_are_rejected() {
        for bad in ["[C-128]", "[C+200]", "[C+16]", "[CH300]", "[70000C]", "[C+99999999999]"] {
            assert!(
                matches!(parse(bad, false), Err(SmilesError::OutOfRange { .. })),
                "relaxed accepted {bad:?}"
            );
        }
        let graph = parse("[Fe+15].[Cl-15]", false).unwrap();
        let charges: Vec<_> = graph.atoms_iter().map(|(_, a)| a.charge).collect();
        assert_eq!(charges, vec![15, -15]);
    }

    #[test]
    fn repeated_charge_signs_are_bounded() {
        let sixteen = format!("[C{}]", "+".repeat(16));
        assert!(matches!(
            parse(&sixteen, false),
            Err(SmilesError::OutOfRange { field: "charge", .. })
        ));
        let fifteen = format!("[C{}]", "-".repeat(15));
        let graph = parse(&fifteen, false).unwrap();
        assert_eq!(graph.atoms_iter().next().unwrap().1.charge, -15);
    }

    #[test]
    fn large_hydrogen_counts_fail_strict_valence_only() {
        assert!(matches!(
            parse("[CH255]C", true),
            Err(SmilesError::Valence { valence: 256, .. })
        ));
        assert_eq!(parse("[CH255]C", false).unwrap().heavy_atom_count(), 2);
    }

    #[test]
    fn very_high_connectivity_fails_strict_valence_only() {
        let crowded = format!("C{}", "(C)".repeat(300));
        assert!(matches!(
            parse(&crowded, true),
            Err(SmilesError::Valence { valence: 300, .. })
        ));
        assert_eq!(parse(&crowded, false).unwrap().heavy_atom_count(), 301);
    }

    #[test]
    fn charged_bracket_atoms_use_adjusted_valence() {
        assert!(parse("C[N+](C)(C)C", true).is_ok());
        assert!(parse("C[N](C)(C)C", true).is_err());
        assert!(parse("CC(=O)[O-]", true).is_ok());
    }
}
