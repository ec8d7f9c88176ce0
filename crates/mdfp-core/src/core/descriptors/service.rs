use crate::core::molecule::element::Element;
use crate::core::molecule::graph::{BondOrder, MolecularGraph};
use crate::core::molecule::smiles::{self, SmilesError};
use std::fmt;

/// An atom pattern matching a single element by atomic number, written `[#n]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementPattern(pub Element);

impl ElementPattern {
    pub fn matches(&self, element: Element) -> bool {
        self.0 == element
    }
}

impl fmt::Display for ElementPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[#{}]", self.0.atomic_number())
    }
}

/// Defines the interface to a molecular-graph toolkit.
///
/// The structural descriptor provider only ever talks to a toolkit through this
/// trait, so alternative parsers can be substituted without touching the
/// composition engine.
pub trait MolecularGraphService {
    /// The parsed molecule representation.
    type Graph;

    /// The error returned when an identifier cannot be parsed.
    type Error: std::error::Error;

    /// Parses an identifier into a graph.
    ///
    /// # Arguments
    ///
    /// * `identifier` - The molecular identifier, usually a SMILES string.
    /// * `strict` - Whether chemical sanitization must succeed. When `false`, only the
    ///   syntax is checked and ring and valence information is recomputed leniently.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is malformed, or in strict mode if the
    /// molecule fails sanitization.
    fn parse(&self, identifier: &str, strict: bool) -> Result<Self::Graph, Self::Error>;

    /// Counts atoms matching `pattern`.
    fn count_matches(&self, graph: &Self::Graph, pattern: ElementPattern) -> u32;

    fn rotatable_bond_count(&self, graph: &Self::Graph) -> u32;

    fn heavy_atom_count(&self, graph: &Self::Graph) -> u32;
}

/// The built-in SMILES toolkit backed by [`MolecularGraph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SmilesToolkit;

impl SmilesToolkit {
    pub fn new() -> Self {
        Self
    }
}

impl MolecularGraphService for SmilesToolkit {
    type Graph = MolecularGraph;
    type Error = SmilesError;

    fn parse(&self, identifier: &str, strict: bool) -> Result<MolecularGraph, SmilesError> {
        smiles::parse(identifier, strict)
    }

    fn count_matches(&self, graph: &MolecularGraph, pattern: ElementPattern) -> u32 {
        graph
            .atoms_iter()
            .filter(|(_, atom)| pattern.matches(atom.element))
            .count() as u32
    }

    /// Counts single, acyclic bonds between heavy atoms that rotate a real group.
    ///
    /// A bond end qualifies if it is non-terminal, or if it is a terminal polar rotor
    /// such as a hydroxyl, thiol, or primary amine (one or two hydrogens). Terminal
    /// methyls and halogens spin symmetrically and never count, nor does any bond
    /// touching an sp atom.
    fn rotatable_bond_count(&self, graph: &MolecularGraph) -> u32 {
        let end_qualifies = |id| {
            let Some(atom) = graph.atom(id) else {
                return false;
            };
            if !atom.element.is_heavy() || graph.has_bond_of_order(id, BondOrder::Triple) {
                return false;
            }
            match graph.heavy_degree(id) {
                0 => false,
                1 => (1..=2).contains(&graph.total_hydrogens(id)),
                _ => true,
            }
        };

        graph
            .bonds_iter()
            .filter(|(_, bond)| bond.order == BondOrder::Single && !bond.in_ring)
            .filter(|(_, bond)| end_qualifies(bond.begin) && end_qualifies(bond.end))
            .count() as u32
    }

    fn heavy_atom_count(&self, graph: &MolecularGraph) -> u32 {
        graph.heavy_atom_count() as u32
    }
}
