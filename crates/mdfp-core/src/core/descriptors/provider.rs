use super::service::{ElementPattern, MolecularGraphService, SmilesToolkit};
use crate::core::molecule::element::Element;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse molecular identifier '{identifier}': {reason}")]
pub struct ParseError {
    pub identifier: String,
    pub reason: String,
}

pub const DESCRIPTOR_COUNT: usize = 10;

/// Names of the structural descriptor slots, in emission order.
pub const DESCRIPTOR_NAMES: [&str; DESCRIPTOR_COUNT] = [
    "heavy_atoms",
    "rotatable_bonds",
    "nitrogen",
    "oxygen",
    "fluorine",
    "phosphorus",
    "sulfur",
    "chlorine",
    "bromine",
    "iodine",
];

const ELEMENT_PATTERNS: [ElementPattern; 8] = [
    ElementPattern(Element::NITROGEN),
    ElementPattern(Element::OXYGEN),
    ElementPattern(Element::FLUORINE),
    ElementPattern(Element::PHOSPHORUS),
    ElementPattern(Element::SULFUR),
    ElementPattern(Element::CHLORINE),
    ElementPattern(Element::BROMINE),
    ElementPattern(Element::IODINE),
];

/// The fixed-order 2-D count vector of a molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StructuralDescriptors([u32; DESCRIPTOR_COUNT]);

impl StructuralDescriptors {
    pub fn values(&self) -> &[u32; DESCRIPTOR_COUNT] {
        &self.0
    }

    pub fn heavy_atoms(&self) -> u32 {
        self.0[0]
    }

    pub fn rotatable_bonds(&self) -> u32 {
        self.0[1]
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.0.to_vec()
    }
}

impl From<[u32; DESCRIPTOR_COUNT]> for StructuralDescriptors {
    fn from(values: [u32; DESCRIPTOR_COUNT]) -> Self {
        Self(values)
    }
}

/// Derives structural descriptors from a molecular identifier.
///
/// The provider is stateless beyond its graph service; it never retains the
/// identifiers it is given.
#[derive(Debug, Clone, Default)]
pub struct StructuralDescriptorProvider<S = SmilesToolkit> {
    service: S,
}

impl StructuralDescriptorProvider<SmilesToolkit> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: MolecularGraphService> StructuralDescriptorProvider<S> {
    pub fn with_service(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Computes the ten structural counts for `identifier`.
    ///
    /// The identifier is parsed strictly first. If sanitization rejects it, parsing
    /// is retried in relaxed mode and the fallback is logged.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] only when both the strict and the relaxed parse fail.
    pub fn compute(&self, identifier: &str) -> Result<StructuralDescriptors, ParseError> {
        let graph = match self.service.parse(identifier, true) {
            Ok(graph) => graph,
            Err(strict_error) => {
                warn!(
                    identifier = identifier,
                    error = %strict_error,
                    "Strict parsing failed; retrying without sanitization."
                );
                self.service
                    .parse(identifier, false)
                    .map_err(|relaxed_error| ParseError {
                        identifier: identifier.to_string(),
                        reason: format!("{strict_error}; relaxed parse: {relaxed_error}"),
                    })?
            }
        };

        let mut values = [0u32; DESCRIPTOR_COUNT];
        values[0] = self.service.heavy_atom_count(&graph);
        values[1] = self.service.rotatable_bond_count(&graph);
        for (slot, pattern) in values[2..].iter_mut().zip(ELEMENT_PATTERNS) {
            *slot = self.service.count_matches(&graph, pattern);
        }

        debug!(identifier = identifier, descriptors = ?values, "Computed structural descriptors.");
        Ok(StructuralDescriptors(values))
    }
}
