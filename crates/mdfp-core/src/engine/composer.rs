use super::error::ComposeError;
use crate::core::simulation::extractor::{Regime, Variant};
use crate::core::simulation::source::SimulationSource;
use std::fmt;

/// The closed set of fingerprint compositions.
///
/// Each variant borrows the simulation sources it reads from; a composer holds no
/// other state and can be run any number of times.
#[derive(Clone, Copy)]
pub enum Composer<'a> {
    /// Solute in water: energies, radius of gyration, SASA.
    Solution { source: &'a dyn SimulationSource },
    /// Pure liquid: energies, radius of gyration, SASA, dipole magnitude.
    Liquid { source: &'a dyn SimulationSource },
    /// Both regimes, solution first.
    SolutionLiquid {
        solution: &'a dyn SimulationSource,
        liquid: &'a dyn SimulationSource,
    },
}

impl<'a> Composer<'a> {
    pub fn solution(source: &'a dyn SimulationSource) -> Self {
        Composer::Solution { source }
    }

    pub fn liquid(source: &'a dyn SimulationSource) -> Self {
        Composer::Liquid { source }
    }

    pub fn solution_liquid(
        solution: &'a dyn SimulationSource,
        liquid: &'a dyn SimulationSource,
    ) -> Self {
        Composer::SolutionLiquid { solution, liquid }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Composer::Solution { .. } => Variant::Solution,
            Composer::Liquid { .. } => Variant::Liquid,
            Composer::SolutionLiquid { .. } => Variant::SolutionLiquid,
        }
    }

    /// Sources paired with their regime, in assembly order.
    pub fn sources(&self) -> Vec<(Regime, &'a dyn SimulationSource)> {
        match *self {
            Composer::Solution { source } => vec![(Regime::Solution, source)],
            Composer::Liquid { source } => vec![(Regime::Liquid, source)],
            Composer::SolutionLiquid { solution, liquid } => {
                vec![(Regime::Solution, solution), (Regime::Liquid, liquid)]
            }
        }
    }

    /// Recovers the identifier embedded in the sources.
    ///
    /// The first non-empty embedded identifier wins. Returns `Ok(None)` when no source
    /// embeds one.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::ConflictingIdentifiers`] when the combined variant's two
    /// sources embed different non-empty identifiers.
    pub fn embedded_identifier(&self) -> Result<Option<&'a str>, ComposeError> {
        let mut found: Option<&'a str> = None;
        for (_, source) in self.sources() {
            let identifier = source.embedded_identifier().trim();
            if identifier.is_empty() {
                continue;
            }
            match found {
                None => found = Some(identifier),
                Some(first) if first == identifier => {}
                Some(first) => {
                    return Err(ComposeError::ConflictingIdentifiers {
                        solution: first.to_string(),
                        liquid: identifier.to_string(),
                    });
                }
            }
        }
        Ok(found)
    }
}

impl fmt::Debug for Composer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("variant", &self.variant())
            .finish_non_exhaustive()
    }
}
