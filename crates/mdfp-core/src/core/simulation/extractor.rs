use serde::{Deserialize, Serialize};
use std::fmt;

/// The simulation environment a trajectory was sampled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Regime {
    /// A single solute in explicit water.
    Solution,
    /// A box of the pure compound.
    Liquid,
}

impl Regime {
    /// Prefix used to namespace this regime's fingerprint keys.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Regime::Solution => "water",
            Regime::Liquid => "liquid",
        }
    }

    /// The ordered extractor list run against a source of this regime.
    pub fn extractors(&self) -> &'static [Extractor] {
        match self {
            Regime::Solution => &SOLUTION_EXTRACTORS,
            Regime::Liquid => &LIQUID_EXTRACTORS,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Solution => f.write_str("solution"),
            Regime::Liquid => f.write_str("liquid"),
        }
    }
}

/// A family of per-frame physical properties computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    /// Intramolecular and total reaction-field electrostatics and Lennard-Jones energies.
    Energies,
    RadiusOfGyration,
    /// Solvent-accessible surface area.
    Sasa,
    DipoleMagnitude,
}

impl Property {
    /// Names of the series this property family yields, in output order.
    pub fn series_names(&self) -> &'static [&'static str] {
        match self {
            Property::Energies => &["intra_crf", "intra_lj", "total_crf", "total_lj"],
            Property::RadiusOfGyration => &["rgyr"],
            Property::Sasa => &["sasa"],
            Property::DipoleMagnitude => &["dipole_magnitude"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Property::Energies => "energies",
            Property::RadiusOfGyration => "radius-of-gyration",
            Property::Sasa => "sasa",
            Property::DipoleMagnitude => "dipole-magnitude",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named extraction capability: one property family in one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Extractor {
    pub regime: Regime,
    pub property: Property,
}

impl Extractor {
    pub const fn new(regime: Regime, property: Property) -> Self {
        Self { regime, property }
    }

    pub fn series_names(&self) -> &'static [&'static str] {
        self.property.series_names()
    }

    /// Regime-qualified fingerprint key for one of this extractor's series,
    /// e.g. `water_rgyr`.
    pub fn qualified_key(&self, series_name: &str) -> String {
        format!("{}_{}", self.regime.key_prefix(), series_name)
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.regime, self.property)
    }
}

/// A fingerprint layout: which regimes contribute, in assembly order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    Solution,
    Liquid,
    SolutionLiquid,
}

impl Variant {
    pub fn regimes(&self) -> &'static [Regime] {
        match self {
            Variant::Solution => &[Regime::Solution],
            Variant::Liquid => &[Regime::Liquid],
            Variant::SolutionLiquid => &[Regime::Solution, Regime::Liquid],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Solution => "solution",
            Variant::Liquid => "liquid",
            Variant::SolutionLiquid => "solution-liquid",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const SOLUTION_EXTRACTORS: [Extractor; 3] = [
    Extractor::new(Regime::Solution, Property::Energies),
    Extractor::new(Regime::Solution, Property::RadiusOfGyration),
    Extractor::new(Regime::Solution, Property::Sasa),
];

pub const LIQUID_EXTRACTORS: [Extractor; 4] = [
    Extractor::new(Regime::Liquid, Property::Energies),
    Extractor::new(Regime::Liquid, Property::RadiusOfGyration),
    Extractor::new(Regime::Liquid, Property::Sasa),
    Extractor::new(Regime::Liquid, Property::DipoleMagnitude),
];
