use super::extractor::{Extractor, Property, Regime};
use super::series::PropertySeries;
use super::source::{ExtractionError, ExtractorOptions, SimulationSource};

/// Topology or parameter data accompanying a trajectory.
pub trait Topology {
    /// Free-text title; conventionally holds the solute SMILES.
    fn title(&self) -> &str;
}

/// Computes per-frame physical properties from a trajectory and its topology.
///
/// This is the seam to external simulation analysis tooling. Each method corresponds
/// to one property family and returns its series keyed by
/// [`Property::series_names`].
pub trait FramePropertyService<T, P> {
    type Error: std::fmt::Display;

    fn energies(
        &self,
        regime: Regime,
        trajectory: &T,
        topology: &P,
        options: &ExtractorOptions,
    ) -> Result<PropertySeries, Self::Error>;

    fn radius_of_gyration(
        &self,
        regime: Regime,
        trajectory: &T,
        topology: &P,
        options: &ExtractorOptions,
    ) -> Result<PropertySeries, Self::Error>;

    fn sasa(
        &self,
        regime: Regime,
        trajectory: &T,
        topology: &P,
        options: &ExtractorOptions,
    ) -> Result<PropertySeries, Self::Error>;

    /// Only needed by the liquid regime. Services that cannot compute it report
    /// the extractor as unsupported.
    fn dipole_magnitude(
        &self,
        _regime: Regime,
        _trajectory: &T,
        _topology: &P,
        _options: &ExtractorOptions,
    ) -> Option<Result<PropertySeries, Self::Error>> {
        None
    }
}

/// Pairs a trajectory, its topology, and a property service into a [`SimulationSource`].
///
/// The embedded identifier is the topology title with surrounding whitespace removed.
#[derive(Debug, Clone)]
pub struct SimulationHandle<T, P, S> {
    trajectory: T,
    topology: P,
    service: S,
}

impl<T, P, S> SimulationHandle<T, P, S>
where
    P: Topology,
    S: FramePropertyService<T, P>,
{
    pub fn new(trajectory: T, topology: P, service: S) -> Self {
        Self {
            trajectory,
            topology,
            service,
        }
    }

    pub fn trajectory(&self) -> &T {
        &self.trajectory
    }

    pub fn topology(&self) -> &P {
        &self.topology
    }
}

impl<T, P, S> SimulationSource for SimulationHandle<T, P, S>
where
    T: Send + Sync,
    P: Topology + Send + Sync,
    S: FramePropertyService<T, P> + Send + Sync,
{
    fn embedded_identifier(&self) -> &str {
        self.topology.title().trim()
    }

    fn compute(
        &self,
        extractor: Extractor,
        options: &ExtractorOptions,
    ) -> Result<PropertySeries, ExtractionError> {
        let (traj, top, regime) = (&self.trajectory, &self.topology, extractor.regime);
        let result = match extractor.property {
            Property::Energies => self.service.energies(regime, traj, top, options),
            Property::RadiusOfGyration => {
                self.service.radius_of_gyration(regime, traj, top, options)
            }
            Property::Sasa => self.service.sasa(regime, traj, top, options),
            Property::DipoleMagnitude => self
                .service
                .dipole_magnitude(regime, traj, top, options)
                .ok_or(ExtractionError::Unsupported { extractor })?,
        };
        result.map_err(|e| ExtractionError::Failed {
            extractor,
            reason: e.to_string(),
        })
    }
}
