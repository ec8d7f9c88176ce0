use super::extractor::Extractor;
use super::series::PropertySeries;
use std::collections::BTreeMap;
use thiserror::Error;

/// Opaque key/value options forwarded untouched to every extractor invocation.
///
/// Typical entries are solvent model names or frame strides; the composition engine
/// never interprets them.
pub type ExtractorOptions = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("Source does not support extractor {extractor}")]
    Unsupported { extractor: Extractor },

    #[error("Extractor {extractor} produced no series named '{property}'")]
    MissingProperty {
        extractor: Extractor,
        property: String,
    },

    #[error(
        "Extractor {extractor}: series '{property}' has {found} frames, expected {expected}"
    )]
    FrameCountMismatch {
        extractor: Extractor,
        property: String,
        expected: usize,
        found: usize,
    },

    #[error("Extractor {extractor}: series '{property}' has a non-finite sample at frame {frame}")]
    NonFiniteSample {
        extractor: Extractor,
        property: String,
        frame: usize,
    },

    #[error("Extractor {extractor} failed: {reason}")]
    Failed { extractor: Extractor, reason: String },
}

/// A handle onto one simulation of the solute.
///
/// Implementors are borrowed immutably for the whole run and may be shared across
/// threads, so concurrent runs over independent sources need no coordination.
pub trait SimulationSource: Send + Sync {
    /// Identifier embedded in the source (e.g. a topology title). An empty string
    /// means absent.
    fn embedded_identifier(&self) -> &str {
        ""
    }

    /// Computes the per-frame series for one extractor.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the source lacks the data the extractor needs.
    fn compute(
        &self,
        extractor: Extractor,
        options: &ExtractorOptions,
    ) -> Result<PropertySeries, ExtractionError>;
}

impl<T: SimulationSource + ?Sized> SimulationSource for &T {
    fn embedded_identifier(&self) -> &str {
        (**self).embedded_identifier()
    }

    fn compute(
        &self,
        extractor: Extractor,
        options: &ExtractorOptions,
    ) -> Result<PropertySeries, ExtractionError> {
        (**self).compute(extractor, options)
    }
}

impl<T: SimulationSource + ?Sized> SimulationSource for Box<T> {
    fn embedded_identifier(&self) -> &str {
        (**self).embedded_identifier()
    }

    fn compute(
        &self,
        extractor: Extractor,
        options: &ExtractorOptions,
    ) -> Result<PropertySeries, ExtractionError> {
        (**self).compute(extractor, options)
    }
}

/// Wraps a source and overrides its embedded identifier.
#[derive(Debug, Clone)]
pub struct WithIdentifier<S> {
    inner: S,
    identifier: String,
}

impl<S: SimulationSource> WithIdentifier<S> {
    pub fn new(inner: S, identifier: impl Into<String>) -> Self {
        Self {
            inner,
            identifier: identifier.into(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: SimulationSource> SimulationSource for WithIdentifier<S> {
    fn embedded_identifier(&self) -> &str {
        &self.identifier
    }

    fn compute(
        &self,
        extractor: Extractor,
        options: &ExtractorOptions,
    ) -> Result<PropertySeries, ExtractionError> {
        self.inner.compute(extractor, options)
    }
}
