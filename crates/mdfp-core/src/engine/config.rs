use crate::core::simulation::source::ExtractorOptions;
use crate::core::statistics::moments::{DEFAULT_MOMENTS, Moment};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Moment list must not be empty")]
    EmptyMomentList,

    #[error("Moment '{0}' is listed more than once")]
    DuplicateMoment(String),
}

/// Run-wide settings shared by every regime of one composition.
///
/// The moment list is global: every property of every regime is reduced with the
/// same moments in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerConfig {
    pub moments: Vec<Moment>,
    pub extractor_options: ExtractorOptions,
}

impl ComposerConfig {
    pub fn moment_names(&self) -> Vec<String> {
        self.moments.iter().map(|m| m.name().to_string()).collect()
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            moments: DEFAULT_MOMENTS.to_vec(),
            extractor_options: ExtractorOptions::new(),
        }
    }
}

#[derive(Default)]
pub struct ComposerConfigBuilder {
    moments: Option<Vec<Moment>>,
    extractor_options: ExtractorOptions,
}

impl ComposerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moments(mut self, moments: Vec<Moment>) -> Self {
        self.moments = Some(moments);
        self
    }

    pub fn moment(mut self, moment: Moment) -> Self {
        self.moments.get_or_insert_with(Vec::new).push(moment);
        self
    }

    pub fn extractor_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extractor_options.insert(key.into(), value.into());
        self
    }

    pub fn extractor_options(mut self, options: ExtractorOptions) -> Self {
        self.extractor_options.extend(options);
        self
    }

    pub fn build(self) -> Result<ComposerConfig, ConfigError> {
        let moments = self.moments.unwrap_or_else(|| DEFAULT_MOMENTS.to_vec());
        if moments.is_empty() {
            return Err(ConfigError::EmptyMomentList);
        }
        for (i, moment) in moments.iter().enumerate() {
            if moments[..i].contains(moment) {
                return Err(ConfigError::DuplicateMoment(moment.name().to_string()));
            }
        }
        Ok(ComposerConfig {
            moments,
            extractor_options: self.extractor_options,
        })
    }
}
