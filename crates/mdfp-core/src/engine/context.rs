use super::config::ComposerConfig;
use super::progress::ProgressReporter;
use crate::core::descriptors::provider::StructuralDescriptorProvider;
use crate::core::descriptors::service::MolecularGraphService;
use crate::core::fingerprint::FingerprintBuilder;
use crate::core::simulation::extractor::Variant;

/// Everything one composition run needs, threaded through the workflow helpers.
///
/// A context is built per run and borrowed immutably; nothing in it is shared
/// mutable state, so independent runs never interfere.
#[derive(Clone, Copy)]
pub struct RunContext<'a, S: MolecularGraphService> {
    pub identifier: &'a str,
    /// Set when the caller supplied the identifier explicitly.
    pub structural_only: bool,
    pub variant: Variant,
    pub config: &'a ComposerConfig,
    pub provider: &'a StructuralDescriptorProvider<S>,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a, S: MolecularGraphService> RunContext<'a, S> {
    pub fn new(
        identifier: &'a str,
        structural_only: bool,
        variant: Variant,
        config: &'a ComposerConfig,
        provider: &'a StructuralDescriptorProvider<S>,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            identifier,
            structural_only,
            variant,
            config,
            provider,
            reporter,
        }
    }

    /// A fresh, empty fingerprint carrying this run's metadata.
    pub fn fingerprint_builder(&self) -> FingerprintBuilder {
        FingerprintBuilder::new(self.identifier, self.variant, self.config.moment_names())
            .structural_only(self.structural_only)
    }
}
