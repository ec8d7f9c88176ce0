use crate::core::descriptors::provider::StructuralDescriptorProvider;
use crate::core::descriptors::service::MolecularGraphService;
use crate::core::fingerprint::{FeatureValue, Fingerprint, FingerprintBuilder, STRUCTURAL_KEY};
use crate::core::simulation::extractor::{Extractor, Regime};
use crate::core::simulation::source::SimulationSource;
use crate::core::statistics::reducer::{self, MomentRecord};
use crate::engine::composer::Composer;
use crate::engine::config::ComposerConfig;
use crate::engine::context::RunContext;
use crate::engine::error::ComposeError;
use crate::engine::extract::extract_validated;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{RunPhase, RunState};
use tracing::{debug, info, instrument};

/// Composes a fingerprint for one composer variant.
///
/// With an explicit `identifier` the run takes the descriptor-only path: the result
/// holds just the `2d_counts` group and no source is consulted. Without one, the
/// identifier is recovered from the sources and every regime of the variant is
/// collected after the structural group, in declaration order.
///
/// A blank explicit identifier counts as absent.
///
/// # Errors
///
/// Returns [`ComposeError::MissingIdentifier`] if no identifier can be resolved, and
/// propagates the first parse, extraction, reduction, or merge failure. No partial
/// fingerprint is ever returned.
#[instrument(skip_all, name = "compose_workflow", fields(variant = %composer.variant()))]
pub fn run<S: MolecularGraphService>(
    composer: &Composer<'_>,
    identifier: Option<&str>,
    config: &ComposerConfig,
    provider: &StructuralDescriptorProvider<S>,
    reporter: &ProgressReporter,
) -> Result<Fingerprint, ComposeError> {
    let mut state = RunState::new();

    // === Phase 1: Identifier resolution ===
    state.advance(RunPhase::ResolvingIdentifier)?;
    let explicit = identifier.map(str::trim).filter(|id| !id.is_empty());
    let (resolved, structural_only) = match explicit {
        Some(id) => (id, true),
        None => match composer.embedded_identifier()? {
            Some(id) => (id, false),
            None => {
                return Err(ComposeError::MissingIdentifier {
                    variant: composer.variant(),
                });
            }
        },
    };
    info!(
        identifier = resolved,
        structural_only, "Resolved molecular identifier."
    );

    // === Phase 2: Collection ===
    state.advance(RunPhase::Collecting)?;
    let context = RunContext::new(
        resolved,
        structural_only,
        composer.variant(),
        config,
        provider,
        reporter,
    );
    let mut builder = context.fingerprint_builder();

    collect_structural(&context, &mut builder)?;
    if structural_only {
        debug!("Explicit identifier given; skipping simulation phase.");
        reporter.message(format!(
            "Explicit identifier '{}'; simulation sources not consulted.",
            resolved
        ));
    } else {
        for (regime, source) in composer.sources() {
            collect_regime(&context, regime, source, &mut builder)?;
        }
    }

    state.advance(RunPhase::Done)?;
    let fingerprint = builder.build();
    info!(
        groups = fingerprint.group_count(),
        length = fingerprint.len(),
        "Fingerprint complete."
    );
    Ok(fingerprint)
}

fn collect_structural<S: MolecularGraphService>(
    context: &RunContext<S>,
    builder: &mut FingerprintBuilder,
) -> Result<(), ComposeError> {
    context.reporter.report(Progress::PhaseStart {
        name: "Structural Descriptors",
    });
    let descriptors = context.provider.compute(context.identifier)?;
    builder.insert(STRUCTURAL_KEY, FeatureValue::from(descriptors))?;
    context.reporter.report(Progress::PhaseFinish);
    Ok(())
}

fn collect_regime<S: MolecularGraphService>(
    context: &RunContext<S>,
    regime: Regime,
    source: &dyn SimulationSource,
    builder: &mut FingerprintBuilder,
) -> Result<(), ComposeError> {
    context.reporter.report(Progress::PhaseStart {
        name: regime_phase_name(regime),
    });
    let extractors = regime.extractors();
    context.reporter.report(Progress::TaskStart {
        total_steps: extractors.len() as u64,
    });

    let mut frames = 0;
    for &extractor in extractors {
        let series = extract_validated(source, extractor, &context.config.extractor_options)?;
        frames = series.iter().map(|(_, samples)| samples.len()).next().unwrap_or(frames);
        let record = reducer::reduce(&series, &context.config.moments)?;
        merge_moments(builder, extractor, record)?;
        debug!(extractor = %extractor, series = series.len(), "Merged extractor moments.");
        context.reporter.report(Progress::TaskIncrement);
    }

    context.reporter.report(Progress::TaskFinish);
    context.reporter.message(format!(
        "{} properties over {} frames",
        extractors
            .iter()
            .map(|e| e.series_names().len())
            .sum::<usize>(),
        frames
    ));
    context.reporter.report(Progress::PhaseFinish);
    Ok(())
}

fn merge_moments(
    builder: &mut FingerprintBuilder,
    extractor: Extractor,
    record: MomentRecord,
) -> Result<(), ComposeError> {
    for (name, values) in record {
        builder.insert(extractor.qualified_key(&name), FeatureValue::Moments(values))?;
    }
    Ok(())
}

fn regime_phase_name(regime: Regime) -> &'static str {
    match regime {
        Regime::Solution => "Solution Properties",
        Regime::Liquid => "Liquid Properties",
    }
}

impl Composer<'_> {
    /// Runs this composer with the built-in SMILES toolkit and no progress reporting.
    pub fn run(
        &self,
        identifier: Option<&str>,
        config: &ComposerConfig,
    ) -> Result<Fingerprint, ComposeError> {
        run(
            self,
            identifier,
            config,
            &StructuralDescriptorProvider::new(),
            &ProgressReporter::new(),
        )
    }

    pub fn run_with_reporter(
        &self,
        identifier: Option<&str>,
        config: &ComposerConfig,
        reporter: &ProgressReporter,
    ) -> Result<Fingerprint, ComposeError> {
        run(
            self,
            identifier,
            config,
            &StructuralDescriptorProvider::new(),
            reporter,
        )
    }
}
