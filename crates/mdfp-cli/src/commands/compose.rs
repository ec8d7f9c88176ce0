use crate::cli::ComposeArgs;
use crate::config::PartialComposeConfig;
use crate::error::{CliError, Result};
use crate::utils::output;
use crate::utils::progress::CliProgressHandler;
use mdfp::{
    core::descriptors::provider::StructuralDescriptorProvider,
    core::simulation::extractor::{Regime, Variant},
    core::simulation::source::{SimulationSource, WithIdentifier},
    core::simulation::table::FrameTable,
    engine::composer::Composer,
    engine::progress::ProgressReporter,
    workflows,
};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: ComposeArgs, show_progress: bool) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialComposeConfig::from_file(path)?,
        None => PartialComposeConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let variant = Variant::from(args.variant);
    let explicit = args.smiles.as_deref();
    // An explicit identifier yields a descriptor-only fingerprint, so frame tables
    // are neither required nor read.
    let tables_needed = explicit.is_none_or(|id| id.trim().is_empty());

    let mut solution = None;
    let mut liquid = None;
    for regime in variant.regimes() {
        let (frames, identifier) = match regime {
            Regime::Solution => (&args.solution_frames, &args.solution_identifier),
            Regime::Liquid => (&args.liquid_frames, &args.liquid_identifier),
        };
        let source = if tables_needed {
            let path = frames.as_deref().ok_or_else(|| {
                CliError::Argument(format!(
                    "--{}-frames is required for the '{}' variant unless --smiles is given.",
                    regime, variant
                ))
            })?;
            load_source(path, identifier.as_deref())?
        } else {
            Box::new(FrameTable::default()) as Box<dyn SimulationSource>
        };
        match regime {
            Regime::Solution => solution = Some(source),
            Regime::Liquid => liquid = Some(source),
        }
    }
    warn_unused_inputs(&args, variant, tables_needed);

    let composer = match (&solution, &liquid) {
        (Some(s), Some(l)) => Composer::solution_liquid(&**s, &**l),
        (Some(s), None) => Composer::solution(&**s),
        (None, Some(l)) => Composer::liquid(&**l),
        (None, None) => {
            return Err(CliError::Other(anyhow::anyhow!(
                "Variant '{}' declares no regimes.",
                variant
            )));
        }
    };

    let progress_handler = CliProgressHandler::new(1 + variant.regimes().len());
    let reporter = if show_progress {
        ProgressReporter::with_callback(progress_handler.get_callback())
    } else {
        ProgressReporter::new()
    };

    info!("Invoking the core composition workflow...");
    let fingerprint = workflows::compose::run(
        &composer,
        explicit,
        &config,
        &StructuralDescriptorProvider::new(),
        &reporter,
    )?;

    info!(
        identifier = fingerprint.identifier(),
        length = fingerprint.len(),
        "Fingerprint composed."
    );

    let sink = output::open_sink(args.output.as_deref())?;
    output::write_fingerprint(sink, &fingerprint, args.format)?;

    if let Some(path) = &args.output {
        eprintln!(
            "✓ Fingerprint of '{}' ({} values) written to: {}",
            fingerprint.identifier(),
            fingerprint.len(),
            path.display()
        );
    }

    Ok(())
}

fn load_source(path: &Path, identifier: Option<&str>) -> Result<Box<dyn SimulationSource>> {
    info!("Loading per-frame properties from {:?}", path);
    let table = FrameTable::load(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    info!(
        frames = table.frame_count(),
        identifier = table.identifier(),
        "Loaded frame table."
    );

    let source: Box<dyn SimulationSource> = match identifier {
        Some(id) => Box::new(WithIdentifier::new(table, id)),
        None => Box::new(table),
    };
    Ok(source)
}

fn warn_unused_inputs(args: &ComposeArgs, variant: Variant, tables_needed: bool) {
    let regimes = variant.regimes();
    let unused = [
        (Regime::Solution, "--solution-frames", args.solution_frames.is_some()),
        (Regime::Solution, "--solution-identifier", args.solution_identifier.is_some()),
        (Regime::Liquid, "--liquid-frames", args.liquid_frames.is_some()),
        (Regime::Liquid, "--liquid-identifier", args.liquid_identifier.is_some()),
    ];
    for (regime, flag, given) in unused {
        if !given {
            continue;
        }
        if !regimes.contains(&regime) {
            warn!("{} is ignored by the '{}' variant.", flag, variant);
        } else if !tables_needed {
            warn!("{} is ignored because --smiles was given.", flag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const SOLUTION_TABLE: &str = "\
# identifier: CCO
intra_crf,intra_lj,total_crf,total_lj,rgyr,sasa
-1.0,0.5,-10.0,-2.0,1.2,150.0
-2.0,0.7,-12.0,-2.5,1.3,152.0
-3.0,0.6,-11.0,-2.2,1.1,151.0
";

    fn compose_args(args: &[&str]) -> ComposeArgs {
        let mut argv = vec!["mdfp", "compose"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Compose(args) => args,
            _ => panic!("Expected 'compose' subcommand"),
        }
    }

    #[test]
    fn composes_solution_fingerprint_from_table() {
        let dir = tempdir().unwrap();
        let frames = dir.path().join("water.csv");
        let out = dir.path().join("fp.txt");
        fs::write(&frames, SOLUTION_TABLE).unwrap();

        let args = compose_args(&[
            "--variant",
            "solution",
            "--solution-frames",
            frames.to_str().unwrap(),
            "--format",
            "vector",
            "-o",
            out.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        let values: Vec<f64> = written
            .split_whitespace()
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(values.len(), 10 + 6 * 3);
        assert_eq!(&values[..4], &[3.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_frames_file_is_an_argument_error() {
        let args = compose_args(&["--variant", "liquid"]);
        assert!(matches!(run(args, false), Err(CliError::Argument(_))));
    }

    #[test]
    fn explicit_smiles_needs_no_tables() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("fp.json");

        let args = compose_args(&[
            "--variant",
            "solution-liquid",
            "--smiles",
            "c1ccccc1O",
            "-o",
            out.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["structural_only"], true);
        assert_eq!(value["features"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn identifier_override_replaces_table_header() {
        let dir = tempdir().unwrap();
        let frames = dir.path().join("water.csv");
        let out = dir.path().join("fp.json");
        fs::write(&frames, SOLUTION_TABLE).unwrap();

        let args = compose_args(&[
            "--variant",
            "solution",
            "--solution-frames",
            frames.to_str().unwrap(),
            "--solution-identifier",
            "CCCO",
            "-o",
            out.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["identifier"], "CCCO");
        assert_eq!(value["features"]["2d_counts"][0], 4);
    }

    #[test]
    fn unreadable_table_is_a_file_error() {
        let dir = tempdir().unwrap();
        let args = compose_args(&[
            "--variant",
            "solution",
            "--solution-frames",
            dir.path().join("absent.csv").to_str().unwrap(),
        ]);
        assert!(matches!(run(args, false), Err(CliError::FileParsing { .. })));
    }
}
