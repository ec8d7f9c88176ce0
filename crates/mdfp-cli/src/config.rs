use crate::cli::ComposeArgs;
use crate::error::{CliError, Result};
use mdfp::core::simulation::source::ExtractorOptions;
use mdfp::core::statistics::moments::Moment;
use mdfp::engine::config::{ComposerConfig, ComposerConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const EXTRACTOR_OPTIONS_PREFIX: &str = "extractor-options.";

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialComposeConfig {
    moments: Option<Vec<String>>,
    extractor_options: Option<ExtractorOptions>,
}

impl PartialComposeConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves the run configuration. `--moment` replaces the file's list;
    /// `--option` entries are layered over `[extractor-options]`.
    pub fn merge_with_cli(mut self, args: &ComposeArgs) -> Result<ComposerConfig> {
        self.apply_set_values(&args.set_values)?;

        let mut builder = ComposerConfigBuilder::new();

        let moment_names = if args.moments.is_empty() {
            self.moments
        } else {
            Some(args.moments.clone())
        };
        if let Some(names) = moment_names {
            builder = builder.moments(parse_moments(&names)?);
        }

        if let Some(options) = self.extractor_options {
            builder = builder.extractor_options(options);
        }
        for pair in &args.options {
            let (key, value) = split_key_value(pair, "--option")?;
            builder = builder.extractor_option(key, value);
        }

        Ok(builder.build()?)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = split_key_value(kv_pair, "--set")?;

            if key == "moments" {
                self.moments = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            } else if let Some(option) = key.strip_prefix(EXTRACTOR_OPTIONS_PREFIX) {
                if option.is_empty() {
                    return Err(CliError::Config(format!(
                        "Missing extractor option name in --set key: '{}'",
                        key
                    )));
                }
                self.extractor_options
                    .get_or_insert_with(Default::default)
                    .insert(option.to_string(), value.to_string());
            } else {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
        Ok(())
    }
}

fn split_key_value<'s>(pair: &'s str, flag: &str) -> Result<(&'s str, &'s str)> {
    let parts: Vec<_> = pair.splitn(2, '=').collect();
    if parts.len() != 2 || parts[0].trim().is_empty() {
        return Err(CliError::Config(format!(
            "Invalid {} format: '{}'. Expected KEY=VALUE.",
            flag, pair
        )));
    }
    Ok((parts[0].trim(), parts[1].trim()))
}

fn parse_moments(names: &[String]) -> Result<Vec<Moment>> {
    names
        .iter()
        .map(|name| {
            name.parse::<Moment>()
                .map_err(|e| CliError::Config(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use once_cell::sync::Lazy;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn compose_args(extra: &[&str]) -> ComposeArgs {
        let mut args = vec!["mdfp", "compose", "--variant", "solution"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Compose(args) => args,
            _ => panic!("Expected 'compose' subcommand"),
        }
    }

    #[test]
    fn empty_sources_yield_default_config() {
        let config = PartialComposeConfig::default()
            .merge_with_cli(&compose_args(&[]))
            .unwrap();
        assert_eq!(config, ComposerConfig::default());
    }

    #[test]
    fn file_values_are_loaded() {
        let path = write_config_file(
            "file_values.toml",
            r#"
            moments = ["mean", "max"]

            [extractor-options]
            stride = "5"
            "#,
        );

        let config = PartialComposeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&compose_args(&[]))
            .unwrap();

        assert_eq!(config.moment_names(), ["mean", "max"]);
        assert_eq!(config.extractor_options.get("stride").unwrap(), "5");
    }

    #[test]
    fn cli_flags_override_file_values() {
        let path = write_config_file(
            "overrides.toml",
            r#"
            moments = ["mean", "max"]

            [extractor-options]
            stride = "5"
            skip = "100"
            "#,
        );

        let args = compose_args(&["-m", "median", "--option", "stride=10"]);
        let config = PartialComposeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.moment_names(), ["median"]);
        assert_eq!(config.extractor_options.get("stride").unwrap(), "10");
        assert_eq!(config.extractor_options.get("skip").unwrap(), "100");
    }

    #[test]
    fn set_values_override_file_values() {
        let path = write_config_file("set_values.toml", "moments = [\"mean\"]\n");

        let args = compose_args(&[
            "-S",
            "moments=min, max",
            "-S",
            "extractor-options.selection=resname LIG",
        ]);
        let config = PartialComposeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.moment_names(), ["min", "max"]);
        assert_eq!(
            config.extractor_options.get("selection").unwrap(),
            "resname LIG"
        );
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let path = write_config_file("unknown.toml", "iterations = 3\n");
        let result = PartialComposeConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        for bad in ["moments", "frames=10", "extractor-options.=1", "=mean"] {
            let result = PartialComposeConfig::default().merge_with_cli(&compose_args(&["-S", bad]));
            assert!(matches!(result, Err(CliError::Config(_))), "accepted '{bad}'");
        }
    }

    #[test]
    fn unknown_and_duplicate_moments_are_rejected() {
        let unknown = PartialComposeConfig::default().merge_with_cli(&compose_args(&["-m", "kurtosis"]));
        assert!(matches!(unknown, Err(CliError::Config(_))));

        let duplicate = PartialComposeConfig::default()
            .merge_with_cli(&compose_args(&["-m", "mean", "-m", "average"]));
        assert!(matches!(duplicate, Err(CliError::Config(_))));
    }

    #[test]
    fn empty_moment_list_is_rejected() {
        let path = write_config_file("empty_moments.toml", "moments = []\n");
        let result = PartialComposeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&compose_args(&[]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
