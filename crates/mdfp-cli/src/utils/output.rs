use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use mdfp::core::descriptors::provider::{DESCRIPTOR_NAMES, StructuralDescriptors};
use mdfp::core::fingerprint::Fingerprint;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Opens the output file, or stdout when no path is given.
pub fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            debug!("Writing output to {:?}", path);
            let file = File::create(path).map_err(CliError::Io)?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

pub fn write_fingerprint<W: Write>(
    writer: W,
    fingerprint: &Fingerprint,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(writer, fingerprint),
        OutputFormat::Csv => {
            let names = fingerprint.feature_names();
            let values: Vec<String> = fingerprint
                .to_vector()
                .iter()
                .map(f64::to_string)
                .collect();
            write_csv(writer, &names, std::iter::once(values))
        }
        OutputFormat::Vector => write_vector(writer, &fingerprint.to_vector()),
    }
}

#[derive(Serialize)]
struct DescriptorRow<'a> {
    identifier: &'a str,
    descriptors: &'a StructuralDescriptors,
}

/// Writes one descriptor row per identifier, in input order.
pub fn write_descriptors<W: Write>(
    mut writer: W,
    rows: &[(String, StructuralDescriptors)],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = rows
                .iter()
                .map(|(identifier, descriptors)| DescriptorRow {
                    identifier,
                    descriptors,
                })
                .collect();
            write_json(writer, &rows)
        }
        OutputFormat::Csv => {
            let header: Vec<String> = std::iter::once("identifier")
                .chain(DESCRIPTOR_NAMES)
                .map(str::to_string)
                .collect();
            let records = rows.iter().map(|(identifier, descriptors)| {
                std::iter::once(identifier.clone())
                    .chain(descriptors.values().iter().map(u32::to_string))
                    .collect::<Vec<_>>()
            });
            write_csv(writer, &header, records)
        }
        OutputFormat::Vector => {
            for (_, descriptors) in rows {
                let line: Vec<String> = descriptors.values().iter().map(u32::to_string).collect();
                writeln!(writer, "{}", line.join(" "))?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to serialize output: {}", e)))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn write_csv<W, I>(writer: W, header: &[String], records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = Vec<String>>,
{
    let to_cli = |e: csv::Error| CliError::Other(anyhow::anyhow!("Failed to write CSV: {}", e));
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(header).map_err(to_cli)?;
    for record in records {
        csv_writer.write_record(&record).map_err(to_cli)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_vector<W: Write>(mut writer: W, vector: &[f64]) -> Result<()> {
    let line: Vec<String> = vector.iter().map(f64::to_string).collect();
    writeln!(writer, "{}", line.join(" "))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdfp::core::fingerprint::{FeatureValue, FingerprintBuilder, STRUCTURAL_KEY};
    use mdfp::core::simulation::extractor::Variant;

    fn sample_fingerprint() -> Fingerprint {
        let mut builder = FingerprintBuilder::new(
            "CCO",
            Variant::Solution,
            vec!["mean".to_string(), "std".to_string()],
        );
        builder
            .insert(
                STRUCTURAL_KEY,
                FeatureValue::Counts(vec![3, 1, 0, 1, 0, 0, 0, 0, 0, 0]),
            )
            .unwrap();
        builder
            .insert("water_rgyr", FeatureValue::Moments(vec![1.5, 0.25]))
            .unwrap();
        builder.build()
    }

    fn render(format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        write_fingerprint(&mut buffer, &sample_fingerprint(), format).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn vector_output_is_flat_and_ordered() {
        assert_eq!(render(OutputFormat::Vector), "3 1 0 1 0 0 0 0 0 0 1.5 0.25\n");
    }

    #[test]
    fn csv_output_has_named_header_and_one_row() {
        let output = render(OutputFormat::Csv);
        let mut lines = output.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("2d_counts.heavy_atoms,2d_counts.rotatable_bonds,"));
        assert!(header.ends_with("water_rgyr.mean,water_rgyr.std"));
        assert_eq!(lines.next().unwrap(), "3,1,0,1,0,0,0,0,0,0,1.5,0.25");
        assert!(lines.next().is_none());
    }

    #[test]
    fn json_output_keeps_group_names() {
        let value: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(value["identifier"], "CCO");
        assert_eq!(value["features"]["water_rgyr"][1], 0.25);
        assert_eq!(value["features"][STRUCTURAL_KEY][0], 3);
    }

    #[test]
    fn unwritable_output_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("fp.json");
        assert!(matches!(open_sink(Some(&path)), Err(CliError::Io(_))));
    }

    #[test]
    fn descriptor_rows_render_as_csv() {
        let rows = vec![(
            "CCO".to_string(),
            StructuralDescriptors::from([3, 1, 0, 1, 0, 0, 0, 0, 0, 0]),
        )];
        let mut buffer = Vec::new();
        write_descriptors(&mut buffer, &rows, OutputFormat::Csv).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "identifier,heavy_atoms,rotatable_bonds,nitrogen,oxygen,fluorine,phosphorus,sulfur,chlorine,bromine,iodine"
        );
        assert_eq!(lines.next().unwrap(), "CCO,3,1,0,1,0,0,0,0,0,0");
    }
}
