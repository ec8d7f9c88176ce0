use super::extractor::Extractor;
use super::series::PropertySeries;
use super::source::{ExtractionError, ExtractorOptions, SimulationSource};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

const IDENTIFIER_DIRECTIVE: &str = "identifier:";

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid value '{value}' in column '{column}' at frame {frame} of '{path}'")]
    InvalidValue {
        path: String,
        column: String,
        frame: usize,
        value: String,
    },
    #[error("Duplicate column '{column}' in '{path}'")]
    DuplicateColumn { path: String, column: String },
}

/// A source backed by precomputed per-frame properties.
///
/// Columns are property names and rows are frames. Column lookup prefers the
/// regime-qualified name (`water_sasa`) over the bare name (`sasa`), so one table can
/// hold both regimes of a combined run or a single regime with short headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameTable {
    identifier: String,
    columns: Vec<(String, Vec<f64>)>,
}

impl FrameTable {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, samples: Vec<f64>) -> Self {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = samples,
            None => self.columns.push((name, samples)),
        }
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn frame_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, s)| s.len())
    }

    /// Loads a table from a CSV file.
    ///
    /// Lines starting with `#` are comments, except that a leading
    /// `# identifier: <SMILES>` line sets the embedded identifier.
    pub fn load(path: &Path) -> Result<Self, TableLoadError> {
        let display = path.to_string_lossy().to_string();
        let file = std::fs::File::open(path).map_err(|e| TableLoadError::Io {
            path: display.clone(),
            source: e,
        })?;
        Self::from_reader(file, &display)
    }

    /// Parses CSV text from any reader; `origin` names the input in errors.
    pub fn from_reader<R: Read>(mut reader: R, origin: &str) -> Result<Self, TableLoadError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| TableLoadError::Io {
                path: origin.to_string(),
                source: e,
            })?;

        let identifier = text
            .lines()
            .map(str::trim)
            .take_while(|line| line.is_empty() || line.starts_with('#'))
            .filter_map(|line| line.strip_prefix('#'))
            .find_map(|comment| comment.trim().strip_prefix(IDENTIFIER_DIRECTIVE))
            .map(|id| id.trim().to_string())
            .unwrap_or_default();

        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let csv_error = |e: csv::Error| TableLoadError::Csv {
            path: origin.to_string(),
            source: e,
        };

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();
        for (i, name) in headers.iter().enumerate() {
            if headers[..i].contains(name) {
                return Err(TableLoadError::DuplicateColumn {
                    path: origin.to_string(),
                    column: name.clone(),
                });
            }
        }

        let mut columns: Vec<(String, Vec<f64>)> =
            headers.into_iter().map(|h| (h, Vec::new())).collect();
        for (frame, record) in csv_reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            for ((name, samples), field) in columns.iter_mut().zip(record.iter()) {
                let value = field.parse::<f64>().map_err(|_| TableLoadError::InvalidValue {
                    path: origin.to_string(),
                    column: name.clone(),
                    frame,
                    value: field.to_string(),
                })?;
                samples.push(value);
            }
        }

        Ok(Self {
            identifier,
            columns,
        })
    }
}

impl SimulationSource for FrameTable {
    fn embedded_identifier(&self) -> &str {
        &self.identifier
    }

    fn compute(
        &self,
        extractor: Extractor,
        _options: &ExtractorOptions,
    ) -> Result<PropertySeries, ExtractionError> {
        let mut series = PropertySeries::new();
        for &name in extractor.series_names() {
            let samples = self
                .column(&extractor.qualified_key(name))
                .or_else(|| self.column(name))
                .ok_or_else(|| ExtractionError::MissingProperty {
                    extractor,
                    property: name.to_string(),
                })?;
            series.insert(name, samples.to_vec());
        }
        Ok(series)
    }
}
