use crate::core::simulation::extractor::Extractor;
use crate::core::simulation::series::PropertySeries;
use crate::core::simulation::source::{ExtractionError, ExtractorOptions, SimulationSource};
use tracing::debug;

/// Runs one extractor against a source and validates what comes back.
///
/// The returned series holds exactly the extractor's declared names, in declared
/// order. Undeclared extra series are dropped. An empty series passes through here
/// and is rejected later by the reducer.
///
/// # Errors
///
/// Propagates the source's own [`ExtractionError`], and additionally reports missing
/// declared series, series with differing frame counts, and non-finite samples.
pub fn extract_validated(
    source: &dyn SimulationSource,
    extractor: Extractor,
    options: &ExtractorOptions,
) -> Result<PropertySeries, ExtractionError> {
    let mut raw = source.compute(extractor, options)?;

    let mut validated = PropertySeries::new();
    let mut expected_frames: Option<usize> = None;
    for &name in extractor.series_names() {
        let samples = raw
            .remove(name)
            .ok_or_else(|| ExtractionError::MissingProperty {
                extractor,
                property: name.to_string(),
            })?;

        match expected_frames {
            None => expected_frames = Some(samples.len()),
            Some(expected) if expected != samples.len() => {
                return Err(ExtractionError::FrameCountMismatch {
                    extractor,
                    property: name.to_string(),
                    expected,
                    found: samples.len(),
                });
            }
            Some(_) => {}
        }

        if let Some(frame) = samples.iter().position(|x| !x.is_finite()) {
            return Err(ExtractionError::NonFiniteSample {
                extractor,
                property: name.to_string(),
                frame,
            });
        }

        validated.insert(name, samples);
    }

    for extra in raw.names() {
        debug!(extractor = %extractor, series = extra, "Dropping undeclared series.");
    }

    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::simulation::extractor::{Property, Regime};

    struct Fixed(PropertySeries);

    impl SimulationSource for Fixed {
        fn compute(
            &self,
            _extractor: Extractor,
            _options: &ExtractorOptions,
        ) -> Result<PropertySeries, ExtractionError> {
            Ok(self.0.clone())
        }
    }

    fn energies() -> Extractor {
        Extractor::new(Regime::Solution, Property::Energies)
    }

    fn run(series: PropertySeries) -> Result<PropertySeries, ExtractionError> {
        extract_validated(&Fixed(series), energies(), &ExtractorOptions::new())
    }

    #[test]
    fn reorders_to_declared_names_and_drops_extras() {
        let series = PropertySeries::new()
            .with("total_lj", vec![4.0])
            .with("kinetic", vec![9.0])
            .with("intra_lj", vec![2.0])
            .with("total_crf", vec![3.0])
            .with("intra_crf", vec![1.0]);
        let validated = run(series).unwrap();
        assert_eq!(
            validated.names().collect::<Vec<_>>(),
            ["intra_crf", "intra_lj", "total_crf", "total_lj"]
        );
    }

    #[test]
    fn missing_declared_series_is_an_error() {
        let series = PropertySeries::new()
            .with("intra_crf", vec![1.0])
            .with("intra_lj", vec![1.0])
            .with("total_crf", vec![1.0]);
        assert_eq!(
            run(series).unwrap_err(),
            ExtractionError::MissingProperty {
                extractor: energies(),
                property: "total_lj".to_string()
            }
        );
    }

    #[test]
    fn frame_counts_must_agree() {
        let series = PropertySeries::new()
            .with("intra_crf", vec![1.0, 2.0])
            .with("intra_lj", vec![1.0, 2.0])
            .with("total_crf", vec![1.0])
            .with("total_lj", vec![1.0, 2.0]);
        assert!(matches!(
            run(series),
            Err(ExtractionError::FrameCountMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        let series = PropertySeries::new()
            .with("intra_crf", vec![1.0, f64::NAN])
            .with("intra_lj", vec![1.0, 2.0])
            .with("total_crf", vec![1.0, 2.0])
            .with("total_lj", vec![1.0, 2.0]);
        assert!(matches!(
            run(series),
            Err(ExtractionError::NonFiniteSample { frame: 1, .. })
        ));
    }

    #[test]
    fn zero_frames_pass_through_for_the_reducer() {
        let series = ["intra_crf", "intra_lj", "total_crf", "total_lj"]
            .iter()
            .map(|n| (n.to_string(), Vec::new()))
            .collect();
        let validated = run(series).unwrap();
        assert_eq!(validated.get("total_lj"), Some(&[][..]));
    }
}
