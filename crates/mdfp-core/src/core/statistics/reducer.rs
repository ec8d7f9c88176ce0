use super::moments::Moment;
use crate::core::simulation::series::PropertySeries;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReduceError {
    #[error("Property '{property}' has no samples to summarize")]
    EmptySeries { property: String },
}

/// Moment tuples per property, in series order, each tuple in moment-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentRecord {
    entries: Vec<(String, Vec<f64>)>,
}

impl MomentRecord {
    pub fn get(&self, property: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for MomentRecord {
    type Item = (String, Vec<f64>);
    type IntoIter = std::vec::IntoIter<(String, Vec<f64>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Reduces every series to the configured moments.
///
/// Moments run sequentially over the samples in frame order, so identical input
/// always produces bit-identical output.
///
/// # Errors
///
/// Returns [`ReduceError::EmptySeries`] for the first property without samples.
pub fn reduce(series: &PropertySeries, moments: &[Moment]) -> Result<MomentRecord, ReduceError> {
    let entries = series
        .iter()
        .map(|(name, samples)| {
            if samples.is_empty() {
                return Err(ReduceError::EmptySeries {
                    property: name.to_string(),
                });
            }
            let values = moments.iter().map(|m| m.apply(samples)).collect();
            Ok((name.to_string(), values))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MomentRecord { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::statistics::moments::DEFAULT_MOMENTS;

    #[test]
    fn default_list_yields_three_values_per_property_in_series_order() {
        let series = PropertySeries::new()
            .with("total_crf", vec![1.0, 2.0, 3.0])
            .with("intra_lj", vec![4.0, 4.0]);
        let record = reduce(&series, &DEFAULT_MOMENTS).unwrap();

        let names: Vec<_> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["total_crf", "intra_lj"]);
        assert!(record.iter().all(|(_, v)| v.len() == 3));

        let crf = record.get("total_crf").unwrap();
        assert_eq!(crf[0], 2.0);
        assert!((crf[1] - 0.816_496_580_927_726).abs() < 1e-12);
        assert_eq!(crf[2], 2.0);
        assert_eq!(record.get("intra_lj").unwrap(), &[4.0, 0.0, 4.0]);
    }

    #[test]
    fn empty_series_is_an_error_not_a_nan() {
        let series = PropertySeries::new()
            .with("rgyr", vec![1.0])
            .with("sasa", Vec::new());
        let err = reduce(&series, &DEFAULT_MOMENTS).unwrap_err();
        assert_eq!(
            err,
            ReduceError::EmptySeries {
                property: "sasa".to_string()
            }
        );
    }

    #[test]
    fn reduction_is_deterministic() {
        let samples: Vec<f64> = (0..500).map(|i| (i as f64 * 0.37).sin() * 1e3).collect();
        let series = PropertySeries::new().with("dipole_magnitude", samples);
        let moments = [Moment::Mean, Moment::Variance, Moment::Median, Moment::Maximum];
        let first = reduce(&series, &moments).unwrap();
        let second = reduce(&series, &moments).unwrap();
        let bits = |r: &MomentRecord| -> Vec<u64> {
            r.iter().flat_map(|(_, v)| v.iter().map(|x| x.to_bits())).collect()
        };
        assert_eq!(bits(&first), bits(&second));
    }
}
