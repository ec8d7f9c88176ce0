/// An ordered mapping from property name to per-frame samples.
///
/// Insertion order is preserved. Inserting an existing name replaces its samples
/// in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySeries {
    entries: Vec<(String, Vec<f64>)>,
}

impl PropertySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, samples: Vec<f64>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = samples,
            None => self.entries.push((name, samples)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, samples: Vec<f64>) -> Self {
        self.insert(name, samples);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_slice())
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<f64>> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<f64>)> for PropertySeries {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f64>)>>(iter: I) -> Self {
        let mut series = PropertySeries::new();
        for (name, samples) in iter {
            series.insert(name, samples);
        }
        series
    }
}

impl IntoIterator for PropertySeries {
    type Item = (String, Vec<f64>);
    type IntoIter = std::vec::IntoIter<(String, Vec<f64>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order_and_replaces_duplicates() {
        let mut series = PropertySeries::new()
            .with("total_lj", vec![1.0])
            .with("intra_crf", vec![2.0]);
        series.insert("total_lj", vec![3.0, 4.0]);

        assert_eq!(series.names().collect::<Vec<_>>(), ["total_lj", "intra_crf"]);
        assert_eq!(series.get("total_lj"), Some(&[3.0, 4.0][..]));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn remove_takes_samples_out() {
        let mut series = PropertySeries::new().with("sasa", vec![1.5]);
        assert_eq!(series.remove("sasa"), Some(vec![1.5]));
        assert!(series.is_empty());
        assert_eq!(series.remove("sasa"), None);
    }
}
