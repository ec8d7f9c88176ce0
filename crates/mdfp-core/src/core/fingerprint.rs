use crate::core::descriptors::provider::{DESCRIPTOR_NAMES, StructuralDescriptors};
use crate::core::simulation::extractor::Variant;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::ops::Range;
use thiserror::Error;

/// Reserved group key of the structural descriptor vector.
pub const STRUCTURAL_KEY: &str = "2d_counts";

/// The value stored under one fingerprint key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Structural descriptor counts.
    Counts(Vec<u32>),
    /// One property's moment tuple, in configured moment order.
    Moments(Vec<f64>),
}

impl FeatureValue {
    pub fn len(&self) -> usize {
        match self {
            FeatureValue::Counts(v) => v.len(),
            FeatureValue::Moments(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_counts(&self) -> Option<&[u32]> {
        match self {
            FeatureValue::Counts(v) => Some(v),
            FeatureValue::Moments(_) => None,
        }
    }

    pub fn as_moments(&self) -> Option<&[f64]> {
        match self {
            FeatureValue::Moments(v) => Some(v),
            FeatureValue::Counts(_) => None,
        }
    }

    fn extend_into(&self, out: &mut Vec<f64>) {
        match self {
            FeatureValue::Counts(v) => out.extend(v.iter().map(|&c| f64::from(c))),
            FeatureValue::Moments(v) => out.extend_from_slice(v),
        }
    }
}

impl From<StructuralDescriptors> for FeatureValue {
    fn from(descriptors: StructuralDescriptors) -> Self {
        FeatureValue::Counts(descriptors.into_vec())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    #[error("Fingerprint key '{key}' is already present")]
    KeyCollision { key: String },

    #[error("Fingerprint group '{key}' has {found} moments, expected {expected}")]
    ShapeMismatch {
        key: String,
        expected: usize,
        found: usize,
    },
}

/// An ordered, immutable molecular dynamics fingerprint.
///
/// Groups keep insertion order, and the flat vector is the concatenation of all group
/// values in that order. Count values are widened to `f64` when flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    identifier: String,
    variant: Variant,
    structural_only: bool,
    moment_names: Vec<String>,
    groups: Vec<(String, FeatureValue)>,
}

impl Fingerprint {
    /// The identifier the structural descriptors were computed from.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// True when the fingerprint was produced by the descriptor-only path.
    pub fn is_structural_only(&self) -> bool {
        self.structural_only
    }

    pub fn moment_names(&self) -> &[String] {
        &self.moment_names
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.groups.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Length of the flat vector.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vector(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len());
        for (_, value) in &self.groups {
            value.extend_into(&mut out);
        }
        out
    }

    /// Position of a group inside the flat vector.
    pub fn slice_of(&self, key: &str) -> Option<Range<usize>> {
        let mut start = 0;
        for (k, value) in &self.groups {
            let end = start + value.len();
            if k == key {
                return Some(start..end);
            }
            start = end;
        }
        None
    }

    /// One name per flat-vector entry, e.g. `2d_counts.heavy_atoms` or `water_rgyr.mean`.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.len());
        for (key, value) in &self.groups {
            match value {
                FeatureValue::Counts(counts) => {
                    for i in 0..counts.len() {
                        match DESCRIPTOR_NAMES.get(i).filter(|_| key == STRUCTURAL_KEY) {
                            Some(name) => names.push(format!("{key}.{name}")),
                            None => names.push(format!("{key}.{i}")),
                        }
                    }
                }
                FeatureValue::Moments(_) => {
                    for moment in &self.moment_names {
                        names.push(format!("{key}.{moment}"));
                    }
                }
            }
        }
        names
    }
}

struct OrderedGroups<'a>(&'a [(String, FeatureValue)]);

impl Serialize for OrderedGroups<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Fingerprint", 5)?;
        state.serialize_field("identifier", &self.identifier)?;
        state.serialize_field("variant", &self.variant)?;
        state.serialize_field("structural_only", &self.structural_only)?;
        state.serialize_field("moments", &self.moment_names)?;
        state.serialize_field("features", &OrderedGroups(&self.groups))?;
        state.end()
    }
}

/// Incrementally assembles a [`Fingerprint`], rejecting duplicate keys.
#[derive(Debug, Clone)]
pub struct FingerprintBuilder {
    fingerprint: Fingerprint,
}

impl FingerprintBuilder {
    pub fn new(identifier: impl Into<String>, variant: Variant, moment_names: Vec<String>) -> Self {
        Self {
            fingerprint: Fingerprint {
                identifier: identifier.into(),
                variant,
                structural_only: false,
                moment_names,
                groups: Vec::new(),
            },
        }
    }

    pub fn structural_only(mut self, structural_only: bool) -> Self {
        self.fingerprint.structural_only = structural_only;
        self
    }

    /// Appends a group.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::KeyCollision`] if `key` is already present, or
    /// [`FingerprintError::ShapeMismatch`] if a moment tuple does not match the
    /// configured moment list.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: FeatureValue,
    ) -> Result<(), FingerprintError> {
        let key = key.into();
        if self.fingerprint.get(&key).is_some() {
            return Err(FingerprintError::KeyCollision { key });
        }
        if let FeatureValue::Moments(values) = &value {
            let expected = self.fingerprint.moment_names.len();
            if values.len() != expected {
                return Err(FingerprintError::ShapeMismatch {
                    key,
                    expected,
                    found: values.len(),
                });
            }
        }
        self.fingerprint.groups.push((key, value));
        Ok(())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fingerprint.get(key).is_some()
    }

    pub fn build(self) -> Fingerprint {
        self.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moments() -> Vec<String> {
        vec!["mean".to_string(), "std".to_string(), "median".to_string()]
    }

    fn sample() -> Fingerprint {
        let mut builder = FingerprintBuilder::new("CCO", Variant::Solution, moments());
        builder
            .insert(
                STRUCTURAL_KEY,
                StructuralDescriptors::from([3, 1, 0, 1, 0, 0, 0, 0, 0, 0]).into(),
            )
            .unwrap();
        builder
            .insert("water_rgyr", FeatureValue::Moments(vec![1.5, 0.25, 1.4]))
            .unwrap();
        builder.build()
    }

    #[test]
    fn flat_vector_concatenates_groups_in_insertion_order() {
        let fp = sample();
        assert_eq!(fp.len(), 13);
        assert_eq!(fp.keys().collect::<Vec<_>>(), [STRUCTURAL_KEY, "water_rgyr"]);
        let vector = fp.to_vector();
        assert_eq!(&vector[..3], &[3.0, 1.0, 0.0]);
        assert_eq!(&vector[10..], &[1.5, 0.25, 1.4]);
        assert_eq!(fp.to_vector(), vector);
    }

    #[test]
    fn slices_trace_keys_back_into_the_vector() {
        let fp = sample();
        assert_eq!(fp.slice_of(STRUCTURAL_KEY), Some(0..10));
        assert_eq!(fp.slice_of("water_rgyr"), Some(10..13));
        assert_eq!(fp.slice_of("liquid_rgyr"), None);
        let vector = fp.to_vector();
        let rgyr = fp.slice_of("water_rgyr").unwrap();
        assert_eq!(&vector[rgyr], fp.get("water_rgyr").unwrap().as_moments().unwrap());
    }

    #[test]
    fn feature_names_align_with_vector_entries() {
        let fp = sample();
        let names = fp.feature_names();
        assert_eq!(names.len(), fp.len());
        assert_eq!(names[0], "2d_counts.heavy_atoms");
        assert_eq!(names[9], "2d_counts.iodine");
        assert_eq!(names[11], "water_rgyr.std");
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut builder = FingerprintBuilder::new("CCO", Variant::Liquid, moments());
        builder
            .insert("liquid_sasa", FeatureValue::Moments(vec![1.0, 0.0, 1.0]))
            .unwrap();
        let err = builder
            .insert("liquid_sasa", FeatureValue::Moments(vec![2.0, 0.0, 2.0]))
            .unwrap_err();
        assert_eq!(
            err,
            FingerprintError::KeyCollision {
                key: "liquid_sasa".to_string()
            }
        );
        assert_eq!(builder.build().group_count(), 1);
    }

    #[test]
    fn moment_tuples_must_match_moment_list() {
        let mut builder = FingerprintBuilder::new("CCO", Variant::Liquid, moments());
        let err = builder
            .insert("liquid_sasa", FeatureValue::Moments(vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, FingerprintError::ShapeMismatch { expected: 3, found: 1, .. }));
    }

    #[test]
    fn serializes_features_as_ordered_map() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"identifier":"CCO","variant":"solution","structural_only":false,"#,
                r#""moments":["mean","std","median"],"#,
                r#""features":{"2d_counts":[3,1,0,1,0,0,0,0,0,0],"water_rgyr":[1.5,0.25,1.4]}}"#
            )
        );
    }
}
