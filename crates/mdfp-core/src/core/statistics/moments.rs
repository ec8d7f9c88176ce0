use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type MomentFn = fn(&[f64]) -> f64;

/// A summary statistic applied to a per-frame property series.
///
/// Moment functions are only ever called with a non-empty slice of finite samples;
/// the reducer rejects empty series before any moment runs.
#[derive(Debug, Clone, Copy)]
pub enum Moment {
    Mean,
    /// Population standard deviation (ddof = 0).
    StandardDeviation,
    /// Mean of the two middle values for even counts.
    Median,
    /// Population variance (ddof = 0).
    Variance,
    Minimum,
    Maximum,
    Custom {
        name: &'static str,
        function: MomentFn,
    },
}

pub const DEFAULT_MOMENTS: [Moment; 3] = [Moment::Mean, Moment::StandardDeviation, Moment::Median];

impl Moment {
    pub fn name(&self) -> &'static str {
        match self {
            Moment::Mean => "mean",
            Moment::StandardDeviation => "std",
            Moment::Median => "median",
            Moment::Variance => "variance",
            Moment::Minimum => "min",
            Moment::Maximum => "max",
            Moment::Custom { name, .. } => *name,
        }
    }

    pub fn apply(&self, samples: &[f64]) -> f64 {
        match self {
            Moment::Mean => mean(samples),
            Moment::StandardDeviation => variance(samples).sqrt(),
            Moment::Median => median(samples),
            Moment::Variance => variance(samples),
            Moment::Minimum => samples.iter().copied().fold(f64::INFINITY, f64::min),
            Moment::Maximum => samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Moment::Custom { function, .. } => function(samples),
        }
    }
}

// Custom moments are identified by name; comparing function pointers is unreliable.
impl PartialEq for Moment {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Moment {}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown moment '{0}' (expected one of: mean, std, median, variance, min, max)")]
pub struct ParseMomentError(String);

impl FromStr for Moment {
    type Err = ParseMomentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" | "average" => Ok(Moment::Mean),
            "std" | "stdev" | "standard-deviation" | "standard_deviation" => {
                Ok(Moment::StandardDeviation)
            }
            "median" => Ok(Moment::Median),
            "var" | "variance" => Ok(Moment::Variance),
            "min" | "minimum" => Ok(Moment::Minimum),
            "max" | "maximum" => Ok(Moment::Maximum),
            _ => Err(ParseMomentError(s.to_string())),
        }
    }
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn variance(samples: &[f64]) -> f64 {
    let mu = mean(samples);
    samples.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / samples.len() as f64
}

fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
