use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Default scale for words-per-million normalization
pub const DEFAULT_FACTOR: f64 = 1_000_000.0;

/// How raw counts are turned into `norm_frequency`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// `count / sum * factor`
    #[default]
    WordsPerMillion,
    /// Counts rescaled into a range, then passed through softmax
    Softmax,
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalization::WordsPerMillion => write!(f, "words-per-million"),
            Normalization::Softmax => write!(f, "softmax"),
        }
    }
}

impl FromStr for Normalization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "words-per-million" | "wpm" => Ok(Normalization::WordsPerMillion),
            "softmax" => Ok(Normalization::Softmax),
            other => Err(format!(
                "Unknown normalization '{other}' (expected words-per-million or softmax)"
            )),
        }
    }
}

/// Softmax over a set of values, optionally rescaled into `[out_min, out_max]` first
#[derive(Debug, Clone)]
pub struct SoftMax {
    values: Vec<f64>,
    exp_sum: f64,
    min: f64,
    max: f64,
    sum: f64,
    out_min: f64,
    out_max: f64,
}

impl SoftMax {
    /// Rescale raw counts into `[out_min, out_max]` before applying softmax.
    ///
    /// Rescaling keeps `exp` from overflowing on large counts.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(counts: &[u64], out_min: f64, out_max: f64) -> Self {
        let min = counts.iter().copied().min().unwrap_or_default() as f64;
        let max = counts.iter().copied().max().unwrap_or_default() as f64;
        let sum = counts.iter().map(|&count| count as f64).sum();

        let values: Vec<f64> = counts
            .iter()
            .map(|&count| Self::range(count as f64, min, max, out_min, out_max))
            .collect();
        let exp_sum = values.iter().map(|value| value.exp()).sum();

        Self {
            values,
            exp_sum,
            min,
            max,
            sum,
            out_min,
            out_max,
        }
    }

    /// Softmax over values used as-is
    pub fn from_values(values: &[f64]) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp_sum = values.iter().map(|value| value.exp()).sum();

        Self {
            values: values.to_vec(),
            exp_sum,
            min,
            max,
            sum: values.iter().sum(),
            out_min: min,
            out_max: max,
        }
    }

    /// Linear map of `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
    ///
    /// A degenerate input range maps everything to `out_min`.
    pub fn range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
        let span = in_max - in_min;
        if span == 0.0 {
            return out_min;
        }
        let slope = (out_max - out_min) / span;
        slope.mul_add(value - in_min, out_min)
    }

    /// Softmax probability of the value at `index`
    pub fn index_value(&self, index: usize) -> Option<f64> {
        self.values.get(index).map(|&value| self.value(value))
    }

    /// Softmax probability of an already-scaled value against this distribution
    pub fn value(&self, value: f64) -> f64 {
        if self.exp_sum == 0.0 {
            return 0.0;
        }
        value.exp() / self.exp_sum
    }

    /// Rescale a raw count with this distribution's input and output ranges
    #[allow(clippy::cast_precision_loss)]
    pub fn scale(&self, count: u64) -> f64 {
        Self::range(count as f64, self.min, self.max, self.out_min, self.out_max)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Softmax value per key, computed over all counts
    pub fn map<K: Eq + Hash + Clone>(pairs: &[(K, u64)], out_min: f64, out_max: f64) -> HashMap<K, f64> {
        let counts: Vec<u64> = pairs.iter().map(|(_, count)| *count).collect();
        let softmax = Self::from_counts(&counts, out_min, out_max);

        pairs
            .iter()
            .enumerate()
            .map(|(i, (key, _))| (key.clone(), softmax.index_value(i).unwrap_or_default()))
            .collect()
    }
}

/// `count / sum * factor` per key; all zeros when the counts sum to zero
#[allow(clippy::cast_precision_loss)]
pub fn words_per_million<K: Eq + Hash + Clone>(pairs: &[(K, u64)], factor: f64) -> HashMap<K, f64> {
    let sum: u128 = pairs.iter().map(|(_, count)| u128::from(*count)).sum();

    pairs
        .iter()
        .map(|(key, count)| {
            let normalized = if sum == 0 {
                0.0
            } else {
                *count as f64 / sum as f64 * factor
            };
            (key.clone(), normalized)
        })
        .collect()
}
