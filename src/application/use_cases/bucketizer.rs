use serde::Serialize;

use crate::domain::error::{AppError, Result};

/// Boundaries of the CO2 emission histogram, in kt.
pub const EMISSION_BUCKETS: [f64; 7] = [0.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0];

/// Ascending bucket start points.
///
/// Bucket `i` is `[b_i, b_(i+1))`; the last bucket has no upper bound.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketBoundaries(Vec<f64>);

impl BucketBoundaries {
    /// Boundaries must be finite, strictly increasing and non-empty.
    pub fn new(boundaries: Vec<f64>) -> Result<Self> {
        if boundaries.is_empty() {
            return Err(AppError::ConfigError(
                "Bucket boundaries must not be empty".to_string(),
            ));
        }
        if let Some(bad) = boundaries.iter().find(|b| !b.is_finite()) {
            return Err(AppError::ConfigError(format!(
                "Bucket boundary is not finite: {}",
                bad
            )));
        }
        if let Some(pair) = boundaries.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(AppError::ConfigError(format!(
                "Bucket boundaries must be strictly increasing: {} then {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self(boundaries))
    }

    pub fn emissions() -> Self {
        Self(EMISSION_BUCKETS.to_vec())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the bucket holding `value`, or `None` below the first boundary
    pub fn bucket_of(&self, value: f64) -> Option<usize> {
        // number of boundaries <= value
        let upto = self.0.partition_point(|b| *b <= value);
        upto.checked_sub(1)
    }

    /// `"b_i-b_(i+1)"` for interior buckets, `"b_n+"` for the last one
    pub fn labels(&self) -> Vec<String> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, b)| match self.0.get(i + 1) {
                Some(next) => format!("{}-{}", b, next),
                None => format!("{}+", b),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Count `values` per bucket. Values below the first boundary (and NaN) are
/// left out of every bucket.
pub fn bucketize(boundaries: &BucketBoundaries, values: &[f64]) -> Histogram {
    let mut counts = vec![0usize; boundaries.len()];
    for value in values {
        if let Some(idx) = boundaries.bucket_of(*value) {
            counts[idx] += 1;
        }
    }

    Histogram {
        labels: boundaries.labels(),
        counts,
    }
}
