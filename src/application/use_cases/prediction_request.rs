use std::collections::HashMap;
use tracing::debug;

use crate::domain::error::ValidationError;
use crate::domain::feature::{feature_index, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Raw form input keyed by feature name
pub type FormValues = HashMap<String, String>;

/// Builds the Feature Vector from form input.
///
/// Validation is batched: every blank field and every unparseable field is
/// collected before failing, never just the first one.
pub struct PredictionRequestBuilder;

impl PredictionRequestBuilder {
    pub fn build(form: &FormValues) -> Result<FeatureVector, ValidationError> {
        let unknown = Self::unknown_fields(form);
        if !unknown.is_empty() {
            debug!(fields = ?unknown, "Ignoring unknown form fields");
        }

        let mut values = [0.0; FEATURE_COUNT];
        let mut error = ValidationError::default();

        for (idx, name) in FEATURE_NAMES.iter().enumerate() {
            let raw = form.get(*name).map(|value| value.trim()).unwrap_or("");
            if raw.is_empty() {
                error.missing.push(name.to_string());
                continue;
            }
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => values[idx] = value,
                _ => error.invalid.push(name.to_string()),
            }
        }

        if error.is_empty() {
            Ok(FeatureVector::from_values(values))
        } else {
            Err(error)
        }
    }

    /// Form keys that are not model features, sorted
    pub fn unknown_fields(form: &FormValues) -> Vec<&str> {
        let mut unknown: Vec<&str> = form
            .keys()
            .map(String::as_str)
            .filter(|name| feature_index(name).is_none())
            .collect();
        unknown.sort_unstable();
        unknown
    }
}
