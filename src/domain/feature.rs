use once_cell::sync::Lazy;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of inputs the prediction model takes.
pub const FEATURE_COUNT: usize = 18;

/// Prediction model inputs in declaration order.
///
/// These names are the model's own and are not reconciled with the dataset
/// column names in `domain::csv::columns`.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Access to electricity (% of population)",
    "Access to clean fuels for cooking",
    "Renewable-electricity-generating-capacity-per-capita",
    "Financial flows to developing countries (US $)",
    "Renewable energy share in the total final energy consumption (%)",
    "Electricity from fossil fuels (TWh)",
    "Electricity from nuclear (TWh)",
    "Electricity from renewables (TWh)",
    "Low-carbon electricity (% electricity)",
    "Primary energy consumption per capita (kWh/person)",
    "Energy intensity level of primary energy (MJ/$2017 PPP GDP)",
    "Renewables (% equivalent primary energy)",
    "gdp_growth",
    "gdp_per_capita",
    "Density_(P/Km2)",
    "Land Area(Km2)",
    "Latitude",
    "Longitude",
];

/// Advisory input range shown next to a form field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Parallel to `FEATURE_NAMES`.
const FEATURE_RANGES: [FeatureRange; FEATURE_COUNT] = [
    FeatureRange::new(0.0, 100.0),
    FeatureRange::new(0.0, 100.0),
    FeatureRange::new(0.0, 10.0),
    FeatureRange::new(0.0, 10_000_000.0),
    FeatureRange::new(0.0, 100.0),
    FeatureRange::new(0.0, 1000.0),
    FeatureRange::new(0.0, 500.0),
    FeatureRange::new(0.0, 1000.0),
    FeatureRange::new(0.0, 100.0),
    FeatureRange::new(100.0, 10_000.0),
    FeatureRange::new(1.0, 30.0),
    FeatureRange::new(0.0, 100.0),
    FeatureRange::new(-10.0, 15.0),
    FeatureRange::new(100.0, 150_000.0),
    FeatureRange::new(1.0, 2000.0),
    FeatureRange::new(100.0, 10_000_000.0),
    FeatureRange::new(-90.0, 90.0),
    FeatureRange::new(-180.0, 180.0),
];

static FEATURE_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    FEATURE_NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| (*name, idx))
        .collect()
});

pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_INDEX.get(name).copied()
}

/// Feature names paired with their advisory ranges, in declaration order
pub fn feature_catalogue() -> impl Iterator<Item = (&'static str, FeatureRange)> {
    FEATURE_NAMES.iter().copied().zip(FEATURE_RANGES.iter().copied())
}

/// The 18 parsed model inputs.
///
/// Only `PredictionRequestBuilder` constructs one, so every key is always
/// present. Serializes as a JSON object in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub(crate) fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Features whose value falls outside the advisory range
    pub fn out_of_range(&self) -> Vec<&'static str> {
        self.iter()
            .zip(FEATURE_RANGES.iter())
            .filter(|((_, value), range)| !range.contains(*value))
            .map(|((name, _), _)| name)
            .collect()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names_are_unique() {
        assert_eq!(FEATURE_INDEX.len(), FEATURE_COUNT);
        assert_eq!(feature_index("Latitude"), Some(16));
        assert_eq!(feature_index("latitude"), None);
    }

    #[test]
    fn test_feature_ranges() {
        let catalogue: Vec<_> = feature_catalogue().collect();
        assert_eq!(catalogue.len(), FEATURE_COUNT);
        assert_eq!(catalogue[17], ("Longitude", FeatureRange::new(-180.0, 180.0)));
    }

    #[test]
    fn test_serializes_in_declaration_order() {
        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 99.5;
        values[17] = -45.0;
        let vector = FeatureVector::from_values(values);

        let json = serde_json::to_string(&vector).unwrap();
        let first = json.find("Access to electricity").unwrap();
        let last = json.find("Longitude").unwrap();
        assert!(first < last);

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_object().unwrap().len(), FEATURE_COUNT);
        assert_eq!(parsed["Longitude"], serde_json::json!(-45.0));
    }

    #[test]
    fn test_out_of_range_features() {
        let mut values = [0.0; FEATURE_COUNT];
        for (idx, (_, range)) in feature_catalogue().enumerate() {
            values[idx] = range.min;
        }
        values[16] = 120.0;
        let vector = FeatureVector::from_values(values);
        assert_eq!(vector.out_of_range(), vec!["Latitude"]);
    }
}
