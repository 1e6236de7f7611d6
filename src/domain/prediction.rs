use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmissionCategory {
    Low,
    Medium,
    High,
}

impl EmissionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmissionCategory::Low => "Low",
            EmissionCategory::Medium => "Medium",
            EmissionCategory::High => "High",
        }
    }
}

impl fmt::Display for EmissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmissionCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Low" => Ok(EmissionCategory::Low),
            "Medium" => Ok(EmissionCategory::Medium),
            "High" => Ok(EmissionCategory::High),
            other => Err(AppError::Backend(format!(
                "Unknown emission category: {}",
                other
            ))),
        }
    }
}

/// Category boundaries in kt CO2
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: f64,
    pub high: f64,
}

impl Thresholds {
    /// `value <= low` is Low, `value <= high` is Medium, anything above is High.
    pub fn classify(&self, value: f64) -> EmissionCategory {
        if value <= self.low {
            EmissionCategory::Low
        } else if value <= self.high {
            EmissionCategory::Medium
        } else {
            EmissionCategory::High
        }
    }
}

/// Body returned by `POST {base_url}/predict`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_emission: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub co2_emission: f64,
    pub category: EmissionCategory,
    pub thresholds: Thresholds,
}

impl TryFrom<PredictionResponse> for PredictionResult {
    type Error = AppError;

    fn try_from(response: PredictionResponse) -> Result<Self> {
        if !response.success {
            return Err(AppError::Backend(
                response
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let mut absent = Vec::new();
        if response.co2_emission.is_none() {
            absent.push("co2_emission");
        }
        if response.category.is_none() {
            absent.push("category");
        }
        if response.thresholds.is_none() {
            absent.push("thresholds");
        }

        match (response.co2_emission, response.category, response.thresholds) {
            (Some(co2_emission), Some(category), Some(thresholds)) => Ok(Self {
                co2_emission,
                category: category.parse()?,
                thresholds,
            }),
            _ => Err(AppError::Backend(format!(
                "Malformed prediction response: missing {}",
                absent.join(", ")
            ))),
        }
    }
}

/// Display texts for a prediction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    pub emission_text: String,
    pub category_text: String,
    pub category_class: String,
    pub threshold_lines: Vec<String>,
}

impl From<&PredictionResult> for ResultView {
    fn from(result: &PredictionResult) -> Self {
        let Thresholds { low, high } = result.thresholds;
        Self {
            emission_text: format!("{:.2}", result.co2_emission),
            category_text: format!("Category: {}", result.category),
            category_class: format!(
                "result-category {}",
                result.category.as_str().to_lowercase()
            ),
            threshold_lines: vec![
                format!("Low: ≤ {} kt CO₂", low),
                format!("Medium: {} – {} kt CO₂", low, high),
                format!("High: > {} kt CO₂", high),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn high_response() -> PredictionResponse {
        serde_json::from_str(
            r#"{"success":true,"co2_emission":1234.5,"category":"High","thresholds":{"low":50,"high":500}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_result_view_texts() {
        let result = PredictionResult::try_from(high_response()).unwrap();
        let view = ResultView::from(&result);

        assert_eq!(view.emission_text, "1234.50");
        assert_eq!(view.category_text, "Category: High");
        assert_eq!(view.category_class, "result-category high");
        assert_eq!(
            view.threshold_lines,
            vec![
                "Low: ≤ 50 kt CO₂".to_string(),
                "Medium: 50 – 500 kt CO₂".to_string(),
                "High: > 500 kt CO₂".to_string(),
            ]
        );
    }

    #[test]
    fn test_failed_response_keeps_backend_message() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"success":false,"error":"'Latitude'"}"#).unwrap();
        match PredictionResult::try_from(response) {
            Err(AppError::Backend(msg)) => assert_eq!(msg, "'Latitude'"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_success_is_malformed() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"success":true,"co2_emission":3.0}"#).unwrap();
        match PredictionResult::try_from(response) {
            Err(AppError::Backend(msg)) => {
                assert_eq!(msg, "Malformed prediction response: missing category, thresholds")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut response = high_response();
        response.category = Some("Extreme".to_string());
        assert!(matches!(
            PredictionResult::try_from(response),
            Err(AppError::Backend(_))
        ));
    }

    #[test]
    fn test_classify_boundaries_are_inclusive() {
        let thresholds = Thresholds {
            low: 50.0,
            high: 500.0,
        };
        assert_eq!(thresholds.classify(50.0), EmissionCategory::Low);
        assert_eq!(thresholds.classify(50.01), EmissionCategory::Medium);
        assert_eq!(thresholds.classify(500.0), EmissionCategory::Medium);
        assert_eq!(thresholds.classify(1234.5), EmissionCategory::High);
    }
}
