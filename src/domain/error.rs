use serde::{Deserialize, Serialize};
use std::fmt;

/// Form fields that blocked a Feature Vector from being built.
///
/// Both lists follow feature declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub missing: Vec<String>,
    #[serde(default)]
    pub invalid: Vec<String>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!(
                "Please fill in all fields. Missing: {}",
                self.missing.join(", ")
            ));
        }
        if !self.invalid.is_empty() {
            parts.push(format!("Not a number: {}", self.invalid.join(", ")));
        }
        write!(f, "{}", parts.join(". "))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    NotFound(String),
    Validation(ValidationError),
    Transport(String),
    Backend(String),
    DataLoad(String),
    ParseError(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation(err) => write!(f, "Validation error: {}", err),
            AppError::Transport(msg) => write!(f, "Connection error: {}", msg),
            AppError::Backend(msg) => write!(f, "Error: {}", msg),
            AppError::DataLoad(msg) => write!(f, "Data load error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_missing_fields() {
        let err = ValidationError {
            missing: vec!["Latitude".to_string(), "Longitude".to_string()],
            invalid: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "Please fill in all fields. Missing: Latitude, Longitude"
        );
    }

    #[test]
    fn test_backend_message_is_verbatim() {
        let err = AppError::Backend("model not loaded".to_string());
        assert_eq!(err.to_string(), "Error: model not loaded");
    }
}
