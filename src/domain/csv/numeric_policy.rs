// ============================================================
// NUMERIC POLICY
// ============================================================
// How raw CSV cells are turned into numbers

use serde::{Deserialize, Serialize};

/// Outcome of reading one cell as a number
#[derive(Debug, Clone, PartialEq)]
pub enum NumericCell {
    /// Column absent from the row, or the cell is blank
    Missing,

    /// Cell has content that is not a finite number
    Invalid(String),

    /// Parsed value
    Value(f64),
}

impl NumericCell {
    pub fn value(&self) -> Option<f64> {
        match self {
            NumericCell::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Configuration for numeric cell parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericPolicy {
    /// Fail on the first non-numeric cell instead of dropping it (default: false)
    pub strict: bool,

    /// Strip `,` thousands separators before parsing (default: false)
    pub thousands_separator: bool,
}

impl NumericPolicy {
    /// Lenient policy: bad cells are silently dropped
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Strict policy: bad cells are an error
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Default::default()
        }
    }

    pub fn with_thousands_separator(mut self, enabled: bool) -> Self {
        self.thousands_separator = enabled;
        self
    }

    /// Parse a raw cell value.
    ///
    /// Blank cells are `Missing`. `NaN` and infinities are rejected.
    pub fn parse(&self, raw: Option<&str>) -> NumericCell {
        let trimmed = match raw.map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => return NumericCell::Missing,
        };

        let parsed = if self.thousands_separator {
            trimmed.replace(',', "").parse::<f64>()
        } else {
            trimmed.parse::<f64>()
        };

        match parsed {
            Ok(value) if value.is_finite() => NumericCell::Value(value),
            _ => NumericCell::Invalid(trimmed.to_string()),
        }
    }
}
