// ============================================================
// CSV ROW TYPES
// ============================================================
// Data structures representing parsed CSV content

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{NumericCell, NumericPolicy};

/// A single field in a CSV row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvField {
    /// Column header, verbatim
    pub name: String,

    /// Field value
    pub value: String,
}

impl CsvField {
    /// Create a new CSV field
    pub fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// A single row in a CSV file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvRow {
    /// Row index (0-based, header excluded)
    pub index: usize,

    /// All fields in this row
    pub fields: Vec<CsvField>,

    /// Header -> value lookup
    pub field_map: HashMap<String, String>,
}

impl CsvRow {
    /// Create a new CSV row
    pub fn new(index: usize, fields: Vec<CsvField>) -> Self {
        let field_map = fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect();

        Self {
            index,
            fields,
            field_map,
        }
    }

    /// Build a row straight from header/value pairs
    pub fn from_pairs<K, V>(index: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, value)| CsvField::new(name.into(), value.into()))
            .collect();
        Self::new(index, fields)
    }

    /// Raw value at a column
    pub fn value(&self, column: &str) -> Option<&str> {
        self.field_map.get(column).map(String::as_str)
    }

    /// Value at a column read as a number
    pub fn number(&self, column: &str, policy: &NumericPolicy) -> NumericCell {
        policy.parse(self.value(column))
    }
}

/// An ordered set of rows sharing one header line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<CsvRow>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Columns from `required` that the header line lacks, in the given order
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.has_column(column))
            .map(|column| column.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup_uses_verbatim_header() {
        let row = CsvRow::from_pairs(0, [("Electricity from nuclear (TWh)", "12.5")]);
        assert_eq!(row.value("Electricity from nuclear (TWh)"), Some("12.5"));
        assert_eq!(row.value("electricity_from_nuclear_twh"), None);
        assert_eq!(
            row.number("Electricity from nuclear (TWh)", &NumericPolicy::lenient()),
            NumericCell::Value(12.5)
        );
    }

    #[test]
    fn test_missing_columns_keeps_requested_order() {
        let dataset = Dataset::new(vec!["gdp_per_capita".to_string()], Vec::new());
        assert_eq!(
            dataset.missing_columns(&["Co2_emission", "gdp_per_capita", "Latitude"]),
            vec!["Co2_emission".to_string(), "Latitude".to_string()]
        );
    }
}
