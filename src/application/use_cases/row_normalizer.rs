use crate::domain::csv::{Dataset, NumericCell, NumericPolicy};
use crate::domain::error::{AppError, Result};

/// Numbers found in `column`, in row order.
///
/// Blank cells are always skipped. Non-numeric cells are dropped under the
/// lenient policy and fail the whole read under the strict one.
pub fn numeric_column(dataset: &Dataset, column: &str, policy: &NumericPolicy) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(dataset.len());

    for row in &dataset.rows {
        match row.number(column, policy) {
            NumericCell::Value(value) => values.push(value),
            NumericCell::Missing => {}
            NumericCell::Invalid(raw) if policy.strict => {
                return Err(AppError::ParseError(format!(
                    "Row {}: column '{}' is not numeric: {:?}",
                    row.index + 1,
                    column,
                    raw
                )));
            }
            NumericCell::Invalid(_) => {}
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::CsvRow;

    fn dataset(values: &[&str]) -> Dataset {
        let rows = values
            .iter()
            .enumerate()
            .map(|(idx, value)| CsvRow::from_pairs(idx, [("Co2_emission", *value)]))
            .collect();
        Dataset::new(vec!["Co2_emission".to_string()], rows)
    }

    #[test]
    fn test_lenient_drops_bad_values_in_order() {
        let data = dataset(&["10", "abc", "", "2.5", "NaN", "-1"]);
        let values = numeric_column(&data, "Co2_emission", &NumericPolicy::lenient()).unwrap();
        assert_eq!(values, vec![10.0, 2.5, -1.0]);
    }

    #[test]
    fn test_unknown_column_yields_nothing() {
        let data = dataset(&["10", "20"]);
        let values = numeric_column(&data, "gdp_per_capita", &NumericPolicy::strict()).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_strict_reports_first_bad_cell() {
        let data = dataset(&["10", "", "abc", "xyz"]);
        match numeric_column(&data, "Co2_emission", &NumericPolicy::strict()) {
            Err(AppError::ParseError(msg)) => {
                assert_eq!(msg, "Row 3: column 'Co2_emission' is not numeric: \"abc\"")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
