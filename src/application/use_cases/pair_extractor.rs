use crate::domain::chart::Point;
use crate::domain::csv::{Dataset, NumericPolicy};

/// The first `cap` rows (in row order) where both columns parse to positive
/// numbers, as `(x, y)` points.
///
/// This is a prefix of the dataset, not a representative sample.
pub fn extract_pairs(
    dataset: &Dataset,
    x_column: &str,
    y_column: &str,
    cap: usize,
    policy: &NumericPolicy,
) -> Vec<Point> {
    dataset
        .rows
        .iter()
        .filter_map(|row| {
            let x = row.number(x_column, policy).value()?;
            let y = row.number(y_column, policy).value()?;
            (x > 0.0 && y > 0.0).then_some(Point { x, y })
        })
        .take(cap)
        .collect()
}
