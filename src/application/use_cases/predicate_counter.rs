use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::csv::{Dataset, NumericPolicy};
use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
}

impl Comparison {
    fn symbol(&self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Eq => "==",
        }
    }
}

/// `value <op> threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub comparison: Comparison,
    pub threshold: f64,
}

impl Predicate {
    pub fn new(comparison: Comparison, threshold: f64) -> Self {
        Self {
            comparison,
            threshold,
        }
    }

    pub fn gt(threshold: f64) -> Self {
        Self::new(Comparison::Gt, threshold)
    }

    pub fn matches(&self, value: f64) -> bool {
        match self.comparison {
            Comparison::Gt => value > self.threshold,
            Comparison::Ge => value >= self.threshold,
            Comparison::Lt => value < self.threshold,
            Comparison::Le => value <= self.threshold,
            Comparison::Eq => value == self.threshold,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.comparison.symbol(), self.threshold)
    }
}

impl FromStr for Predicate {
    type Err = AppError;

    /// Parses `"> 0"`, `">=100"`, `"== 2.5"` and the like.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        // two-character operators first so ">=" is not read as ">"
        let operators = [
            (">=", Comparison::Ge),
            ("<=", Comparison::Le),
            ("==", Comparison::Eq),
            (">", Comparison::Gt),
            ("<", Comparison::Lt),
        ];

        let (comparison, rest) = operators
            .iter()
            .find_map(|(symbol, comparison)| {
                trimmed
                    .strip_prefix(symbol)
                    .map(|rest| (*comparison, rest))
            })
            .ok_or_else(|| AppError::ParseError(format!("Unknown predicate: {}", s)))?;

        let threshold = rest
            .trim()
            .parse::<f64>()
            .map_err(|e| AppError::ParseError(format!("Bad predicate threshold in {:?}: {}", s, e)))?;

        Ok(Self::new(comparison, threshold))
    }
}

/// Rows whose `column` parses to a number satisfying `predicate`.
///
/// Cells that do not parse never match, whatever the policy's strictness.
pub fn count_matching(
    dataset: &Dataset,
    column: &str,
    predicate: &Predicate,
    policy: &NumericPolicy,
) -> usize {
    dataset
        .rows
        .iter()
        .filter_map(|row| row.number(column, policy).value())
        .filter(|value| predicate.matches(*value))
        .count()
}
