//! Evaluation of a battery of checks against one query result.

use crate::check::{Check, Direction, OrderSpec};
use crate::collation::CollationKey;
use crate::gold::GoldRow;
use crate::matcher::{ColumnTypes, RowMismatch, match_any, match_row};
use crate::results::{QueryResults, ResultFormat, Row, strip_sigil, unwrap_call};
use bigdecimal::BigDecimal;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use xsdcast::UnknownDatatypeError;

/// A check that was evaluated but did not hold.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CheckFailure {
    #[error("expected {expected} rows but got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[error("row {row} has {actual} columns but {expected} were expected")]
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("expected the variables {expected:?} but got {actual:?}")]
    Selected {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error(transparent)]
    UnknownDatatype(#[from] UnknownDatatypeError),
    #[error("row {row} does not match: expected {expected} but got {actual}: {mismatch}")]
    RowMismatch {
        row: usize,
        expected: String,
        actual: String,
        mismatch: RowMismatch,
    },
    #[error("no row matches {0}")]
    NoMatchingRow(String),
    #[error("no warning contains {expected:?}, the warnings are {warnings:?}")]
    MissingWarning {
        expected: String,
        warnings: Vec<String>,
    },
    #[error("the variable {0} is not projected")]
    MissingVariable(String),
    #[error("row {row}: {value} is not a number")]
    NotANumber { row: usize, value: String },
    #[error("rows {row} and {next_row} are not in {direction} order: {previous} then {next}")]
    Misordered {
        row: usize,
        next_row: usize,
        direction: Direction,
        previous: String,
        next: String,
    },
    /// The test file itself is wrong.
    #[error("{0}")]
    InvalidCheck(String),
}

/// The outcome of one check.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub name: String,
    pub outcome: Result<(), CheckFailure>,
}

/// The outcomes of all checks of a battery, in evaluation order.
#[derive(Debug, Clone)]
pub struct BatteryReport {
    pub format: ResultFormat,
    pub checks: Vec<CheckReport>,
}

impl BatteryReport {
    /// `true` if all checks passed.
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.outcome.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &CheckFailure)> {
        self.checks
            .iter()
            .filter_map(|c| Some((c.name.as_str(), c.outcome.as_ref().err()?)))
    }
}

impl fmt::Display for BatteryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            match &check.outcome {
                Ok(()) => writeln!(f, "  ok   {}", check.name)?,
                Err(e) => writeln!(f, "  FAIL {}: {e}", check.name)?,
            }
        }
        Ok(())
    }
}

/// The state shared by the checks of a single battery.
#[derive(Debug, Clone, Default)]
pub struct BatteryContext {
    column_types: ColumnTypes,
}

impl BatteryContext {
    #[inline]
    pub fn column_types(&self) -> &ColumnTypes {
        &self.column_types
    }
}

/// Evaluates batteries of checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckEvaluator {
    prescan_row_data_types: bool,
}

impl CheckEvaluator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the first valid `row_data_types` check before evaluating the battery.
    ///
    /// By default the checks run strictly in the order they are given.
    #[inline]
    #[must_use]
    pub fn with_prescan_row_data_types(mut self, prescan: bool) -> Self {
        self.prescan_row_data_types = prescan;
        self
    }

    /// Evaluates all `checks` against `results` with a fresh context.
    ///
    /// A failing check does not prevent the next ones from running.
    pub fn evaluate(&self, results: &QueryResults, checks: &[Check]) -> BatteryReport {
        let mut context = BatteryContext::default();
        if self.prescan_row_data_types {
            for check in checks {
                if let Check::RowDataTypes(columns) = check {
                    if row_data_types(columns, &mut context).is_ok() {
                        break;
                    }
                }
            }
        }
        BatteryReport {
            format: results.format(),
            checks: checks
                .iter()
                .map(|check| {
                    let outcome = evaluate_check(check, results, &mut context);
                    debug!(check = check.name(), passed = outcome.is_ok(), "check evaluated");
                    CheckReport {
                        name: check.name().into(),
                        outcome,
                    }
                })
                .collect(),
        }
    }
}

/// Evaluates a single check, possibly filling the column types of `context`.
pub fn evaluate_check(
    check: &Check,
    results: &QueryResults,
    context: &mut BatteryContext,
) -> Result<(), CheckFailure> {
    match check {
        Check::NumRows(expected) => num_rows(results, *expected),
        Check::NumCols(expected) => num_cols(results, *expected),
        Check::Selected(expected) => selected(results, expected),
        Check::RowDataTypes(columns) => row_data_types(columns, context),
        Check::Res(expected) => res(results, expected, &context.column_types),
        Check::ContainsRow(expected) => contains_row(results, expected, &context.column_types),
        Check::ContainsWarning(expected) => contains_warning(results, expected),
        Check::OrderNumeric(order) => order_by(results, order, numeric_key),
        Check::OrderString(order) => order_by(results, order, |_, value| {
            Ok(Some(CollationKey::new(value)))
        }),
        Check::Invalid { message, .. } => Err(CheckFailure::InvalidCheck(message.clone())),
    }
}

fn num_rows(results: &QueryResults, expected: usize) -> Result<(), CheckFailure> {
    if results.len() == expected {
        Ok(())
    } else {
        Err(CheckFailure::RowCount {
            expected,
            actual: results.len(),
        })
    }
}

/// Exact width for the legacy encoding, at most `expected` bindings for the standard one.
fn num_cols(results: &QueryResults, expected: usize) -> Result<(), CheckFailure> {
    for (row, actual) in results.rows().enumerate() {
        let width = actual.width();
        let holds = match results.format() {
            ResultFormat::Legacy => width == expected,
            ResultFormat::Standard => width <= expected,
        };
        if !holds {
            return Err(CheckFailure::ColumnCount {
                row,
                expected,
                actual: width,
            });
        }
    }
    Ok(())
}

fn selected(results: &QueryResults, expected: &[String]) -> Result<(), CheckFailure> {
    let actual = results.variables();
    let holds = expected.len() == actual.len()
        && expected.iter().zip(actual).all(|(e, a)| {
            let a = a.as_str();
            match results.format() {
                ResultFormat::Legacy => e == a || unwrap_call(e) == Some(a),
                ResultFormat::Standard => {
                    strip_sigil(e) == a
                        || unwrap_call(e).is_some_and(|inner| strip_sigil(inner) == a)
                }
            }
        });
    if holds {
        Ok(())
    } else {
        Err(CheckFailure::Selected {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        })
    }
}

fn row_data_types(columns: &[String], context: &mut BatteryContext) -> Result<(), CheckFailure> {
    let columns = columns
        .iter()
        .map(|column| ColumnTypes::parse_column(column))
        .collect::<Result<Vec<_>, _>>()?;
    if !context.column_types.populate(columns) {
        debug!("column types already set for this battery, keeping them");
    }
    Ok(())
}

fn res(results: &QueryResults, expected: &[GoldRow], types: &ColumnTypes) -> Result<(), CheckFailure> {
    if expected.len() != results.len() {
        return Err(CheckFailure::RowCount {
            expected: expected.len(),
            actual: results.len(),
        });
    }
    for (row, (gold, actual)) in expected.iter().zip(results.rows()).enumerate() {
        match_row(gold, actual, types).map_err(|mismatch| CheckFailure::RowMismatch {
            row,
            expected: gold.to_string(),
            actual: actual.to_string(),
            mismatch,
        })?;
    }
    Ok(())
}

fn contains_row(
    results: &QueryResults,
    expected: &GoldRow,
    types: &ColumnTypes,
) -> Result<(), CheckFailure> {
    match match_any(expected, results.rows(), types) {
        Some(row) => {
            debug!(row, "matching row found");
            Ok(())
        }
        None => Err(CheckFailure::NoMatchingRow(expected.to_string())),
    }
}

/// Without a warnings channel in the encoding there is nothing to check.
fn contains_warning(results: &QueryResults, expected: &[String]) -> Result<(), CheckFailure> {
    let Some(warnings) = results.warnings() else {
        debug!(format = %results.format(), "no warnings channel, skipping");
        return Ok(());
    };
    for substring in expected {
        if !warnings.iter().any(|w| w.contains(substring.as_str())) {
            return Err(CheckFailure::MissingWarning {
                expected: substring.clone(),
                warnings: warnings.to_vec(),
            });
        }
    }
    Ok(())
}

/// Numbers are compared exactly, `INF` and `-INF` bound the finite values.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
enum NumericKey {
    NegativeInfinity,
    Finite(BigDecimal),
    PositiveInfinity,
}

/// `NaN` is unordered and skipped like an unbound cell.
fn numeric_key(row: usize, value: &str) -> Result<Option<NumericKey>, CheckFailure> {
    let trimmed = value.trim();
    match trimmed {
        "NaN" | "nan" => Ok(None),
        "INF" | "+INF" | "inf" | "Infinity" => Ok(Some(NumericKey::PositiveInfinity)),
        "-INF" | "-inf" | "-Infinity" => Ok(Some(NumericKey::NegativeInfinity)),
        _ => BigDecimal::from_str(trimmed)
            .map(|v| Some(NumericKey::Finite(v)))
            .map_err(|_| CheckFailure::NotANumber {
                row,
                value: value.into(),
            }),
    }
}

/// Walks the bound cells of `order.var` and compares each with the previous one.
///
/// Cells for which `key` returns `None` are skipped.
fn order_by<K: Ord>(
    results: &QueryResults,
    order: &OrderSpec,
    key: impl Fn(usize, &str) -> Result<Option<K>, CheckFailure>,
) -> Result<(), CheckFailure> {
    if !projects(results.variables(), &order.var) {
        return Err(CheckFailure::MissingVariable(order.var.clone()));
    }
    let mut previous: Option<(usize, &str, K)> = None;
    for (row, actual) in results.rows().enumerate() {
        let Some(value) = cell_value(actual, &order.var) else {
            continue;
        };
        let Some(current) = key(row, value)? else {
            debug!(row, value, "unordered value skipped");
            continue;
        };
        if let Some((previous_row, previous_value, previous_key)) = &previous {
            let misordered = match order.dir {
                Direction::Ascending => previous_key.cmp(&current) == Ordering::Greater,
                Direction::Descending => previous_key.cmp(&current) == Ordering::Less,
            };
            if misordered {
                return Err(CheckFailure::Misordered {
                    row: *previous_row,
                    next_row: row,
                    direction: order.dir,
                    previous: (*previous_value).into(),
                    next: value.into(),
                });
            }
        }
        previous = Some((row, value, current));
    }
    Ok(())
}

fn cell_value<'a>(row: Row<'a>, variable: &str) -> Option<&'a str> {
    Some(row.cell_at(variable)?.value)
}

fn projects(variables: &[String], variable: &str) -> bool {
    let matches = |name: &str| variables.iter().any(|v| strip_sigil(v) == strip_sigil(name));
    matches(variable) || unwrap_call(variable).is_some_and(matches)
}
