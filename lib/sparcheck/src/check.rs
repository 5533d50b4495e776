//! The checks a test file can state about the result of a query.

use crate::gold::GoldRow;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The closed set of supported check names.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CheckKind {
    NumRows,
    NumCols,
    Selected,
    RowDataTypes,
    Res,
    ContainsRow,
    ContainsWarning,
    OrderNumeric,
    OrderString,
}

impl CheckKind {
    pub const ALL: [Self; 9] = [
        Self::NumRows,
        Self::NumCols,
        Self::Selected,
        Self::RowDataTypes,
        Self::Res,
        Self::ContainsRow,
        Self::ContainsWarning,
        Self::OrderNumeric,
        Self::OrderString,
    ];

    /// The name used in test files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NumRows => "num_rows",
            Self::NumCols => "num_cols",
            Self::Selected => "selected",
            Self::RowDataTypes => "row_data_types",
            Self::Res => "res",
            Self::ContainsRow => "contains_row",
            Self::ContainsWarning => "contains_warning",
            Self::OrderNumeric => "order_numeric",
            Self::OrderString => "order_string",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort direction of the `order_*` checks.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Direction {
    Ascending,
    Descending,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, String> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(Self::Ascending)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(Self::Descending)
        } else {
            Err(format!("unexpected direction '{value}', expected asc or desc"))
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        })
    }
}

/// The expectation of the `order_*` checks.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderSpec {
    pub dir: Direction,
    pub var: String,
}

/// One check with its expected value.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    NumRows(usize),
    NumCols(usize),
    Selected(Vec<String>),
    /// One `|` separated candidate list per projected column.
    RowDataTypes(Vec<String>),
    Res(Vec<GoldRow>),
    ContainsRow(GoldRow),
    ContainsWarning(Vec<String>),
    OrderNumeric(OrderSpec),
    OrderString(OrderSpec),
    /// A check that cannot be evaluated: unknown name or expectation of the wrong shape.
    Invalid { name: String, message: String },
}

impl Check {
    /// Builds a check from its name and its expected value.
    ///
    /// Errors are kept in [`Check::Invalid`] so that they are reported with the other checks.
    pub fn from_entry(name: &str, expected: Value) -> Self {
        let Some(kind) = CheckKind::from_name(name) else {
            return Self::Invalid {
                name: name.into(),
                message: format!("unexpected check '{name}'"),
            };
        };
        let parsed = match kind {
            CheckKind::NumRows => parse(expected).map(Self::NumRows),
            CheckKind::NumCols => parse(expected).map(Self::NumCols),
            CheckKind::Selected => parse(expected).map(Self::Selected),
            CheckKind::RowDataTypes => parse(expected).map(Self::RowDataTypes),
            CheckKind::Res => parse(expected).map(Self::Res),
            CheckKind::ContainsRow => parse(expected).map(Self::ContainsRow),
            CheckKind::ContainsWarning => parse(expected).map(Self::ContainsWarning),
            CheckKind::OrderNumeric => parse(expected).map(Self::OrderNumeric),
            CheckKind::OrderString => parse(expected).map(Self::OrderString),
        };
        parsed.unwrap_or_else(|e| Self::Invalid {
            name: name.into(),
            message: format!("unexpected expectation for {name}: {e}"),
        })
    }

    /// The checks of one entry of a `checks` list, in key order.
    pub fn from_map(entry: Map<String, Value>) -> Vec<Self> {
        entry
            .into_iter()
            .map(|(name, expected)| Self::from_entry(&name, expected))
            .collect()
    }

    pub fn kind(&self) -> Option<CheckKind> {
        Some(match self {
            Self::NumRows(_) => CheckKind::NumRows,
            Self::NumCols(_) => CheckKind::NumCols,
            Self::Selected(_) => CheckKind::Selected,
            Self::RowDataTypes(_) => CheckKind::RowDataTypes,
            Self::Res(_) => CheckKind::Res,
            Self::ContainsRow(_) => CheckKind::ContainsRow,
            Self::ContainsWarning(_) => CheckKind::ContainsWarning,
            Self::OrderNumeric(_) => CheckKind::OrderNumeric,
            Self::OrderString(_) => CheckKind::OrderString,
            Self::Invalid { .. } => return None,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Invalid { name, .. } => name,
            _ => self.kind().map_or("", CheckKind::name),
        }
    }
}

fn parse<T: DeserializeOwned>(expected: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(expected)
}

/// Deserializes a `checks` list: a sequence of maps, each holding one or more checks.
pub(crate) fn deserialize_checks<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Check>, D::Error> {
    let entries = Option::<Vec<Map<String, Value>>>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .flatten()
        .flat_map(Check::from_map)
        .collect())
}
