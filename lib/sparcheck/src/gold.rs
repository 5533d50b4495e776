//! Expected ("gold") values of the test files.

use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use xsdcast::{Datatype, Value};

/// A raw scalar as written in the test file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GoldScalar {
    Boolean(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
}

impl GoldScalar {
    /// The textual form compared against the lexical form of the actual term.
    pub fn lexical(&self) -> String {
        match self {
            Self::Boolean(v) => v.to_string(),
            Self::Integer(v) => v.to_string(),
            Self::Unsigned(v) => v.to_string(),
            Self::Float(v) => float_lexical(*v),
            Self::String(v) => v.clone(),
        }
    }

    /// The value handed to the datatype casts.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Boolean(v) => Value::Boolean(*v),
            Self::Integer(v) => Value::from(*v),
            Self::Unsigned(v) => Value::from(*v),
            Self::Float(v) => {
                let lexical = float_lexical(*v);
                match BigDecimal::from_str(&lexical) {
                    Ok(decimal) => Value::Decimal(decimal),
                    Err(_) => Value::String(lexical),
                }
            }
            Self::String(v) => Value::String(v.clone()),
        }
    }
}

/// Integral values keep a `.0` fraction, the way `1.0` is written in the test file.
fn float_lexical(value: f64) -> String {
    let mut lexical = value.to_string();
    if value.is_finite() && !lexical.contains('.') {
        lexical.push_str(".0");
    }
    lexical
}

/// The RDF term kind a test author can state explicitly.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoldKind {
    Iri,
    Literal,
}

/// One expected cell.
///
/// Without an explicit kind, a value written `<...>` is an IRI and anything else a literal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldCell {
    pub value: GoldScalar,
    pub kind: Option<GoldKind>,
    pub datatype: Option<Datatype>,
}

impl GoldCell {
    pub fn new(value: impl Into<GoldScalar>) -> Self {
        Self {
            value: value.into(),
            kind: None,
            datatype: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: GoldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_datatype(mut self, datatype: Datatype) -> Self {
        self.datatype = Some(datatype);
        self
    }
}

impl From<&str> for GoldScalar {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<i64> for GoldScalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for GoldScalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for GoldScalar {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl fmt::Display for GoldCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            GoldScalar::String(v) => write!(f, "{v:?}")?,
            v => f.write_str(&v.lexical())?,
        }
        if let Some(datatype) = self.datatype {
            write!(f, "^^xsd:{datatype}")?;
        }
        Ok(())
    }
}

/// One expected row. `None` cells match anything.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "RawRow")]
pub struct GoldRow {
    cells: Vec<Option<GoldCell>>,
}

impl GoldRow {
    pub fn new(cells: Vec<Option<GoldCell>>) -> Self {
        Self { cells }
    }

    #[inline]
    pub fn cells(&self) -> &[Option<GoldCell>] {
        &self.cells
    }
}

impl FromIterator<Option<GoldCell>> for GoldRow {
    fn from_iter<I: IntoIterator<Item = Option<GoldCell>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for GoldRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match cell {
                Some(cell) => fmt::Display::fmt(cell, f)?,
                None => f.write_str("null")?,
            }
        }
        f.write_str("]")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRow {
    Cells(Vec<Option<RawCell>>),
    Wrapped { row: Vec<Option<RawCell>> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Scalar(GoldScalar),
    Column(ColumnCell),
    Term(RawTerm),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnCell {
    column: Option<RawTerm>,
}

#[derive(Deserialize)]
struct RawTerm {
    value: GoldScalar,
    #[serde(rename = "type")]
    kind: Option<GoldKind>,
    datatype: Option<String>,
}

impl TryFrom<RawTerm> for GoldCell {
    type Error = String;

    fn try_from(term: RawTerm) -> Result<Self, String> {
        let datatype = term
            .datatype
            .map(|d| Datatype::from_str(&d))
            .transpose()
            .map_err(|e| e.to_string())?;
        Ok(Self {
            value: term.value,
            kind: term.kind,
            datatype,
        })
    }
}

impl TryFrom<RawRow> for GoldRow {
    type Error = String;

    fn try_from(row: RawRow) -> Result<Self, String> {
        let (RawRow::Cells(cells) | RawRow::Wrapped { row: cells }) = row;
        cells
            .into_iter()
            .map(|cell| {
                Ok(match cell {
                    None | Some(RawCell::Column(ColumnCell { column: None })) => None,
                    Some(RawCell::Scalar(value)) => Some(GoldCell::new(value)),
                    Some(
                        RawCell::Column(ColumnCell { column: Some(term) }) | RawCell::Term(term),
                    ) => Some(term.try_into()?),
                })
            })
            .collect()
    }
}
