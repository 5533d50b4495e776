//! Comparison of expected rows with the rows returned by the engine.
//!
//! Literal comparison follows RDF term equality: the values must be equal once cast to the
//! column datatype *and* the lexical forms must be identical (`"0.1"` and `"00.1"` are different literals).

use crate::gold::{GoldCell, GoldKind, GoldRow, GoldScalar};
use crate::results::{ActualTerm, Row, TermKind};
use std::fmt;
use tracing::debug;
use xsdcast::{CastMode, Datatype, UnknownDatatypeError, Value, cast_or_validate};

/// Candidate datatypes of each projected column.
///
/// Filled at most once per battery, by the first successful `row_data_types` check.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ColumnTypes {
    columns: Vec<Vec<Datatype>>,
}

impl ColumnTypes {
    /// Parses a pipe separated candidate list like `int|string`.
    pub fn parse_column(column: &str) -> Result<Vec<Datatype>, UnknownDatatypeError> {
        column.split('|').map(|name| name.trim().parse()).collect()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The candidates of a column, `None` if none were declared.
    pub fn column(&self, index: usize) -> Option<&[Datatype]> {
        self.columns
            .get(index)
            .map(Vec::as_slice)
            .filter(|c| !c.is_empty())
    }

    /// Stores the candidates unless some are already present.
    ///
    /// Returns `true` if the table has been written.
    pub fn populate(&mut self, columns: Vec<Vec<Datatype>>) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.columns = columns;
        true
    }
}

/// Why an expected row does not match an actual one.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("column {column} ({variable}): {reason}")]
pub struct RowMismatch {
    pub column: usize,
    pub variable: String,
    pub reason: MismatchReason,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum MismatchReason {
    #[error("there is no such projected variable")]
    NoVariable,
    #[error("expected {0} but the variable is unbound")]
    Unbound(String),
    #[error("the expected IRI {0} is not enclosed in <>")]
    MalformedIri(String),
    #[error("expected a {expected} but got a {actual}")]
    KindMismatch { expected: TermKind, actual: TermKind },
    #[error("expected {expected} but got {actual}")]
    ValueMismatch { expected: String, actual: String },
}

/// Checks that `actual` matches every non-`None` cell of `gold`, column by column.
pub fn match_row(gold: &GoldRow, actual: Row<'_>, types: &ColumnTypes) -> Result<(), RowMismatch> {
    for (column, cell) in gold.cells().iter().enumerate() {
        let Some(cell) = cell else {
            continue;
        };
        let Some(variable) = actual.variables().get(column) else {
            return Err(RowMismatch {
                column,
                variable: String::new(),
                reason: MismatchReason::NoVariable,
            });
        };
        match_cell(cell, column, actual.cell_at_index(column), types).map_err(|reason| {
            RowMismatch {
                column,
                variable: variable.clone(),
                reason,
            }
        })?;
    }
    Ok(())
}

/// The index of the first row of `actual` matching `gold`.
pub fn match_any<'a>(
    gold: &GoldRow,
    actual: impl IntoIterator<Item = Row<'a>>,
    types: &ColumnTypes,
) -> Option<usize> {
    actual
        .into_iter()
        .position(|row| match_row(gold, row, types).is_ok())
}

fn match_cell(
    cell: &GoldCell,
    column: usize,
    term: Option<ActualTerm<'_>>,
    types: &ColumnTypes,
) -> Result<(), MismatchReason> {
    let (kind, lexical) = gold_term(cell)?;
    let Some(term) = term else {
        return Err(MismatchReason::Unbound(cell.to_string()));
    };
    if term.kind != kind {
        return Err(MismatchReason::KindMismatch {
            expected: kind,
            actual: term.kind,
        });
    }
    let matches = if kind == TermKind::Iri {
        lexical == term.value
    } else {
        match candidates(cell, column, term, types) {
            Some(candidates) => match_literal(cell, &lexical, term, &candidates),
            None => lexical == term.value,
        }
    };
    if matches {
        Ok(())
    } else {
        Err(MismatchReason::ValueMismatch {
            expected: cell.to_string(),
            actual: Described(term).to_string(),
        })
    }
}

/// The expected kind and lexical value: `<...>` denotes an IRI whose brackets are removed.
fn gold_term(cell: &GoldCell) -> Result<(TermKind, String), MismatchReason> {
    let lexical = cell.value.lexical();
    let bracketed = matches!(cell.value, GoldScalar::String(_)) && lexical.starts_with('<');
    match cell.kind {
        Some(GoldKind::Literal) => Ok((TermKind::Literal, lexical)),
        Some(GoldKind::Iri) => strip_brackets(lexical),
        None if bracketed => strip_brackets(lexical),
        None => Ok((TermKind::Literal, lexical)),
    }
}

fn strip_brackets(lexical: String) -> Result<(TermKind, String), MismatchReason> {
    match lexical.strip_prefix('<').and_then(|l| l.strip_suffix('>')) {
        Some(iri) => Ok((TermKind::Iri, iri.to_owned())),
        None => Err(MismatchReason::MalformedIri(lexical)),
    }
}

/// The datatypes to try, in order.
///
/// `None` means that no known datatype applies and the lexical forms are compared directly.
fn candidates(
    cell: &GoldCell,
    column: usize,
    term: ActualTerm<'_>,
    types: &ColumnTypes,
) -> Option<Vec<Datatype>> {
    if let Some(datatype) = cell.datatype {
        return Some(vec![datatype]);
    }
    if let Some(declared) = types.column(column) {
        return Some(declared.to_vec());
    }
    Some(vec![Datatype::from_local_name(term.datatype?)?])
}

fn match_literal(
    cell: &GoldCell,
    lexical: &str,
    term: ActualTerm<'_>,
    candidates: &[Datatype],
) -> bool {
    let mut cast_succeeded = false;
    for &candidate in candidates {
        let expected = match cast_or_validate(cell.value.to_value(), candidate, CastMode::Cast) {
            Ok(expected) => expected,
            Err(error) => {
                debug!(%candidate, %error, "expected value rejected by candidate datatype");
                continue;
            }
        };
        cast_succeeded = true;
        if let Some(actual_datatype) = term.datatype {
            if actual_datatype != candidate.local_name() {
                debug!(%candidate, actual_datatype, "candidate datatype differs from the actual one");
                continue;
            }
        }
        let actual = match cast_or_validate(Value::from(term.value), candidate, CastMode::Cast) {
            Ok(actual) => actual,
            Err(error) => {
                debug!(%candidate, %error, "actual value rejected by candidate datatype");
                continue;
            }
        };
        if expected == actual && lexical == term.value {
            return true;
        }
    }
    !cast_succeeded && lexical == term.value
}

struct Described<'a>(ActualTerm<'a>);

impl fmt::Display for Described<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.kind {
            TermKind::Iri => write!(f, "<{}>", self.0.value),
            TermKind::BlankNode => f.write_str(self.0.value),
            TermKind::Literal => {
                write!(f, "{:?}", self.0.value)?;
                if let Some(datatype) = self.0.datatype {
                    write!(f, "^^xsd:{datatype}")?;
                }
                Ok(())
            }
        }
    }
}
