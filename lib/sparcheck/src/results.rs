//! Normalization of the two JSON result encodings returned by the engine.
//!
//! Both encodings are turned into a [`QueryResults`]: the projected variables and a list of rows.
//! Each row implements [`RowView`] so that the matcher is written once for both encodings.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// The JSON encoding requested from the engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ResultFormat {
    /// The engine specific tabular encoding (`qlever_json_export`).
    Legacy,
    /// [SPARQL 1.1 Query Results JSON Format](https://www.w3.org/TR/sparql11-results-json/) (`sparql_json_export`).
    Standard,
}

impl ResultFormat {
    /// The value of the `action` request parameter selecting this encoding.
    #[inline]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Legacy => "qlever_json_export",
            Self::Standard => "sparql_json_export",
        }
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy",
            Self::Standard => "standard",
        })
    }
}

/// The RDF term kinds a result cell can hold.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TermKind {
    Iri,
    Literal,
    BlankNode,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Iri => "iri",
            Self::Literal => "literal",
            Self::BlankNode => "bnode",
        })
    }
}

/// One cell of the engine output, independent of the encoding.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ActualTerm<'a> {
    pub kind: TermKind,
    /// The lexical value: IRI without brackets, literal without quotes nor annotations.
    pub value: &'a str,
    /// The local name of the literal datatype (`int` for `xsd:int`), if any.
    pub datatype: Option<&'a str>,
}

/// A result is missing a required field or has an unexpected shape.
///
/// It aborts all the checks of the query.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum StructuralError {
    #[error("the result is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("the result is missing the \"{0}\" field")]
    MissingKey(&'static str),
    #[error("the \"{key}\" field should be {expected}")]
    UnexpectedShape {
        key: &'static str,
        expected: &'static str,
    },
    #[error("the result \"status\" is {0} and not \"OK\"")]
    Status(String),
    #[error("unsupported binding type \"{0}\"")]
    UnknownTermType(String),
}

/// A row of a result, in either encoding.
pub trait RowView: fmt::Debug + fmt::Display {
    /// The cell of the projected variable at `index` in `variables`.
    fn cell_at_index(&self, variables: &[String], index: usize) -> Option<ActualTerm<'_>>;

    /// The cell of a variable, looked up by name.
    ///
    /// A name like `TEXT(?x)` falls back to `?x` when not found.
    fn cell_at(&self, variables: &[String], variable: &str) -> Option<ActualTerm<'_>>;

    /// The number of cells the engine returned for this row.
    fn width(&self) -> usize;
}

/// A row of the legacy encoding: one optional serialized term per projected variable.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LegacyRow {
    cells: Vec<Option<String>>,
}

impl LegacyRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }
}

impl RowView for LegacyRow {
    fn cell_at_index(&self, _variables: &[String], index: usize) -> Option<ActualTerm<'_>> {
        self.cells.get(index)?.as_deref().map(parse_legacy_cell)
    }

    fn cell_at(&self, variables: &[String], variable: &str) -> Option<ActualTerm<'_>> {
        let index = position(variables, variable)
            .or_else(|| position(variables, unwrap_call(variable)?))?;
        self.cell_at_index(variables, index)
    }

    fn width(&self) -> usize {
        self.cells.len()
    }
}

impl fmt::Display for LegacyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::from(self.cells.clone()))
    }
}

/// A term of the standard encoding.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Binding {
    pub kind: TermKind,
    pub value: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

/// A row of the standard encoding: unbound variables have no entry.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct StandardRow {
    bindings: BTreeMap<String, Binding>,
}

impl StandardRow {
    pub fn new(bindings: BTreeMap<String, Binding>) -> Self {
        Self { bindings }
    }

    fn lookup(&self, variable: &str) -> Option<&Binding> {
        self.bindings.get(strip_sigil(variable))
    }
}

impl RowView for StandardRow {
    fn cell_at_index(&self, variables: &[String], index: usize) -> Option<ActualTerm<'_>> {
        self.cell_at(variables, variables.get(index)?)
    }

    fn cell_at(&self, _variables: &[String], variable: &str) -> Option<ActualTerm<'_>> {
        let binding = self
            .lookup(variable)
            .or_else(|| self.lookup(unwrap_call(variable)?))?;
        Some(ActualTerm {
            kind: binding.kind,
            value: &binding.value,
            datatype: binding.datatype.as_deref().map(datatype_tag),
        })
    }

    fn width(&self) -> usize {
        self.bindings.len()
    }
}

impl fmt::Display for StandardRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut object = Map::new();
        for (variable, binding) in &self.bindings {
            let mut term = Map::new();
            term.insert("type".into(), binding.kind.to_string().into());
            term.insert("value".into(), binding.value.clone().into());
            if let Some(datatype) = &binding.datatype {
                term.insert("datatype".into(), datatype.clone().into());
            }
            if let Some(language) = &binding.language {
                term.insert("xml:lang".into(), language.clone().into());
            }
            object.insert(variable.clone(), term.into());
        }
        write!(f, "{}", Value::Object(object))
    }
}

/// A row together with the projected variables of its result.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    variables: &'a [String],
    view: &'a dyn RowView,
}

impl<'a> Row<'a> {
    #[inline]
    pub fn variables(&self) -> &'a [String] {
        self.variables
    }

    #[inline]
    pub fn cell_at_index(&self, index: usize) -> Option<ActualTerm<'a>> {
        self.view.cell_at_index(self.variables, index)
    }

    #[inline]
    pub fn cell_at(&self, variable: &str) -> Option<ActualTerm<'a>> {
        self.view.cell_at(self.variables, variable)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.view.width()
    }
}

impl fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.view, f)
    }
}

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.view, f)
    }
}

type BoxedRow = Box<dyn RowView + Send + Sync>;

/// A structurally valid query result in one of the two encodings.
#[derive(Debug)]
pub struct QueryResults {
    format: ResultFormat,
    variables: Vec<String>,
    rows: Vec<BoxedRow>,
    warnings: Option<Vec<String>>,
}

impl QueryResults {
    /// Parses and validates a JSON payload in the given encoding.
    pub fn from_json(format: ResultFormat, payload: &str) -> Result<Self, StructuralError> {
        let value = serde_json::from_str(payload)
            .map_err(|e| StructuralError::InvalidJson(e.to_string()))?;
        Self::from_value(format, value)
    }

    /// Validates an already decoded JSON value in the given encoding.
    pub fn from_value(format: ResultFormat, value: Value) -> Result<Self, StructuralError> {
        let Value::Object(mut object) = value else {
            return Err(StructuralError::UnexpectedShape {
                key: "<root>",
                expected: "an object",
            });
        };
        match format {
            ResultFormat::Legacy => Self::from_legacy(&mut object),
            ResultFormat::Standard => Self::from_standard(&mut object),
        }
    }

    fn from_legacy(object: &mut Map<String, Value>) -> Result<Self, StructuralError> {
        for key in ["query", "status", "resultsize", "selected", "res"] {
            if !object.contains_key(key) {
                return Err(StructuralError::MissingKey(key));
            }
        }
        match object.get("status") {
            Some(Value::String(status)) if status == "OK" => (),
            Some(status) => return Err(StructuralError::Status(status.to_string())),
            None => return Err(StructuralError::MissingKey("status")),
        }
        let variables = string_list(object.remove("selected"), "selected")?;
        let Some(Value::Array(res)) = object.remove("res") else {
            return Err(StructuralError::UnexpectedShape {
                key: "res",
                expected: "a list of rows",
            });
        };
        let rows = res
            .into_iter()
            .map(|row| {
                let Value::Array(cells) = row else {
                    return Err(StructuralError::UnexpectedShape {
                        key: "res",
                        expected: "a list of rows",
                    });
                };
                let cells = cells
                    .into_iter()
                    .map(|cell| match cell {
                        Value::Null => Ok(None),
                        Value::String(cell) => Ok(Some(cell)),
                        Value::Number(cell) => Ok(Some(cell.to_string())),
                        Value::Bool(cell) => Ok(Some(cell.to_string())),
                        Value::Array(_) | Value::Object(_) => {
                            Err(StructuralError::UnexpectedShape {
                                key: "res",
                                expected: "rows of strings",
                            })
                        }
                    })
                    .collect::<Result<_, _>>()?;
                let row: BoxedRow = Box::new(LegacyRow::new(cells));
                Ok(row)
            })
            .collect::<Result<_, _>>()?;
        let warnings = match object.remove("warnings") {
            None | Some(Value::Null) => Vec::new(),
            warnings => string_list(warnings, "warnings")?,
        };
        Ok(Self {
            format: ResultFormat::Legacy,
            variables,
            rows,
            warnings: Some(warnings),
        })
    }

    fn from_standard(object: &mut Map<String, Value>) -> Result<Self, StructuralError> {
        let Some(mut head) = object.remove("head") else {
            return Err(StructuralError::MissingKey("head"));
        };
        let Some(mut results) = object.remove("results") else {
            return Err(StructuralError::MissingKey("results"));
        };
        let Some(vars) = head.get_mut("vars").map(Value::take) else {
            return Err(StructuralError::MissingKey("head.vars"));
        };
        let variables = string_list(Some(vars), "head.vars")?;
        let Some(bindings) = results.get_mut("bindings").map(Value::take) else {
            return Err(StructuralError::MissingKey("results.bindings"));
        };
        let Value::Array(bindings) = bindings else {
            return Err(StructuralError::UnexpectedShape {
                key: "results.bindings",
                expected: "a list",
            });
        };
        let rows = bindings
            .into_iter()
            .map(|solution| {
                let Value::Object(solution) = solution else {
                    return Err(StructuralError::UnexpectedShape {
                        key: "results.bindings",
                        expected: "a list of objects",
                    });
                };
                let bindings = solution
                    .into_iter()
                    .map(|(variable, term)| Ok((variable, parse_binding(term)?)))
                    .collect::<Result<_, _>>()?;
                let row: BoxedRow = Box::new(StandardRow::new(bindings));
                Ok(row)
            })
            .collect::<Result<_, _>>()?;
        let warnings = match object.remove("warnings") {
            None | Some(Value::Null) => None,
            warnings => Some(string_list(warnings, "warnings")?),
        };
        Ok(Self {
            format: ResultFormat::Standard,
            variables,
            rows,
            warnings,
        })
    }

    #[inline]
    pub fn format(&self) -> ResultFormat {
        self.format
    }

    /// The projected variables, in order.
    ///
    /// The legacy encoding keeps the `?` sigil, the standard one does not.
    #[inline]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        let view = self.rows.get(index)?;
        Some(Row {
            variables: &self.variables,
            view: view.as_ref(),
        })
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> {
        self.rows.iter().map(|view| Row {
            variables: &self.variables,
            view: view.as_ref(),
        })
    }

    /// The warnings returned by the engine.
    ///
    /// `None` if the encoding has no warnings channel.
    #[inline]
    pub fn warnings(&self) -> Option<&[String]> {
        self.warnings.as_deref()
    }
}

fn string_list(value: Option<Value>, key: &'static str) -> Result<Vec<String>, StructuralError> {
    let shape_error = || StructuralError::UnexpectedShape {
        key,
        expected: "a list of strings",
    };
    let Some(Value::Array(values)) = value else {
        return Err(shape_error());
    };
    values
        .into_iter()
        .map(|value| match value {
            Value::String(value) => Ok(value),
            _ => Err(shape_error()),
        })
        .collect()
}

fn parse_binding(term: Value) -> Result<Binding, StructuralError> {
    let Value::Object(mut term) = term else {
        return Err(StructuralError::UnexpectedShape {
            key: "results.bindings",
            expected: "a map from variables to terms",
        });
    };
    let Some(Value::String(kind)) = term.remove("type") else {
        return Err(StructuralError::MissingKey("type"));
    };
    let kind = match kind.as_str() {
        "uri" | "iri" => TermKind::Iri,
        "literal" | "typed-literal" => TermKind::Literal,
        "bnode" => TermKind::BlankNode,
        _ => return Err(StructuralError::UnknownTermType(kind)),
    };
    let Some(Value::String(value)) = term.remove("value") else {
        return Err(StructuralError::MissingKey("value"));
    };
    let optional = |v: Option<Value>| match v {
        Some(Value::String(v)) => Some(v),
        _ => None,
    };
    Ok(Binding {
        kind,
        value,
        datatype: optional(term.remove("datatype")),
        language: optional(term.remove("xml:lang")),
    })
}

/// Splits a legacy cell like `"1"^^<http://www.w3.org/2001/XMLSchema#int>`.
fn parse_legacy_cell(raw: &str) -> ActualTerm<'_> {
    if let Some(iri) = raw.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        return ActualTerm {
            kind: TermKind::Iri,
            value: iri,
            datatype: None,
        };
    }
    if raw.starts_with("_:") {
        return ActualTerm {
            kind: TermKind::BlankNode,
            value: raw,
            datatype: None,
        };
    }
    if let Some(end) = raw.rfind('"').filter(|end| raw.starts_with('"') && *end > 0) {
        return ActualTerm {
            kind: TermKind::Literal,
            value: &raw[1..end],
            datatype: raw[end + 1..].strip_prefix("^^").map(datatype_tag),
        };
    }
    ActualTerm {
        kind: TermKind::Literal,
        value: raw,
        datatype: None,
    }
}

/// The fragment of a datatype IRI: `int` for `<http://www.w3.org/2001/XMLSchema#int>`.
pub fn datatype_tag(iri: &str) -> &str {
    let iri = iri.strip_prefix('<').unwrap_or(iri);
    let iri = iri.strip_suffix('>').unwrap_or(iri);
    iri.rsplit_once('#').map_or(iri, |(_, fragment)| fragment)
}

/// Removes the leading `?` or `$` of a variable name.
pub fn strip_sigil(variable: &str) -> &str {
    variable
        .strip_prefix('?')
        .or_else(|| variable.strip_prefix('$'))
        .unwrap_or(variable)
}

/// The inner argument of a function call like `TEXT(?x)`.
pub fn unwrap_call(name: &str) -> Option<&str> {
    let (function, rest) = name.split_once('(')?;
    let inner = rest.strip_suffix(')')?;
    if function.is_empty() || !function.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some(inner.trim())
}

fn position(variables: &[String], variable: &str) -> Option<usize> {
    variables
        .iter()
        .position(|v| v == variable)
        .or_else(|| {
            variables
                .iter()
                .position(|v| strip_sigil(v) == strip_sigil(variable))
        })
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"{
        "query": "SELECT ?x ?n TEXT(?t) WHERE {}",
        "status": "OK",
        "resultsize": 2,
        "selected": ["?x", "?n", "TEXT(?t)"],
        "res": [
            ["<http://example.com/a>", "\"1\"^^<http://www.w3.org/2001/XMLSchema#int>", "\"hello\"@en"],
            ["_:b0", "2", null]
        ],
        "warnings": ["something odd"]
    }"#;

    const STANDARD: &str = r#"{
        "head": {"vars": ["x", "n", "t"]},
        "results": {"bindings": [
            {
                "x": {"type": "uri", "value": "http://example.com/a"},
                "n": {"type": "literal", "value": "1", "datatype": "http://www.w3.org/2001/XMLSchema#int"},
                "t": {"type": "literal", "value": "hello", "xml:lang": "en"}
            },
            {"x": {"type": "bnode", "value": "b0"}}
        ]}
    }"#;

    #[test]
    fn legacy_cells() -> Result<(), StructuralError> {
        let results = QueryResults::from_json(ResultFormat::Legacy, LEGACY)?;
        assert_eq!(results.variables(), ["?x", "?n", "TEXT(?t)"]);
        assert_eq!(results.len(), 2);
        assert_eq!(results.warnings(), Some(["something odd".to_owned()].as_slice()));
        let row = results.row(0).unwrap();
        assert_eq!(
            row.cell_at_index(0),
            Some(ActualTerm {
                kind: TermKind::Iri,
                value: "http://example.com/a",
                datatype: None
            })
        );
        assert_eq!(
            row.cell_at("?n"),
            Some(ActualTerm {
                kind: TermKind::Literal,
                value: "1",
                datatype: Some("int")
            })
        );
        assert_eq!(row.cell_at("TEXT(?t)").map(|t| t.value), Some("hello"));
        assert_eq!(row.cell_at("n").map(|t| t.value), Some("1"));
        let row = results.row(1).unwrap();
        assert_eq!(row.cell_at_index(0).map(|t| t.kind), Some(TermKind::BlankNode));
        assert_eq!(row.cell_at_index(1).map(|t| t.value), Some("2"));
        assert_eq!(row.cell_at_index(2), None);
        assert_eq!(row.width(), 3);
        Ok(())
    }

    #[test]
    fn standard_bindings() -> Result<(), StructuralError> {
        let results = QueryResults::from_json(ResultFormat::Standard, STANDARD)?;
        assert_eq!(results.variables(), ["x", "n", "t"]);
        assert_eq!(results.warnings(), None);
        let row = results.row(0).unwrap();
        assert_eq!(row.cell_at("?n").and_then(|t| t.datatype), Some("int"));
        assert_eq!(row.cell_at("TEXT(?t)").map(|t| t.value), Some("hello"));
        assert_eq!(row.cell_at_index(0).map(|t| t.kind), Some(TermKind::Iri));
        let row = results.row(1).unwrap();
        assert_eq!(row.width(), 1);
        assert_eq!(row.cell_at("n"), None);
        Ok(())
    }

    #[test]
    fn missing_keys() {
        assert_eq!(
            QueryResults::from_json(
                ResultFormat::Legacy,
                r#"{"query": "", "status": "OK", "selected": [], "res": []}"#
            )
            .unwrap_err(),
            StructuralError::MissingKey("resultsize")
        );
        assert_eq!(
            QueryResults::from_json(
                ResultFormat::Standard,
                r#"{"head": {}, "results": {"bindings": []}}"#
            )
            .unwrap_err(),
            StructuralError::MissingKey("head.vars")
        );
        assert_eq!(
            QueryResults::from_json(ResultFormat::Standard, r#"{"head": {"vars": []}}"#)
                .unwrap_err(),
            StructuralError::MissingKey("results")
        );
        assert!(matches!(
            QueryResults::from_json(ResultFormat::Standard, "<html>"),
            Err(StructuralError::InvalidJson(_))
        ));
    }

    #[test]
    fn legacy_status_must_be_ok() {
        assert!(matches!(
            QueryResults::from_json(
                ResultFormat::Legacy,
                r#"{"query": "", "status": "ERROR", "resultsize": 0, "selected": [], "res": []}"#
            ),
            Err(StructuralError::Status(_))
        ));
    }

    #[test]
    fn unknown_binding_type() {
        assert_eq!(
            QueryResults::from_json(
                ResultFormat::Standard,
                r#"{"head": {"vars": ["x"]}, "results": {"bindings": [{"x": {"type": "triple", "value": ""}}]}}"#
            )
            .unwrap_err(),
            StructuralError::UnknownTermType("triple".into())
        );
    }

    #[test]
    fn names() {
        assert_eq!(strip_sigil("?x"), "x");
        assert_eq!(strip_sigil("$x"), "x");
        assert_eq!(strip_sigil("x"), "x");
        assert_eq!(unwrap_call("TEXT(?t)"), Some("?t"));
        assert_eq!(unwrap_call("?t"), None);
        assert_eq!(unwrap_call("(?t)"), None);
        assert_eq!(datatype_tag("<http://www.w3.org/2001/XMLSchema#decimal>"), "decimal");
        assert_eq!(datatype_tag("http://example.com/dt"), "http://example.com/dt");
    }
}
