#![cfg(test)]
#![expect(clippy::panic_in_result_fn)]

use anyhow::Result;
use sparcheck::{
    Check, CheckEvaluator, CheckFailure, GoldCell, GoldRow, QueryExecutor, QueryOutcome,
    QueryResults, ResultFormat, SuiteRunner, TestSuite, TransportError,
};
use std::fs;
use std::path::PathBuf;

fn data(name: &str) -> Result<String> {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "data", name]
        .iter()
        .collect();
    Ok(fs::read_to_string(path)?)
}

/// Serves the scientists fixtures, and a decimal written `00.1` for any other query.
struct Fixtures {
    legacy: String,
    standard: String,
}

impl Fixtures {
    fn load() -> Result<Self> {
        Ok(Self {
            legacy: data("scientists-legacy.json")?,
            standard: data("scientists-standard.json")?,
        })
    }
}

impl QueryExecutor for Fixtures {
    fn execute(&self, sparql: &str, format: ResultFormat) -> Result<String, TransportError> {
        let scientists = sparql.contains("<Scientist>");
        Ok(match (format, scientists) {
            (ResultFormat::Legacy, true) => self.legacy.clone(),
            (ResultFormat::Standard, true) => self.standard.clone(),
            (ResultFormat::Legacy, false) => r#"{"query": "", "status": "OK", "resultsize": 1, "selected": ["?v"], "res": [["\"00.1\"^^<http://www.w3.org/2001/XMLSchema#decimal>"]]}"#.into(),
            (ResultFormat::Standard, false) => r#"{"head": {"vars": ["v"]}, "results": {"bindings": [{"v": {"type": "literal", "value": "00.1", "datatype": "http://www.w3.org/2001/XMLSchema#decimal"}}]}}"#.into(),
        })
    }
}

#[test]
fn scientists_suite() -> Result<()> {
    let suite: TestSuite = serde_yaml::from_str(&data("scientists.yaml")?)?;
    let report = SuiteRunner::new(Fixtures::load()?).run(&suite);
    assert_eq!(report.queries.len(), 4);

    for query in &report.queries[..2] {
        assert_eq!(query.name, "scientists-by-name");
        assert!(query.outcome.passed(), "{query}");
    }
    for query in &report.queries[2..] {
        assert_eq!(query.name, "lexical-form");
        let QueryOutcome::Failed(battery) = &query.outcome else {
            panic!("unexpected outcome {query}");
        };
        let failures = battery.failures().collect::<Vec<_>>();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "res");
        assert!(matches!(failures[0].1, CheckFailure::RowMismatch { row: 0, .. }));
    }
    assert!(!report.passed());
    Ok(())
}

#[test]
fn res_implies_contains_row() -> Result<()> {
    let suite: TestSuite = serde_yaml::from_str(&data("scientists.yaml")?)?;
    let Some(Check::Res(rows)) = suite.queries[0]
        .checks
        .iter()
        .find(|c| matches!(c, Check::Res(_)))
    else {
        panic!("no res check");
    };
    for (format, payload) in [
        (ResultFormat::Legacy, data("scientists-legacy.json")?),
        (ResultFormat::Standard, data("scientists-standard.json")?),
    ] {
        let results = QueryResults::from_json(format, &payload)?;
        let mut checks = vec![
            Check::RowDataTypes(vec!["string".into(), "string".into(), "int".into()]),
            Check::Res(rows.clone()),
        ];
        checks.extend(rows.iter().cloned().map(Check::ContainsRow));
        let report = CheckEvaluator::new().evaluate(&results, &checks);
        assert!(report.passed(), "{report}");
    }
    Ok(())
}

#[test]
fn scenario_integer_and_string() -> Result<()> {
    let results = QueryResults::from_json(
        ResultFormat::Legacy,
        r#"{"query": "", "status": "OK", "resultsize": 1, "selected": ["?n", "?s"], "res": [["1", "\"hello\""]]}"#,
    )?;
    let checks = [
        Check::RowDataTypes(vec!["integer".into(), "string".into()]),
        Check::Res(vec![GoldRow::new(vec![
            Some(GoldCell::new(1_i64)),
            Some(GoldCell::new("hello")),
        ])]),
    ];
    assert!(CheckEvaluator::new().evaluate(&results, &checks).passed());
    Ok(())
}

#[test]
fn lexical_form_is_checked_for_untyped_cells() -> Result<()> {
    let payloads = [
        (
            ResultFormat::Legacy,
            r#"{"query": "", "status": "OK", "resultsize": 1, "selected": ["?v"], "res": [["00.1"]]}"#,
        ),
        (
            ResultFormat::Standard,
            r#"{"head": {"vars": ["v"]}, "results": {"bindings": [{"v": {"type": "literal", "value": "00.1"}}]}}"#,
        ),
    ];
    let checks = [
        Check::RowDataTypes(vec!["decimal".into()]),
        Check::Res(vec![GoldRow::new(vec![Some(GoldCell::new("0.1"))])]),
    ];
    for (format, payload) in payloads {
        let results = QueryResults::from_json(format, payload)?;
        let report = CheckEvaluator::new().evaluate(&results, &checks);
        assert!(!report.passed(), "{report}");
        assert!(matches!(
            report.failures().next(),
            Some(("res", CheckFailure::RowMismatch { row: 0, .. }))
        ));
    }
    Ok(())
}

#[test]
fn structural_errors_abort_the_battery() -> Result<()> {
    struct Failing;

    impl QueryExecutor for Failing {
        fn execute(&self, _sparql: &str, format: ResultFormat) -> Result<String, TransportError> {
            Ok(match format {
                ResultFormat::Legacy => r#"{"query": "", "status": "ERROR", "resultsize": 0, "selected": [], "res": []}"#.into(),
                ResultFormat::Standard => "not json".into(),
            })
        }
    }

    let suite: TestSuite = serde_yaml::from_str(&data("scientists.yaml")?)?;
    let report = SuiteRunner::new(Failing).run(&suite);
    assert!(
        report
            .queries
            .iter()
            .all(|q| matches!(q.outcome, QueryOutcome::Structural(_)))
    );
    Ok(())
}
