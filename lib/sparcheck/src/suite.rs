use crate::check::{Check, deserialize_checks};
use serde::Deserialize;

/// A test file: a list of queries, each with its checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestSuite {
    pub queries: Vec<QueryTest>,
}

/// One query of a test file.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryTest {
    /// A human readable name.
    #[serde(rename = "query")]
    pub name: String,
    /// A free form category like `no-text` or `text`.
    #[serde(rename = "type", default)]
    pub kind: String,
    pub sparql: String,
    #[serde(default, deserialize_with = "deserialize_checks")]
    pub checks: Vec<Check>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Direction, OrderSpec};
    use crate::gold::{GoldCell, GoldKind, GoldRow};
    use xsdcast::Datatype;

    const SUITE: &str = r"
queries:
  - query: scientists
    type: no-text
    sparql: |
      SELECT ?x ?n WHERE { ?x <is-a> <Scientist> . ?x <name> ?n } ORDER BY ?n
    checks:
      - num_rows: 2
      - num_cols: 2
        selected: ['?x', '?n']
      - row_data_types: ['string', 'string']
      - contains_row: ['<Albert_Einstein>', null]
      - res:
          - row:
              - column: {value: '<Albert_Einstein>', type: iri}
              - column: {value: 'Albert Einstein', datatype: string}
          - ['<Niels_Bohr>', 'Niels Bohr']
      - order_string: {dir: asc, var: '?n'}
      - frobnicate: 1
  - query: empty
    type: no-text
    sparql: ASK {}
";

    #[test]
    fn parse_suite() {
        let suite: TestSuite = serde_yaml::from_str(SUITE).unwrap();
        assert_eq!(suite.queries.len(), 2);
        let query = &suite.queries[0];
        assert_eq!(query.name, "scientists");
        assert_eq!(query.kind, "no-text");
        assert!(query.sparql.starts_with("SELECT"));
        let names = query.checks.iter().map(Check::name).collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "num_rows",
                "num_cols",
                "selected",
                "row_data_types",
                "contains_row",
                "res",
                "order_string",
                "frobnicate"
            ]
        );
        assert_eq!(
            query.checks[5],
            Check::Res(vec![
                GoldRow::new(vec![
                    Some(GoldCell::new("<Albert_Einstein>").with_kind(GoldKind::Iri)),
                    Some(GoldCell::new("Albert Einstein").with_datatype(Datatype::String)),
                ]),
                GoldRow::new(vec![
                    Some(GoldCell::new("<Niels_Bohr>")),
                    Some(GoldCell::new("Niels Bohr")),
                ]),
            ])
        );
        assert_eq!(
            query.checks[6],
            Check::OrderString(OrderSpec {
                dir: Direction::Ascending,
                var: "?n".into()
            })
        );
        assert!(matches!(query.checks[7], Check::Invalid { .. }));
        assert!(suite.queries[1].checks.is_empty());
    }

    #[test]
    fn missing_sparql_is_an_error() {
        serde_yaml::from_str::<TestSuite>("queries: [{query: q, type: t}]").unwrap_err();
    }
}
