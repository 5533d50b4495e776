use crate::evaluator::CheckEvaluator;
use crate::report::{QueryOutcome, QueryReport, SuiteReport};
use crate::results::{QueryResults, ResultFormat};
use crate::suite::{QueryTest, TestSuite};
use std::io;
use time::OffsetDateTime;
use tracing::{error, info, warn};

/// A failure to get a result from the engine.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("the endpoint replied with status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Something able to run a SPARQL query and return its serialized result.
pub trait QueryExecutor {
    fn execute(&self, sparql: &str, format: ResultFormat) -> Result<String, TransportError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(&self, sparql: &str, format: ResultFormat) -> Result<String, TransportError> {
        (**self).execute(sparql, format)
    }
}

/// Runs the queries of a [`TestSuite`] and evaluates their checks.
///
/// Each query is executed once per result format and each run gets its own battery context.
pub struct SuiteRunner<E> {
    executor: E,
    evaluator: CheckEvaluator,
    formats: Vec<ResultFormat>,
}

impl<E: QueryExecutor> SuiteRunner<E> {
    /// A runner checking both the legacy and the standard formats.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            evaluator: CheckEvaluator::new(),
            formats: vec![ResultFormat::Legacy, ResultFormat::Standard],
        }
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: CheckEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    #[must_use]
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = ResultFormat>) -> Self {
        self.formats = formats.into_iter().collect();
        self
    }

    pub fn run(&self, suite: &TestSuite) -> SuiteReport {
        SuiteReport {
            queries: suite
                .queries
                .iter()
                .flat_map(|query| self.formats.iter().map(|format| self.run_query(query, *format)))
                .collect(),
        }
    }

    /// Executes one query in one format and evaluates its checks.
    pub fn run_query(&self, query: &QueryTest, format: ResultFormat) -> QueryReport {
        info!(query = %query.name, kind = %query.kind, %format, "running query");
        let date = OffsetDateTime::now_utc();
        let outcome = match self.executor.execute(&query.sparql, format) {
            Err(e) => {
                error!(query = %query.name, %format, error = %e, "query execution failed");
                QueryOutcome::Transport(e)
            }
            Ok(payload) => match QueryResults::from_json(format, &payload) {
                Err(e) => {
                    error!(query = %query.name, %format, error = %e, "invalid query result");
                    QueryOutcome::Structural(e)
                }
                Ok(results) => {
                    let battery = self.evaluator.evaluate(&results, &query.checks);
                    if battery.passed() {
                        QueryOutcome::Passed(battery)
                    } else {
                        for (check, failure) in battery.failures() {
                            warn!(query = %query.name, %format, check, %failure, "check failed");
                        }
                        QueryOutcome::Failed(battery)
                    }
                }
            },
        };
        QueryReport {
            name: query.name.clone(),
            kind: query.kind.clone(),
            format,
            outcome,
            date,
        }
    }
}
