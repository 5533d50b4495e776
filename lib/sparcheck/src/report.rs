use crate::evaluator::BatteryReport;
use crate::results::{ResultFormat, StructuralError};
use crate::runner::TransportError;
use std::fmt;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// What happened to one query in one result format.
#[derive(Debug)]
pub enum QueryOutcome {
    /// Every check held.
    Passed(BatteryReport),
    /// At least one check did not hold.
    Failed(BatteryReport),
    /// The result could not be fetched.
    Transport(TransportError),
    /// The result was fetched but is not a valid result of its format.
    Structural(StructuralError),
}

impl QueryOutcome {
    #[inline]
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }
}

#[derive(Debug)]
pub struct QueryReport {
    pub name: String,
    pub kind: String,
    pub format: ResultFormat,
    pub outcome: QueryOutcome,
    pub date: OffsetDateTime,
}

impl fmt::Display for QueryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.outcome.passed() { "PASS" } else { "FAIL" };
        write!(f, "{status} {} ({}) [{}]", self.name, self.kind, self.format)?;
        if let Ok(date) = self.date.format(&Rfc3339) {
            write!(f, " at {date}")?;
        }
        writeln!(f)?;
        match &self.outcome {
            QueryOutcome::Passed(battery) | QueryOutcome::Failed(battery) => {
                fmt::Display::fmt(battery, f)
            }
            QueryOutcome::Transport(e) => writeln!(f, "  query execution failed: {e}"),
            QueryOutcome::Structural(e) => writeln!(f, "  invalid result: {e}"),
        }
    }
}

/// The reports of all queries of a test file, in execution order.
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub queries: Vec<QueryReport>,
}

impl SuiteReport {
    /// `true` if every query passed in every format.
    pub fn passed(&self) -> bool {
        self.queries.iter().all(|q| q.outcome.passed())
    }

    pub fn failed_count(&self) -> usize {
        self.queries.iter().filter(|q| !q.outcome.passed()).count()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for query in &self.queries {
            fmt::Display::fmt(query, f)?;
        }
        let failed = self.failed_count();
        if failed == 0 {
            writeln!(f, "all {} query runs passed", self.queries.len())
        } else {
            writeln!(f, "{failed} of {} query runs failed", self.queries.len())
        }
    }
}
