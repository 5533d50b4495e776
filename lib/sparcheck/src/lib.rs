#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod check;
mod collation;
mod evaluator;
mod gold;
mod matcher;
mod report;
mod results;
mod runner;
mod suite;

pub use crate::check::{Check, CheckKind, Direction, OrderSpec};
pub use crate::collation::{CollationKey, compare as collate};
pub use crate::evaluator::{
    BatteryContext, BatteryReport, CheckEvaluator, CheckFailure, CheckReport, evaluate_check,
};
pub use crate::gold::{GoldCell, GoldKind, GoldRow, GoldScalar};
pub use crate::matcher::{ColumnTypes, MismatchReason, RowMismatch, match_any, match_row};
pub use crate::report::{QueryOutcome, QueryReport, SuiteReport};
pub use crate::results::{
    ActualTerm, Binding, LegacyRow, QueryResults, ResultFormat, Row, RowView, StandardRow,
    StructuralError, TermKind, datatype_tag, strip_sigil, unwrap_call,
};
pub use crate::runner::{QueryExecutor, SuiteRunner, TransportError};
pub use crate::suite::{QueryTest, TestSuite};
