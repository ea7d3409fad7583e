//! Import row validation engine.
//!
//! Provides the row types, the reference vocabulary cache, the fixed rule
//! set with its pure evaluator, and the per-job [`validator::RowValidator`].

pub mod evaluator;
pub mod reference;
pub mod row;
pub mod rules;
pub mod validator;

pub use evaluator::evaluate_row;
pub use reference::{ReferenceCache, ReferenceSet, ReferenceSnapshot, ReferenceStore};
pub use row::{AcceptedRow, ImportRow, PersistOutcome, TestResultEntry, ValidationOutcome};
pub use validator::{PersistenceSink, RowValidator};
