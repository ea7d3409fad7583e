//! Import row, test result entry and outcome types.


use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// True when the value is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// One row of a result import file: a single patient sample.
///
/// Every field is raw text straight from the ingestion layer. Nothing is
/// checked on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    pub subcenter_code: String,
    pub patient_registration_number: String,
    pub sample_source: String,
    pub accession_number: String,
    /// Expected as `dd-mm-yyyy`.
    pub sample_date: String,
    #[serde(default)]
    pub test_results: Vec<TestResultEntry>,
}

/// A named test and its (possibly missing) result value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResultEntry {
    pub test_name: String,
    #[serde(default)]
    pub result: Option<String>,
}

impl TestResultEntry {
    pub fn new(test_name: impl Into<String>, result: Option<&str>) -> Self {
        Self {
            test_name: test_name.into(),
            result: result.map(str::to_string),
        }
    }

    /// No result value was supplied.
    pub fn is_empty(&self) -> bool {
        self.result.as_deref().map_or(true, is_blank)
    }

    /// The entry carries a result that can be recorded against a test.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && !is_blank(&self.test_name)
    }
}

/// A row that passed every validation rule.
///
/// Only the evaluator constructs this, so holding one is proof that the row
/// was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AcceptedRow(ImportRow);

impl AcceptedRow {
    pub(crate) fn new(row: ImportRow) -> Self {
        Self(row)
    }

    pub fn row(&self) -> &ImportRow {
        &self.0
    }

    pub fn into_inner(self) -> ImportRow {
        self.0
    }
}

/// Result of validating one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted { row: AcceptedRow },
    /// `errors` holds every triggered rule message, each ending in `\n`.
    Rejected { row: ImportRow, errors: String },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn row(&self) -> &ImportRow {
        match self {
            Self::Accepted { row } => row.row(),
            Self::Rejected { row, .. } => row,
        }
    }

    /// The concatenated error text, if the row was rejected.
    pub fn error_text(&self) -> Option<&str> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected { errors, .. } => Some(errors),
        }
    }

    /// Individual rule messages in rule order.
    pub fn messages(&self) -> Vec<&str> {
        self.error_text()
            .map(|text| text.lines().collect())
            .unwrap_or_default()
    }
}

/// Result of handing an accepted row to the persistence sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistOutcome {
    Saved { row: ImportRow, sample_id: DbId },
    /// The store refused the row (e.g. duplicate accession number).
    Failed { row: ImportRow, error: String },
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}
