//! PostgreSQL implementations of the core collaborator traits.

use async_trait::async_trait;
use labimport_core::error::StoreError;
use labimport_core::validation::reference::{SampleSourceStore, SubcenterStore, TestCatalog};
use labimport_core::validation::rules::parse_sample_date;
use labimport_core::validation::{ImportRow, PersistOutcome, PersistenceSink};
use sqlx::postgres::PgDatabaseError;
use sqlx::PgPool;

use crate::models::sample::{CreateSample, CreateSampleResult};
use crate::repositories::sample_repo::UQ_ACCESSION_NUMBER;
use crate::repositories::{HealthCenterRepo, LabTestRepo, SampleRepo, SampleSourceRepo};

// ---------------------------------------------------------------------------
// Reference store
// ---------------------------------------------------------------------------

/// Serves all three reference vocabularies from the database.
#[derive(Debug, Clone)]
pub struct PgReferenceStore {
    pool: PgPool,
}

impl PgReferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubcenterStore for PgReferenceStore {
    async fn subcenter_names(&self) -> Result<Vec<String>, StoreError> {
        HealthCenterRepo::list_names(&self.pool)
            .await
            .map_err(StoreError::new)
    }
}

#[async_trait]
impl SampleSourceStore for PgReferenceStore {
    async fn sample_source_names(&self) -> Result<Vec<String>, StoreError> {
        SampleSourceRepo::list_names(&self.pool)
            .await
            .map_err(StoreError::new)
    }
}

#[async_trait]
impl TestCatalog for PgReferenceStore {
    async fn active_test_names(&self) -> Result<Vec<String>, StoreError> {
        LabTestRepo::list_active_names(&self.pool)
            .await
            .map_err(StoreError::new)
    }
}

// ---------------------------------------------------------------------------
// Persistence sink
// ---------------------------------------------------------------------------

/// Writes accepted rows to `samples` and `sample_results`.
#[derive(Debug, Clone)]
pub struct PgSampleSink {
    pool: PgPool,
}

impl PgSampleSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersistenceSink for PgSampleSink {
    async fn persist(&self, row: ImportRow) -> Result<PersistOutcome, StoreError> {
        let input = match new_sample(&row) {
            Ok(input) => input,
            Err(error) => return Ok(PersistOutcome::Failed { row, error }),
        };

        match SampleRepo::create(&self.pool, &input).await {
            Ok(sample) => Ok(PersistOutcome::Saved {
                row,
                sample_id: sample.id,
            }),
            Err(err) if is_unique_violation(&err, UQ_ACCESSION_NUMBER) => {
                Ok(PersistOutcome::Failed {
                    error: format!(
                        "Sample with accession number {} already exists.",
                        row.accession_number
                    ),
                    row,
                })
            }
            Err(err) => match unresolved_reference(&err) {
                Some(column) => Ok(PersistOutcome::Failed {
                    error: reference_gone_message(column, &row),
                    row,
                }),
                None => {
                    tracing::error!(error = %err, "Failed to persist sample");
                    Err(StoreError::new(err))
                }
            },
        }
    }
}

/// Build the insert DTO from an accepted row. Entries without a result are
/// not recorded.
fn new_sample(row: &ImportRow) -> Result<CreateSample, String> {
    let patient_registration_number = row
        .patient_registration_number
        .parse::<i32>()
        .map_err(|_| "Registration number should be a number.".to_string())?;
    let collection_date = parse_sample_date(&row.sample_date)
        .ok_or_else(|| "Sample date is not a valid dd-mm-yyyy date.".to_string())?;

    let results = row
        .test_results
        .iter()
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            entry.result.as_ref().map(|value| CreateSampleResult {
                test_name: entry.test_name.clone(),
                result_value: value.clone(),
            })
        })
        .collect();

    Ok(CreateSample {
        accession_number: row.accession_number.clone(),
        health_center_name: row.subcenter_code.clone(),
        sample_source_name: row.sample_source.clone(),
        patient_registration_number,
        collection_date,
        results,
    })
}

/// PostgreSQL unique violation (SQLSTATE 23505) on the named constraint.
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Foreign-key columns that are NULL when a referenced name no longer
/// resolves at insert time.
const REFERENCE_COLUMNS: [&str; 3] = ["health_center_id", "sample_source_id", "test_id"];

/// Column of a PostgreSQL NOT NULL violation (SQLSTATE 23502) on one of the
/// [`REFERENCE_COLUMNS`].
fn unresolved_reference(err: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if db_err.code().as_deref() != Some("23502") {
        return None;
    }
    let column = db_err.try_downcast_ref::<PgDatabaseError>()?.column()?;
    REFERENCE_COLUMNS.into_iter().find(|known| *known == column)
}

fn reference_gone_message(column: &str, row: &ImportRow) -> String {
    match column {
        "health_center_id" => format!("Subcenter {} no longer exists.", row.subcenter_code),
        "sample_source_id" => format!("Sample source {} no longer exists.", row.sample_source),
        _ => "A test in this row is no longer active.".to_string(),
    }
}
