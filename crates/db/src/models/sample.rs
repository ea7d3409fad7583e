//! Persisted samples and their test results.

use chrono::NaiveDate;
use labimport_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `samples` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sample {
    pub id: DbId,
    pub accession_number: String,
    pub health_center_id: DbId,
    pub sample_source_id: DbId,
    pub patient_registration_number: i32,
    pub collection_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `sample_results` joined with the test name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SampleResult {
    pub id: DbId,
    pub sample_id: DbId,
    pub test_id: DbId,
    pub test_name: String,
    pub result_value: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a sample with its results in one transaction.
///
/// Health center, sample source and tests are referenced by name and
/// resolved inside the insert.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSample {
    pub accession_number: String,
    pub health_center_name: String,
    pub sample_source_name: String,
    pub patient_registration_number: i32,
    pub collection_date: NaiveDate,
    pub results: Vec<CreateSampleResult>,
}

/// One result of a [`CreateSample`]. The test is matched case-insensitively
/// against active catalog entries.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSampleResult {
    pub test_name: String,
    pub result_value: String,
}
