//! Reference vocabulary tables: health centers (subcenters), sample
//! sources and the laboratory test catalog.

use labimport_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `health_centers` table. `name` is the subcenter code
/// used in import files.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HealthCenter {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `sample_sources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SampleSource {
    pub id: DbId,
    pub name: String,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `tests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LabTest {
    pub id: DbId,
    pub test_name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a health center.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHealthCenter {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for creating a sample source.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSampleSource {
    pub name: String,
    pub display_order: Option<i32>,
}

/// DTO for creating a catalog test. `is_active` defaults to `true`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLabTest {
    pub test_name: String,
    pub is_active: Option<bool>,
}
