//! Repository for the `tests` catalog.

use labimport_core::types::DbId;
use sqlx::PgPool;

use crate::models::reference::{CreateLabTest, LabTest};

/// Column list for `tests` queries.
const COLUMNS: &str = "id, test_name, is_active, created_at, updated_at";

/// Provides access to the laboratory test catalog.
pub struct LabTestRepo;

impl LabTestRepo {
    /// Insert a catalog test, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLabTest) -> Result<LabTest, sqlx::Error> {
        let query = format!(
            "INSERT INTO tests (test_name, is_active) \
             VALUES ($1, COALESCE($2, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LabTest>(&query)
            .bind(&input.test_name)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Names of active tests, as stored (not case-normalized).
    pub async fn list_active_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT test_name FROM tests WHERE is_active = true ORDER BY test_name",
        )
        .fetch_all(pool)
        .await
    }

    /// Activate or retire a test. Returns `None` if no row with `id` exists.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<LabTest>, sqlx::Error> {
        let query = format!(
            "UPDATE tests SET is_active = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LabTest>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }
}
