//! Repository for the `sample_sources` table.

use sqlx::PgPool;

use crate::models::reference::{CreateSampleSource, SampleSource};

/// Column list for `sample_sources` queries.
const COLUMNS: &str = "id, name, display_order, created_at, updated_at";

/// Provides access to sample sources.
pub struct SampleSourceRepo;

impl SampleSourceRepo {
    /// Insert a new sample source, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSampleSource,
    ) -> Result<SampleSource, sqlx::Error> {
        let query = format!(
            "INSERT INTO sample_sources (name, display_order) \
             VALUES ($1, COALESCE($2, 0)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SampleSource>(&query)
            .bind(&input.name)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Names of all sample sources, in display order.
    pub async fn list_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sample_sources ORDER BY display_order, name",
        )
        .fetch_all(pool)
        .await
    }
}
