//! Repository for the `health_centers` table.

use sqlx::PgPool;

use crate::models::reference::{CreateHealthCenter, HealthCenter};

/// Column list for `health_centers` queries.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides access to health centers (subcenters).
pub struct HealthCenterRepo;

impl HealthCenterRepo {
    /// Insert a new health center, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateHealthCenter,
    ) -> Result<HealthCenter, sqlx::Error> {
        let query = format!(
            "INSERT INTO health_centers (name, description) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HealthCenter>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List all health centers, ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<HealthCenter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM health_centers ORDER BY name");
        sqlx::query_as::<_, HealthCenter>(&query)
            .fetch_all(pool)
            .await
    }

    /// Names of all health centers. These are the valid subcenter codes.
    pub async fn list_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM health_centers ORDER BY name")
            .fetch_all(pool)
            .await
    }
}
