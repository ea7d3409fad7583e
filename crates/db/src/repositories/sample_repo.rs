//! Repository for persisted samples and their results.

use std::collections::HashMap;

use labimport_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::sample::{CreateSample, CreateSampleResult, Sample, SampleResult};

/// Column list for `samples` queries.
const COLUMNS: &str = "id, accession_number, health_center_id, sample_source_id, \
     patient_registration_number, collection_date, created_at, updated_at";

/// Unique constraint on `samples.accession_number`.
pub const UQ_ACCESSION_NUMBER: &str = "uq_samples_accession_number";

/// Provides inserts and lookups for samples.
pub struct SampleRepo;

impl SampleRepo {
    /// Insert a sample and all of its results in one transaction.
    ///
    /// Health center, sample source and tests are resolved by name. An
    /// unknown name (or a test retired since validation) leaves the foreign
    /// key NULL. The schema rejects that with a NOT NULL violation
    /// (SQLSTATE 23502) and nothing is written.
    pub async fn create(pool: &PgPool, input: &CreateSample) -> Result<Sample, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO samples \
                (accession_number, health_center_id, sample_source_id, \
                 patient_registration_number, collection_date) \
             VALUES ( \
                $1, \
                (SELECT id FROM health_centers WHERE name = $2), \
                (SELECT id FROM sample_sources WHERE name = $3), \
                $4, $5 \
             ) \
             RETURNING {COLUMNS}"
        );
        let sample = sqlx::query_as::<_, Sample>(&insert_query)
            .bind(&input.accession_number)
            .bind(&input.health_center_name)
            .bind(&input.sample_source_name)
            .bind(input.patient_registration_number)
            .bind(input.collection_date)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_results_inner(&mut tx, sample.id, &input.results).await?;

        tx.commit().await?;
        Ok(sample)
    }

    /// Insert results, resolving each test name against the active catalog
    /// with the same Unicode lower-case folding the validator applies. A
    /// name with no active match binds a NULL `test_id`, which the schema
    /// rejects.
    async fn insert_results_inner(
        tx: &mut Transaction<'_, Postgres>,
        sample_id: DbId,
        results: &[CreateSampleResult],
    ) -> Result<(), sqlx::Error> {
        let catalog: Vec<(DbId, String)> =
            sqlx::query_as("SELECT id, test_name FROM tests WHERE is_active = true ORDER BY id")
                .fetch_all(&mut **tx)
                .await?;
        let mut test_ids: HashMap<String, DbId> = HashMap::with_capacity(catalog.len());
        for (id, name) in catalog {
            test_ids.entry(name.to_lowercase()).or_insert(id);
        }

        for result in results {
            let test_id = test_ids.get(&result.test_name.to_lowercase()).copied();
            sqlx::query(
                "INSERT INTO sample_results (sample_id, test_id, result_value) \
                 VALUES ($1, $2, $3)",
            )
            .bind(sample_id)
            .bind(test_id)
            .bind(&result.result_value)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Find a sample by its accession number.
    pub async fn find_by_accession_number(
        pool: &PgPool,
        accession_number: &str,
    ) -> Result<Option<Sample>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM samples WHERE accession_number = $1");
        sqlx::query_as::<_, Sample>(&query)
            .bind(accession_number)
            .fetch_optional(pool)
            .await
    }

    /// List the results recorded for a sample, in insertion order.
    pub async fn list_results(
        pool: &PgPool,
        sample_id: DbId,
    ) -> Result<Vec<SampleResult>, sqlx::Error> {
        sqlx::query_as::<_, SampleResult>(
            "SELECT sr.id, sr.sample_id, sr.test_id, t.test_name, sr.result_value, sr.created_at \
             FROM sample_results sr \
             JOIN tests t ON t.id = sr.test_id \
             WHERE sr.sample_id = $1 \
             ORDER BY sr.id",
        )
        .bind(sample_id)
        .fetch_all(pool)
        .await
    }
}
