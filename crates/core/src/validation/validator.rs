//! Row validator for one import job.
//!
//! Owns the reference cache for the job and the persistence sink that
//! accepted rows are handed to. All cache-filling operations take
//! `&mut self`, so a validator cannot be shared between concurrent callers.

use async_trait::async_trait;

use super::evaluator::evaluate_row;
use super::reference::{ReferenceCache, ReferenceSet, ReferenceStore};
use super::row::{AcceptedRow, ImportRow, PersistOutcome, ValidationOutcome};
use crate::error::{CoreError, StoreError};

/// Storage collaborator that records accepted rows.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn persist(&self, row: ImportRow) -> Result<PersistOutcome, StoreError>;
}

pub struct RowValidator<S, P> {
    cache: ReferenceCache<S>,
    sink: P,
}

impl<S, P> RowValidator<S, P>
where
    S: ReferenceStore,
    P: PersistenceSink,
{
    /// Create a validator with an empty cache. Nothing is fetched until
    /// the first call that needs reference data.
    pub fn new(store: S, sink: P) -> Self {
        Self {
            cache: ReferenceCache::new(store),
            sink,
        }
    }

    /// Validate one row.
    ///
    /// Rule violations come back as [`ValidationOutcome::Rejected`]; `Err`
    /// means the reference data could not be loaded and the import should
    /// stop.
    pub async fn validate(&mut self, row: ImportRow) -> Result<ValidationOutcome, CoreError> {
        let refs = self.cache.ensure_loaded().await?;
        let outcome = evaluate_row(row, &refs);

        if let ValidationOutcome::Rejected { row, errors } = &outcome {
            tracing::debug!(
                accession_number = %row.accession_number,
                violations = errors.lines().count(),
                "Import row rejected"
            );
        }
        Ok(outcome)
    }

    /// Hand an accepted row to the persistence sink.
    pub async fn persist(&self, row: AcceptedRow) -> Result<PersistOutcome, CoreError> {
        let outcome = self
            .sink
            .persist(row.into_inner())
            .await
            .map_err(CoreError::Persistence)?;

        match &outcome {
            PersistOutcome::Saved { row, sample_id } => tracing::debug!(
                accession_number = %row.accession_number,
                sample_id,
                "Import row persisted"
            ),
            PersistOutcome::Failed { row, error } => tracing::warn!(
                accession_number = %row.accession_number,
                error = %error,
                "Import row refused by store"
            ),
        }
        Ok(outcome)
    }

    /// Known active test names (lower-cased), loading them if needed.
    pub async fn test_names(&mut self) -> Result<&ReferenceSet, CoreError> {
        self.cache.active_test_names().await
    }
}
