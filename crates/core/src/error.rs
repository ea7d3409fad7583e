/// Infrastructure failures surfaced by the import core.
///
/// Per-row validation problems are never reported through this type; they
/// travel as text inside [`crate::validation::row::ValidationOutcome::Rejected`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Failed to load {vocabulary} reference data: {source}")]
    ReferenceData {
        vocabulary: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Persistence failed: {0}")]
    Persistence(#[source] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Opaque failure reported by a storage collaborator.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct StoreError(Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    /// Wrap any error raised by a backing store.
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(err))
    }

    /// Build a store error from a plain message.
    pub fn message(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self(msg.into())
    }
}
