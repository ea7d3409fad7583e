//! Reference vocabularies (subcenters, sample sources, active tests) and the
//! per-validator cache that loads them from a backing store.
//!
//! A cache lives exactly as long as the validator that owns it. Each
//! vocabulary is fetched on first use and then served from memory. An empty
//! vocabulary counts as "not loaded yet" and is fetched again on the next
//! call, so a genuinely empty table is re-queried every time.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::{CoreError, StoreError};

pub const SUBCENTERS: &str = "subcenter";
pub const SAMPLE_SOURCES: &str = "sample source";
pub const TEST_NAMES: &str = "test name";

// ---------------------------------------------------------------------------
// Reference sets
// ---------------------------------------------------------------------------

/// A set of canonical tokens checked for exact membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    tokens: HashSet<String>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Tokens in alphabetical order, for display and autocomplete.
    pub fn sorted(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.iter().collect();
        tokens.sort_unstable();
        tokens
    }
}

impl FromIterator<String> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// Read-only view of all three vocabularies, handed to the rules.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSnapshot<'a> {
    pub subcenters: &'a ReferenceSet,
    pub sample_sources: &'a ReferenceSet,
    /// Lower-cased.
    pub test_names: &'a ReferenceSet,
}

// ---------------------------------------------------------------------------
// Backing store collaborators
// ---------------------------------------------------------------------------

/// Source of valid subcenter codes (the display name of every subcenter).
#[async_trait]
pub trait SubcenterStore: Send + Sync {
    async fn subcenter_names(&self) -> Result<Vec<String>, StoreError>;
}

/// Source of valid sample source names.
#[async_trait]
pub trait SampleSourceStore: Send + Sync {
    async fn sample_source_names(&self) -> Result<Vec<String>, StoreError>;
}

/// Catalog of laboratory tests. Only active tests are returned; the filter
/// is applied by the store.
#[async_trait]
pub trait TestCatalog: Send + Sync {
    async fn active_test_names(&self) -> Result<Vec<String>, StoreError>;
}

/// Everything the reference cache needs from its backing store.
pub trait ReferenceStore: SubcenterStore + SampleSourceStore + TestCatalog {}

impl<T> ReferenceStore for T where T: SubcenterStore + SampleSourceStore + TestCatalog {}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Lazily filled vocabularies for one import job.
pub struct ReferenceCache<S> {
    store: S,
    subcenters: ReferenceSet,
    sample_sources: ReferenceSet,
    test_names: ReferenceSet,
}

impl<S: ReferenceStore> ReferenceCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            subcenters: ReferenceSet::new(),
            sample_sources: ReferenceSet::new(),
            test_names: ReferenceSet::new(),
        }
    }

    /// Valid subcenter codes, matched exactly.
    pub async fn subcenter_codes(&mut self) -> Result<&ReferenceSet, CoreError> {
        if self.subcenters.is_empty() {
            let names = self
                .store
                .subcenter_names()
                .await
                .map_err(|source| reference_error(SUBCENTERS, source))?;
            self.subcenters = build_set(SUBCENTERS, names);
        }
        Ok(&self.subcenters)
    }

    /// Valid sample source names, matched exactly.
    pub async fn sample_source_names(&mut self) -> Result<&ReferenceSet, CoreError> {
        if self.sample_sources.is_empty() {
            let names = self
                .store
                .sample_source_names()
                .await
                .map_err(|source| reference_error(SAMPLE_SOURCES, source))?;
            self.sample_sources = build_set(SAMPLE_SOURCES, names);
        }
        Ok(&self.sample_sources)
    }

    /// Names of active tests, lower-cased.
    pub async fn active_test_names(&mut self) -> Result<&ReferenceSet, CoreError> {
        if self.test_names.is_empty() {
            let names = self
                .store
                .active_test_names()
                .await
                .map_err(|source| reference_error(TEST_NAMES, source))?;
            let lowered = names.into_iter().map(|name| name.to_lowercase()).collect();
            self.test_names = build_set(TEST_NAMES, lowered);
        }
        Ok(&self.test_names)
    }

    /// Make sure all three vocabularies are in memory and return a view of
    /// them.
    pub async fn ensure_loaded(&mut self) -> Result<ReferenceSnapshot<'_>, CoreError> {
        self.subcenter_codes().await?;
        self.sample_source_names().await?;
        self.active_test_names().await?;
        Ok(self.snapshot())
    }

    /// View of whatever is currently cached, without touching the store.
    pub fn snapshot(&self) -> ReferenceSnapshot<'_> {
        ReferenceSnapshot {
            subcenters: &self.subcenters,
            sample_sources: &self.sample_sources,
            test_names: &self.test_names,
        }
    }
}

fn reference_error(vocabulary: &'static str, source: StoreError) -> CoreError {
    tracing::error!(vocabulary, error = %source, "Reference data fetch failed");
    CoreError::ReferenceData { vocabulary, source }
}

fn build_set(vocabulary: &'static str, names: Vec<String>) -> ReferenceSet {
    let set: ReferenceSet = names.into_iter().collect();
    if set.is_empty() {
        tracing::warn!(vocabulary, "Reference store returned no entries, will fetch again");
    } else {
        tracing::debug!(vocabulary, count = set.len(), "Reference data loaded");
    }
    set
}
