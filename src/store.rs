//! In-memory session collection of normalized records.
//!
//! The store is the source of truth for filtering and export. A load
//! replaces the whole collection; iteration order always matches load
//! order, and display-time sorting is a presentation concern applied to a
//! copy, never here.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::record::NormalizedEntry;

/// Errors that can occur on store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the requested sequence id exists.
    #[error("no record with id {sequence_id}")]
    NotFound {
        /// The requested sequence id.
        sequence_id: u64,
    },

    /// Raw payload serialization failed during export.
    #[error("failed to serialize export: {source}")]
    Serialize {
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered collection of records for the current session.
///
/// Generic over the record variant; both [`crate::record::PocRecord`] and
/// [`crate::record::ReportRecord`] collections share this behavior.
#[derive(Debug)]
pub struct RecordStore<R: NormalizedEntry> {
    records: Vec<R>,
}

impl<R: NormalizedEntry> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: NormalizedEntry> RecordStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Replaces the entire collection with freshly normalized records.
    ///
    /// Any previously derived filter view is invalidated by this call;
    /// there is no partial update or merge.
    pub fn load(&mut self, records: Vec<R>) {
        debug!(records = records.len(), "replacing record collection");
        self.records = records;
    }

    /// Returns the full collection in load order.
    #[must_use]
    pub fn all(&self) -> &[R] {
        &self.records
    }

    /// Number of records currently loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no records are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record with the given sequence id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has that id.
    pub fn get(&self, sequence_id: u64) -> Result<&R, StoreError> {
        self.records
            .iter()
            .find(|record| record.sequence_id() == sequence_id)
            .ok_or(StoreError::NotFound { sequence_id })
    }

    /// Returns records matching a free-text query, preserving load order.
    ///
    /// Matching is case-insensitive substring search across all
    /// displayable fields. An empty query means "no filter" and returns
    /// every record. The store itself is never mutated.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&R> {
        let query_lower = query.to_lowercase();
        self.records
            .iter()
            .filter(|record| record.matches(&query_lower))
            .collect()
    }

    /// Serializes all raw payloads as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] on serialization failure.
    pub fn export_all(&self) -> Result<String, StoreError> {
        let view: Vec<&R> = self.records.iter().collect();
        Self::export_entries(&view)
    }

    /// Serializes a derived view (e.g. a filter result) as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] on serialization failure.
    pub fn export_entries(entries: &[&R]) -> Result<String, StoreError> {
        let raw: Vec<&Value> = entries.iter().map(|record| record.raw()).collect();
        serde_json::to_string_pretty(&raw).map_err(|source| StoreError::Serialize { source })
    }

    /// Serializes one record's raw payload as a bare pretty-printed object.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id or
    /// [`StoreError::Serialize`] on serialization failure.
    pub fn export_one(&self, sequence_id: u64) -> Result<String, StoreError> {
        let record = self.get(sequence_id)?;
        serde_json::to_string_pretty(record.raw())
            .map_err(|source| StoreError::Serialize { source })
    }
}
