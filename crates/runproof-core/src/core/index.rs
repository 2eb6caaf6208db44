// crates/runproof-core/src/core/index.rs
// ============================================================================
// Module: RunProof Evidence Index
// Description: Registry of evidence packs with a stable ordering.
// Purpose: Provide a deterministic, rebuildable multi-pack index document.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! The evidence index aggregates many packs into one registry document.
//! Records are ordered by `(created_at ascending, pack_id descending)` so
//! repeated aggregation over an unchanged pack set is byte-identical.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::manifest::SchemaVersion;

// ============================================================================
// SECTION: Schema Constants
// ============================================================================

/// Schema tag written into every evidence index.
pub const INDEX_SCHEMA_VERSION: &str = "runproof.index.v1";

/// Default file name for aggregated evidence indexes.
pub const DEFAULT_INDEX_FILE_NAME: &str = "evidence_index.json";

// ============================================================================
// SECTION: Index Types
// ============================================================================

/// One pack registered in the evidence index.
///
/// # Invariants
/// - `manifest_path` is relative to the scanned packs root.
/// - `created_at` is an RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRecord {
    /// Pack identifier (the pack's directory name).
    pub pack_id: String,
    /// Pack creation timestamp copied from the pack manifest.
    pub created_at: String,
    /// Packs-root-relative path to the pack manifest.
    pub manifest_path: String,
}

/// Registry of evidence packs.
///
/// # Invariants
/// - `count` always equals `packs.len()`.
/// - `packs` are sorted by `(created_at ascending, pack_id descending)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceIndex {
    /// Index schema tag.
    pub schema_version: SchemaVersion,
    /// Number of registered packs.
    pub count: u64,
    /// Sorted pack records.
    pub packs: Vec<PackRecord>,
}

impl EvidenceIndex {
    /// Builds an index from unordered records, applying the stable ordering.
    #[must_use]
    pub fn from_records(mut records: Vec<PackRecord>) -> Self {
        records.sort_by(pack_ordering);
        let count = u64::try_from(records.len()).unwrap_or(u64::MAX);
        Self {
            schema_version: SchemaVersion::new(INDEX_SCHEMA_VERSION),
            count,
            packs: records,
        }
    }

    /// Validates the index's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] on a count mismatch, duplicate or unsorted
    /// packs, empty identifiers, or malformed timestamps.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.count != u64::try_from(self.packs.len()).unwrap_or(u64::MAX) {
            return Err(IndexError::CountMismatch {
                count: self.count,
                actual: self.packs.len(),
            });
        }
        for record in &self.packs {
            if record.pack_id.is_empty() {
                return Err(IndexError::EmptyPackId);
            }
            if OffsetDateTime::parse(&record.created_at, &Rfc3339).is_err() {
                return Err(IndexError::InvalidCreatedAt {
                    pack_id: record.pack_id.clone(),
                    value: record.created_at.clone(),
                });
            }
        }
        for window in self.packs.windows(2) {
            match pack_ordering(&window[0], &window[1]) {
                Ordering::Less => {}
                Ordering::Equal => {
                    return Err(IndexError::DuplicatePack {
                        pack_id: window[1].pack_id.clone(),
                    });
                }
                Ordering::Greater => {
                    return Err(IndexError::UnsortedPacks {
                        pack_id: window[1].pack_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Stable index ordering: `created_at` ascending, `pack_id` descending.
fn pack_ordering(a: &PackRecord, b: &PackRecord) -> Ordering {
    a.created_at.cmp(&b.created_at).then_with(|| b.pack_id.cmp(&a.pack_id))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Structural evidence index errors.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The recorded count disagrees with the pack list length.
    #[error("index count {count} disagrees with {actual} pack records")]
    CountMismatch {
        /// Recorded count.
        count: u64,
        /// Actual number of pack records.
        actual: usize,
    },
    /// A pack identifier is empty.
    #[error("index contains an empty pack_id")]
    EmptyPackId,
    /// A creation timestamp is not RFC 3339.
    #[error("pack '{pack_id}' has invalid created_at '{value}'")]
    InvalidCreatedAt {
        /// The pack identifier.
        pack_id: String,
        /// The rejected timestamp value.
        value: String,
    },
    /// Two records describe the same pack.
    #[error("index contains duplicate pack '{pack_id}'")]
    DuplicatePack {
        /// The duplicated pack identifier.
        pack_id: String,
    },
    /// Records are not in the stable index ordering.
    #[error("index records are not sorted at pack '{pack_id}'")]
    UnsortedPacks {
        /// The first out-of-order pack identifier.
        pack_id: String,
    },
}
