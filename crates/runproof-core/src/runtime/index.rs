// crates/runproof-core/src/runtime/index.rs
// ============================================================================
// Module: RunProof Index Aggregator
// Description: Deterministic aggregation of pack manifests into one registry.
// Purpose: Rebuild the evidence index from a packs root in one pure pass.
// Dependencies: crate::{core, runtime}, serde_json
// ============================================================================

//! ## Overview
//! The aggregator scans a packs root for pack manifests, extracts each pack's
//! identity and creation timestamp, and writes one index document in the
//! stable `(created_at ascending, pack_id descending)` ordering. It reads,
//! sorts, and writes once per invocation; there is no process-wide registry
//! state, so repeated runs over an unchanged pack set are byte-identical.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::index::EvidenceIndex;
use crate::core::index::IndexError;
use crate::core::index::PackRecord;
use crate::core::manifest::DEFAULT_MANIFEST_FILE_NAME;
use crate::core::manifest::EvidenceManifest;
use crate::runtime::MAX_DOCUMENT_BYTES;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Index aggregation errors.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A filesystem operation failed.
    #[error("index io error at {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A pack manifest could not be parsed.
    #[error("failed to parse pack manifest {}: {message}", path.display())]
    Parse {
        /// Manifest path that failed.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },
    /// A pack manifest exceeds the in-memory size limit.
    #[error("pack manifest {} is {size} bytes (limit {limit})", path.display())]
    TooLarge {
        /// Manifest path that failed.
        path: PathBuf,
        /// Observed size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        limit: usize,
    },
    /// A pack manifest records no generation timestamp to register under.
    #[error("pack '{pack_id}' has no generated_at timestamp")]
    MissingCreatedAt {
        /// The pack identifier.
        pack_id: String,
    },
    /// A pack directory name is not valid UTF-8.
    #[error("pack directory name at {} is not valid UTF-8", path.display())]
    NonUtf8Name {
        /// Path with the unrepresentable name.
        path: PathBuf,
    },
    /// The aggregated index violates a structural invariant.
    #[error(transparent)]
    Index(#[from] IndexError),
}

// ============================================================================
// SECTION: Aggregator
// ============================================================================

/// Deterministic evidence index aggregator.
#[derive(Debug, Clone)]
pub struct IndexAggregator {
    /// Manifest file name expected at each pack root.
    pub manifest_name: String,
}

impl Default for IndexAggregator {
    fn default() -> Self {
        Self {
            manifest_name: DEFAULT_MANIFEST_FILE_NAME.to_string(),
        }
    }
}

impl IndexAggregator {
    /// Scans `packs_root` for pack manifests and builds the sorted index.
    ///
    /// Directories without a manifest are skipped (they are not packs); a
    /// pack whose manifest is unreadable, unparsable, or missing its
    /// `generated_at` is a hard error, never silently dropped from the
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError`] on read, parse, or invariant failures.
    pub fn scan(&self, packs_root: &Path) -> Result<EvidenceIndex, AggregateError> {
        let mut children = Vec::new();
        let reader = fs::read_dir(packs_root).map_err(|source| AggregateError::Io {
            path: packs_root.to_path_buf(),
            source,
        })?;
        for child in reader {
            let child = child.map_err(|source| AggregateError::Io {
                path: packs_root.to_path_buf(),
                source,
            })?;
            children.push(child.path());
        }
        children.sort();

        let mut records = Vec::new();
        for child in children {
            let metadata = fs::metadata(&child).map_err(|source| AggregateError::Io {
                path: child.clone(),
                source,
            })?;
            if !metadata.is_dir() {
                continue;
            }
            let manifest_path = child.join(&self.manifest_name);
            if !manifest_path.is_file() {
                continue;
            }
            let pack_id = child
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| AggregateError::NonUtf8Name {
                    path: child.clone(),
                })?
                .to_string();
            let manifest = read_pack_manifest(&manifest_path)?;
            let created_at =
                manifest.generated_at.ok_or_else(|| AggregateError::MissingCreatedAt {
                    pack_id: pack_id.clone(),
                })?;
            records.push(PackRecord {
                manifest_path: format!("{pack_id}/{}", self.manifest_name),
                pack_id,
                created_at,
            });
        }

        let index = EvidenceIndex::from_records(records);
        index.validate()?;
        Ok(index)
    }

    /// Rebuilds the index from `packs_root` and writes it to `out_index`.
    ///
    /// The written document is canonical JSON with a trailing newline, so
    /// repeated runs over an unchanged pack set are byte-identical.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError`] when scanning or writing fails.
    pub fn update_index(
        &self,
        packs_root: &Path,
        out_index: &Path,
    ) -> Result<EvidenceIndex, AggregateError> {
        let index = self.scan(packs_root)?;
        let mut bytes = serde_jcs::to_vec(&index).map_err(|err| AggregateError::Parse {
            path: out_index.to_path_buf(),
            message: err.to_string(),
        })?;
        bytes.push(b'\n');
        if let Some(parent) = out_index.parent() {
            fs::create_dir_all(parent).map_err(|source| AggregateError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(out_index, bytes).map_err(|source| AggregateError::Io {
            path: out_index.to_path_buf(),
            source,
        })?;
        Ok(index)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads and parses one pack manifest with the size limit applied.
fn read_pack_manifest(path: &Path) -> Result<EvidenceManifest, AggregateError> {
    let metadata = fs::metadata(path).map_err(|source| AggregateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > u64::try_from(MAX_DOCUMENT_BYTES).unwrap_or(u64::MAX) {
        return Err(AggregateError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: MAX_DOCUMENT_BYTES,
        });
    }
    let bytes = fs::read(path).map_err(|source| AggregateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|err| AggregateError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
