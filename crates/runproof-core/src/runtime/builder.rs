// crates/runproof-core/src/runtime/builder.rs
// ============================================================================
// Module: RunProof Manifest Builder
// Description: Deterministic directory walking and manifest construction.
// Purpose: Capture a directory tree as a sorted, hash-indexed manifest.
// Dependencies: crate::core, std::fs
// ============================================================================

//! ## Overview
//! The manifest builder walks a root directory in sorted order, streams a
//! SHA-256 over every eligible file, and emits entries sorted by relative
//! path. The walk is read-only; a file disappearing mid-walk is a hard
//! error, because a manifest claiming coverage must reflect what it actually
//! hashed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::hash_file;
use crate::core::index::DEFAULT_INDEX_FILE_NAME;
use crate::core::manifest::DEFAULT_MANIFEST_FILE_NAME;
use crate::core::manifest::DEFAULT_REPORT_FILE_NAME;
use crate::core::manifest::EvidenceManifest;
use crate::core::manifest::MANIFEST_SCHEMA_VERSION;
use crate::core::manifest::ManifestEntry;
use crate::core::manifest::ManifestError;
use crate::core::manifest::PACK_ROOT_MARKER;
use crate::core::manifest::SchemaVersion;
use crate::core::sidecar::sidecar_file_name;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Report-like extensions indexed by default when used as a report indexer.
pub const DEFAULT_SAFELIST_EXTENSIONS: &[&str] = &["csv", "json", "md", "txt"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Manifest construction errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A filesystem read failed during the walk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The root is not a directory.
    #[error("manifest root {} is not a directory", path.display())]
    InvalidRoot {
        /// The rejected root path.
        path: PathBuf,
    },
    /// A file name is not valid UTF-8 and cannot be recorded.
    #[error("file name at {} is not valid UTF-8", path.display())]
    NonUtf8Name {
        /// Path with the unrepresentable name.
        path: PathBuf,
    },
    /// The finished manifest violates a structural invariant.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Deterministic manifest builder over a directory tree.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    /// Schema tag written into the manifest.
    pub schema_version: SchemaVersion,
    /// Extensions indexed when present; `None` indexes every file.
    pub safelist_extensions: Option<BTreeSet<String>>,
    /// Exact file names skipped anywhere in the tree (the manifest's own
    /// outputs, to avoid self-reference cycles).
    pub exclude_names: BTreeSet<String>,
    /// Optional research run date recorded in the manifest.
    pub run_date: Option<String>,
    /// Optional generation timestamp recorded in the manifest.
    pub generated_at: Option<String>,
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        let safelist = DEFAULT_SAFELIST_EXTENSIONS.iter().map(ToString::to_string).collect();
        let exclude_names = [
            DEFAULT_MANIFEST_FILE_NAME.to_string(),
            sidecar_file_name(DEFAULT_MANIFEST_FILE_NAME),
            DEFAULT_REPORT_FILE_NAME.to_string(),
            DEFAULT_INDEX_FILE_NAME.to_string(),
        ]
        .into_iter()
        .collect();
        Self {
            schema_version: SchemaVersion::new(MANIFEST_SCHEMA_VERSION),
            safelist_extensions: Some(safelist),
            exclude_names,
            run_date: None,
            generated_at: None,
        }
    }
}

impl ManifestBuilder {
    /// Disables the extension safelist so every file is indexed.
    #[must_use]
    pub fn allow_all_files(mut self) -> Self {
        self.safelist_extensions = None;
        self
    }

    /// Sets the research run date recorded in the manifest.
    #[must_use]
    pub fn with_run_date(mut self, run_date: impl Into<String>) -> Self {
        self.run_date = Some(run_date.into());
        self
    }

    /// Sets the generation timestamp recorded in the manifest.
    #[must_use]
    pub fn with_generated_at(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = Some(generated_at.into());
        self
    }

    /// Builds a manifest for the directory tree rooted at `root`.
    ///
    /// The walk is read-only and deterministic: directory entries are visited
    /// in sorted order and the finished entry list is sorted by relative
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the root is not a directory, any read
    /// fails (including a file disappearing mid-walk), a file name is not
    /// UTF-8, or the finished manifest violates a structural invariant.
    pub fn build(&self, root: &Path) -> Result<EvidenceManifest, BuildError> {
        let metadata = fs::metadata(root).map_err(|source| BuildError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(BuildError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }

        let mut entries = Vec::new();
        self.walk(root, root, &mut entries)?;
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        let manifest = EvidenceManifest {
            schema_version: self.schema_version.clone(),
            base_dir: PACK_ROOT_MARKER.to_string(),
            run_date: self.run_date.clone(),
            generated_at: self.generated_at.clone(),
            entries,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Walks one directory level, recursing into subdirectories.
    fn walk(
        &self,
        root: &Path,
        dir: &Path,
        entries: &mut Vec<ManifestEntry>,
    ) -> Result<(), BuildError> {
        let mut children = Vec::new();
        let reader = fs::read_dir(dir).map_err(|source| BuildError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        for child in reader {
            let child = child.map_err(|source| BuildError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            children.push(child.path());
        }
        children.sort();

        for path in children {
            let metadata = fs::metadata(&path).map_err(|source| BuildError::Io {
                path: path.clone(),
                source,
            })?;
            if metadata.is_dir() {
                self.walk(root, &path, entries)?;
                continue;
            }
            if !metadata.is_file() {
                continue;
            }
            let name = file_name_utf8(&path)?;
            if !self.is_eligible(name) {
                continue;
            }
            let (bytes, digest) =
                hash_file(DEFAULT_HASH_ALGORITHM, &path).map_err(|source| BuildError::Io {
                    path: path.clone(),
                    source,
                })?;
            entries.push(ManifestEntry {
                path: relative_path(root, &path)?,
                bytes,
                sha256: digest.to_sha256_hex(),
            });
        }
        Ok(())
    }

    /// Applies the exclusion list and extension safelist to a file name.
    fn is_eligible(&self, name: &str) -> bool {
        if self.exclude_names.contains(name) {
            return false;
        }
        match &self.safelist_extensions {
            None => true,
            Some(safelist) => name
                .rsplit_once('.')
                .is_some_and(|(stem, extension)| !stem.is_empty() && safelist.contains(extension)),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a file's UTF-8 name or fails closed.
fn file_name_utf8(path: &Path) -> Result<&str, BuildError> {
    path.file_name().and_then(|name| name.to_str()).ok_or_else(|| BuildError::NonUtf8Name {
        path: path.to_path_buf(),
    })
}

/// Renders a path relative to `root` with forward-slash separators.
fn relative_path(root: &Path, path: &Path) -> Result<String, BuildError> {
    let relative = path.strip_prefix(root).map_err(|_| BuildError::NonUtf8Name {
        path: path.to_path_buf(),
    })?;
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| BuildError::NonUtf8Name {
            path: path.to_path_buf(),
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
