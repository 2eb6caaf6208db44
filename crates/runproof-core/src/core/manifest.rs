// crates/runproof-core/src/core/manifest.rs
// ============================================================================
// Module: RunProof Evidence Manifest
// Description: Manifest and validation report schemas with integrity metadata.
// Purpose: Provide the canonical index of evidence files for verification.
// Dependencies: crate::core::hashing, serde, time
// ============================================================================

//! ## Overview
//! An evidence manifest indexes a directory tree as sorted `(path, bytes,
//! sha256)` entries. Validators recompute every recorded hash against disk;
//! nothing in a manifest is trusted without recomputation. Manifests store
//! only tree-relative paths so evidence packs stay relocatable across
//! machines.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::Date;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::core::hashing::Sha256Hex;

// ============================================================================
// SECTION: Schema Constants
// ============================================================================

/// Schema tag written into every evidence manifest.
pub const MANIFEST_SCHEMA_VERSION: &str = "runproof.manifest.v1";

/// Schema tag written into every validation report.
pub const VALIDATION_REPORT_SCHEMA_VERSION: &str = "runproof.validation-report.v1";

/// Base directory marker meaning "the directory containing this manifest".
pub const PACK_ROOT_MARKER: &str = ".";

/// Default file name for manifests written into evidence packs.
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "manifest.json";

/// Default file name for validation reports written next to manifests.
pub const DEFAULT_REPORT_FILE_NAME: &str = "validation_report.json";

/// Maximum length of a single relative path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;

/// Maximum total length of a relative path.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Schema Version
// ============================================================================

/// Schema version tag for RunProof documents.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(pub String);

impl SchemaVersion {
    /// Creates a schema version from a tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// SECTION: Manifest Types
// ============================================================================

/// Hash entry for one evidence file.
///
/// # Invariants
/// - `path` is tree-relative, forward-slash separated, never absolute.
/// - `bytes` and `sha256` describe the exact on-disk content at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Tree-relative path of the evidence file.
    pub path: String,
    /// Exact file size in bytes as captured.
    pub bytes: u64,
    /// SHA-256 digest of the raw file content.
    pub sha256: Sha256Hex,
}

/// Evidence manifest describing one directory tree.
///
/// # Invariants
/// - `base_dir` is relative (or the [`PACK_ROOT_MARKER`]), never absolute.
/// - `entries` are sorted by path and unique by path.
///
/// `entries` is the authoritative field name; `files` is accepted on read as
/// a deprecated alias for manifests produced by the pipeline's earlier
/// tooling. The same applies to `base_dir` and its `root` alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceManifest {
    /// Manifest schema tag.
    pub schema_version: SchemaVersion,
    /// Base directory the entry paths are relative to.
    #[serde(alias = "root")]
    pub base_dir: String,
    /// Optional research run date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_date: Option<String>,
    /// Optional generation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    /// Sorted evidence entries.
    #[serde(alias = "files")]
    pub entries: Vec<ManifestEntry>,
}

impl EvidenceManifest {
    /// Validates the manifest's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] on the first violated invariant: empty
    /// schema tag, absolute or escaping paths, malformed dates, duplicate or
    /// unsorted entries.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.schema_version.as_str().is_empty() {
            return Err(ManifestError::EmptySchemaVersion);
        }
        validate_base_dir(&self.base_dir)?;
        if let Some(run_date) = &self.run_date {
            parse_run_date(run_date)?;
        }
        if let Some(generated_at) = &self.generated_at {
            parse_generated_at(generated_at)?;
        }
        for entry in &self.entries {
            ensure_tree_relative(&entry.path)?;
        }
        for window in self.entries.windows(2) {
            let (previous, current) = (&window[0], &window[1]);
            if previous.path == current.path {
                return Err(ManifestError::DuplicateEntry {
                    path: current.path.clone(),
                });
            }
            if previous.path > current.path {
                return Err(ManifestError::UnsortedEntries {
                    path: current.path.clone(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Structural manifest errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The schema version tag is empty.
    #[error("manifest schema_version must not be empty")]
    EmptySchemaVersion,
    /// The base directory is absolute or escapes the tree.
    #[error("manifest base_dir '{base_dir}' is not tree-relative: {reason}")]
    BaseDir {
        /// The rejected base directory value.
        base_dir: String,
        /// Description of the violation.
        reason: String,
    },
    /// The run date is not a `YYYY-MM-DD` date.
    #[error("manifest run_date '{value}' is not a YYYY-MM-DD date")]
    InvalidRunDate {
        /// The rejected run date value.
        value: String,
    },
    /// The generation timestamp is not RFC 3339.
    #[error("manifest generated_at '{value}' is not an RFC 3339 timestamp")]
    InvalidGeneratedAt {
        /// The rejected timestamp value.
        value: String,
    },
    /// An entry path is absolute, escaping, or malformed.
    #[error("manifest entry path '{path}' is invalid: {reason}")]
    EntryPath {
        /// The rejected entry path.
        path: String,
        /// Description of the violation.
        reason: String,
    },
    /// Two entries share the same path.
    #[error("manifest contains duplicate entry for '{path}'")]
    DuplicateEntry {
        /// The duplicated path.
        path: String,
    },
    /// Entries are not sorted by path.
    #[error("manifest entries are not sorted at '{path}'")]
    UnsortedEntries {
        /// The first out-of-order path.
        path: String,
    },
    /// A validation report's `ok` flag disagrees with its error list.
    #[error("validation report ok flag disagrees with its error list")]
    InconsistentReport,
}

// ============================================================================
// SECTION: Path Validation
// ============================================================================

/// Validates that a path is tree-relative and forward-slash separated.
///
/// # Errors
///
/// Returns [`ManifestError::EntryPath`] when the path is empty, absolute,
/// backslash-separated, contains `.`/`..`/empty components, or exceeds the
/// length limits.
pub fn ensure_tree_relative(path: &str) -> Result<(), ManifestError> {
    let reject = |reason: &str| ManifestError::EntryPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    if path.is_empty() {
        return Err(reject("path is empty"));
    }
    if path.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(reject("path exceeds length limit"));
    }
    if path.contains('\\') {
        return Err(reject("backslash separators are not allowed"));
    }
    if path.starts_with('/') {
        return Err(reject("absolute paths are not allowed"));
    }
    for component in path.split('/') {
        if component.is_empty() {
            return Err(reject("empty path component"));
        }
        if component == "." || component == ".." {
            return Err(reject("dot components are not allowed"));
        }
        if component.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(reject("path component exceeds length limit"));
        }
    }
    Ok(())
}

/// Validates a manifest base directory value.
fn validate_base_dir(base_dir: &str) -> Result<(), ManifestError> {
    if base_dir == PACK_ROOT_MARKER {
        return Ok(());
    }
    ensure_tree_relative(base_dir).map_err(|err| ManifestError::BaseDir {
        base_dir: base_dir.to_string(),
        reason: err.to_string(),
    })
}

/// Parses a `YYYY-MM-DD` run date.
fn parse_run_date(value: &str) -> Result<(), ManifestError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, format).map(|_| ()).map_err(|_| ManifestError::InvalidRunDate {
        value: value.to_string(),
    })
}

/// Parses an RFC 3339 generation timestamp.
fn parse_generated_at(value: &str) -> Result<(), ManifestError> {
    OffsetDateTime::parse(value, &Rfc3339).map(|_| ()).map_err(|_| {
        ManifestError::InvalidGeneratedAt {
            value: value.to_string(),
        }
    })
}

// ============================================================================
// SECTION: Validation Issues
// ============================================================================

/// One integrity or completeness finding against a manifest.
///
/// Issue rendering names the offending relative path and the mismatch kind so
/// a report reader can act on each line without consulting anything else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// A required path is absent from the manifest itself.
    #[error("missing required artifact in index: {path}")]
    MissingRequired {
        /// The required tree-relative path.
        path: String,
    },
    /// A manifest entry has no corresponding file on disk.
    #[error("missing artifact on disk: {path}")]
    MissingOnDisk {
        /// The entry's tree-relative path.
        path: String,
    },
    /// The on-disk size differs from the recorded size.
    #[error("bytes mismatch for {path} (recorded {recorded}, actual {actual})")]
    BytesMismatch {
        /// The entry's tree-relative path.
        path: String,
        /// Size recorded in the manifest.
        recorded: u64,
        /// Size observed on disk.
        actual: u64,
    },
    /// The freshly computed digest differs from the recorded digest.
    #[error("sha256 mismatch for {path}")]
    Sha256Mismatch {
        /// The entry's tree-relative path.
        path: String,
    },
    /// A manifest entry violates the entry grammar.
    #[error("malformed entry {path}: {reason}")]
    MalformedEntry {
        /// The entry's recorded path.
        path: String,
        /// Description of the violation.
        reason: String,
    },
    /// An on-disk artifact exists but could not be read back.
    #[error("unreadable artifact on disk: {path} ({reason})")]
    ReadFailed {
        /// The entry's tree-relative path.
        path: String,
        /// Description of the read failure.
        reason: String,
    },
}

// ============================================================================
// SECTION: Validation Report
// ============================================================================

/// Outcome of validating a directory tree against a manifest.
///
/// # Invariants
/// - `ok` is true exactly when `errors` is empty; [`ValidationReport::from_issues`]
///   enforces this structurally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Report schema tag.
    pub schema_version: SchemaVersion,
    /// Schema tag of the manifest that was checked.
    pub index_schema_version: SchemaVersion,
    /// Run date copied from the manifest, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_date: Option<String>,
    /// Number of manifest entries checked.
    pub checked_entries: u64,
    /// True when no errors were found.
    pub ok: bool,
    /// Ordered, path-named error descriptions.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Builds a report from collected issues.
    ///
    /// The `ok` flag is derived from the issue list, so the two can never
    /// disagree.
    #[must_use]
    pub fn from_issues(
        index_schema_version: SchemaVersion,
        run_date: Option<String>,
        checked_entries: u64,
        issues: &[ValidationIssue],
    ) -> Self {
        let errors: Vec<String> = issues.iter().map(ToString::to_string).collect();
        Self {
            schema_version: SchemaVersion::new(VALIDATION_REPORT_SCHEMA_VERSION),
            index_schema_version,
            run_date,
            checked_entries,
            ok: errors.is_empty(),
            errors,
        }
    }

    /// Validates the report's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InconsistentReport`] when `ok` disagrees with
    /// the error list.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.ok == self.errors.is_empty() {
            Ok(())
        } else {
            Err(ManifestError::InconsistentReport)
        }
    }
}
