// crates/runproof-core/src/runtime/validator.rs
// ============================================================================
// Module: RunProof Manifest Validator
// Description: Fail-closed revalidation of a directory tree against a manifest.
// Purpose: Recompute every recorded hash and surface all mismatches at once.
// Dependencies: crate::core, std::fs
// ============================================================================

//! ## Overview
//! The validator re-walks disk for every manifest entry, recomputing sizes
//! and digests. Nothing recorded in the manifest is trusted without
//! recomputation. Checking is non-fail-fast: every issue is collected into an
//! explicit accumulator so one invocation surfaces every problem, and a known
//! mismatch is never swallowed to let a run pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::hash_file;
use crate::core::manifest::EvidenceManifest;
use crate::core::manifest::ManifestEntry;
use crate::core::manifest::ValidationIssue;
use crate::core::manifest::ValidationReport;
use crate::core::manifest::ensure_tree_relative;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Fail-closed manifest validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestValidator;

impl ManifestValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates the tree at `root` against `manifest`.
    ///
    /// Two independent checks must both pass for `ok`: completeness (every
    /// path in `required_paths` appears as a manifest entry) and integrity
    /// (every entry exists on disk with the recorded size and digest).
    #[must_use]
    pub fn validate(
        &self,
        root: &Path,
        manifest: &EvidenceManifest,
        required_paths: &[String],
    ) -> ValidationReport {
        let (checked_entries, issues) = self.collect_issues(root, manifest, required_paths);
        ValidationReport::from_issues(
            manifest.schema_version.clone(),
            manifest.run_date.clone(),
            checked_entries,
            &issues,
        )
    }

    /// Runs both checks and returns the raw issue accumulator.
    ///
    /// Exposed so pack validation can prepend its own findings while keeping
    /// the report's `ok`/`errors` consistency structural.
    #[must_use]
    pub fn collect_issues(
        &self,
        root: &Path,
        manifest: &EvidenceManifest,
        required_paths: &[String],
    ) -> (u64, Vec<ValidationIssue>) {
        let mut issues = Vec::new();

        let recorded: BTreeSet<&str> =
            manifest.entries.iter().map(|entry| entry.path.as_str()).collect();
        for required in required_paths {
            if !recorded.contains(required.as_str()) {
                issues.push(ValidationIssue::MissingRequired {
                    path: required.clone(),
                });
            }
        }

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut previous: Option<&str> = None;
        for entry in &manifest.entries {
            if !seen.insert(entry.path.as_str()) {
                issues.push(ValidationIssue::MalformedEntry {
                    path: entry.path.clone(),
                    reason: "duplicate path in manifest".to_string(),
                });
                continue;
            }
            if let Some(previous) = previous
                && previous > entry.path.as_str()
            {
                issues.push(ValidationIssue::MalformedEntry {
                    path: entry.path.clone(),
                    reason: "entries are not sorted by path".to_string(),
                });
            }
            previous = Some(entry.path.as_str());

            if let Err(err) = ensure_tree_relative(&entry.path) {
                issues.push(ValidationIssue::MalformedEntry {
                    path: entry.path.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
            self.check_entry(root, entry, &mut issues);
        }

        let checked_entries = u64::try_from(manifest.entries.len()).unwrap_or(u64::MAX);
        (checked_entries, issues)
    }

    /// Recomputes one entry's size and digest against disk.
    fn check_entry(
        &self,
        root: &Path,
        entry: &ManifestEntry,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let full = root.join(&entry.path);
        let metadata = match fs::metadata(&full) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                issues.push(ValidationIssue::MissingOnDisk {
                    path: entry.path.clone(),
                });
                return;
            }
            Err(err) => {
                issues.push(ValidationIssue::ReadFailed {
                    path: entry.path.clone(),
                    reason: err.to_string(),
                });
                return;
            }
        };
        if !metadata.is_file() {
            issues.push(ValidationIssue::MissingOnDisk {
                path: entry.path.clone(),
            });
            return;
        }
        if metadata.len() != entry.bytes {
            issues.push(ValidationIssue::BytesMismatch {
                path: entry.path.clone(),
                recorded: entry.bytes,
                actual: metadata.len(),
            });
            return;
        }
        match hash_file(DEFAULT_HASH_ALGORITHM, &full) {
            Ok((_, digest)) => {
                if digest.to_sha256_hex() != entry.sha256 {
                    issues.push(ValidationIssue::Sha256Mismatch {
                        path: entry.path.clone(),
                    });
                }
            }
            Err(err) => {
                issues.push(ValidationIssue::ReadFailed {
                    path: entry.path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
}
