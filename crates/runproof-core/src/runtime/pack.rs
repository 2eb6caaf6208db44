// crates/runproof-core/src/runtime/pack.rs
// ============================================================================
// Module: RunProof Evidence Pack Lifecycle
// Description: Relocatable pack generation and fail-closed pack validation.
// Purpose: Capture run inputs as a self-contained, verifiable directory.
// Dependencies: crate::{core, runtime}, serde_json
// ============================================================================

//! ## Overview
//! Pack generation copies an input tree under a pack directory, builds a
//! manifest whose base and entry paths are all pack-relative, and writes the
//! manifest with its sidecar checksum. Absolute-path leakage (including CI
//! runner home-directory fragments) is treated as a correctness bug, not
//! cosmetic: a pack built on one machine must validate identically after
//! being moved to another. Pack validation screens the manifest's sidecar
//! first, then recomputes every recorded hash.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::hash_bytes;
use crate::core::manifest::DEFAULT_MANIFEST_FILE_NAME;
use crate::core::manifest::EvidenceManifest;
use crate::core::manifest::ManifestError;
use crate::core::manifest::PACK_ROOT_MARKER;
use crate::core::manifest::ValidationIssue;
use crate::core::manifest::ValidationReport;
use crate::core::manifest::ensure_tree_relative;
use crate::core::sidecar::SidecarLine;
use crate::core::sidecar::sidecar_file_name;
use crate::runtime::MAX_DOCUMENT_BYTES;
use crate::runtime::builder::BuildError;
use crate::runtime::builder::ManifestBuilder;
use crate::runtime::sidecar::SidecarError;
use crate::runtime::sidecar::sidecar_path_for;
use crate::runtime::sidecar::validate_sidecar;
use crate::runtime::validator::ManifestValidator;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Pack generation and validation errors.
#[derive(Debug, Error)]
pub enum PackError {
    /// A filesystem operation failed.
    #[error("pack io error at {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The pack identifier violates the identifier grammar.
    #[error("invalid pack id '{pack_id}': {reason}")]
    InvalidPackId {
        /// The rejected pack identifier.
        pack_id: String,
        /// Description of the violation.
        reason: String,
    },
    /// The pack directory already exists; packs are created once.
    #[error("pack directory {} already exists", path.display())]
    PackExists {
        /// The colliding pack directory.
        path: PathBuf,
    },
    /// The input directory is not inside the declared base directory.
    #[error("input {} is outside base directory {}", input.display(), base.display())]
    InputOutsideBase {
        /// The input directory.
        input: PathBuf,
        /// The declared base directory.
        base: PathBuf,
    },
    /// A copied input would collide with the pack's own manifest or sidecar.
    #[error("input file would overwrite pack output {}", path.display())]
    ManifestCollision {
        /// The colliding destination path.
        path: PathBuf,
    },
    /// Manifest construction failed.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The manifest violates a structural invariant.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    /// The manifest's sidecar violates the checksum contract.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),
    /// A manifest document exceeds the in-memory size limit.
    #[error("manifest {} is {size} bytes (limit {limit})", path.display())]
    TooLarge {
        /// Manifest path that failed.
        path: PathBuf,
        /// Observed size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        limit: usize,
    },
    /// A manifest document could not be parsed.
    #[error("failed to parse manifest {}: {message}", path.display())]
    Parse {
        /// Manifest path that failed.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },
    /// Canonical serialization of the manifest failed.
    #[error("failed to serialize manifest: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },
}

// ============================================================================
// SECTION: Pack Paths
// ============================================================================

/// Filesystem locations produced by pack generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackPaths {
    /// Root directory of the generated pack.
    pub pack_dir: PathBuf,
    /// Path of the written manifest.
    pub manifest_path: PathBuf,
    /// Path of the manifest's sidecar checksum.
    pub sidecar_path: PathBuf,
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Evidence pack generator and validator.
#[derive(Debug, Clone)]
pub struct PackGenerator {
    /// Manifest file name written at the pack root.
    pub manifest_name: String,
    /// Builder used for the pack manifest. Packs capture every copied file,
    /// so the default disables the report-extension safelist.
    pub builder: ManifestBuilder,
}

impl Default for PackGenerator {
    fn default() -> Self {
        Self {
            manifest_name: DEFAULT_MANIFEST_FILE_NAME.to_string(),
            builder: ManifestBuilder::default().allow_all_files(),
        }
    }
}

impl PackGenerator {
    /// Generates a pack from `input_dir` under `out_root/<pack_id>`.
    ///
    /// Input files are copied to pack-relative locations that preserve their
    /// layout relative to `base_dir`, so the recorded entry paths are
    /// simultaneously pack-root-relative and base-relative. `generated_at`
    /// is caller-supplied: pinning it to a fixed value makes two invocations
    /// over identical inputs byte-identical (deterministic mode), while
    /// wall-clock values come from the CLI, never from this crate.
    ///
    /// # Errors
    ///
    /// Returns [`PackError`] when the pack already exists, the input escapes
    /// the base directory, a copy fails, or manifest construction fails.
    pub fn generate(
        &self,
        base_dir: &Path,
        input_dir: &Path,
        out_root: &Path,
        pack_id: &str,
        generated_at: &str,
        run_date: Option<&str>,
    ) -> Result<PackPaths, PackError> {
        validate_pack_id(pack_id)?;

        let base = fs::canonicalize(base_dir).map_err(|source| PackError::Io {
            path: base_dir.to_path_buf(),
            source,
        })?;
        let input = fs::canonicalize(input_dir).map_err(|source| PackError::Io {
            path: input_dir.to_path_buf(),
            source,
        })?;
        let prefix = input
            .strip_prefix(&base)
            .map_err(|_| PackError::InputOutsideBase {
                input: input.clone(),
                base: base.clone(),
            })?
            .to_path_buf();

        let pack_dir = out_root.join(pack_id);
        if pack_dir.exists() {
            return Err(PackError::PackExists {
                path: pack_dir,
            });
        }
        let manifest_path = pack_dir.join(&self.manifest_name);
        let sidecar_path = pack_dir.join(sidecar_file_name(&self.manifest_name));

        let destination = pack_dir.join(&prefix);
        fs::create_dir_all(&destination).map_err(|source| PackError::Io {
            path: destination.clone(),
            source,
        })?;
        self.copy_tree(&input, &destination, &manifest_path, &sidecar_path)?;

        let mut builder = self.builder.clone();
        builder.generated_at = Some(generated_at.to_string());
        builder.run_date = run_date.map(ToString::to_string);
        let manifest = builder.build(&pack_dir)?;

        let mut bytes = serde_jcs::to_vec(&manifest).map_err(|err| PackError::Serialization {
            message: err.to_string(),
        })?;
        bytes.push(b'\n');
        fs::write(&manifest_path, &bytes).map_err(|source| PackError::Io {
            path: manifest_path.clone(),
            source,
        })?;

        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, &bytes);
        let sidecar = SidecarLine {
            digest: digest.to_sha256_hex(),
            file_name: self.manifest_name.clone(),
        };
        fs::write(&sidecar_path, sidecar.render()).map_err(|source| PackError::Io {
            path: sidecar_path.clone(),
            source,
        })?;

        Ok(PackPaths {
            pack_dir,
            manifest_path,
            sidecar_path,
        })
    }

    /// Validates a pack rooted at its manifest's declared base directory.
    ///
    /// The manifest's sidecar is screened first (cheap, fail-closed) before
    /// any hashing. The manifest file's own digest is then recomputed against
    /// the sidecar, and every entry is revalidated against disk. Tampering
    /// with any file after pack creation surfaces here.
    ///
    /// # Errors
    ///
    /// Returns [`PackError`] when the sidecar violates its textual contract
    /// or the manifest cannot be read or parsed. Integrity findings are
    /// collected into the returned report, never raised.
    pub fn validate_pack(&self, manifest_path: &Path) -> Result<ValidationReport, PackError> {
        let sidecar_path =
            sidecar_path_for(manifest_path).ok_or_else(|| PackError::Io {
                path: manifest_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "manifest path has no file name",
                ),
            })?;
        let sidecar = validate_sidecar(manifest_path, &sidecar_path)?;

        let bytes = read_manifest_bytes(manifest_path)?;
        let manifest: EvidenceManifest =
            serde_json::from_slice(&bytes).map_err(|err| PackError::Parse {
                path: manifest_path.to_path_buf(),
                message: err.to_string(),
            })?;

        let manifest_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        let root = if manifest.base_dir == PACK_ROOT_MARKER {
            manifest_dir.to_path_buf()
        } else {
            // An absolute or escaping base would let a tampered manifest point
            // validation at arbitrary trees; reject it before touching disk.
            ensure_tree_relative(&manifest.base_dir).map_err(PackError::Manifest)?;
            manifest_dir.join(&manifest.base_dir)
        };

        let mut issues = Vec::new();
        let manifest_digest = hash_bytes(DEFAULT_HASH_ALGORITHM, &bytes);
        if manifest_digest.to_sha256_hex() != sidecar.digest {
            issues.push(ValidationIssue::Sha256Mismatch {
                path: sidecar.file_name.clone(),
            });
        }

        let validator = ManifestValidator::new();
        let (checked_entries, entry_issues) = validator.collect_issues(&root, &manifest, &[]);
        issues.extend(entry_issues);

        Ok(ValidationReport::from_issues(
            manifest.schema_version.clone(),
            manifest.run_date.clone(),
            checked_entries,
            &issues,
        ))
    }

    /// Recursively copies the input tree, refusing output collisions.
    fn copy_tree(
        &self,
        source: &Path,
        destination: &Path,
        manifest_path: &Path,
        sidecar_path: &Path,
    ) -> Result<(), PackError> {
        let mut children = Vec::new();
        let reader = fs::read_dir(source).map_err(|io| PackError::Io {
            path: source.to_path_buf(),
            source: io,
        })?;
        for child in reader {
            let child = child.map_err(|io| PackError::Io {
                path: source.to_path_buf(),
                source: io,
            })?;
            children.push(child.path());
        }
        children.sort();

        for path in children {
            let metadata = fs::metadata(&path).map_err(|io| PackError::Io {
                path: path.clone(),
                source: io,
            })?;
            let Some(name) = path.file_name() else {
                continue;
            };
            let target = destination.join(name);
            if metadata.is_dir() {
                fs::create_dir_all(&target).map_err(|io| PackError::Io {
                    path: target.clone(),
                    source: io,
                })?;
                self.copy_tree(&path, &target, manifest_path, sidecar_path)?;
                continue;
            }
            if !metadata.is_file() {
                continue;
            }
            if target == *manifest_path || target == *sidecar_path {
                return Err(PackError::ManifestCollision {
                    path: target,
                });
            }
            fs::copy(&path, &target).map_err(|io| PackError::Io {
                path: target.clone(),
                source: io,
            })?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a pack identifier for use as a directory name.
fn validate_pack_id(pack_id: &str) -> Result<(), PackError> {
    let reject = |reason: &str| PackError::InvalidPackId {
        pack_id: pack_id.to_string(),
        reason: reason.to_string(),
    };
    if pack_id.is_empty() {
        return Err(reject("pack id is empty"));
    }
    if pack_id.len() > 128 {
        return Err(reject("pack id exceeds 128 characters"));
    }
    if pack_id.starts_with('.') {
        return Err(reject("pack id must not start with a dot"));
    }
    if !pack_id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
        return Err(reject("pack id must contain only ASCII alphanumerics, '.', '_', or '-'"));
    }
    Ok(())
}

/// Reads a manifest document with the in-memory size limit applied.
fn read_manifest_bytes(path: &Path) -> Result<Vec<u8>, PackError> {
    let metadata = fs::metadata(path).map_err(|source| PackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > u64::try_from(MAX_DOCUMENT_BYTES).unwrap_or(u64::MAX) {
        return Err(PackError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: MAX_DOCUMENT_BYTES,
        });
    }
    fs::read(path).map_err(|source| PackError::Io {
        path: path.to_path_buf(),
        source,
    })
}
