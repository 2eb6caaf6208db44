// crates/runproof-core/src/runtime/sidecar.rs
// ============================================================================
// Module: RunProof Sidecar Verifier
// Description: File-level enforcement of the sidecar text contract.
// Purpose: Reject malformed or misbound checksum companions before hashing.
// Dependencies: crate::core::sidecar, std::fs
// ============================================================================

//! ## Overview
//! The sidecar verifier reads a checksum companion file and enforces the
//! single-line grammar plus the name binding to its artifact. It deliberately
//! does not recompute the artifact's hash; that is the validator's job. This
//! check is meant to run cheaply and first, so malformed evidence is rejected
//! before any hashing happens.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::sidecar::SidecarFormatError;
use crate::core::sidecar::SidecarLine;
use crate::core::sidecar::sidecar_file_name;
use crate::runtime::MAX_SIDECAR_BYTES;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// File-level sidecar verification errors.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// The sidecar text violates the checksum contract.
    #[error(transparent)]
    Format(#[from] SidecarFormatError),
    /// The sidecar could not be read.
    #[error("failed to read sidecar {}: {source}", path.display())]
    Io {
        /// Sidecar path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The sidecar exceeds the size limit for a one-line file.
    #[error("sidecar {} is {size} bytes (limit {limit})", path.display())]
    TooLarge {
        /// Sidecar path that failed.
        path: PathBuf,
        /// Observed size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        limit: usize,
    },
    /// The sidecar is not UTF-8 text.
    #[error("sidecar {} is not UTF-8 text", path.display())]
    NotUtf8 {
        /// Sidecar path that failed.
        path: PathBuf,
    },
    /// The artifact path has no base file name to bind against.
    #[error("artifact {} has no file name", path.display())]
    MissingFileName {
        /// Artifact path that failed.
        path: PathBuf,
    },
}

// ============================================================================
// SECTION: Verification
// ============================================================================

/// Validates a sidecar file against the artifact it accompanies.
///
/// Enforces the textual contract only: exactly one line, 64 lowercase hex
/// characters, one whitespace run, and a file name equal to the artifact's
/// base name. The artifact's content is never read.
///
/// # Errors
///
/// Returns [`SidecarError`] on any read failure or contract violation; there
/// is no partial acceptance.
pub fn validate_sidecar(
    artifact_path: &Path,
    sidecar_path: &Path,
) -> Result<SidecarLine, SidecarError> {
    let artifact_name = artifact_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SidecarError::MissingFileName {
            path: artifact_path.to_path_buf(),
        })?;

    let metadata = fs::metadata(sidecar_path).map_err(|source| SidecarError::Io {
        path: sidecar_path.to_path_buf(),
        source,
    })?;
    if metadata.len() > u64::try_from(MAX_SIDECAR_BYTES).unwrap_or(u64::MAX) {
        return Err(SidecarError::TooLarge {
            path: sidecar_path.to_path_buf(),
            size: metadata.len(),
            limit: MAX_SIDECAR_BYTES,
        });
    }
    let bytes = fs::read(sidecar_path).map_err(|source| SidecarError::Io {
        path: sidecar_path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| SidecarError::NotUtf8 {
        path: sidecar_path.to_path_buf(),
    })?;

    let line = SidecarLine::parse(&text)?;
    line.verify_binding(artifact_name)?;
    Ok(line)
}

/// Returns the conventional sidecar path for an artifact path.
#[must_use]
pub fn sidecar_path_for(artifact_path: &Path) -> Option<PathBuf> {
    let name = artifact_path.file_name()?.to_str()?;
    Some(artifact_path.with_file_name(sidecar_file_name(name)))
}
