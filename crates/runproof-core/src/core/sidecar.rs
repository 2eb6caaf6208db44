// crates/runproof-core/src/core/sidecar.rs
// ============================================================================
// Module: RunProof Sidecar Checksum Format
// Description: Strict single-line checksum companion file grammar.
// Purpose: Bind one artifact to one digest with a fail-closed text contract.
// Dependencies: crate::core::hashing
// ============================================================================

//! ## Overview
//! A sidecar is a `<artifact>.sha256` companion file containing exactly one
//! line: 64 lowercase hex characters, one run of whitespace, and the bare
//! file name of the artifact it accompanies. The grammar is deliberately
//! inflexible; loosely formatted checksum files are the classic vector for
//! hand-edited, unverified "fixes" to evidence. Any deviation is a hard
//! failure, never a best-effort pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::hashing::Sha256Hex;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Sidecar text contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SidecarFormatError {
    /// The sidecar does not contain exactly one line.
    #[error("sidecar must contain exactly one line (found {found})")]
    LineCount {
        /// Number of lines found.
        found: usize,
    },
    /// The single line violates the checksum grammar.
    #[error("sidecar line violates checksum grammar: {reason}")]
    Pattern {
        /// Description of the grammar violation.
        reason: String,
    },
    /// The named file does not match the accompanied artifact.
    #[error("sidecar is bound to '{found}' but accompanies '{expected}'")]
    NameBinding {
        /// Base name of the accompanied artifact.
        expected: String,
        /// File name recorded in the sidecar.
        found: String,
    },
}

// ============================================================================
// SECTION: Sidecar Line
// ============================================================================

/// Parsed content of a well-formed sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarLine {
    /// Digest recorded for the artifact.
    pub digest: Sha256Hex,
    /// Bare file name the digest is bound to.
    pub file_name: String,
}

impl SidecarLine {
    /// Parses sidecar text against the fixed grammar
    /// `^[0-9a-f]{64}\s+\S+\n?$`.
    ///
    /// A single trailing newline is the only permitted decoration; a second
    /// line, a carriage return, uppercase hex, or a short/long digest all
    /// fail.
    ///
    /// # Errors
    ///
    /// Returns [`SidecarFormatError`] on any deviation from the grammar.
    pub fn parse(text: &str) -> Result<Self, SidecarFormatError> {
        let pattern = |reason: &str| SidecarFormatError::Pattern {
            reason: reason.to_string(),
        };
        if text.is_empty() {
            return Err(SidecarFormatError::LineCount {
                found: 0,
            });
        }
        let body = text.strip_suffix('\n').unwrap_or(text);
        if body.is_empty() {
            return Err(SidecarFormatError::LineCount {
                found: 0,
            });
        }
        if body.contains('\n') {
            return Err(SidecarFormatError::LineCount {
                found: body.split('\n').count(),
            });
        }
        if body.contains('\r') {
            return Err(pattern("carriage return is not allowed"));
        }

        let bytes = body.as_bytes();
        if bytes.len() < 64 {
            return Err(pattern("digest must be 64 characters"));
        }
        if !bytes[..64].iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(pattern("digest must be 64 lowercase hex characters"));
        }
        let rest = &body[64..];
        let file_name = rest.trim_start_matches([' ', '\t']);
        if file_name.len() == rest.len() {
            return Err(pattern("expected whitespace between digest and file name"));
        }
        if file_name.is_empty() {
            return Err(pattern("missing file name"));
        }
        if file_name.chars().any(char::is_whitespace) {
            return Err(pattern("file name must not contain whitespace"));
        }
        if file_name.contains('/') || file_name.contains('\\') {
            return Err(pattern("file name must not contain path separators"));
        }

        let digest = Sha256Hex::parse(&body[..64])
            .map_err(|err| pattern(&err.to_string()))?;
        Ok(Self {
            digest,
            file_name: file_name.to_string(),
        })
    }

    /// Checks that the sidecar names the accompanied artifact exactly.
    ///
    /// # Errors
    ///
    /// Returns [`SidecarFormatError::NameBinding`] on any difference; a
    /// correct digest bound to the wrong name is still a hard failure,
    /// because the binding is the entire point of the format.
    pub fn verify_binding(&self, artifact_name: &str) -> Result<(), SidecarFormatError> {
        if self.file_name == artifact_name {
            Ok(())
        } else {
            Err(SidecarFormatError::NameBinding {
                expected: artifact_name.to_string(),
                found: self.file_name.clone(),
            })
        }
    }

    /// Renders the canonical sidecar text, trailing newline included.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}  {}\n", self.digest, self.file_name)
    }
}

// ============================================================================
// SECTION: Naming
// ============================================================================

/// Returns the sidecar file name for an artifact file name.
#[must_use]
pub fn sidecar_file_name(artifact_name: &str) -> String {
    format!("{artifact_name}.sha256")
}
