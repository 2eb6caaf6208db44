// crates/runproof-core/src/core/hashing.rs
// ============================================================================
// Module: RunProof Content Hashing
// Description: RFC 8785 JSON canonicalization and streaming content hashing.
// Purpose: Provide deterministic digests for evidence files and documents.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! RunProof hashes canonical JSON using RFC 8785 (JCS) to guarantee stable,
//! replayable digests. Raw evidence files are hashed over their exact bytes
//! with a bounded streaming buffer so memory use stays constant regardless of
//! file size.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Supported hash algorithms for RunProof artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 hashing (FIPS-friendly default).
    Sha256,
}

/// Default hash algorithm for RunProof.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

/// Chunk size for streaming file hashing.
const HASH_CHUNK_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Hash Digest
// ============================================================================

/// Deterministic content hash representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Hash algorithm identifier.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex-encoded digest bytes.
    pub value: String,
}

impl HashDigest {
    /// Creates a new digest from raw bytes.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            value: hex_encode(bytes),
        }
    }

    /// Returns the flat 64-hex wire form of a SHA-256 digest.
    #[must_use]
    pub fn to_sha256_hex(&self) -> Sha256Hex {
        Sha256Hex(self.value.clone())
    }
}

// ============================================================================
// SECTION: Flat Digest Wire Form
// ============================================================================

/// Flat 64-lowercase-hex SHA-256 digest used in manifest and sidecar wire
/// formats.
///
/// # Invariants
/// - Always exactly 64 ASCII characters in `[0-9a-f]`; enforced at every
///   construction boundary, including deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sha256Hex(String);

impl Sha256Hex {
    /// Parses and validates a flat hex digest.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidDigest`] unless the value is exactly 64
    /// lowercase hex characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, HashError> {
        let value = value.into();
        if value.len() != 64 || !value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(HashError::InvalidDigest {
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the digest as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Sha256Hex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing or parsing digests.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
    /// A digest value is not 64 lowercase hex characters.
    #[error("invalid sha256 digest: {value}")]
    InvalidDigest {
        /// The rejected digest value.
        value: String,
    },
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Hashes canonical JSON using the provided algorithm.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn hash_canonical_json<T: Serialize + ?Sized>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<HashDigest, HashError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(hash_bytes(algorithm, &bytes))
}

/// Hashes raw bytes using the provided algorithm.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(bytes);
            let digest = hasher.finalize();
            HashDigest::new(HashAlgorithm::Sha256, &digest)
        }
    }
}

/// Hashes a reader with a bounded streaming buffer.
///
/// Returns the total byte count alongside the digest so callers that need
/// both never read the source twice.
///
/// # Errors
///
/// Returns the underlying I/O error when the reader fails.
pub fn hash_reader<R: Read>(
    algorithm: HashAlgorithm,
    reader: &mut R,
) -> std::io::Result<(u64, HashDigest)> {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            let mut buffer = vec![0_u8; HASH_CHUNK_BYTES];
            let mut total: u64 = 0;
            loop {
                let read = reader.read(&mut buffer)?;
                if read == 0 {
                    break;
                }
                hasher.update(&buffer[..read]);
                total = total.saturating_add(u64::try_from(read).unwrap_or(u64::MAX));
            }
            let digest = hasher.finalize();
            Ok((total, HashDigest::new(HashAlgorithm::Sha256, &digest)))
        }
    }
}

/// Hashes a file's raw bytes with a bounded streaming buffer.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be opened or read.
pub fn hash_file(algorithm: HashAlgorithm, path: &Path) -> std::io::Result<(u64, HashDigest)> {
    let mut file = File::open(path)?;
    hash_reader(algorithm, &mut file)
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
