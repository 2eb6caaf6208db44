// crates/runproof-core/src/core/canonical.rs
// ============================================================================
// Module: RunProof Canonicalizer
// Description: Deterministic document canonicalization under a contract.
// Purpose: Reduce structured documents to one stable byte form for hashing.
// Dependencies: bigdecimal, serde, serde_jcs, serde_json
// ============================================================================

//! ## Overview
//! The canonicalizer reduces a structured document to a single deterministic
//! byte sequence: mapping keys sorted at every nesting level, sequence order
//! preserved, RFC 8785 number and string rendering, no insignificant
//! whitespace. A [`DeterminismContract`] names the volatile key paths
//! (timestamps, run identifiers) stripped before hashing or comparison.
//! Canonicalization is idempotent and never coerces unsupported input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;
use thiserror::Error;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashDigest;
use crate::core::hashing::hash_bytes;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by canonicalization and contract parsing.
#[derive(Debug, Error)]
pub enum CanonicalError {
    /// The document could not be serialized to canonical bytes.
    #[error("canonicalization failed: {message}")]
    Serialize {
        /// Description of the serialization failure.
        message: String,
    },
    /// A volatile key path does not match the path grammar.
    #[error("invalid key path '{path}': {reason}")]
    InvalidKeyPath {
        /// The rejected key path text.
        path: String,
        /// Description of the grammar violation.
        reason: String,
    },
    /// A numeric tolerance value is not a valid decimal.
    #[error("invalid numeric tolerance: {value}")]
    InvalidTolerance {
        /// The rejected tolerance value.
        value: String,
    },
}

// ============================================================================
// SECTION: Key Paths
// ============================================================================

/// One step of a volatile key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySegment {
    /// Descend into a mapping by key.
    Key(String),
    /// Descend into a sequence by zero-based index.
    Index(usize),
}

/// A dot/bracket key path addressing one location in a document.
///
/// # Invariants
/// - Paths are non-empty; every mapping segment has a non-empty name.
/// - The textual form round-trips through [`KeyPath::parse`] and `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    /// Ordered path segments from the document root.
    segments: Vec<KeySegment>,
}

impl KeyPath {
    /// Parses a dot/bracket path such as `meta.generated_at` or `runs[2].id`.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalError::InvalidKeyPath`] on empty segments, missing
    /// brackets, or non-numeric indices. The grammar is deliberately closed;
    /// there are no wildcards.
    pub fn parse(text: &str) -> Result<Self, CanonicalError> {
        let invalid = |reason: &str| CanonicalError::InvalidKeyPath {
            path: text.to_string(),
            reason: reason.to_string(),
        };
        if text.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        for part in text.split('.') {
            if part.is_empty() {
                return Err(invalid("empty segment"));
            }
            let (name, mut rest) = match part.find('[') {
                Some(position) => part.split_at(position),
                None => (part, ""),
            };
            if name.is_empty() {
                return Err(invalid("segment must start with a mapping key"));
            }
            segments.push(KeySegment::Key(name.to_string()));
            while !rest.is_empty() {
                let Some(stripped) = rest.strip_prefix('[') else {
                    return Err(invalid("expected '[' before index"));
                };
                let Some(close) = stripped.find(']') else {
                    return Err(invalid("unterminated index"));
                };
                let digits = &stripped[..close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid("index must be a non-negative integer"));
                }
                let index =
                    digits.parse::<usize>().map_err(|_| invalid("index out of range"))?;
                segments.push(KeySegment::Index(index));
                rest = &stripped[close + 1..];
            }
        }
        Ok(Self {
            segments,
        })
    }

    /// Returns the ordered path segments.
    #[must_use]
    pub fn segments(&self) -> &[KeySegment] {
        &self.segments
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                KeySegment::Key(name) => {
                    if !first {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                KeySegment::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }
        Ok(())
    }
}

impl Serialize for KeyPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Determinism Contract
// ============================================================================

/// Declared volatility for canonicalization and comparison.
///
/// # Invariants
/// - Volatile paths are stripped before hashing and comparison.
/// - `numeric_tolerance` applies to comparison only; hashing is always exact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeterminismContract {
    /// Key paths stripped from documents before hashing or comparison.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volatile_paths: Vec<KeyPath>,
    /// Optional decimal tolerance applied when comparing numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_tolerance: Option<String>,
}

impl DeterminismContract {
    /// Builds a contract from textual parts, validating both fail-closed.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalError`] when a path or the tolerance is malformed.
    pub fn from_parts(
        volatile_paths: &[String],
        numeric_tolerance: Option<String>,
    ) -> Result<Self, CanonicalError> {
        let mut parsed = Vec::with_capacity(volatile_paths.len());
        for path in volatile_paths {
            parsed.push(KeyPath::parse(path)?);
        }
        let contract = Self {
            volatile_paths: parsed,
            numeric_tolerance,
        };
        contract.tolerance()?;
        Ok(contract)
    }

    /// Parses the numeric tolerance into an exact decimal, when present.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalError::InvalidTolerance`] when the value does not
    /// parse as a decimal.
    pub fn tolerance(&self) -> Result<Option<BigDecimal>, CanonicalError> {
        match &self.numeric_tolerance {
            None => Ok(None),
            Some(value) => value
                .parse::<BigDecimal>()
                .map(Some)
                .map_err(|_| CanonicalError::InvalidTolerance {
                    value: value.clone(),
                }),
        }
    }
}

// ============================================================================
// SECTION: Canonicalization
// ============================================================================

/// Returns the redacted document with all volatile paths stripped.
///
/// Mapping keys addressed by a volatile path are removed; sequence slots are
/// nulled so sibling indices keep their positions. Paths that address nothing
/// are a no-op: an absent volatile field is already non-volatile.
#[must_use]
pub fn canonicalize_value(doc: &Value, contract: &DeterminismContract) -> Value {
    let mut redacted = doc.clone();
    for path in &contract.volatile_paths {
        strip_path(&mut redacted, path.segments());
    }
    redacted
}

/// Canonicalizes a document to its deterministic byte form.
///
/// # Errors
///
/// Returns [`CanonicalError::Serialize`] when the document cannot be encoded;
/// unsupported input is rejected, never coerced.
pub fn canonicalize(doc: &Value, contract: &DeterminismContract) -> Result<Vec<u8>, CanonicalError> {
    let redacted = canonicalize_value(doc, contract);
    serde_jcs::to_vec(&redacted).map_err(|err| CanonicalError::Serialize {
        message: err.to_string(),
    })
}

/// Canonicalizes any serializable value through the closed document model.
///
/// # Errors
///
/// Returns [`CanonicalError::Serialize`] when the value has a leaf outside
/// the document model (for example a non-string mapping key).
pub fn canonicalize_serialize<T: Serialize>(
    value: &T,
    contract: &DeterminismContract,
) -> Result<Vec<u8>, CanonicalError> {
    let doc = serde_json::to_value(value).map_err(|err| CanonicalError::Serialize {
        message: err.to_string(),
    })?;
    canonicalize(&doc, contract)
}

/// Hashes a document's canonical byte form.
///
/// # Errors
///
/// Returns [`CanonicalError::Serialize`] when canonicalization fails.
pub fn hash_canonical(
    doc: &Value,
    contract: &DeterminismContract,
) -> Result<HashDigest, CanonicalError> {
    let bytes = canonicalize(doc, contract)?;
    Ok(hash_bytes(DEFAULT_HASH_ALGORITHM, &bytes))
}

/// Removes or nulls the location addressed by `segments` inside `value`.
fn strip_path(value: &mut Value, segments: &[KeySegment]) {
    let Some((head, tail)) = segments.split_first() else {
        return;
    };
    match (head, value) {
        (KeySegment::Key(name), Value::Object(map)) => {
            if tail.is_empty() {
                map.remove(name);
            } else if let Some(child) = map.get_mut(name) {
                strip_path(child, tail);
            }
        }
        (KeySegment::Index(index), Value::Array(items)) => {
            if tail.is_empty() {
                if let Some(slot) = items.get_mut(*index) {
                    *slot = Value::Null;
                }
            } else if let Some(child) = items.get_mut(*index) {
                strip_path(child, tail);
            }
        }
        _ => {}
    }
}
