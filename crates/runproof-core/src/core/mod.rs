// crates/runproof-core/src/core/mod.rs
// ============================================================================
// Module: RunProof Core Types
// Description: Canonical evidence schema and integrity structures.
// Purpose: Provide stable, serializable types for manifests, reports, and packs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! RunProof core types define the canonical document model, content hashes,
//! evidence manifests, validation reports, sidecar checksums, and the
//! evidence index. These types are the canonical source of truth for every
//! artifact RunProof writes to disk.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod canonical;
pub mod hashing;
pub mod index;
pub mod manifest;
pub mod sidecar;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use canonical::CanonicalError;
pub use canonical::DeterminismContract;
pub use canonical::KeyPath;
pub use canonical::KeySegment;
pub use canonical::canonicalize;
pub use canonical::canonicalize_serialize;
pub use canonical::canonicalize_value;
pub use canonical::hash_canonical;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use hashing::Sha256Hex;
pub use hashing::canonical_json_bytes;
pub use hashing::hash_bytes;
pub use hashing::hash_canonical_json;
pub use hashing::hash_file;
pub use hashing::hash_reader;
pub use index::DEFAULT_INDEX_FILE_NAME;
pub use index::EvidenceIndex;
pub use index::INDEX_SCHEMA_VERSION;
pub use index::IndexError;
pub use index::PackRecord;
pub use manifest::DEFAULT_MANIFEST_FILE_NAME;
pub use manifest::DEFAULT_REPORT_FILE_NAME;
pub use manifest::EvidenceManifest;
pub use manifest::MANIFEST_SCHEMA_VERSION;
pub use manifest::ManifestEntry;
pub use manifest::ManifestError;
pub use manifest::PACK_ROOT_MARKER;
pub use manifest::SchemaVersion;
pub use manifest::VALIDATION_REPORT_SCHEMA_VERSION;
pub use manifest::ValidationIssue;
pub use manifest::ValidationReport;
pub use manifest::ensure_tree_relative;
pub use sidecar::SidecarFormatError;
pub use sidecar::SidecarLine;
pub use sidecar::sidecar_file_name;
