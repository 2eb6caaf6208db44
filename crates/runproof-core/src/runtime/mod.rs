// crates/runproof-core/src/runtime/mod.rs
// ============================================================================
// Module: RunProof Runtime
// Description: Filesystem-facing builders, validators, and aggregators.
// Purpose: Apply the core evidence model to concrete directory trees.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Runtime operations walk real directory trees: building manifests,
//! revalidating them fail-closed, generating and validating evidence packs,
//! aggregating pack indexes, and comparing canonicalized reports. Every
//! operation is synchronous, scoped to the paths it is given, and free of
//! process-wide state; callers running against disjoint subtrees need no
//! coordination.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod builder;
pub mod comparator;
pub mod index;
pub mod pack;
pub mod sidecar;
pub mod validator;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a JSON document (manifest, report, index) parsed into
/// memory. Raw evidence files are streamed and are not subject to this limit.
pub const MAX_DOCUMENT_BYTES: usize = 8 * 1024 * 1024;

/// Maximum size of a sidecar file read into memory.
pub const MAX_SIDECAR_BYTES: usize = 4096;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::BuildError;
pub use builder::DEFAULT_SAFELIST_EXTENSIONS;
pub use builder::ManifestBuilder;
pub use comparator::ComparisonResult;
pub use comparator::compare_reports;
pub use index::AggregateError;
pub use index::IndexAggregator;
pub use pack::PackError;
pub use pack::PackGenerator;
pub use pack::PackPaths;
pub use sidecar::SidecarError;
pub use sidecar::sidecar_path_for;
pub use sidecar::validate_sidecar;
pub use validator::ManifestValidator;
