// crates/runproof-cli/src/lib.rs
// ============================================================================
// Module: RunProof CLI Library
// Description: Shared CLI helpers exposed to the runproof binary.
// Purpose: Host the localization catalog used by all CLI output.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//! The `runproof-cli` library target hosts the localization catalog and the
//! [`t!`](crate::t) macro consumed by the `runproof` binary. All user-facing
//! strings are routed through the catalog to enforce consistent messaging and
//! to prepare for future locales.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;
