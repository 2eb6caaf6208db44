// crates/runproof-core/tests/pack.rs
// ============================================================================
// Module: Evidence Pack Tests
// Description: Tests for pack generation, relocation, and tamper detection.
// ============================================================================
//! ## Overview
//! Validates pack round trips, relocatability across base directories,
//! deterministic regeneration, and fail-closed handling of tampering.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;

use runproof_core::PackError;
use runproof_core::PackGenerator;
use runproof_core::PackPaths;

// ============================================================================
// SECTION: Constants
// ============================================================================

const CREATED_AT: &str = "2026-08-05T06:00:00Z";

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn write_file(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn seed_input(base: &Path) {
    write_file(base, "reports/run-1/summary.json", br#"{"ok":true,"pnl":125}"#);
    write_file(base, "reports/run-1/trend.csv", b"day,score\n1,9\n");
    write_file(base, "reports/run-1/raw/ticks.bin", b"\x00\x01\x02");
}

fn generate(base: &Path, out_root: &Path, pack_id: &str) -> PackPaths {
    PackGenerator::default()
        .generate(
            base,
            &base.join("reports/run-1"),
            out_root,
            pack_id,
            CREATED_AT,
            Some("2026-08-05"),
        )
        .unwrap()
}

// ============================================================================
// SECTION: Round Trip
// ============================================================================

#[test]
fn a_generated_pack_validates_clean() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    let paths = generate(dir.path(), &dir.path().join("packs"), "run-0001");

    assert!(paths.manifest_path.is_file());
    assert!(paths.sidecar_path.is_file());

    let report = PackGenerator::default().validate_pack(&paths.manifest_path).unwrap();
    assert!(report.ok, "unexpected errors: {:?}", report.errors);
    assert_eq!(report.checked_entries, 3);
    assert_eq!(report.run_date.as_deref(), Some("2026-08-05"));
}

#[test]
fn entry_paths_preserve_the_layout_relative_to_the_base() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    let paths = generate(dir.path(), &dir.path().join("packs"), "run-0001");

    let bytes = fs::read(&paths.manifest_path).unwrap();
    let manifest: runproof_core::EvidenceManifest = serde_json::from_slice(&bytes).unwrap();
    let entry_paths: Vec<&str> =
        manifest.entries.iter().map(|entry| entry.path.as_str()).collect();
    assert_eq!(
        entry_paths,
        vec![
            "reports/run-1/raw/ticks.bin",
            "reports/run-1/summary.json",
            "reports/run-1/trend.csv",
        ]
    );
    assert_eq!(manifest.base_dir, ".");
    assert_eq!(manifest.generated_at.as_deref(), Some(CREATED_AT));
}

// ============================================================================
// SECTION: Relocatability
// ============================================================================

#[test]
fn a_moved_pack_still_validates_clean() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    let paths = generate(dir.path(), &dir.path().join("packs"), "run-0001");

    let relocated_root = dir.path().join("elsewhere/deep");
    fs::create_dir_all(&relocated_root).unwrap();
    let relocated = relocated_root.join("run-0001");
    fs::rename(&paths.pack_dir, &relocated).unwrap();

    let report = PackGenerator::default()
        .validate_pack(&relocated.join("manifest.json"))
        .unwrap();
    assert!(report.ok, "unexpected errors: {:?}", report.errors);
}

#[test]
fn manifests_contain_no_absolute_paths() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    let paths = generate(dir.path(), &dir.path().join("packs"), "run-0001");

    let text = fs::read_to_string(&paths.manifest_path).unwrap();
    let root_text = dir.path().to_string_lossy().to_string();
    assert!(!text.contains(&root_text), "manifest leaked the build machine root: {text}");
}

// ============================================================================
// SECTION: Determinism
// ============================================================================

#[test]
fn pinned_timestamps_yield_byte_identical_manifests() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    let first = generate(dir.path(), &dir.path().join("packs-a"), "fixed");
    let second = generate(dir.path(), &dir.path().join("packs-b"), "fixed");

    let first_bytes = fs::read(&first.manifest_path).unwrap();
    let second_bytes = fs::read(&second.manifest_path).unwrap();
    assert_eq!(first_bytes, second_bytes);

    let first_sidecar = fs::read(&first.sidecar_path).unwrap();
    let second_sidecar = fs::read(&second.sidecar_path).unwrap();
    assert_eq!(first_sidecar, second_sidecar);
}

// ============================================================================
// SECTION: Tamper Detection
// ============================================================================

#[test]
fn editing_a_packed_file_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    let paths = generate(dir.path(), &dir.path().join("packs"), "run-0001");

    let target = paths.pack_dir.join("reports/run-1/trend.csv");
    fs::write(&target, b"day,score\n1,0\n").unwrap();

    let report = PackGenerator::default().validate_pack(&paths.manifest_path).unwrap();
    assert!(!report.ok);
    assert_eq!(report.errors, vec!["sha256 mismatch for reports/run-1/trend.csv".to_string()]);
}

#[test]
fn rewriting_the_manifest_is_caught_by_its_sidecar_digest() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    let paths = generate(dir.path(), &dir.path().join("packs"), "run-0001");

    // Push the recorded run date forward without touching the sidecar.
    let mut text = fs::read_to_string(&paths.manifest_path).unwrap();
    text = text.replace("2026-08-05", "2026-08-06");
    fs::write(&paths.manifest_path, text).unwrap();

    let report = PackGenerator::default().validate_pack(&paths.manifest_path).unwrap();
    assert!(!report.ok);
    assert!(report.errors.iter().any(|error| error == "sha256 mismatch for manifest.json"));
}

#[test]
fn a_rewritten_sidecar_is_rejected_before_any_hashing() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    let paths = generate(dir.path(), &dir.path().join("packs"), "run-0001");

    fs::write(&paths.sidecar_path, b"trust me\n").unwrap();
    let result = PackGenerator::default().validate_pack(&paths.manifest_path);
    assert!(matches!(result, Err(PackError::Sidecar(_))));
}

// ============================================================================
// SECTION: Generation Failures
// ============================================================================

#[test]
fn refuses_to_overwrite_an_existing_pack() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    let out_root = dir.path().join("packs");
    generate(dir.path(), &out_root, "run-0001");

    let result = PackGenerator::default().generate(
        dir.path(),
        &dir.path().join("reports/run-1"),
        &out_root,
        "run-0001",
        CREATED_AT,
        None,
    );
    assert!(matches!(result, Err(PackError::PackExists { .. })));
}

#[test]
fn refuses_inputs_outside_the_base_directory() {
    let base = tempfile::tempdir().unwrap();
    let outside = tempfile::tempdir().unwrap();
    fs::write(outside.path().join("stray.json"), b"{}").unwrap();

    let result = PackGenerator::default().generate(
        base.path(),
        outside.path(),
        &base.path().join("packs"),
        "run-0001",
        CREATED_AT,
        None,
    );
    assert!(matches!(result, Err(PackError::InputOutsideBase { .. })));
}

#[test]
fn rejects_hostile_pack_ids() {
    let dir = tempfile::tempdir().unwrap();
    seed_input(dir.path());
    for pack_id in ["", "..", "a/b", "run 1", ".hidden"] {
        let result = PackGenerator::default().generate(
            dir.path(),
            &dir.path().join("reports/run-1"),
            &dir.path().join("packs"),
            pack_id,
            CREATED_AT,
            None,
        );
        assert!(
            matches!(result, Err(PackError::InvalidPackId { .. })),
            "expected rejection for {pack_id:?}"
        );
    }
}
