// crates/runproof-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Unit Tests
// Description: Tests for argument parsing and CLI helper behavior.
// ============================================================================
//! ## Overview
//! Validates clap wiring, timestamp resolution, size-limited reads, and
//! canonical document output.

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

use std::collections::BTreeMap;
use std::fs;

use runproof_cli::i18n::Locale;
use runproof_cli::t;

use super::*;

// ============================================================================
// SECTION: Argument Parsing
// ============================================================================

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn parses_manifest_validate_with_repeated_requires() {
    let cli = Cli::parse_from([
        "runproof",
        "manifest",
        "validate",
        "--root",
        "reports",
        "--index",
        "manifest.json",
        "--out",
        "report.json",
        "--require",
        "summary.json",
        "--require",
        "trend.csv",
    ]);
    match cli.command {
        Some(Commands::Manifest {
            command: ManifestCommand::Validate(command),
        }) => {
            assert_eq!(command.require, vec!["summary.json", "trend.csv"]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_pack_generate_deterministic_flags() {
    let cli = Cli::parse_from([
        "runproof",
        "pack",
        "generate",
        "--base-dir",
        "runs",
        "--input",
        "runs/2026-08-05",
        "--out-root",
        "packs",
        "--pack-id",
        "run-0001",
        "--deterministic",
        "--created-at",
        "2026-08-05T00:00:00Z",
    ]);
    match cli.command {
        Some(Commands::Pack {
            command: PackCommand::Generate(command),
        }) => {
            assert!(command.deterministic);
            assert_eq!(command.created_at.as_deref(), Some("2026-08-05T00:00:00Z"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

// ============================================================================
// SECTION: Timestamp Resolution
// ============================================================================

#[test]
fn resolve_generated_at_keeps_explicit_values() {
    let resolved = resolve_generated_at(Some("2026-08-05T12:00:00Z")).unwrap();
    assert_eq!(resolved, "2026-08-05T12:00:00Z");
}

#[test]
fn resolve_generated_at_rejects_malformed_values() {
    assert!(resolve_generated_at(Some("yesterday")).is_err());
    assert!(resolve_generated_at(Some("2026-08-05")).is_err());
}

#[test]
fn resolve_generated_at_produces_parseable_wall_clock_values() {
    let resolved = resolve_generated_at(None).unwrap();
    assert!(parse_rfc3339(&resolved).is_ok());
}

// ============================================================================
// SECTION: Size-Limited Reads
// ============================================================================

#[test]
fn read_bytes_with_limit_rejects_oversize_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.json");
    fs::write(&path, vec![b'x'; 64]).unwrap();
    match read_bytes_with_limit(&path, 16) {
        Err(ReadLimitError::TooLarge {
            size,
            limit,
        }) => {
            assert_eq!(size, 64);
            assert_eq!(limit, 16);
        }
        _ => panic!("expected TooLarge"),
    }
}

#[test]
fn read_bytes_with_limit_reads_small_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.json");
    fs::write(&path, b"{}").unwrap();
    let bytes = read_bytes_with_limit(&path, 16).unwrap();
    assert_eq!(bytes, b"{}");
}

// ============================================================================
// SECTION: Canonical Output
// ============================================================================

#[test]
fn write_canonical_document_sorts_keys_and_appends_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/doc.json");
    let mut value = BTreeMap::new();
    value.insert("zeta", 1_u64);
    value.insert("alpha", 2_u64);
    write_canonical_document(&path, &value, "document").unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, "{\"alpha\":2,\"zeta\":1}\n");
}

#[test]
fn render_compare_value_handles_absent_sides() {
    assert_eq!(render_compare_value(None), t!("compare.value.absent"));
    let value = serde_json::json!({"a": 1});
    assert_eq!(render_compare_value(Some(&value)), "{\"a\":1}");
}

// ============================================================================
// SECTION: Localization
// ============================================================================

#[test]
fn locale_parse_accepts_region_tags() {
    assert_eq!(Locale::parse("en-US"), Some(Locale::En));
    assert_eq!(Locale::parse("ca_ES"), Some(Locale::Ca));
    assert_eq!(Locale::parse("fr"), None);
    assert_eq!(Locale::parse(""), None);
}

#[test]
fn translate_substitutes_named_placeholders() {
    let message = t!("input.read_failed", kind = "document", path = "a.json", error = "gone");
    assert!(message.contains("document"));
    assert!(message.contains("a.json"));
    assert!(message.contains("gone"));
}

#[test]
fn translate_falls_back_to_key_for_unknown_entries() {
    let message = runproof_cli::i18n::translate("does.not.exist", Vec::new());
    assert_eq!(message, "does.not.exist");
}
