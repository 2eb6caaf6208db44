// crates/runproof-config/tests/config_validation.rs
// ============================================================================
// Module: Config Validation Tests
// Description: Tests for strict, fail-closed configuration parsing.
// ============================================================================
//! ## Overview
//! Validates defaults, the shipped example, unknown-field rejection, and
//! semantic validation of contract and manifest settings.

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

use runproof_config::ConfigError;
use runproof_config::RunproofConfig;
use runproof_config::config_toml_example;

// ============================================================================
// SECTION: Defaults and Example
// ============================================================================

#[test]
fn defaults_validate_and_build_report_indexing_tools() {
    let config = RunproofConfig::default();
    config.validate().unwrap();

    let builder = config.manifest_builder();
    let safelist = builder.safelist_extensions.unwrap();
    assert!(safelist.contains("json"));
    assert!(safelist.contains("md"));
    assert!(builder.exclude_names.contains("manifest.json"));

    let generator = config.pack_generator();
    assert_eq!(generator.manifest_name, "manifest.json");
    assert_eq!(config.index_aggregator().manifest_name, "manifest.json");
}

#[test]
fn the_shipped_example_parses_and_validates() {
    let config: RunproofConfig = toml::from_str(&config_toml_example()).unwrap();
    config.validate().unwrap();

    let contract = config.contract().unwrap();
    assert_eq!(contract.volatile_paths.len(), 2);
    assert_eq!(contract.numeric_tolerance.as_deref(), Some("0.000001"));
}

#[test]
fn loading_a_missing_default_config_falls_back_to_defaults() {
    // No explicit path and no runproof.toml in a scratch working directory
    // cannot be simulated without changing the process cwd, so exercise the
    // explicit-path error instead.
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("runproof.toml");
    assert!(matches!(RunproofConfig::load(Some(&missing)), Err(ConfigError::Io(_))));
}

#[test]
fn loads_an_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runproof.toml");
    fs::write(&path, config_toml_example()).unwrap();
    let config = RunproofConfig::load(Some(&path)).unwrap();
    assert_eq!(config.contract.volatile_paths, vec!["meta.generated_at", "meta.run_id"]);
}

// ============================================================================
// SECTION: Fail-Closed Parsing
// ============================================================================

#[test]
fn unknown_fields_are_rejected() {
    let result = toml::from_str::<RunproofConfig>("[manifest]\nsafelist = [\"json\"]\n");
    assert!(result.is_err());
    let result = toml::from_str::<RunproofConfig>("[surprise]\nvalue = 1\n");
    assert!(result.is_err());
}

#[test]
fn malformed_volatile_paths_fail_validation() {
    let config: RunproofConfig =
        toml::from_str("[contract]\nvolatile_paths = [\"meta..oops\"]\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn malformed_tolerances_fail_validation() {
    let config: RunproofConfig =
        toml::from_str("[contract]\nnumeric_tolerance = \"loose\"\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn non_alphanumeric_extensions_fail_validation() {
    let config: RunproofConfig =
        toml::from_str("[manifest]\nsafelist_extensions = [\".json\"]\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn path_like_manifest_names_fail_validation() {
    let config: RunproofConfig =
        toml::from_str("[pack]\nmanifest_name = \"nested/manifest.json\"\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

// ============================================================================
// SECTION: Derived Tools
// ============================================================================

#[test]
fn custom_manifest_names_propagate_to_pack_tools() {
    let config: RunproofConfig =
        toml::from_str("[pack]\nmanifest_name = \"evidence.json\"\n").unwrap();
    config.validate().unwrap();

    let generator = config.pack_generator();
    assert_eq!(generator.manifest_name, "evidence.json");
    assert!(generator.builder.exclude_names.contains("evidence.json"));
    assert!(generator.builder.exclude_names.contains("evidence.json.sha256"));
    assert_eq!(config.index_aggregator().manifest_name, "evidence.json");
}
