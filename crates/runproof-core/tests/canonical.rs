// crates/runproof-core/tests/canonical.rs
// ============================================================================
// Module: Canonicalizer Tests
// Description: Tests for deterministic canonicalization and contracts.
// ============================================================================
//! ## Overview
//! Validates canonical byte stability, idempotence, volatile path stripping,
//! and the key path grammar.

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

use runproof_core::CanonicalError;
use runproof_core::DeterminismContract;
use runproof_core::KeyPath;
use runproof_core::KeySegment;
use runproof_core::canonicalize;
use runproof_core::canonicalize_serialize;
use runproof_core::canonicalize_value;
use runproof_core::hash_canonical;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn contract_with(paths: &[&str]) -> DeterminismContract {
    let paths: Vec<String> = paths.iter().map(ToString::to_string).collect();
    DeterminismContract::from_parts(&paths, None).unwrap()
}

// ============================================================================
// SECTION: Canonical Bytes
// ============================================================================

#[test]
fn canonical_bytes_sort_mapping_keys_at_every_level() {
    let doc = json!({"z": {"b": 1, "a": 2}, "a": [3, 1, 2]});
    let bytes = canonicalize(&doc, &DeterminismContract::default()).unwrap();
    assert_eq!(bytes, br#"{"a":[3,1,2],"z":{"a":2,"b":1}}"#);
}

#[test]
fn canonical_bytes_are_order_invariant() {
    let first: Value =
        serde_json::from_str(r#"{"gamma": 1, "alpha": {"y": 2, "x": 3}, "beta": [1, 2]}"#).unwrap();
    let second: Value =
        serde_json::from_str(r#"{"beta": [1, 2], "alpha": {"x": 3, "y": 2}, "gamma": 1}"#).unwrap();
    let contract = DeterminismContract::default();
    assert_eq!(canonicalize(&first, &contract).unwrap(), canonicalize(&second, &contract).unwrap());
}

#[test]
fn canonicalization_is_idempotent() {
    let doc = json!({
        "meta": {"run_id": "r-77", "symbols": ["ES", "NQ"]},
        "signals": [{"name": "carry", "score": 12}],
    });
    let contract = contract_with(&["meta.run_id"]);
    let once = canonicalize(&doc, &contract).unwrap();
    let reparsed: Value = serde_json::from_slice(&once).unwrap();
    let twice = canonicalize(&reparsed, &contract).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn sequence_order_is_preserved() {
    let doc = json!([3, 1, 2]);
    let bytes = canonicalize(&doc, &DeterminismContract::default()).unwrap();
    assert_eq!(bytes, b"[3,1,2]");
}

#[test]
fn hash_canonical_is_stable_across_construction_order() {
    let first = json!({"b": 2, "a": 1});
    let second = json!({"a": 1, "b": 2});
    let contract = DeterminismContract::default();
    assert_eq!(
        hash_canonical(&first, &contract).unwrap(),
        hash_canonical(&second, &contract).unwrap()
    );
}

// ============================================================================
// SECTION: Volatile Paths
// ============================================================================

#[test]
fn volatile_mapping_keys_are_stripped() {
    let doc = json!({"meta": {"generated_at": "2026-08-05T00:00:00Z", "rows": 3}, "ok": true});
    let contract = contract_with(&["meta.generated_at"]);
    let redacted = canonicalize_value(&doc, &contract);
    assert_eq!(redacted, json!({"meta": {"rows": 3}, "ok": true}));
}

#[test]
fn volatile_sequence_slots_are_nulled_in_place() {
    let doc = json!({"runs": [{"id": "a"}, {"id": "b"}, {"id": "c"}]});
    let contract = contract_with(&["runs[1]"]);
    let redacted = canonicalize_value(&doc, &contract);
    assert_eq!(redacted, json!({"runs": [{"id": "a"}, null, {"id": "c"}]}));
}

#[test]
fn absent_volatile_paths_are_a_no_op() {
    let doc = json!({"ok": true});
    let contract = contract_with(&["meta.generated_at", "runs[4].id"]);
    assert_eq!(canonicalize_value(&doc, &contract), doc);
}

#[test]
fn stripping_changes_the_hash_only_when_the_path_exists() {
    let doc = json!({"meta": {"run_id": "r-1"}, "payload": 7});
    let plain = DeterminismContract::default();
    let stripped = contract_with(&["meta.run_id"]);
    assert_ne!(hash_canonical(&doc, &plain).unwrap(), hash_canonical(&doc, &stripped).unwrap());
}

// ============================================================================
// SECTION: Key Path Grammar
// ============================================================================

#[test]
fn key_path_round_trips_through_display() {
    for text in ["meta.generated_at", "runs[2].id", "a.b[0][1].c"] {
        let path = KeyPath::parse(text).unwrap();
        assert_eq!(path.to_string(), text);
    }
}

#[test]
fn key_path_exposes_parsed_segments() {
    let path = KeyPath::parse("runs[2].id").unwrap();
    assert_eq!(
        path.segments(),
        &[
            KeySegment::Key("runs".to_string()),
            KeySegment::Index(2),
            KeySegment::Key("id".to_string()),
        ]
    );
}

#[test]
fn key_path_rejects_malformed_input() {
    for text in ["", ".", "a..b", "[0]", "a[", "a[]", "a[x]", "a[1", "a.b."] {
        assert!(KeyPath::parse(text).is_err(), "expected rejection for {text:?}");
    }
}

#[test]
fn contract_rejects_malformed_tolerance() {
    let result = DeterminismContract::from_parts(&[], Some("not-a-number".to_string()));
    assert!(matches!(result, Err(CanonicalError::InvalidTolerance { .. })));
}

// ============================================================================
// SECTION: Boundary Rejection
// ============================================================================

#[test]
fn non_string_mapping_keys_are_rejected_not_coerced() {
    let mut doc: BTreeMap<(u8, u8), u8> = BTreeMap::new();
    doc.insert((1, 2), 3);
    let result = canonicalize_serialize(&doc, &DeterminismContract::default());
    assert!(matches!(result, Err(CanonicalError::Serialize { .. })));
}

#[test]
fn serializable_structs_canonicalize_through_the_document_model() {
    #[derive(serde::Serialize)]
    struct Summary {
        zeta: u64,
        alpha: u64,
    }
    let bytes = canonicalize_serialize(
        &Summary {
            zeta: 1,
            alpha: 2,
        },
        &DeterminismContract::default(),
    )
    .unwrap();
    assert_eq!(bytes, br#"{"alpha":2,"zeta":1}"#);
}
