// crates/runproof-core/tests/proptest_canonical.rs
// ============================================================================
// Module: Canonicalizer Property-Based Tests
// Description: Property tests for canonical byte stability and comparison.
// Purpose: Detect panics and invariants across wide input ranges.
// ============================================================================

//! Property-based tests for canonicalizer and comparator invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use runproof_core::DeterminismContract;
use runproof_core::canonicalize;
use runproof_core::compare_reports;
use runproof_core::hash_canonical;
use serde_json::Value;

fn json_value_strategy(max_depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Number(v.into())),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(max_depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0 .. 4).prop_map(|map| {
                let mut object = serde_json::Map::new();
                for (key, value) in map {
                    object.insert(key, value);
                }
                Value::Object(object)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn canonicalization_is_idempotent(doc in json_value_strategy(4)) {
        let contract = DeterminismContract::default();
        let once = canonicalize(&doc, &contract).unwrap();
        let reparsed: Value = serde_json::from_slice(&once).unwrap();
        let twice = canonicalize(&reparsed, &contract).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn canonical_hashing_is_deterministic(doc in json_value_strategy(4)) {
        let contract = DeterminismContract::default();
        let first = hash_canonical(&doc, &contract).unwrap();
        let second = hash_canonical(&doc, &contract).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn round_tripped_documents_always_compare_as_match(doc in json_value_strategy(4)) {
        let contract = DeterminismContract::default();
        let bytes = canonicalize(&doc, &contract).unwrap();
        let reparsed: Value = serde_json::from_slice(&bytes).unwrap();
        let result = compare_reports(&doc, &reparsed, &contract).unwrap();
        prop_assert!(result.is_match());
    }

    #[test]
    fn comparison_is_symmetric_in_outcome(
        baseline in json_value_strategy(3),
        candidate in json_value_strategy(3),
    ) {
        let contract = DeterminismContract::default();
        let forward = compare_reports(&baseline, &candidate, &contract).unwrap();
        let backward = compare_reports(&candidate, &baseline, &contract).unwrap();
        prop_assert_eq!(forward.is_match(), backward.is_match());
    }
}
