// crates/runproof-core/tests/hashing.rs
// ============================================================================
// Module: Hashing Tests
// Description: Tests for digest computation and the flat digest wire form.
// ============================================================================
//! ## Overview
//! Validates SHA-256 vectors, streaming/file hashing equivalence, and the
//! fail-closed `Sha256Hex` parser.

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

use runproof_core::DEFAULT_HASH_ALGORITHM;
use runproof_core::Sha256Hex;
use runproof_core::canonical_json_bytes;
use runproof_core::hash_bytes;
use runproof_core::hash_canonical_json;
use runproof_core::hash_file;
use runproof_core::hash_reader;
use serde_json::json;

// ============================================================================
// SECTION: Known Vectors
// ============================================================================

#[test]
fn hashes_the_empty_input_vector() {
    let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, b"");
    assert_eq!(digest.value, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
}

#[test]
fn hashes_the_abc_vector() {
    let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, b"abc");
    assert_eq!(digest.value, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
}

// ============================================================================
// SECTION: Streaming Equivalence
// ============================================================================

#[test]
fn streaming_hash_matches_buffered_hash_across_chunk_boundaries() {
    // Larger than one 64 KiB chunk so the loop takes multiple reads.
    let payload: Vec<u8> = (0..200_000_u32).map(|i| u8::try_from(i % 251).unwrap()).collect();
    let buffered = hash_bytes(DEFAULT_HASH_ALGORITHM, &payload);

    let mut reader = payload.as_slice();
    let (streamed_len, streamed) = hash_reader(DEFAULT_HASH_ALGORITHM, &mut reader).unwrap();
    assert_eq!(streamed_len, 200_000);
    assert_eq!(streamed, buffered);
}

#[test]
fn file_hash_reports_exact_size_and_digest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.md");
    fs::write(&path, b"hello evidence").unwrap();

    let (bytes, digest) = hash_file(DEFAULT_HASH_ALGORITHM, &path).unwrap();
    assert_eq!(bytes, 14);
    assert_eq!(digest, hash_bytes(DEFAULT_HASH_ALGORITHM, b"hello evidence"));
}

#[test]
fn missing_files_surface_the_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vanished.json");
    assert!(hash_file(DEFAULT_HASH_ALGORITHM, &path).is_err());
}

// ============================================================================
// SECTION: Canonical JSON Hashing
// ============================================================================

#[test]
fn canonical_json_hashing_ignores_construction_order() {
    let first = json!({"b": 2, "a": 1});
    let second = json!({"a": 1, "b": 2});
    assert_eq!(
        hash_canonical_json(DEFAULT_HASH_ALGORITHM, &first).unwrap(),
        hash_canonical_json(DEFAULT_HASH_ALGORITHM, &second).unwrap()
    );
    assert_eq!(canonical_json_bytes(&first).unwrap(), br#"{"a":1,"b":2}"#);
}

// ============================================================================
// SECTION: Flat Digest Parsing
// ============================================================================

#[test]
fn parses_well_formed_digests() {
    let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, b"abc");
    let hex = Sha256Hex::parse(digest.value.clone()).unwrap();
    assert_eq!(hex.as_str(), digest.value);
    assert_eq!(digest.to_sha256_hex(), hex);
}

#[test]
fn rejects_malformed_digests() {
    let valid = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    assert!(Sha256Hex::parse(&valid[..63]).is_err());
    assert!(Sha256Hex::parse(format!("{valid}a")).is_err());
    assert!(Sha256Hex::parse(valid.to_uppercase()).is_err());
    assert!(Sha256Hex::parse(valid.replace('a', "g")).is_err());
}

#[test]
fn deserialization_applies_the_same_validation() {
    let valid = "\"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad\"";
    assert!(serde_json::from_str::<Sha256Hex>(valid).is_ok());
    let uppercase = valid.to_uppercase();
    assert!(serde_json::from_str::<Sha256Hex>(&uppercase).is_err());
}
