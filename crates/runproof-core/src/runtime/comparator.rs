// crates/runproof-core/src/runtime/comparator.rs
// ============================================================================
// Module: RunProof Determinism Comparator
// Description: First-divergence comparison of canonicalized reports.
// Purpose: Certify two independently generated reports identical modulo contract.
// Dependencies: crate::core::canonical, bigdecimal, serde_json
// ============================================================================

//! ## Overview
//! The comparator canonicalizes two reports under one determinism contract
//! and walks both trees lock-step in sorted key order, returning the first
//! path at which they differ. Callers need a single actionable discrepancy,
//! not an exhaustive tree diff. Numbers within the contract's decimal
//! tolerance compare equal; the tolerance never applies to hashing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeSet;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;
use serde_json::Value;

use crate::core::canonical::CanonicalError;
use crate::core::canonical::DeterminismContract;
use crate::core::canonical::canonicalize;
use crate::core::canonical::canonicalize_value;

// ============================================================================
// SECTION: Comparison Result
// ============================================================================

/// Outcome of comparing two canonicalized reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ComparisonResult {
    /// The reports canonicalize to identical content.
    Match,
    /// The reports differ, first at `path`.
    Divergence {
        /// Dot/bracket path of the first divergence (`$` for the root).
        path: String,
        /// Baseline value at the path; absent when the path only exists in
        /// the candidate.
        baseline: Option<Value>,
        /// Candidate value at the path; absent when the path only exists in
        /// the baseline.
        candidate: Option<Value>,
    },
}

impl ComparisonResult {
    /// Returns true when the reports matched.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

// ============================================================================
// SECTION: Comparison
// ============================================================================

/// Compares two reports under a determinism contract.
///
/// Both documents are canonicalized (volatile paths stripped) before the
/// walk, so volatility in non-substantive fields is excluded via the
/// contract, not ignored by accident.
///
/// # Errors
///
/// Returns [`CanonicalError`] when the contract's tolerance is malformed or
/// either document cannot be canonicalized.
pub fn compare_reports(
    baseline: &Value,
    candidate: &Value,
    contract: &DeterminismContract,
) -> Result<ComparisonResult, CanonicalError> {
    let tolerance = contract.tolerance()?;
    if canonicalize(baseline, contract)? == canonicalize(candidate, contract)? {
        return Ok(ComparisonResult::Match);
    }
    let baseline = canonicalize_value(baseline, contract);
    let candidate = canonicalize_value(candidate, contract);

    match first_divergence(&baseline, &candidate, "", tolerance.as_ref()) {
        None => Ok(ComparisonResult::Match),
        Some((path, baseline, candidate)) => Ok(ComparisonResult::Divergence {
            path,
            baseline,
            candidate,
        }),
    }
}

/// Finds the first divergence between two values in sorted key order.
///
/// Returns the exact leaf path, not an ancestor or descendant: equal-typed
/// containers are descended into, and only a genuinely differing location is
/// reported.
fn first_divergence(
    baseline: &Value,
    candidate: &Value,
    path: &str,
    tolerance: Option<&BigDecimal>,
) -> Option<(String, Option<Value>, Option<Value>)> {
    match (baseline, candidate) {
        (Value::Object(left), Value::Object(right)) => {
            let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
            for key in keys {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                match (left.get(key), right.get(key)) {
                    (Some(a), Some(b)) => {
                        if let Some(found) = first_divergence(a, b, &child_path, tolerance) {
                            return Some(found);
                        }
                    }
                    (Some(a), None) => return Some((child_path, Some(a.clone()), None)),
                    (None, Some(b)) => return Some((child_path, None, Some(b.clone()))),
                    (None, None) => {}
                }
            }
            None
        }
        (Value::Array(left), Value::Array(right)) => {
            let length = left.len().max(right.len());
            for index in 0..length {
                let child_path = format!("{path}[{index}]");
                match (left.get(index), right.get(index)) {
                    (Some(a), Some(b)) => {
                        if let Some(found) = first_divergence(a, b, &child_path, tolerance) {
                            return Some(found);
                        }
                    }
                    (Some(a), None) => return Some((child_path, Some(a.clone()), None)),
                    (None, Some(b)) => return Some((child_path, None, Some(b.clone()))),
                    (None, None) => {}
                }
            }
            None
        }
        (Value::Number(left), Value::Number(right)) => {
            if numbers_equal(left, right, tolerance) {
                None
            } else {
                Some((
                    render_path(path),
                    Some(Value::Number(left.clone())),
                    Some(Value::Number(right.clone())),
                ))
            }
        }
        (left, right) => {
            if left == right {
                None
            } else {
                Some((render_path(path), Some(left.clone()), Some(right.clone())))
            }
        }
    }
}

/// Compares two numbers as exact decimals, applying the tolerance when
/// present.
///
/// Decimal comparison keeps representation noise (`1` versus `1.0`) from
/// registering as a divergence; the canonical byte form already renders both
/// identically.
fn numbers_equal(left: &Number, right: &Number, tolerance: Option<&BigDecimal>) -> bool {
    if left == right {
        return true;
    }
    let (Ok(left), Ok(right)) =
        (left.to_string().parse::<BigDecimal>(), right.to_string().parse::<BigDecimal>())
    else {
        return false;
    };
    match tolerance {
        None => left == right,
        Some(tolerance) => {
            let delta = (left - right).abs();
            delta.cmp(tolerance) != Ordering::Greater
        }
    }
}

/// Renders a leaf path, mapping the empty root path to `$`.
fn render_path(path: &str) -> String {
    if path.is_empty() { "$".to_string() } else { path.to_string() }
}
