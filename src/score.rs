//! Value scoring: the order-preserving embedding behind every index.
//!
//! Sorted indexes key their members by a single f64 score. Numbers score as
//! themselves; strings are embedded into `[0, 1)` as base-27 fractional
//! numerals so that lexicographic order over lower-case alphabetic strings
//! maps to numeric order over scores.

use crate::error::{Result, SorrelError};
use crate::value::Value;

/// Score a string as a base-27 fractional numeral.
///
/// The string is lower-cased and each byte at position `i` contributes
/// `(byte - b'a' + 1) / 27^(i + 1)`, giving digits 1..=26 for letters.
/// Bytes outside `'a'..='z'` after case-folding produce out-of-range
/// digits; indexed string fields are expected to hold alphabetic content.
///
/// f64 precision bounds the distinguishable prefix to roughly 15-17
/// base-27 digits; strings sharing a longer prefix score identically.
pub fn string_score(s: &str) -> f64 {
    let mut mult = 1.0;
    let mut score = 0.0;
    for b in s.to_lowercase().bytes() {
        mult /= 27.0;
        score += f64::from(i32::from(b) - i32::from(b'a') + 1) * mult;
    }
    score
}

/// Score any supported value.
///
/// Strings score via [`string_score`], integers and floats project to f64.
/// Booleans and nulls have no natural order and fail with
/// [`SorrelError::UnscorableValue`].
pub fn score(value: &Value) -> Result<f64> {
    match value {
        Value::Str(s) => Ok(string_score(s)),
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        other => Err(SorrelError::unscorable(other.kind())),
    }
}

/// Half-open score window `[lo, hi)` containing exactly the strings whose
/// first `prefix.len()` bytes equal `prefix` (case-folded).
pub fn prefix_window(prefix: &str) -> (f64, f64) {
    let lo = string_score(prefix);
    let hi = lo + 27f64.powi(-(prefix.len() as i32));
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_score_orders_lexicographically() {
        let words = ["alec", "alice", "bob", "eamon", "john", "vikram"];
        for pair in words.windows(2) {
            assert!(
                string_score(pair[0]) < string_score(pair[1]),
                "{} should score below {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_string_score_is_deterministic() {
        assert_eq!(string_score("alice"), string_score("alice"));
    }

    #[test]
    fn test_string_score_case_folds() {
        assert_eq!(string_score("Alice"), string_score("alice"));
    }

    #[test]
    fn test_string_score_stays_in_unit_interval() {
        for s in ["", "a", "z", "zzzzzzzzzz"] {
            let scr = string_score(s);
            assert!((0.0..1.0).contains(&scr), "score({s}) = {scr}");
        }
    }

    #[test]
    fn test_prefix_comparison_resolves_on_divergence() {
        assert!(string_score("car") < string_score("cart"));
        assert!(string_score("cart") < string_score("cat"));
    }

    #[test]
    fn test_score_numeric_values() {
        assert_eq!(score(&Value::Int(25)).unwrap(), 25.0);
        assert_eq!(score(&Value::Float(2.5)).unwrap(), 2.5);
    }

    #[test]
    fn test_score_rejects_unorderable_values() {
        assert!(matches!(
            score(&Value::Bool(true)),
            Err(SorrelError::UnscorableValue(_))
        ));
        assert!(matches!(
            score(&Value::Null),
            Err(SorrelError::UnscorableValue(_))
        ));
    }

    #[test]
    fn test_prefix_window_contains_extensions_only() {
        let (lo, hi) = prefix_window("ca");
        for inside in ["ca", "car", "cat", "cazzz"] {
            let s = string_score(inside);
            assert!(lo <= s && s < hi, "'{inside}' should fall inside");
        }
        for outside in ["c", "cb", "b", "d", "bz"] {
            let s = string_score(outside);
            assert!(s < lo || s >= hi, "'{outside}' should fall outside");
        }
    }
}
