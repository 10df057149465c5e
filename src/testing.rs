//! Testing helpers.

use crate::probs::Fraction;
use assert_float_eq::*;

/// Asserts that an estimate lies within `tolerance` of the exact probability.
pub fn assert_estimate(exact: f64, estimate: &Fraction, tolerance: f64) {
    assert_probability(estimate.quotient());
    assert_float_absolute_eq!(exact, estimate.quotient(), tolerance);
}

pub fn assert_probability(value: f64) {
    assert!((0.0..=1.0).contains(&value), "{value} is not a probability");
}
