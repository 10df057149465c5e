//! A fast, allocation-free Monte Carlo estimator of draw-without-replacement probabilities.
//! Estimates the chance that a random draw from a labelled multiset (a hat of coloured balls)
//! contains at least a given number of balls of each label, and computes the same quantity
//! exactly for comparison.

pub mod comb;
pub mod composition;
pub mod experiment;
pub mod hat;
pub mod hypergeom;
pub mod probs;
pub mod scenario;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
