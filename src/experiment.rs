//! Monte Carlo estimation of the probability that a draw from a [Hat] meets an expected
//! composition.
//!
//! Every trial starts from the hat's contents at the time of the call. The contents are copied
//! into a scratch buffer owned by the trial, so the caller's hat is never mutated and no memory
//! is allocated once the buffers have been sized.

use crate::composition::Composition;
use crate::hat::{draw_into, tally, Hat};
use crate::probs::Fraction;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use thiserror::Error;
use tinyrand::{Rand, Seeded, StdRand};
use tracing::{debug, trace};

#[cfg(test)]
mod tests;

/// Number of trials allotted to each task in [Experiment::simulate_par]. Fixed, so that the
/// outcome for a given seed does not depend on the size of the thread pool.
pub const PAR_CHUNK_TRIALS: u64 = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExperimentError {
    #[error("no experiments requested")]
    NoExperiments,
}

/// Estimates the probability that drawing `num_balls_drawn` balls from `hat` yields at least
/// `expected_balls.count(label)` of every expected label, over `num_experiments` trials.
pub fn experiment(
    hat: &Hat,
    expected_balls: &Composition,
    num_balls_drawn: usize,
    num_experiments: u64,
    rand: &mut impl Rand,
) -> Result<f64, ExperimentError> {
    Experiment::default()
        .with_expected(expected_balls)
        .with_draws(num_balls_drawn)
        .with_trials(num_experiments)
        .simulate(hat, rand)
        .map(|frac| frac.quotient())
}

#[derive(Debug, Clone, Default)]
pub struct Experiment<'a> {
    expected: Cow<'a, Composition>,
    draws: usize,
    trials: u64,
}
impl<'a> Experiment<'a> {
    pub fn with_expected(mut self, expected: impl Into<Cow<'a, Composition>>) -> Self {
        self.expected = expected.into();
        self
    }

    pub fn with_draws(mut self, draws: usize) -> Self {
        self.draws = draws;
        self
    }

    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    pub fn expected(&self) -> &Composition {
        &self.expected
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn validate(&self) -> Result<(), ExperimentError> {
        if self.trials == 0 {
            return Err(ExperimentError::NoExperiments);
        }
        Ok(())
    }

    /// Runs all trials on the calling thread, sourcing randomness from `rand`.
    pub fn simulate(&self, hat: &Hat, rand: &mut impl Rand) -> Result<Fraction, ExperimentError> {
        self.validate()?;
        let criteria = Criteria::resolve(hat, &self.expected);
        debug!(
            "simulating {} trials of {} draws from {} balls, expecting {}",
            self.trials,
            self.draws,
            hat.len(),
            self.expected
        );
        if !criteria.satisfiable {
            return Ok(self.unsatisfiable());
        }

        let mut trial = Trial::new(hat);
        let mut successes = 0;
        for _ in 0..self.trials {
            if trial.run(hat.ordinals(), self.draws, &criteria.minimums, rand) {
                successes += 1;
            }
        }
        Ok(Fraction {
            numerator: successes,
            denominator: self.trials,
        })
    }

    /// Runs the trials on the rayon thread pool in chunks of [PAR_CHUNK_TRIALS]. Each chunk
    /// draws from its own generator, seeded from `seed` and the chunk's index.
    pub fn simulate_par(&self, hat: &Hat, seed: u64) -> Result<Fraction, ExperimentError> {
        self.validate()?;
        let criteria = Criteria::resolve(hat, &self.expected);
        let chunks = self.trials.div_ceil(PAR_CHUNK_TRIALS);
        debug!(
            "simulating {} trials of {} draws from {} balls in {chunks} chunks, expecting {}",
            self.trials,
            self.draws,
            hat.len(),
            self.expected
        );
        if !criteria.satisfiable {
            return Ok(self.unsatisfiable());
        }

        let successes = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * PAR_CHUNK_TRIALS;
                let trials = u64::min(PAR_CHUNK_TRIALS, self.trials - start);
                let mut rand = StdRand::seed(chunk_seed(seed, chunk));
                let mut trial = Trial::new(hat);
                let mut successes = 0u64;
                for _ in 0..trials {
                    if trial.run(hat.ordinals(), self.draws, &criteria.minimums, &mut rand) {
                        successes += 1;
                    }
                }
                trace!("chunk {chunk}: {successes}/{trials}");
                successes
            })
            .sum::<u64>();
        Ok(Fraction {
            numerator: successes,
            denominator: self.trials,
        })
    }

    fn unsatisfiable(&self) -> Fraction {
        debug!("expectation {} cannot be met by the hat", self.expected);
        Fraction {
            numerator: 0,
            denominator: self.trials,
        }
    }
}

#[derive(Debug, PartialEq)]
struct Minimum {
    ordinal: usize,
    count: usize,
}

/// The expectation resolved against a hat's ordinals.
#[derive(Debug, PartialEq)]
struct Criteria {
    minimums: Vec<Minimum>,
    satisfiable: bool,
}
impl Criteria {
    fn resolve(hat: &Hat, expected: &Composition) -> Self {
        let ordinals: FxHashMap<_, _> = hat
            .labels()
            .iter()
            .enumerate()
            .map(|(ordinal, label)| (label.as_str(), ordinal))
            .collect();

        let mut minimums = Vec::with_capacity(expected.len());
        let mut satisfiable = true;
        for entry in expected.entries().iter().filter(|entry| entry.count > 0) {
            match ordinals.get(entry.label.as_str()) {
                Some(&ordinal) => minimums.push(Minimum {
                    ordinal,
                    count: entry.count,
                }),
                None => satisfiable = false,
            }
        }
        Self {
            minimums,
            satisfiable,
        }
    }
}

/// Scratch state for running trials against one hat.
struct Trial {
    pool: Vec<usize>,
    drawn: Vec<usize>,
    counts: Vec<usize>,
}
impl Trial {
    fn new(hat: &Hat) -> Self {
        Self {
            pool: Vec::with_capacity(hat.len()),
            drawn: Vec::with_capacity(hat.len()),
            counts: vec![0; hat.labels().len()],
        }
    }

    #[inline]
    fn run(&mut self, initial: &[usize], draws: usize, minimums: &[Minimum], rand: &mut impl Rand) -> bool {
        self.pool.clear();
        self.pool.extend_from_slice(initial);
        self.drawn.clear();
        draw_into(&mut self.pool, draws, rand, &mut self.drawn);

        self.counts.fill(0);
        tally(&self.drawn, &mut self.counts);
        minimums
            .iter()
            .all(|minimum| self.counts[minimum.ordinal] >= minimum.count)
    }
}

/// Mixes the chunk index into the seed with the SplitMix64 finaliser.
fn chunk_seed(seed: u64, chunk: u64) -> u64 {
    let mut z = seed ^ chunk.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
