//! Utilities for working with probabilities.

use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign};

/// An empirical probability: the number of successful trials over the number of trials run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fraction {
    pub numerator: u64,
    pub denominator: u64,
}
impl Fraction {
    pub fn quotient(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Standard error of the quotient, treating each trial as a Bernoulli sample.
    pub fn std_error(&self) -> f64 {
        let p = self.quotient();
        f64::sqrt(p * (1.0 - p) / self.denominator as f64)
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Self) -> Self::Output {
        Fraction {
            numerator: self.numerator + rhs.numerator,
            denominator: self.denominator + rhs.denominator,
        }
    }
}

impl AddAssign for Fraction {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
