//! Combinatorics, in log space so that counts over large hats stay finite.

/// Natural logarithms of _n_! for every _n_ up to a fixed bound.
#[derive(Debug, Clone)]
pub struct LnFactorials {
    entries: Vec<f64>,
}
impl LnFactorials {
    /// Tabulates ln(_n_!) for `n` in `0..=max`.
    pub fn new(max: usize) -> Self {
        let mut entries = Vec::with_capacity(max + 1);
        entries.push(0.0);
        for i in 1..=max {
            entries.push(entries[i - 1] + (i as f64).ln());
        }
        Self { entries }
    }

    /// Largest _n_ for which ln(_n_!) is available.
    pub fn max(&self) -> usize {
        self.entries.len() - 1
    }

    #[inline]
    pub fn get(&self, n: usize) -> f64 {
        self.entries[n]
    }

    /// ln of the binomial coefficient _n_ choose _k_, or negative infinity if `k > n`.
    #[inline]
    pub fn ln_binomial(&self, n: usize, k: usize) -> f64 {
        if k > n {
            return f64::NEG_INFINITY;
        }
        self.entries[n] - self.entries[k] - self.entries[n - k]
    }
}

/// ln(e^a + e^b), tolerating negative infinity in either argument.
#[inline]
pub fn ln_add(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let (max, min) = if a > b { (a, b) } else { (b, a) };
    max + (min - max).exp().ln_1p()
}
