//! Exact probabilities of draws without replacement, from the multivariate hypergeometric
//! distribution. Serves as ground truth for the Monte Carlo estimates in [experiment](crate::experiment).

use crate::comb::{ln_add, LnFactorials};
use crate::composition::Composition;
use tracing::trace;

/// The probability that drawing `draws` balls from a hat with the composition `hat` yields at
/// least `expected.count(label)` balls of every label in `expected`. As with
/// [Hat::draw](crate::hat::Hat::draw), a draw larger than the hat takes every ball.
///
/// Labels in `expected` with a zero minimum impose no constraint. Labels not in `expected` are
/// pooled together. The constrained labels are folded in one at a time: after each fold,
/// `ways[d]` holds the (log) number of ways of drawing `d` balls from the labels seen so far while
/// meeting their minimums. The work is bounded by labels × draws × count, and all counts are kept
/// in log space so that large hats do not overflow.
pub fn probability(hat: &Composition, expected: &Composition, draws: usize) -> f64 {
    let total = hat.total();
    let draws = usize::min(draws, total);

    let mut constraints = Vec::with_capacity(expected.len());
    for entry in expected.entries().iter().filter(|entry| entry.count > 0) {
        let count = hat.count(&entry.label);
        if entry.count > count {
            trace!("cannot draw {} of '{}' from {count}", entry.count, entry.label);
            return 0.0;
        }
        constraints.push((entry.count, count));
    }
    if constraints.iter().map(|&(minimum, _)| minimum).sum::<usize>() > draws {
        return 0.0;
    }

    let factorials = LnFactorials::new(total);
    let mut ways = vec![f64::NEG_INFINITY; draws + 1];
    let mut folded = vec![f64::NEG_INFINITY; draws + 1];
    ways[0] = 0.0;
    let mut constrained = 0;
    for &(minimum, count) in &constraints {
        folded.fill(f64::NEG_INFINITY);
        for (drawn, &ln_ways) in ways.iter().enumerate() {
            if ln_ways == f64::NEG_INFINITY {
                continue;
            }
            for k in minimum..=usize::min(count, draws - drawn) {
                let ln_term = ln_ways + factorials.ln_binomial(count, k);
                folded[drawn + k] = ln_add(folded[drawn + k], ln_term);
            }
        }
        std::mem::swap(&mut ways, &mut folded);
        constrained += count;
    }

    let rest = total - constrained;
    let mut favourable = f64::NEG_INFINITY;
    for (drawn, &ln_ways) in ways.iter().enumerate() {
        favourable = ln_add(favourable, ln_ways + factorials.ln_binomial(rest, draws - drawn));
    }
    trace!("folded {} constraints over {draws} draws", constraints.len());
    (favourable - factorials.ln_binomial(total, draws))
        .exp()
        .clamp(0.0, 1.0)
}
