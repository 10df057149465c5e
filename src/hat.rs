//! The [Hat] is a multiset of labelled balls supporting randomised draws without replacement.
//!
//! Balls are stored as ordinals into the hat's table of distinct labels, so that a draw can be
//! performed and tallied without touching the labels themselves. [draw_into] is the
//! allocation-free primitive; the experiment runner applies it to its own scratch buffers.

use crate::composition::Composition;
use tinyrand::Rand;

#[derive(Debug, Clone, PartialEq)]
pub struct Hat {
    labels: Vec<String>,
    contents: Vec<usize>,
}
impl Hat {
    /// Expands a composition into a hat, replicating each label by its count in entry order.
    /// Labels with a zero count are known to the hat but contribute no balls.
    pub fn new(composition: &Composition) -> Self {
        let mut labels = Vec::with_capacity(composition.len());
        let mut contents = Vec::with_capacity(composition.total());
        for (ordinal, entry) in composition.entries().iter().enumerate() {
            labels.push(entry.label.clone());
            contents.extend(std::iter::repeat(ordinal).take(entry.count));
        }
        Self { labels, contents }
    }

    /// Distinct labels, indexed by ordinal.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn ordinal(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|existing| existing == label)
    }

    /// The remaining balls, as ordinals into [labels](Self::labels).
    pub fn ordinals(&self) -> &[usize] {
        &self.contents
    }

    /// The remaining balls, as labels.
    pub fn contents(&self) -> impl Iterator<Item = &str> + '_ {
        self.contents
            .iter()
            .map(|&ordinal| self.labels[ordinal].as_str())
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Current counts per label, in ordinal order.
    pub fn composition(&self) -> Composition {
        let mut counts = vec![0; self.labels.len()];
        tally(&self.contents, &mut counts);
        Composition::try_from_pairs(self.labels.iter().cloned().zip(counts))
            .expect("labels were validated on construction")
    }

    /// Draws up to `balls` balls, returning their labels in the order drawn. Requesting at least
    /// as many balls as remain empties the hat.
    pub fn draw(&mut self, balls: usize, rand: &mut impl Rand) -> Vec<String> {
        let mut drawn = Vec::with_capacity(usize::min(balls, self.contents.len()));
        self.draw_into(balls, rand, &mut drawn);
        drawn
            .into_iter()
            .map(|ordinal| self.labels[ordinal].clone())
            .collect()
    }

    /// As [draw](Self::draw), appending ordinals to `drawn` instead of allocating labels.
    pub fn draw_into(&mut self, balls: usize, rand: &mut impl Rand, drawn: &mut Vec<usize>) {
        draw_into(&mut self.contents, balls, rand, drawn);
    }
}

/// Removes `balls` elements from `contents` uniformly at random, appending them to `drawn` in the
/// order they were picked. If `balls` is at least the length of `contents`, everything is moved
/// across in its current order.
///
/// Each pick swaps the chosen element with the last, so the order of the elements left behind is
/// not preserved.
#[inline]
pub fn draw_into(contents: &mut Vec<usize>, balls: usize, rand: &mut impl Rand, drawn: &mut Vec<usize>) {
    if balls >= contents.len() {
        drawn.append(contents);
        return;
    }

    for _ in 0..balls {
        let index = rand.next_lim_u64(contents.len() as u64) as usize;
        drawn.push(contents.swap_remove(index));
    }
}

/// Adds one to `counts[ordinal]` for every ordinal in `ordinals`.
#[inline(always)]
pub fn tally(ordinals: &[usize], counts: &mut [usize]) {
    for &ordinal in ordinals {
        counts[ordinal] += 1;
    }
}
