//! Linkage rules for merging clusters.
//!
//! When clusters A and B merge, two quantities must be recomputed from
//! cluster-level state alone, without revisiting the point-to-point
//! similarity matrix:
//!
//! - the similarity of the merged cluster to every third cluster X
//!   ([`Linkage::merged_sim`]), and
//! - the internal cohesion score of the merged cluster
//!   ([`Linkage::merged_score`]).
//!
//! | Linkage | Merged A∪B ↔ X | Effect |
//! |----------|---------------------------------|--------|
//! | Complete | `min(ax, bx)` | Small, tight clusters |
//! | Single | `max(ax, bx)` | The classic rule; prone to chaining |
//! | Average | `(|A|·ax + |B|·bx) / (|A|+|B|)` | Larger clusters; good for fuzzy data |
//!
//! The average rule's internal score maintains the arithmetic mean over all
//! unordered intra-cluster pairs: each cluster's previous mean is weighted
//! by its pair count `n·(n−1)/2` and the bridging similarity by `|A|·|B|`.

/// Rule for combining similarities when two clusters merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linkage {
    /// Similarity of the least-similar elements of the two sets.
    Complete,
    /// Similarity of the most-similar elements of the two sets.
    Single,
    /// Mean similarity between the data points of the two sets.
    Average,
}

impl Linkage {
    /// Similarity between the merged cluster A∪B and a third cluster X.
    ///
    /// `ax` and `bx` are the pre-merge similarities of A and B to X, and
    /// the sizes are the pre-merge member counts. The similarity that
    /// triggered the merge and X's size complete the rule interface, but
    /// none of the three current rules reads them.
    pub fn merged_sim(
        self,
        _ab: f64,
        ax: f64,
        bx: f64,
        a_size: usize,
        b_size: usize,
        _x_size: usize,
    ) -> f64 {
        match self {
            // ax and bx are already the worst similarities of X to A and
            // to B; the merged worst case is the smaller of the two.
            Linkage::Complete => ax.min(bx),
            Linkage::Single => ax.max(bx),
            Linkage::Average => {
                let (a, b) = (a_size as f64, b_size as f64);
                (a * ax + b * bx) / (a + b)
            }
        }
    }

    /// Internal cohesion score of the merged cluster A∪B.
    ///
    /// `a` and `b` are the pre-merge internal scores (+∞ for singletons),
    /// `ab` the similarity that triggered the merge. A singleton's internal
    /// score is meaningless, so the `> 1` guards keep the +∞ sentinel out
    /// of the result.
    pub fn merged_score(self, a: f64, b: f64, ab: f64, a_size: usize, b_size: usize) -> f64 {
        match self {
            Linkage::Complete => a.min(b).min(ab),
            Linkage::Single => {
                let mut r = ab;
                if a_size > 1 {
                    r = r.max(a);
                }
                if b_size > 1 {
                    r = r.max(b);
                }
                r
            }
            Linkage::Average => {
                // Weighted mean over all cross-cluster pairs. The bridge
                // contributes |A|·|B| pairs; each cluster's own mean covers
                // its n·(n−1)/2 internal pairs.
                let mut r = ab;
                let mut n = (a_size * b_size) as f64;
                if a_size > 1 {
                    let triangle = (a_size * (a_size - 1) / 2) as f64;
                    r = (r * n + a * triangle) / (n + triangle);
                    n += triangle;
                }
                if b_size > 1 {
                    let triangle = (b_size * (b_size - 1) / 2) as f64;
                    r = (r * n + b * triangle) / (n + triangle);
                }
                r
            }
        }
    }
}
