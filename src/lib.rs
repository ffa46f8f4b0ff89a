//! # agglom
//!
//! Agglomerative hierarchical clustering over an arbitrary set of named
//! data points, driven by a sparse or dense list of pairwise similarity
//! scores.
//!
//! Unlike clusterers that work from coordinate vectors, this engine never
//! sees the data points themselves: callers supply opaque string ids and
//! similarity scores, and the engine maintains per-cluster adjacency plus
//! a global best-first queue of candidate merges. Starting from singleton
//! clusters, it repeatedly merges the two most-similar clusters until no
//! remaining pair clears a caller-supplied cutoff, or a size cap would be
//! exceeded. Unspecified pairs are treated as having similarity −∞, so a
//! sparse input never needs densifying.
//!
//! ## Linkage rules
//!
//! The [`Linkage`] rule decides how the merged cluster relates to the
//! rest of the world, from cluster-level state alone:
//!
//! | Rule | Merged A∪B ↔ X | Character |
//! |----------|-----------------------|-----------|
//! | Complete | min of the two edges | Small, tight clusters |
//! | Single | max of the two edges | Classic, prone to chaining |
//! | Average | size-weighted mean | Larger clusters, tolerant of fuzz |
//!
//! ## Usage
//!
//! ```rust
//! use agglom::{ClusterGroup, Linkage};
//!
//! let mut group = ClusterGroup::new(4, Linkage::Average);
//! group.add_sim("thrA", "thrB", 0.92);
//! group.add_sim("thrA", "thrC", 0.88);
//! group.add_sim("thrB", "thrC", 0.81);
//! group.add_sim("thrA", "araD", 0.11);
//!
//! // Merge until nothing scores 0.5 or better.
//! while group.merge(0.5) {}
//!
//! let clusters = group.clusters();
//! assert_eq!(clusters[0].members().collect::<Vec<_>>(),
//!            ["thrA", "thrB", "thrC"]);
//! assert_eq!(clusters[1].members().collect::<Vec<_>>(), ["araD"]);
//! ```
//!
//! Similarity files (tab-delimited, with a header) load directly:
//! [`ClusterGroup::load`] for the id-id-score column convention,
//! [`ClusterGroup::load_from`] to name the columns. [`ConversionStream`]
//! is a related utility for re-serialising one tabular file into
//! another's column layout.

pub mod cluster;
pub mod error;
pub mod group;
pub mod linkage;
pub mod natural;
pub mod reshape;
pub mod similarity;
pub mod tabbed;

pub use cluster::Cluster;
pub use error::{Error, Result};
pub use group::ClusterGroup;
pub use linkage::Linkage;
pub use natural::{natural_cmp, Natural};
pub use reshape::ConversionStream;
pub use similarity::Similarity;
pub use tabbed::{Column, Line, TabbedReader};
