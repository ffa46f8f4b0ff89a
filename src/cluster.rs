//! Clusters of named data points.

use core::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::natural::{natural_cmp, Natural};
use crate::similarity::Similarity;

/// A group of data points, plus its live edges to every other cluster.
///
/// Every data point starts in a singleton cluster whose id is the point's
/// own id; a merge absorbs one cluster's members into the other, and the
/// survivor keeps its id for life. Alongside its members a cluster tracks:
///
/// - `height`: depth of the merge tree that produced it (1 for singletons),
/// - `score`: internal cohesion under the group's linkage rule, +∞ for
///   singletons so fresh clusters sort ahead on score ties,
/// - an adjacency map from neighbouring cluster id to the similarity edge
///   shared with that neighbour.
///
/// Clusters sort largest first, then highest score, then by natural id
/// order, which is the order [`ClusterGroup::clusters`] reports.
///
/// [`ClusterGroup::clusters`]: crate::ClusterGroup::clusters
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Id of the primary member; stable across merges.
    id: String,
    /// Member ids in natural order.
    members: BTreeSet<Natural>,
    /// Adjacency: neighbouring cluster id to the shared edge.
    sims: HashMap<String, Similarity>,
    /// Merge-tree depth.
    height: usize,
    /// Internal cohesion score.
    score: f64,
}

impl Cluster {
    /// Create a singleton cluster holding one data point.
    pub fn singleton(id: &str) -> Self {
        let mut members = BTreeSet::new();
        members.insert(Natural::from(id));
        Cluster {
            id: id.to_owned(),
            members,
            sims: HashMap::new(),
            height: 1,
            score: f64::INFINITY,
        }
    }

    /// This cluster's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of member data points.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Member ids in natural order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(Natural::as_str)
    }

    /// Whether a data point belongs to this cluster.
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(&Natural::from(id))
    }

    /// Depth of the merge tree rooted at this cluster; 1 for singletons.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Internal cohesion score; +∞ for singletons.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Similarity to another cluster by id, or −∞ when no edge exists.
    pub fn score_to(&self, other_id: &str) -> f64 {
        self.sims
            .get(other_id)
            .map_or(f64::NEG_INFINITY, Similarity::score)
    }

    /// Similarity to another cluster, or −∞ when no edge exists.
    pub fn score_to_cluster(&self, other: &Cluster) -> f64 {
        self.score_to(&other.id)
    }

    /// The live edges from this cluster, in no particular order.
    pub fn sims(&self) -> impl Iterator<Item = &Similarity> {
        self.sims.values()
    }

    /// Number of live edges.
    pub fn sim_count(&self) -> usize {
        self.sims.len()
    }

    /// Record an edge, replacing any existing edge to the same neighbour.
    pub(crate) fn add_sim(&mut self, sim: Similarity) {
        let other = sim.other_id(&self.id).to_owned();
        self.sims.insert(other, sim);
    }

    /// Drop the edge to the given neighbour, if any.
    pub(crate) fn remove_sim(&mut self, other_id: &str) {
        self.sims.remove(other_id);
    }

    /// Adjacency map access for the merge bookkeeping.
    pub(crate) fn adjacency(&self) -> &HashMap<String, Similarity> {
        &self.sims
    }

    pub(crate) fn adjacency_mut(&mut self) -> &mut HashMap<String, Similarity> {
        &mut self.sims
    }

    /// Absorb another cluster's membership.
    ///
    /// Unions the member sets and bumps the height to
    /// `max(self, other) + 1`. Scores and adjacency are the group's
    /// responsibility and are untouched here.
    pub(crate) fn merge(&mut self, other: &Cluster) {
        self.members.extend(other.members.iter().cloned());
        self.height = self.height.max(other.height) + 1;
    }

    pub(crate) fn set_score(&mut self, score: f64) {
        self.score = score;
    }
}

impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Cluster {}

impl Ord for Cluster {
    /// Largest first, then highest score, then natural id order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .size()
            .cmp(&self.size())
            .then_with(|| other.score.total_cmp(&self.score))
            .then_with(|| natural_cmp(&self.id, &other.id))
    }
}

impl PartialOrd for Cluster {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Cluster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.id)
    }
}
