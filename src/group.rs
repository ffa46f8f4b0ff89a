//! The clustering group: cluster map, merge queue, and the merge loop.
//!
//! A [`ClusterGroup`] is built by feeding it pairwise similarity scores;
//! each data point it has never seen gets a singleton cluster of its own.
//! Clustering is then a caller-driven loop:
//!
//! ```rust
//! use agglom::{ClusterGroup, Linkage};
//!
//! let mut group = ClusterGroup::new(3, Linkage::Complete);
//! group.add_sim("A", "B", 0.9);
//! group.add_sim("B", "C", 0.8);
//! group.add_sim("A", "C", 0.5);
//!
//! while group.merge(0.0) {}
//!
//! assert_eq!(group.len(), 1);
//! let merged = group.clusters()[0];
//! assert_eq!(merged.members().collect::<Vec<_>>(), ["A", "B", "C"]);
//! ```
//!
//! Each [`merge`](ClusterGroup::merge) call performs at most one merge: it
//! pops the best-scoring edge off the queue, gives up if that score is
//! below the cutoff, skips edges whose endpoints would exceed the size cap,
//! and otherwise combines the two endpoint clusters, rescoring the
//! survivor's edges under the group's [`Linkage`] rule.
//!
//! # Bookkeeping during a merge
//!
//! Edge scores change when clusters merge, which ordinary priority queues
//! tolerate badly. The queue here is an ordered set, and a merge of A←B
//! removes every edge touching A or B from it before any score changes,
//! then reinserts A's rescored edges (B's edges are garbage once B is
//! absorbed). Edges live as value copies in the queue and in both
//! endpoints' adjacency maps; every copy carries the same score, and the
//! merge rewrites all of them in the same step, so removal by value always
//! finds its target.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cluster::Cluster;
use crate::error::Result;
use crate::linkage::Linkage;
use crate::similarity::Similarity;
use crate::tabbed::{Column, TabbedReader};

/// Progress is logged every this many ingested records.
const PROGRESS_INTERVAL: usize = 20_000;

/// A set of clusters under construction, with the queue of candidate
/// merges between them.
#[derive(Debug)]
pub struct ClusterGroup {
    /// Extant clusters by id.
    clusters: HashMap<String, Cluster>,
    /// Candidate merges, best score first.
    queue: BTreeSet<Similarity>,
    /// Rule for rescoring on merge.
    method: Linkage,
    /// No merge may produce a cluster larger than this.
    max_size: usize,
}

impl ClusterGroup {
    /// Create an empty group.
    ///
    /// `estimated_points` presizes the cluster map; it does not limit
    /// anything. The size cap defaults to unbounded.
    pub fn new(estimated_points: usize, method: Linkage) -> Self {
        ClusterGroup {
            clusters: HashMap::with_capacity(estimated_points),
            queue: BTreeSet::new(),
            method,
            max_size: usize::MAX,
        }
    }

    /// Record the similarity between two data points.
    ///
    /// Unseen ids get singleton clusters. The endpoint order does not
    /// matter, a non-finite score is coerced to −∞, and a repeated pair
    /// replaces the earlier edge (in the queue as well as in both
    /// adjacency maps). A pair of identical ids is ignored: no cluster
    /// holds an edge to itself.
    pub fn add_sim(&mut self, id1: &str, id2: &str, score: f64) {
        if id1 == id2 {
            return;
        }
        let score = if score.is_finite() {
            score
        } else {
            f64::NEG_INFINITY
        };
        let sim = Similarity::new(id1, id2, score);

        // A repeated pair must not leave a stale queue entry behind; the
        // adjacency copy carries the score the queued copy was filed under.
        if let Some(old) = self.clusters.get(id1).and_then(|c| c.adjacency().get(id2)) {
            self.queue.remove(old);
        }

        self.clusters
            .entry(id1.to_owned())
            .or_insert_with(|| Cluster::singleton(id1))
            .add_sim(sim.clone());
        self.clusters
            .entry(id2.to_owned())
            .or_insert_with(|| Cluster::singleton(id2))
            .add_sim(sim.clone());
        self.queue.insert(sim);
    }

    /// Number of extant clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the group holds no clusters at all.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// The extant cluster with the given id, if any.
    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    /// All extant clusters: largest first, then highest score, then
    /// natural id order.
    pub fn clusters(&self) -> Vec<&Cluster> {
        let mut all: Vec<&Cluster> = self.clusters.values().collect();
        all.sort();
        all
    }

    /// The current size cap.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Forbid merges that would produce a cluster larger than `max_size`.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    /// Merge the two closest clusters if their similarity reaches
    /// `min_sim`.
    ///
    /// Returns `true` if a merge happened. Returns `false` once no
    /// candidate at or above the cutoff remains, at which point the caller
    /// should stop looping. A candidate whose endpoints together exceed
    /// the size cap is discarded permanently: clusters only grow, so the
    /// pair can never become mergeable later.
    pub fn merge(&mut self, min_sim: f64) -> bool {
        while let Some(closest) = self.queue.pop_first() {
            if closest.score() < min_sim {
                // The best remaining candidate is below the cutoff. It is
                // not put back: only a rescore can make any pair eligible
                // again, and rescoring re-queues the edge.
                return false;
            }
            let Some(a) = self.clusters.get(closest.id1()) else {
                continue;
            };
            let Some(b) = self.clusters.get(closest.id2()) else {
                continue;
            };
            if a.size() + b.size() > self.max_size {
                continue;
            }
            self.apply_merge(&closest);
            return true;
        }
        false
    }

    /// Execute one merge for an edge already vetted by [`merge`].
    ///
    /// [`merge`]: ClusterGroup::merge
    fn apply_merge(&mut self, closest: &Similarity) {
        let sim_ab = closest.score();
        let Some(mut a) = self.clusters.remove(closest.id1()) else {
            return;
        };
        let Some(b) = self.clusters.remove(closest.id2()) else {
            return;
        };
        debug!(a = %a, b = %b, score = sim_ab, "merging clusters");

        // Purge every queued edge touching A or B while the stored scores
        // still match the queued copies. A's survivors come back rescored;
        // B's are garbage from here on.
        for sim in b.sims() {
            self.queue.remove(sim);
        }
        for sim in a.sims() {
            self.queue.remove(sim);
        }

        // B is being absorbed into A; the A↔B edge must not be rescored
        // as an outgoing edge below.
        a.remove_sim(b.id());

        // The merged internal score is computed from pre-merge sizes and
        // scores, before anything is mutated.
        let new_score = self
            .method
            .merged_score(a.score(), b.score(), sim_ab, a.size(), b.size());

        // Rescore A's surviving edges to describe A∪B. Every edge is
        // written exactly once from pre-merge state, so the updates are
        // independent and run in parallel.
        let a_id = a.id().to_owned();
        let (a_size, b_size) = (a.size(), b.size());
        let method = self.method;
        {
            let clusters = &self.clusters;
            let (b, a_id) = (&b, a_id.as_str());
            a.adjacency_mut().par_iter_mut().for_each(|(x_id, edge)| {
                let x_size = clusters.get(x_id).map_or(1, Cluster::size);
                edge.update(method, sim_ab, a_id, a_size, b, x_size);
            });
        }

        // Mirror the new scores on the far side of each surviving edge.
        for (x_id, edge) in a.adjacency() {
            if let Some(x) = self.clusters.get_mut(x_id) {
                x.add_sim(edge.clone());
            }
        }

        // Detach B from its neighbours; after this no extant cluster
        // references it.
        for sim in b.sims() {
            let y_id = sim.other_id(b.id());
            if y_id == a_id {
                continue;
            }
            if let Some(y) = self.clusters.get_mut(y_id) {
                y.remove_sim(b.id());
            }
        }

        // A cluster already at the cap can never merge again, so its
        // edges are abandoned instead of re-queued.
        if a_size + b_size < self.max_size {
            self.queue.extend(a.sims().cloned());
        }

        // Membership, height and score change last; the rescoring above
        // relied on the old values.
        a.merge(&b);
        a.set_score(new_score);
        self.clusters.insert(a_id, a);
    }

    /// Load a group from a tab-delimited file using the dense-file
    /// conventions: ids in columns 1 and 2, score in column 3, and a
    /// warning if the pairwise matrix looks incomplete.
    ///
    /// The cluster map is presized from the file length.
    pub fn load(path: impl AsRef<Path>, method: Linkage) -> Result<Self> {
        let path = path.as_ref();
        let estimated = estimate_data_points(path)?;
        info!(
            path = %path.display(),
            ?method,
            estimated,
            "reading cluster group"
        );
        let mut group = ClusterGroup::new(estimated, method);
        let reader = TabbedReader::from_path(path)?;
        group.read_sims(reader, 0, 1, 2, false)?;
        Ok(group)
    }

    /// Load similarities from a tab-delimited file with explicit columns.
    ///
    /// Each column is a header name or a 1-based position. With `sparse`
    /// set, the missing-pairs check is suppressed.
    pub fn load_from(
        &mut self,
        path: impl AsRef<Path>,
        col1: &Column,
        col2: &Column,
        score: &Column,
        sparse: bool,
    ) -> Result<()> {
        let path = path.as_ref();
        let reader = TabbedReader::from_path(path)?;
        let col1 = reader.find_field(col1)?;
        let col2 = reader.find_field(col2)?;
        let score = reader.find_field(score)?;
        info!(path = %path.display(), "reading cluster group");
        self.read_sims(reader, col1, col2, score, sparse)
    }

    /// Ingest every record of an open reader.
    fn read_sims<R: std::io::Read>(
        &mut self,
        mut reader: TabbedReader<R>,
        col1: usize,
        col2: usize,
        score_col: usize,
        sparse: bool,
    ) -> Result<()> {
        let mut count = 0usize;
        while let Some(line) = reader.next_line() {
            let line = line?;
            let mut score = line.get_f64(score_col)?;
            if !score.is_finite() {
                score = f64::NEG_INFINITY;
            }
            self.add_sim(line.get(col1), line.get(col2), score);
            count += 1;
            if count % PROGRESS_INTERVAL == 0 {
                info!(records = count, "records processed");
            }
        }
        let points = self.clusters.len();
        let sim_count = self.queue.len();
        info!(records = count, points, "similarities read");
        if sim_count < count {
            warn!(redundant = count - sim_count, "redundant similarities read");
        }
        if !sparse {
            let expected = points * points.saturating_sub(1) / 2;
            if sim_count < expected {
                warn!(expected, found = sim_count, "similarity matrix incomplete");
            }
        }
        Ok(())
    }

    /// Queue length; exposed for tests and diagnostics.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

/// Estimate the number of data points in a similarity file from its
/// length, constrained to reasonable limits.
///
/// A dense file holds roughly n²/2 records of ~40 bytes, so the point
/// count grows with the square root of the record count.
fn estimate_data_points(path: &Path) -> Result<usize> {
    let mut records = std::fs::metadata(path)?.len() / 40;
    records = records.clamp(100, 100_000);
    Ok((records as f64).sqrt() as usize * 2 + 1)
}
