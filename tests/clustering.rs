//! End-to-end clustering runs over a dense similarity file.
//!
//! The fixture holds 27 points in five blocks: every within-block pair
//! scores at least 0.65 and every cross-block pair at most 0.56, so at a
//! cutoff of 0.64 all three linkage rules must recover exactly the five
//! blocks. Scores inside the blocks vary, which is what the internal-score
//! assertions chew on.

use agglom::{Cluster, ClusterGroup, Column, Linkage};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/expr.tbl");
const CUTOFF: f64 = 0.64;

fn load(method: Linkage) -> ClusterGroup {
    ClusterGroup::load(FIXTURE, method).expect("fixture should load")
}

/// Original pairwise score between two points, read from an unmerged group.
fn pairwise(fresh: &ClusterGroup, id1: &str, id2: &str) -> f64 {
    fresh
        .cluster(id1)
        .expect("point should exist")
        .score_to(id2)
}

fn members_of(cluster: &Cluster) -> Vec<String> {
    cluster.members().map(str::to_owned).collect()
}

#[test]
fn test_load_dense_file() {
    let group = load(Linkage::Complete);
    assert_eq!(group.len(), 27);
    assert_eq!(group.queued(), 27 * 26 / 2);

    let b1 = group.cluster("b1").expect("b1 should exist");
    assert_eq!(b1.id(), "b1");
    assert_eq!(members_of(b1), ["b1"]);
    assert_eq!(b1.sim_count(), 26);
    assert_eq!(b1.score_to("b2"), 0.67);
    assert_eq!(b1.score_to("b7"), 0.52);

    let b2 = group.cluster("b2").expect("b2 should exist");
    assert_eq!(b1.score_to_cluster(b2), 0.67);
}

#[test]
fn test_load_with_named_columns() {
    let mut group = ClusterGroup::new(27, Linkage::Average);
    group
        .load_from(
            FIXTURE,
            &Column::new("id1"),
            &Column::new("id2"),
            &Column::new("score"),
            true,
        )
        .expect("fixture should load");
    assert_eq!(group.len(), 27);
    assert_eq!(group.queued(), 27 * 26 / 2);

    // Positions work the same way.
    let mut by_pos = ClusterGroup::new(27, Linkage::Average);
    by_pos
        .load_from(FIXTURE, &Column::new("1"), &Column::new("2"), &Column::new("3"), true)
        .expect("fixture should load");
    assert_eq!(by_pos.len(), 27);
}

#[test]
fn test_first_merge_bookkeeping() {
    let fresh = load(Linkage::Complete);
    let mut group = load(Linkage::Complete);
    assert!(group.merge(CUTOFF));
    assert_eq!(group.len(), 26);

    // Exactly one cluster has grown.
    let merged = group
        .clusters()
        .into_iter()
        .find(|c| c.size() == 2)
        .expect("one merge should produce one pair");
    let members = members_of(merged);
    let absorbed = members
        .iter()
        .find(|m| *m != merged.id())
        .expect("pair should have a non-primary member");

    assert_eq!(merged.height(), 2);
    assert_eq!(merged.sim_count(), 25);

    for sim in merged.sims() {
        let other_id = sim.other_id(merged.id());
        let other = group.cluster(other_id).expect("neighbour should exist");
        // The neighbour mirrors the rescored edge and has dropped the
        // absorbed cluster entirely.
        assert_eq!(other.score_to(merged.id()), sim.score());
        assert_eq!(other.score_to(absorbed), f64::NEG_INFINITY);
        assert_eq!(other.sim_count(), 25);
        // Complete linkage can only lower a merged edge.
        assert_eq!(
            sim.score(),
            pairwise(&fresh, &members[0], other_id).min(pairwise(&fresh, &members[1], other_id))
        );
    }
}

#[test]
fn test_complete_recovers_blocks() {
    let fresh = load(Linkage::Complete);
    let mut group = load(Linkage::Complete);
    let mut count = 0;
    while group.merge(CUTOFF) {
        count += 1;
    }
    assert_eq!(group.len(), 5);
    assert_eq!(count, 27 - 5);

    let clusters = group.clusters();
    let sizes: Vec<usize> = clusters.iter().map(|c| c.size()).collect();
    assert_eq!(sizes, [6, 6, 5, 5, 5]);

    // Every pair that ended up together scored at least the cutoff.
    for cluster in &clusters {
        let members = members_of(cluster);
        for (i, m1) in members.iter().enumerate() {
            for m2 in &members[i + 1..] {
                assert!(
                    pairwise(&fresh, m1, m2) >= CUTOFF,
                    "{m1}/{m2} grouped below cutoff"
                );
            }
        }
    }

    // Members come back in natural order: b2 before b10.
    let first_block = group.cluster("b1").expect("b1's block should survive");
    assert_eq!(members_of(first_block), ["b1", "b2", "b3", "b4", "b5", "b6"]);

    // A cluster's id is the lexically smallest member id ("b10" < "b7"
    // as strings), while its members still list in natural order.
    let second_block = group.cluster("b10").expect("b7's block keeps id b10");
    assert_eq!(
        members_of(second_block),
        ["b7", "b8", "b9", "b10", "b11", "b12"]
    );
}

#[test]
fn test_single_cluster_score_is_max_pairwise() {
    let fresh = load(Linkage::Single);
    let mut group = load(Linkage::Single);
    while group.merge(CUTOFF) {}
    assert_eq!(group.len(), 5);

    for cluster in group.clusters() {
        let members = members_of(cluster);
        if members.len() < 2 {
            continue;
        }
        let mut max = f64::NEG_INFINITY;
        for (i, m1) in members.iter().enumerate() {
            for m2 in &members[i + 1..] {
                max = max.max(pairwise(&fresh, m1, m2));
            }
        }
        assert!(max >= CUTOFF);
        assert_eq!(cluster.score(), max, "cluster {cluster}");
    }
}

#[test]
fn test_average_cluster_score_is_mean_pairwise() {
    let fresh = load(Linkage::Average);
    let mut group = load(Linkage::Average);
    while group.merge(CUTOFF) {}
    assert_eq!(group.len(), 5);
    assert_average_property(&group, &fresh);
}

#[test]
fn test_limited_cluster_size() {
    let fresh = load(Linkage::Average);
    let mut group = load(Linkage::Average);
    group.set_max_size(3);
    while group.merge(CUTOFF) {}

    for cluster in group.clusters() {
        assert!(cluster.size() <= 3, "cluster {cluster} exceeds the cap");
    }
    assert_average_property(&group, &fresh);
}

/// Every multi-member cluster's score must equal the arithmetic mean of
/// its members' original pairwise scores.
fn assert_average_property(group: &ClusterGroup, fresh: &ClusterGroup) {
    for cluster in group.clusters() {
        let members = members_of(cluster);
        if members.len() < 2 {
            continue;
        }
        let mut total = 0.0;
        let mut pairs = 0usize;
        for (i, m1) in members.iter().enumerate() {
            for m2 in &members[i + 1..] {
                total += pairwise(fresh, m1, m2);
                pairs += 1;
            }
        }
        let mean = total / pairs as f64;
        assert!(mean >= CUTOFF);
        assert!(
            (cluster.score() - mean).abs() < 1e-9,
            "cluster {cluster}: score {} vs mean {mean}",
            cluster.score()
        );
    }
}
