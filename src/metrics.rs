//! Partition quality metrics, recomputed from scratch.
//!
//! The refiners track the cut incrementally; these functions are the ground
//! truth they are checked against (and what the front-end reports).

use crate::hypergraph::{Hypergraph, HyperedgeWeight};

/// Sum of weights of hyperedges spanning more than one block.
pub fn hyperedge_cut(hg: &Hypergraph) -> HyperedgeWeight {
    hg.edges()
        .filter(|&he| hg.connectivity(he) >= 2)
        .map(|he| hg.edge_weight(he))
        .sum()
}

/// `max_p w(V_p) / ceil(w(V)/k) - 1`; zero for a perfectly balanced
/// partition, at most epsilon for a feasible one.
pub fn imbalance(hg: &Hypergraph) -> f64 {
    let perfect = (hg.total_weight() + hg.k() as i64 - 1) / hg.k() as i64;
    let max_weight = (0..hg.k()).map(|p| hg.part_weight(p)).max().unwrap_or(0);
    max_weight as f64 / perfect as f64 - 1.0
}
