//! Gain computation policies for initial partitioning.

use crate::hypergraph::{Gain, Hypergraph, HypernodeId, PartitionId};

/// Gain of assigning (or moving) a node to a target block.
pub trait GainComputation {
    fn calculate_gain(&self, hg: &Hypergraph, hn: HypernodeId, target: PartitionId) -> Gain;
}

/// FM gain: weight of nets becoming internal to the target minus weight of
/// nets becoming cut.
///
/// The same formula serves assigned and still-unassigned nodes: a net whose
/// other pins all sit in the target becomes internal (`+w`), a net that is
/// currently internal to a single different block becomes cut (`-w`).
/// Unassigned pins count towards no block and therefore block both terms.
#[derive(Debug, Default, Clone, Copy)]
pub struct FmGain;

impl GainComputation for FmGain {
    fn calculate_gain(&self, hg: &Hypergraph, hn: HypernodeId, target: PartitionId) -> Gain {
        debug_assert_ne!(hg.part_id(hn), target);
        let mut gain = 0;
        for he in hg.incident_edges(hn) {
            let w = hg.edge_weight(he);
            if hg.pin_count_in_part(he, target) == hg.edge_size(he) - 1 {
                gain += w;
            }
            if hg.connectivity(he) == 1 && hg.pin_count_in_part(he, target) == 0 {
                gain -= w;
            }
        }
        gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypergraph::Hypergraph;
    use crate::metrics::hyperedge_cut;

    fn seven_node() -> Hypergraph {
        let index = vec![0, 2, 6, 9, 12];
        let edges = vec![0, 1, 0, 6, 4, 5, 4, 5, 3, 1, 2, 3];
        Hypergraph::new(7, 4, &index, &edges, 2, None, None)
    }

    #[test]
    fn gain_matches_cut_delta_for_assigned_nodes() {
        let mut hg = seven_node();
        for v in 0..7 {
            hg.set_node_part(v, if v == 6 { 0 } else { 1 });
        }
        let gain = FmGain.calculate_gain(&hg, 6, 1);
        let before = hyperedge_cut(&hg);
        hg.change_node_part(6, 0, 1);
        assert_eq!(before - hyperedge_cut(&hg), gain);
    }

    #[test]
    fn unassigned_node_gains_for_almost_internal_net() {
        let mut hg = seven_node();
        // Edge 2 = {4, 5, 3}: with 4 and 5 in block 0, assigning 3 there
        // makes it internal.
        hg.set_node_part(4, 0);
        hg.set_node_part(5, 0);
        assert_eq!(FmGain.calculate_gain(&hg, 3, 0), 1);
    }

    #[test]
    fn unassigned_node_pays_for_cutting_an_internal_net() {
        let mut hg = seven_node();
        // Edge 0 = {0, 1} internal to block 0; putting 1 into block 1 cuts it.
        hg.set_node_part(0, 0);
        assert_eq!(FmGain.calculate_gain(&hg, 1, 1), -1);
    }
}
