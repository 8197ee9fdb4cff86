//! Initial partitioning on the coarsest hypergraph.
//!
//! Two modes, selected by the orchestrator: bisection growth (grow block 0
//! out of block 1 along a gain queue, then roll back to the best balanced
//! cut) and direct k-way greedy hypergraph growing in round-robin order.
//! Both are parameterized over start-node selection and gain computation.

pub mod gain;
pub mod start_node;

use log::debug;

use crate::config::Configuration;
use crate::datastructure::BucketQueue;
use crate::hypergraph::{
    Gain, Hypergraph, HypernodeId, HypernodeWeight, PartitionId, INVALID_PARTITION,
};
use crate::random::Randomize;
use gain::GainComputation;
use start_node::StartNodeSelection;

/// Initial partitioner with pluggable policies.
#[derive(Debug)]
pub struct InitialPartitioner<S: StartNodeSelection, G: GainComputation> {
    start_nodes: S,
    gain: G,
}

impl<S: StartNodeSelection, G: GainComputation> InitialPartitioner<S, G> {
    pub fn new(start_nodes: S, gain: G) -> Self {
        Self { start_nodes, gain }
    }

    /// Safe bound for any gain value on this instance.
    fn gain_bound(hg: &Hypergraph) -> Gain {
        hg.total_edge_weight()
    }

    /// Inserts or re-rates `hn` in the queue growing `target`.
    fn process_node(
        &self,
        hg: &Hypergraph,
        pq: &mut BucketQueue,
        hn: HypernodeId,
        target: PartitionId,
    ) {
        debug_assert_ne!(hg.part_id(hn), target);
        let gain = self.gain.calculate_gain(hg, hn, target);
        if pq.contains(hn) {
            pq.update_key(hn, gain);
        } else {
            pq.push(hn, gain);
        }
    }

    /// Grows block 0 out of block 1, then rolls back to the best cut seen
    /// in a balanced state. Every node ends up assigned.
    ///
    /// `max_part_weights` are the (inclusive) upper bounds for the two
    /// sides; the lower bound of block 0 follows from block 1's upper bound.
    pub fn bisect(&self, hg: &mut Hypergraph, config: &Configuration, rng: &mut Randomize) {
        let upper = &config.partition.max_part_weights;
        debug_assert!(upper.len() >= 2);
        let total: HypernodeWeight = config.partition.total_graph_weight;
        let lower0 = total - upper[1];

        let nodes: Vec<HypernodeId> = hg.nodes().collect();
        if nodes.is_empty() {
            return;
        }
        for &v in &nodes {
            hg.set_node_part(v, 1);
        }

        let mut pq = BucketQueue::new(hg.initial_num_nodes(), Self::gain_bound(hg));
        let start = self.start_nodes.calculate_start_nodes(hg, 2, rng)[0];
        self.process_node(hg, &mut pq, start, 0);

        let mut moves: Vec<HypernodeId> = Vec::new();
        let mut cut: Gain = 0;
        let mut weight0: HypernodeWeight = 0;
        // Number of moves of the best balanced prefix, if any.
        let mut best_prefix = if lower0 <= 0 { Some(0) } else { None };
        let mut best_cut: Gain = 0;

        loop {
            if pq.is_empty() {
                // Disconnected remainder: reseed from block 1.
                match random_unassigned(hg, 1, rng) {
                    Some(hn) => self.process_node(hg, &mut pq, hn, 0),
                    None => break,
                }
            }
            let gain = pq.max_key().expect("queue is non-empty");
            let hn = pq.delete_max().expect("queue is non-empty");
            if weight0 + hg.node_weight(hn) > upper[0] {
                break;
            }
            hg.change_node_part(hn, 1, 0);
            weight0 += hg.node_weight(hn);
            cut -= gain;
            moves.push(hn);

            let balanced = weight0 >= lower0 && total - weight0 <= upper[1];
            if balanced && (best_prefix.is_none() || cut < best_cut) {
                best_cut = cut;
                best_prefix = Some(moves.len());
            }

            for he in hg.incident_edges(hn).collect::<Vec<_>>() {
                for &pin in hg.pins(he) {
                    if hg.part_id(pin) == 1 {
                        self.process_node(hg, &mut pq, pin, 0);
                    }
                }
            }
        }

        if let Some(keep) = best_prefix {
            for &hn in moves[keep..].iter().rev() {
                hg.change_node_part(hn, 0, 1);
            }
            debug!(
                "bisection growth: {} moves kept of {}, cut {}",
                keep,
                moves.len(),
                best_cut
            );
        }
        debug_assert!(hg.check_invariants());
    }

    /// Direct k-way greedy hypergraph growing, round-robin over the blocks.
    ///
    /// All nodes start unassigned; each block grows from its start node via
    /// its own gain queue. A block whose candidate would overflow its bound
    /// is disabled for the rest of the phase. Nodes left unassigned when
    /// every block is disabled go to the lightest block.
    pub fn partition_kway(&self, hg: &mut Hypergraph, config: &Configuration, rng: &mut Randomize) {
        let k = config.partition.k;
        let upper = &config.partition.max_part_weights;
        let bound = Self::gain_bound(hg);
        let mut queues: Vec<BucketQueue> = (0..k)
            .map(|_| BucketQueue::new(hg.initial_num_nodes(), bound))
            .collect();
        let mut part_enabled = vec![true; k as usize];

        let starts = self
            .start_nodes
            .calculate_start_nodes(hg, k as usize, rng);
        for (i, &s) in starts.iter().enumerate() {
            self.process_node(hg, &mut queues[i], s, i as PartitionId);
        }

        let total = config.partition.total_graph_weight;
        let mut assigned_weight: HypernodeWeight = 0;

        'outer: while assigned_weight < total && part_enabled.iter().any(|&e| e) {
            for i in 0..k as usize {
                if !part_enabled[i] {
                    continue;
                }
                let target = i as PartitionId;
                if queues[i].is_empty() {
                    match random_unassigned(hg, INVALID_PARTITION, rng) {
                        Some(hn) => self.process_node(hg, &mut queues[i], hn, target),
                        None => break 'outer,
                    }
                }
                let hn = queues[i].max().expect("queue was reseeded");
                debug_assert_eq!(hg.part_id(hn), INVALID_PARTITION);

                if hg.part_weight(target) + hg.node_weight(hn) > upper[i] {
                    part_enabled[i] = false;
                    debug!("block {} is full, disabling", i);
                    continue;
                }

                for queue in queues.iter_mut() {
                    if queue.contains(hn) {
                        queue.delete_node(hn);
                    }
                }
                hg.set_node_part(hn, target);
                assigned_weight += hg.node_weight(hn);

                for he in hg.incident_edges(hn).collect::<Vec<_>>() {
                    for &pin in hg.pins(he) {
                        if hg.part_id(pin) != INVALID_PARTITION {
                            continue;
                        }
                        // Insert only into the assigning block's queue;
                        // elsewhere just refresh existing entries.
                        for (j, queue) in queues.iter_mut().enumerate() {
                            if j == i || queue.contains(pin) {
                                let gain =
                                    self.gain.calculate_gain(hg, pin, j as PartitionId);
                                if queue.contains(pin) {
                                    queue.update_key(pin, gain);
                                } else {
                                    queue.push(pin, gain);
                                }
                            }
                        }
                    }
                }

                if assigned_weight == total {
                    break 'outer;
                }
            }
        }

        // All blocks disabled before the nodes ran out.
        let leftovers: Vec<HypernodeId> = hg
            .nodes()
            .filter(|&v| hg.part_id(v) == INVALID_PARTITION)
            .collect();
        for hn in leftovers {
            let lightest = (0..k)
                .min_by_key(|&p| hg.part_weight(p))
                .expect("k is at least 2");
            hg.set_node_part(hn, lightest);
        }
        debug_assert!(hg.check_invariants());
    }
}

/// Random enabled node currently assigned to `part` (`INVALID_PARTITION`
/// for unassigned).
fn random_unassigned(
    hg: &Hypergraph,
    part: PartitionId,
    rng: &mut Randomize,
) -> Option<HypernodeId> {
    let pool: Vec<HypernodeId> = hg.nodes().filter(|&v| hg.part_id(v) == part).collect();
    if pool.is_empty() {
        None
    } else {
        Some(pool[rng.index(pool.len())])
    }
}
