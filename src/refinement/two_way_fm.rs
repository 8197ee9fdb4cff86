//! Two-way boundary FM.
//!
//! One bucket queue per move direction. Border seeds are activated with
//! their FM gain; the search repeatedly applies the best feasible move,
//! patches the gains of affected pins with the standard delta rules,
//! and finally rolls back to the prefix that achieved the best cut.

use log::debug;

use crate::config::Configuration;
use crate::datastructure::BucketQueue;
use crate::hypergraph::{Gain, HyperedgeWeight, Hypergraph, HypernodeId, PartitionId};
use crate::random::Randomize;
use crate::refinement::stopping::StoppingPolicy;
use crate::refinement::Refiner;

#[derive(Debug)]
pub struct TwoWayFmRefiner<P: StoppingPolicy> {
    config: Configuration,
    policy: P,
    /// `pqs[p]` holds border nodes of block p, keyed by their gain for
    /// moving to the other block.
    pqs: [BucketQueue; 2],
    marked: Vec<bool>,
    moves: Vec<HypernodeId>,
}

impl<P: StoppingPolicy> TwoWayFmRefiner<P> {
    pub fn new(hg: &Hypergraph, config: Configuration, policy: P) -> Self {
        let bound: Gain = hg.total_edge_weight();
        let n = hg.initial_num_nodes();
        Self {
            config,
            policy,
            pqs: [BucketQueue::new(n, bound), BucketQueue::new(n, bound)],
            marked: vec![false; n],
            moves: Vec::with_capacity(n),
        }
    }

    /// FM gain of moving `hn` to the opposite block: nets it alone holds in
    /// its block get uncut, internal nets get cut.
    fn compute_gain(&self, hg: &Hypergraph, hn: HypernodeId) -> Gain {
        let p = hg.part_id(hn);
        let other = 1 - p;
        let mut gain = 0;
        for he in hg.incident_edges(hn) {
            debug_assert!(hg.edge_size(he) > 1);
            if hg.pin_count_in_part(he, p) == 1 {
                gain += hg.edge_weight(he);
            } else if hg.pin_count_in_part(he, other) == 0 {
                gain -= hg.edge_weight(he);
            }
        }
        gain
    }

    fn activate(&mut self, hg: &Hypergraph, hn: HypernodeId) {
        if hg.is_border_node(hn) && !self.marked[hn as usize] {
            let side = hg.part_id(hn) as usize;
            if !self.pqs[side].contains(hn) {
                let gain = self.compute_gain(hg, hn);
                self.pqs[side].push(hn, gain);
            }
        }
    }

    /// Whether moving the top of `side` keeps the partition legal.
    fn top_is_feasible(&mut self, hg: &Hypergraph, side: usize) -> bool {
        let Some(hn) = self.pqs[side].max() else {
            return false;
        };
        let to = 1 - side;
        hg.part_weight(to as PartitionId) + hg.node_weight(hn)
            <= self.config.partition.max_part_weights[to]
            && hg.part_size(side as PartitionId) > 1
    }

    /// Pops the next candidate: the higher-gain side among the feasible
    /// ones; gain ties break towards the heavier block, then randomly.
    fn select_queue(
        &mut self,
        hg: &Hypergraph,
        rng: &mut Randomize,
    ) -> Option<(usize, HypernodeId, Gain)> {
        let side = match (self.pqs[0].is_empty(), self.pqs[1].is_empty()) {
            (true, true) => return None,
            (false, true) => 0,
            (true, false) => 1,
            (false, false) => {
                let feasible = [
                    self.top_is_feasible(hg, 0),
                    self.top_is_feasible(hg, 1),
                ];
                if feasible[0] != feasible[1] {
                    usize::from(feasible[1])
                } else {
                    let k0 = self.pqs[0].max_key().expect("side 0 is non-empty");
                    let k1 = self.pqs[1].max_key().expect("side 1 is non-empty");
                    if k0 != k1 {
                        usize::from(k1 > k0)
                    } else if hg.part_weight(0) != hg.part_weight(1) {
                        usize::from(hg.part_weight(1) > hg.part_weight(0))
                    } else {
                        usize::from(rng.flip_coin())
                    }
                }
            }
        };
        let gain = self.pqs[side].max_key().expect("selected side is non-empty");
        let hn = self.pqs[side].delete_max().expect("selected side is non-empty");
        Some((side, hn, gain))
    }

    fn update_neighbours(
        &mut self,
        hg: &Hypergraph,
        hn: HypernodeId,
        from: PartitionId,
        to: PartitionId,
    ) {
        let incident: Vec<_> = hg.incident_edges(hn).collect();
        for &he in &incident {
            let w = hg.edge_weight(he);
            // Pin counts after the move.
            let pc_to = hg.pin_count_in_part(he, to);
            let pc_from = hg.pin_count_in_part(he, from);

            if pc_to == 1 {
                // The net just became cut: its remaining pins can now move
                // without cutting it.
                for &q in hg.pins(he) {
                    if q != hn {
                        self.adjust(q, from, w);
                    }
                }
            }
            if pc_to == 2 {
                // The pin that was alone in `to` lost its uncut incentive.
                for &q in hg.pins(he) {
                    if q != hn && hg.part_id(q) == to {
                        self.adjust(q, to, -w);
                    }
                }
            }
            if pc_from == 0 {
                // The net became internal to `to`.
                for &q in hg.pins(he) {
                    if q != hn {
                        self.adjust(q, to, -w);
                    }
                }
            }
            if pc_from == 1 {
                // Exactly one pin is left behind; moving it uncuts the net.
                for &q in hg.pins(he) {
                    if hg.part_id(q) == from {
                        self.adjust(q, from, w);
                    }
                }
            }
        }

        // Membership transitions: drop pins that became internal, activate
        // pins that became border nodes.
        for &he in &incident {
            for &q in hg.pins(he) {
                if q == hn || self.marked[q as usize] {
                    continue;
                }
                let side = hg.part_id(q) as usize;
                if self.pqs[side].contains(q) {
                    if !hg.is_border_node(q) {
                        self.pqs[side].delete_node(q);
                    }
                } else if hg.is_border_node(q) {
                    self.activate(hg, q);
                }
            }
        }
    }

    /// Applies a gain delta to `q` in the queue of its block, if present.
    fn adjust(&mut self, q: HypernodeId, side: PartitionId, delta: Gain) {
        if self.marked[q as usize] {
            return;
        }
        let pq = &mut self.pqs[side as usize];
        if pq.contains(q) {
            let key = pq.key(q);
            pq.update_key(q, key + delta);
        }
    }
}

impl<P: StoppingPolicy> Refiner for TwoWayFmRefiner<P> {
    fn refine(
        &mut self,
        hg: &mut Hypergraph,
        refinement_nodes: &[HypernodeId],
        best_cut: &mut HyperedgeWeight,
        rng: &mut Randomize,
    ) -> bool {
        debug_assert_eq!(*best_cut, crate::metrics::hyperedge_cut(hg));
        self.pqs[0].clear();
        self.pqs[1].clear();
        self.marked.fill(false);
        self.moves.clear();
        let beta = (hg.current_num_nodes() as f64).ln();

        let mut seeds = refinement_nodes.to_vec();
        rng.shuffle(&mut seeds);
        for &hn in &seeds {
            self.activate(hg, hn);
        }

        let initial_cut = *best_cut;
        let mut cut = *best_cut;
        let mut best = *best_cut;
        let mut min_cut_index: isize = -1;
        self.policy.reset();

        loop {
            let moves_since_best =
                (self.moves.len() as isize - 1 - min_cut_index).max(0) as usize;
            if self
                .policy
                .should_stop(moves_since_best, &self.config.fm, beta, best, cut)
            {
                break;
            }
            let Some((from, hn, gain)) = self.select_queue(hg, rng) else {
                break;
            };
            let to = 1 - from;
            debug_assert!(!self.marked[hn as usize]);
            self.marked[hn as usize] = true;

            if hg.part_weight(to as PartitionId) + hg.node_weight(hn)
                > self.config.partition.max_part_weights[to]
                || hg.part_size(from as PartitionId) == 1
            {
                debug!("refused move of node {} ({} -> {})", hn, from, to);
                continue;
            }

            hg.change_node_part(hn, from as PartitionId, to as PartitionId);
            cut -= gain;
            self.policy.update(gain);
            self.moves.push(hn);
            self.update_neighbours(hg, hn, from as PartitionId, to as PartitionId);

            if cut < best || (cut == best && rng.flip_coin()) {
                if cut < best {
                    self.policy.reset();
                }
                best = cut;
                min_cut_index = self.moves.len() as isize - 1;
            }
        }

        // Rollback to the best prefix.
        let keep = (min_cut_index + 1) as usize;
        for &hn in self.moves[keep..].iter().rev() {
            let p = hg.part_id(hn);
            hg.change_node_part(hn, p, 1 - p);
        }

        debug_assert_eq!(best, crate::metrics::hyperedge_cut(hg));
        debug_assert!(best <= initial_cut);
        *best_cut = best;
        best < initial_cut
    }
}
