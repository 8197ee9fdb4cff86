//! K-way max-gain-node FM with hyperedge locking.
//!
//! One heap entry per active border node: the key is the node's best gain
//! over all candidate target blocks and the data slot carries that target.
//! Hyperedge locking limits gain-update propagation: a net is free until
//! the first move touches it, loose while all moves into it target the same
//! block, and locked afterwards; locked nets no longer propagate updates.

use log::debug;

use crate::config::Configuration;
use crate::datastructure::HeapQueue;
use crate::hypergraph::{
    Gain, HyperedgeId, HyperedgeWeight, Hypergraph, HypernodeId, PartitionId, INVALID_PARTITION,
};
use crate::random::Randomize;
use crate::refinement::stopping::StoppingPolicy;
use crate::refinement::Refiner;

/// Lock state of a hyperedge during one local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockState {
    Free,
    Loose(PartitionId),
    Locked,
}

#[derive(Debug, Clone, Copy)]
struct RollbackInfo {
    hn: HypernodeId,
    from: PartitionId,
    to: PartitionId,
}

#[derive(Debug)]
pub struct KWayFmRefiner<P: StoppingPolicy> {
    config: Configuration,
    policy: P,
    pq: HeapQueue<PartitionId>,
    marked: Vec<bool>,
    just_updated: Vec<bool>,
    just_updated_list: Vec<HypernodeId>,
    performed_moves: Vec<RollbackInfo>,
    locks: Vec<LockState>,
    /// Nets touched in the current search, for O(touched) reset.
    touched_hes: Vec<HyperedgeId>,
    /// Scratch, all indexed by block id and zeroed between gain queries.
    tmp_gains: Vec<Gain>,
    tmp_connectivity_decrease: Vec<i64>,
    /// Candidate targets in first-seen order; membership via the set.
    tmp_target_parts: Vec<PartitionId>,
    tmp_target_member: hashbrown::HashSet<PartitionId>,
}

impl<P: StoppingPolicy> KWayFmRefiner<P> {
    pub fn new(hg: &Hypergraph, config: Configuration, policy: P) -> Self {
        let n = hg.initial_num_nodes();
        let k = config.partition.k as usize;
        Self {
            config,
            policy,
            pq: HeapQueue::new(n),
            marked: vec![false; n],
            just_updated: vec![false; n],
            just_updated_list: Vec::new(),
            performed_moves: Vec::with_capacity(n),
            locks: vec![LockState::Free; hg.initial_num_edges()],
            touched_hes: Vec::new(),
            tmp_gains: vec![0; k],
            tmp_connectivity_decrease: vec![0; k],
            tmp_target_parts: Vec::with_capacity(k),
            tmp_target_member: hashbrown::HashSet::with_capacity(k),
        }
    }

    /// Best (gain, target) pair of a border node over all candidate blocks.
    ///
    /// Ties prefer the larger connectivity decrease, then relieving an
    /// overweight source block, then a coin flip.
    fn compute_max_gain(
        &mut self,
        hg: &Hypergraph,
        hn: HypernodeId,
        rng: &mut Randomize,
    ) -> (Gain, PartitionId) {
        debug_assert!(hg.is_border_node(hn));
        self.tmp_target_parts.clear();
        self.tmp_target_member.clear();

        let source = hg.part_id(hn);
        let mut internal_weight: HyperedgeWeight = 0;

        for he in hg.incident_edges(hn) {
            debug_assert!(hg.edge_size(he) > 1);
            if hg.connectivity(he) == 1 {
                internal_weight += hg.edge_weight(he);
            } else {
                let pins_in_source = hg.pin_count_in_part(he, source);
                for &target in hg.connectivity_set(he) {
                    if target != source && self.tmp_target_member.insert(target) {
                        self.tmp_target_parts.push(target);
                    }
                    if pins_in_source == 1 {
                        if hg.pin_count_in_part(he, target) == hg.edge_size(he) - 1 {
                            self.tmp_gains[target as usize] += hg.edge_weight(he);
                        }
                        self.tmp_connectivity_decrease[target as usize] += 1;
                    }
                }
            }
        }
        self.tmp_gains[source as usize] = 0;
        self.tmp_connectivity_decrease[source as usize] = 0;

        let node_weight = hg.node_weight(hn);
        let source_weight = hg.part_weight(source);
        let mut max_gain = Gain::MIN;
        let mut max_gain_part = INVALID_PARTITION;
        let mut max_connectivity_decrease = 0i64;
        for &target in &self.tmp_target_parts {
            let gain = self.tmp_gains[target as usize] - internal_weight;
            let connectivity_decrease = self.tmp_connectivity_decrease[target as usize];
            let target_weight = hg.part_weight(target);
            let max_part_weight = self.config.partition.max_part_weights[target as usize];
            let take = if gain > max_gain {
                true
            } else if gain == max_gain && connectivity_decrease > max_connectivity_decrease {
                true
            } else if gain == max_gain
                && source_weight >= self.config.partition.max_part_weights[source as usize]
                && target_weight + node_weight < max_part_weight
                && target_weight + node_weight
                    < hg.part_weight(max_gain_part) + node_weight
            {
                true
            } else {
                gain == max_gain
                    && connectivity_decrease == max_connectivity_decrease
                    && rng.flip_coin()
            };
            if take {
                max_gain = gain;
                max_gain_part = target;
                max_connectivity_decrease = connectivity_decrease;
            }
            self.tmp_gains[target as usize] = 0;
            self.tmp_connectivity_decrease[target as usize] = 0;
        }
        debug_assert_ne!(max_gain_part, INVALID_PARTITION);
        debug_assert_ne!(max_gain, Gain::MIN);
        (max_gain, max_gain_part)
    }

    fn activate(&mut self, hg: &Hypergraph, hn: HypernodeId, rng: &mut Randomize) {
        if hg.is_border_node(hn) {
            debug_assert!(!self.pq.contains(hn));
            let (gain, target) = self.compute_max_gain(hg, hn, rng);
            self.pq.re_insert(hn, gain, target);
        }
    }

    /// Marks `hn` and applies the move unless it would overload the target
    /// or empty the source block.
    fn move_hypernode(
        &mut self,
        hg: &mut Hypergraph,
        hn: HypernodeId,
        from: PartitionId,
        to: PartitionId,
    ) -> bool {
        debug_assert!(hg.is_border_node(hn));
        self.marked[hn as usize] = true;
        if hg.part_weight(to) + hg.node_weight(hn)
            >= self.config.partition.max_part_weights[to as usize]
            || hg.part_size(from) == 1
        {
            debug!("refused move of node {} ({} -> {})", hn, from, to);
            return false;
        }
        hg.change_node_part(hn, from, to);
        true
    }

    /// A gain update has to propagate through a loose net only when the
    /// moved pin crossed one of the critical pin-count thresholds.
    fn move_affects_gain_update(
        pin_count_source_before: usize,
        pin_count_dest_before: usize,
        pin_count_source_after: usize,
    ) -> bool {
        pin_count_dest_before == 0
            || pin_count_dest_before == 1
            || pin_count_source_before == 1
            || pin_count_source_after == 1
    }

    fn update_neighbours(
        &mut self,
        hg: &Hypergraph,
        hn: HypernodeId,
        from: PartitionId,
        to: PartitionId,
        rng: &mut Randomize,
    ) {
        for &pin in &self.just_updated_list {
            self.just_updated[pin as usize] = false;
        }
        self.just_updated_list.clear();

        let incident: Vec<_> = hg.incident_edges(hn).collect();
        for he in incident {
            match self.locks[he as usize] {
                LockState::Free => {
                    // First move into this net: activate new border pins.
                    self.locks[he as usize] = LockState::Loose(to);
                    self.touched_hes.push(he);
                    self.update_pins_of(hg, he, rng);
                }
                LockState::Loose(part) if part == to => {
                    let source_before = hg.pin_count_in_part(he, from) + 1;
                    let dest_before = hg.pin_count_in_part(he, to) - 1;
                    if Self::move_affects_gain_update(
                        source_before,
                        dest_before,
                        source_before - 1,
                    ) {
                        self.update_pins_of(hg, he, rng);
                    }
                }
                LockState::Loose(_) => {
                    // A second target block: the net stops propagating.
                    let source_before = hg.pin_count_in_part(he, from) + 1;
                    let dest_before = hg.pin_count_in_part(he, to) - 1;
                    if Self::move_affects_gain_update(
                        source_before,
                        dest_before,
                        source_before - 1,
                    ) {
                        self.update_pins_of(hg, he, rng);
                    }
                    self.locks[he as usize] = LockState::Locked;
                }
                LockState::Locked => {}
            }
        }
    }

    fn update_pins_of(&mut self, hg: &Hypergraph, he: HyperedgeId, rng: &mut Randomize) {
        for &pin in hg.pins(he) {
            self.update_pin(hg, pin, rng);
        }
    }

    fn update_pin(&mut self, hg: &Hypergraph, pin: HypernodeId, rng: &mut Randomize) {
        if self.pq.contains(pin) {
            debug_assert!(!self.marked[pin as usize]);
            if hg.is_border_node(pin) {
                if !self.just_updated[pin as usize] {
                    let (gain, target) = self.compute_max_gain(hg, pin, rng);
                    self.pq.update(pin, gain, target);
                    self.just_updated[pin as usize] = true;
                    self.just_updated_list.push(pin);
                }
            } else {
                self.pq.remove(pin);
            }
        } else if !self.marked[pin as usize] {
            // Border check happens inside activate.
            self.activate(hg, pin, rng);
            if self.pq.contains(pin) {
                self.just_updated[pin as usize] = true;
                self.just_updated_list.push(pin);
            }
        }
    }

    fn rollback(&self, hg: &mut Hypergraph, mut last_index: isize, min_cut_index: isize) {
        while last_index != min_cut_index {
            let m = self.performed_moves[last_index as usize];
            hg.change_node_part(m.hn, m.to, m.from);
            last_index -= 1;
        }
    }
}

impl<P: StoppingPolicy> Refiner for KWayFmRefiner<P> {
    fn refine(
        &mut self,
        hg: &mut Hypergraph,
        refinement_nodes: &[HypernodeId],
        best_cut: &mut HyperedgeWeight,
        rng: &mut Randomize,
    ) -> bool {
        debug_assert_eq!(*best_cut, crate::metrics::hyperedge_cut(hg));
        self.pq.clear();
        self.marked.fill(false);
        self.performed_moves.clear();
        while let Some(he) = self.touched_hes.pop() {
            self.locks[he as usize] = LockState::Free;
        }
        let beta = (hg.current_num_nodes() as f64).ln();

        let mut seeds = refinement_nodes.to_vec();
        rng.shuffle(&mut seeds);
        for &hn in &seeds {
            if !self.pq.contains(hn) && !self.marked[hn as usize] {
                self.activate(hg, hn, rng);
            }
        }

        let initial_cut = *best_cut;
        let mut cut = *best_cut;
        let mut best = *best_cut;
        let mut min_cut_index: isize = -1;

        self.policy.reset();
        loop {
            let num_moves = self.performed_moves.len();
            let moves_since_best = (num_moves as isize - 1 - min_cut_index).max(0) as usize;
            if self.pq.is_empty()
                || self
                    .policy
                    .should_stop(moves_since_best, &self.config.fm, beta, best, cut)
            {
                break;
            }

            let max_gain_node = self.pq.max().expect("queue is non-empty");
            // Locked nets do not propagate updates, so an entry may be
            // stale: nodes that turned internal are dropped, stale keys are
            // refreshed in place before they are trusted.
            if !hg.is_border_node(max_gain_node) {
                self.pq.delete_max();
                continue;
            }
            let stored_gain = self.pq.max_key().expect("queue is non-empty");
            let (max_gain, to) = self.compute_max_gain(hg, max_gain_node, rng);
            if max_gain != stored_gain {
                self.pq.update(max_gain_node, max_gain, to);
                continue;
            }
            let from = hg.part_id(max_gain_node);
            self.pq.delete_max();

            debug_assert!(!self.marked[max_gain_node as usize]);

            if self.move_hypernode(hg, max_gain_node, from, to) {
                cut -= max_gain;
                self.policy.update(max_gain);
                debug_assert_eq!(
                    cut,
                    crate::metrics::hyperedge_cut(hg),
                    "tracked cut diverged after moving node {}",
                    max_gain_node
                );
                self.update_neighbours(hg, max_gain_node, from, to, rng);

                if cut < best || (cut == best && rng.flip_coin()) {
                    if cut < best {
                        self.policy.reset();
                    }
                    best = cut;
                    min_cut_index = self.performed_moves.len() as isize;
                }
                self.performed_moves.push(RollbackInfo {
                    hn: max_gain_node,
                    from,
                    to,
                });
            }
        }

        self.rollback(hg, self.performed_moves.len() as isize - 1, min_cut_index);
        debug_assert_eq!(best, crate::metrics::hyperedge_cut(hg));
        debug_assert!(best <= initial_cut);
        *best_cut = best;
        best < initial_cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::hyperedge_cut;
    use crate::refinement::stopping::NumberOfFruitlessMoves;

    fn seven_node(k: PartitionId) -> Hypergraph {
        let index = vec![0, 2, 6, 9, 12];
        let edges = vec![0, 1, 0, 6, 4, 5, 4, 5, 3, 1, 2, 3];
        Hypergraph::new(7, 4, &index, &edges, k, None, None)
    }

    fn refiner_for(hg: &Hypergraph, k: PartitionId) -> KWayFmRefiner<NumberOfFruitlessMoves> {
        let mut cfg = Configuration::new(k, 0.5, 1);
        cfg.validate_for(hg).unwrap();
        KWayFmRefiner::new(hg, cfg, NumberOfFruitlessMoves::default())
    }

    #[test]
    fn max_gain_matches_cut_delta() {
        let mut hg = seven_node(3);
        for (v, p) in [(0, 0), (1, 0), (2, 1), (3, 1), (4, 2), (5, 2), (6, 0)] {
            hg.set_node_part(v, p);
        }
        let mut refiner = refiner_for(&hg, 3);
        let mut rng = Randomize::with_seed(1);
        for hn in 0..7 {
            if !hg.is_border_node(hn) {
                continue;
            }
            let (gain, target) = refiner.compute_max_gain(&hg, hn, &mut rng);
            let from = hg.part_id(hn);
            let before = hyperedge_cut(&hg);
            hg.change_node_part(hn, from, target);
            assert_eq!(before - hyperedge_cut(&hg), gain, "gain law for node {}", hn);
            hg.change_node_part(hn, target, from);
        }
    }

    #[test]
    fn activates_only_border_nodes() {
        let mut hg = seven_node(2);
        for v in 0..7 {
            hg.set_node_part(v, if v == 6 { 1 } else { 0 });
        }
        let mut refiner = refiner_for(&hg, 2);
        let mut rng = Randomize::with_seed(1);
        for v in 0..7 {
            refiner.activate(&hg, v, &mut rng);
        }
        // Only the pins of the single cut net {0, 6, 4, 5} are border nodes.
        for v in [0u32, 4, 5, 6] {
            assert!(refiner.pq.contains(v), "node {} should be active", v);
        }
        for v in [1u32, 2, 3] {
            assert!(!refiner.pq.contains(v), "node {} is internal", v);
        }
    }

    #[test]
    fn refuses_moves_that_overload_the_target() {
        let mut hg = seven_node(2);
        for v in 0..7 {
            hg.set_node_part(v, if v < 4 { 0 } else { 1 });
        }
        let mut cfg = Configuration::new(2, 0.0, 1);
        cfg.validate_for(&hg).unwrap();
        let mut refiner = KWayFmRefiner::new(&hg, cfg, NumberOfFruitlessMoves::default());
        // Target block 0 already carries weight 4 = its bound.
        let moved = refiner.move_hypernode(&mut hg, 6, 1, 0);
        assert!(!moved);
        assert!(refiner.marked[6]);
        assert_eq!(hg.part_id(6), 1);
    }

    #[test]
    fn never_regresses_and_rolls_back_to_best() {
        for seed in 0..10 {
            let mut hg = seven_node(3);
            for v in 0..7 {
                hg.set_node_part(v, (v % 3) as PartitionId);
            }
            let mut refiner = refiner_for(&hg, 3);
            let mut cut = hyperedge_cut(&hg);
            let initial = cut;
            let border: Vec<_> = hg.nodes().filter(|&v| hg.is_border_node(v)).collect();
            let mut rng = Randomize::with_seed(seed);
            refiner.refine(&mut hg, &border, &mut cut, &mut rng);
            assert!(cut <= initial, "seed {} regressed", seed);
            assert_eq!(cut, hyperedge_cut(&hg), "rollback left a stale cut");
            assert!(hg.check_invariants());
        }
    }

    #[test]
    fn lock_states_reset_between_calls() {
        let mut hg = seven_node(3);
        for v in 0..7 {
            hg.set_node_part(v, (v % 3) as PartitionId);
        }
        let mut refiner = refiner_for(&hg, 3);
        let mut cut = hyperedge_cut(&hg);
        let border: Vec<_> = hg.nodes().filter(|&v| hg.is_border_node(v)).collect();
        let mut rng = Randomize::with_seed(4);
        refiner.refine(&mut hg, &border, &mut cut, &mut rng);
        // A second call must start with every net unlocked.
        let mut cut2 = hyperedge_cut(&hg);
        let border: Vec<_> = hg.nodes().filter(|&v| hg.is_border_node(v)).collect();
        refiner.refine(&mut hg, &border, &mut cut2, &mut rng);
        assert!(refiner
            .touched_hes
            .iter()
            .all(|&he| refiner.locks[he as usize] != LockState::Free));
        assert!(cut2 <= cut);
    }
}
