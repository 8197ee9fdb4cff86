//! Rating-based coarsening.
//!
//! Each pass visits the enabled vertices in random order; an unmatched
//! vertex is paired with the unmatched neighbor of maximum rating and the
//! pair is contracted immediately. Passes repeat until the contraction limit
//! is reached or a pass contracts nothing. Every contraction is recorded on
//! a history stack, together with the single-pin hyperedges it produced,
//! so the orchestrator can replay it backwards.

use log::debug;

use crate::config::Configuration;
use crate::hypergraph::{HyperedgeId, Hypergraph, HypernodeId, Memento};
use crate::random::Randomize;

/// Scoring function for a contraction candidate pair. The coarsener
/// accumulates `edge_score` over the edges shared by the pair.
pub trait RatingPolicy {
    fn edge_score(&self, hg: &Hypergraph, he: HyperedgeId) -> f64;
}

/// Heavy-edge rating: `w(e) / (|e| - 1)`, favoring heavy small nets.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeavyEdgeRating;

impl RatingPolicy for HeavyEdgeRating {
    fn edge_score(&self, hg: &Hypergraph, he: HyperedgeId) -> f64 {
        hg.edge_weight(he) as f64 / (hg.edge_size(he) as f64 - 1.0)
    }
}

/// One coarsening step: the contraction plus the nets that collapsed to a
/// single pin and were removed right after it.
#[derive(Debug, Clone)]
pub struct CoarseningMemento {
    pub contraction: Memento,
    pub removed_single_pin_hes: Vec<HyperedgeId>,
}

/// Pass-based matching coarsener with a pluggable rating.
#[derive(Debug)]
pub struct Coarsener<R: RatingPolicy = HeavyEdgeRating> {
    rating: R,
    /// Per-node rating accumulator, reset via `seen` after every candidate.
    ratings: Vec<f64>,
    seen: Vec<HypernodeId>,
}

impl<R: RatingPolicy> Coarsener<R> {
    pub fn new(rating: R, initial_num_nodes: usize) -> Self {
        Self {
            rating,
            ratings: vec![0.0; initial_num_nodes],
            seen: Vec::new(),
        }
    }

    /// Coarsens `hg` down to the configured contraction limit and returns
    /// the contraction history, oldest step first.
    pub fn coarsen(
        &mut self,
        hg: &mut Hypergraph,
        config: &Configuration,
        rng: &mut Randomize,
    ) -> Vec<CoarseningMemento> {
        let limit = config.coarsening.contraction_limit.max(1);
        let max_weight = config.coarsening.max_allowed_vertex_weight;
        let mut history = Vec::new();

        while hg.current_num_nodes() > limit {
            let mut order: Vec<HypernodeId> = hg.nodes().collect();
            rng.shuffle(&mut order);
            let mut matched = vec![false; hg.initial_num_nodes()];
            let mut contractions_this_pass = 0usize;

            for v in order {
                if hg.current_num_nodes() <= limit {
                    break;
                }
                if matched[v as usize] || !hg.node_is_enabled(v) {
                    continue;
                }
                if let Some(target) = self.best_partner(hg, v, &matched, max_weight, rng) {
                    matched[v as usize] = true;
                    matched[target as usize] = true;
                    let contraction = hg.contract(v, target);
                    let removed = remove_single_pin_nets(hg, v);
                    history.push(CoarseningMemento {
                        contraction,
                        removed_single_pin_hes: removed,
                    });
                    contractions_this_pass += 1;
                }
            }

            if contractions_this_pass == 0 {
                break;
            }
        }

        debug!(
            "coarsening finished: {} nodes, {} edges, {} contractions",
            hg.current_num_nodes(),
            hg.current_num_edges(),
            history.len()
        );
        history
    }

    /// Unmatched neighbor of `v` with maximum accumulated rating.
    /// Ties prefer the lighter partner, then a coin flip.
    fn best_partner(
        &mut self,
        hg: &Hypergraph,
        v: HypernodeId,
        matched: &[bool],
        max_weight: i64,
        rng: &mut Randomize,
    ) -> Option<HypernodeId> {
        let v_weight = hg.node_weight(v);
        for he in hg.incident_edges(v) {
            let score = self.rating.edge_score(hg, he);
            for &pin in hg.pins(he) {
                if pin == v || matched[pin as usize] {
                    continue;
                }
                if v_weight + hg.node_weight(pin) > max_weight {
                    continue;
                }
                if self.ratings[pin as usize] == 0.0 {
                    self.seen.push(pin);
                }
                self.ratings[pin as usize] += score;
            }
        }

        let mut best: Option<HypernodeId> = None;
        for &candidate in &self.seen {
            let rating = self.ratings[candidate as usize];
            let better = match best {
                None => true,
                Some(current) => {
                    let current_rating = self.ratings[current as usize];
                    if rating != current_rating {
                        rating > current_rating
                    } else if hg.node_weight(candidate) != hg.node_weight(current) {
                        hg.node_weight(candidate) < hg.node_weight(current)
                    } else {
                        rng.flip_coin()
                    }
                }
            };
            if better {
                best = Some(candidate);
            }
        }

        for &pin in &self.seen {
            self.ratings[pin as usize] = 0.0;
        }
        self.seen.clear();
        best
    }
}

/// Removes nets of `v` that collapsed to a single pin, in incidence order.
fn remove_single_pin_nets(hg: &mut Hypergraph, v: HypernodeId) -> Vec<HyperedgeId> {
    let singles: Vec<HyperedgeId> = hg
        .incident_edges(v)
        .filter(|&he| hg.edge_size(he) == 1)
        .collect();
    for &he in &singles {
        hg.remove_edge(he);
    }
    singles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    fn seven_node() -> Hypergraph {
        let index = vec![0, 2, 6, 9, 12];
        let edges = vec![0, 1, 0, 6, 4, 5, 4, 5, 3, 1, 2, 3];
        Hypergraph::new(7, 4, &index, &edges, 2, None, None)
    }

    fn config_with_limit(limit: usize) -> Configuration {
        let mut cfg = Configuration::new(2, 0.03, 1);
        cfg.coarsening.contraction_limit = limit;
        cfg.coarsening.max_allowed_vertex_weight = 100;
        cfg
    }

    #[test]
    fn coarsens_to_the_contraction_limit() {
        let mut hg = seven_node();
        let cfg = config_with_limit(3);
        let mut coarsener = Coarsener::new(HeavyEdgeRating, hg.initial_num_nodes());
        let mut rng = Randomize::with_seed(1);
        let history = coarsener.coarsen(&mut hg, &cfg, &mut rng);
        assert!(hg.current_num_nodes() <= 3 || history.is_empty());
        assert_eq!(7 - history.len(), hg.current_num_nodes());
    }

    #[test]
    fn history_reverses_to_the_original() {
        let mut hg = seven_node();
        let reference = hg.clone();
        let cfg = config_with_limit(2);
        let mut coarsener = Coarsener::new(HeavyEdgeRating, hg.initial_num_nodes());
        let mut rng = Randomize::with_seed(42);
        let history = coarsener.coarsen(&mut hg, &cfg, &mut rng);
        for step in history.iter().rev() {
            for &he in step.removed_single_pin_hes.iter().rev() {
                hg.restore_edge(he);
            }
            hg.uncontract(&step.contraction);
        }
        assert!(crate::hypergraph::verify_equivalence_with_partition_info(
            &reference, &hg
        ));
    }

    #[test]
    fn heavy_edge_rating_prefers_heavy_small_nets() {
        // Edge {0,1} has weight 9, edge {1,2,3} weight 3: rating(0,1) = 9,
        // rating(1,2) = 1.5, so 1 pairs with 0.
        let index = vec![0, 2, 5];
        let edges = vec![0, 1, 1, 2, 3];
        let weights = vec![9, 3];
        let hg = Hypergraph::new(4, 2, &index, &edges, 2, Some(&weights), None);
        let mut coarsener = Coarsener::new(HeavyEdgeRating, 4);
        let mut rng = Randomize::with_seed(7);
        let matched = vec![false; 4];
        let best = coarsener.best_partner(&hg, 1, &matched, 100, &mut rng);
        assert_eq!(best, Some(0));
    }

    #[test]
    fn respects_the_weight_cap() {
        let index = vec![0, 2];
        let edges = vec![0, 1];
        let node_weights = vec![60, 50];
        let hg = Hypergraph::new(2, 1, &index, &edges, 2, None, Some(&node_weights));
        let mut coarsener = Coarsener::new(HeavyEdgeRating, 2);
        let mut rng = Randomize::with_seed(7);
        let matched = vec![false; 2];
        // 60 + 50 exceeds the cap of 100: no admissible partner.
        let best = coarsener.best_partner(&hg, 0, &matched, 100, &mut rng);
        assert_eq!(best, None);
    }

    #[test]
    fn removes_and_records_single_pin_nets() {
        // Contracting 1 into 0 collapses the two-pin net {0,1}.
        let index = vec![0, 2, 5];
        let edges = vec![0, 1, 0, 1, 2];
        let mut hg = Hypergraph::new(3, 2, &index, &edges, 2, None, None);
        let mut cfg = config_with_limit(2);
        cfg.coarsening.contraction_limit = 2;
        let mut coarsener = Coarsener::new(HeavyEdgeRating, 3);
        let mut rng = Randomize::with_seed(3);
        let history = coarsener.coarsen(&mut hg, &cfg, &mut rng);
        assert_eq!(history.len(), 1);
        let removed: usize = history
            .iter()
            .map(|m| m.removed_single_pin_hes.len())
            .sum();
        if hg.current_num_edges() == 1 {
            assert_eq!(removed, 1);
        }
        for e in hg.edges() {
            assert!(hg.edge_size(e) >= 2);
        }
    }
}
