//! Partitioning configuration.
//!
//! A plain record shared by every pipeline component. The orchestrator
//! validates it once at entry and fills in the derived fields (total weight,
//! per-block upper bounds, contraction limit); algorithm code treats it as
//! read-only afterwards.

use crate::error::{PartitionError, Result};
use crate::hypergraph::{Hypergraph, HypernodeWeight, PartitionId};

/// Top-level strategy of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One coarsening, one k-way initial partition, one k-way uncoarsening.
    #[default]
    DirectKWay,
    /// Bisect, then recurse on each side with rescaled k.
    RecursiveBisection,
}

/// Local search termination rule; see [`crate::refinement::stopping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoppingRule {
    #[default]
    NumberOfFruitlessMoves,
    RandomWalkModel,
    NGPRandomWalk,
}

#[derive(Debug, Clone)]
pub struct PartitionConfig {
    pub k: PartitionId,
    pub epsilon: f64,
    pub seed: u64,
    pub mode: Mode,
    /// Derived: total vertex weight of the input.
    pub total_graph_weight: HypernodeWeight,
    /// Derived: `(1 + epsilon) * ceil(total / k)`, one entry per block.
    pub max_part_weights: Vec<HypernodeWeight>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            k: 2,
            epsilon: 0.03,
            seed: 1,
            mode: Mode::default(),
            total_graph_weight: 0,
            max_part_weights: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoarseningConfig {
    /// Coarsening stops once `current_num_nodes <= contraction_limit_multiplier * k`.
    pub contraction_limit_multiplier: usize,
    /// Hard cap on the weight of a contracted vertex. `None` derives a cap
    /// from the instance at validation time.
    pub max_vertex_weight: Option<HypernodeWeight>,
    /// Derived: the actual node-count target.
    pub contraction_limit: usize,
    /// Derived from `max_vertex_weight` or the instance.
    pub max_allowed_vertex_weight: HypernodeWeight,
}

impl Default for CoarseningConfig {
    fn default() -> Self {
        Self {
            contraction_limit_multiplier: 160,
            max_vertex_weight: None,
            contraction_limit: 0,
            max_allowed_vertex_weight: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FmConfig {
    pub stopping_rule: StoppingRule,
    pub max_number_of_fruitless_moves: usize,
    /// Scale factor of the adaptive stopping rules.
    pub alpha: f64,
}

impl Default for FmConfig {
    fn default() -> Self {
        Self {
            stopping_rule: StoppingRule::default(),
            max_number_of_fruitless_moves: 150,
            alpha: 1.0,
        }
    }
}

/// Configuration record shared across the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub partition: PartitionConfig,
    pub coarsening: CoarseningConfig,
    pub fm: FmConfig,
}

impl Configuration {
    /// Convenience constructor for the common CLI surface.
    pub fn new(k: PartitionId, epsilon: f64, seed: u64) -> Self {
        Self {
            partition: PartitionConfig {
                k,
                epsilon,
                seed,
                ..PartitionConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validates the user-supplied fields against `hg` and computes the
    /// derived ones. Called exactly once, at orchestrator entry.
    pub fn validate_for(&mut self, hg: &Hypergraph) -> Result<()> {
        if self.partition.k < 2 {
            return Err(PartitionError::KTooSmall(self.partition.k.max(0) as u32));
        }
        if self.partition.epsilon < 0.0 {
            return Err(PartitionError::NegativeEpsilon(self.partition.epsilon));
        }

        let total = hg.total_weight();
        self.partition.total_graph_weight = total;
        let k = self.partition.k as i64;
        let perfect = (total + k - 1) / k;
        let upper = ((1.0 + self.partition.epsilon) * perfect as f64) as HypernodeWeight;
        self.partition.max_part_weights = vec![upper; self.partition.k as usize];

        self.coarsening.contraction_limit =
            self.coarsening.contraction_limit_multiplier * self.partition.k as usize;
        let heaviest = hg.nodes().map(|v| hg.node_weight(v)).max().unwrap_or(1);
        match self.coarsening.max_vertex_weight {
            Some(limit) => {
                if let Some(hn) = hg.nodes().find(|&v| hg.node_weight(v) > limit) {
                    return Err(PartitionError::NodeTooHeavy {
                        hn,
                        weight: hg.node_weight(hn),
                        limit,
                    });
                }
                self.coarsening.max_allowed_vertex_weight = limit;
            }
            None => {
                let derived =
                    (1.5 * total as f64 / self.coarsening.contraction_limit.max(1) as f64).ceil()
                        as HypernodeWeight;
                self.coarsening.max_allowed_vertex_weight = derived.max(heaviest);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypergraph::Hypergraph;

    fn tiny() -> Hypergraph {
        let index = vec![0, 2, 6, 9, 12];
        let edges = vec![0, 1, 0, 6, 4, 5, 4, 5, 3, 1, 2, 3];
        Hypergraph::new(7, 4, &index, &edges, 2, None, None)
    }

    #[test]
    fn derives_balance_bounds() {
        let hg = tiny();
        let mut cfg = Configuration::new(2, 0.03, 1);
        cfg.validate_for(&hg).unwrap();
        assert_eq!(cfg.partition.total_graph_weight, 7);
        // ceil(7/2) = 4; (1.03 * 4) truncates to 4.
        assert_eq!(cfg.partition.max_part_weights, vec![4, 4]);
        assert!(cfg.coarsening.max_allowed_vertex_weight >= 1);
    }

    #[test]
    fn rejects_small_k() {
        let hg = tiny();
        let mut cfg = Configuration::new(1, 0.03, 1);
        assert!(matches!(
            cfg.validate_for(&hg),
            Err(PartitionError::KTooSmall(1))
        ));
    }

    #[test]
    fn rejects_negative_epsilon() {
        let hg = tiny();
        let mut cfg = Configuration::new(2, -0.5, 1);
        assert!(matches!(
            cfg.validate_for(&hg),
            Err(PartitionError::NegativeEpsilon(_))
        ));
    }

    #[test]
    fn rejects_overweight_node() {
        let index = vec![0, 2];
        let edges = vec![0, 1];
        let weights = vec![10, 1];
        let hg = Hypergraph::new(2, 1, &index, &edges, 2, None, Some(&weights));
        let mut cfg = Configuration::new(2, 0.0, 1);
        cfg.coarsening.max_vertex_weight = Some(5);
        assert!(matches!(
            cfg.validate_for(&hg),
            Err(PartitionError::NodeTooHeavy { hn: 0, weight: 10, limit: 5 })
        ));
    }
}
