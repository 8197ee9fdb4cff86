//! The multilevel driver.
//!
//! One V-cycle: coarsen, partition the coarsest hypergraph, then walk the
//! contraction history backwards, projecting labels and running local
//! search around every uncontraction. Two strategies: direct k-way (k-way
//! initial partition plus k-way FM) and recursive bisection (2-way FM per
//! level, block extraction, recursion with rescaled k).

use log::{debug, info};

use crate::coarsening::{Coarsener, CoarseningMemento, HeavyEdgeRating};
use crate::config::{Configuration, Mode, StoppingRule};
use crate::error::Result;
use crate::hypergraph::{
    HyperedgeId, HyperedgeWeight, Hypergraph, HypernodeId, HypernodeWeight, PartitionId,
};
use crate::initial::gain::FmGain;
use crate::initial::start_node::BfsStartNodeSelection;
use crate::initial::InitialPartitioner;
use crate::metrics::{hyperedge_cut, imbalance};
use crate::random::Randomize;
use crate::refinement::{
    KWayFmRefiner, NGPRandomWalk, NumberOfFruitlessMoves, RandomWalkModel, Refiner,
    StoppingPolicy, TwoWayFmRefiner,
};

/// Outcome of a partitioning run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionResult {
    pub cut: HyperedgeWeight,
    pub imbalance: f64,
}

/// Partitions `hg` into `config.partition.k` blocks.
///
/// Validates the configuration, seeds the PRNG and dispatches on the mode.
/// On return every enabled node carries a block id in `0..k` and the
/// balance constraint holds for feasible inputs.
pub fn partition(hg: &mut Hypergraph, config: &Configuration) -> Result<PartitionResult> {
    let mut config = config.clone();
    config.validate_for(hg)?;
    assert_eq!(
        hg.k(),
        config.partition.k,
        "hypergraph was built for a different k"
    );
    let mut rng = Randomize::with_seed(config.partition.seed);
    hg.reset_partitioning();

    // Single-pin nets can never be cut and confuse the gain formulas;
    // they sit out the entire pipeline.
    let trivial_nets: Vec<HyperedgeId> = hg
        .edges()
        .filter(|&he| hg.edge_size(he) < 2)
        .collect();
    for &he in &trivial_nets {
        hg.remove_edge(he);
    }

    match config.partition.mode {
        Mode::DirectKWay => match config.fm.stopping_rule {
            StoppingRule::NumberOfFruitlessMoves => {
                direct_kway(hg, &config, &mut rng, NumberOfFruitlessMoves::default())
            }
            StoppingRule::RandomWalkModel => {
                direct_kway(hg, &config, &mut rng, RandomWalkModel::default())
            }
            StoppingRule::NGPRandomWalk => {
                direct_kway(hg, &config, &mut rng, NGPRandomWalk::default())
            }
        },
        Mode::RecursiveBisection => match config.fm.stopping_rule {
            StoppingRule::NumberOfFruitlessMoves => {
                recursive_bisection::<NumberOfFruitlessMoves>(hg, &config, &mut rng)
            }
            StoppingRule::RandomWalkModel => {
                recursive_bisection::<RandomWalkModel>(hg, &config, &mut rng)
            }
            StoppingRule::NGPRandomWalk => {
                recursive_bisection::<NGPRandomWalk>(hg, &config, &mut rng)
            }
        },
    }

    for &he in trivial_nets.iter().rev() {
        hg.restore_edge(he);
    }
    debug_assert!(hg.check_invariants());

    let result = PartitionResult {
        cut: hyperedge_cut(hg),
        imbalance: imbalance(hg),
    };
    info!(
        "partitioned into {} blocks: cut {}, imbalance {:.4}",
        config.partition.k, result.cut, result.imbalance
    );
    Ok(result)
}

/// Pops the history, projecting labels and refining around each revealed
/// vertex; one final pass runs over all border nodes.
fn uncoarsen<R: Refiner>(
    hg: &mut Hypergraph,
    history: Vec<CoarseningMemento>,
    refiner: &mut R,
    best_cut: &mut HyperedgeWeight,
    rng: &mut Randomize,
) {
    for step in history.into_iter().rev() {
        for &he in step.removed_single_pin_hes.iter().rev() {
            hg.restore_edge(he);
        }
        hg.uncontract(&step.contraction);
        let seeds = [step.contraction.u, step.contraction.v];
        refiner.refine(hg, &seeds, best_cut, rng);
    }
    let border: Vec<HypernodeId> = hg.nodes().filter(|&v| hg.is_border_node(v)).collect();
    refiner.refine(hg, &border, best_cut, rng);
}

fn direct_kway<P: StoppingPolicy>(
    hg: &mut Hypergraph,
    config: &Configuration,
    rng: &mut Randomize,
    policy: P,
) {
    let mut coarsener = Coarsener::new(HeavyEdgeRating, hg.initial_num_nodes());
    let history = coarsener.coarsen(hg, config, rng);

    let initial = InitialPartitioner::new(BfsStartNodeSelection, FmGain);
    initial.partition_kway(hg, config, rng);
    debug!(
        "initial k-way partition: cut {}, imbalance {:.4}",
        hyperedge_cut(hg),
        imbalance(hg)
    );

    let mut refiner = KWayFmRefiner::new(hg, config.clone(), policy);
    refiner.initialize(hg);
    let mut best_cut = hyperedge_cut(hg);
    let border: Vec<HypernodeId> = hg.nodes().filter(|&v| hg.is_border_node(v)).collect();
    refiner.refine(hg, &border, &mut best_cut, rng);

    uncoarsen(hg, history, &mut refiner, &mut best_cut, rng);
}

/// Bisects, extracts both blocks and recurses with rescaled k. Labels are
/// computed on the extracted sub-hypergraphs and finally applied to `hg`.
fn recursive_bisection<P: StoppingPolicy + Default>(
    hg: &mut Hypergraph,
    config: &Configuration,
    rng: &mut Randomize,
) {
    let k = config.partition.k;
    let labels = bisect_recursively::<P>(hg, k, config, rng);
    hg.reset_partitioning();
    for v in hg.nodes().collect::<Vec<_>>() {
        hg.set_node_part(v, labels[v as usize]);
    }
}

/// Returns a label in `0..k` for every enabled node of `hg`. Consumes the
/// partition state of `hg` as scratch space.
fn bisect_recursively<P: StoppingPolicy + Default>(
    hg: &mut Hypergraph,
    k: PartitionId,
    config: &Configuration,
    rng: &mut Randomize,
) -> Vec<PartitionId> {
    debug_assert!(k >= 1);
    let mut labels = vec![0; hg.initial_num_nodes()];
    if k == 1 {
        return labels;
    }

    // ceil(k/2) blocks on side 0, the rest on side 1; target weights are
    // proportional to the block counts.
    let k0 = (k + 1) / 2;
    let k1 = k - k0;
    multilevel_bisect::<P>(hg, config, [k0, k1], rng);

    for (block, (k_side, offset)) in [(0, (k0, 0)), (1, (k1, k0))] {
        let (mut sub, node_map) = hg.extract_block(block);
        let sub_labels = bisect_recursively::<P>(&mut sub, k_side, config, rng);
        for (sub_id, &orig) in node_map.iter().enumerate() {
            labels[orig as usize] = offset + sub_labels[sub_id];
        }
    }
    labels
}

/// One multilevel 2-way partition of `hg` with side weights proportional
/// to `side_k[0] : side_k[1]`.
fn multilevel_bisect<P: StoppingPolicy + Default>(
    hg: &mut Hypergraph,
    config: &Configuration,
    side_k: [PartitionId; 2],
    rng: &mut Randomize,
) {
    let local = bisection_config(config, hg, side_k);

    let mut coarsener = Coarsener::new(HeavyEdgeRating, hg.initial_num_nodes());
    let history = coarsener.coarsen(hg, &local, rng);

    let initial = InitialPartitioner::new(BfsStartNodeSelection, FmGain);
    initial.bisect(hg, &local, rng);

    let mut refiner = TwoWayFmRefiner::new(hg, local, P::default());
    refiner.initialize(hg);
    let mut best_cut = hyperedge_cut(hg);
    let border: Vec<HypernodeId> = hg.nodes().filter(|&v| hg.is_border_node(v)).collect();
    refiner.refine(hg, &border, &mut best_cut, rng);

    uncoarsen(hg, history, &mut refiner, &mut best_cut, rng);
}

/// Derives the 2-way sub-configuration for one bisection step: upper
/// bounds proportional to the number of final blocks on each side.
fn bisection_config(
    config: &Configuration,
    hg: &Hypergraph,
    side_k: [PartitionId; 2],
) -> Configuration {
    let total = hg.total_weight();
    let k = (side_k[0] + side_k[1]) as i64;
    let upper = |side: i64| -> HypernodeWeight {
        let perfect = (total * side + k - 1) / k;
        ((1.0 + config.partition.epsilon) * perfect as f64) as HypernodeWeight
    };
    let mut local = config.clone();
    local.partition.k = 2;
    local.partition.total_graph_weight = total;
    local.partition.max_part_weights = vec![upper(side_k[0] as i64), upper(side_k[1] as i64)];
    local.coarsening.contraction_limit = local.coarsening.contraction_limit_multiplier * 2;
    let heaviest = hg.nodes().map(|v| hg.node_weight(v)).max().unwrap_or(1);
    let derived = (1.5 * total as f64 / local.coarsening.contraction_limit.max(1) as f64).ceil()
        as HypernodeWeight;
    local.coarsening.max_allowed_vertex_weight = derived.max(heaviest);
    local
}
