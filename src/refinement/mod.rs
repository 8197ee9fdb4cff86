//! Local search refinement.
//!
//! Both refiners implement the same narrow contract: seed them with a set
//! of refinement nodes and the current cut, and they improve the labeling
//! in place, returning whether the cut got better. Rollback to the best
//! observed cut is internal; on return the hypergraph is exactly at the
//! best state seen.

pub mod kway_fm;
pub mod stopping;
pub mod two_way_fm;

pub use kway_fm::KWayFmRefiner;
pub use stopping::{NGPRandomWalk, NumberOfFruitlessMoves, RandomWalkModel, StoppingPolicy};
pub use two_way_fm::TwoWayFmRefiner;

use crate::hypergraph::{HyperedgeWeight, Hypergraph, HypernodeId};
use crate::random::Randomize;

pub trait Refiner {
    /// Hook for per-level setup; the default does nothing.
    fn initialize(&mut self, _hg: &Hypergraph) {}

    /// Runs one local search from the given seed nodes. `best_cut` carries
    /// the current cut in and the best achieved cut out. Returns true iff
    /// the cut improved.
    fn refine(
        &mut self,
        hg: &mut Hypergraph,
        refinement_nodes: &[HypernodeId],
        best_cut: &mut HyperedgeWeight,
        rng: &mut Randomize,
    ) -> bool;
}
