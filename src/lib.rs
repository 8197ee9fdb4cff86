//! # hypercut
//!
//! hypercut is a multilevel k-way hypergraph partitioner. Given a weighted
//! hypergraph, a block count k and an imbalance tolerance epsilon, it
//! computes a vertex labeling that minimizes the weight of hyperedges
//! spanning more than one block, subject to the balance constraint
//! `max_p w(V_p) <= (1 + epsilon) * ceil(w(V) / k)`.
//!
//! ## Pipeline
//! - Heavy-edge coarsening contracts rated vertex pairs down to a small
//!   instance, recording a reversible contraction history.
//! - An initial partitioner labels the coarsest hypergraph (greedy
//!   hypergraph growing, per-block or bisection).
//! - Uncoarsening pops the history and runs Fiduccia-Mattheyses local
//!   search around every uncontraction: 2-way boundary FM or k-way
//!   max-gain-node FM with hyperedge locking, each with best-cut rollback
//!   and pluggable stopping policies.
//!
//! ## Usage
//! ```no_run
//! use hypercut::config::Configuration;
//! use hypercut::io::read_hgr;
//! use hypercut::partitioner::partition;
//!
//! # fn main() -> Result<(), hypercut::error::PartitionError> {
//! let instance = read_hgr(std::path::Path::new("instance.hgr"))?;
//! let mut hg = instance.into_hypergraph(2);
//! let result = partition(&mut hg, &Configuration::new(2, 0.03, 1))?;
//! println!("cut: {}", result.cut);
//! # Ok(())
//! # }
//! ```
//!
//! All randomness flows through a single seeded PRNG handle: identical
//! seed and input give identical output.

pub mod coarsening;
pub mod config;
pub mod datastructure;
pub mod error;
pub mod hypergraph;
pub mod initial;
pub mod io;
pub mod metrics;
pub mod partitioner;
pub mod random;
pub mod refinement;

/// The most-used types and entry points in one import.
pub mod prelude {
    pub use crate::config::{Configuration, Mode, StoppingRule};
    pub use crate::error::{PartitionError, Result};
    pub use crate::hypergraph::{
        Gain, Hypergraph, HypergraphType, HyperedgeId, HyperedgeWeight, HypernodeId,
        HypernodeWeight, PartitionId, INVALID_PARTITION,
    };
    pub use crate::metrics::{hyperedge_cut, imbalance};
    pub use crate::partitioner::{partition, PartitionResult};
    pub use crate::random::Randomize;
}
