//! Start-node selection policies for the growing initial partitioners.

use crate::hypergraph::{Hypergraph, HypernodeId};
use crate::random::Randomize;
use std::collections::VecDeque;

/// Chooses up to `k` distinct seed vertices on the (coarsest) hypergraph.
pub trait StartNodeSelection {
    fn calculate_start_nodes(
        &self,
        hg: &Hypergraph,
        k: usize,
        rng: &mut Randomize,
    ) -> Vec<HypernodeId>;
}

/// Pseudo-peripheral seeds: the first seed is random, every further seed is
/// the vertex reached last by a breadth-first search from all seeds chosen
/// so far. Disconnected remainders are seeded randomly.
#[derive(Debug, Default, Clone, Copy)]
pub struct BfsStartNodeSelection;

/// Uniformly random distinct seeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStartNodeSelection;

/// Seeds in order of decreasing degree.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxDegreeStartNodeSelection;

impl StartNodeSelection for BfsStartNodeSelection {
    fn calculate_start_nodes(
        &self,
        hg: &Hypergraph,
        k: usize,
        rng: &mut Randomize,
    ) -> Vec<HypernodeId> {
        let nodes: Vec<HypernodeId> = hg.nodes().collect();
        if nodes.is_empty() {
            return Vec::new();
        }
        let mut starts = vec![nodes[rng.index(nodes.len())]];
        while starts.len() < k.min(nodes.len()) {
            match deepest_from(hg, &starts) {
                Some(deepest) => starts.push(deepest),
                None => {
                    // Some component contains no seed yet.
                    let mut reached = vec![false; hg.initial_num_nodes()];
                    bfs_mark(hg, &starts, &mut reached);
                    let unreached: Vec<HypernodeId> = nodes
                        .iter()
                        .copied()
                        .filter(|&v| !reached[v as usize])
                        .collect();
                    starts.push(unreached[rng.index(unreached.len())]);
                }
            }
        }
        starts
    }
}

/// Last vertex popped by a BFS over all of `starts`, or `None` when every
/// reachable vertex is already a start node.
fn deepest_from(hg: &Hypergraph, starts: &[HypernodeId]) -> Option<HypernodeId> {
    let mut visited = vec![false; hg.initial_num_nodes()];
    let mut queue: VecDeque<HypernodeId> = VecDeque::new();
    for &s in starts {
        visited[s as usize] = true;
        queue.push_back(s);
    }
    let mut last = None;
    while let Some(v) = queue.pop_front() {
        if !starts.contains(&v) {
            last = Some(v);
        }
        for he in hg.incident_edges(v) {
            for &pin in hg.pins(he) {
                if !visited[pin as usize] {
                    visited[pin as usize] = true;
                    queue.push_back(pin);
                }
            }
        }
    }
    last
}

fn bfs_mark(hg: &Hypergraph, starts: &[HypernodeId], reached: &mut [bool]) {
    let mut queue: VecDeque<HypernodeId> = VecDeque::new();
    for &s in starts {
        reached[s as usize] = true;
        queue.push_back(s);
    }
    while let Some(v) = queue.pop_front() {
        for he in hg.incident_edges(v) {
            for &pin in hg.pins(he) {
                if !reached[pin as usize] {
                    reached[pin as usize] = true;
                    queue.push_back(pin);
                }
            }
        }
    }
}

impl StartNodeSelection for RandomStartNodeSelection {
    fn calculate_start_nodes(
        &self,
        hg: &Hypergraph,
        k: usize,
        rng: &mut Randomize,
    ) -> Vec<HypernodeId> {
        let mut nodes: Vec<HypernodeId> = hg.nodes().collect();
        rng.shuffle(&mut nodes);
        nodes.truncate(k);
        nodes
    }
}

impl StartNodeSelection for MaxDegreeStartNodeSelection {
    fn calculate_start_nodes(
        &self,
        hg: &Hypergraph,
        k: usize,
        _rng: &mut Randomize,
    ) -> Vec<HypernodeId> {
        let mut nodes: Vec<HypernodeId> = hg.nodes().collect();
        nodes.sort_by_key(|&v| std::cmp::Reverse(hg.node_degree(v)));
        nodes.truncate(k);
        nodes
    }
}
