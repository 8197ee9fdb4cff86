//! Compressed incidence store for weighted hypergraphs with partition state.
//!
//! Incidence is kept in CSR form on both sides: one arena holds the pin
//! lists of all hyperedges, another holds the incident-edge lists of all
//! hypernodes. Each row carries a `(first, len)` record so that contraction
//! can shrink a row without reallocation: entries beyond `len` are logically
//! removed but stay in place for later restoration. When a contraction has
//! to *grow* a node row (case-1 below), the row is relocated to the arena
//! tail and the memento records the old `(first, len)` pair, which makes
//! uncontraction an exact inverse.
//!
//! Partition state (part id per node, pin counts per part per edge,
//! connectivity sets, per-part weight and size aggregates) is maintained
//! incrementally by the mutation methods and by nothing else.

use log::trace;


/// Dense hypernode index, `0..num_nodes`.
pub type HypernodeId = u32;
/// Dense hyperedge index, `0..num_edges`.
pub type HyperedgeId = u32;
/// Block index; negative values are sentinels, never legal assignments.
pub type PartitionId = i32;
/// Hypernode weight. Inputs are positive; aggregates stay in range.
pub type HypernodeWeight = i64;
/// Hyperedge weight.
pub type HyperedgeWeight = i64;
/// Gain of moving a node to another block, in units of hyperedge weight.
pub type Gain = i64;

/// Part id of a node that has not been assigned yet.
pub const INVALID_PARTITION: PartitionId = -1;
/// Reserved sentinel, usable as the deleted-key of dense hash sets keyed by
/// part ids. Never a legal assignment.
pub const DELETED_PARTITION: PartitionId = -2;

/// Weight variant of an instance, mirroring the `.hgr` header type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HypergraphType {
    Unweighted = 0,
    EdgeWeights = 1,
    NodeWeights = 10,
    EdgeAndNodeWeights = 11,
}

/// Record of a single contraction `v -> u`, sufficient to reverse it.
///
/// `u_first`/`u_len` snapshot u's incidence row before the contraction;
/// the row may be relocated while it grows, so the offset has to be part of
/// the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memento {
    pub u: HypernodeId,
    pub u_first: usize,
    pub u_len: usize,
    pub v: HypernodeId,
}

#[derive(Debug, Clone)]
struct HypernodeRecord {
    first: usize,
    len: usize,
    weight: HypernodeWeight,
    enabled: bool,
}

#[derive(Debug, Clone)]
struct HyperedgeRecord {
    first: usize,
    len: usize,
    weight: HyperedgeWeight,
    enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PartInfo {
    weight: HypernodeWeight,
    size: usize,
}

/// Weighted hypergraph with in-place contraction and partition bookkeeping.
#[derive(Debug, Clone)]
pub struct Hypergraph {
    k: PartitionId,
    hypernodes: Vec<HypernodeRecord>,
    hyperedges: Vec<HyperedgeRecord>,
    /// Node-side arena; rows may be relocated to the tail to grow.
    incident_edges: Vec<HyperedgeId>,
    /// Edge-side arena; rows never move.
    pins: Vec<HypernodeId>,
    part_ids: Vec<PartitionId>,
    /// `pins_in_part[e * k + p]` = pins of e currently in block p.
    pins_in_part: Vec<u32>,
    /// Sorted set of blocks with at least one pin, per edge.
    connectivity_sets: Vec<Vec<PartitionId>>,
    part_info: Vec<PartInfo>,
    current_num_nodes: usize,
    current_num_edges: usize,
    current_num_pins: usize,
    total_weight: HypernodeWeight,
    has_hyperedge_weights: bool,
    has_hypernode_weights: bool,
    /// Scratch for uncontraction, cleared after every call.
    case_one_marker: Vec<bool>,
}

impl Hypergraph {
    /// Builds the store from a parser-provided index/edge vector pair.
    ///
    /// `index` has `num_edges + 1` entries; the pins of edge `e` are
    /// `edges[index[e]..index[e + 1]]`, already 0-based. Weight slices are
    /// optional; omitted weights default to 1.
    pub fn new(
        num_nodes: usize,
        num_edges: usize,
        index: &[usize],
        edges: &[HypernodeId],
        k: PartitionId,
        hyperedge_weights: Option<&[HyperedgeWeight]>,
        hypernode_weights: Option<&[HypernodeWeight]>,
    ) -> Self {
        assert_eq!(index.len(), num_edges + 1, "index vector length mismatch");
        assert_eq!(*index.last().unwrap_or(&0), edges.len());
        assert!(k >= 2, "a hypergraph is partitioned into at least 2 blocks");

        let hyperedges: Vec<HyperedgeRecord> = (0..num_edges)
            .map(|e| HyperedgeRecord {
                first: index[e],
                len: index[e + 1] - index[e],
                weight: hyperedge_weights.map_or(1, |w| w[e]),
                enabled: true,
            })
            .collect();

        // Node-side CSR: degree count, prefix sums, fill.
        let mut degree = vec![0usize; num_nodes];
        for &pin in edges {
            degree[pin as usize] += 1;
        }
        let mut first = vec![0usize; num_nodes + 1];
        for v in 0..num_nodes {
            first[v + 1] = first[v] + degree[v];
        }
        let mut incident_edges = vec![0 as HyperedgeId; edges.len()];
        let mut write = first.clone();
        for e in 0..num_edges {
            for &pin in &edges[index[e]..index[e + 1]] {
                incident_edges[write[pin as usize]] = e as HyperedgeId;
                write[pin as usize] += 1;
            }
        }

        let hypernodes: Vec<HypernodeRecord> = (0..num_nodes)
            .map(|v| HypernodeRecord {
                first: first[v],
                len: degree[v],
                weight: hypernode_weights.map_or(1, |w| w[v]),
                enabled: true,
            })
            .collect();
        let total_weight = hypernodes.iter().map(|hn| hn.weight).sum();

        Self {
            k,
            hypernodes,
            hyperedges,
            incident_edges,
            pins: edges.to_vec(),
            part_ids: vec![INVALID_PARTITION; num_nodes],
            pins_in_part: vec![0; num_edges * k as usize],
            connectivity_sets: vec![Vec::new(); num_edges],
            part_info: vec![PartInfo::default(); k as usize],
            current_num_nodes: num_nodes,
            current_num_edges: num_edges,
            current_num_pins: edges.len(),
            total_weight,
            has_hyperedge_weights: hyperedge_weights.is_some(),
            has_hypernode_weights: hypernode_weights.is_some(),
            case_one_marker: vec![false; num_edges],
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn k(&self) -> PartitionId {
        self.k
    }

    /// Number of hypernodes at construction time (enabled or not).
    pub fn initial_num_nodes(&self) -> usize {
        self.hypernodes.len()
    }

    pub fn initial_num_edges(&self) -> usize {
        self.hyperedges.len()
    }

    pub fn current_num_nodes(&self) -> usize {
        self.current_num_nodes
    }

    pub fn current_num_edges(&self) -> usize {
        self.current_num_edges
    }

    pub fn current_num_pins(&self) -> usize {
        self.current_num_pins
    }

    pub fn total_weight(&self) -> HypernodeWeight {
        self.total_weight
    }

    /// Sum of all hyperedge weights, disabled nets included. An upper
    /// bound for any gain value at any level of the hierarchy.
    pub fn total_edge_weight(&self) -> HyperedgeWeight {
        self.hyperedges.iter().map(|he| he.weight).sum()
    }

    pub fn hypergraph_type(&self) -> HypergraphType {
        match (self.has_hyperedge_weights, self.has_hypernode_weights) {
            (false, false) => HypergraphType::Unweighted,
            (true, false) => HypergraphType::EdgeWeights,
            (false, true) => HypergraphType::NodeWeights,
            (true, true) => HypergraphType::EdgeAndNodeWeights,
        }
    }

    pub fn node_is_enabled(&self, v: HypernodeId) -> bool {
        self.hypernodes[v as usize].enabled
    }

    pub fn edge_is_enabled(&self, e: HyperedgeId) -> bool {
        self.hyperedges[e as usize].enabled
    }

    /// Iterator over all enabled hypernodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = HypernodeId> + '_ {
        self.hypernodes
            .iter()
            .enumerate()
            .filter(|(_, hn)| hn.enabled)
            .map(|(v, _)| v as HypernodeId)
    }

    /// Iterator over all enabled hyperedges in id order.
    pub fn edges(&self) -> impl Iterator<Item = HyperedgeId> + '_ {
        self.hyperedges
            .iter()
            .enumerate()
            .filter(|(_, he)| he.enabled)
            .map(|(e, _)| e as HyperedgeId)
    }

    /// Enabled hyperedges incident to `v`.
    ///
    /// Disabled edges (removed single-pin nets) stay in the underlying row
    /// until restored; they are filtered here so callers never see them.
    pub fn incident_edges(&self, v: HypernodeId) -> impl Iterator<Item = HyperedgeId> + '_ {
        let hn = &self.hypernodes[v as usize];
        self.incident_edges[hn.first..hn.first + hn.len]
            .iter()
            .copied()
            .filter(|&he| self.hyperedges[he as usize].enabled)
    }

    /// Current pins of edge `e`.
    pub fn pins(&self, e: HyperedgeId) -> &[HypernodeId] {
        let he = &self.hyperedges[e as usize];
        &self.pins[he.first..he.first + he.len]
    }

    /// Number of enabled incident edges of `v`.
    pub fn node_degree(&self, v: HypernodeId) -> usize {
        self.incident_edges(v).count()
    }

    pub fn edge_size(&self, e: HyperedgeId) -> usize {
        self.hyperedges[e as usize].len
    }

    pub fn node_weight(&self, v: HypernodeId) -> HypernodeWeight {
        self.hypernodes[v as usize].weight
    }

    pub fn edge_weight(&self, e: HyperedgeId) -> HyperedgeWeight {
        self.hyperedges[e as usize].weight
    }

    pub fn part_id(&self, v: HypernodeId) -> PartitionId {
        self.part_ids[v as usize]
    }

    pub fn pin_count_in_part(&self, e: HyperedgeId, p: PartitionId) -> usize {
        debug_assert!(p >= 0 && p < self.k);
        self.pins_in_part[e as usize * self.k as usize + p as usize] as usize
    }

    /// Number of distinct blocks containing at least one pin of `e`.
    pub fn connectivity(&self, e: HyperedgeId) -> usize {
        self.connectivity_sets[e as usize].len()
    }

    /// Blocks containing at least one pin of `e`, in ascending order.
    pub fn connectivity_set(&self, e: HyperedgeId) -> &[PartitionId] {
        &self.connectivity_sets[e as usize]
    }

    pub fn part_weight(&self, p: PartitionId) -> HypernodeWeight {
        self.part_info[p as usize].weight
    }

    pub fn part_size(&self, p: PartitionId) -> usize {
        self.part_info[p as usize].size
    }

    /// A node is a border node iff some incident edge spans two blocks.
    pub fn is_border_node(&self, v: HypernodeId) -> bool {
        self.incident_edges(v).any(|he| self.connectivity(he) >= 2)
    }

    // ------------------------------------------------------------------
    // Partition mutation
    // ------------------------------------------------------------------

    /// First assignment of an unassigned node.
    pub fn set_node_part(&mut self, v: HypernodeId, p: PartitionId) {
        debug_assert!(self.hypernodes[v as usize].enabled);
        debug_assert_eq!(self.part_ids[v as usize], INVALID_PARTITION);
        debug_assert!(p >= 0 && p < self.k);
        self.part_ids[v as usize] = p;
        self.part_info[p as usize].weight += self.hypernodes[v as usize].weight;
        self.part_info[p as usize].size += 1;
        let (first, len) = {
            let hn = &self.hypernodes[v as usize];
            (hn.first, hn.len)
        };
        for idx in first..first + len {
            let he = self.incident_edges[idx];
            if self.hyperedges[he as usize].enabled {
                self.increment_pin_count(he, p);
            }
        }
    }

    /// Moves `v` from block `from` to block `to`, maintaining pin counts,
    /// connectivity sets and the per-part aggregates.
    pub fn change_node_part(&mut self, v: HypernodeId, from: PartitionId, to: PartitionId) {
        debug_assert!(self.hypernodes[v as usize].enabled);
        debug_assert_eq!(self.part_ids[v as usize], from);
        debug_assert!(from >= 0 && to >= 0 && from != to);
        let (first, len) = {
            let hn = &self.hypernodes[v as usize];
            (hn.first, hn.len)
        };
        for idx in first..first + len {
            let he = self.incident_edges[idx];
            if self.hyperedges[he as usize].enabled {
                self.decrement_pin_count(he, from);
                self.increment_pin_count(he, to);
            }
        }
        let w = self.hypernodes[v as usize].weight;
        self.part_ids[v as usize] = to;
        self.part_info[from as usize].weight -= w;
        self.part_info[from as usize].size -= 1;
        self.part_info[to as usize].weight += w;
        self.part_info[to as usize].size += 1;
    }

    /// Clears all partition state; every node becomes unassigned.
    pub fn reset_partitioning(&mut self) {
        self.part_ids.fill(INVALID_PARTITION);
        self.pins_in_part.fill(0);
        for set in &mut self.connectivity_sets {
            set.clear();
        }
        self.part_info.fill(PartInfo::default());
    }

    fn increment_pin_count(&mut self, e: HyperedgeId, p: PartitionId) {
        let slot = &mut self.pins_in_part[e as usize * self.k as usize + p as usize];
        *slot += 1;
        if *slot == 1 {
            let set = &mut self.connectivity_sets[e as usize];
            let pos = set.binary_search(&p).unwrap_err();
            set.insert(pos, p);
        }
    }

    fn decrement_pin_count(&mut self, e: HyperedgeId, p: PartitionId) {
        let slot = &mut self.pins_in_part[e as usize * self.k as usize + p as usize];
        debug_assert!(*slot > 0);
        *slot -= 1;
        if *slot == 0 {
            let set = &mut self.connectivity_sets[e as usize];
            let pos = set.binary_search(&p).expect("block must be in connectivity set");
            set.remove(pos);
        }
    }

    // ------------------------------------------------------------------
    // Contraction
    // ------------------------------------------------------------------

    /// Folds `v` into `u`. Both must be enabled, distinct and in the same
    /// block (or both unassigned).
    ///
    /// For every enabled edge incident to v: if u is also a pin the edge
    /// shrinks by one (parallel-pin case), otherwise v's pin slot is reused
    /// for u and the edge joins u's incidence row (case 1). Work is linear
    /// in the pins touched.
    pub fn contract(&mut self, u: HypernodeId, v: HypernodeId) -> Memento {
        debug_assert_ne!(u, v);
        debug_assert!(self.hypernodes[u as usize].enabled);
        debug_assert!(self.hypernodes[v as usize].enabled);
        debug_assert_eq!(self.part_ids[u as usize], self.part_ids[v as usize]);

        let part = self.part_ids[v as usize];
        let memento = Memento {
            u,
            u_first: self.hypernodes[u as usize].first,
            u_len: self.hypernodes[u as usize].len,
            v,
        };

        let v_first = self.hypernodes[v as usize].first;
        let v_len = self.hypernodes[v as usize].len;
        for idx in v_first..v_first + v_len {
            let he = self.incident_edges[idx];
            if !self.hyperedges[he as usize].enabled {
                continue;
            }
            let (e_first, e_len) = {
                let rec = &self.hyperedges[he as usize];
                (rec.first, rec.len)
            };
            let pin_slots = &mut self.pins[e_first..e_first + e_len];
            let pos_v = pin_slots
                .iter()
                .position(|&p| p == v)
                .expect("incident edge must contain the contracted vertex");
            // Park v's pin in the last valid slot so a later uncontraction
            // can reveal it again.
            pin_slots.swap(pos_v, e_len - 1);
            if pin_slots[..e_len - 1].contains(&u) {
                // Parallel-pin case: the edge loses v.
                self.hyperedges[he as usize].len -= 1;
                self.current_num_pins -= 1;
                if part != INVALID_PARTITION {
                    self.pins_in_part[he as usize * self.k as usize + part as usize] -= 1;
                }
            } else {
                // Case 1: u takes over v's slot and gains the edge.
                self.pins[e_first + e_len - 1] = u;
                self.append_incident_edge(u, he);
            }
        }

        self.hypernodes[u as usize].weight += self.hypernodes[v as usize].weight;
        self.hypernodes[v as usize].enabled = false;
        self.current_num_nodes -= 1;
        if part != INVALID_PARTITION {
            self.part_info[part as usize].size -= 1;
        }
        trace!("contracted {} -> {}", v, u);
        memento
    }

    /// Exact inverse of [`Hypergraph::contract`]. Mementos must be popped in
    /// reverse contraction order.
    pub fn uncontract(&mut self, memento: &Memento) {
        let Memento { u, u_first, u_len, v } = *memento;
        debug_assert!(self.hypernodes[u as usize].enabled);
        debug_assert!(!self.hypernodes[v as usize].enabled);

        let part = self.part_ids[u as usize];
        self.hypernodes[v as usize].enabled = true;
        self.current_num_nodes += 1;
        self.part_ids[v as usize] = part;
        if part != INVALID_PARTITION {
            self.part_info[part as usize].size += 1;
        }

        // Entries appended to u's row by this contraction are exactly the
        // case-1 edges.
        let cur_first = self.hypernodes[u as usize].first;
        let cur_len = self.hypernodes[u as usize].len;
        for idx in cur_first + u_len..cur_first + cur_len {
            self.case_one_marker[self.incident_edges[idx] as usize] = true;
        }

        let v_first = self.hypernodes[v as usize].first;
        let v_len = self.hypernodes[v as usize].len;
        for idx in v_first..v_first + v_len {
            let he = self.incident_edges[idx];
            if !self.hyperedges[he as usize].enabled {
                continue;
            }
            if self.case_one_marker[he as usize] {
                // Give v its pin slot back.
                let rec = &self.hyperedges[he as usize];
                let pin_slots = &mut self.pins[rec.first..rec.first + rec.len];
                let pos_u = pin_slots
                    .iter()
                    .position(|&p| p == u)
                    .expect("case-1 edge must contain the representative");
                pin_slots[pos_u] = v;
            } else {
                // Parallel-pin case: the hidden slot behind the valid range
                // holds v (LIFO discipline).
                let (e_first, e_len) = {
                    let rec = &self.hyperedges[he as usize];
                    (rec.first, rec.len)
                };
                debug_assert_eq!(self.pins[e_first + e_len], v);
                self.hyperedges[he as usize].len += 1;
                self.current_num_pins += 1;
                if part != INVALID_PARTITION {
                    self.pins_in_part[he as usize * self.k as usize + part as usize] += 1;
                }
            }
        }

        for idx in cur_first + u_len..cur_first + cur_len {
            self.case_one_marker[self.incident_edges[idx] as usize] = false;
        }
        self.hypernodes[u as usize].first = u_first;
        self.hypernodes[u as usize].len = u_len;
        let vw = self.hypernodes[v as usize].weight;
        self.hypernodes[u as usize].weight -= vw;
        trace!("uncontracted {} <- {}", v, u);
    }

    /// Appends `he` to u's incidence row, relocating the row to the arena
    /// tail when it cannot grow in place.
    fn append_incident_edge(&mut self, u: HypernodeId, he: HyperedgeId) {
        let (first, len) = {
            let hn = &self.hypernodes[u as usize];
            (hn.first, hn.len)
        };
        if first + len != self.incident_edges.len() {
            let new_first = self.incident_edges.len();
            self.incident_edges.extend_from_within(first..first + len);
            self.hypernodes[u as usize].first = new_first;
        }
        self.incident_edges.push(he);
        self.hypernodes[u as usize].len += 1;
    }

    // ------------------------------------------------------------------
    // Edge removal (single-pin nets during coarsening)
    // ------------------------------------------------------------------

    /// Disables `e`. The edge stays in the incidence rows of its pins and is
    /// filtered out by [`Hypergraph::incident_edges`] until restored.
    pub fn remove_edge(&mut self, e: HyperedgeId) {
        debug_assert!(self.hyperedges[e as usize].enabled);
        let len = self.hyperedges[e as usize].len;
        self.hyperedges[e as usize].enabled = false;
        self.current_num_edges -= 1;
        self.current_num_pins -= len;
        // Partition bookkeeping for a disabled edge is dropped entirely and
        // rebuilt on restore.
        let base = e as usize * self.k as usize;
        for p in 0..self.k as usize {
            self.pins_in_part[base + p] = 0;
        }
        self.connectivity_sets[e as usize].clear();
    }

    /// Re-enables `e` and rebuilds its pin counts from the current labels.
    pub fn restore_edge(&mut self, e: HyperedgeId) {
        debug_assert!(!self.hyperedges[e as usize].enabled);
        self.hyperedges[e as usize].enabled = true;
        self.current_num_edges += 1;
        self.current_num_pins += self.hyperedges[e as usize].len;
        let (first, len) = {
            let rec = &self.hyperedges[e as usize];
            (rec.first, rec.len)
        };
        for idx in first..first + len {
            let pin = self.pins[idx];
            let p = self.part_ids[pin as usize];
            if p != INVALID_PARTITION {
                self.increment_pin_count(e, p);
            }
        }
    }

    // ------------------------------------------------------------------
    // Block extraction (recursive bisection)
    // ------------------------------------------------------------------

    /// Builds the sub-hypergraph induced by the enabled nodes of `block`.
    ///
    /// Edges keep only their pins inside the block and survive when at
    /// least two remain. Returns the new hypergraph (with `k = 2`) and the
    /// mapping from its node ids back to ids of `self`.
    pub fn extract_block(&self, block: PartitionId) -> (Hypergraph, Vec<HypernodeId>) {
        let mut node_map = Vec::new();
        let mut to_sub = vec![u32::MAX; self.hypernodes.len()];
        for v in self.nodes() {
            if self.part_ids[v as usize] == block {
                to_sub[v as usize] = node_map.len() as u32;
                node_map.push(v);
            }
        }

        let mut index = vec![0usize];
        let mut edge_vector = Vec::new();
        let mut edge_weights = Vec::new();
        for e in self.edges() {
            let inside: Vec<HypernodeId> = self
                .pins(e)
                .iter()
                .filter(|&&pin| self.part_ids[pin as usize] == block)
                .map(|&pin| to_sub[pin as usize])
                .collect();
            if inside.len() >= 2 {
                edge_vector.extend_from_slice(&inside);
                index.push(edge_vector.len());
                edge_weights.push(self.edge_weight(e));
            }
        }
        let node_weights: Vec<HypernodeWeight> =
            node_map.iter().map(|&v| self.node_weight(v)).collect();

        let sub = Hypergraph::new(
            node_map.len(),
            index.len() - 1,
            &index,
            &edge_vector,
            2,
            self.has_hyperedge_weights.then_some(&edge_weights[..]),
            self.has_hypernode_weights.then_some(&node_weights[..]),
        );
        (sub, node_map)
    }

    // ------------------------------------------------------------------
    // Consistency checking
    // ------------------------------------------------------------------

    /// Checks the four store invariants; used inside `debug_assert!`.
    pub fn check_invariants(&self) -> bool {
        for e in self.edges() {
            let mut per_part = vec![0usize; self.k as usize];
            let mut assigned = 0usize;
            for &pin in self.pins(e) {
                let p = self.part_ids[pin as usize];
                if p != INVALID_PARTITION {
                    per_part[p as usize] += 1;
                    assigned += 1;
                }
            }
            let total: usize = (0..self.k)
                .map(|p| self.pin_count_in_part(e, p))
                .sum();
            assert_eq!(total, assigned, "pin counts of edge {} are inconsistent", e);
            for p in 0..self.k {
                assert_eq!(
                    per_part[p as usize],
                    self.pin_count_in_part(e, p),
                    "pin count of edge {} in block {} is stale",
                    e,
                    p
                );
                assert_eq!(
                    per_part[p as usize] > 0,
                    self.connectivity_set(e).contains(&p),
                    "connectivity set of edge {} disagrees with pin counts",
                    e
                );
            }
        }
        for p in 0..self.k {
            let weight: HypernodeWeight = self
                .nodes()
                .filter(|&v| self.part_ids[v as usize] == p)
                .map(|v| self.node_weight(v))
                .sum();
            let size = self
                .nodes()
                .filter(|&v| self.part_ids[v as usize] == p)
                .count();
            assert_eq!(weight, self.part_weight(p), "weight of block {} is stale", p);
            assert_eq!(size, self.part_size(p), "size of block {} is stale", p);
        }
        true
    }
}

/// Structural and partition equality, used by the I/O round-trip tests.
///
/// Edges are compared by id with sorted pin lists since contraction cycles
/// may permute pins within a row.
pub fn verify_equivalence_with_partition_info(a: &Hypergraph, b: &Hypergraph) -> bool {
    if a.current_num_nodes() != b.current_num_nodes()
        || a.current_num_edges() != b.current_num_edges()
        || a.current_num_pins() != b.current_num_pins()
    {
        return false;
    }
    let a_nodes: Vec<_> = a.nodes().collect();
    let b_nodes: Vec<_> = b.nodes().collect();
    if a_nodes != b_nodes {
        return false;
    }
    for &v in &a_nodes {
        if a.node_weight(v) != b.node_weight(v) || a.part_id(v) != b.part_id(v) {
            return false;
        }
    }
    let a_edges: Vec<_> = a.edges().collect();
    let b_edges: Vec<_> = b.edges().collect();
    if a_edges != b_edges {
        return false;
    }
    for &e in &a_edges {
        if a.edge_weight(e) != b.edge_weight(e) {
            return false;
        }
        let mut pa = a.pins(e).to_vec();
        let mut pb = b.pins(e).to_vec();
        pa.sort_unstable();
        pb.sort_unstable();
        if pa != pb {
            return false;
        }
    }
    true
}
