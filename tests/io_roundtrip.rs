//! File format round trips against the checked-in fixtures.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use hypercut::config::Configuration;
use hypercut::hypergraph::{
    verify_equivalence_with_partition_info, Hypergraph, HypergraphType, HypernodeId,
};
use hypercut::io::{
    read_hgr, read_hgr_header, read_partition, write_hgr, write_partition, write_patoh,
};
use hypercut::partitioner::partition;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_instances")
        .join(name)
}

fn temp_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("hypercut_io_tests");
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn parses_the_header_of_an_hgr_file() {
    let path = fixture("unweighted_hypergraph.hgr");
    let file = fs::File::open(&path).unwrap();
    let mut reader = BufReader::new(file);
    let (num_hyperedges, num_hypernodes, hypergraph_type) =
        read_hgr_header(&mut reader, &path.display().to_string()).unwrap();
    assert_eq!(num_hyperedges, 4);
    assert_eq!(num_hypernodes, 7);
    assert_eq!(hypergraph_type, HypergraphType::Unweighted);
}

#[test]
fn parses_an_unweighted_hypergraph() {
    let instance = read_hgr(&fixture("unweighted_hypergraph.hgr")).unwrap();
    assert_eq!(instance.index_vector, vec![0, 2, 6, 9, 12]);
    assert_eq!(
        instance.edge_vector,
        vec![0, 1, 0, 6, 4, 5, 4, 5, 3, 1, 2, 3]
    );
    assert!(instance.hyperedge_weights.is_none());
    assert!(instance.hypernode_weights.is_none());
}

#[test]
fn parses_hyperedge_weights() {
    let instance = read_hgr(&fixture("hyperedge_weighted_hypergraph.hgr")).unwrap();
    assert_eq!(instance.index_vector, vec![0, 2, 6, 9, 12]);
    assert_eq!(
        instance.edge_vector,
        vec![0, 1, 0, 6, 4, 5, 4, 5, 3, 1, 2, 3]
    );
    assert_eq!(instance.hyperedge_weights, Some(vec![2, 3, 8, 7]));
}

#[test]
fn parses_hypernode_weights() {
    let instance = read_hgr(&fixture("hypernode_weighted_hypergraph.hgr")).unwrap();
    assert_eq!(instance.index_vector, vec![0, 2, 6, 9, 12]);
    assert_eq!(instance.hypernode_weights, Some(vec![5, 8, 2, 3, 4, 9, 1]));
}

#[test]
fn parses_hypernode_and_hyperedge_weights() {
    let instance = read_hgr(&fixture("weighted_hypergraph.hgr")).unwrap();
    assert_eq!(instance.index_vector, vec![0, 2, 6, 9, 12]);
    assert_eq!(
        instance.edge_vector,
        vec![0, 1, 0, 6, 4, 5, 4, 5, 3, 1, 2, 3]
    );
    assert_eq!(instance.hyperedge_weights, Some(vec![2, 3, 8, 7]));
    assert_eq!(instance.hypernode_weights, Some(vec![5, 8, 2, 3, 4, 9, 1]));
    assert_eq!(instance.hypergraph_type, HypergraphType::EdgeAndNodeWeights);
}

#[test]
fn rejects_out_of_range_pins() {
    let path = temp_file("bad_pin.hgr");
    fs::write(&path, "1 3\n1 4\n").unwrap();
    assert!(read_hgr(&path).is_err());
}

#[test]
fn rejects_non_positive_weights() {
    let path = temp_file("bad_weight.hgr");
    fs::write(&path, "1 3 1\n0 1 2\n").unwrap();
    assert!(read_hgr(&path).is_err());
}

#[test]
fn rejects_truncated_files() {
    let path = temp_file("truncated.hgr");
    fs::write(&path, "3 4\n1 2\n").unwrap();
    assert!(read_hgr(&path).is_err());
}

fn roundtrip(fixture_name: &str, out_name: &str) {
    let original = read_hgr(&fixture(fixture_name)).unwrap().into_hypergraph(2);
    let out = temp_file(out_name);
    write_hgr(&original, &out).unwrap();
    let reread = read_hgr(&out).unwrap().into_hypergraph(2);
    assert!(
        verify_equivalence_with_partition_info(&original, &reread),
        "{} did not round-trip",
        fixture_name
    );
}

#[test]
fn unweighted_hypergraph_round_trips() {
    roundtrip("unweighted_hypergraph.hgr", "rt_unweighted.hgr");
}

#[test]
fn hyperedge_weighted_hypergraph_round_trips() {
    roundtrip("hyperedge_weighted_hypergraph.hgr", "rt_edge_weighted.hgr");
}

#[test]
fn hypernode_weighted_hypergraph_round_trips() {
    roundtrip("hypernode_weighted_hypergraph.hgr", "rt_node_weighted.hgr");
}

#[test]
fn fully_weighted_hypergraph_round_trips() {
    roundtrip("weighted_hypergraph.hgr", "rt_weighted.hgr");
}

#[test]
fn serializes_to_patoh_format() {
    let he_weights: Vec<i64> = vec![10, 15, 13, 18, 25, 20, 14, 27, 29];
    let hn_weights: Vec<i64> = vec![80, 85, 30, 55, 42, 39, 90, 102];
    let index = vec![0, 5, 9, 13, 15, 17, 20, 23, 26, 28];
    let edges: Vec<HypernodeId> = vec![
        7, 5, 2, 4, 1, 3, 4, 0, 6, 3, 1, 4, 6, 3, 6, 2, 4, 7, 1, 3, 5, 4, 1, 4, 6, 1, 7, 3,
    ];
    let hg = Hypergraph::new(8, 9, &index, &edges, 2, Some(&he_weights), Some(&hn_weights));

    let mapping: Vec<HypernodeId> = (0..8).collect();
    let out = temp_file("serialized_hypergraph.patoh");
    write_patoh(&hg, &out, &mapping).unwrap();

    let serialized = fs::read_to_string(&out).unwrap();
    let reference = fs::read_to_string(fixture("example_hypergraph.patoh")).unwrap();
    let serialized_lines: Vec<&str> = serialized.lines().collect();
    let reference_lines: Vec<&str> = reference.lines().collect();
    assert_eq!(serialized_lines, reference_lines);
}

#[test]
fn partition_file_round_trips() {
    let mut hg = read_hgr(&fixture("unweighted_hypergraph.hgr"))
        .unwrap()
        .into_hypergraph(2);
    partition(&mut hg, &Configuration::new(2, 0.03, 1)).unwrap();

    let out = temp_file("roundtrip.part");
    write_partition(&hg, &out).unwrap();
    let read_back = read_partition(&out).unwrap();
    assert_eq!(read_back.len(), 7);
    for v in 0..7u32 {
        assert_eq!(read_back[v as usize], hg.part_id(v));
    }
}
