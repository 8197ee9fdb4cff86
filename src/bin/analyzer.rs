//! Hypergraph structure analyzer.
//!
//! Reads an `.hgr` file and writes two CSV histograms next to the current
//! working directory: node degrees (`<name>_hn_degrees.csv`) and hyperedge
//! sizes (`<name>_he_sizes.csv`).

use anyhow::Context;
use clap::Parser;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use hypercut::io::read_hgr;

/// Degree/size histogram tool for .hgr hypergraphs.
#[derive(Parser, Debug)]
#[command(name = "analyzer", version, about)]
struct Cli {
    /// Input hypergraph in .hgr format.
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let instance = read_hgr(&cli.input)
        .with_context(|| format!("failed to read `{}`", cli.input.display()))?;
    let hg = instance.into_hypergraph(2);

    let mut node_degrees: BTreeMap<usize, usize> = BTreeMap::new();
    for hn in hg.nodes() {
        *node_degrees.entry(hg.node_degree(hn)).or_insert(0) += 1;
    }
    let mut edge_sizes: BTreeMap<usize, usize> = BTreeMap::new();
    for he in hg.edges() {
        *edge_sizes.entry(hg.edge_size(he)).or_insert(0) += 1;
    }

    let graph_name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "hypergraph".to_string());

    let hn_output = format!("{}_hn_degrees.csv", graph_name);
    let mut out = BufWriter::new(File::create(&hn_output)?);
    writeln!(out, "\"degree\",\"count\"")?;
    for (degree, count) in &node_degrees {
        writeln!(out, "{}, {}", degree, count)?;
    }
    out.flush()?;

    let he_output = format!("{}_he_sizes.csv", graph_name);
    let mut out = BufWriter::new(File::create(&he_output)?);
    writeln!(out, "\"edgesize\",\"count\"")?;
    for (size, count) in &edge_sizes {
        writeln!(out, "{}, {}", size, count)?;
    }
    out.flush()?;

    println!("wrote {} and {}", hn_output, he_output);
    Ok(())
}
