//! Hypergraph file formats.
//!
//! `.hgr` (hMETIS): header `num_hyperedges num_hypernodes [type]`, one line
//! of 1-based pins per net (preceded by the net weight for edge-weighted
//! types), then one weight line per node for node-weighted types. Lines
//! starting with `%` are comments. Parsers fail fast with a descriptive
//! error; writers emit exactly what the parser accepts.
//!
//! `.patoh` (write-only): header `1 |V| |E| |pins| scheme` with scheme
//! 1 = cell weights, 2 = net costs, 3 = both; per-net lines carry the cost
//! first when net costs are present; a trailing line lists all cell weights.
//!
//! Partition files: one block id per line, line i belongs to node i.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{PartitionError, Result};
use crate::hypergraph::{
    HyperedgeWeight, Hypergraph, HypergraphType, HypernodeId, HypernodeWeight, PartitionId,
};

/// Parsed `.hgr` instance, ready to be turned into a [`Hypergraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HgrInstance {
    pub num_hypernodes: usize,
    pub num_hyperedges: usize,
    pub index_vector: Vec<usize>,
    pub edge_vector: Vec<HypernodeId>,
    pub hyperedge_weights: Option<Vec<HyperedgeWeight>>,
    pub hypernode_weights: Option<Vec<HypernodeWeight>>,
    pub hypergraph_type: HypergraphType,
}

impl HgrInstance {
    pub fn into_hypergraph(self, k: PartitionId) -> Hypergraph {
        Hypergraph::new(
            self.num_hypernodes,
            self.num_hyperedges,
            &self.index_vector,
            &self.edge_vector,
            k,
            self.hyperedge_weights.as_deref(),
            self.hypernode_weights.as_deref(),
        )
    }
}

/// Yields `(line_number, content)` for non-comment, non-blank lines.
struct ContentLines<R: BufRead> {
    reader: R,
    line_number: usize,
}

impl<R: BufRead> ContentLines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            self.line_number += 1;
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            let trimmed = buf.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            return Ok(Some((self.line_number, trimmed.to_string())));
        }
    }
}

fn parse_type(token: &str, path: &str) -> Result<HypergraphType> {
    match token {
        "0" => Ok(HypergraphType::Unweighted),
        "1" => Ok(HypergraphType::EdgeWeights),
        "10" => Ok(HypergraphType::NodeWeights),
        "11" => Ok(HypergraphType::EdgeAndNodeWeights),
        other => Err(PartitionError::MalformedHeader {
            path: path.to_string(),
            reason: format!("unknown hypergraph type `{}`", other),
        }),
    }
}

/// Reads the `.hgr` header line from `reader`.
pub fn read_hgr_header<R: BufRead>(
    reader: &mut R,
    path: &str,
) -> Result<(usize, usize, HypergraphType)> {
    let mut lines = ContentLines::new(reader);
    let (_, header) = lines
        .next_line()?
        .ok_or_else(|| PartitionError::MalformedHeader {
            path: path.to_string(),
            reason: "file is empty".to_string(),
        })?;
    parse_header(&header, path)
}

fn parse_header(header: &str, path: &str) -> Result<(usize, usize, HypergraphType)> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    if tokens.len() != 2 && tokens.len() != 3 {
        return Err(PartitionError::MalformedHeader {
            path: path.to_string(),
            reason: format!("expected 2 or 3 header fields, found {}", tokens.len()),
        });
    }
    let num_hyperedges: usize =
        tokens[0]
            .parse()
            .map_err(|_| PartitionError::MalformedHeader {
                path: path.to_string(),
                reason: format!("hyperedge count `{}` is not a number", tokens[0]),
            })?;
    let num_hypernodes: usize =
        tokens[1]
            .parse()
            .map_err(|_| PartitionError::MalformedHeader {
                path: path.to_string(),
                reason: format!("hypernode count `{}` is not a number", tokens[1]),
            })?;
    let hypergraph_type = if tokens.len() == 3 {
        parse_type(tokens[2], path)?
    } else {
        HypergraphType::Unweighted
    };
    Ok((num_hyperedges, num_hypernodes, hypergraph_type))
}

fn parse_weight(token: &str, path: &str, line: usize) -> Result<i64> {
    match token.parse::<i64>() {
        Ok(w) if w >= 1 => Ok(w),
        _ => Err(PartitionError::InvalidWeight {
            path: path.to_string(),
            line,
            token: token.to_string(),
        }),
    }
}

/// Reads a complete `.hgr` file.
pub fn read_hgr(path: &Path) -> Result<HgrInstance> {
    let display = path.display().to_string();
    let file = File::open(path)?;
    let mut lines = ContentLines::new(BufReader::new(file));

    let (_, header) = lines
        .next_line()?
        .ok_or_else(|| PartitionError::MalformedHeader {
            path: display.clone(),
            reason: "file is empty".to_string(),
        })?;
    let (num_hyperedges, num_hypernodes, hypergraph_type) = parse_header(&header, &display)?;
    let edge_weighted = matches!(
        hypergraph_type,
        HypergraphType::EdgeWeights | HypergraphType::EdgeAndNodeWeights
    );
    let node_weighted = matches!(
        hypergraph_type,
        HypergraphType::NodeWeights | HypergraphType::EdgeAndNodeWeights
    );

    let mut index_vector = vec![0usize];
    let mut edge_vector: Vec<HypernodeId> = Vec::new();
    let mut hyperedge_weights = edge_weighted.then(Vec::new);
    for e in 0..num_hyperedges {
        let (line, content) = lines.next_line()?.ok_or(PartitionError::TruncatedFile {
            path: display.clone(),
            what: "hyperedge",
            expected: num_hyperedges,
            found: e,
        })?;
        let mut tokens = content.split_whitespace();
        if let Some(weights) = hyperedge_weights.as_mut() {
            let token = tokens.next().ok_or_else(|| PartitionError::MalformedLine {
                path: display.clone(),
                line,
                reason: "missing hyperedge weight".to_string(),
            })?;
            weights.push(parse_weight(token, &display, line)?);
        }
        let mut pins = 0usize;
        for token in tokens {
            let pin: u64 = token.parse().map_err(|_| PartitionError::MalformedLine {
                path: display.clone(),
                line,
                reason: format!("pin `{}` is not a number", token),
            })?;
            if pin < 1 || pin > num_hypernodes as u64 {
                return Err(PartitionError::PinOutOfRange {
                    path: display.clone(),
                    line,
                    pin,
                    num_hypernodes: num_hypernodes as u64,
                });
            }
            edge_vector.push((pin - 1) as HypernodeId);
            pins += 1;
        }
        if pins == 0 {
            return Err(PartitionError::MalformedLine {
                path: display.clone(),
                line,
                reason: "hyperedge has no pins".to_string(),
            });
        }
        index_vector.push(edge_vector.len());
    }

    let mut hypernode_weights = node_weighted.then(Vec::new);
    if let Some(weights) = hypernode_weights.as_mut() {
        for v in 0..num_hypernodes {
            let (line, content) = lines.next_line()?.ok_or(PartitionError::TruncatedFile {
                path: display.clone(),
                what: "hypernode weight",
                expected: num_hypernodes,
                found: v,
            })?;
            weights.push(parse_weight(content.trim(), &display, line)?);
        }
    }

    Ok(HgrInstance {
        num_hypernodes,
        num_hyperedges,
        index_vector,
        edge_vector,
        hyperedge_weights,
        hypernode_weights,
        hypergraph_type,
    })
}

/// Writes `hg` in `.hgr` format; the type field is emitted only for
/// weighted variants, matching common practice.
pub fn write_hgr(hg: &Hypergraph, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let ty = hg.hypergraph_type();
    if ty == HypergraphType::Unweighted {
        writeln!(out, "{} {}", hg.current_num_edges(), hg.current_num_nodes())?;
    } else {
        writeln!(
            out,
            "{} {} {}",
            hg.current_num_edges(),
            hg.current_num_nodes(),
            ty as i32
        )?;
    }
    let edge_weighted = matches!(
        ty,
        HypergraphType::EdgeWeights | HypergraphType::EdgeAndNodeWeights
    );
    let node_weighted = matches!(
        ty,
        HypergraphType::NodeWeights | HypergraphType::EdgeAndNodeWeights
    );
    for he in hg.edges() {
        let mut fields: Vec<String> = Vec::new();
        if edge_weighted {
            fields.push(hg.edge_weight(he).to_string());
        }
        fields.extend(hg.pins(he).iter().map(|&pin| (pin + 1).to_string()));
        writeln!(out, "{}", fields.join(" "))?;
    }
    if node_weighted {
        for v in hg.nodes() {
            writeln!(out, "{}", hg.node_weight(v))?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Writes `hg` in PaToH format. `mapping[v]` is the output id of node `v`
/// (0-based; the writer emits 1-based ids as announced by the header's
/// index-base marker).
pub fn write_patoh(hg: &Hypergraph, path: &Path, mapping: &[HypernodeId]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let ty = hg.hypergraph_type();
    let edge_weighted = matches!(
        ty,
        HypergraphType::EdgeWeights | HypergraphType::EdgeAndNodeWeights
    );
    let node_weighted = matches!(
        ty,
        HypergraphType::NodeWeights | HypergraphType::EdgeAndNodeWeights
    );
    let scheme = usize::from(node_weighted) + 2 * usize::from(edge_weighted);
    writeln!(
        out,
        "1 {} {} {} {}",
        hg.current_num_nodes(),
        hg.current_num_edges(),
        hg.current_num_pins(),
        scheme
    )?;
    for he in hg.edges() {
        let mut fields: Vec<String> = Vec::new();
        if edge_weighted {
            fields.push(hg.edge_weight(he).to_string());
        }
        fields.extend(
            hg.pins(he)
                .iter()
                .map(|&pin| (mapping[pin as usize] + 1).to_string()),
        );
        writeln!(out, "{}", fields.join(" "))?;
    }
    if node_weighted {
        let weights: Vec<String> = hg.nodes().map(|v| hg.node_weight(v).to_string()).collect();
        writeln!(out, "{}", weights.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

/// Writes one block id per line, line i holding the block of node i.
pub fn write_partition(hg: &Hypergraph, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for v in 0..hg.initial_num_nodes() {
        writeln!(out, "{}", hg.part_id(v as HypernodeId))?;
    }
    out.flush()?;
    Ok(())
}

/// Reads a partition file written by [`write_partition`].
pub fn read_partition(path: &Path) -> Result<Vec<PartitionId>> {
    let display = path.display().to_string();
    let file = File::open(path)?;
    let mut partition = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let id: PartitionId = trimmed.parse().map_err(|_| PartitionError::MalformedLine {
            path: display.clone(),
            line: i + 1,
            reason: format!("block id `{}` is not a number", trimmed),
        })?;
        partition.push(id);
    }
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_header() {
        let (m, n, ty) = parse_header("4 7", "test").unwrap();
        assert_eq!((m, n, ty), (4, 7, HypergraphType::Unweighted));
    }

    #[test]
    fn parses_typed_headers() {
        assert_eq!(
            parse_header("3 5 1", "t").unwrap().2,
            HypergraphType::EdgeWeights
        );
        assert_eq!(
            parse_header("3 5 10", "t").unwrap().2,
            HypergraphType::NodeWeights
        );
        assert_eq!(
            parse_header("3 5 11", "t").unwrap().2,
            HypergraphType::EdgeAndNodeWeights
        );
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(parse_header("4", "t").is_err());
        assert!(parse_header("4 x", "t").is_err());
        assert!(parse_header("4 7 2", "t").is_err());
    }

    #[test]
    fn rejects_zero_weights() {
        assert!(parse_weight("0", "t", 3).is_err());
        assert!(parse_weight("-2", "t", 3).is_err());
        assert!(parse_weight("1", "t", 3).is_ok());
    }
}
