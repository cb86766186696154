//! Persisted signature fixture format (Section 6), used by the cut-phase golden tests.
//!
//! Layout: line 1 is `part_cnt eps_num eps_denom`. Then, for each node: `node_id size_count`,
//! followed by `size_count` blocks each starting with `frontier_size entry_count`, followed by
//! `entry_count` lines of `coord_0 .. coord_{L-1} cost`.

use std::io::{BufRead, Write};

use crate::cutdp::SignatureMap;
use crate::error::{Error, Result};
use crate::signature::Signature;

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

/// Header plus per-node signature maps as read from a fixture file.
pub struct Fixture {
    pub k: u64,
    pub eps_num: i64,
    pub eps_denom: i64,
    /// `(node_id, signature_map)` pairs, in file order.
    pub nodes: Vec<(u64, SignatureMap)>,
}

/// Write `entries` (one `(node_id, signature_map)` pair per tree node, in any order) as a
/// fixture file.
pub fn write_fixture<W: Write>(
    mut writer: W,
    k: u64,
    eps_num: i64,
    eps_denom: i64,
    entries: &[(u64, SignatureMap)],
) -> Result<()> {
    writeln!(writer, "{k} {eps_num} {eps_denom}")?;
    for (node_id, map) in entries {
        writeln!(writer, "{node_id} {}", map.len())?;
        for (&frontier_size, sigs) in map.iter() {
            writeln!(writer, "{frontier_size} {}", sigs.len())?;
            for (sig, cost) in sigs.iter() {
                let coords: Vec<String> = sig.0.iter().map(|c| c.to_string()).collect();
                writeln!(writer, "{} {cost}", coords.join(" "))?;
            }
        }
    }
    Ok(())
}

/// Parse a fixture file back into per-node signature maps.
///
/// # Errors
/// Returns [`Error::Parse`] on any malformed header or entry line.
pub fn read_fixture<R: BufRead>(reader: R) -> Result<Fixture> {
    let mut lines = reader.lines();

    let header = lines
        .next()
        .ok_or_else(|| parse_error(1, "missing header line"))??;
    let mut header_parts = header.split_whitespace();
    let k: u64 = header_parts
        .next()
        .ok_or_else(|| parse_error(1, "missing part_cnt"))?
        .parse()
        .map_err(|_| parse_error(1, "part_cnt is not an integer"))?;
    let eps_num: i64 = header_parts
        .next()
        .ok_or_else(|| parse_error(1, "missing eps_num"))?
        .parse()
        .map_err(|_| parse_error(1, "eps_num is not an integer"))?;
    let eps_denom: i64 = header_parts
        .next()
        .ok_or_else(|| parse_error(1, "missing eps_denom"))?
        .parse()
        .map_err(|_| parse_error(1, "eps_denom is not an integer"))?;

    let mut nodes = Vec::new();
    let mut line_no = 1usize;

    loop {
        let Some(node_header) = lines.next() else {
            break;
        };
        line_no += 1;
        let node_header = node_header?;
        if node_header.trim().is_empty() {
            continue;
        }
        let mut parts = node_header.split_whitespace();
        let node_id: u64 = parts
            .next()
            .ok_or_else(|| parse_error(line_no, "missing node_id"))?
            .parse()
            .map_err(|_| parse_error(line_no, "node_id is not an integer"))?;
        let size_count: usize = parts
            .next()
            .ok_or_else(|| parse_error(line_no, "missing size_count"))?
            .parse()
            .map_err(|_| parse_error(line_no, "size_count is not an integer"))?;

        let mut map = SignatureMap::default();
        for _ in 0..size_count {
            let block_header = lines
                .next()
                .ok_or_else(|| parse_error(line_no, "missing frontier block header"))??;
            line_no += 1;
            let mut bp = block_header.split_whitespace();
            let frontier_size: u64 = bp
                .next()
                .ok_or_else(|| parse_error(line_no, "missing frontier_size"))?
                .parse()
                .map_err(|_| parse_error(line_no, "frontier_size is not an integer"))?;
            let entry_count: usize = bp
                .next()
                .ok_or_else(|| parse_error(line_no, "missing entry_count"))?
                .parse()
                .map_err(|_| parse_error(line_no, "entry_count is not an integer"))?;

            let mut inner = rustc_hash::FxHashMap::default();
            for _ in 0..entry_count {
                let entry_line = lines
                    .next()
                    .ok_or_else(|| parse_error(line_no, "missing signature entry line"))??;
                line_no += 1;
                let tokens: Vec<&str> = entry_line.split_whitespace().collect();
                if tokens.len() < 2 {
                    return Err(parse_error(line_no, "signature entry line too short"));
                }
                let (coord_tokens, cost_token) = tokens.split_at(tokens.len() - 1);
                let coords: std::result::Result<Vec<u32>, _> =
                    coord_tokens.iter().map(|t| t.parse::<u32>()).collect();
                let coords = coords.map_err(|_| parse_error(line_no, "signature coordinate is not an integer"))?;
                let cost: i64 = cost_token[0]
                    .parse()
                    .map_err(|_| parse_error(line_no, "cost is not an integer"))?;
                inner.insert(Signature(coords), cost);
            }
            map.insert(frontier_size, inner);
        }
        nodes.push((node_id, map));
    }

    Ok(Fixture {
        k,
        eps_num,
        eps_denom,
        nodes,
    })
}
