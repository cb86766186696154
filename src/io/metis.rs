//! METIS-style adjacency reader (Section 6).
//!
//! Parses the `n m [fmt]` header and per-node adjacency lines into a generic weighted
//! adjacency map. This reader does not itself verify the result is a tree: tree-ification
//! (spanning-tree reduction) is the caller's responsibility before handing the result to
//! [`crate::tree::Tree::build`].

use std::collections::HashMap;
use std::io::BufRead;

use crate::error::{Error, Result};

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

/// Parse METIS-style graph text into a 1-based node id -> (neighbor id -> edge weight) map.
///
/// `%`-prefixed lines are comments and skipped (including toward line numbering reported in
/// errors, which counts only non-comment lines as METIS itself does).
///
/// # Errors
/// Returns [`Error::Parse`] on a malformed header or adjacency line.
pub fn read_metis<R: BufRead>(reader: R) -> Result<HashMap<u64, HashMap<u64, i64>>> {
    let mut content_lines = reader
        .lines()
        .map(|l| l.map_err(Error::from))
        .collect::<Result<Vec<String>>>()?
        .into_iter()
        .filter(|l| !l.trim_start().starts_with('%'));

    let header = content_lines
        .next()
        .ok_or_else(|| parse_error(1, "missing header line"))?;
    let mut header_parts = header.split_whitespace();
    let n: u64 = header_parts
        .next()
        .ok_or_else(|| parse_error(1, "missing n"))?
        .parse()
        .map_err(|_| parse_error(1, "n is not an integer"))?;
    let _m: u64 = header_parts
        .next()
        .ok_or_else(|| parse_error(1, "missing m"))?
        .parse()
        .map_err(|_| parse_error(1, "m is not an integer"))?;
    let fmt: &str = header_parts.next().unwrap_or("000");
    let has_edge_weights = fmt.len() == 3 && fmt.as_bytes()[2] == b'1';
    let has_node_weights = fmt.len() == 3 && fmt.as_bytes()[1] == b'1';

    let mut adjacency: HashMap<u64, HashMap<u64, i64>> = HashMap::new();

    for (idx, line) in content_lines.enumerate() {
        let node_id = (idx + 1) as u64;
        let line_no = idx + 2;
        adjacency.entry(node_id).or_default();

        let mut tokens = line.split_whitespace();
        if has_node_weights {
            tokens.next();
        }
        let rest: Vec<&str> = tokens.collect();
        let stride = if has_edge_weights { 2 } else { 1 };
        if rest.len() % stride != 0 {
            return Err(parse_error(
                line_no,
                "adjacency line has an incomplete neighbor/weight pair",
            ));
        }
        let mut i = 0;
        while i < rest.len() {
            let neighbor: u64 = rest[i]
                .parse()
                .map_err(|_| parse_error(line_no, "neighbor id is not an integer"))?;
            let weight: i64 = if has_edge_weights {
                rest[i + 1]
                    .parse()
                    .map_err(|_| parse_error(line_no, "edge weight is not an integer"))?
            } else {
                1
            };
            adjacency.entry(node_id).or_default().insert(neighbor, weight);
            i += stride;
        }
    }

    if adjacency.len() as u64 != n {
        return Err(Error::MalformedInput(format!(
            "header declared {n} nodes, adjacency lines described {}",
            adjacency.len()
        )));
    }

    Ok(adjacency)
}
