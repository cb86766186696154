//! Tree text format (Section 6): `node_count root_id` followed by `node_count - 1` edge lines
//! of `from_id to_id edge_weight`.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::error::{Error, Result};
use crate::tree::Tree;

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

/// Read a tree-format adjacency map, returning `(adjacency, root_id)`.
///
/// # Errors
/// Returns [`Error::Parse`] if the header or an edge line fails to parse, and
/// [`Error::MalformedInput`] if the edge-line count doesn't match the header's `node_count - 1`.
pub fn read_tree_text<R: BufRead>(reader: R) -> Result<(HashMap<u64, HashMap<u64, i64>>, u64)> {
    let mut lines = reader.lines();

    let header = lines
        .next()
        .ok_or_else(|| parse_error(1, "missing header line"))??;
    let mut header_parts = header.split_whitespace();
    let node_count: u64 = header_parts
        .next()
        .ok_or_else(|| parse_error(1, "missing node_count"))?
        .parse()
        .map_err(|_| parse_error(1, "node_count is not an integer"))?;
    let root_id: u64 = header_parts
        .next()
        .ok_or_else(|| parse_error(1, "missing root_id"))?
        .parse()
        .map_err(|_| parse_error(1, "root_id is not an integer"))?;

    let mut adjacency: HashMap<u64, HashMap<u64, i64>> = HashMap::new();
    adjacency.entry(root_id).or_default();

    let mut edge_count = 0u64;
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let from: u64 = parts
            .next()
            .ok_or_else(|| parse_error(line_no, "missing from_id"))?
            .parse()
            .map_err(|_| parse_error(line_no, "from_id is not an integer"))?;
        let to: u64 = parts
            .next()
            .ok_or_else(|| parse_error(line_no, "missing to_id"))?
            .parse()
            .map_err(|_| parse_error(line_no, "to_id is not an integer"))?;
        let weight: i64 = parts
            .next()
            .ok_or_else(|| parse_error(line_no, "missing edge_weight"))?
            .parse()
            .map_err(|_| parse_error(line_no, "edge_weight is not an integer"))?;

        adjacency.entry(from).or_default().insert(to, weight);
        adjacency.entry(to).or_default().insert(from, weight);
        edge_count += 1;
    }

    if edge_count != node_count.saturating_sub(1) {
        return Err(Error::MalformedInput(format!(
            "expected {} edge lines for node_count {node_count}, got {edge_count}",
            node_count.saturating_sub(1)
        )));
    }
    if adjacency.len() as u64 != node_count {
        return Err(Error::MalformedInput(format!(
            "edge lines reference {} distinct ids, header declared {node_count}",
            adjacency.len()
        )));
    }

    Ok((adjacency, root_id))
}

/// Write `tree` in tree text format.
pub fn write_tree_text<W: Write>(mut writer: W, tree: &Tree) -> Result<()> {
    writeln!(writer, "{} {}", tree.node_count(), tree.node((0, 0)).id)?;
    for lvl_idx in 1..tree.levels.len() {
        for node in &tree.levels[lvl_idx] {
            let parent_id = tree.levels[lvl_idx - 1][node.parent_idx].id;
            writeln!(writer, "{} {} {}", parent_id, node.id, node.parent_edge_weight)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_a_chain() {
        let text = "3 1\n1 2 4\n2 3 5\n";
        let (adj, root) = read_tree_text(Cursor::new(text)).unwrap();
        assert_eq!(root, 1);
        let tree = Tree::build(&adj, Some(root)).unwrap();
        let mut out = Vec::new();
        write_tree_text(&mut out, &tree).unwrap();
        let (adj2, root2) = read_tree_text(Cursor::new(out)).unwrap();
        assert_eq!(root2, root);
        let tree2 = Tree::build(&adj2, Some(root2)).unwrap();
        assert_eq!(tree2.node_count(), tree.node_count());
    }

    #[test]
    fn rejects_malformed_header() {
        let text = "not_a_number 1\n";
        assert!(matches!(
            read_tree_text(Cursor::new(text)),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn rejects_edge_count_mismatch() {
        let text = "3 1\n1 2 4\n";
        assert!(matches!(
            read_tree_text(Cursor::new(text)),
            Err(Error::MalformedInput(_))
        ));
    }

    fn random_chain_free_tree(n: usize, parents_raw: &[u32], weights_raw: &[i64]) -> HashMap<u64, HashMap<u64, i64>> {
        let mut adj: HashMap<u64, HashMap<u64, i64>> = HashMap::new();
        adj.insert(1, HashMap::new());
        for i in 1..n {
            let parent = (parents_raw[i - 1] as usize % i) as u64 + 1;
            let child = i as u64 + 1;
            let weight = 1 + weights_raw[i - 1].unsigned_abs() % 20;
            adj.entry(parent).or_default().insert(child, weight as i64);
            adj.entry(child).or_default().insert(parent, weight as i64);
        }
        adj
    }

    proptest::proptest! {
        #[test]
        fn write_then_read_reproduces_the_same_tree(
            n in 1usize..16,
            parents_raw in proptest::collection::vec(0u32..1000, 15),
            weights_raw in proptest::collection::vec(0i64..1000, 15),
        ) {
            let adj = random_chain_free_tree(n, &parents_raw[..n.saturating_sub(1)], &weights_raw[..n.saturating_sub(1)]);
            let tree = Tree::build(&adj, Some(1)).unwrap();

            let mut out = Vec::new();
            write_tree_text(&mut out, &tree).unwrap();
            let (adj2, root2) = read_tree_text(Cursor::new(out)).unwrap();
            prop_assert_eq!(root2, 1);

            let tree2 = Tree::build(&adj2, Some(root2)).unwrap();
            prop_assert_eq!(tree2.node_count(), tree.node_count());

            let edge_weight_sum = |t: &Tree| -> i64 {
                (1..t.levels.len())
                    .flat_map(|lvl| t.levels[lvl].iter().map(|node| node.parent_edge_weight))
                    .sum()
            };
            prop_assert_eq!(edge_weight_sum(&tree2), edge_weight_sum(&tree));
        }
    }
}
