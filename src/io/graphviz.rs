//! Graphviz export: renders a tree, optionally with a highlighted cut-edge set, as DOT.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::tree::Tree;

/// Render `tree` as a DOT `digraph`, styling edges present in `cut_edges` (if any) distinctly.
pub fn to_dot(tree: &Tree, cut_edges: Option<&HashSet<(u64, u64)>>) -> String {
    let mut out = String::new();
    out.push_str("digraph tree {\n");
    for lvl_idx in 1..tree.levels.len() {
        for node in &tree.levels[lvl_idx] {
            let parent_id = tree.levels[lvl_idx - 1][node.parent_idx].id;
            let edge = (parent_id.min(node.id), parent_id.max(node.id));
            let is_cut = cut_edges.is_some_and(|cuts| cuts.contains(&edge));
            if is_cut {
                let _ = writeln!(
                    out,
                    "  {} -> {} [label=\"{}\", style=dashed, color=red];",
                    parent_id, node.id, node.parent_edge_weight
                );
            } else {
                let _ = writeln!(
                    out,
                    "  {} -> {} [label=\"{}\"];",
                    parent_id, node.id, node.parent_edge_weight
                );
            }
        }
    }
    out.push_str("}\n");
    out
}
