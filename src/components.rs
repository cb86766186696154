//! Component extractor (C7): splits a tree into vertex-disjoint components given a cut-edge set.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::tree::{NodePos, Tree};

/// One connected piece of the tree left after removing the cut edges.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "io", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    /// Node ids belonging to this component, in BFS discovery order.
    pub node_ids: Vec<u64>,
    /// Number of nodes in the component (equivalently `node_ids.len()`).
    pub weight: u64,
}

/// Split `tree` into components by removing every edge in `cut_edges`.
///
/// BFS from the root; whenever the edge from the current node to a child is in `cut_edges`,
/// the child starts a new component instead of extending the current one. Edges are looked up
/// as unordered `(min_id, max_id)` pairs, matching [`crate::backtrack::cut_edges_for_signature`]'s
/// output.
pub fn extract(tree: &Tree, cut_edges: &HashSet<(u64, u64)>) -> Vec<Component> {
    let mut components: Vec<Vec<u64>> = Vec::new();
    let mut current_index: HashMap<u64, usize> = HashMap::new();

    let root_pos: NodePos = (0, 0);
    let root_id = tree.node(root_pos).id;
    components.push(vec![root_id]);
    current_index.insert(root_id, 0);

    let mut queue: VecDeque<NodePos> = VecDeque::new();
    queue.push_back(root_pos);

    while let Some(pos) = queue.pop_front() {
        let node = tree.node(pos);
        let owner = current_index[&node.id];
        let (first, last) = node.children;
        for child_idx in first..last {
            let child_pos = (pos.0 + 1, child_idx);
            let child = tree.node(child_pos);
            let edge = (node.id.min(child.id), node.id.max(child.id));
            let target = if cut_edges.contains(&edge) {
                components.push(Vec::new());
                components.len() - 1
            } else {
                owner
            };
            components[target].push(child.id);
            current_index.insert(child.id, target);
            queue.push_back(child_pos);
        }
    }

    components
        .into_iter()
        .map(|node_ids| {
            let weight = node_ids.len() as u64;
            Component { node_ids, weight }
        })
        .collect()
}
