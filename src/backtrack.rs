//! Backtracker (C6): recovers the concrete cut-edge set realizing a chosen root signature.
//!
//! Rather than storing predecessor pointers during the minimum-only forward pass (which would
//! double the memory footprint of every node's signature map), the DP is re-run with (a)
//! pruning of any partial signature that is not coordinate-wise `<=` the target root signature,
//! and (b) predecessor bookkeeping, per the two-phase design in the module's parent spec.

use std::collections::{HashSet, VecDeque};

use rustc_hash::FxHashMap;

use crate::bounds::SizeBounds;
use crate::error::Result;
use crate::signature::Signature;
use crate::tree::{NodePos, Tree};

#[derive(Clone)]
struct BackEntry {
    cost: i64,
    left_key: (u64, Signature),
    child_key: (u64, Signature),
    cut: bool,
}

type BackMap = FxHashMap<u64, FxHashMap<Signature, BackEntry>>;

fn sentinel_key(l: usize) -> (u64, Signature) {
    (0, Signature::zero(l))
}

fn consider(
    out: &mut BackMap,
    frontier: u64,
    sig: Signature,
    cost: i64,
    left_key: (u64, Signature),
    child_key: (u64, Signature),
    cut: bool,
    target: &Signature,
) {
    if !sig.le(target) {
        return;
    }
    let inner = out.entry(frontier).or_default();
    let better = match inner.get(&sig) {
        Some(existing) => cost < existing.cost,
        None => true,
    };
    if better {
        inner.insert(
            sig,
            BackEntry {
                cost,
                left_key,
                child_key,
                cut,
            },
        );
    }
}

fn combine_pruned(
    left_map: &BackMap,
    child_map: &BackMap,
    parent_edge_weight: i64,
    subtree_size: u64,
    bounds: &SizeBounds,
    target: &Signature,
) -> BackMap {
    let mut out = BackMap::default();
    for (&a, left_sigs) in left_map.iter() {
        for (&b, child_sigs) in child_map.iter() {
            for (sig_a, left_entry) in left_sigs.iter() {
                for (sig_b, child_entry) in child_sigs.iter() {
                    let frontier_keep = a + b;
                    let cost_keep = left_entry.cost + child_entry.cost;
                    let sig_keep = sig_a + sig_b;
                    consider(
                        &mut out,
                        frontier_keep,
                        sig_keep.clone(),
                        cost_keep,
                        (a, sig_a.clone()),
                        (b, sig_b.clone()),
                        false,
                        target,
                    );

                    let node_comp_size = subtree_size - b;
                    if node_comp_size < bounds.hard_upper_bound() {
                        let i = bounds.coordinate_for_size(node_comp_size);
                        let mut sig_cut = sig_keep;
                        sig_cut.inc(i);
                        let frontier_cut = frontier_keep + node_comp_size;
                        let cost_cut = cost_keep + parent_edge_weight;
                        consider(
                            &mut out,
                            frontier_cut,
                            sig_cut,
                            cost_cut,
                            (a, sig_a.clone()),
                            (b, sig_b.clone()),
                            true,
                            target,
                        );
                    }
                }
            }
        }
    }
    out
}

fn sentinel_back_map(l: usize) -> BackMap {
    let mut m = BackMap::default();
    let mut inner = FxHashMap::default();
    inner.insert(
        Signature::zero(l),
        BackEntry {
            cost: 0,
            left_key: sentinel_key(l),
            child_key: sentinel_key(l),
            cut: false,
        },
    );
    m.insert(0, inner);
    m
}

/// Recover the set of cut edges (as unordered `(min_id, max_id)` pairs) realizing `target` at
/// the tree's root, at minimum cost.
///
/// # Errors
/// Propagates [`crate::error::Error::MalformedInput`] from re-deriving the size-bound table.
pub fn cut_edges_for_signature(
    tree: &Tree,
    eps_num: i64,
    eps_denom: i64,
    k: u64,
    target: &Signature,
) -> Result<HashSet<(u64, u64)>> {
    let bounds = SizeBounds::compute(eps_num, eps_denom, tree.node_count(), k)?;
    let l = bounds.len();
    debug_assert_eq!(target.len(), l);

    let mut back_maps: Vec<Vec<BackMap>> = tree
        .levels
        .iter()
        .map(|lvl| vec![BackMap::default(); lvl.len()])
        .collect();

    for lvl_idx in (1..tree.levels.len()).rev() {
        for node_idx in 0..tree.levels[lvl_idx].len() {
            let node = &tree.levels[lvl_idx][node_idx];
            let subtree_size = tree.tree_sizes[lvl_idx][node_idx];

            let left_owned;
            let left_map: &BackMap = if node.has_left_sibling {
                &back_maps[lvl_idx][node_idx - 1]
            } else {
                left_owned = sentinel_back_map(l);
                &left_owned
            };

            let child_owned;
            let child_map: &BackMap = if node.children.0 < node.children.1 {
                &back_maps[lvl_idx + 1][node.children.1 - 1]
            } else {
                child_owned = sentinel_back_map(l);
                &child_owned
            };

            back_maps[lvl_idx][node_idx] = combine_pruned(
                left_map,
                child_map,
                node.parent_edge_weight,
                subtree_size,
                &bounds,
                target,
            );
        }
    }

    let n = tree.node_count();
    let root_child_owned;
    let root_child_map: &BackMap = if tree.levels.len() > 1 {
        &back_maps[1][tree.levels[1].len() - 1]
    } else {
        root_child_owned = sentinel_back_map(l);
        &root_child_owned
    };

    let mut root_map = BackMap::default();
    for (&b, sigs) in root_child_map.iter() {
        let node_comp_size = n - b;
        if node_comp_size >= bounds.hard_upper_bound() {
            continue;
        }
        let i = bounds.coordinate_for_size(node_comp_size);
        for (sig, entry) in sigs.iter() {
            let mut root_sig = sig.clone();
            root_sig.inc(i);
            consider(
                &mut root_map,
                n,
                root_sig,
                entry.cost,
                sentinel_key(l),
                (b, sig.clone()),
                false,
                target,
            );
        }
    }

    let root_entry = root_map
        .get(&n)
        .and_then(|sigs| sigs.get(target))
        .cloned()
        .ok_or_else(|| {
            crate::error::Error::MalformedInput(format!(
                "target signature {:?} is not realizable as a root signature",
                target.0
            ))
        })?;

    let mut edges = HashSet::new();
    let mut work: VecDeque<(NodePos, u64, Signature, bool)> = VecDeque::new();
    // Root has no parent edge; recurse straight into its child entry.
    if tree.depth() > 1 {
        work.push_back(((1, tree.levels[1].len() - 1), root_entry.child_key.0, root_entry.child_key.1.clone(), false));
    }

    while let Some((pos, frontier, sig, _)) = work.pop_front() {
        let node = tree.node(pos);
        let entry = back_maps[pos.0][pos.1]
            .get(&frontier)
            .and_then(|sigs| sigs.get(&sig))
            .expect("predecessor entry must exist for a reachable signature");

        if entry.cut {
            let parent_id = tree.node(tree.parent(pos).expect("non-root has a parent")).id;
            let (u, v) = (node.id.min(parent_id), node.id.max(parent_id));
            edges.insert((u, v));
        }

        if node.has_left_sibling {
            let left_pos = (pos.0, pos.1 - 1);
            work.push_back((left_pos, entry.left_key.0, entry.left_key.1.clone(), false));
        }
        if node.children.0 < node.children.1 {
            let child_pos = (pos.0 + 1, node.children.1 - 1);
            work.push_back((child_pos, entry.child_key.0, entry.child_key.1.clone(), false));
        }
    }

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutdp;
    use std::collections::HashMap;

    fn adjacency(edges: &[(u64, u64, i64)]) -> HashMap<u64, HashMap<u64, i64>> {
        let mut map: HashMap<u64, HashMap<u64, i64>> = HashMap::new();
        for &(u, v, w) in edges {
            map.entry(u).or_default().insert(v, w);
            map.entry(v).or_default().insert(u, w);
        }
        map
    }

    #[test]
    fn chain_n3_recovers_expected_edge() {
        let adj = adjacency(&[(1, 2, 4), (2, 3, 5)]);
        let tree = Tree::build(&adj, Some(1)).unwrap();
        let cp = cutdp::run(&tree, 1, 2, 2).unwrap();
        let n = tree.node_count();
        let (cheapest_sig, cheapest_cost) = cp.signatures[0][0][&n]
            .iter()
            .min_by_key(|(_, &c)| c)
            .map(|(s, &c)| (s.clone(), c))
            .unwrap();
        assert_eq!(cheapest_cost, 5);

        let edges = cut_edges_for_signature(&tree, 1, 2, 2, &cheapest_sig).unwrap();
        assert_eq!(edges, HashSet::from([(2, 3)]));
    }

    #[test]
    fn star_n4_recovers_expected_edge() {
        let adj = adjacency(&[(1, 2, 1), (1, 3, 1), (1, 4, 100)]);
        let tree = Tree::build(&adj, Some(1)).unwrap();
        let cp = cutdp::run(&tree, 1, 2, 2).unwrap();
        let n = tree.node_count();
        let (cheapest_sig, _) = cp.signatures[0][0][&n]
            .iter()
            .min_by_key(|(_, &c)| c)
            .map(|(s, &c)| (s.clone(), c))
            .unwrap();
        let edges = cut_edges_for_signature(&tree, 1, 2, 2, &cheapest_sig).unwrap();
        assert_eq!(edges, HashSet::from([(1, 4)]));
    }

    #[test]
    fn edge_count_matches_component_count_minus_one() {
        let adj = adjacency(&[(1, 2, 10), (2, 3, 1), (3, 4, 10)]);
        let tree = Tree::build(&adj, Some(1)).unwrap();
        let cp = cutdp::run(&tree, 0, 1, 2).unwrap();
        let n = tree.node_count();
        let (sig, cost) = cp.signatures[0][0][&n]
            .iter()
            .min_by_key(|(_, &c)| c)
            .map(|(s, &c)| (s.clone(), c))
            .unwrap();
        assert_eq!(cost, 1);
        let edges = cut_edges_for_signature(&tree, 0, 1, 2, &sig).unwrap();
        assert_eq!(edges.len() as u32, sig.total() - 1);
        assert_eq!(edges, HashSet::from([(2, 3)]));
    }
}
