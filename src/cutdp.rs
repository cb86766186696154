//! Cut-phase dynamic program (C5): computes, for every node, the Pareto-optimal signatures
//! reachable below it together with their minimum cut cost.

use rustc_hash::FxHashMap;

use crate::bounds::SizeBounds;
use crate::error::{Error, Result};
use crate::signature::Signature;
use crate::tree::Tree;

/// `frontier_size -> signature -> minimum cut cost` for a single node.
pub type SignatureMap = FxHashMap<u64, FxHashMap<Signature, i64>>;

/// Output of the cut phase: the size bounds used, and every node's signature map.
pub struct CutPhase {
    /// The size-bound table derived from (eps, n, k).
    pub bounds: SizeBounds,
    /// `signatures[level][idx]` is the signature map for that node; `signatures[0][0]` is the
    /// root's, whose `frontier_size = n` entries are the candidate root signatures.
    pub signatures: Vec<Vec<SignatureMap>>,
}

fn sentinel_map(l: usize) -> SignatureMap {
    let mut m = SignatureMap::default();
    let mut inner = FxHashMap::default();
    inner.insert(Signature::zero(l), 0i64);
    m.insert(0, inner);
    m
}

fn checked_add(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b)
        .ok_or_else(|| Error::Overflow("cut cost accumulation".into()))
}

fn update_min(map: &mut SignatureMap, frontier: u64, sig: Signature, cost: i64) {
    let inner = map.entry(frontier).or_default();
    match inner.get_mut(&sig) {
        Some(existing) if *existing <= cost => {}
        _ => {
            inner.insert(sig, cost);
        }
    }
}

fn merge_into(dst: &mut SignatureMap, src: SignatureMap) {
    for (frontier, sigs) in src {
        let dst_inner = dst.entry(frontier).or_default();
        for (sig, cost) in sigs {
            match dst_inner.get_mut(&sig) {
                Some(existing) if *existing <= cost => {}
                _ => {
                    dst_inner.insert(sig, cost);
                }
            }
        }
    }
}

/// Combine a left-sibling map and a rightmost-child map into the signature map for `node`,
/// per the FF13 "keep or cut the parent edge" recurrence.
fn combine(
    left_map: &SignatureMap,
    child_map: &SignatureMap,
    parent_edge_weight: i64,
    subtree_size: u64,
    bounds: &SizeBounds,
) -> Result<SignatureMap> {
    let combine_pair = |a: u64,
                        left_sigs: &FxHashMap<Signature, i64>,
                        b: u64,
                        child_sigs: &FxHashMap<Signature, i64>|
     -> Result<SignatureMap> {
        let mut out = SignatureMap::default();
        for (sig_a, &cost_a) in left_sigs.iter() {
            for (sig_b, &cost_b) in child_sigs.iter() {
                // Case 1: keep the edge to the parent.
                let frontier_keep = a + b;
                let cost_keep = checked_add(cost_a, cost_b)?;
                let sig_keep = sig_a + sig_b;
                log::trace!("keep: ({a}, {sig_a:?}, {cost_a}) + ({b}, {sig_b:?}, {cost_b}) -> cost {cost_keep}");
                update_min(&mut out, frontier_keep, sig_keep.clone(), cost_keep);

                // Case 2: cut the edge to the parent, sealing a component of size
                // subtree_size(v) - b.
                let node_comp_size = subtree_size - b;
                if node_comp_size < bounds.hard_upper_bound() {
                    let i = bounds.coordinate_for_size(node_comp_size);
                    let mut sig_cut = sig_keep;
                    sig_cut.inc(i);
                    let frontier_cut = frontier_keep + node_comp_size;
                    let cost_cut = checked_add(cost_keep, parent_edge_weight)?;
                    update_min(&mut out, frontier_cut, sig_cut, cost_cut);
                }
            }
        }
        Ok(out)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let partials: Result<Vec<SignatureMap>> = left_map
            .par_iter()
            .map(|(&a, left_sigs)| {
                let mut acc = SignatureMap::default();
                for (&b, child_sigs) in child_map.iter() {
                    let partial = combine_pair(a, left_sigs, b, child_sigs)?;
                    merge_into(&mut acc, partial);
                }
                Ok(acc)
            })
            .collect();
        let mut out = SignatureMap::default();
        for partial in partials? {
            merge_into(&mut out, partial);
        }
        return Ok(out);
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut out = SignatureMap::default();
        for (&a, left_sigs) in left_map.iter() {
            for (&b, child_sigs) in child_map.iter() {
                let partial = combine_pair(a, left_sigs, b, child_sigs)?;
                merge_into(&mut out, partial);
            }
        }
        Ok(out)
    }
}

/// Run the cut-phase DP over `tree` for the given imbalance and part count.
///
/// # Errors
/// Propagates [`Error::MalformedInput`] from [`SizeBounds::compute`], and [`Error::Overflow`]
/// if cost accumulation exceeds `i64`.
pub fn run(tree: &Tree, eps_num: i64, eps_denom: i64, k: u64) -> Result<CutPhase> {
    let bounds = SizeBounds::compute(eps_num, eps_denom, tree.node_count(), k)?;
    let l = bounds.len();

    let mut signatures: Vec<Vec<SignatureMap>> = tree
        .levels
        .iter()
        .map(|lvl| vec![SignatureMap::default(); lvl.len()])
        .collect();

    for lvl_idx in (1..tree.levels.len()).rev() {
        for node_idx in 0..tree.levels[lvl_idx].len() {
            let node = &tree.levels[lvl_idx][node_idx];
            let subtree_size = tree.tree_sizes[lvl_idx][node_idx];

            let left_owned;
            let left_map: &SignatureMap = if node.has_left_sibling {
                &signatures[lvl_idx][node_idx - 1]
            } else {
                left_owned = sentinel_map(l);
                &left_owned
            };

            let child_owned;
            let child_map: &SignatureMap = if node.children.0 < node.children.1 {
                &signatures[lvl_idx + 1][node.children.1 - 1]
            } else {
                child_owned = sentinel_map(l);
                &child_owned
            };

            let node_sigs = combine(left_map, child_map, node.parent_edge_weight, subtree_size, &bounds)?;
            signatures[lvl_idx][node_idx] = node_sigs;
        }
    }

    // Root finalization: LastChild(root) is the rightmost node of level 1 (root's only
    // child range spans the whole of level 1).
    let n = tree.node_count();
    let root_child_owned;
    let root_child_map: &SignatureMap = if tree.levels.len() > 1 {
        &signatures[1][tree.levels[1].len() - 1]
    } else {
        root_child_owned = sentinel_map(l);
        &root_child_owned
    };

    let mut root_map = SignatureMap::default();
    for (&b, sigs) in root_child_map.iter() {
        let node_comp_size = n - b;
        if node_comp_size >= bounds.hard_upper_bound() {
            continue;
        }
        let i = bounds.coordinate_for_size(node_comp_size);
        for (sig, &cost) in sigs.iter() {
            let mut root_sig = sig.clone();
            root_sig.inc(i);
            update_min(&mut root_map, n, root_sig, cost);
        }
    }
    signatures[0][0] = root_map;

    Ok(CutPhase { bounds, signatures })
}
