//! Random tree/graph generator (C13): three seeded generators for benchmarking and the CLI's
//! `--gen` source. Gated behind the `gen` feature.

use std::collections::HashMap;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn add_edge(adjacency: &mut HashMap<u64, HashMap<u64, i64>>, a: u64, b: u64, weight: i64) {
    adjacency.entry(a).or_default().insert(b, weight);
    adjacency.entry(b).or_default().insert(a, weight);
}

/// Attach node `i` (for `i` in `1..n`) to a uniformly random existing node in `0..i`, drawing
/// its edge weight uniformly from `weight_range`. Reproducible given the same `seed`.
pub fn uniform_random_tree(seed: u64, n: usize, weight_range: Range<i64>) -> HashMap<u64, HashMap<u64, i64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut adjacency: HashMap<u64, HashMap<u64, i64>> = HashMap::new();
    adjacency.entry(0).or_default();
    for i in 1..n as u64 {
        let parent = rng.random_range(0..i);
        let weight = rng.random_range(weight_range.clone());
        add_edge(&mut adjacency, parent, i, weight);
    }
    adjacency
}

/// A straight-line chain `0 - 1 - ... - (n-1)` with independently drawn weights.
pub fn random_path(seed: u64, n: usize, weight_range: Range<i64>) -> HashMap<u64, HashMap<u64, i64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut adjacency: HashMap<u64, HashMap<u64, i64>> = HashMap::new();
    adjacency.entry(0).or_default();
    for i in 1..n as u64 {
        let weight = rng.random_range(weight_range.clone());
        add_edge(&mut adjacency, i - 1, i, weight);
    }
    adjacency
}

/// Node 0 is the hub; every other node attaches directly to it.
pub fn random_star(seed: u64, n: usize, weight_range: Range<i64>) -> HashMap<u64, HashMap<u64, i64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut adjacency: HashMap<u64, HashMap<u64, i64>> = HashMap::new();
    adjacency.entry(0).or_default();
    for i in 1..n as u64 {
        let weight = rng.random_range(weight_range.clone());
        add_edge(&mut adjacency, 0, i, weight);
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    #[test]
    fn uniform_random_tree_is_a_valid_tree_of_the_right_size() {
        let adj = uniform_random_tree(42, 50, 1..10);
        assert_eq!(adj.len(), 50);
        let tree = Tree::build(&adj, Some(0)).unwrap();
        assert_eq!(tree.node_count(), 50);
    }

    #[test]
    fn same_seed_reproduces_the_same_tree() {
        let a = uniform_random_tree(7, 30, 1..20);
        let b = uniform_random_tree(7, 30, 1..20);
        assert_eq!(a, b);
    }

    #[test]
    fn random_path_is_a_chain() {
        let adj = random_path(1, 10, 1..5);
        let tree = Tree::build(&adj, Some(0)).unwrap();
        assert_eq!(tree.depth(), 10);
        assert!(tree.levels.iter().all(|lvl| lvl.len() <= 1));
    }

    #[test]
    fn random_star_has_hub_with_all_leaves() {
        let adj = random_star(1, 10, 1..5);
        let tree = Tree::build(&adj, Some(0)).unwrap();
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.levels[1].len(), 9);
    }
}
