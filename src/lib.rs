//! # treecut
//!
//! Balanced k-way tree partitioning via the Feldmann-Foschini (FF13) approximation scheme.
//!
//! Given a tree with weighted edges, an imbalance bound `ε`, and a target part count `k`,
//! [`partition::partition`] removes a minimum-weight set of edges so that the resulting
//! connected components can be packed into `k` parts each of size at most
//! `(1 + ε) * ceil(n / k)`.
//!
//! ## Algorithm sketch
//!
//! 1. **Cut phase** ([`cutdp`]): a bottom-up dynamic program computes, for every node, the
//!    Pareto-optimal set of *signatures* (histograms of component-size classes) reachable in
//!    its subtree together with their minimum cut cost.
//! 2. **Pack phase** ([`partition`]): candidate root signatures are tried in increasing cost
//!    order; for each, [`backtrack`] recovers the concrete cut-edge set, [`components`] splits
//!    the tree accordingly, and [`packing`] attempts to fit the resulting components into `k`
//!    bins. The first feasible candidate is the answer.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use treecut::partition::partition;
//!
//! let mut adjacency: HashMap<u64, HashMap<u64, i64>> = HashMap::new();
//! adjacency.entry(1).or_default().insert(2, 4);
//! adjacency.entry(2).or_default().insert(1, 4);
//! adjacency.entry(2).or_default().insert(3, 5);
//! adjacency.entry(3).or_default().insert(2, 5);
//!
//! let result = partition(&adjacency, Some(1), 2, 1, 2).unwrap();
//! assert_eq!(result.cut_cost, 5);
//! assert_eq!(result.parts.len(), 2);
//! ```

pub mod backtrack;
pub mod bounds;
pub mod components;
pub mod cutdp;
pub mod error;
#[cfg(feature = "gen")]
pub mod gen;
#[cfg(feature = "io")]
pub mod io;
pub mod packing;
pub mod partition;
pub mod rational;
pub mod signature;
pub mod tree;

pub use crate::error::{Error, Result};
pub use crate::partition::{partition, partition_with_details, Partition, PartitionDetails};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
        assert!(VERSION.chars().any(|c| c.is_ascii_digit()));
    }
}
