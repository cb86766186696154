//! Bin packer (C8): exact perfect packing of coarsened component sizes, followed by size
//! expansion and a first-fit pass for the "small" components excluded from the exact DP.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// A packing of component sizes into bins, tracking the two capacities that bound it at
/// different stages (exact DP vs. post-expansion/first-fit).
#[derive(Debug, Clone)]
pub struct Packing {
    opt_capacity: i64,
    approx_capacity: i64,
    bins: Vec<Vec<i64>>,
}

type CountVec = Vec<i64>;

fn bin_total(sizes: &[i64], sig: &CountVec) -> i64 {
    sizes.iter().zip(sig.iter()).map(|(s, c)| s * c).sum()
}

/// Enumerate every maximally-filled single-bin signature: starting from the all-zero signature,
/// sweep each size index's count from 0 up to its total multiplicity, keeping only signatures
/// whose accumulated weight stays within `bin_capacity`, then filter to those no smaller size
/// could still be added to.
fn calculate_bin_signatures(sizes: &[i64], counts: &[i64], bin_capacity: i64) -> Vec<CountVec> {
    let mut layer: FxHashMap<CountVec, i64> = FxHashMap::default();
    layer.insert(vec![0; sizes.len()], 0);

    for (idx, &size) in sizes.iter().enumerate() {
        let mut next: FxHashMap<CountVec, i64> = FxHashMap::default();
        for (sig, &used) in layer.iter() {
            for cnt in 0..=counts[idx] {
                let total = used + cnt * size;
                if total > bin_capacity {
                    break;
                }
                let mut next_sig = sig.clone();
                next_sig[idx] = cnt;
                next.insert(next_sig, total);
            }
        }
        layer = next;
    }

    layer
        .into_iter()
        .filter(|(sig, used)| {
            sizes.iter().enumerate().all(|(idx, &size)| {
                sig[idx] == counts[idx] || size > bin_capacity - used
            })
        })
        .map(|(sig, _)| sig)
        .collect()
}

/// Run one layer of the partial-packing DP. Returns the new layer and whether the all-zero
/// residual was reached (packing complete).
fn calculate_partial_packing(
    prev: &FxHashMap<CountVec, CountVec>,
    bin_signatures: &[CountVec],
) -> (FxHashMap<CountVec, CountVec>, bool) {
    let mut curr: FxHashMap<CountVec, CountVec> = FxHashMap::default();
    for (prev_key, _) in prev.iter() {
        for bin_sig in bin_signatures {
            let mut all_leq_zero = true;
            let residual: CountVec = prev_key
                .iter()
                .zip(bin_sig.iter())
                .map(|(&k, &b)| {
                    let d = k - b;
                    if d > 0 {
                        all_leq_zero = false;
                        d
                    } else {
                        0
                    }
                })
                .collect();
            curr.entry(residual.clone()).or_insert_with(|| prev_key.clone());
            if all_leq_zero {
                return (curr, true);
            }
        }
    }
    (curr, false)
}

impl Packing {
    /// A fresh, empty packing under the given capacities.
    pub fn new(opt_capacity: u64, approx_capacity: u64) -> Self {
        Packing {
            opt_capacity: opt_capacity as i64,
            approx_capacity: approx_capacity as i64,
            bins: Vec::new(),
        }
    }

    /// Number of bins currently in the packing.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// The current bins, each a multiset of component sizes.
    pub fn bins(&self) -> &[Vec<i64>] {
        &self.bins
    }

    /// Exact DP packing of `components` (distinct size -> count) into the fewest bins of
    /// `opt_capacity`, succeeding only if every component can be placed with zero residual.
    ///
    /// # Errors
    /// Returns [`Error::InfeasiblePerfectPack`] if no sequence of bins reduces the residual
    /// multiset to zero within `max_bins` layers.
    pub fn pack_perfect(&mut self, components: &BTreeMap<u64, u64>, max_bins: usize) -> Result<()> {
        if components.values().all(|&c| c == 0) || components.is_empty() {
            return Ok(());
        }

        let sizes: Vec<i64> = components.keys().map(|&s| s as i64).collect();
        let counts: Vec<i64> = components.values().map(|&c| c as i64).collect();

        let bin_signatures = calculate_bin_signatures(&sizes, &counts, self.opt_capacity);
        if bin_signatures.is_empty() {
            return Err(Error::InfeasiblePerfectPack);
        }

        let mut layers: Vec<FxHashMap<CountVec, CountVec>> = Vec::new();
        let mut initial = FxHashMap::default();
        initial.insert(counts.clone(), counts.clone());
        layers.push(initial);

        let mut done = false;
        let mut bin_idx = 1;
        while !done {
            if bin_idx > max_bins {
                return Err(Error::InfeasiblePerfectPack);
            }
            let (next, reached_zero) = calculate_partial_packing(&layers[bin_idx - 1], &bin_signatures);
            layers.push(next);
            done = reached_zero;
            bin_idx += 1;
        }

        let zero = vec![0i64; sizes.len()];
        let mut curr = zero.clone();
        for layer_idx in (1..layers.len()).rev() {
            let prev_key = layers[layer_idx]
                .get(&curr)
                .cloned()
                .ok_or(Error::InfeasiblePerfectPack)?;
            let bin_sig: CountVec = prev_key.iter().zip(curr.iter()).map(|(p, c)| p - c).collect();
            let mut bin = Vec::new();
            for (idx, &cnt) in bin_sig.iter().enumerate() {
                for _ in 0..cnt {
                    bin.push(sizes[idx]);
                }
            }
            self.bins.push(bin);
            curr = prev_key;
        }

        Ok(())
    }

    /// Replace each coarse size token currently inside a bin with the next true size drawn
    /// from `component_size_mapping[coarse_size]` (popped from the back).
    pub fn expand_packing(&mut self, component_size_mapping: &BTreeMap<u64, Vec<u64>>) {
        let mut remaining: BTreeMap<u64, Vec<u64>> = component_size_mapping.clone();
        for bin in &mut self.bins {
            for comp in bin.iter_mut() {
                let old = *comp as u64;
                let true_size = remaining
                    .get_mut(&old)
                    .and_then(|v| v.pop())
                    .expect("expansion map must cover every coarse size present in the packing");
                *comp = true_size as i64;
            }
        }
    }

    /// Greedily place `components` (distinct size -> count) into existing bins by first fit,
    /// relative to `approx_capacity`; opens a new bin when none of the existing ones have room.
    pub fn pack_first_fit(&mut self, components: &BTreeMap<u64, u64>) {
        let mut remaining_capacity: Vec<i64> = self
            .bins
            .iter()
            .map(|bin| self.approx_capacity - bin.iter().sum::<i64>())
            .collect();

        for (&size, &count) in components.iter() {
            let size = size as i64;
            for _ in 0..count {
                if let Some(idx) = remaining_capacity.iter().position(|&cap| size <= cap) {
                    self.bins[idx].push(size);
                    remaining_capacity[idx] -= size;
                } else {
                    self.bins.push(vec![size]);
                    remaining_capacity.push(self.approx_capacity - size);
                }
            }
        }
    }
}
