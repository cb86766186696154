//! Signature type (C4 key): a length-L histogram of component-size-class counts.

use std::ops::Add;

/// A length-L vector of non-negative counts, one per size-class coordinate (see [`crate::bounds`]).
///
/// Equality and hashing are coordinate-wise (the derived [`Vec`] impls already have this
/// property, so no custom hasher is needed — two signatures with the same coordinates always
/// hash identically and compare equal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "io", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature(pub Vec<u32>);

impl Signature {
    /// The all-zero signature of length `len`.
    pub fn zero(len: usize) -> Self {
        Signature(vec![0; len])
    }

    /// Increment coordinate `i` by one.
    pub fn inc(&mut self, i: usize) {
        self.0[i] += 1;
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this has zero coordinates.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all coordinates (total component count the signature describes).
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Coordinate-wise `self <= other`.
    pub fn le(&self, other: &Signature) -> bool {
        debug_assert_eq!(self.0.len(), other.0.len());
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }
}

impl Add for &Signature {
    type Output = Signature;
    fn add(self, rhs: &Signature) -> Signature {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        Signature(self.0.iter().zip(rhs.0.iter()).map(|(a, b)| a + b).collect())
    }
}

impl Add for Signature {
    type Output = Signature;
    fn add(self, rhs: Signature) -> Signature {
        &self + &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn equal_signatures_hash_equal() {
        let a = Signature(vec![1, 2, 3]);
        let b = Signature(vec![1, 2, 3]);
        let mut map: FxHashMap<Signature, i32> = FxHashMap::default();
        map.insert(a.clone(), 42);
        assert_eq!(map.get(&b), Some(&42));
    }

    #[test]
    fn addition_is_associative() {
        let a = Signature(vec![1, 0, 2]);
        let b = Signature(vec![0, 1, 1]);
        let c = Signature(vec![2, 2, 0]);
        assert_eq!(
            (a.clone() + b.clone()) + c.clone(),
            a + (b + c)
        );
    }

    #[test]
    fn le_respects_sum_bound() {
        let a = Signature(vec![1, 0]);
        let b = Signature(vec![0, 1]);
        let sum = &a + &b;
        let c = Signature(vec![1, 1]);
        assert!(sum.le(&c));
        assert!(a.le(&c));
        assert!(b.le(&c));
    }

    proptest::proptest! {
        #[test]
        fn additivity_sum_bound_holds(
            a in proptest::collection::vec(0u32..10, 4),
            b in proptest::collection::vec(0u32..10, 4),
        ) {
            let sa = Signature(a);
            let sb = Signature(b);
            let sum = &sa + &sb;
            prop_assert!(sa.le(&sum));
            prop_assert!(sb.le(&sum));
        }
    }
}
