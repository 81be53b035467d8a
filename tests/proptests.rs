//! Property-based tests for the distance metric and enumeration order.
//!
//! Verified invariants:
//! - `distance(a, b) == distance(b, a)`, and 0 iff `a == b` numerically.
//! - Stepping to the next representable value moves distance by exactly 1.
//! - Distance is additive along the ordered float line.
//! - Materialized element `i0 * size1 + i1` holds `(lhs[i0], rhs[i1])`.
//! - Partitioning a value set preserves its enumeration.

use std::sync::Arc;

use fpexhaust::dtype::DType;
use fpexhaust::materialize::materialize;
use fpexhaust::tolerance::distance;
use fpexhaust::values::generators::{magnitude_extreme_normals, normals};
use fpexhaust::values::{FpValues, Substitution, ValueSet, ValueSetPair};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Any non-NaN f32, by bit pattern
fn non_nan_f32() -> impl Strategy<Value = f32> {
    any::<u32>()
        .prop_map(f32::from_bits)
        .prop_filter("not NaN", |x| !x.is_nan())
}

/// Any non-NaN f64, by bit pattern
fn non_nan_f64() -> impl Strategy<Value = f64> {
    any::<u64>()
        .prop_map(f64::from_bits)
        .prop_filter("not NaN", |x| !x.is_nan())
}

/// Small f64 value set
fn small_set() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(any::<u64>().prop_map(f64::from_bits), 1..12)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn distance_symmetric(a in non_nan_f32(), b in non_nan_f32()) {
        prop_assert_eq!(distance(a, b), distance(b, a));
        prop_assert_eq!(distance(a, b) == 0, a == b);
    }

    #[test]
    fn distance_next_up_is_one(a in non_nan_f64()) {
        prop_assume!(a != f64::INFINITY);
        let next = if a == 0.0 {
            f64::from_bits(1)
        } else if a > 0.0 {
            f64::from_bits(a.to_bits() + 1)
        } else {
            f64::from_bits(a.to_bits() - 1)
        };
        prop_assert_eq!(distance(a, next), 1);
    }

    #[test]
    fn distance_additive(a in non_nan_f32(), b in non_nan_f32(), c in non_nan_f32()) {
        let mut v = [a, b, c];
        v.sort_by(|x, y| x.partial_cmp(y).unwrap());
        prop_assert_eq!(distance(v[0], v[2]), distance(v[0], v[1]) + distance(v[1], v[2]));
    }

    #[test]
    fn materialized_order(lhs in small_set(), rhs in small_set()) {
        let pair = ValueSetPair::new(
            Arc::new(FpValues::from_values("l", &lhs)),
            Arc::new(FpValues::from_values("r", &rhs)),
        ).unwrap();
        let [a, b] = materialize::<f64>(&pair, &Substitution::none()).unwrap();
        prop_assert_eq!(a.element_count(), lhs.len() * rhs.len());
        for i0 in 0..lhs.len() {
            for i1 in 0..rhs.len() {
                let i = i0 * rhs.len() + i1;
                prop_assert_eq!(a.bits_at(i), Some(lhs[i0].to_bits()));
                prop_assert_eq!(b.bits_at(i), Some(rhs[i1].to_bits()));
            }
        }
    }

    #[test]
    fn partition_preserves_order(count in 1u64..500, group in 1u64..64, seed in any::<u64>()) {
        let set = normals(DType::F32, count, seed).unwrap();
        let whole: Vec<u64> = set.iter().collect();
        let parts = set.partition(group).unwrap();
        prop_assert_eq!(parts.len() as u64, count.div_ceil(group));
        let joined: Vec<u64> = parts.iter().flat_map(|p| p.iter().collect::<Vec<_>>()).collect();
        prop_assert_eq!(joined, whole);
    }

    #[test]
    fn extremes_are_distinct_normals(total in 4u64..2000) {
        let l = DType::F64.layout();
        let set = magnitude_extreme_normals(DType::F64, total).unwrap();
        let mut bits: Vec<u64> = set.iter().collect();
        prop_assert!(bits.iter().all(|&b| l.is_normal(b)));
        bits.sort_unstable();
        bits.dedup();
        prop_assert_eq!(bits.len() as u64, total);
    }
}
