//! Value-set generators for the interesting regions of a float type
//!
//! All generators work on the bit layout of a [`DType`], so the same code
//! produces f64, f32 and half-precision sets. Every generator is deterministic:
//! the "random" normals draw only their starting offset from a seeded RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{BitChunk, FpValues};
use crate::dtype::DType;
use crate::error::{Error, Result};

/// Subnormal samples per sign in [`boundary_values`]
const BOUNDARY_SUBNORMALS_PER_SIGN: u64 = 8;

/// Patterns taken at each end of the normal range in [`boundary_values`]
const BOUNDARY_EDGE_WIDTH: u64 = 4;

/// ±0
pub fn zeros(dtype: DType) -> FpValues {
    let l = dtype.layout();
    FpValues {
        dtype,
        chunks: vec![BitChunk::single(0), BitChunk::single(l.sign_mask())],
        label: "zeros".into(),
    }
}

/// ±infinity
pub fn infinities(dtype: DType) -> FpValues {
    let l = dtype.layout();
    FpValues {
        dtype,
        chunks: vec![
            BitChunk::single(l.infinity_bits()),
            BitChunk::single(l.infinity_bits() | l.sign_mask()),
        ],
        label: "infinities".into(),
    }
}

/// Quiet, signalling and full-payload NaNs of both signs
pub fn nans(dtype: DType) -> FpValues {
    let l = dtype.layout();
    let positive = [
        l.quiet_nan_bits(),
        l.exponent_mask() | 1,
        l.exponent_mask() | l.mantissa_mask(),
    ];
    let chunks = positive
        .iter()
        .map(|&bits| BitChunk::single(bits))
        .chain(
            positive
                .iter()
                .map(|&bits| BitChunk::single(bits | l.sign_mask())),
        )
        .collect();
    FpValues {
        dtype,
        chunks,
        label: "nans".into(),
    }
}

/// `count` subnormals, split between signs, spread evenly over the subnormal
/// range and always including the smallest subnormal
pub fn subnormals(dtype: DType, count: u64) -> Result<FpValues> {
    let l = dtype.layout();
    let (pos, neg) = split_by_sign(count);
    let run = |n: u64| -> Result<BitChunk> {
        let max = l.max_subnormal_bits();
        if n > max {
            return Err(Error::invalid_argument(
                "count",
                format!("{dtype} has only {max} subnormals per sign, requested {n}"),
            ));
        }
        let spacing = if n > 1 { (max - 1) / (n - 1) } else { 1 };
        Ok(BitChunk::new(1, spacing, n))
    };
    let positive = run(pos)?;
    let negative = run(neg)?.negated(l.sign_mask());
    Ok(FpValues {
        dtype,
        chunks: vec![positive, negative],
        label: format!("subnormals({count})"),
    })
}

/// `count` normals, split between signs, strided across the whole normal
/// range from a seeded random starting offset
///
/// The same `(dtype, count, seed)` always produces the same set.
pub fn normals(dtype: DType, count: u64, seed: u64) -> Result<FpValues> {
    let l = dtype.layout();
    let range = l.normal_count();
    let (pos, neg) = split_by_sign(count);
    if pos > range {
        return Err(Error::invalid_argument(
            "count",
            format!("{dtype} has only {range} normals per sign, requested {pos}"),
        ));
    }
    let mut rng = StdRng::seed_from_u64(seed ^ ((dtype as u64) << 56));
    let mut run = |n: u64| -> BitChunk {
        if n == 0 {
            return BitChunk::new(l.min_normal_bits(), 1, 0);
        }
        let spacing = range / n;
        let offset = rng.random_range(0..spacing);
        BitChunk::new(l.min_normal_bits() + offset, spacing, n)
    };
    let positive = run(pos);
    let negative = run(neg).negated(l.sign_mask());
    Ok(FpValues {
        dtype,
        chunks: vec![positive, negative],
        label: format!("normals({count})"),
    })
}

/// Boundary and special values of `dtype`
///
/// ±0, sampled subnormals (smallest and largest included), the smallest
/// normals, the neighbours of ±1, the largest finite values, ±infinity and a
/// spread of NaN encodings.
pub fn boundary_values(dtype: DType) -> Result<FpValues> {
    let l = dtype.layout();
    let sign = l.sign_mask();
    let edge = BOUNDARY_EDGE_WIDTH;

    let mut subnormal_runs = Vec::new();
    for negative in [false, true] {
        let max = l.max_subnormal_bits();
        let n = BOUNDARY_SUBNORMALS_PER_SIGN.min(max);
        let spacing = if n > 1 { (max - 1) / (n - 1) } else { 1 };
        // Pin the last sample to the largest subnormal.
        let body = BitChunk::new(1, spacing, n - 1);
        let last = BitChunk::single(max);
        let s = if negative { sign } else { 0 };
        subnormal_runs.push(body.negated(s));
        subnormal_runs.push(last.negated(s));
    }
    let subnormal_set = FpValues {
        dtype,
        chunks: subnormal_runs,
        label: "subnormals".into(),
    };

    let mut edges = Vec::new();
    for s in [0, sign] {
        edges.push(BitChunk::new(l.min_normal_bits(), 1, edge).negated(s));
        edges.push(BitChunk::inclusive(l.one_bits() - 1, l.one_bits() + 1).negated(s));
        edges.push(BitChunk::inclusive(l.max_normal_bits() + 1 - edge, l.max_normal_bits()).negated(s));
    }
    let edge_set = FpValues {
        dtype,
        chunks: edges,
        label: "normal-edges".into(),
    };

    FpValues::concat(
        "boundary",
        &[
            zeros(dtype),
            subnormal_set,
            edge_set,
            infinities(dtype),
            nans(dtype),
        ],
    )
}

/// Normals of extreme magnitude: the smallest and largest `total / 4` normals
/// of each sign
///
/// Pairing these against each other drives operations into overflow,
/// underflow and catastrophic precision loss.
pub fn magnitude_extreme_normals(dtype: DType, total: u64) -> Result<FpValues> {
    let l = dtype.layout();
    let quarter = |i: u64| total / 4 + u64::from(i < total % 4);
    let (small_pos, large_pos, small_neg, large_neg) = (quarter(0), quarter(1), quarter(2), quarter(3));
    let range = l.normal_count();
    if small_pos + large_pos > range {
        return Err(Error::invalid_argument(
            "total",
            format!("{dtype} has only {range} normals per sign, requested {total} extremes"),
        ));
    }
    let small = |n: u64| BitChunk::new(l.min_normal_bits(), 1, n);
    let large = |n: u64| BitChunk::new(l.max_normal_bits() + 1 - n, 1, n);
    let mut chunks = vec![small(small_pos), large(large_pos)];
    chunks.push(small(small_neg).negated(l.sign_mask()));
    chunks.push(large(large_neg).negated(l.sign_mask()));
    chunks.retain(|c| c.count > 0);
    Ok(FpValues {
        dtype,
        chunks,
        label: format!("magnitude-extremes({total})"),
    })
}

/// Positive gets the extra value when `count` is odd
fn split_by_sign(count: u64) -> (u64, u64) {
    (count.div_ceil(2), count / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ValueSet;

    fn f32s(set: &FpValues) -> Vec<f32> {
        set.iter().map(|b| f32::from_bits(b as u32)).collect()
    }

    #[test]
    fn test_specials() {
        let z = f32s(&zeros(DType::F32));
        assert!(z[0] == 0.0 && z[0].is_sign_positive());
        assert!(z[1] == 0.0 && z[1].is_sign_negative());
        assert_eq!(f32s(&infinities(DType::F32)), vec![f32::INFINITY, f32::NEG_INFINITY]);
        let n = nans(DType::F64);
        assert_eq!(n.size(), 6);
        assert!(n.iter().all(|b| f64::from_bits(b).is_nan()));
    }

    #[test]
    fn test_subnormals_in_range() {
        for dtype in DType::ALL {
            let l = dtype.layout();
            let set = subnormals(dtype, 9).unwrap();
            assert_eq!(set.size(), 9);
            assert!(set.iter().all(|b| l.is_subnormal(b)), "{dtype}");
            assert_eq!(set.get(0), Some(1));
        }
        assert!(subnormals(DType::BF16, 1000).is_err());
    }

    #[test]
    fn test_normals_deterministic_and_normal() {
        for dtype in DType::ALL {
            let l = dtype.layout();
            let a = normals(dtype, 2001, 7).unwrap();
            let b = normals(dtype, 2001, 7).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.size(), 2001);
            assert!(a.iter().all(|bits| l.is_normal(bits)), "{dtype}");
            let negatives = a.iter().filter(|&bits| l.is_sign_negative(bits)).count();
            assert_eq!(negatives, 1000);
        }
    }

    #[test]
    fn test_normals_seed_changes_offset() {
        let a = normals(DType::F64, 1000, 1).unwrap();
        let b = normals(DType::F64, 1000, 2).unwrap();
        assert_eq!(a.size(), b.size());
        assert_ne!(a, b);
    }

    #[test]
    fn test_boundary_contents() {
        for dtype in DType::ALL {
            let l = dtype.layout();
            let set = boundary_values(dtype).unwrap();
            assert_eq!(set.size(), 48, "{dtype}");
            let bits: Vec<u64> = set.iter().collect();
            for must in [
                0,
                l.sign_mask(),
                1,
                l.max_subnormal_bits(),
                l.min_normal_bits(),
                l.one_bits(),
                l.max_normal_bits(),
                l.infinity_bits(),
                l.infinity_bits() | l.sign_mask(),
                l.quiet_nan_bits(),
            ] {
                assert!(bits.contains(&must), "{dtype} missing {must:#x}");
            }
        }
    }

    #[test]
    fn test_magnitude_extremes() {
        let l = DType::F32.layout();
        let set = magnitude_extreme_normals(DType::F32, 40_000).unwrap();
        assert_eq!(set.size(), 40_000);
        assert_eq!(set.chunks().len(), 4);
        let bits: Vec<u64> = set.iter().collect();
        assert!(bits.iter().all(|&b| l.is_normal(b)));
        assert!(bits.contains(&l.min_normal_bits()));
        assert!(bits.contains(&l.max_normal_bits()));
        assert!(bits.contains(&(l.max_normal_bits() | l.sign_mask())));

        let groups = set.partition(2000).unwrap();
        assert_eq!(groups.len(), 20);
        assert!(groups.iter().all(|g| g.size() == 2000));
    }

    #[test]
    fn test_magnitude_extremes_odd_total() {
        let set = magnitude_extreme_normals(DType::F64, 10).unwrap();
        let sizes: Vec<u64> = set.chunks().iter().map(|c| c.count).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
        assert!(magnitude_extreme_normals(DType::BF16, 1_000_000).is_err());
    }
}
