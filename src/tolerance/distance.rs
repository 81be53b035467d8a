//! Distance between floats in representable steps

use crate::dtype::FloatElement;

/// Number of representable values of `T` between `a` and `b`
///
/// Adjacent values are at distance 1 and +0/-0 are the same point, so the
/// distance from the smallest positive subnormal to the smallest negative one
/// is 2. Returns `u64::MAX` if either value is NaN.
pub fn distance<T: FloatElement>(a: T, b: T) -> u64 {
    if a.is_nan_value() || b.is_nan_value() {
        return u64::MAX;
    }
    ordered_key::<T>(a.to_bits_u64()).abs_diff(ordered_key::<T>(b.to_bits_u64()))
}

/// Map sign-magnitude bits onto a monotone integer line
#[inline]
fn ordered_key<T: FloatElement>(bits: u64) -> i64 {
    let sign = T::LAYOUT.sign_mask();
    // Magnitudes fit in 63 bits for every supported width.
    let magnitude = (bits & !sign) as i64;
    if bits & sign != 0 { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_identical() {
        assert_eq!(distance(1.0f32, 1.0), 0);
        assert_eq!(distance(0.0f32, -0.0), 0);
        assert_eq!(distance(-2.5f64, -2.5), 0);
    }

    #[test]
    fn test_distance_adjacent() {
        let a = 1.0f32;
        let b = f32::from_bits(a.to_bits() + 1);
        assert_eq!(distance(a, b), 1);
        assert_eq!(distance(b, a), 1);
        assert_eq!(distance(f64::MAX, f64::INFINITY), 1);
    }

    #[test]
    fn test_distance_across_zero() {
        let tiny = f32::from_bits(1);
        assert_eq!(distance(tiny, -tiny), 2);
        assert_eq!(distance(tiny, 0.0), 1);
        assert_eq!(distance(-tiny, 0.0), 1);
    }

    #[test]
    fn test_distance_nan() {
        assert_eq!(distance(f32::NAN, 1.0), u64::MAX);
        assert_eq!(distance(1.0f64, f64::NAN), u64::MAX);
    }

    #[test]
    fn test_distance_full_range() {
        let d = distance(f64::NEG_INFINITY, f64::INFINITY);
        assert_eq!(d, 2 * f64::INFINITY.to_bits());
    }
}
