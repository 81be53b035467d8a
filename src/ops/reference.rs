//! Host reference evaluators
//!
//! Pure functions computing the expected result of each operation in the host
//! reference type. These follow the host math library, not naive comparison
//! operators: `max`/`min` propagate NaN and break ties (including ±0) toward
//! the first operand, like `std::max`/`std::min` guarded by NaN checks.

use crate::dtype::RefFloat;

/// x + y
#[inline]
pub fn add<R: RefFloat>(x: R, y: R) -> R {
    x + y
}

/// x - y
#[inline]
pub fn sub<R: RefFloat>(x: R, y: R) -> R {
    x - y
}

/// x * y
#[inline]
pub fn mul<R: RefFloat>(x: R, y: R) -> R {
    x * y
}

/// x / y
#[inline]
pub fn div<R: RefFloat>(x: R, y: R) -> R {
    x / y
}

/// NaN-propagating maximum; returns `x` on ties
#[inline]
pub fn max<R: RefFloat>(x: R, y: R) -> R {
    if x.is_nan() {
        return x;
    }
    if y.is_nan() {
        return y;
    }
    if x < y { y } else { x }
}

/// NaN-propagating minimum; returns `x` on ties
#[inline]
pub fn min<R: RefFloat>(x: R, y: R) -> R {
    if x.is_nan() {
        return x;
    }
    if y.is_nan() {
        return y;
    }
    if y < x { y } else { x }
}

/// Magnitude of the complex value `re + i*im`
#[inline]
pub fn abs_complex<R: RefFloat>(re: R, im: R) -> R {
    R::complex_abs(re, im)
}
