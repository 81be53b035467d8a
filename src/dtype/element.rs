//! Element traits mapping Rust float types to DType and to their host reference type

use super::{DType, FloatLayout};
use bytemuck::{Pod, Zeroable};
use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Sub};

/// Host type in which reference results are computed
///
/// Implemented for `f32` and `f64`. Reference evaluators are generic over this
/// trait so one definition of each operation serves every native width.
pub trait RefFloat:
    Copy
    + Send
    + Sync
    + Debug
    + Display
    + PartialOrd
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// True for any NaN
    fn is_nan(self) -> bool;

    /// True for nonzero values below the smallest normal magnitude
    fn is_subnormal(self) -> bool;

    /// Absolute value, widened to f64
    fn abs_f64(self) -> f64;

    /// Widen to f64 (exact)
    fn to_f64(self) -> f64;

    /// Magnitude of the complex number `re + i*im`
    fn complex_abs(re: Self, im: Self) -> Self;
}

impl RefFloat for f32 {
    #[inline]
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    #[inline]
    fn is_subnormal(self) -> bool {
        f32::is_subnormal(self)
    }

    #[inline]
    fn abs_f64(self) -> f64 {
        self.abs() as f64
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn complex_abs(re: Self, im: Self) -> Self {
        super::Complex64::new(re, im).abs()
    }
}

impl RefFloat for f64 {
    #[inline]
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    #[inline]
    fn is_subnormal(self) -> bool {
        f64::is_subnormal(self)
    }

    #[inline]
    fn abs_f64(self) -> f64 {
        self.abs()
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn complex_abs(re: Self, im: Self) -> Self {
        super::Complex128::new(re, im).abs()
    }
}

/// Trait for floating-point types the harness can enumerate and test
///
/// This is the numeric-width descriptor: it ties a Rust storage type to its
/// `DType`, its bit layout, and the host type used for reference evaluation.
/// Classification predicates are derived from the layout and operate on raw
/// bits, so they agree with the value-set generators bit for bit.
///
/// # Bounds
/// - `Pod + Zeroable` - stored inside [`crate::literal::Literal`] word buffers
/// - `Copy + Send + Sync + 'static` - shared across rayon workers
pub trait FloatElement: Copy + Send + Sync + Pod + Zeroable + Debug + Display + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Bit layout (width, exponent and mantissa fields)
    const LAYOUT: FloatLayout;

    /// Host type reference results are computed in
    ///
    /// Equal to `Self` for f32 and f64; f32 for the half types.
    type Ref: RefFloat;

    /// Raw bits, zero-extended to u64
    fn to_bits_u64(self) -> u64;

    /// Reinterpret the low `LAYOUT.bits` bits as a value
    fn from_bits_u64(bits: u64) -> Self;

    /// Convert to the reference type (exact)
    fn to_ref(self) -> Self::Ref;

    /// Round a reference value to this type
    fn from_ref(v: Self::Ref) -> Self;

    /// Convert from f64, rounding to nearest
    fn from_f64(v: f64) -> Self;

    /// Widen to f64 (exact)
    fn to_f64(self) -> f64;

    /// True for any NaN
    #[inline]
    fn is_nan_value(self) -> bool {
        Self::LAYOUT.is_nan(self.to_bits_u64())
    }

    /// True for ±infinity
    #[inline]
    fn is_infinite_value(self) -> bool {
        Self::LAYOUT.is_infinite(self.to_bits_u64())
    }

    /// True for ±0
    #[inline]
    fn is_zero_value(self) -> bool {
        Self::LAYOUT.is_zero(self.to_bits_u64())
    }

    /// True for subnormal values
    #[inline]
    fn is_subnormal_value(self) -> bool {
        Self::LAYOUT.is_subnormal(self.to_bits_u64())
    }

    /// True if the sign bit is set (including -0 and negative NaNs)
    #[inline]
    fn is_sign_negative_value(self) -> bool {
        Self::LAYOUT.is_sign_negative(self.to_bits_u64())
    }
}

impl FloatElement for f64 {
    const DTYPE: DType = DType::F64;
    const LAYOUT: FloatLayout = DType::F64.layout();
    type Ref = f64;

    #[inline]
    fn to_bits_u64(self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn from_bits_u64(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    #[inline]
    fn to_ref(self) -> f64 {
        self
    }

    #[inline]
    fn from_ref(v: f64) -> Self {
        v
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

impl FloatElement for f32 {
    const DTYPE: DType = DType::F32;
    const LAYOUT: FloatLayout = DType::F32.layout();
    type Ref = f32;

    #[inline]
    fn to_bits_u64(self) -> u64 {
        self.to_bits() as u64
    }

    #[inline]
    fn from_bits_u64(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }

    #[inline]
    fn to_ref(self) -> f32 {
        self
    }

    #[inline]
    fn from_ref(v: f32) -> Self {
        v
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

// ============================================================================
// Half-precision floating point types (requires "f16" feature)
// ============================================================================

#[cfg(feature = "f16")]
impl FloatElement for half::f16 {
    const DTYPE: DType = DType::F16;
    const LAYOUT: FloatLayout = DType::F16.layout();
    type Ref = f32;

    #[inline]
    fn to_bits_u64(self) -> u64 {
        self.to_bits() as u64
    }

    #[inline]
    fn from_bits_u64(bits: u64) -> Self {
        half::f16::from_bits(bits as u16)
    }

    #[inline]
    fn to_ref(self) -> f32 {
        self.to_f32()
    }

    #[inline]
    fn from_ref(v: f32) -> Self {
        half::f16::from_f32(v)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        half::f16::to_f64(self)
    }
}

#[cfg(feature = "f16")]
impl FloatElement for half::bf16 {
    const DTYPE: DType = DType::BF16;
    const LAYOUT: FloatLayout = DType::BF16.layout();
    type Ref = f32;

    #[inline]
    fn to_bits_u64(self) -> u64 {
        self.to_bits() as u64
    }

    #[inline]
    fn from_bits_u64(bits: u64) -> Self {
        half::bf16::from_bits(bits as u16)
    }

    #[inline]
    fn to_ref(self) -> f32 {
        self.to_f32()
    }

    #[inline]
    fn from_ref(v: f32) -> Self {
        half::bf16::from_f32(v)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::bf16::from_f64(v)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        half::bf16::to_f64(self)
    }
}
