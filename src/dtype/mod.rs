//! Data type system for exhaustive floating-point testing
//!
//! This module provides the `DType` enum naming every floating-point width the
//! harness can enumerate, the `FloatLayout` descriptor that classifies raw bit
//! patterns of a width, and the `FloatElement` trait binding a Rust type to both.

pub mod complex;
mod element;

pub use complex::{Complex64, Complex128};
pub use element::{FloatElement, RefFloat};

use std::fmt;

// ============================================================================
// DType Enum
// ============================================================================

/// Floating-point types the harness knows how to enumerate
///
/// # Discriminant Values (Serialization Stability)
///
/// The discriminant values are **stable**: F64=0, F32=1, F16=2, BF16=3.
/// New types will use new values. Existing values are NEVER changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point
    F32 = 1,
    /// 16-bit floating point (IEEE 754 binary16)
    F16 = 2,
    /// 16-bit brain floating point
    BF16 = 3,
}

impl DType {
    /// All dtypes, widest first
    pub const ALL: [DType; 4] = [Self::F64, Self::F32, Self::F16, Self::BF16];

    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 => 4,
            Self::F16 | Self::BF16 => 2,
        }
    }

    /// Bit layout of this type
    #[inline]
    pub const fn layout(self) -> FloatLayout {
        match self {
            Self::F64 => FloatLayout::new(64, 11, 52),
            Self::F32 => FloatLayout::new(32, 8, 23),
            Self::F16 => FloatLayout::new(16, 5, 10),
            Self::BF16 => FloatLayout::new(16, 8, 7),
        }
    }

    /// Short name for display (e.g., "f32", "bf16")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
        }
    }

    /// Parse a short name back into a dtype
    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dtype| dtype.short_name().eq_ignore_ascii_case(name))
    }

    /// True when this dtype is usable in the current build
    ///
    /// F16 and BF16 need the `f16` feature.
    pub const fn is_enabled(self) -> bool {
        match self {
            Self::F64 | Self::F32 => true,
            Self::F16 | Self::BF16 => cfg!(feature = "f16"),
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Set of dtypes for efficient membership testing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DTypeSet {
    bits: u8,
}

impl DTypeSet {
    /// Empty set
    pub const EMPTY: Self = Self { bits: 0 };

    /// Single and double precision
    pub const WIDE: Self = Self {
        bits: (1 << DType::F64 as u8) | (1 << DType::F32 as u8),
    };

    /// All half-precision types
    pub const HALF: Self = Self {
        bits: (1 << DType::F16 as u8) | (1 << DType::BF16 as u8),
    };

    /// Create a set containing a single dtype
    #[inline]
    pub const fn single(dtype: DType) -> Self {
        Self {
            bits: 1 << dtype as u8,
        }
    }

    /// Check if the set contains a dtype
    #[inline]
    pub const fn contains(self, dtype: DType) -> bool {
        self.bits & (1 << dtype as u8) != 0
    }

    /// Union of two sets
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Set without the given dtype
    #[inline]
    pub const fn without(self, dtype: DType) -> Self {
        Self {
            bits: self.bits & !(1 << dtype as u8),
        }
    }

    /// Check if set is empty
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

// ============================================================================
// Bit layout
// ============================================================================

/// Sign/exponent/mantissa layout of an IEEE-754 style binary format
///
/// All predicates work on raw bit patterns held in the low `bits` bits of a
/// `u64`, so value sets can be built and classified without knowing the Rust
/// type that will eventually hold them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FloatLayout {
    /// Total storage width in bits
    pub bits: u32,
    /// Exponent field width
    pub exponent_bits: u32,
    /// Explicit mantissa (fraction) field width
    pub mantissa_bits: u32,
}

impl FloatLayout {
    /// Create a layout descriptor
    pub const fn new(bits: u32, exponent_bits: u32, mantissa_bits: u32) -> Self {
        Self {
            bits,
            exponent_bits,
            mantissa_bits,
        }
    }

    /// Mask selecting the sign bit
    #[inline]
    pub const fn sign_mask(self) -> u64 {
        1 << (self.bits - 1)
    }

    /// Mask selecting the exponent field
    #[inline]
    pub const fn exponent_mask(self) -> u64 {
        ((1 << self.exponent_bits) - 1) << self.mantissa_bits
    }

    /// Mask selecting the mantissa field
    #[inline]
    pub const fn mantissa_mask(self) -> u64 {
        (1 << self.mantissa_bits) - 1
    }

    /// Bits of the largest positive subnormal
    #[inline]
    pub const fn max_subnormal_bits(self) -> u64 {
        self.mantissa_mask()
    }

    /// Bits of the smallest positive normal
    #[inline]
    pub const fn min_normal_bits(self) -> u64 {
        1 << self.mantissa_bits
    }

    /// Bits of the largest finite positive value
    #[inline]
    pub const fn max_normal_bits(self) -> u64 {
        self.exponent_mask() - self.min_normal_bits() + self.mantissa_mask()
    }

    /// Bits of +infinity
    #[inline]
    pub const fn infinity_bits(self) -> u64 {
        self.exponent_mask()
    }

    /// Bits of the canonical positive quiet NaN
    #[inline]
    pub const fn quiet_nan_bits(self) -> u64 {
        self.exponent_mask() | (1 << (self.mantissa_bits - 1))
    }

    /// Bits of 1.0
    #[inline]
    pub const fn one_bits(self) -> u64 {
        let bias = (1u64 << (self.exponent_bits - 1)) - 1;
        bias << self.mantissa_bits
    }

    /// Number of positive normal bit patterns
    #[inline]
    pub const fn normal_count(self) -> u64 {
        self.max_normal_bits() - self.min_normal_bits() + 1
    }

    /// True if the sign bit is set
    #[inline]
    pub const fn is_sign_negative(self, bits: u64) -> bool {
        bits & self.sign_mask() != 0
    }

    /// True for any NaN pattern
    #[inline]
    pub const fn is_nan(self, bits: u64) -> bool {
        bits & self.exponent_mask() == self.exponent_mask() && bits & self.mantissa_mask() != 0
    }

    /// True for ±infinity
    #[inline]
    pub const fn is_infinite(self, bits: u64) -> bool {
        bits & !self.sign_mask() == self.exponent_mask()
    }

    /// True for ±0
    #[inline]
    pub const fn is_zero(self, bits: u64) -> bool {
        bits & !self.sign_mask() == 0
    }

    /// True for nonzero values with a zero exponent field
    #[inline]
    pub const fn is_subnormal(self, bits: u64) -> bool {
        bits & self.exponent_mask() == 0 && bits & self.mantissa_mask() != 0
    }

    /// True for finite nonzero values with a nonzero exponent field
    #[inline]
    pub const fn is_normal(self, bits: u64) -> bool {
        let exp = bits & self.exponent_mask();
        exp != 0 && exp != self.exponent_mask()
    }
}

// ============================================================================
// Dtype dispatch
// ============================================================================

/// Internal helper macro to dispatch types requiring the "f16" feature.
#[macro_export]
#[doc(hidden)]
macro_rules! dispatch_half_type {
    ($T:ident, $body:block, $dtype:expr, $type:ty) => {{
        #[cfg(feature = "f16")]
        {
            type $T = $type;
            $body
        }
        #[cfg(not(feature = "f16"))]
        {
            return Err($crate::error::Error::FeatureRequired {
                dtype: $dtype,
                feature: "f16",
            });
        }
    }};
}

/// Macro for runtime dtype dispatch to typed code.
///
/// Executes `$body` with `$T` bound to the Rust type of `$dtype`. The
/// enclosing function must return `crate::error::Result<_>`; half types return
/// `Error::FeatureRequired` when the `f16` feature is off.
///
/// ```ignore
/// dispatch_float!(dtype, T => {
///     let lhs = literal.data::<T>()?;
///     Ok(lhs.len())
/// })
/// ```
#[macro_export]
macro_rules! dispatch_float {
    ($dtype:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F16 => {
                $crate::dispatch_half_type!($T, $body, $dtype, half::f16)
            }
            $crate::dtype::DType::BF16 => {
                $crate::dispatch_half_type!($T, $body, $dtype, half::bf16)
            }
        }
    };
}
