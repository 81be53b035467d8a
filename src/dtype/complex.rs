//! Complex values synthesized from two real operands
//!
//! The complex-magnitude test treats `abs(re + i*im)` as a *binary* operation:
//! both components are independent operands of the same native type. These
//! types hold such a pair on the host so the reference magnitude is computed
//! the same way a math library computes `|z|`.
//!
//! # Storage Format
//!
//! Components are stored interleaved (re, im), matching CUDA `float2`/`double2`.

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Macro to implement a complex number type over one float width
macro_rules! impl_complex {
    ($name:ident, $float:ty, $doc_bits:literal, $doc_float_bits:literal) => {
        #[doc = concat!($doc_bits, "-bit complex number with ", $doc_float_bits, " real and imaginary parts")]
        #[repr(C)]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            /// Real part
            pub re: $float,
            /// Imaginary part
            pub im: $float,
        }

        impl $name {
            /// Create a new complex number
            #[inline]
            pub const fn new(re: $float, im: $float) -> Self {
                Self { re, im }
            }

            /// Magnitude |z|, computed with `hypot`
            ///
            /// Unlike `sqrt(re² + im²)` this neither overflows for huge
            /// components nor underflows for subnormal ones. An infinite
            /// component yields +inf even when the other one is NaN.
            #[inline]
            pub fn abs(self) -> $float {
                self.re.hypot(self.im)
            }

            /// True if either component is NaN
            #[inline]
            pub fn is_nan(self) -> bool {
                self.re.is_nan() || self.im.is_nan()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.im.is_sign_negative() {
                    write!(f, "{}{}i", self.re, self.im)
                } else {
                    write!(f, "{}+{}i", self.re, self.im)
                }
            }
        }

        impl From<($float, $float)> for $name {
            #[inline]
            fn from((re, im): ($float, $float)) -> Self {
                Self { re, im }
            }
        }
    };
}

impl_complex!(Complex64, f32, "64", "f32");
impl_complex!(Complex128, f64, "128", "f64");
