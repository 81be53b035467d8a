//! Substitution of values a backend is known to mishandle
//!
//! Some backends have documented bugs for particular inputs. Rather than
//! letting every suite fail on them, the materializer swaps such values for a
//! harmless fallback (1.0 by default) before they reach the device.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use crate::dtype::{DType, FloatElement};

/// Operand position of a value in a binary operation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperandSlot {
    /// Operand 0
    Lhs,
    /// Operand 1
    Rhs,
}

impl OperandSlot {
    /// Zero-based operand index
    pub const fn index(self) -> usize {
        match self {
            Self::Lhs => 0,
            Self::Rhs => 1,
        }
    }
}

/// Decides whether a raw value is known to be handled incorrectly
pub trait KnownIncorrect: Send + Sync + Debug {
    /// True if `bits` (a value of `dtype`) must not be sent in `slot`
    fn is_known_incorrect(&self, dtype: DType, bits: u64, slot: OperandSlot) -> bool;
}

/// Backend with no known-bad inputs
#[derive(Copy, Clone, Debug, Default)]
pub struct NoKnownIncorrect;

impl KnownIncorrect for NoKnownIncorrect {
    #[inline]
    fn is_known_incorrect(&self, _dtype: DType, _bits: u64, _slot: OperandSlot) -> bool {
        false
    }
}

/// Explicit table of known-bad (dtype, bits, slot) entries
#[derive(Clone, Debug, Default)]
pub struct KnownIncorrectValues {
    entries: HashSet<(DType, u64, OperandSlot)>,
}

impl KnownIncorrectValues {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag `value` in `slot`
    pub fn with<T: FloatElement>(mut self, value: T, slot: OperandSlot) -> Self {
        self.entries.insert((T::DTYPE, value.to_bits_u64(), slot));
        self
    }

    /// Flag `value` in both operand slots
    pub fn with_both<T: FloatElement>(self, value: T) -> Self {
        self.with(value, OperandSlot::Lhs).with(value, OperandSlot::Rhs)
    }

    /// Number of flagged entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is flagged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KnownIncorrect for KnownIncorrectValues {
    fn is_known_incorrect(&self, dtype: DType, bits: u64, slot: OperandSlot) -> bool {
        self.entries.contains(&(dtype, bits, slot))
    }
}

/// Converts raw bits to a native value, replacing known-bad values
///
/// `apply` is idempotent: its output maps to itself, because a flagged value
/// maps to the fallback and the fallback maps to itself whether flagged or not.
#[derive(Clone, Debug)]
pub struct Substitution {
    table: Arc<dyn KnownIncorrect>,
    fallback: f64,
}

impl Substitution {
    /// No substitution at all
    pub fn none() -> Self {
        Self::new(Arc::new(NoKnownIncorrect))
    }

    /// Substitute flagged values with 1.0
    pub fn new(table: Arc<dyn KnownIncorrect>) -> Self {
        Self {
            table,
            fallback: 1.0,
        }
    }

    /// Use a different replacement value
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Convert `bits` for `slot`, swapping in the fallback if flagged
    #[inline]
    pub fn apply<T: FloatElement>(&self, bits: u64, slot: OperandSlot) -> T {
        if self.table.is_known_incorrect(T::DTYPE, bits, slot) {
            T::from_f64(self.fallback)
        } else {
            T::from_bits_u64(bits)
        }
    }
}

impl Default for Substitution {
    fn default() -> Self {
        Self::none()
    }
}
