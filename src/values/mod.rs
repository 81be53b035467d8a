//! Value sets: ordered, finite, restartable collections of operand values
//!
//! A value set yields raw bit patterns of one [`DType`]. Keeping values as bits
//! until the last moment means enumeration order, sizes and classification are
//! identical for every native type of the same width, and NaN payloads survive
//! untouched into the input buffers.
//!
//! [`FpValues`] is the concrete set used by the suite instantiator. It is a list
//! of arithmetic runs of bit patterns ([`BitChunk`]) and is immutable once
//! built, so suites share it through `Arc` and iterate it concurrently.

pub mod generators;
pub mod known_incorrect;

pub use known_incorrect::{
    KnownIncorrect, KnownIncorrectValues, NoKnownIncorrect, OperandSlot, Substitution,
};

use std::fmt::{self, Write as _};
use std::sync::Arc;

use crate::dtype::{DType, FloatElement};
use crate::error::{Error, Result};

/// Interface every operand value set exposes to the materializer
///
/// Iteration order must be deterministic and identical across calls, and
/// `size()` must equal the number of items `iter()` yields.
pub trait ValueSet: Send + Sync {
    /// Width of the values in this set
    fn dtype(&self) -> DType;

    /// Number of values
    fn size(&self) -> u64;

    /// Values in enumeration order, as raw bits
    fn iter(&self) -> Box<dyn Iterator<Item = u64> + '_>;

    /// Human-readable description for diagnostics
    fn describe(&self) -> String;
}

/// Arithmetic run of bit patterns: `start, start + spacing, ...` (`count` values)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitChunk {
    /// First bit pattern
    pub start: u64,
    /// Distance between consecutive patterns
    pub spacing: u64,
    /// Number of patterns
    pub count: u64,
}

impl BitChunk {
    /// Run of `count` patterns beginning at `start`
    pub const fn new(start: u64, spacing: u64, count: u64) -> Self {
        Self {
            start,
            spacing,
            count,
        }
    }

    /// A single bit pattern
    pub const fn single(bits: u64) -> Self {
        Self::new(bits, 1, 1)
    }

    /// Contiguous patterns `first..=last`
    pub const fn inclusive(first: u64, last: u64) -> Self {
        Self::new(first, 1, last - first + 1)
    }

    /// Pattern at position `i` (caller guarantees `i < count`)
    #[inline]
    pub const fn get(&self, i: u64) -> u64 {
        self.start + i * self.spacing
    }

    /// Last pattern, or None if empty
    pub fn last(&self) -> Option<u64> {
        self.count.checked_sub(1).map(|i| self.get(i))
    }

    /// The same run with every pattern's sign bit set
    pub const fn negated(&self, sign_mask: u64) -> Self {
        Self::new(self.start | sign_mask, self.spacing, self.count)
    }

    fn sub_chunk(&self, offset: u64, count: u64) -> Self {
        Self::new(self.get(offset), self.spacing, count)
    }
}

/// Concrete value set built from bit-pattern runs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FpValues {
    dtype: DType,
    chunks: Vec<BitChunk>,
    label: String,
}

impl FpValues {
    /// Build a value set, validating that every pattern fits the dtype width
    pub fn new(dtype: DType, label: impl Into<String>, chunks: Vec<BitChunk>) -> Result<Self> {
        let width = dtype.layout().bits;
        let max_bits = if width == 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        for chunk in &chunks {
            if chunk.count > 1 && chunk.spacing == 0 {
                return Err(Error::invalid_argument(
                    "chunks",
                    format!("chunk at {:#x} repeats a value (spacing 0)", chunk.start),
                ));
            }
            let last = chunk
                .count
                .checked_sub(1)
                .map(|i| {
                    i.checked_mul(chunk.spacing)
                        .and_then(|d| d.checked_add(chunk.start))
                })
                .unwrap_or(Some(chunk.start));
            match last {
                Some(last) if last <= max_bits => {}
                _ => {
                    return Err(Error::invalid_argument(
                        "chunks",
                        format!(
                            "chunk at {:#x} ({} x {:#x}) overflows {dtype}",
                            chunk.start, chunk.count, chunk.spacing
                        ),
                    ));
                }
            }
        }
        Ok(Self {
            dtype,
            chunks,
            label: label.into(),
        })
    }

    /// Value set holding exactly `values`, in order
    pub fn from_values<T: FloatElement>(label: impl Into<String>, values: &[T]) -> Self {
        Self {
            dtype: T::DTYPE,
            chunks: values
                .iter()
                .map(|v| BitChunk::single(v.to_bits_u64()))
                .collect(),
            label: label.into(),
        }
    }

    /// Concatenate sets of the same dtype
    pub fn concat(label: impl Into<String>, sets: &[FpValues]) -> Result<Self> {
        let first = sets
            .first()
            .ok_or_else(|| Error::invalid_argument("sets", "nothing to concatenate"))?;
        let mut chunks = Vec::new();
        for set in sets {
            if set.dtype != first.dtype {
                return Err(Error::dtype_mismatch(first.dtype, set.dtype));
            }
            chunks.extend_from_slice(&set.chunks);
        }
        Ok(Self {
            dtype: first.dtype,
            chunks,
            label: label.into(),
        })
    }

    /// Split into consecutive sets of at most `group` values each
    ///
    /// The concatenation of the parts enumerates exactly this set, in order.
    pub fn partition(&self, group: u64) -> Result<Vec<FpValues>> {
        if group == 0 {
            return Err(Error::invalid_argument("group", "must be greater than 0"));
        }
        let parts = self.size().div_ceil(group);
        let mut out = Vec::with_capacity(parts as usize);
        let mut current = Vec::new();
        let mut filled = 0u64;
        for chunk in &self.chunks {
            let mut offset = 0;
            while offset < chunk.count {
                let take = (chunk.count - offset).min(group - filled);
                current.push(chunk.sub_chunk(offset, take));
                offset += take;
                filled += take;
                if filled == group {
                    let index = out.len();
                    out.push(self.part(index, parts, std::mem::take(&mut current)));
                    filled = 0;
                }
            }
        }
        if filled > 0 {
            let index = out.len();
            out.push(self.part(index, parts, current));
        }
        Ok(out)
    }

    fn part(&self, index: usize, parts: u64, chunks: Vec<BitChunk>) -> FpValues {
        FpValues {
            dtype: self.dtype,
            chunks,
            label: format!("{}[{}/{}]", self.label, index + 1, parts),
        }
    }

    /// Short label given at construction
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs making up this set
    pub fn chunks(&self) -> &[BitChunk] {
        &self.chunks
    }

    /// Pattern at enumeration position `index`
    pub fn get(&self, mut index: u64) -> Option<u64> {
        for chunk in &self.chunks {
            if index < chunk.count {
                return Some(chunk.get(index));
            }
            index -= chunk.count;
        }
        None
    }
}

impl ValueSet for FpValues {
    fn dtype(&self) -> DType {
        self.dtype
    }

    fn size(&self) -> u64 {
        self.chunks.iter().map(|c| c.count).sum()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = u64> + '_> {
        Box::new(
            self.chunks
                .iter()
                .flat_map(|chunk| (0..chunk.count).map(move |i| chunk.get(i))),
        )
    }

    fn describe(&self) -> String {
        let hex_width = (self.dtype.layout().bits / 4) as usize;
        let mut out = format!("{} {}[{}]: {{", self.label, self.dtype, self.size());
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match chunk.count {
                0 => out.push_str("<empty>"),
                1 => {
                    let _ = write!(out, "0x{:0w$x}", chunk.start, w = hex_width);
                }
                _ => {
                    let last = chunk.last().unwrap_or(chunk.start);
                    let _ = write!(
                        out,
                        "0x{:0w$x}..=0x{:0w$x} step {} ({})",
                        chunk.start,
                        last,
                        chunk.spacing,
                        chunk.count,
                        w = hex_width
                    );
                }
            }
        }
        out.push('}');
        out
    }
}

impl fmt::Display for FpValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Ordered pair of operand value sets; one suite instance enumerates their
/// Cartesian product
#[derive(Clone, Debug)]
pub struct ValueSetPair {
    lhs: Arc<FpValues>,
    rhs: Arc<FpValues>,
}

impl ValueSetPair {
    /// Pair two sets of the same dtype
    pub fn new(lhs: Arc<FpValues>, rhs: Arc<FpValues>) -> Result<Self> {
        if lhs.dtype() != rhs.dtype() {
            return Err(Error::dtype_mismatch(lhs.dtype(), rhs.dtype()));
        }
        Ok(Self { lhs, rhs })
    }

    /// Operand-0 set
    pub fn lhs(&self) -> &FpValues {
        &self.lhs
    }

    /// Operand-1 set
    pub fn rhs(&self) -> &FpValues {
        &self.rhs
    }

    /// Dtype of both operands
    pub fn dtype(&self) -> DType {
        self.lhs.dtype()
    }

    /// Declared input count: `size(lhs) * size(rhs)`
    pub fn total_inputs(&self) -> Result<u64> {
        let (lhs, rhs) = (self.lhs.size(), self.rhs.size());
        lhs.checked_mul(rhs)
            .ok_or(Error::InputCountOverflow { lhs, rhs })
    }

    /// Operand bits of linear input index `i` (`i = i0 * size1 + i1`)
    pub fn operands_at(&self, index: u64) -> Option<(u64, u64)> {
        let size1 = self.rhs.size();
        if size1 == 0 {
            return None;
        }
        Some((self.lhs.get(index / size1)?, self.rhs.get(index % size1)?))
    }
}
