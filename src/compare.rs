//! Element-wise comparison of device results against the host reference
//!
//! Every element is checked; nothing short-circuits on the first failure.
//! Mismatches are numerical verdicts and are collected into a
//! [`ComparisonReport`]; only inconsistent buffers produce an `Err`.

use std::fmt;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::dtype::FloatElement;
use crate::error::{Error, Result};
use crate::literal::Literal;
use crate::ops::BinaryOp;
use crate::tolerance::{ErrorSpec, TolerancePolicy, distance};

/// Elements per comparison block
const BLOCK_LEN: usize = 1 << 16;

/// Outcome of one element comparison
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementVerdict {
    /// Within tolerance
    Pass,
    /// The spec asked for no comparison
    Skipped,
    /// Outside tolerance
    Fail,
}

/// Decide whether `actual` is acceptable for `expected` under `spec`
///
/// Rules, in order: skip; NaN must match NaN; zeros compare by sign only when
/// `strict_signed_zeros`; equal values pass; a mismatched infinity fails;
/// otherwise absolute, relative or distance tolerance admits the result.
pub fn check_element<T: FloatElement>(expected: T, actual: T, spec: &ErrorSpec) -> ElementVerdict {
    if spec.skip_comparison {
        return ElementVerdict::Skipped;
    }
    let verdict = |ok: bool| if ok { ElementVerdict::Pass } else { ElementVerdict::Fail };

    if expected.is_nan_value() {
        return verdict(actual.is_nan_value());
    }
    if actual.is_nan_value() {
        return ElementVerdict::Fail;
    }
    if expected.is_zero_value() && actual.is_zero_value() {
        let signs_differ = expected.is_sign_negative_value() != actual.is_sign_negative_value();
        return verdict(!(spec.strict_signed_zeros && signs_differ));
    }

    let (e, a) = (expected.to_f64(), actual.to_f64());
    if expected.to_bits_u64() == actual.to_bits_u64() || e == a {
        return ElementVerdict::Pass;
    }
    if expected.is_infinite_value() || actual.is_infinite_value() {
        return ElementVerdict::Fail;
    }

    let abs_diff = (a - e).abs();
    verdict(
        abs_diff <= spec.abs_err
            || abs_diff <= spec.rel_err * e.abs()
            || distance(expected, actual) <= spec.distance_err,
    )
}

/// One element outside tolerance
#[derive(Clone, Debug, PartialEq)]
pub struct Mismatch {
    /// Linear input index
    pub index: u64,
    /// Operand 0, widened
    pub lhs: f64,
    /// Operand 0 raw bits
    pub lhs_bits: u64,
    /// Operand 1, widened
    pub rhs: f64,
    /// Operand 1 raw bits
    pub rhs_bits: u64,
    /// Reference result rounded to the native type, widened
    pub expected: f64,
    /// Reference result raw bits
    pub expected_bits: u64,
    /// Device result, widened
    pub actual: f64,
    /// Device result raw bits
    pub actual_bits: u64,
    /// Distance between expected and actual in representable values
    pub distance: u64,
    /// Tolerance that was applied
    pub spec: ErrorSpec,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({:e} {:#x}, {:e} {:#x}): expected {:e} ({:#x}), actual {:e} ({:#x}), distance {}, \
             allowed abs {:e} rel {:e} distance {}{}",
            self.index,
            self.lhs,
            self.lhs_bits,
            self.rhs,
            self.rhs_bits,
            self.expected,
            self.expected_bits,
            self.actual,
            self.actual_bits,
            self.distance,
            self.spec.abs_err,
            self.spec.rel_err,
            self.spec.distance_err,
            if self.spec.strict_signed_zeros {
                ", strict signed zeros"
            } else {
                ""
            },
        )
    }
}

/// Result of comparing one suite's outputs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonReport {
    /// Elements examined
    pub total: u64,
    /// Elements within tolerance
    pub passed: u64,
    /// Elements not compared
    pub skipped: u64,
    /// Elements outside tolerance, by ascending index
    pub mismatches: Vec<Mismatch>,
}

impl ComparisonReport {
    /// Number of failing elements
    pub fn failed(&self) -> u64 {
        self.mismatches.len() as u64
    }

    /// True if no element failed
    pub fn is_pass(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn merge(&mut self, other: ComparisonReport) {
        self.total += other.total;
        self.passed += other.passed;
        self.skipped += other.skipped;
        self.mismatches.extend(other.mismatches);
    }
}

/// Compare `actual` with the reference results of `op` over the operand buffers
///
/// # Errors
///
/// [`Error::OutputCountMismatch`] if `actual` and the inputs differ in length,
/// [`Error::InputCountMismatch`] if the two input buffers do, and
/// [`Error::DTypeMismatch`] if any buffer is not `T::DTYPE`.
pub fn compare<T: FloatElement>(
    op: BinaryOp,
    policy: &TolerancePolicy,
    lhs: &Literal,
    rhs: &Literal,
    actual: &Literal,
) -> Result<ComparisonReport> {
    let a = lhs.data::<T>()?;
    let b = rhs.data::<T>()?;
    let out = actual.data::<T>()?;
    if a.len() != b.len() {
        return Err(Error::InputCountMismatch {
            declared: a.len() as u64,
            lhs: a.len(),
            rhs: b.len(),
        });
    }
    if out.len() != a.len() {
        return Err(Error::OutputCountMismatch {
            expected: a.len(),
            got: out.len(),
        });
    }

    let reference = op.reference::<T::Ref>();
    let check_block = |block: usize| -> ComparisonReport {
        let start = block * BLOCK_LEN;
        let end = (start + BLOCK_LEN).min(a.len());
        let mut report = ComparisonReport::default();
        for i in start..end {
            let (x, y, got) = (a[i], b[i], out[i]);
            let spec = policy.error_spec(x.to_ref(), y.to_ref());
            let expected = T::from_ref(reference(x.to_ref(), y.to_ref()));
            report.total += 1;
            match check_element(expected, got, &spec) {
                ElementVerdict::Pass => report.passed += 1,
                ElementVerdict::Skipped => report.skipped += 1,
                ElementVerdict::Fail => report.mismatches.push(Mismatch {
                    index: i as u64,
                    lhs: x.to_f64(),
                    lhs_bits: x.to_bits_u64(),
                    rhs: y.to_f64(),
                    rhs_bits: y.to_bits_u64(),
                    expected: expected.to_f64(),
                    expected_bits: expected.to_bits_u64(),
                    actual: got.to_f64(),
                    actual_bits: got.to_bits_u64(),
                    distance: distance(expected, got),
                    spec,
                }),
            }
        }
        report
    };

    let blocks = a.len().div_ceil(BLOCK_LEN);

    #[cfg(feature = "rayon")]
    let partials: Vec<ComparisonReport> = (0..blocks).into_par_iter().map(check_block).collect();
    #[cfg(not(feature = "rayon"))]
    let partials: Vec<ComparisonReport> = (0..blocks).map(check_block).collect();

    let mut report = ComparisonReport::default();
    for partial in partials {
        report.merge(partial);
    }
    Ok(report)
}
