//! Binary operations under test
//!
//! Each [`BinaryOp`] names one device operation together with its host
//! reference evaluator (see [`reference`]).
//!
//! ```text
//! BinaryOp
//!   ├── Add, Sub, Mul, Div   IEEE arithmetic
//!   ├── Max, Min             NaN-propagating selection
//!   └── AbsComplex           |re + i*im| with both parts as operands
//! ```

pub mod reference;

use std::fmt;

use crate::dtype::RefFloat;
use crate::platform::Platform;

/// Binary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition: a + b
    Add,
    /// Subtraction: a - b
    Sub,
    /// Multiplication: a * b
    Mul,
    /// Division: a / b
    Div,
    /// Maximum: max(a, b), NaN-propagating
    Max,
    /// Minimum: min(a, b), NaN-propagating
    Min,
    /// Complex magnitude: |a + i*b|
    ///
    /// Modeled as binary because both components are independent operands of
    /// the same native type.
    AbsComplex,
}

impl BinaryOp {
    /// Every operation, in registration order
    pub const ALL: [BinaryOp; 7] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Max,
        Self::Min,
        Self::AbsComplex,
    ];

    /// Test name of the operation
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Mul => "Mul",
            Self::Div => "Div",
            Self::Max => "Max",
            Self::Min => "Min",
            Self::AbsComplex => "AbsComplex",
        }
    }

    /// Look up an operation by test name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    /// Platforms on which this operation's suites are disabled
    ///
    /// Mul and Div have open CPU failures; their suites are reported as
    /// disabled on CPU instead of being run.
    pub const fn disabled_on(self) -> &'static [Platform] {
        match self {
            Self::Mul | Self::Div => &[Platform::Cpu],
            _ => &[],
        }
    }

    /// True if suites of this operation must not run on `platform`
    pub fn is_disabled_on(self, platform: Platform) -> bool {
        self.disabled_on().contains(&platform)
    }

    /// Host reference evaluator in reference type `R`
    pub fn reference<R: RefFloat>(self) -> fn(R, R) -> R {
        match self {
            Self::Add => reference::add,
            Self::Sub => reference::sub,
            Self::Mul => reference::mul,
            Self::Div => reference::div,
            Self::Max => reference::max,
            Self::Min => reference::min,
            Self::AbsComplex => reference::abs_complex,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
