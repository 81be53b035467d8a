//! Error types for fpexhaust
//!
//! Two kinds of failure leave this crate through [`Error`]:
//!
//! - **Harness faults**: the harness itself is inconsistent (a buffer that does
//!   not match the declared input count, a value set of the wrong dtype, a plan
//!   that blows the input budget). These abort a run; see [`Error::is_harness_fault`].
//! - **Setup errors**: bad configuration, unsupported dtypes, backend errors.
//!
//! Numerical mismatches between device and reference are *not* errors. They are
//! collected as [`crate::compare::Mismatch`] records in a suite verdict.

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using fpexhaust's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or running conformance suites
#[derive(Error, Debug)]
pub enum Error {
    /// Input buffers were not sized to the product of the value-set sizes
    #[error(
        "Input count mismatch: value sets declare {declared} inputs, buffers hold {lhs} and {rhs}"
    )]
    InputCountMismatch {
        /// Declared input count (`size0 * size1`)
        declared: u64,
        /// Element count of the operand-0 buffer
        lhs: usize,
        /// Element count of the operand-1 buffer
        rhs: usize,
    },

    /// Enumeration wrote a different number of pairs than declared
    #[error("Enumeration wrote {written} input pairs, expected {declared}")]
    EnumerationCountMismatch {
        /// Declared input count
        declared: u64,
        /// Number of pairs actually written
        written: u64,
    },

    /// A value set yielded a different number of values than its size
    #[error("Value set {set} yielded {yielded} values, declared {declared}")]
    ValueSetCountMismatch {
        /// Description of the value set
        set: String,
        /// Declared size
        declared: u64,
        /// Values actually yielded
        yielded: u64,
    },

    /// Device output length differs from the input length
    #[error("Output count mismatch: expected {expected} elements, got {got}")]
    OutputCountMismatch {
        /// Number of input pairs
        expected: usize,
        /// Number of output elements
        got: usize,
    },

    /// DType mismatch between a buffer or value set and the requested type
    #[error("DType mismatch: expected {expected}, got {got}")]
    DTypeMismatch {
        /// Expected dtype
        expected: DType,
        /// Actual dtype
        got: DType,
    },

    /// Declared input total exceeds the per-dtype budget
    #[error("Input budget exceeded for {dtype}: planned {total} inputs, budget is {budget}")]
    BudgetExceeded {
        /// The dtype whose plan is over budget
        dtype: DType,
        /// Total planned inputs across all categories
        total: u64,
        /// Configured budget
        budget: u64,
    },

    /// Input count does not fit in host memory indexing
    #[error("Input count overflow: {lhs} x {rhs} values")]
    InputCountOverflow {
        /// Size of operand-0 set
        lhs: u64,
        /// Size of operand-1 set
        rhs: u64,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype} for '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// DType needs a cargo feature that is not enabled
    #[error("DType {dtype} requires the '{feature}' feature")]
    FeatureRequired {
        /// The dtype requested
        dtype: DType,
        /// The feature that enables it
        feature: &'static str,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid configuration value (environment or command line)
    #[error("Invalid configuration {key}={value}: {reason}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Offending value
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Backend-specific error
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create a dtype mismatch error
    pub fn dtype_mismatch(expected: DType, got: DType) -> Self {
        Self::DTypeMismatch { expected, got }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True when the error signals a bug in the harness rather than in the
    /// device under test.
    ///
    /// Harness faults must abort the run; they are never reported as a
    /// numerical failure of a suite.
    pub fn is_harness_fault(&self) -> bool {
        matches!(
            self,
            Self::InputCountMismatch { .. }
                | Self::EnumerationCountMismatch { .. }
                | Self::ValueSetCountMismatch { .. }
                | Self::OutputCountMismatch { .. }
                | Self::DTypeMismatch { .. }
                | Self::BudgetExceeded { .. }
                | Self::InputCountOverflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_fault_classification() {
        let err = Error::InputCountMismatch {
            declared: 25,
            lhs: 24,
            rhs: 25,
        };
        assert!(err.is_harness_fault());
        assert!(Error::dtype_mismatch(DType::F32, DType::F64).is_harness_fault());
        assert!(!Error::Backend("device lost".into()).is_harness_fault());
        assert!(!Error::invalid_argument("group", "must be > 0").is_harness_fault());
    }

    #[test]
    fn test_error_display() {
        let err = Error::BudgetExceeded {
            dtype: DType::F32,
            total: 10,
            budget: 5,
        };
        assert_eq!(
            err.to_string(),
            "Input budget exceeded for f32: planned 10 inputs, budget is 5"
        );
    }
}
