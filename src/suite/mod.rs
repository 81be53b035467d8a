//! Conformance suites
//!
//! A suite is one (operation, dtype, category instance) triple: a value-set
//! pair whose Cartesian product is run through a backend and compared with the
//! host reference.
//!
//! ```text
//! Registry::init(config)
//!   └── SuitePlan::instantiate(dtype)      five categories of value-set pairs
//!         └── Suite { id, pair, policy }   one per op x dtype x instance
//! Registry::run(backend, filter)
//!   └── run_suite                          materialize -> execute -> compare
//! ```

mod plan;
mod registry;
mod runner;

pub use plan::SuitePlan;
pub use registry::{Registry, RunSummary, Suite, SuiteResult};
pub use runner::{SuiteOutcome, run_suite};

use std::fmt;

use crate::dtype::DType;
use crate::ops::BinaryOp;

/// Category of input pairs a suite covers
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SuiteCategory {
    /// Boundary values against boundary values
    SpecialValues,
    /// Boundary values against sampled normals
    SpecialAndNormalValues,
    /// Sampled normals against boundary values
    NormalAndSpecialValues,
    /// Sampled normals against sampled normals
    NormalAndNormalValues,
    /// Extreme-magnitude normals against groups of the same set
    LargeAndSmallMagnitudeNormalValues,
}

impl SuiteCategory {
    /// Every category, in registration order
    pub const ALL: [SuiteCategory; 5] = [
        Self::SpecialValues,
        Self::SpecialAndNormalValues,
        Self::NormalAndSpecialValues,
        Self::NormalAndNormalValues,
        Self::LargeAndSmallMagnitudeNormalValues,
    ];

    /// Suite label
    pub const fn label(self) -> &'static str {
        match self {
            Self::SpecialValues => "SpecialValues",
            Self::SpecialAndNormalValues => "SpecialAndNormalValues",
            Self::NormalAndSpecialValues => "NormalAndSpecialValues",
            Self::NormalAndNormalValues => "NormalAndNormalValues",
            Self::LargeAndSmallMagnitudeNormalValues => "LargeAndSmallMagnitudeNormalValues",
        }
    }
}

impl fmt::Display for SuiteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of one suite instance; the unit of selection
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SuiteId {
    /// Operation under test
    pub op: BinaryOp,
    /// Native type
    pub dtype: DType,
    /// Input category
    pub category: SuiteCategory,
    /// Instance number within (op, dtype, category)
    pub index: usize,
}

impl SuiteId {
    /// True if the display name contains `filter`
    ///
    /// An empty filter matches everything.
    pub fn matches(&self, filter: &str) -> bool {
        filter.is_empty() || self.to_string().contains(filter)
    }
}

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}_{}/{}", self.category, self.op, self.dtype, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_id_display() {
        let id = SuiteId {
            op: BinaryOp::AbsComplex,
            dtype: DType::F64,
            category: SuiteCategory::LargeAndSmallMagnitudeNormalValues,
            index: 7,
        };
        assert_eq!(id.to_string(), "LargeAndSmallMagnitudeNormalValues/AbsComplex_f64/7");
        assert!(id.matches("AbsComplex_f64"));
        assert!(id.matches(""));
        assert!(!id.matches("Add_"));
    }

    #[test]
    fn test_category_labels() {
        let labels: Vec<_> = SuiteCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            [
                "SpecialValues",
                "SpecialAndNormalValues",
                "NormalAndSpecialValues",
                "NormalAndNormalValues",
                "LargeAndSmallMagnitudeNormalValues"
            ]
        );
    }
}
