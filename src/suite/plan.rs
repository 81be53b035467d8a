//! Suite instantiation under an input budget

use std::sync::Arc;

use tracing::debug;

use super::SuiteCategory;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::values::generators::{boundary_values, magnitude_extreme_normals, normals};
use crate::values::{FpValues, ValueSet, ValueSetPair};

/// Sizes of the value sets generated for one dtype
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SuitePlan {
    /// Sampled normals per normal-valued operand
    pub normals: u64,
    /// Total extreme-magnitude normals
    pub extreme_total: u64,
    /// Extreme values per operand-1 group
    pub extreme_group: u64,
    /// Maximum inputs across every category of this dtype
    pub input_budget: u64,
}

impl SuitePlan {
    /// Default extreme-magnitude set size
    pub const DEFAULT_EXTREME_TOTAL: u64 = 40_000;
    /// Default extreme-magnitude group size
    pub const DEFAULT_EXTREME_GROUP: u64 = 2_000;
    /// Default per-dtype input budget
    pub const DEFAULT_INPUT_BUDGET: u64 = 41_000 * 41_000;

    /// Default plan for `dtype`
    pub const fn for_dtype(dtype: DType) -> Self {
        let normals = match dtype {
            DType::F64 => 1_000,
            _ => 2_000,
        };
        Self {
            normals,
            extreme_total: Self::DEFAULT_EXTREME_TOTAL,
            extreme_group: Self::DEFAULT_EXTREME_GROUP,
            input_budget: Self::DEFAULT_INPUT_BUDGET,
        }
    }

    /// Override the normal sample count
    pub const fn with_normals(mut self, normals: u64) -> Self {
        self.normals = normals;
        self
    }

    /// Override the extreme-magnitude sizes
    pub const fn with_extremes(mut self, total: u64, group: u64) -> Self {
        self.extreme_total = total;
        self.extreme_group = group;
        self
    }

    /// Override the input budget
    pub const fn with_input_budget(mut self, budget: u64) -> Self {
        self.input_budget = budget;
        self
    }

    /// Build every category's value-set pairs for `dtype`
    ///
    /// The extreme-magnitude category yields one pair per group: the whole
    /// extreme set as operand 0 against one group as operand 1, so together the
    /// instances cover the full square.
    ///
    /// # Errors
    ///
    /// [`Error::BudgetExceeded`] if the pairs hold more inputs than
    /// `input_budget`; generator errors if a size does not fit `dtype`.
    pub fn instantiate(&self, dtype: DType, seed: u64) -> Result<Vec<(SuiteCategory, ValueSetPair)>> {
        let boundary = Arc::new(boundary_values(dtype)?);
        let normal = Arc::new(normals(dtype, self.normals, seed)?);
        let extreme = Arc::new(magnitude_extreme_normals(dtype, self.extreme_total)?);

        let pair = |a: &Arc<FpValues>, b: &Arc<FpValues>| ValueSetPair::new(a.clone(), b.clone());
        let mut out = vec![
            (SuiteCategory::SpecialValues, pair(&boundary, &boundary)?),
            (SuiteCategory::SpecialAndNormalValues, pair(&boundary, &normal)?),
            (SuiteCategory::NormalAndSpecialValues, pair(&normal, &boundary)?),
            (SuiteCategory::NormalAndNormalValues, pair(&normal, &normal)?),
        ];
        for group in extreme.partition(self.extreme_group)? {
            out.push((
                SuiteCategory::LargeAndSmallMagnitudeNormalValues,
                pair(&extreme, &Arc::new(group))?,
            ));
        }

        let total = total_inputs(&out)?;
        debug!(
            %dtype,
            boundary = boundary.size(),
            normals = normal.size(),
            extremes = extreme.size(),
            instances = out.len(),
            total,
            "instantiated suites"
        );
        if total > self.input_budget {
            return Err(Error::BudgetExceeded {
                dtype,
                total,
                budget: self.input_budget,
            });
        }
        Ok(out)
    }
}

/// Sum of declared inputs over `pairs`
pub(crate) fn total_inputs(pairs: &[(SuiteCategory, ValueSetPair)]) -> Result<u64> {
    pairs.iter().try_fold(0u64, |acc, (_, pair)| {
        let n = pair.total_inputs()?;
        acc.checked_add(n).ok_or(Error::InputCountOverflow {
            lhs: acc,
            rhs: n,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_sizes() {
        assert_eq!(SuitePlan::for_dtype(DType::F32).normals, 2000);
        assert_eq!(SuitePlan::for_dtype(DType::F64).normals, 1000);
        let p = SuitePlan::for_dtype(DType::F32);
        assert_eq!((p.extreme_total, p.extreme_group), (40_000, 2_000));
    }

    #[test]
    fn test_instantiate_f32_default() {
        let plan = SuitePlan::for_dtype(DType::F32);
        let pairs = plan.instantiate(DType::F32, 1).unwrap();
        assert_eq!(pairs.len(), 4 + 20);

        let count = |c| pairs.iter().filter(|(cat, _)| *cat == c).count();
        assert_eq!(count(SuiteCategory::SpecialValues), 1);
        assert_eq!(count(SuiteCategory::LargeAndSmallMagnitudeNormalValues), 20);

        let (_, extreme) = &pairs[4];
        assert_eq!(extreme.total_inputs().unwrap(), 80_000_000);
        let (_, nn) = &pairs[3];
        assert_eq!(nn.total_inputs().unwrap(), 4_000_000);

        let total = total_inputs(&pairs).unwrap();
        assert_eq!(total, 48 * 48 + 2 * 48 * 2000 + 2000 * 2000 + 40_000 * 40_000);
        assert!(total <= plan.input_budget);
    }

    #[test]
    fn test_budget_exceeded() {
        let plan = SuitePlan::for_dtype(DType::F64).with_input_budget(1_000);
        let err = plan.instantiate(DType::F64, 0).unwrap_err();
        assert!(matches!(err, Error::BudgetExceeded { dtype: DType::F64, budget: 1_000, .. }));
        assert!(err.is_harness_fault());
    }

    #[test]
    fn test_small_plan() {
        let plan = SuitePlan::for_dtype(DType::F64)
            .with_normals(10)
            .with_extremes(40, 8);
        let pairs = plan.instantiate(DType::F64, 3).unwrap();
        assert_eq!(pairs.len(), 4 + 5);
        assert!(pairs[4..].iter().all(|(_, p)| p.total_inputs().unwrap() == 40 * 8));
    }
}
