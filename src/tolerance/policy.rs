//! Per-operation, per-platform tolerance policies

use super::ErrorSpec;
use crate::dtype::{DType, RefFloat};
use crate::ops::BinaryOp;
use crate::platform::Platform;

/// Maps reference operands to the [`ErrorSpec`] used for their result
///
/// Resolved once per suite by [`TolerancePolicy::resolve`]; evaluating it per
/// element is a pure function of the two reference operands.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TolerancePolicy {
    /// Same spec for every input pair
    Uniform(ErrorSpec),
    /// Exact comparison that also distinguishes +0 from -0
    StrictSignedZeros,
    /// Complex magnitude on host CPUs
    ///
    /// Subnormal real parts may flush, so they get an absolute allowance of
    /// their own magnitude. Distance 2 covers `hypot` rounding. NaN operands
    /// are skipped.
    AbsComplexCpu,
    /// Complex magnitude on GPUs: distance only, NaN operands skipped
    AbsComplexGpu {
        /// Allowed distance in representable values
        distance_err: u64,
    },
}

impl TolerancePolicy {
    /// Choose the policy for `op` on `platform` at `dtype`
    ///
    /// Arithmetic and selection ops use `default_spec` everywhere.
    pub fn resolve(op: BinaryOp, platform: Platform, dtype: DType, default_spec: ErrorSpec) -> Self {
        match op {
            BinaryOp::AbsComplex => match (platform, dtype) {
                (Platform::Cpu, DType::F32 | DType::F64) => Self::AbsComplexCpu,
                (Platform::Gpu, DType::F32) => Self::AbsComplexGpu { distance_err: 3 },
                (Platform::Gpu, DType::F64) => Self::AbsComplexGpu { distance_err: 2 },
                _ => Self::StrictSignedZeros,
            },
            _ => Self::Uniform(default_spec),
        }
    }

    /// Tolerance for the result of reference operands `(x, y)`
    pub fn error_spec<R: RefFloat>(&self, x: R, y: R) -> ErrorSpec {
        match *self {
            Self::Uniform(spec) => spec,
            Self::StrictSignedZeros => ErrorSpec::builder().strict_signed_zeros(true).build(),
            Self::AbsComplexCpu => {
                let (real, imag) = (x, y);
                let abs_err = if real.is_subnormal() && !real.is_nan() {
                    real.abs_f64()
                } else {
                    0.0
                };
                ErrorSpec::builder()
                    .abs_err(abs_err)
                    .distance_err(2)
                    .skip_comparison(real.is_nan() || imag.is_nan())
                    .build()
            }
            Self::AbsComplexGpu { distance_err } => ErrorSpec::builder()
                .distance_err(distance_err)
                .skip_comparison(x.is_nan() || y.is_nan())
                .build(),
        }
    }
}
