//! Host CPU backend
//!
//! Evaluates each operation natively: f32 and f64 compute in their own type,
//! half types widen to f32 and round back. Max and Min propagate NaN but, unlike
//! the host reference, make no promise about which zero wins a ±0 tie.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::{Backend, validate_operands};
use crate::dispatch_float;
use crate::dtype::{DType, DTypeSet, FloatElement, RefFloat};
use crate::error::Result;
use crate::literal::Literal;
use crate::ops::BinaryOp;
use crate::platform::Platform;

/// Default minimum number of elements per rayon task
const DEFAULT_MIN_PARALLEL_LEN: usize = 4096;

/// Reference-quality CPU implementation of every [`BinaryOp`]
#[derive(Clone, Debug)]
pub struct CpuBackend {
    name: String,
    platform: Platform,
    dtypes: DTypeSet,
    min_parallel_len: usize,
}

impl CpuBackend {
    /// CPU backend supporting every dtype compiled into this build
    pub fn new() -> Self {
        let mut dtypes = DTypeSet::WIDE;
        if DType::F16.is_enabled() {
            dtypes = dtypes.union(DTypeSet::HALF);
        }
        Self {
            name: "cpu".into(),
            platform: Platform::Cpu,
            dtypes,
            min_parallel_len: DEFAULT_MIN_PARALLEL_LEN,
        }
    }

    /// Restrict the dtypes this backend claims to support
    pub fn with_dtypes(mut self, dtypes: DTypeSet) -> Self {
        self.dtypes = dtypes;
        self
    }

    /// Report a different name and platform
    ///
    /// Lets the host kernels stand in for another device, for example to
    /// exercise the GPU tolerance policies.
    pub fn with_identity(mut self, name: impl Into<String>, platform: Platform) -> Self {
        self.name = name.into();
        self.platform = platform;
        self
    }

    /// Minimum elements per parallel task
    pub fn with_min_parallel_len(mut self, len: usize) -> Self {
        self.min_parallel_len = len.max(1);
        self
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for CpuBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn supports_dtype(&self, dtype: DType) -> bool {
        self.dtypes.contains(dtype) && dtype.is_enabled()
    }

    fn execute(&self, op: BinaryOp, lhs: &Literal, rhs: &Literal) -> Result<Literal> {
        let dtype = validate_operands(self, op, lhs, rhs)?;
        dispatch_float!(dtype, T => {
            let a = lhs.data::<T>()?;
            let b = rhs.data::<T>()?;
            let mut out = Literal::zeros(dtype, lhs.shape());
            binary_kernel::<T>(op, a, b, out.data_mut::<T>()?, self.min_parallel_len);
            Ok(out)
        })
    }
}

fn binary_kernel<T: FloatElement>(op: BinaryOp, a: &[T], b: &[T], out: &mut [T], min_len: usize) {
    let f = device_fn::<T::Ref>(op);

    #[cfg(feature = "rayon")]
    {
        out.par_iter_mut()
            .with_min_len(min_len)
            .zip(a.par_iter().zip(b.par_iter()))
            .for_each(|(o, (&x, &y))| *o = T::from_ref(f(x.to_ref(), y.to_ref())));
    }

    #[cfg(not(feature = "rayon"))]
    {
        let _ = min_len;
        for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
            *o = T::from_ref(f(x.to_ref(), y.to_ref()));
        }
    }
}

fn device_fn<R: RefFloat>(op: BinaryOp) -> fn(R, R) -> R {
    match op {
        BinaryOp::Add => |x, y| x + y,
        BinaryOp::Sub => |x, y| x - y,
        BinaryOp::Mul => |x, y| x * y,
        BinaryOp::Div => |x, y| x / y,
        BinaryOp::Max => device_max,
        BinaryOp::Min => device_min,
        BinaryOp::AbsComplex => R::complex_abs,
    }
}

#[inline]
fn device_max<R: RefFloat>(x: R, y: R) -> R {
    if x.is_nan() {
        x
    } else if y.is_nan() {
        y
    } else if x > y {
        x
    } else {
        y
    }
}

#[inline]
fn device_min<R: RefFloat>(x: R, y: R) -> R {
    if x.is_nan() {
        x
    } else if y.is_nan() {
        y
    } else if x < y {
        x
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn run<T: FloatElement>(op: BinaryOp, a: &[T], b: &[T]) -> Vec<T> {
        let out = CpuBackend::new()
            .execute(op, &Literal::from_slice(a), &Literal::from_slice(b))
            .unwrap();
        out.data::<T>().unwrap().to_vec()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run(BinaryOp::Add, &[1.0f32, 2.0], &[0.5, -2.0]), vec![1.5, 0.0]);
        assert_eq!(run(BinaryOp::Sub, &[1.0f64], &[3.0]), vec![-2.0]);
        assert_eq!(run(BinaryOp::Mul, &[1.5f32], &[4.0]), vec![6.0]);
        assert_eq!(run(BinaryOp::Div, &[1.0f64], &[-0.0]), vec![f64::NEG_INFINITY]);
    }

    #[test]
    fn test_max_min_propagate_nan() {
        let out = run(BinaryOp::Max, &[f32::NAN, 1.0, 2.0], &[1.0, f32::NAN, 3.0]);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_eq!(out[2], 3.0);
        let out = run(BinaryOp::Min, &[f64::NAN, 2.0], &[1.0, 3.0]);
        assert!(out[0].is_nan());
        assert_eq!(out[1], 2.0);
    }

    #[test]
    fn test_abs_complex() {
        assert_eq!(run(BinaryOp::AbsComplex, &[3.0f32, -0.0], &[4.0, 0.0]), vec![5.0, 0.0]);
    }

    #[test]
    fn test_parallel_matches_small_tasks() {
        let a: Vec<f32> = (0..10_000).map(|i| i as f32 * 0.25).collect();
        let b: Vec<f32> = (0..10_000).map(|i| 1.0 / (i as f32 + 1.0)).collect();
        let backend = CpuBackend::new().with_min_parallel_len(1);
        let out = backend
            .execute(BinaryOp::Div, &Literal::from_slice(&a), &Literal::from_slice(&b))
            .unwrap();
        let out = out.data::<f32>().unwrap();
        for i in 0..a.len() {
            assert_eq!(out[i].to_bits(), (a[i] / b[i]).to_bits());
        }
    }

    #[test]
    fn test_unsupported_dtype() {
        let backend = CpuBackend::new().with_dtypes(DTypeSet::single(DType::F32));
        assert!(!backend.supports_dtype(DType::F64));
        let x = Literal::from_slice(&[1.0f64]);
        let err = backend.execute(BinaryOp::Add, &x, &x).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDType { dtype: DType::F64, op: "Add" }));
    }

    #[test]
    fn test_operand_validation() {
        let backend = CpuBackend::new();
        let a = Literal::from_slice(&[1.0f32, 2.0]);
        let b = Literal::from_slice(&[1.0f64, 2.0]);
        assert!(matches!(
            backend.execute(BinaryOp::Add, &a, &b),
            Err(Error::DTypeMismatch { .. })
        ));
        let c = Literal::from_slice(&[1.0f32]);
        assert!(matches!(
            backend.execute(BinaryOp::Add, &a, &c),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_identity_and_platform() {
        let backend = CpuBackend::new().with_identity("cuda", Platform::Gpu);
        assert_eq!(backend.name(), "cuda");
        assert_eq!(backend.platform(), Platform::Gpu);
    }
}
