//! Common test utilities
#![allow(dead_code)]

use fpexhaust::backend::{Backend, CpuBackend};
use fpexhaust::config::HarnessConfig;
use fpexhaust::dtype::{DType, DTypeSet};
use fpexhaust::error::{Error, Result};
use fpexhaust::literal::Literal;
use fpexhaust::ops::BinaryOp;
use fpexhaust::platform::Platform;

/// Config small enough to run every suite in a unit-test budget
pub fn small_config() -> HarnessConfig {
    HarnessConfig::default()
        .with_dtypes(DTypeSet::WIDE)
        .with_normals(32)
        .with_extremes(64, 16)
}

/// Host backend reporting `platform`
pub fn cpu_as(platform: Platform) -> CpuBackend {
    CpuBackend::new().with_identity(platform.name(), platform)
}

/// Apply `f` to the raw bits of every element of an f32 or f64 literal
pub fn map_bits(lit: &Literal, f: impl Fn(DType, u64) -> u64) -> Literal {
    match lit.dtype() {
        DType::F32 => {
            let v: Vec<f32> = lit
                .data::<f32>()
                .unwrap()
                .iter()
                .map(|x| f32::from_bits(f(DType::F32, x.to_bits() as u64) as u32))
                .collect();
            Literal::from_slice(&v)
        }
        DType::F64 => {
            let v: Vec<f64> = lit
                .data::<f64>()
                .unwrap()
                .iter()
                .map(|x| f64::from_bits(f(DType::F64, x.to_bits())))
                .collect();
            Literal::from_slice(&v)
        }
        other => panic!("map_bits: unsupported dtype {other}"),
    }
}

/// Host backend whose results are post-processed bit by bit
pub struct Perturbed<F> {
    pub inner: CpuBackend,
    pub ops: &'static [BinaryOp],
    pub perturb: F,
}

impl<F: Fn(DType, u64) -> u64 + Send + Sync> Backend for Perturbed<F> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn platform(&self) -> Platform {
        self.inner.platform()
    }

    fn supports_dtype(&self, dtype: DType) -> bool {
        self.inner.supports_dtype(dtype)
    }

    fn execute(&self, op: BinaryOp, lhs: &Literal, rhs: &Literal) -> Result<Literal> {
        let out = self.inner.execute(op, lhs, rhs)?;
        if self.ops.contains(&op) {
            Ok(map_bits(&out, &self.perturb))
        } else {
            Ok(out)
        }
    }
}

/// Flips the sign of every zero result of `ops`
pub fn zero_sign_flipper(
    platform: Platform,
    ops: &'static [BinaryOp],
) -> Perturbed<impl Fn(DType, u64) -> u64 + Send + Sync> {
    Perturbed {
        inner: cpu_as(platform),
        ops,
        perturb: |dtype: DType, bits: u64| {
            let l = dtype.layout();
            if l.is_zero(bits) { bits ^ l.sign_mask() } else { bits }
        },
    }
}

/// Moves every finite nonzero result of `ops` `ulps` steps away from zero
pub fn ulp_shifter(
    platform: Platform,
    ops: &'static [BinaryOp],
    ulps: u64,
) -> Perturbed<impl Fn(DType, u64) -> u64 + Send + Sync> {
    Perturbed {
        inner: cpu_as(platform),
        ops,
        perturb: move |dtype: DType, bits: u64| {
            let l = dtype.layout();
            let magnitude = bits & !l.sign_mask();
            if l.is_nan(bits) || l.is_infinite(bits) || l.is_zero(bits) {
                return bits;
            }
            let shifted = (magnitude + ulps).min(l.max_normal_bits());
            shifted | (bits & l.sign_mask())
        },
    }
}

/// Drops the last output element
pub struct TruncatingBackend(pub CpuBackend);

impl Backend for TruncatingBackend {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn supports_dtype(&self, dtype: DType) -> bool {
        self.0.supports_dtype(dtype)
    }

    fn execute(&self, op: BinaryOp, lhs: &Literal, rhs: &Literal) -> Result<Literal> {
        let out = self.0.execute(op, lhs, rhs)?;
        match out.dtype() {
            DType::F32 => {
                let v = out.data::<f32>()?;
                Ok(Literal::from_slice(&v[..v.len().saturating_sub(1)]))
            }
            DType::F64 => {
                let v = out.data::<f64>()?;
                Ok(Literal::from_slice(&v[..v.len().saturating_sub(1)]))
            }
            dtype => Err(Error::UnsupportedDType {
                dtype,
                op: op.name(),
            }),
        }
    }
}
