//! # fpexhaust
//!
//! **Exhaustive conformance testing of binary floating-point operations.**
//!
//! fpexhaust checks a device implementation of a binary operation against a
//! host reference over (nearly) the whole input space of a floating-point type:
//! every boundary value against every other, boundary values against strided
//! normals, normals against normals, and tens of thousands of extreme
//! magnitudes against each other.
//!
//! ## Pipeline
//!
//! ```text
//! SuitePlan ──> ValueSetPair ──> materialize ──> Backend::execute ──> compare
//!                                    │                                  │
//!                              Substitution                     TolerancePolicy
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fpexhaust::prelude::*;
//!
//! let config = HarnessConfig::default().with_normals(100).with_extremes(400, 100);
//! let registry = Registry::init(&config)?;
//! let summary = registry.run(&CpuBackend::new(), "Add_f32")?;
//! assert!(summary.is_success());
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): parallel CPU kernels and comparison
//! - `f16`: half-precision suites (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod compare;
pub mod config;
pub mod dtype;
pub mod error;
pub mod literal;
pub mod materialize;
pub mod ops;
pub mod platform;
pub mod suite;
pub mod tolerance;
pub mod values;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::{Backend, CpuBackend};
    pub use crate::compare::{ComparisonReport, Mismatch};
    pub use crate::config::HarnessConfig;
    pub use crate::dtype::{DType, DTypeSet, FloatElement};
    pub use crate::error::{Error, Result};
    pub use crate::literal::Literal;
    pub use crate::ops::BinaryOp;
    pub use crate::platform::Platform;
    pub use crate::suite::{Registry, RunSummary, SuiteCategory, SuiteId, SuiteOutcome, SuitePlan};
    pub use crate::tolerance::{ErrorSpec, TolerancePolicy};
    pub use crate::values::{FpValues, Substitution, ValueSet, ValueSetPair};
}
