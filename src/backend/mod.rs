//! Device execution backends
//!
//! A [`Backend`] runs one [`BinaryOp`] element-wise over two operand buffers
//! and hands back the device results. How the computation is compiled or
//! dispatched is the backend's business; the harness only sees literals.
//!
//! ```text
//! Backend
//! ├── name / platform   selects tolerances and disabled suites
//! ├── supports_dtype    F64 suites are dropped when false
//! └── execute           (op, lhs, rhs) -> out, same length and dtype
//! ```

pub mod cpu;

pub use cpu::CpuBackend;

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::literal::Literal;
use crate::ops::BinaryOp;
use crate::platform::Platform;

/// Device under test
pub trait Backend: Send + Sync {
    /// Backend name, as reported by the device runtime
    fn name(&self) -> &str;

    /// Platform tag
    ///
    /// The default derives it from [`Backend::name`].
    fn platform(&self) -> Platform {
        Platform::from_backend_name(self.name())
    }

    /// True if the backend can execute `dtype` computations
    fn supports_dtype(&self, dtype: DType) -> bool;

    /// Apply `op` element-wise to `lhs` and `rhs`
    ///
    /// The result must have the same dtype and element count as the inputs.
    fn execute(&self, op: BinaryOp, lhs: &Literal, rhs: &Literal) -> Result<Literal>;
}

/// Check that two operand buffers can be fed to `op`
///
/// Shared precondition for [`Backend::execute`] implementations.
pub fn validate_operands<B: Backend + ?Sized>(
    backend: &B,
    op: BinaryOp,
    lhs: &Literal,
    rhs: &Literal,
) -> Result<DType> {
    let dtype = lhs.dtype();
    if rhs.dtype() != dtype {
        return Err(Error::dtype_mismatch(dtype, rhs.dtype()));
    }
    if lhs.element_count() != rhs.element_count() {
        return Err(Error::invalid_argument(
            "rhs",
            format!(
                "operand lengths differ: {} vs {}",
                lhs.element_count(),
                rhs.element_count()
            ),
        ));
    }
    if !backend.supports_dtype(dtype) {
        return Err(Error::UnsupportedDType {
            dtype,
            op: op.name(),
        });
    }
    Ok(dtype)
}
