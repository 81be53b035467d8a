//! Input materialization
//!
//! Turns a pair of value sets into the two linear operand buffers a backend
//! consumes. The layout is fixed: element `i0 * size1 + i1` holds
//! `(lhs[i0], rhs[i1])`, so operand 1 varies fastest. Every value passes
//! through a [`Substitution`] on its way in.
//!
//! Count disagreements between the value sets and the buffers are harness
//! faults and are returned as errors, never as test failures.

use tracing::{Level, debug, enabled};

use crate::dtype::FloatElement;
use crate::error::{Error, Result};
use crate::literal::Literal;
use crate::values::{OperandSlot, Substitution, ValueSet, ValueSetPair};

/// Declared number of inputs: `size(lhs) * size(rhs)`
pub fn input_size<A: ValueSet + ?Sized, B: ValueSet + ?Sized>(lhs: &A, rhs: &B) -> Result<u64> {
    let (l, r) = (lhs.size(), rhs.size());
    l.checked_mul(r)
        .ok_or(Error::InputCountOverflow { lhs: l, rhs: r })
}

/// Fill `inputs` with the Cartesian product of `lhs` and `rhs`
///
/// Both buffers must already hold exactly `input_size(lhs, rhs)` elements of
/// `T::DTYPE`.
///
/// # Errors
///
/// - [`Error::DTypeMismatch`] if a value set or buffer is not `T::DTYPE`
/// - [`Error::InputCountMismatch`] if a buffer has the wrong element count
/// - [`Error::ValueSetCountMismatch`] if a set yields a different number of
///   values than its `size()`
/// - [`Error::EnumerationCountMismatch`] if the sets yielded a different number
///   of pairs than their sizes declare
pub fn fill_inputs<T, A, B>(
    lhs: &A,
    rhs: &B,
    substitution: &Substitution,
    inputs: &mut [Literal; 2],
) -> Result<()>
where
    T: FloatElement,
    A: ValueSet + ?Sized,
    B: ValueSet + ?Sized,
{
    for set_dtype in [lhs.dtype(), rhs.dtype()] {
        if set_dtype != T::DTYPE {
            return Err(Error::dtype_mismatch(T::DTYPE, set_dtype));
        }
    }

    let declared = input_size(lhs, rhs)?;
    if enabled!(Level::DEBUG) {
        debug!(lhs = %lhs.describe(), "operand 0 values");
        debug!(rhs = %rhs.describe(), "operand 1 values");
        debug!(total = declared, dtype = %T::DTYPE, "materializing inputs");
    }

    let [lhs_buf, rhs_buf] = inputs;
    let (lhs_len, rhs_len) = (lhs_buf.element_count(), rhs_buf.element_count());
    if usize::try_from(declared).ok() != Some(lhs_len) || lhs_len != rhs_len {
        return Err(Error::InputCountMismatch {
            declared,
            lhs: lhs_len,
            rhs: rhs_len,
        });
    }

    let lhs_out = lhs_buf.data_mut::<T>()?;
    let rhs_out = rhs_buf.data_mut::<T>()?;

    let rhs_values: Vec<T> = rhs
        .iter()
        .map(|bits| substitution.apply::<T>(bits, OperandSlot::Rhs))
        .collect();
    check_yielded(rhs, rhs_values.len() as u64)?;

    let mut written = 0usize;
    let mut lhs_yielded = 0u64;
    for bits in lhs.iter() {
        lhs_yielded += 1;
        let a = substitution.apply::<T>(bits, OperandSlot::Lhs);
        for &b in &rhs_values {
            if written < lhs_len {
                lhs_out[written] = a;
                rhs_out[written] = b;
            }
            written += 1;
        }
    }
    check_yielded(lhs, lhs_yielded)?;

    if written as u64 != declared {
        return Err(Error::EnumerationCountMismatch {
            declared,
            written: written as u64,
        });
    }
    Ok(())
}

fn check_yielded<S: ValueSet + ?Sized>(set: &S, yielded: u64) -> Result<()> {
    if yielded != set.size() {
        return Err(Error::ValueSetCountMismatch {
            set: set.describe(),
            declared: set.size(),
            yielded,
        });
    }
    Ok(())
}

/// Allocate and fill both operand buffers for `pair`
pub fn materialize<T: FloatElement>(
    pair: &ValueSetPair,
    substitution: &Substitution,
) -> Result<[Literal; 2]> {
    let total = pair.total_inputs()?;
    let len = usize::try_from(total).map_err(|_| Error::InputCountOverflow {
        lhs: pair.lhs().size(),
        rhs: pair.rhs().size(),
    })?;
    let mut inputs = [
        Literal::vector(T::DTYPE, len),
        Literal::vector(T::DTYPE, len),
    ];
    fill_inputs::<T, _, _>(pair.lhs(), pair.rhs(), substitution, &mut inputs)?;
    Ok(inputs)
}
