//! Host-side typed buffers
//!
//! A [`Literal`] is a dtype-tagged, shaped block of host memory. Storage is a
//! `Vec<u64>` so that typed views for every supported width are correctly
//! aligned; `bytemuck` provides the safe reinterpretation.

use crate::dtype::{DType, FloatElement};
use crate::error::{Error, Result};

/// Typed, shaped host buffer exchanged with backends
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    dtype: DType,
    shape: Vec<usize>,
    len: usize,
    words: Vec<u64>,
}

impl Literal {
    /// Allocate a zero-filled literal
    pub fn zeros(dtype: DType, shape: &[usize]) -> Self {
        let len: usize = shape.iter().product();
        let elems_per_word = 8 / dtype.size_in_bytes();
        Self {
            dtype,
            shape: shape.to_vec(),
            len,
            words: vec![0; len.div_ceil(elems_per_word)],
        }
    }

    /// Allocate a zero-filled rank-1 literal of `len` elements
    pub fn vector(dtype: DType, len: usize) -> Self {
        Self::zeros(dtype, &[len])
    }

    /// Build a rank-1 literal from typed values
    pub fn from_slice<T: FloatElement>(values: &[T]) -> Self {
        let mut lit = Self::vector(T::DTYPE, values.len());
        // Freshly allocated with T::DTYPE, so the typed view always exists.
        if let Ok(dst) = lit.data_mut::<T>() {
            dst.copy_from_slice(values);
        }
        lit
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of elements
    #[inline]
    pub fn element_count(&self) -> usize {
        self.len
    }

    /// Typed read-only view
    pub fn data<T: FloatElement>(&self) -> Result<&[T]> {
        self.check_dtype::<T>()?;
        let all: &[T] = bytemuck::cast_slice(&self.words);
        Ok(&all[..self.len])
    }

    /// Typed mutable view
    pub fn data_mut<T: FloatElement>(&mut self) -> Result<&mut [T]> {
        self.check_dtype::<T>()?;
        let len = self.len;
        let all: &mut [T] = bytemuck::cast_slice_mut(&mut self.words);
        Ok(&mut all[..len])
    }

    /// Raw bits of element `index`, zero-extended
    pub fn bits_at(&self, index: usize) -> Option<u64> {
        if index >= self.len {
            return None;
        }
        let size = self.dtype.size_in_bytes();
        let bytes: &[u8] = bytemuck::cast_slice(&self.words);
        let chunk = &bytes[index * size..(index + 1) * size];
        let bits = match size {
            8 => u64::from_ne_bytes(chunk.try_into().ok()?),
            4 => u32::from_ne_bytes(chunk.try_into().ok()?) as u64,
            _ => u16::from_ne_bytes(chunk.try_into().ok()?) as u64,
        };
        Some(bits)
    }

    fn check_dtype<T: FloatElement>(&self) -> Result<()> {
        if self.dtype != T::DTYPE {
            return Err(Error::dtype_mismatch(T::DTYPE, self.dtype));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape_and_len() {
        let lit = Literal::zeros(DType::F32, &[3, 5]);
        assert_eq!(lit.element_count(), 15);
        assert_eq!(lit.shape(), &[3, 5]);
        assert!(lit.data::<f32>().unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_odd_length_f32() {
        let mut lit = Literal::vector(DType::F32, 3);
        lit.data_mut::<f32>().unwrap().copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(lit.data::<f32>().unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(lit.bits_at(2), Some(3.0f32.to_bits() as u64));
        assert_eq!(lit.bits_at(3), None);
    }

    #[test]
    fn test_dtype_mismatch() {
        let lit = Literal::from_slice(&[1.0f64, -0.0]);
        assert!(lit.data::<f32>().is_err());
        assert_eq!(lit.bits_at(1), Some(0x8000_0000_0000_0000));
    }

    #[test]
    fn test_empty() {
        let lit = Literal::vector(DType::F64, 0);
        assert_eq!(lit.element_count(), 0);
        assert!(lit.data::<f64>().unwrap().is_empty());
    }
}
