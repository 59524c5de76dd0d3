//! External Arrays - Interop with N-Dimensional Arrays
//!
//! `NdBuffer` is the boundary type for external n-dimensional arrays: a
//! shape plus one flat, contiguous buffer whose length is the product of the
//! shape. Tensors are built from it either by copying or by aliasing the
//! buffer. With the `ndarray` feature, `NdBuffer` converts to and from
//! `ndarray::ArrayD`.
//!
//! Aliasing creates shared ownership of one buffer between the array and
//! the tensor. Nothing synchronizes writers beyond the storage lock; keeping
//! writes coherent is the caller's contract.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use tensorwire_core::dtype::{DataCategory, ElementType, Scalar};
use tensorwire_core::error::{Error, Result};
use tensorwire_core::storage::Storage;

use crate::shape::checked_numel;
use crate::tensor::{Tensor, TensorSource};

// =============================================================================
// NdBuffer
// =============================================================================

/// A contiguous n-dimensional array backed by shared storage.
#[derive(Debug, Clone)]
pub struct NdBuffer<T: Scalar> {
    shape: Vec<usize>,
    data: Storage<T>,
}

impl<T: Scalar> NdBuffer<T> {
    /// Creates an array from a shape and row-major data.
    pub fn new(shape: &[usize], data: Vec<T>) -> Result<Self> {
        Self::from_storage(shape, Storage::from_vec(data))
    }

    /// Creates an array over existing storage.
    pub fn from_storage(shape: &[usize], data: Storage<T>) -> Result<Self> {
        let expected = checked_numel(shape).ok_or_else(|| Error::ShapeOverflow {
            shape: shape.to_vec(),
        })?;
        if data.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// Returns the shape.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the flat buffer.
    #[must_use]
    pub fn data(&self) -> &Storage<T> {
        &self.data
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(feature = "ndarray")]
impl<T: Scalar> NdBuffer<T> {
    /// Converts an `ndarray` array, gathering elements in row-major order
    /// whatever the source strides are.
    pub fn from_ndarray(array: &ndarray::ArrayD<T>) -> Self {
        let shape = array.shape().to_vec();
        let data: Vec<T> = match array.as_slice() {
            Some(contiguous) => contiguous.to_vec(),
            None => array.iter().copied().collect(),
        };

        Self {
            shape,
            data: Storage::from_vec(data),
        }
    }

    /// Copies the array into an `ndarray` array.
    pub fn to_ndarray(&self) -> Result<ndarray::ArrayD<T>> {
        ndarray::ArrayD::from_shape_vec(self.shape.clone(), self.data.to_vec())
            .map_err(|e| Error::invalid_operation(format!("ndarray conversion failed: {e}")))
    }
}

// =============================================================================
// Tensor Conversions
// =============================================================================

impl Tensor {
    /// Creates a tensor from an external array.
    ///
    /// With `copy` the contents are copied into a fresh buffer; without it
    /// the tensor aliases the array's storage. `String` is rejected because
    /// external arrays are numeric-only, and `T` must back `element_type`.
    pub fn from_external_array<T: Scalar>(
        array: &NdBuffer<T>,
        element_type: ElementType,
        copy: bool,
    ) -> Result<Self> {
        if !element_type.belongs_to(DataCategory::Numeric) {
            return Err(Error::CategoryMismatch {
                category: DataCategory::Numeric,
                actual: element_type,
            });
        }

        let storage = if copy {
            array.data().deep_copy()
        } else {
            array.data().clone()
        };
        let data = T::wrap(storage, element_type).ok_or(Error::TypeMismatch {
            expected: element_type,
            actual: T::DTYPE,
        })?;

        Self::new(array.shape(), element_type, TensorSource::Data(data))
    }

    /// Returns an external array that aliases this tensor's buffer,
    /// materializing the data first if needed.
    pub fn to_nd_buffer<T: Scalar>(&self) -> Result<NdBuffer<T>> {
        let data = self.data()?;
        let storage = T::unwrap(&data).ok_or(Error::TypeMismatch {
            expected: self.element_type(),
            actual: T::DTYPE,
        })?;
        NdBuffer::from_storage(self.shape(), storage.clone())
    }
}

impl<T: Scalar> TryFrom<&Tensor> for NdBuffer<T> {
    type Error = Error;

    fn try_from(tensor: &Tensor) -> Result<Self> {
        tensor.to_nd_buffer()
    }
}

// =============================================================================
// Tests
// =============================================================================
