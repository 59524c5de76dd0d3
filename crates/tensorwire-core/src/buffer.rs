//! Buffers - Typed Tensor Data
//!
//! `TensorData` is the buffer kind for each element type: one variant per
//! type, holding the matching `Storage`. The category views (`IntegerData`,
//! `FloatData`, `NumericData`) narrow a buffer to the subset of kinds a
//! caller asked for.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use num_traits::AsPrimitive;

use crate::dtype::{DataCategory, ElementType, Scalar};
use crate::error::{Error, Result};
use crate::storage::Storage;

// =============================================================================
// TensorData
// =============================================================================

/// A typed, shared buffer of tensor elements.
#[derive(Debug, Clone)]
pub enum TensorData {
    /// Booleans, one byte each.
    Bool(Storage<u8>),
    /// 32-bit floats.
    Float32(Storage<f32>),
    /// 64-bit floats.
    Float64(Storage<f64>),
    /// 8-bit signed integers.
    Int8(Storage<i8>),
    /// 8-bit unsigned integers.
    Uint8(Storage<u8>),
    /// 16-bit signed integers.
    Int16(Storage<i16>),
    /// 16-bit unsigned integers.
    Uint16(Storage<u16>),
    /// 32-bit signed integers.
    Int32(Storage<i32>),
    /// 32-bit unsigned integers.
    Uint32(Storage<u32>),
    /// Text values.
    String(Storage<String>),
}

impl TensorData {
    /// Allocates a buffer of `len` elements for `element_type`: zeros for
    /// numeric types, empty strings for `String`.
    #[must_use]
    pub fn zeros(element_type: ElementType, len: usize) -> Self {
        match element_type {
            ElementType::Bool => Self::Bool(Storage::zeros(len)),
            ElementType::Float32 => Self::Float32(Storage::zeros(len)),
            ElementType::Float64 => Self::Float64(Storage::zeros(len)),
            ElementType::Int8 => Self::Int8(Storage::zeros(len)),
            ElementType::Uint8 => Self::Uint8(Storage::zeros(len)),
            ElementType::Int16 => Self::Int16(Storage::zeros(len)),
            ElementType::Uint16 => Self::Uint16(Storage::zeros(len)),
            ElementType::Int32 => Self::Int32(Storage::zeros(len)),
            ElementType::Uint32 => Self::Uint32(Storage::zeros(len)),
            ElementType::String => Self::String(Storage::zeros(len)),
        }
    }

    /// Builds a bool buffer from `bool` values.
    #[must_use]
    pub fn from_bools(values: &[bool]) -> Self {
        Self::Bool(Storage::from_vec(values.iter().map(|&b| u8::from(b)).collect()))
    }

    /// Returns the element type this buffer kind backs.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Bool(_) => ElementType::Bool,
            Self::Float32(_) => ElementType::Float32,
            Self::Float64(_) => ElementType::Float64,
            Self::Int8(_) => ElementType::Int8,
            Self::Uint8(_) => ElementType::Uint8,
            Self::Int16(_) => ElementType::Int16,
            Self::Uint16(_) => ElementType::Uint16,
            Self::Int32(_) => ElementType::Int32,
            Self::Uint32(_) => ElementType::Uint32,
            Self::String(_) => ElementType::String,
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(s) | Self::Uint8(s) => s.len(),
            Self::Float32(s) => s.len(),
            Self::Float64(s) => s.len(),
            Self::Int8(s) => s.len(),
            Self::Int16(s) => s.len(),
            Self::Uint16(s) => s.len(),
            Self::Int32(s) => s.len(),
            Self::Uint32(s) => s.len(),
            Self::String(s) => s.len(),
        }
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if both buffers are the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) | (Self::Uint8(a), Self::Uint8(b)) => a.ptr_eq(b),
            (Self::Float32(a), Self::Float32(b)) => a.ptr_eq(b),
            (Self::Float64(a), Self::Float64(b)) => a.ptr_eq(b),
            (Self::Int8(a), Self::Int8(b)) => a.ptr_eq(b),
            (Self::Int16(a), Self::Int16(b)) => a.ptr_eq(b),
            (Self::Uint16(a), Self::Uint16(b)) => a.ptr_eq(b),
            (Self::Int32(a), Self::Int32(b)) => a.ptr_eq(b),
            (Self::Uint32(a), Self::Uint32(b)) => a.ptr_eq(b),
            (Self::String(a), Self::String(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Copies the buffer into fresh, unshared storage.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        match self {
            Self::Bool(s) => Self::Bool(s.deep_copy()),
            Self::Float32(s) => Self::Float32(s.deep_copy()),
            Self::Float64(s) => Self::Float64(s.deep_copy()),
            Self::Int8(s) => Self::Int8(s.deep_copy()),
            Self::Uint8(s) => Self::Uint8(s.deep_copy()),
            Self::Int16(s) => Self::Int16(s.deep_copy()),
            Self::Uint16(s) => Self::Uint16(s.deep_copy()),
            Self::Int32(s) => Self::Int32(s.deep_copy()),
            Self::Uint32(s) => Self::Uint32(s.deep_copy()),
            Self::String(s) => Self::String(s.deep_copy()),
        }
    }

    /// Checks that this buffer can back a tensor of `element_type` with
    /// `len` elements. Length is checked before kind.
    pub fn validate(&self, element_type: ElementType, len: usize) -> Result<()> {
        if self.len() != len {
            return Err(Error::LengthMismatch {
                expected: len,
                actual: self.len(),
            });
        }
        if self.element_type() != element_type {
            return Err(Error::TypeMismatch {
                expected: element_type,
                actual: self.element_type(),
            });
        }
        Ok(())
    }

    /// Narrows to the text buffer.
    pub fn into_strings(self) -> Result<Storage<String>> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(category_error(DataCategory::String, &other)),
        }
    }

    /// Narrows to an integer (or bool) buffer.
    pub fn into_integer(self) -> Result<IntegerData> {
        match self {
            Self::Bool(s) => Ok(IntegerData::Bool(s)),
            Self::Int8(s) => Ok(IntegerData::Int8(s)),
            Self::Uint8(s) => Ok(IntegerData::Uint8(s)),
            Self::Int16(s) => Ok(IntegerData::Int16(s)),
            Self::Uint16(s) => Ok(IntegerData::Uint16(s)),
            Self::Int32(s) => Ok(IntegerData::Int32(s)),
            Self::Uint32(s) => Ok(IntegerData::Uint32(s)),
            other => Err(category_error(DataCategory::Integer, &other)),
        }
    }

    /// Narrows to a floating point buffer.
    pub fn into_float(self) -> Result<FloatData> {
        match self {
            Self::Float32(s) => Ok(FloatData::Float32(s)),
            Self::Float64(s) => Ok(FloatData::Float64(s)),
            other => Err(category_error(DataCategory::Float, &other)),
        }
    }

    /// Narrows to any non-string buffer.
    pub fn into_numeric(self) -> Result<NumericData> {
        match self {
            Self::Float32(_) | Self::Float64(_) => self.into_float().map(NumericData::Float),
            Self::String(_) => Err(category_error(DataCategory::Numeric, &self)),
            _ => self.into_integer().map(NumericData::Integer),
        }
    }
}

fn category_error(category: DataCategory, data: &TensorData) -> Error {
    Error::CategoryMismatch {
        category,
        actual: data.element_type(),
    }
}

macro_rules! impl_from_vec {
    ($ty:ty, $variant:ident) => {
        impl From<Vec<$ty>> for TensorData {
            fn from(data: Vec<$ty>) -> Self {
                Self::$variant(Storage::from_vec(data))
            }
        }
    };
}

impl_from_vec!(f32, Float32);
impl_from_vec!(f64, Float64);
impl_from_vec!(i8, Int8);
impl_from_vec!(u8, Uint8);
impl_from_vec!(i16, Int16);
impl_from_vec!(u16, Uint16);
impl_from_vec!(i32, Int32);
impl_from_vec!(u32, Uint32);
impl_from_vec!(String, String);

impl From<Vec<&str>> for TensorData {
    fn from(data: Vec<&str>) -> Self {
        Self::String(Storage::from_vec(data.into_iter().map(str::to_owned).collect()))
    }
}

// =============================================================================
// Category Views
// =============================================================================

fn widen<T: Scalar>(storage: &Storage<T>) -> Vec<f64> {
    storage.as_slice().iter().map(|&v| AsPrimitive::<f64>::as_(v)).collect()
}

/// A buffer known to hold bool or integer elements.
#[derive(Debug, Clone)]
pub enum IntegerData {
    /// Booleans, one byte each.
    Bool(Storage<u8>),
    /// 8-bit signed integers.
    Int8(Storage<i8>),
    /// 8-bit unsigned integers.
    Uint8(Storage<u8>),
    /// 16-bit signed integers.
    Int16(Storage<i16>),
    /// 16-bit unsigned integers.
    Uint16(Storage<u16>),
    /// 32-bit signed integers.
    Int32(Storage<i32>),
    /// 32-bit unsigned integers.
    Uint32(Storage<u32>),
}

impl IntegerData {
    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(s) | Self::Uint8(s) => s.len(),
            Self::Int8(s) => s.len(),
            Self::Int16(s) => s.len(),
            Self::Uint16(s) => s.len(),
            Self::Int32(s) => s.len(),
            Self::Uint32(s) => s.len(),
        }
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the elements out, widened to `i64`.
    #[must_use]
    pub fn to_i64_vec(&self) -> Vec<i64> {
        fn collect<T: Scalar + Into<i64>>(storage: &Storage<T>) -> Vec<i64> {
            storage.as_slice().iter().map(|&v| v.into()).collect()
        }

        match self {
            Self::Bool(s) | Self::Uint8(s) => collect(s),
            Self::Int8(s) => collect(s),
            Self::Int16(s) => collect(s),
            Self::Uint16(s) => collect(s),
            Self::Int32(s) => collect(s),
            Self::Uint32(s) => collect(s),
        }
    }

    /// Copies the elements out, widened to `f64`.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Bool(s) | Self::Uint8(s) => widen(s),
            Self::Int8(s) => widen(s),
            Self::Int16(s) => widen(s),
            Self::Uint16(s) => widen(s),
            Self::Int32(s) => widen(s),
            Self::Uint32(s) => widen(s),
        }
    }
}

/// A buffer known to hold floating point elements.
#[derive(Debug, Clone)]
pub enum FloatData {
    /// 32-bit floats.
    Float32(Storage<f32>),
    /// 64-bit floats.
    Float64(Storage<f64>),
}

impl FloatData {
    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float32(s) => s.len(),
            Self::Float64(s) => s.len(),
        }
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the elements out, widened to `f64`.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Float32(s) => widen(s),
            Self::Float64(s) => widen(s),
        }
    }
}

/// A buffer known to hold any non-string elements.
#[derive(Debug, Clone)]
pub enum NumericData {
    /// Bool or integer elements.
    Integer(IntegerData),
    /// Floating point elements.
    Float(FloatData),
}

impl NumericData {
    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(d) => d.len(),
            Self::Float(d) => d.len(),
        }
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the elements out, widened to `f64`.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Integer(d) => d.to_f64_vec(),
            Self::Float(d) => d.to_f64_vec(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_matches_type() {
        for ty in ElementType::ALL {
            let data = TensorData::zeros(ty, 5);
            assert_eq!(data.element_type(), ty);
            assert_eq!(data.len(), 5);
        }

        let strings = TensorData::zeros(ElementType::String, 2).into_strings().unwrap();
        assert_eq!(strings.to_vec(), vec![String::new(), String::new()]);
    }

    #[test]
    fn test_validate() {
        let data = TensorData::from(vec![1.0_f32, 2.0, 3.0]);
        assert!(data.validate(ElementType::Float32, 3).is_ok());
        assert_eq!(
            data.validate(ElementType::Float32, 4),
            Err(Error::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            data.validate(ElementType::Float64, 3),
            Err(Error::TypeMismatch {
                expected: ElementType::Float64,
                actual: ElementType::Float32
            })
        );
    }

    #[test]
    fn test_uint8_buffer_does_not_back_bool() {
        let data = TensorData::from(vec![1u8, 0]);
        assert!(data.validate(ElementType::Bool, 2).is_err());
        assert!(TensorData::from_bools(&[true, false]).validate(ElementType::Bool, 2).is_ok());
    }

    #[test]
    fn test_category_narrowing() {
        let ints = TensorData::from(vec![-1i16, 2]).into_integer().unwrap();
        assert_eq!(ints.to_i64_vec(), vec![-1, 2]);

        let floats = TensorData::from(vec![0.5_f64]).into_float().unwrap();
        assert_eq!(floats.to_f64_vec(), vec![0.5]);

        let err = TensorData::from(vec!["a"]).into_numeric().unwrap_err();
        assert_eq!(
            err,
            Error::CategoryMismatch {
                category: DataCategory::Numeric,
                actual: ElementType::String
            }
        );

        let numeric = TensorData::from_bools(&[true, false]).into_numeric().unwrap();
        assert_eq!(numeric.to_f64_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_ptr_eq_and_deep_copy() {
        let data = TensorData::from(vec![1u32, 2]);
        let alias = data.clone();
        let copy = data.deep_copy();
        assert!(data.ptr_eq(&alias));
        assert!(!data.ptr_eq(&copy));
        assert!(!TensorData::zeros(ElementType::Bool, 1).ptr_eq(&TensorData::zeros(ElementType::Uint8, 1)));
    }
}
