//! Data Types - Tensorwire Type System
//!
//! Defines the closed set of element types a tensor can hold, the data
//! categories used by typed accessors, and the traits implemented by the
//! Rust types backing each buffer kind.
//!
//! # Key Features
//! - Runtime element type information via `ElementType`
//! - Fixed byte widths for every non-string type
//! - Category membership (string, integer, float, numeric)
//! - `Scalar` trait mapping Rust types onto buffer kinds
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use num_traits::AsPrimitive;

use core::fmt::Debug;

use crate::buffer::TensorData;
use crate::storage::Storage;

// =============================================================================
// ElementType Enum
// =============================================================================

/// Runtime representation of tensor element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Boolean, stored as one byte per element.
    Bool,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// 8-bit signed integer.
    Int8,
    /// 8-bit unsigned integer.
    Uint8,
    /// 16-bit signed integer.
    Int16,
    /// 16-bit unsigned integer.
    Uint16,
    /// 32-bit signed integer.
    Int32,
    /// 32-bit unsigned integer.
    Uint32,
    /// UTF-8 text, one value per element.
    String,
}

impl ElementType {
    /// Every element type, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Bool,
        Self::Float32,
        Self::Float64,
        Self::Int8,
        Self::Uint8,
        Self::Int16,
        Self::Uint16,
        Self::Int32,
        Self::Uint32,
        Self::String,
    ];

    /// Returns the size in bytes of one element, or `None` for strings.
    #[must_use]
    pub const fn size_of(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Int8 | Self::Uint8 => Some(1),
            Self::Int16 | Self::Uint16 => Some(2),
            Self::Int32 | Self::Uint32 | Self::Float32 => Some(4),
            Self::Float64 => Some(8),
            Self::String => None,
        }
    }

    /// Returns true for `Float32` and `Float64`.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Returns true for bool and every integer type.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Int8
                | Self::Uint8
                | Self::Int16
                | Self::Uint16
                | Self::Int32
                | Self::Uint32
        )
    }

    /// Returns true for every type except `String`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::String)
    }

    /// Returns true if this type belongs to the given category.
    #[must_use]
    pub const fn belongs_to(self, category: DataCategory) -> bool {
        match category {
            DataCategory::String => matches!(self, Self::String),
            DataCategory::Integer => self.is_integer(),
            DataCategory::Float => self.is_float(),
            DataCategory::Numeric => self.is_numeric(),
        }
    }

    /// Returns the name of this element type as a string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::String => "string",
        }
    }
}

impl core::fmt::Display for ElementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// DataCategory
// =============================================================================

/// Groups of element types accepted by the typed data accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataCategory {
    /// Only `String`.
    String,
    /// Bool and all integer types.
    Integer,
    /// `Float32` and `Float64`.
    Float,
    /// Every non-string type.
    Numeric,
}

impl core::fmt::Display for DataCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Numeric => "numeric",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Element Trait
// =============================================================================

/// Trait for every Rust type that can live in a tensor buffer.
pub trait Element: Clone + Debug + Default + Send + Sync + 'static {}

impl Element for String {}

// =============================================================================
// Scalar Trait
// =============================================================================

/// Trait for the fixed-width types backing numeric buffers.
///
/// Each scalar has a natural element type. `u8` additionally backs `Bool`
/// buffers, so wrapping and unwrapping go through the declared type rather
/// than `DTYPE` alone.
pub trait Scalar: Element + Copy + AsPrimitive<f64> {
    /// The natural element type for this scalar.
    const DTYPE: ElementType;

    /// Returns the natural element type for this scalar.
    #[must_use]
    fn dtype() -> ElementType {
        Self::DTYPE
    }

    /// Wraps storage as the buffer kind of `element_type`, if this scalar
    /// backs that kind.
    fn wrap(storage: Storage<Self>, element_type: ElementType) -> Option<TensorData>;

    /// Borrows the storage out of `data` if it is backed by this scalar.
    fn unwrap(data: &TensorData) -> Option<&Storage<Self>>;
}

macro_rules! impl_scalar {
    ($ty:ty, $dtype:ident) => {
        impl Element for $ty {}

        impl Scalar for $ty {
            const DTYPE: ElementType = ElementType::$dtype;

            fn wrap(storage: Storage<Self>, element_type: ElementType) -> Option<TensorData> {
                match element_type {
                    ElementType::$dtype => Some(TensorData::$dtype(storage)),
                    _ => None,
                }
            }

            fn unwrap(data: &TensorData) -> Option<&Storage<Self>> {
                match data {
                    TensorData::$dtype(storage) => Some(storage),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar!(f32, Float32);
impl_scalar!(f64, Float64);
impl_scalar!(i8, Int8);
impl_scalar!(i16, Int16);
impl_scalar!(u16, Uint16);
impl_scalar!(i32, Int32);
impl_scalar!(u32, Uint32);

impl Element for u8 {}

impl Scalar for u8 {
    const DTYPE: ElementType = ElementType::Uint8;

    fn wrap(storage: Storage<Self>, element_type: ElementType) -> Option<TensorData> {
        match element_type {
            ElementType::Uint8 => Some(TensorData::Uint8(storage)),
            ElementType::Bool => Some(TensorData::Bool(storage)),
            _ => None,
        }
    }

    fn unwrap(data: &TensorData) -> Option<&Storage<Self>> {
        match data {
            TensorData::Uint8(storage) | TensorData::Bool(storage) => Some(storage),
            _ => None,
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
    fn test_element_type_size() {
        assert_eq!(ElementType::Bool.size_of(), Some(1));
        assert_eq!(ElementType::Int8.size_of(), Some(1));
        assert_eq!(ElementType::Uint8.size_of(), Some(1));
        assert_eq!(ElementType::Int16.size_of(), Some(2));
        assert_eq!(ElementType::Uint16.size_of(), Some(2));
        assert_eq!(ElementType::Int32.size_of(), Some(4));
        assert_eq!(ElementType::Uint32.size_of(), Some(4));
        assert_eq!(ElementType::Float32.size_of(), Some(4));
        assert_eq!(ElementType::Float64.size_of(), Some(8));
        assert_eq!(ElementType::String.size_of(), None);
    }

    #[test]
    fn test_categories() {
        assert!(ElementType::Int16.belongs_to(DataCategory::Integer));
        assert!(ElementType::Bool.belongs_to(DataCategory::Integer));
        assert!(!ElementType::Float32.belongs_to(DataCategory::Integer));
        assert!(ElementType::Float64.belongs_to(DataCategory::Float));
        assert!(!ElementType::String.belongs_to(DataCategory::Numeric));

        for ty in ElementType::ALL {
            assert_eq!(ty.is_numeric(), ty.size_of().is_some());
            assert_eq!(ty.is_numeric(), ty.is_integer() || ty.is_float());
        }
    }

    #[test]
    fn test_scalar_dtype() {
        assert_eq!(f32::dtype(), ElementType::Float32);
        assert_eq!(u8::dtype(), ElementType::Uint8);
        assert_eq!(u16::dtype(), ElementType::Uint16);
    }

    #[test]
    fn test_u8_backs_bool() {
        let storage = Storage::from_vec(vec![1u8, 0, 1]);
        let data = u8::wrap(storage, ElementType::Bool).unwrap();
        assert_eq!(data.element_type(), ElementType::Bool);
        assert!(u8::unwrap(&data).is_some());
        assert!(f32::wrap(Storage::from_vec(vec![1.0]), ElementType::Bool).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(ElementType::Uint32.to_string(), "uint32");
        assert_eq!(DataCategory::Numeric.to_string(), "numeric");
    }
}
