//! ONNX Protocol Buffer Definitions
//!
//! The ONNX `TensorProto` message and its data type codes. The message
//! derives `prost::Message` with the field tags of `onnx.proto`, so it reads
//! and writes the binary format directly; it also derives serde for the JSON
//! form used in fixtures and configuration.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use serde::{Deserialize, Serialize};

use tensorwire_core::dtype::ElementType;

// =============================================================================
// Data Types
// =============================================================================

/// ONNX tensor element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TensorDataType {
    /// Undefined type.
    Undefined = 0,
    /// 32-bit float.
    Float = 1,
    /// 8-bit unsigned int.
    Uint8 = 2,
    /// 8-bit signed int.
    Int8 = 3,
    /// 16-bit unsigned int.
    Uint16 = 4,
    /// 16-bit signed int.
    Int16 = 5,
    /// 32-bit signed int.
    Int32 = 6,
    /// 64-bit signed int.
    Int64 = 7,
    /// String type.
    String = 8,
    /// Boolean type.
    Bool = 9,
    /// 16-bit float (half precision).
    Float16 = 10,
    /// 64-bit float (double).
    Double = 11,
    /// 32-bit unsigned int.
    Uint32 = 12,
    /// 64-bit unsigned int.
    Uint64 = 13,
    /// Complex 64-bit float.
    Complex64 = 14,
    /// Complex 128-bit float.
    Complex128 = 15,
    /// BFloat16.
    Bfloat16 = 16,
    /// 8-bit float, e4m3 finite-only.
    Float8E4m3fn = 17,
    /// 8-bit float, e4m3 finite-only without negative zero.
    Float8E4m3fnuz = 18,
    /// 8-bit float, e5m2.
    Float8E5m2 = 19,
    /// 8-bit float, e5m2 finite-only without negative zero.
    Float8E5m2fnuz = 20,
    /// Packed 4-bit unsigned int.
    Uint4 = 21,
    /// Packed 4-bit signed int.
    Int4 = 22,
}

impl TensorDataType {
    /// Returns the size in bytes of one element in `raw_data`.
    ///
    /// Zero for `Undefined`, `String` and the packed 4-bit types.
    pub fn size_bytes(&self) -> usize {
        match self {
            TensorDataType::Undefined | TensorDataType::String => 0,
            TensorDataType::Uint4 | TensorDataType::Int4 => 0,
            TensorDataType::Bool
            | TensorDataType::Int8
            | TensorDataType::Uint8
            | TensorDataType::Float8E4m3fn
            | TensorDataType::Float8E4m3fnuz
            | TensorDataType::Float8E5m2
            | TensorDataType::Float8E5m2fnuz => 1,
            TensorDataType::Float16
            | TensorDataType::Bfloat16
            | TensorDataType::Int16
            | TensorDataType::Uint16 => 2,
            TensorDataType::Float | TensorDataType::Int32 | TensorDataType::Uint32 => 4,
            TensorDataType::Double
            | TensorDataType::Int64
            | TensorDataType::Uint64
            | TensorDataType::Complex64 => 8,
            TensorDataType::Complex128 => 16,
        }
    }

    /// Creates from i32 value.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(TensorDataType::Undefined),
            1 => Some(TensorDataType::Float),
            2 => Some(TensorDataType::Uint8),
            3 => Some(TensorDataType::Int8),
            4 => Some(TensorDataType::Uint16),
            5 => Some(TensorDataType::Int16),
            6 => Some(TensorDataType::Int32),
            7 => Some(TensorDataType::Int64),
            8 => Some(TensorDataType::String),
            9 => Some(TensorDataType::Bool),
            10 => Some(TensorDataType::Float16),
            11 => Some(TensorDataType::Double),
            12 => Some(TensorDataType::Uint32),
            13 => Some(TensorDataType::Uint64),
            14 => Some(TensorDataType::Complex64),
            15 => Some(TensorDataType::Complex128),
            16 => Some(TensorDataType::Bfloat16),
            17 => Some(TensorDataType::Float8E4m3fn),
            18 => Some(TensorDataType::Float8E4m3fnuz),
            19 => Some(TensorDataType::Float8E5m2),
            20 => Some(TensorDataType::Float8E5m2fnuz),
            21 => Some(TensorDataType::Uint4),
            22 => Some(TensorDataType::Int4),
            _ => None,
        }
    }

    /// Returns the element type a tensor of this wire type decodes into.
    ///
    /// `Int64` narrows to `Int32` and `Uint64` to `Uint32`; types with no
    /// counterpart return `None`.
    pub fn element_type(&self) -> Option<ElementType> {
        match self {
            TensorDataType::Float => Some(ElementType::Float32),
            TensorDataType::Uint8 => Some(ElementType::Uint8),
            TensorDataType::Int8 => Some(ElementType::Int8),
            TensorDataType::Uint16 => Some(ElementType::Uint16),
            TensorDataType::Int16 => Some(ElementType::Int16),
            TensorDataType::Int32 | TensorDataType::Int64 => Some(ElementType::Int32),
            TensorDataType::String => Some(ElementType::String),
            TensorDataType::Bool => Some(ElementType::Bool),
            TensorDataType::Double => Some(ElementType::Float64),
            TensorDataType::Uint32 | TensorDataType::Uint64 => Some(ElementType::Uint32),
            _ => None,
        }
    }

    /// Returns the wire type used when encoding an element type.
    pub fn from_element_type(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Bool => TensorDataType::Bool,
            ElementType::Float32 => TensorDataType::Float,
            ElementType::Float64 => TensorDataType::Double,
            ElementType::Int8 => TensorDataType::Int8,
            ElementType::Uint8 => TensorDataType::Uint8,
            ElementType::Int16 => TensorDataType::Int16,
            ElementType::Uint16 => TensorDataType::Uint16,
            ElementType::Int32 => TensorDataType::Int32,
            ElementType::Uint32 => TensorDataType::Uint32,
            ElementType::String => TensorDataType::String,
        }
    }
}

// =============================================================================
// Tensor
// =============================================================================

/// A serialized tensor (initializer, constant or I/O value).
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct TensorProto {
    /// Dimensions (shape).
    #[prost(int64, repeated, tag = "1")]
    pub dims: Vec<i64>,
    /// Data type code.
    #[prost(int32, tag = "2")]
    pub data_type: i32,
    /// Float data (if not using raw_data).
    #[prost(float, repeated, tag = "4")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub float_data: Vec<f32>,
    /// Int32 data; also carries bool, int8, uint8, int16 and uint16.
    #[prost(int32, repeated, tag = "5")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub int32_data: Vec<i32>,
    /// String data, one byte string per element.
    #[prost(bytes = "vec", repeated, tag = "6")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub string_data: Vec<Vec<u8>>,
    /// Int64 data.
    #[prost(int64, repeated, tag = "7")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub int64_data: Vec<i64>,
    /// Name of the tensor.
    #[prost(string, tag = "8")]
    pub name: String,
    /// Raw little-endian data bytes.
    #[prost(bytes = "vec", tag = "9")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub raw_data: Vec<u8>,
    /// Double data.
    #[prost(double, repeated, tag = "10")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub double_data: Vec<f64>,
    /// Uint64 data; also carries uint32.
    #[prost(uint64, repeated, tag = "11")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uint64_data: Vec<u64>,
    /// Documentation string.
    #[prost(string, tag = "12")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc_string: String,
}

impl TensorProto {
    /// Creates a tensor with no payload.
    pub fn new(name: &str, dims: &[i64], data_type: TensorDataType) -> Self {
        Self {
            name: name.to_string(),
            dims: dims.to_vec(),
            data_type: data_type as i32,
            ..Self::default()
        }
    }

    /// Creates a new float tensor.
    pub fn float(name: &str, dims: &[i64], data: Vec<f32>) -> Self {
        Self {
            float_data: data,
            ..Self::new(name, dims, TensorDataType::Float)
        }
    }

    /// Creates a new double tensor.
    pub fn double(name: &str, dims: &[i64], data: Vec<f64>) -> Self {
        Self {
            double_data: data,
            ..Self::new(name, dims, TensorDataType::Double)
        }
    }

    /// Creates a tensor whose values travel in `int32_data`.
    pub fn int32(name: &str, dims: &[i64], data_type: TensorDataType, data: Vec<i32>) -> Self {
        Self {
            int32_data: data,
            ..Self::new(name, dims, data_type)
        }
    }

    /// Creates a new int64 tensor.
    pub fn int64(name: &str, dims: &[i64], data: Vec<i64>) -> Self {
        Self {
            int64_data: data,
            ..Self::new(name, dims, TensorDataType::Int64)
        }
    }

    /// Creates a tensor whose values travel in `uint64_data`.
    pub fn uint64(name: &str, dims: &[i64], data_type: TensorDataType, data: Vec<u64>) -> Self {
        Self {
            uint64_data: data,
            ..Self::new(name, dims, data_type)
        }
    }

    /// Creates a new string tensor.
    pub fn strings<S: AsRef<str>>(name: &str, dims: &[i64], data: &[S]) -> Self {
        Self {
            string_data: data.iter().map(|s| s.as_ref().as_bytes().to_vec()).collect(),
            ..Self::new(name, dims, TensorDataType::String)
        }
    }

    /// Creates a tensor from raw little-endian bytes.
    pub fn raw(name: &str, dims: &[i64], data_type: TensorDataType, bytes: Vec<u8>) -> Self {
        Self {
            raw_data: bytes,
            ..Self::new(name, dims, data_type)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_data_type_codes() {
        for code in 0..=22 {
            let ty = TensorDataType::from_i32(code).unwrap();
            assert_eq!(ty as i32, code);
        }
        assert_eq!(TensorDataType::from_i32(23), None);
        assert_eq!(TensorDataType::from_i32(-1), None);
    }

    #[test]
    fn test_element_type_mapping() {
        assert_eq!(
            TensorDataType::Int64.element_type(),
            Some(ElementType::Int32)
        );
        assert_eq!(
            TensorDataType::Uint64.element_type(),
            Some(ElementType::Uint32)
        );
        assert_eq!(TensorDataType::Float16.element_type(), None);
        assert_eq!(TensorDataType::Int4.element_type(), None);

        for ty in ElementType::ALL {
            let wire = TensorDataType::from_element_type(ty);
            assert_eq!(wire.element_type(), Some(ty));
        }
    }

    #[test]
    fn test_size_bytes() {
        assert_eq!(TensorDataType::Bool.size_bytes(), 1);
        assert_eq!(TensorDataType::Uint16.size_bytes(), 2);
        assert_eq!(TensorDataType::Float.size_bytes(), 4);
        assert_eq!(TensorDataType::Int64.size_bytes(), 8);
        assert_eq!(TensorDataType::String.size_bytes(), 0);
    }

    #[test]
    fn test_protobuf_field_tags() {
        let proto = TensorProto::float("w", &[2], vec![1.0, 2.0]);
        let bytes = proto.encode_to_vec();

        // dims: field 1, packed.
        assert_eq!(bytes[0], 0x0a);
        assert_eq!(TensorProto::decode(bytes.as_slice()).unwrap(), proto);
    }

    #[test]
    fn test_json_defaults() {
        let proto: TensorProto =
            serde_json::from_str(r#"{"dims":[3],"data_type":7,"int64_data":[1,2,3]}"#).unwrap();
        assert_eq!(proto.data_type, TensorDataType::Int64 as i32);
        assert!(proto.raw_data.is_empty());
        assert!(proto.name.is_empty());
    }
}
