//! Wire Decoding - TensorProto to Tensor
//!
//! Converts ONNX `TensorProto` messages into validated tensors. The payload
//! is read with one of three strategies, in priority order:
//!
//! 1. `string_data` for string tensors
//! 2. `raw_data` (little-endian bytes) when it is non-empty
//! 3. the typed list that matches the data type
//!
//! 64-bit integer payloads are narrowed to 32 bits; values that do not fit
//! are rejected, never wrapped. The whole buffer is decoded before the
//! tensor is built, so a failure leaves nothing half-populated.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use serde::{Deserialize, Serialize};
use tracing::debug;

use tensorwire_core::buffer::TensorData;
use tensorwire_core::dtype::ElementType;
use tensorwire_tensor::shape::{numel, validate_shape, Shape};
use tensorwire_tensor::Tensor;

use crate::error::{OnnxError, OnnxResult};
use crate::proto::{TensorDataType, TensorProto};

// =============================================================================
// Options
// =============================================================================

/// Decoder settings.
///
/// Deserializable with every field optional, so it can sit inside a host
/// application's configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Upper bound on the declared element count, checked before any
    /// buffer is allocated. `None` means unbounded.
    pub max_elements: Option<usize>,
}

impl DecodeOptions {
    /// Sets the element count limit.
    pub fn with_max_elements(mut self, limit: usize) -> Self {
        self.max_elements = Some(limit);
        self
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Decodes an optional wire tensor, failing when it is absent.
pub fn from_wire_tensor(proto: Option<&TensorProto>) -> OnnxResult<Tensor> {
    let proto = proto.ok_or(OnnxError::MissingTensor)?;
    decode_tensor(proto)
}

/// Decodes a wire tensor with default options.
pub fn decode_tensor(proto: &TensorProto) -> OnnxResult<Tensor> {
    decode_tensor_with(proto, &DecodeOptions::default())
}

/// Decodes a wire tensor.
pub fn decode_tensor_with(proto: &TensorProto, options: &DecodeOptions) -> OnnxResult<Tensor> {
    let wire_type = wire_data_type(proto.data_type)?;
    let element_type = wire_type
        .element_type()
        .ok_or(OnnxError::UnsupportedDataType(wire_type))?;

    let shape = dims_from_wire(&proto.dims)?;
    let size = numel(&shape);
    if let Some(limit) = options.max_elements {
        if size > limit {
            return Err(OnnxError::TooManyElements { count: size, limit });
        }
    }

    let data = if element_type == ElementType::String {
        debug!(name = %proto.name, size, "decoding string_data");
        decode_strings(&proto.string_data, size)?
    } else if !proto.raw_data.is_empty() {
        debug!(name = %proto.name, ?wire_type, bytes = proto.raw_data.len(), "decoding raw_data");
        decode_raw(wire_type, &proto.raw_data, size)?
    } else {
        debug!(name = %proto.name, ?wire_type, size, "decoding typed list");
        decode_typed(wire_type, proto, size)?
    };

    let tensor = Tensor::from_raw_buffer(data, shape.as_slice(), element_type)?;
    debug!(name = %proto.name, id = %tensor.id(), %element_type, shape = ?tensor.shape(), "decoded tensor");
    Ok(tensor)
}

/// Parses a serialized `TensorProto`: JSON when the input starts with `{`,
/// binary protobuf otherwise.
pub fn parse_tensor_proto(bytes: &[u8]) -> OnnxResult<TensorProto> {
    use prost::Message;

    if bytes.starts_with(b"{") {
        Ok(serde_json::from_slice(bytes)?)
    } else {
        Ok(TensorProto::decode(bytes)?)
    }
}

/// Parses and decodes a serialized tensor with default options.
pub fn decode_tensor_bytes(bytes: &[u8]) -> OnnxResult<Tensor> {
    decode_tensor_bytes_with(bytes, &DecodeOptions::default())
}

/// Parses and decodes a serialized tensor.
pub fn decode_tensor_bytes_with(bytes: &[u8], options: &DecodeOptions) -> OnnxResult<Tensor> {
    let proto = parse_tensor_proto(bytes)?;
    decode_tensor_with(&proto, options)
}

// =============================================================================
// Dims and Narrowing
// =============================================================================

/// Converts wire dims into a validated shape.
pub fn dims_from_wire(dims: &[i64]) -> OnnxResult<Shape> {
    Ok(validate_shape(dims)?)
}

/// Narrows an `INT64` wire value to `int32`.
pub fn narrow_i64(value: i64) -> OnnxResult<i32> {
    narrow(value, ElementType::Int32)
}

/// Narrows a `UINT64` (or `UINT32`) wire value to `uint32`.
pub fn narrow_u64(value: u64) -> OnnxResult<u32> {
    narrow(value, ElementType::Uint32)
}

fn narrow<S, T>(value: S, target: ElementType) -> OnnxResult<T>
where
    S: Copy + Into<i128>,
    T: TryFrom<S>,
{
    T::try_from(value).map_err(|_| OnnxError::ValueTooLarge {
        value: value.into(),
        target: target.name(),
    })
}

fn wire_data_type(code: i32) -> OnnxResult<TensorDataType> {
    match TensorDataType::from_i32(code) {
        Some(TensorDataType::Undefined) | None => Err(OnnxError::InvalidDataType(code)),
        Some(ty) => Ok(ty),
    }
}

// =============================================================================
// Strategies
// =============================================================================

fn decode_strings(values: &[Vec<u8>], size: usize) -> OnnxResult<TensorData> {
    let values = require_list(values, "string_data", size)?;
    let strings = values
        .iter()
        .enumerate()
        .map(|(index, bytes)| {
            String::from_utf8(bytes.clone()).map_err(|e| OnnxError::InvalidString {
                index,
                message: e.utf8_error().to_string(),
            })
        })
        .collect::<OnnxResult<Vec<String>>>()?;
    Ok(strings.into())
}

fn decode_raw(wire_type: TensorDataType, bytes: &[u8], size: usize) -> OnnxResult<TensorData> {
    let width = wire_type.size_bytes();
    if width == 0 || bytes.len() % width != 0 {
        return Err(OnnxError::RawDataLength {
            len: bytes.len(),
            width,
        });
    }
    let count = bytes.len() / width;
    if count != size {
        return Err(OnnxError::ElementCount {
            expected: size,
            actual: count,
        });
    }

    let data: TensorData = match wire_type {
        TensorDataType::Bool => bools(bytes.iter().map(|&b| b != 0)),
        TensorDataType::Uint8 => bytes.to_vec().into(),
        TensorDataType::Int8 => read_le(bytes, i8::from_le_bytes).into(),
        TensorDataType::Int16 => read_le(bytes, i16::from_le_bytes).into(),
        TensorDataType::Uint16 => read_le(bytes, u16::from_le_bytes).into(),
        TensorDataType::Int32 => read_le(bytes, i32::from_le_bytes).into(),
        TensorDataType::Uint32 => read_le(bytes, u32::from_le_bytes).into(),
        TensorDataType::Float => read_le(bytes, f32::from_le_bytes).into(),
        TensorDataType::Double => read_le(bytes, f64::from_le_bytes).into(),
        TensorDataType::Int64 => read_le(bytes, i64::from_le_bytes)
            .into_iter()
            .map(narrow_i64)
            .collect::<OnnxResult<Vec<i32>>>()?
            .into(),
        TensorDataType::Uint64 => read_le(bytes, u64::from_le_bytes)
            .into_iter()
            .map(narrow_u64)
            .collect::<OnnxResult<Vec<u32>>>()?
            .into(),
        other => return Err(OnnxError::UnsupportedDataType(other)),
    };
    Ok(data)
}

fn decode_typed(wire_type: TensorDataType, proto: &TensorProto, size: usize) -> OnnxResult<TensorData> {
    let data: TensorData = match wire_type {
        TensorDataType::Float => require_list(&proto.float_data, "float_data", size)?
            .to_vec()
            .into(),
        TensorDataType::Double => require_list(&proto.double_data, "double_data", size)?
            .to_vec()
            .into(),
        TensorDataType::Int32 => require_list(&proto.int32_data, "int32_data", size)?
            .to_vec()
            .into(),
        TensorDataType::Bool => {
            bools(require_list(&proto.int32_data, "int32_data", size)?.iter().map(|&v| v != 0))
        }
        TensorDataType::Int8 => narrow_int32_list::<i8>(proto, size, ElementType::Int8)?.into(),
        TensorDataType::Uint8 => narrow_int32_list::<u8>(proto, size, ElementType::Uint8)?.into(),
        TensorDataType::Int16 => narrow_int32_list::<i16>(proto, size, ElementType::Int16)?.into(),
        TensorDataType::Uint16 => {
            narrow_int32_list::<u16>(proto, size, ElementType::Uint16)?.into()
        }
        TensorDataType::Int64 => require_list(&proto.int64_data, "int64_data", size)?
            .iter()
            .map(|&v| narrow_i64(v))
            .collect::<OnnxResult<Vec<i32>>>()?
            .into(),
        TensorDataType::Uint32 | TensorDataType::Uint64 => {
            require_list(&proto.uint64_data, "uint64_data", size)?
                .iter()
                .map(|&v| narrow_u64(v))
                .collect::<OnnxResult<Vec<u32>>>()?
                .into()
        }
        other => return Err(OnnxError::UnsupportedDataType(other)),
    };
    Ok(data)
}

// =============================================================================
// Helpers
// =============================================================================

fn require_list<'a, T>(values: &'a [T], field: &'static str, size: usize) -> OnnxResult<&'a [T]> {
    if values.is_empty() {
        return Err(OnnxError::MissingData { field });
    }
    if values.len() != size {
        return Err(OnnxError::ElementCount {
            expected: size,
            actual: values.len(),
        });
    }
    Ok(values)
}

fn narrow_int32_list<T: TryFrom<i32>>(
    proto: &TensorProto,
    size: usize,
    target: ElementType,
) -> OnnxResult<Vec<T>> {
    require_list(&proto.int32_data, "int32_data", size)?
        .iter()
        .map(|&v| narrow(v, target))
        .collect()
}

fn bools(values: impl Iterator<Item = bool>) -> TensorData {
    TensorData::from_bools(&values.collect::<Vec<_>>())
}

/// Reads `N`-byte little-endian values; `bytes.len()` is a multiple of `N`.
fn read_le<const N: usize, T>(bytes: &[u8], from_le: fn([u8; N]) -> T) -> Vec<T> {
    bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut buf = [0u8; N];
            buf.copy_from_slice(chunk);
            from_le(buf)
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
