//! Wire Encoding - Tensor to TensorProto
//!
//! Writes tensors back out as `TensorProto` messages: numeric tensors as
//! little-endian `raw_data`, string tensors as `string_data`. Decoding the
//! result reproduces the tensor.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use prost::Message;
use tracing::debug;

use tensorwire_core::buffer::TensorData;
use tensorwire_tensor::Tensor;

use crate::error::OnnxResult;
use crate::proto::{TensorDataType, TensorProto};

// =============================================================================
// Encoding
// =============================================================================

/// Converts a tensor into a wire message, materializing it if needed.
pub fn tensor_to_proto(name: &str, tensor: &Tensor) -> OnnxResult<TensorProto> {
    let dims: Vec<i64> = tensor.shape().iter().map(|&d| d as i64).collect();
    let data_type = TensorDataType::from_element_type(tensor.element_type());

    let proto = match tensor.data()? {
        TensorData::String(values) => TensorProto::strings(name, &dims, &values.to_vec()),
        numeric => TensorProto::raw(name, &dims, data_type, little_endian_bytes(&numeric)),
    };

    debug!(name, id = %tensor.id(), ?data_type, "encoded tensor");
    Ok(proto)
}

/// Serializes a tensor as binary protobuf.
pub fn encode_tensor_bytes(name: &str, tensor: &Tensor) -> OnnxResult<Vec<u8>> {
    Ok(tensor_to_proto(name, tensor)?.encode_to_vec())
}

fn little_endian_bytes(data: &TensorData) -> Vec<u8> {
    match data {
        TensorData::Bool(values) | TensorData::Uint8(values) => values.to_vec(),
        TensorData::Int8(values) => write_le(&*values.as_slice(), i8::to_le_bytes),
        TensorData::Int16(values) => write_le(&*values.as_slice(), i16::to_le_bytes),
        TensorData::Uint16(values) => write_le(&*values.as_slice(), u16::to_le_bytes),
        TensorData::Int32(values) => write_le(&*values.as_slice(), i32::to_le_bytes),
        TensorData::Uint32(values) => write_le(&*values.as_slice(), u32::to_le_bytes),
        TensorData::Float32(values) => write_le(&*values.as_slice(), f32::to_le_bytes),
        TensorData::Float64(values) => write_le(&*values.as_slice(), f64::to_le_bytes),
        TensorData::String(_) => Vec::new(),
    }
}

fn write_le<T: Copy, const N: usize>(values: &[T], to_le: fn(T) -> [u8; N]) -> Vec<u8> {
    values.iter().flat_map(|&v| to_le(v)).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tensorwire_core::dtype::ElementType;

    #[test]
    fn test_numeric_tensor_uses_raw_data() {
        let t = Tensor::from_raw_buffer(vec![1i16, -1].into(), &[2], ElementType::Int16).unwrap();
        let proto = tensor_to_proto("x", &t).unwrap();

        assert_eq!(proto.name, "x");
        assert_eq!(proto.dims, vec![2]);
        assert_eq!(proto.data_type, TensorDataType::Int16 as i32);
        assert_eq!(proto.raw_data, vec![0x01, 0x00, 0xff, 0xff]);
        assert!(proto.int32_data.is_empty());
    }

    #[test]
    fn test_string_tensor_uses_string_data() {
        let t =
            Tensor::from_raw_buffer(vec!["hi", ""].into(), &[2, 1], ElementType::String).unwrap();
        let proto = tensor_to_proto("s", &t).unwrap();

        assert_eq!(proto.string_data, vec![b"hi".to_vec(), Vec::new()]);
        assert!(proto.raw_data.is_empty());
    }

    #[test]
    fn test_bool_tensor_encodes_bytes() {
        let data = TensorData::from_bools(&[true, false, true]);
        let t = Tensor::from_raw_buffer(data, &[3], ElementType::Bool).unwrap();
        let proto = tensor_to_proto("b", &t).unwrap();
        assert_eq!(proto.data_type, TensorDataType::Bool as i32);
        assert_eq!(proto.raw_data, vec![1, 0, 1]);
    }
}
