//! Tensorwire ONNX - TensorProto Decoding and Encoding
//!
//! This crate converts ONNX `TensorProto` messages into validated tensorwire
//! tensors and back. Messages can be supplied as parsed structs, binary
//! protobuf bytes, or JSON.
//!
//! # Features
//! - String, raw-byte and typed-list payload strategies
//! - Strict narrowing of 64-bit integer payloads to 32 bits
//! - Optional element count limit via `DecodeOptions`
//! - Little-endian `raw_data` encoding for round trips
//!
//! # Example
//! ```rust
//! use tensorwire_onnx::{decode_tensor, TensorProto};
//!
//! let proto = TensorProto::float("weights", &[2, 2], vec![1.0, 2.0, 3.0, 4.0]);
//! let tensor = decode_tensor(&proto).unwrap();
//! assert_eq!(tensor.shape(), &[2, 2]);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod decode;
pub mod encode;
pub mod error;
pub mod proto;

pub use decode::{
    decode_tensor, decode_tensor_bytes, decode_tensor_bytes_with, decode_tensor_with,
    dims_from_wire, from_wire_tensor, narrow_i64, narrow_u64, parse_tensor_proto, DecodeOptions,
};
pub use encode::{encode_tensor_bytes, tensor_to_proto};
pub use error::{OnnxError, OnnxResult};
pub use proto::{TensorDataType, TensorProto};
