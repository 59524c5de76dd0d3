//! ONNX Error Types
//!
//! Error types for decoding and encoding wire tensors.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

use tensorwire_core::error::{Error as TensorError, ErrorKind};

use crate::proto::TensorDataType;

/// Result type for ONNX operations.
pub type OnnxResult<T> = Result<T, OnnxError>;

/// Errors that can occur while converting wire tensors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OnnxError {
    /// Shape, type or length error raised by tensor construction.
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// Failed to parse the serialized message.
    #[error("Failed to parse ONNX protobuf: {0}")]
    ProtobufParse(String),

    /// No wire tensor was supplied.
    #[error("Missing tensor message")]
    MissingTensor,

    /// The data type code is not an ONNX tensor type.
    #[error("Invalid tensor data type: {0}")]
    InvalidDataType(i32),

    /// The data type is valid ONNX but has no counterpart element type.
    #[error("Unsupported tensor data type: {0:?}")]
    UnsupportedDataType(TensorDataType),

    /// `raw_data` is not a whole number of elements.
    #[error("raw_data length {len} is not a multiple of element width {width}")]
    RawDataLength {
        /// Byte length of `raw_data`.
        len: usize,
        /// Wire width of one element.
        width: usize,
    },

    /// The payload holds a different number of elements than the shape.
    #[error("Element count mismatch: shape has {expected}, payload has {actual}")]
    ElementCount {
        /// Element count implied by the dims.
        expected: usize,
        /// Element count present in the payload.
        actual: usize,
    },

    /// The field the data type requires is empty.
    #[error("Missing tensor data: {field} is empty")]
    MissingData {
        /// Name of the expected wire field.
        field: &'static str,
    },

    /// A `string_data` entry is not valid UTF-8.
    #[error("Invalid UTF-8 in string_data[{index}]: {message}")]
    InvalidString {
        /// Index of the offending entry.
        index: usize,
        /// Decoder message.
        message: String,
    },

    /// A wire value does not fit the target element type.
    #[error("Value too large to represent: {value} as {target}")]
    ValueTooLarge {
        /// Offending value.
        value: i128,
        /// Name of the target element type.
        target: &'static str,
    },

    /// The declared element count exceeds the configured limit.
    #[error("Tensor has {count} elements, limit is {limit}")]
    TooManyElements {
        /// Declared element count.
        count: usize,
        /// Configured limit.
        limit: usize,
    },
}

impl OnnxError {
    /// Returns the coarse category of the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Tensor(err) => err.kind(),
            Self::ProtobufParse(_)
            | Self::MissingTensor
            | Self::RawDataLength { .. }
            | Self::MissingData { .. }
            | Self::InvalidString { .. } => ErrorKind::Format,
            Self::InvalidDataType(_) | Self::UnsupportedDataType(_) => ErrorKind::Type,
            Self::ElementCount { .. } | Self::TooManyElements { .. } => ErrorKind::Length,
            Self::ValueTooLarge { .. } => ErrorKind::Overflow,
        }
    }
}

impl From<prost::DecodeError> for OnnxError {
    fn from(err: prost::DecodeError) -> Self {
        OnnxError::ProtobufParse(err.to_string())
    }
}

impl From<serde_json::Error> for OnnxError {
    fn from(err: serde_json::Error) -> Self {
        OnnxError::ProtobufParse(format!("JSON parse error: {err}"))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(OnnxError::MissingTensor.kind(), ErrorKind::Format);
        assert_eq!(OnnxError::InvalidDataType(99).kind(), ErrorKind::Type);
        assert_eq!(
            OnnxError::ValueTooLarge {
                value: 1 << 40,
                target: "int32"
            }
            .kind(),
            ErrorKind::Overflow
        );
        assert_eq!(
            OnnxError::from(TensorError::ScalarNotSupported).kind(),
            ErrorKind::Shape
        );
    }

    #[test]
    fn test_error_messages() {
        let err = OnnxError::ValueTooLarge {
            value: 2_147_483_648,
            target: "int32",
        };
        assert!(err.to_string().starts_with("Value too large to represent"));

        let err = OnnxError::from(TensorError::ScalarNotSupported);
        assert_eq!(err.to_string(), TensorError::ScalarNotSupported.to_string());
    }
}
