//! Error Types - Tensorwire Core Error Handling
//!
//! Provides the error type shared by every tensorwire crate, together with a
//! coarse `ErrorKind` classification that callers can branch on without
//! matching individual variants.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

use crate::dtype::{DataCategory, ElementType};

// =============================================================================
// Error Kinds
// =============================================================================

/// Coarse classification of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rank, dimension or element-count violation.
    Shape,
    /// Buffer kind or accessor category does not match the element type.
    Type,
    /// Buffer or decoded length differs from the declared size.
    Length,
    /// Malformed wire payload.
    Format,
    /// A value does not fit its narrow destination type.
    Overflow,
    /// The operation is declared but not supported.
    NotImplemented,
    /// Anything else.
    Internal,
}

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for tensorwire operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Rank outside the supported range.
    #[error("Invalid rank: {rank} (supported ranks are 1 to {max})")]
    InvalidRank {
        /// The offending rank.
        rank: usize,
        /// Maximum supported rank.
        max: usize,
    },

    /// Rank-0 tensors are rejected.
    #[error("Scalar (rank 0) tensors are not yet supported")]
    ScalarNotSupported,

    /// A dimension is not a mathematical integer.
    #[error("Dimension {index} is not an integer")]
    NonIntegerDimension {
        /// Position of the dimension.
        index: usize,
    },

    /// A dimension lies outside `(0, max]`.
    #[error("Dimension {index} has invalid size {value} (must be in 1..={max})")]
    DimensionOutOfRange {
        /// Position of the dimension.
        index: usize,
        /// The offending value.
        value: i64,
        /// Largest accepted dimension.
        max: i64,
    },

    /// The product of dimensions does not fit in `usize`.
    #[error("Element count of shape {shape:?} overflows")]
    ShapeOverflow {
        /// The shape whose size overflowed.
        shape: Vec<usize>,
    },

    /// A buffer's kind does not match the declared element type.
    #[error("Type mismatch: expected {expected} buffer, got {actual} buffer")]
    TypeMismatch {
        /// The declared element type.
        expected: ElementType,
        /// The runtime kind of the buffer.
        actual: ElementType,
    },

    /// A category accessor was used on an incompatible element type.
    #[error("Cannot access {category} data of a {actual} tensor")]
    CategoryMismatch {
        /// The requested category.
        category: DataCategory,
        /// The tensor's element type.
        actual: ElementType,
    },

    /// A buffer's length differs from the declared size.
    #[error("Length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// The declared size.
        expected: usize,
        /// The supplied length.
        actual: usize,
    },

    /// Declared but unsupported operation.
    #[error("Not implemented: {feature}")]
    NotImplemented {
        /// The unsupported feature.
        feature: &'static str,
    },

    /// A data producer was invoked again while it was still running.
    #[error("Re-entrant materialization of tensor data {id}")]
    ReentrantMaterialization {
        /// Identity token of the tensor.
        id: u64,
    },

    /// A data producer failed.
    #[error("Data producer failed: {message}")]
    ProducerFailed {
        /// Description supplied by the producer.
        message: String,
    },

    /// Invalid operation.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for tensorwire operations.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Helper Functions
// =============================================================================

impl Error {
    /// Creates a new invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates a new producer failure error.
    #[must_use]
    pub fn producer_failed(message: impl Into<String>) -> Self {
        Self::ProducerFailed {
            message: message.into(),
        }
    }

    /// Returns the coarse kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRank { .. }
            | Self::ScalarNotSupported
            | Self::NonIntegerDimension { .. }
            | Self::DimensionOutOfRange { .. }
            | Self::ShapeOverflow { .. } => ErrorKind::Shape,
            Self::TypeMismatch { .. } | Self::CategoryMismatch { .. } => ErrorKind::Type,
            Self::LengthMismatch { .. } => ErrorKind::Length,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
            Self::ReentrantMaterialization { .. }
            | Self::ProducerFailed { .. }
            | Self::InvalidOperation { .. } => ErrorKind::Internal,
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
    fn test_error_display() {
        let err = Error::LengthMismatch {
            expected: 6,
            actual: 4,
        };
        assert!(err.to_string().contains("expected 6"));

        let err = Error::CategoryMismatch {
            category: DataCategory::String,
            actual: ElementType::Float32,
        };
        assert_eq!(err.to_string(), "Cannot access string data of a float32 tensor");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::ScalarNotSupported.kind(), ErrorKind::Shape);
        assert_eq!(
            Error::TypeMismatch {
                expected: ElementType::Int8,
                actual: ElementType::Uint8,
            }
            .kind(),
            ErrorKind::Type
        );
        assert_eq!(
            Error::NotImplemented { feature: "x" }.kind(),
            ErrorKind::NotImplemented
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::ScalarNotSupported, Error::ScalarNotSupported);
        assert_ne!(
            Error::producer_failed("a"),
            Error::invalid_operation("a")
        );
    }
}
