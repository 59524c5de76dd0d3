//! Tensorwire Tensor - Validated, Lazily Materialized Tensor Values
//!
//! This crate provides the `Tensor` type: a shape of rank 1 to 6, an element
//! type, and a data buffer that is either present or fetched on first read
//! from an external `DataProducer`. Tensors can also be built from, and
//! exposed as, external n-dimensional arrays.
//!
//! # Key Features
//! - Shape validation shared by every constructor
//! - At-most-once lazy materialization keyed by `DataId`
//! - Category accessors that check the element type before any fetch
//! - Copying or aliasing interop with external arrays (and `ndarray`)
//!
//! # Example
//! ```rust
//! use tensorwire_tensor::prelude::*;
//!
//! let t = Tensor::from_raw_buffer(vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0].into(), &[2, 3], ElementType::Float32)
//!     .unwrap();
//! assert_eq!(t.shape(), &[2, 3]);
//! assert_eq!(t.size(), 6);
//! assert_eq!(t.float_data().unwrap().to_f64_vec()[5], 6.0);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]

// =============================================================================
// Modules
// =============================================================================

pub mod external;
pub mod shape;
pub mod tensor;

// =============================================================================
// Re-exports
// =============================================================================

pub use tensorwire_core::{
    DataCategory, ElementType, Error, ErrorKind, FloatData, IntegerData, NumericData, Result,
    Scalar, Storage, TensorData,
};

pub use external::NdBuffer;
pub use shape::{numel, validate_shape, Dimension, Shape, MAX_DIMENSION, MAX_RANK};
pub use tensor::{DataId, DataProducer, Tensor, TensorSource};

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::external::NdBuffer;
    pub use crate::shape::{validate_shape, Shape};
    pub use crate::tensor::{DataId, DataProducer, Tensor, TensorSource};
    pub use tensorwire_core::prelude::*;
}
