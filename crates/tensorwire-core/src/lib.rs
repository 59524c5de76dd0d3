//! Tensorwire Core - Foundation Layer for Tensorwire
//!
//! This crate provides the closed element type system, the shared storage
//! behind every tensor buffer, and the error types used across the
//! workspace.
//!
//! # Key Features
//! - Ten element types with fixed byte widths (strings excepted)
//! - One buffer kind per element type via `TensorData`
//! - Reference-counted storage that can be aliased or deep-copied
//! - Unified error type with a coarse `ErrorKind`
//!
//! # Example
//! ```rust
//! use tensorwire_core::{ElementType, TensorData};
//!
//! let data = TensorData::zeros(ElementType::Int16, 8);
//! assert_eq!(data.len(), 8);
//! assert_eq!(ElementType::Int16.size_of(), Some(2));
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
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::return_self_not_must_use)]

// =============================================================================
// Modules
// =============================================================================

pub mod buffer;
pub mod dtype;
pub mod error;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use buffer::{FloatData, IntegerData, NumericData, TensorData};
pub use dtype::{DataCategory, Element, ElementType, Scalar};
pub use error::{Error, ErrorKind, Result};
pub use storage::Storage;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::buffer::{FloatData, IntegerData, NumericData, TensorData};
    pub use crate::dtype::{DataCategory, ElementType, Scalar};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::storage::Storage;
}
