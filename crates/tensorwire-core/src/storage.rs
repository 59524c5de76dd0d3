//! Storage - Shared Buffers for Tensor Data
//!
//! Provides the reference-counted buffer that underlies every tensor. Cloning
//! a `Storage` handle aliases the same buffer, which is how external arrays
//! and tensors share memory without copying.
//!
//! # Key Features
//! - Reference-counted memory shared between handles
//! - Read and write guards over a `parking_lot` lock
//! - Explicit deep copies when sharing is not wanted
//!
//! # Example
//! ```rust
//! use tensorwire_core::Storage;
//!
//! let storage = Storage::<f32>::zeros(100);
//! assert_eq!(storage.len(), 100);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dtype::Element;

// =============================================================================
// Storage Struct
// =============================================================================

/// Shared, mutable storage for tensor elements.
///
/// Aliasing handles are not synchronized beyond the lock taken by each
/// guard: two holders can interleave writes freely.
#[derive(Debug)]
pub struct Storage<T: Element> {
    inner: Arc<RwLock<Vec<T>>>,
    len: usize,
}

impl<T: Element> Storage<T> {
    /// Creates storage of `len` default values (zero for numbers, empty
    /// text for strings).
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![T::default(); len])
    }

    /// Creates storage that takes ownership of a vector.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        let len = data.len();
        Self {
            inner: Arc::new(RwLock::new(data)),
            len,
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the storage is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if both handles share the same buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a read guard over the elements.
    #[must_use]
    pub fn as_slice(&self) -> StorageReadGuard<'_, T> {
        StorageReadGuard {
            guard: self.inner.read(),
        }
    }

    /// Returns a write guard over the elements.
    #[must_use]
    pub fn as_slice_mut(&self) -> StorageWriteGuard<'_, T> {
        StorageWriteGuard {
            guard: self.inner.write(),
        }
    }

    /// Copies the elements out into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Makes a deep copy of this storage.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self::from_vec(self.to_vec())
    }
}

impl<T: Element> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            len: self.len,
        }
    }
}

impl<T: Element> From<Vec<T>> for Storage<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

// =============================================================================
// Guard Types for Safe Access
// =============================================================================

/// Read guard for storage data.
pub struct StorageReadGuard<'a, T: Element> {
    guard: parking_lot::RwLockReadGuard<'a, Vec<T>>,
}

impl<T: Element> Deref for StorageReadGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Write guard for storage data.
pub struct StorageWriteGuard<'a, T: Element> {
    guard: parking_lot::RwLockWriteGuard<'a, Vec<T>>,
}

impl<T: Element> Deref for StorageWriteGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T: Element> DerefMut for StorageWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_zeros() {
        let storage = Storage::<f32>::zeros(10);
        assert_eq!(storage.len(), 10);
        assert!(!storage.is_empty());
        assert!(storage.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_string_storage_defaults_to_empty_text() {
        let storage = Storage::<String>::zeros(3);
        assert_eq!(storage.to_vec(), vec![String::new(); 3]);
    }

    #[test]
    fn test_storage_clone_shares() {
        let storage1 = Storage::<i32>::zeros(4);
        let storage2 = storage1.clone();

        assert!(storage1.ptr_eq(&storage2));

        storage2.as_slice_mut()[2] = 7;
        assert_eq!(storage1.as_slice()[2], 7);
    }

    #[test]
    fn test_storage_deep_copy() {
        let storage1 = Storage::from_vec(vec![1.0_f64, 2.0, 3.0]);
        let storage2 = storage1.deep_copy();

        assert!(!storage1.ptr_eq(&storage2));

        storage2.as_slice_mut()[0] = 99.0;
        assert_eq!(storage1.as_slice()[0], 1.0);
        assert_eq!(storage2.to_vec(), vec![99.0, 2.0, 3.0]);
    }
}
