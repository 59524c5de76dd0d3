//! Tensor - Validated Tensor Values
//!
//! The `Tensor` struct pairs an immutable shape and element type with data
//! that is either already materialized or still owned by an external data
//! producer. Materialization happens at most once: the first read invokes
//! the producer with the tensor's `DataId` and caches the result.
//!
//! # Key Features
//! - One validated constructor shared by every factory
//! - Lazy, at-most-once materialization through `DataProducer`
//! - Category accessors (string, integer, float, numeric)
//! - Opaque identity tokens for external data stores
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::cell::RefCell;
use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::ReentrantMutex;
use tracing::{trace, warn};

use tensorwire_core::buffer::{FloatData, IntegerData, NumericData, TensorData};
use tensorwire_core::dtype::{DataCategory, ElementType};
use tensorwire_core::error::{Error, Result};
use tensorwire_core::storage::Storage;

use crate::shape::{numel, validate_shape, Dimension, Shape};

// =============================================================================
// Identity Tokens
// =============================================================================

static DATA_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Opaque identity token of a tensor's data.
///
/// External data stores use it as a lookup key. It says nothing about the
/// tensor's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataId(u64);

impl DataId {
    /// Returns a fresh, process-unique identity token.
    #[must_use]
    pub fn next() -> Self {
        Self(DATA_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw token value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Data Producers
// =============================================================================

/// A one-shot source of tensor data registered by an external component.
///
/// The tensor only holds a handle and invokes `produce` at most once. The
/// returned buffer must have the tensor's size and buffer kind.
pub trait DataProducer: Send + Sync {
    /// Produces the data for the tensor identified by `id`.
    fn produce(&self, id: DataId) -> Result<TensorData>;
}

impl<F> DataProducer for F
where
    F: Fn(DataId) -> Result<TensorData> + Send + Sync,
{
    fn produce(&self, id: DataId) -> Result<TensorData> {
        self(id)
    }
}

/// Where a new tensor's data comes from.
#[derive(Clone, Default)]
pub enum TensorSource {
    /// Allocate a fresh zeroed (or empty-string) buffer.
    #[default]
    Empty,
    /// Use an existing buffer.
    Data(TensorData),
    /// Defer to a producer on first read.
    Producer(Arc<dyn DataProducer>),
}

impl fmt::Debug for TensorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Data(data) => f.debug_tuple("Data").field(data).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Materialization state.
enum DataState {
    Pending(Arc<dyn DataProducer>),
    Materializing,
    Resolved(TensorData),
    Failed(Error),
}

/// Marks the state failed if the producer unwinds mid-materialization.
struct MaterializeGuard<'a> {
    state: &'a RefCell<DataState>,
    id: DataId,
}

impl Drop for MaterializeGuard<'_> {
    fn drop(&mut self) {
        if matches!(*self.state.borrow(), DataState::Materializing) {
            warn!(id = %self.id, "tensor data producer panicked");
            self.state.replace(DataState::Failed(Error::producer_failed(
                "producer panicked during materialization",
            )));
        }
    }
}

// =============================================================================
// Tensor Struct
// =============================================================================

/// A typed, multi-dimensional tensor value.
///
/// Shape, element type and identity never change. The data buffer itself is
/// shared mutable storage: writes through a guard are visible to every
/// holder of the same buffer.
pub struct Tensor {
    shape: Shape,
    element_type: ElementType,
    id: DataId,
    state: ReentrantMutex<RefCell<DataState>>,
}

impl Tensor {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a tensor with a fresh identity token.
    ///
    /// # Arguments
    /// * `shape` - Dimensions, validated by `validate_shape`
    /// * `element_type` - Element type of every entry
    /// * `source` - Initial buffer, producer, or `Empty` to allocate
    pub fn new<D: Dimension>(
        shape: &[D],
        element_type: ElementType,
        source: TensorSource,
    ) -> Result<Self> {
        Self::new_with_id(DataId::next(), shape, element_type, source)
    }

    /// Creates a tensor with an identity token chosen by the caller, typically
    /// the key under which an external store registered its producer.
    pub fn new_with_id<D: Dimension>(
        id: DataId,
        shape: &[D],
        element_type: ElementType,
        source: TensorSource,
    ) -> Result<Self> {
        let shape = validate_shape(shape)?;
        let size = numel(&shape);

        let state = match source {
            TensorSource::Empty => DataState::Resolved(TensorData::zeros(element_type, size)),
            TensorSource::Data(data) => {
                data.validate(element_type, size)?;
                DataState::Resolved(data)
            }
            TensorSource::Producer(producer) => DataState::Pending(producer),
        };

        Ok(Self {
            shape,
            element_type,
            id,
            state: ReentrantMutex::new(RefCell::new(state)),
        })
    }

    /// Creates a zero-filled tensor (empty strings for `String`).
    pub fn empty<D: Dimension>(shape: &[D], element_type: ElementType) -> Result<Self> {
        Self::new(shape, element_type, TensorSource::Empty)
    }

    /// Creates a tensor whose data is fetched from `producer` on first read.
    pub fn from_producer<D: Dimension>(
        shape: &[D],
        element_type: ElementType,
        producer: Arc<dyn DataProducer>,
    ) -> Result<Self> {
        Self::new(shape, element_type, TensorSource::Producer(producer))
    }

    /// Creates a tensor directly from an already-typed buffer.
    ///
    /// Only the standard length and kind checks apply; the caller
    /// guarantees the contents are meaningful.
    pub fn from_raw_buffer<D: Dimension>(
        data: TensorData,
        shape: &[D],
        element_type: ElementType,
    ) -> Result<Self> {
        Self::new(shape, element_type, TensorSource::Data(data))
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the element type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Returns the identity token.
    #[must_use]
    pub const fn id(&self) -> DataId {
        self.id
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn size(&self) -> usize {
        numel(&self.shape)
    }

    /// Returns true once the data has been materialized.
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        let guard = self.state.lock();
        let state = guard.borrow();
        matches!(*state, DataState::Resolved(_))
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    /// Returns the tensor's buffer, materializing it on first call.
    ///
    /// The returned handle shares storage with the tensor. A producer is
    /// invoked at most once: its result, success or failure, is cached.
    pub fn data(&self) -> Result<TensorData> {
        let guard = self.state.lock();

        {
            let state = guard.borrow();
            match &*state {
                DataState::Resolved(data) => return Ok(data.clone()),
                DataState::Failed(err) => return Err(err.clone()),
                DataState::Materializing => {
                    return Err(Error::ReentrantMaterialization {
                        id: self.id.as_u64(),
                    })
                }
                DataState::Pending(_) => {}
            }
        }

        let previous = guard.replace(DataState::Materializing);
        let DataState::Pending(producer) = previous else {
            return Err(Error::invalid_operation("materialization state changed unexpectedly"));
        };

        let _unwind = MaterializeGuard {
            state: &guard,
            id: self.id,
        };
        trace!(id = %self.id, element_type = %self.element_type, "materializing tensor data");
        let result = producer
            .produce(self.id)
            .and_then(|data| data.validate(self.element_type, self.size()).map(|()| data));

        match result {
            Ok(data) => {
                guard.replace(DataState::Resolved(data.clone()));
                Ok(data)
            }
            Err(err) => {
                warn!(id = %self.id, error = %err, "tensor data producer failed");
                guard.replace(DataState::Failed(err.clone()));
                Err(err)
            }
        }
    }

    /// Asynchronous materialization hook for backend-resident data.
    ///
    /// Always fails with `Error::NotImplemented`.
    #[allow(clippy::unused_async)]
    pub async fn data_async(&self) -> Result<TensorData> {
        Err(Error::NotImplemented {
            feature: "asynchronous tensor data materialization",
        })
    }

    fn require(&self, category: DataCategory) -> Result<()> {
        if self.element_type.belongs_to(category) {
            Ok(())
        } else {
            Err(Error::CategoryMismatch {
                category,
                actual: self.element_type,
            })
        }
    }

    /// Returns the text buffer of a `String` tensor.
    pub fn string_data(&self) -> Result<Storage<String>> {
        self.require(DataCategory::String)?;
        self.data()?.into_strings()
    }

    /// Returns the buffer of a bool or integer tensor.
    pub fn integer_data(&self) -> Result<IntegerData> {
        self.require(DataCategory::Integer)?;
        self.data()?.into_integer()
    }

    /// Returns the buffer of a floating point tensor.
    pub fn float_data(&self) -> Result<FloatData> {
        self.require(DataCategory::Float)?;
        self.data()?.into_float()
    }

    /// Returns the buffer of any non-string tensor.
    pub fn numeric_data(&self) -> Result<NumericData> {
        self.require(DataCategory::Numeric)?;
        self.data()?.into_numeric()
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape.as_slice())
            .field("element_type", &self.element_type)
            .field("id", &self.id)
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tensorwire_core::error::ErrorKind;

    fn counting_producer(calls: Arc<AtomicUsize>) -> Arc<dyn DataProducer> {
        Arc::new(move |_id: DataId| -> Result<TensorData> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(TensorData::from(vec![1.0_f32, 2.0, 3.0, 4.0]))
        })
    }

    #[test]
    fn test_empty_tensor() {
        let t = Tensor::empty(&[2, 3], ElementType::Int32).unwrap();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.size(), 6);
        assert_eq!(t.rank(), 2);
        assert!(t.is_materialized());
        assert_eq!(t.integer_data().unwrap().to_i64_vec(), vec![0; 6]);

        let s = Tensor::empty(&[2], ElementType::String).unwrap();
        assert_eq!(s.string_data().unwrap().to_vec(), vec![String::new(), String::new()]);
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        let empty: [usize; 0] = [];
        assert!(Tensor::empty(&empty, ElementType::Float32).is_err());
        assert!(Tensor::empty(&[1, 1, 1, 1, 1, 1, 1], ElementType::Float32).is_err());
        assert!(Tensor::empty(&[2, 0], ElementType::Float32).is_err());
        assert!(Tensor::empty(&[-1i64], ElementType::Float32).is_err());
        assert!(Tensor::empty(&[1.5_f64], ElementType::Float32).is_err());
    }

    #[test]
    fn test_from_raw_buffer_checks() {
        let ok = Tensor::from_raw_buffer(TensorData::from(vec![1u16, 2]), &[2], ElementType::Uint16);
        assert!(ok.is_ok());

        let short = Tensor::from_raw_buffer(TensorData::from(vec![1u16]), &[2], ElementType::Uint16);
        assert_eq!(
            short.unwrap_err(),
            Error::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );

        let wrong = Tensor::from_raw_buffer(TensorData::from(vec![1i16, 2]), &[2], ElementType::Uint16);
        assert_eq!(
            wrong.unwrap_err(),
            Error::TypeMismatch {
                expected: ElementType::Uint16,
                actual: ElementType::Int16
            }
        );
    }

    #[test]
    fn test_producer_not_invoked_until_read() {
        let calls = Arc::new(AtomicUsize::new(0));
        let t = Tensor::from_producer(&[4], ElementType::Float32, counting_producer(calls.clone()))
            .unwrap();

        assert!(!t.is_materialized());
        assert_eq!(t.shape(), &[4]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_producer_invoked_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let t = Tensor::from_producer(&[2, 2], ElementType::Float32, counting_producer(calls.clone()))
            .unwrap();

        let first = t.data().unwrap();
        let second = t.data().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(first.ptr_eq(&second));
        assert_eq!(t.float_data().unwrap().to_f64_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(t.is_materialized());
    }

    #[test]
    fn test_producer_receives_identity() {
        let id = DataId::next();
        let producer: Arc<dyn DataProducer> = Arc::new(move |seen: DataId| -> Result<TensorData> {
            assert_eq!(seen, id);
            Ok(TensorData::from(vec![7i8]))
        });
        let t = Tensor::new_with_id(id, &[1], ElementType::Int8, TensorSource::Producer(producer))
            .unwrap();

        assert_eq!(t.id(), id);
        assert_eq!(t.integer_data().unwrap().to_i64_vec(), vec![7]);
    }

    #[test]
    fn test_producer_result_validated() {
        let producer: Arc<dyn DataProducer> =
            Arc::new(|_id: DataId| -> Result<TensorData> { Ok(TensorData::from(vec![1.0_f64, 2.0])) });
        let t = Tensor::from_producer(&[3], ElementType::Float64, producer).unwrap();

        assert_eq!(
            t.data().unwrap_err(),
            Error::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_failed_producer_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let producer: Arc<dyn DataProducer> = Arc::new(move |_id: DataId| -> Result<TensorData> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Error::producer_failed("device lost"))
        });
        let t = Tensor::from_producer(&[1], ElementType::Uint8, producer).unwrap();

        assert!(t.data().is_err());
        assert!(t.data().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_producer_is_recorded_as_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let producer: Arc<dyn DataProducer> = Arc::new(move |_id: DataId| -> Result<TensorData> {
            counter.fetch_add(1, Ordering::SeqCst);
            panic!("backend crashed");
        });
        let t = Arc::new(Tensor::from_producer(&[2], ElementType::Int16, producer).unwrap());

        let reader = t.clone();
        assert!(std::thread::spawn(move || reader.data()).join().is_err());

        let err = t.data().unwrap_err();
        assert!(matches!(err, Error::ProducerFailed { .. }));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!t.is_materialized());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_read_fails() {
        let slot: Arc<parking_lot::Mutex<Option<Arc<Tensor>>>> = Arc::new(parking_lot::Mutex::new(None));
        let inner = slot.clone();
        let producer: Arc<dyn DataProducer> = Arc::new(move |_id: DataId| -> Result<TensorData> {
            let tensor = inner.lock().clone();
            match tensor {
                Some(t) => t.data(),
                None => Ok(TensorData::from(vec![0u32])),
            }
        });
        let t = Arc::new(Tensor::from_producer(&[1], ElementType::Uint32, producer).unwrap());
        *slot.lock() = Some(t.clone());

        assert!(matches!(
            t.data(),
            Err(Error::ReentrantMaterialization { .. })
        ));
        slot.lock().take();
    }

    #[test]
    fn test_category_accessors() {
        let f = Tensor::empty(&[2], ElementType::Float32).unwrap();
        assert_eq!(
            f.string_data().unwrap_err(),
            Error::CategoryMismatch {
                category: DataCategory::String,
                actual: ElementType::Float32
            }
        );
        assert!(f.integer_data().is_err());
        assert!(f.numeric_data().is_ok());

        let s = Tensor::empty(&[2], ElementType::String).unwrap();
        assert_eq!(
            s.numeric_data().unwrap_err(),
            Error::CategoryMismatch {
                category: DataCategory::Numeric,
                actual: ElementType::String
            }
        );

        let i = Tensor::empty(&[3], ElementType::Int16).unwrap();
        assert!(i.integer_data().is_ok());
        assert!(i.float_data().is_err());
    }

    #[test]
    fn test_accessor_checks_type_before_materializing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let t = Tensor::from_producer(&[4], ElementType::Float32, counting_producer(calls.clone()))
            .unwrap();

        assert!(t.string_data().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_writes_through_buffer_are_visible() {
        let t = Tensor::empty(&[3], ElementType::Uint8).unwrap();
        if let IntegerData::Uint8(storage) = t.integer_data().unwrap() {
            storage.as_slice_mut()[1] = 9;
        }
        assert_eq!(t.integer_data().unwrap().to_i64_vec(), vec![0, 9, 0]);
    }

    #[test]
    fn test_identity_tokens_are_unique() {
        let a = Tensor::empty(&[1], ElementType::Bool).unwrap();
        let b = Tensor::empty(&[1], ElementType::Bool).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_async_materialization_not_implemented() {
        let t = Tensor::empty(&[1], ElementType::Float32).unwrap();
        let err = t.data_async().await.unwrap_err();
        assert_eq!(err.kind(), tensorwire_core::ErrorKind::NotImplemented);
    }
}
