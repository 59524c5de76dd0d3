//! Shape - Tensor Dimension Validation
//!
//! Provides the shape type and the validator every tensor constructor goes
//! through. A valid shape has rank 1 to 6 and every dimension is an integer
//! in `1..=2_147_483_647`.
//!
//! # Key Features
//! - Small-vector shape representation (up to 6 dimensions inline)
//! - Validation generic over integer and floating dimension inputs
//! - Overflow-checked element counts
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use smallvec::SmallVec;

use tensorwire_core::error::{Error, Result};

// =============================================================================
// Constants and Type Aliases
// =============================================================================

/// Largest supported rank.
pub const MAX_RANK: usize = 6;

/// Largest supported dimension (`i32::MAX`).
pub const MAX_DIMENSION: i64 = i32::MAX as i64;

/// Shape type - dimensions of a tensor.
pub type Shape = SmallVec<[usize; MAX_RANK]>;

// =============================================================================
// Dimension Trait
// =============================================================================

/// A value that may describe a tensor dimension.
pub trait Dimension: Copy {
    /// Returns the value as an integer, or `None` if it is not a
    /// mathematical integer. Out-of-range magnitudes saturate so that they
    /// fail the bounds check rather than the integer check.
    fn as_integer(self) -> Option<i64>;
}

macro_rules! impl_int_dimension {
    ($($ty:ty),*) => {
        $(
            impl Dimension for $ty {
                fn as_integer(self) -> Option<i64> {
                    Some(i64::try_from(self).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

impl_int_dimension!(i32, i64, u32, u64, usize);

impl Dimension for f64 {
    fn as_integer(self) -> Option<i64> {
        if !self.is_finite() || self.fract() != 0.0 {
            return None;
        }
        // Saturating cast.
        Some(self as i64)
    }
}

impl Dimension for f32 {
    fn as_integer(self) -> Option<i64> {
        f64::from(self).as_integer()
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a dimension list and returns it as a `Shape`.
///
/// Checks rank first (above 6 is out of range, 0 is not yet supported),
/// then every dimension for integrality and bounds, then the element count
/// for overflow.
pub fn validate_shape<D: Dimension>(dims: &[D]) -> Result<Shape> {
    let rank = dims.len();
    if rank > MAX_RANK {
        return Err(Error::InvalidRank {
            rank,
            max: MAX_RANK,
        });
    }
    if rank == 0 {
        return Err(Error::ScalarNotSupported);
    }

    let mut shape = Shape::with_capacity(rank);
    for (index, &dim) in dims.iter().enumerate() {
        let value = dim
            .as_integer()
            .ok_or(Error::NonIntegerDimension { index })?;
        if value <= 0 || value > MAX_DIMENSION {
            return Err(Error::DimensionOutOfRange {
                index,
                value,
                max: MAX_DIMENSION,
            });
        }
        shape.push(value as usize);
    }

    if checked_numel(&shape).is_none() {
        return Err(Error::ShapeOverflow {
            shape: shape.to_vec(),
        });
    }

    Ok(shape)
}

// =============================================================================
// Shape Utilities
// =============================================================================

/// Computes the total number of elements from a shape.
///
/// An empty shape has one element.
#[must_use]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Computes the element count, or `None` on overflow.
#[must_use]
pub fn checked_numel(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numel() {
        assert_eq!(numel(&[2, 3, 4]), 24);
        assert_eq!(numel(&[]), 1);
        assert_eq!(numel(&[5]), 5);
    }

    #[test]
    fn test_valid_shapes() {
        for rank in 1..=MAX_RANK {
            let dims: Vec<i64> = (1..=rank as i64).collect();
            let shape = validate_shape(&dims).unwrap();
            assert_eq!(shape.len(), rank);
            assert_eq!(numel(&shape), (1..=rank).product::<usize>());
        }

        let shape = validate_shape(&[MAX_DIMENSION]).unwrap();
        assert_eq!(shape.as_slice(), &[2_147_483_647]);
    }

    #[test]
    fn test_rank_bounds() {
        let empty: [i64; 0] = [];
        assert_eq!(validate_shape(&empty), Err(Error::ScalarNotSupported));
        assert_eq!(
            validate_shape(&[1i64; 7]),
            Err(Error::InvalidRank { rank: 7, max: 6 })
        );
    }

    #[test]
    fn test_dimension_bounds() {
        assert!(matches!(
            validate_shape(&[2i64, 0]),
            Err(Error::DimensionOutOfRange { index: 1, value: 0, .. })
        ));
        assert!(matches!(
            validate_shape(&[-3i64]),
            Err(Error::DimensionOutOfRange { index: 0, value: -3, .. })
        ));
        assert!(matches!(
            validate_shape(&[MAX_DIMENSION + 1]),
            Err(Error::DimensionOutOfRange { .. })
        ));
        assert!(validate_shape(&[u64::MAX]).is_err());
    }

    #[test]
    fn test_non_integer_dimensions() {
        assert_eq!(
            validate_shape(&[2.0, 2.5]),
            Err(Error::NonIntegerDimension { index: 1 })
        );
        assert_eq!(
            validate_shape(&[f64::NAN]),
            Err(Error::NonIntegerDimension { index: 0 })
        );
        assert_eq!(
            validate_shape(&[f64::INFINITY]),
            Err(Error::NonIntegerDimension { index: 0 })
        );
        assert_eq!(validate_shape(&[3.0_f64, 4.0]).unwrap().as_slice(), &[3, 4]);
        assert!(matches!(
            validate_shape(&[1e300_f64]),
            Err(Error::DimensionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_overflowing_element_count() {
        let dims = [MAX_DIMENSION; 6];
        assert!(matches!(
            validate_shape(&dims),
            Err(Error::ShapeOverflow { .. })
        ));
    }
}
