// src/core/types/point.rs

//! Immutable feature point tagged with the index of the image it came from.

use std::fmt;
use std::sync::Arc;

use crate::core::common::CbirError;

/// Tolerance used for coordinate equality and for snapping tiny distances to zero.
pub const EPSILON: f64 = 1e-5;

/// A fixed-dimension feature vector owned by a database image.
///
/// Coordinates live behind an `Arc<[f64]>`, so cloning a `Point` while moving it
/// between arrays and tree leaves never copies the vector and never allows
/// mutation.
#[derive(Clone)]
pub struct Point {
    owner: usize,
    coords: Arc<[f64]>,
}

impl Point {
    /// Owner index carried by query points, which belong to no database image.
    pub const QUERY_OWNER: usize = usize::MAX;

    /// Creates a point for image `owner`.
    ///
    /// # Errors
    /// Returns `CbirError::InvalidInput` if `coords` is empty or holds a
    /// non-finite value.
    pub fn new(owner: usize, coords: Vec<f64>) -> Result<Self, CbirError> {
        if coords.is_empty() {
            return Err(CbirError::invalid_input("Point must have at least one coordinate"));
        }
        if let Some(pos) = coords.iter().position(|c| !c.is_finite()) {
            return Err(CbirError::invalid_input(format!(
                "Point coordinate {} is not finite ({})",
                pos, coords[pos]
            )));
        }
        Ok(Self { owner, coords: coords.into() })
    }

    /// Creates a query point, i.e. a point with the `QUERY_OWNER` sentinel.
    pub fn query(coords: Vec<f64>) -> Result<Self, CbirError> {
        Self::new(Self::QUERY_OWNER, coords)
    }

    #[must_use]
    pub fn owner(&self) -> usize {
        self.owner
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    #[must_use]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Coordinate on `axis`, or `None` when the axis is out of range.
    #[must_use]
    pub fn coord(&self, axis: usize) -> Option<f64> {
        self.coords.get(axis).copied()
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// # Errors
    /// Returns `CbirError::DimensionMismatch` if the dimensions differ.
    pub fn squared_distance(&self, other: &Point) -> Result<f64, CbirError> {
        crate::core::vector::similarity::squared_euclidean_distance(self.coords(), other.coords())
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
            && self.coords.len() == other.coords.len()
            && self
                .coords
                .iter()
                .zip(other.coords.iter())
                .all(|(a, b)| (a - b).abs() < EPSILON)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.owner == Self::QUERY_OWNER {
            write!(f, "Point(query, {:?})", &*self.coords)
        } else {
            write!(f, "Point(#{}, {:?})", self.owner, &*self.coords)
        }
    }
}
