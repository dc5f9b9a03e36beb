// src/core/indexing/kdtree/array.rs

//! `KdArray`: a point set together with one coordinate-sorted permutation per
//! dimension, supporting balanced median splits without re-sorting.

use std::cmp::Ordering;

use super::error::KdTreeError;
use crate::core::types::Point;

/// Points sharing one dimension plus, for each dimension `j`, the point
/// positions sorted ascending by coordinate `j`.
///
/// Equal coordinates keep ascending position order, so the permutation rows
/// (and every tree built from them) are deterministic.
#[derive(Debug, Clone)]
pub struct KdArray {
    points: Vec<Point>,
    /// `order[j][r]` is the position of the point with rank `r` on axis `j`.
    order: Vec<Vec<usize>>,
    dimension: usize,
}

impl KdArray {
    /// Builds the array and its sorted permutation rows.
    ///
    /// # Errors
    /// * `EmptyInput` if `points` is empty.
    /// * `DimensionMismatch` if the points do not share one dimension.
    /// * `Allocation` if the permutation matrix cannot be reserved.
    pub fn build(points: &[Point]) -> Result<Self, KdTreeError> {
        let first = points.first().ok_or_else(|| {
            KdTreeError::EmptyInput("Cannot build a KdArray from zero points.".to_string())
        })?;
        let dimension = first.dimension();

        if let Some(bad) = points.iter().find(|p| p.dimension() != dimension) {
            return Err(KdTreeError::DimensionMismatch(format!(
                "Expected dimension {}, but found point with dimension {}.",
                dimension,
                bad.dimension()
            )));
        }

        let mut owned = Vec::new();
        owned.try_reserve_exact(points.len())?;
        owned.extend_from_slice(points);

        let mut order = Vec::new();
        order.try_reserve_exact(dimension)?;
        for axis in 0..dimension {
            order.push(sorted_row(&owned, axis)?);
        }

        Ok(Self { points: owned, order, dimension })
    }

    /// An array with no points. Only produced as the right half of a
    /// single-point split.
    fn empty(dimension: usize) -> Self {
        Self { points: Vec::new(), order: vec![Vec::new(); dimension], dimension }
    }

    /// Splits the array on `axis` into a left half holding the `ceil(n/2)`
    /// smallest points on that axis and a right half holding the rest.
    ///
    /// Both halves get freshly remapped permutation rows in O(n·d); nothing is
    /// re-sorted. A single-point array splits into a copy of itself and an
    /// empty array.
    ///
    /// # Errors
    /// * `AxisOutOfBounds` if `axis >= dimension`.
    /// * `Allocation` if the halves cannot be reserved.
    pub fn split(&self, axis: usize) -> Result<(KdArray, KdArray), KdTreeError> {
        self.check_axis(axis)?;

        let n = self.len();
        if n == 1 {
            return Ok((self.clone(), Self::empty(self.dimension)));
        }

        let left_len = n.div_ceil(2);
        let right_len = n - left_len;

        let mut goes_left = vec![false; n];
        for &pos in &self.order[axis][..left_len] {
            goes_left[pos] = true;
        }

        // Old position -> position inside its half. Filtering keeps the
        // original relative order of the points.
        let mut remap = vec![0usize; n];
        let mut left_points = Vec::new();
        left_points.try_reserve_exact(left_len)?;
        let mut right_points = Vec::new();
        right_points.try_reserve_exact(right_len)?;
        for (pos, point) in self.points.iter().enumerate() {
            if goes_left[pos] {
                remap[pos] = left_points.len();
                left_points.push(point.clone());
            } else {
                remap[pos] = right_points.len();
                right_points.push(point.clone());
            }
        }

        let mut left_order = Vec::new();
        left_order.try_reserve_exact(self.dimension)?;
        let mut right_order = Vec::new();
        right_order.try_reserve_exact(self.dimension)?;
        for row in &self.order {
            let mut left_row = Vec::new();
            left_row.try_reserve_exact(left_len)?;
            let mut right_row = Vec::new();
            right_row.try_reserve_exact(right_len)?;
            for &pos in row {
                if goes_left[pos] {
                    left_row.push(remap[pos]);
                } else {
                    right_row.push(remap[pos]);
                }
            }
            left_order.push(left_row);
            right_order.push(right_row);
        }

        Ok((
            KdArray { points: left_points, order: left_order, dimension: self.dimension },
            KdArray { points: right_points, order: right_order, dimension: self.dimension },
        ))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Points in their stored (insertion) order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Permutation row for `axis`.
    pub fn order(&self, axis: usize) -> Result<&[usize], KdTreeError> {
        self.check_axis(axis)?;
        Ok(&self.order[axis])
    }

    /// The point with rank `rank` when sorted by coordinate `axis`.
    pub fn point_at(&self, axis: usize, rank: usize) -> Result<&Point, KdTreeError> {
        let row = self.order(axis)?;
        row.get(rank).map(|&pos| &self.points[pos]).ok_or_else(|| {
            KdTreeError::InvalidArgument(format!(
                "Rank {} is out of bounds for an array of {} points.",
                rank,
                self.len()
            ))
        })
    }

    /// Largest minus smallest coordinate on `axis`; zero for an empty array.
    pub fn spread(&self, axis: usize) -> Result<f64, KdTreeError> {
        let row = self.order(axis)?;
        match (row.first(), row.last()) {
            (Some(&lo), Some(&hi)) => Ok(self.points[hi].coords()[axis] - self.points[lo].coords()[axis]),
            _ => Ok(0.0),
        }
    }

    fn check_axis(&self, axis: usize) -> Result<(), KdTreeError> {
        if axis >= self.dimension {
            return Err(KdTreeError::AxisOutOfBounds(format!(
                "Axis {} is out of bounds for dimension {}.",
                axis, self.dimension
            )));
        }
        Ok(())
    }
}

/// Positions of `points` sorted ascending by coordinate `axis`, ties by position.
fn sorted_row(points: &[Point], axis: usize) -> Result<Vec<usize>, KdTreeError> {
    let mut keyed = Vec::new();
    keyed.try_reserve_exact(points.len())?;
    keyed.extend(points.iter().enumerate().map(|(pos, p)| (pos, p.coords()[axis])));

    // Stable sort: equal values stay in ascending position order.
    keyed.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    Ok(keyed.into_iter().map(|(pos, _)| pos).collect())
}
