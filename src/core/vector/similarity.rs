// src/core/vector/similarity.rs

use crate::core::common::CbirError;
use crate::core::types::EPSILON;

/// Calculates the squared Euclidean distance between two vectors.
///
/// # Arguments
///
/// * `v1` - A slice of f64 representing the first vector.
/// * `v2` - A slice of f64 representing the second vector.
///
/// # Returns
///
/// * `Result<f64, CbirError>` - The squared distance, or an error if the vectors
///   have different dimensions.
pub fn squared_euclidean_distance(v1: &[f64], v2: &[f64]) -> Result<f64, CbirError> {
    if v1.len() != v2.len() {
        return Err(CbirError::DimensionMismatch { dim1: v1.len(), dim2: v2.len() });
    }

    Ok(v1.iter().zip(v2.iter()).map(|(a, b)| (a - b).powi(2)).sum())
}

/// Calculates the Euclidean distance between two vectors.
pub fn euclidean_distance(v1: &[f64], v2: &[f64]) -> Result<f64, CbirError> {
    squared_euclidean_distance(v1, v2).map(f64::sqrt)
}

/// Squared distance used when ranking neighbours: values below `EPSILON` snap to
/// exactly zero, since they are the query image's own feature found again in
/// the index.
///
/// The caller guarantees equal lengths.
#[must_use]
pub fn neighbor_distance(v1: &[f64], v2: &[f64]) -> f64 {
    snap_to_zero(v1.iter().zip(v2.iter()).map(|(a, b)| (a - b).powi(2)).sum())
}

/// Maps squared distances below `EPSILON` to exactly zero. Every bound compared
/// against a [`neighbor_distance`] must go through the same rule.
#[must_use]
pub fn snap_to_zero(squared: f64) -> f64 {
    if squared < EPSILON {
        0.0
    } else {
        squared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_squared_euclidean_distance_success() {
        let v1 = [1.0, 2.0, 3.0];
        let v2 = [5.0, -7.0, 13.0];
        // 16 + 81 + 100
        assert_relative_eq!(squared_euclidean_distance(&v1, &v2).unwrap(), 197.0, epsilon = 1e-12);
    }

    #[test]
    fn test_snap_to_zero() {
        assert_eq!(snap_to_zero(9.9e-6), 0.0);
        assert_eq!(snap_to_zero(EPSILON), EPSILON);
        assert_eq!(snap_to_zero(0.5), 0.5);
    }

    #[test]
    fn test_euclidean_distance_success() {
        let v1 = [0.0, 0.0];
        let v2 = [3.0, 4.0];
        assert_relative_eq!(euclidean_distance(&v1, &v2).unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        let v1 = [1.0, 2.0];
        let v2 = [4.0, 5.0, 6.0];
        match squared_euclidean_distance(&v1, &v2) {
            Err(CbirError::DimensionMismatch { dim1, dim2 }) => {
                assert_eq!(dim1, 2);
                assert_eq!(dim2, 3);
            }
            _ => panic!("Expected DimensionMismatch"),
        }
    }

    #[test]
    fn test_neighbor_distance_snaps_to_zero() {
        let v1 = [1.0, 1.0];
        let v2 = [1.0 + 1e-4, 1.0];
        // 1e-8 is below EPSILON
        assert_eq!(neighbor_distance(&v1, &v2), 0.0);
        assert_relative_eq!(neighbor_distance(&[0.0, 0.0], &[1.0, 2.0]), 5.0);
    }
}
