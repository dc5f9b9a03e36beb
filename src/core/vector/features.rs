// src/core/vector/features.rs

//! On-disk feature collections: one JSON file per image, written by the
//! feature extractor and read back when the database is assembled.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::core::common::CbirError;
use crate::core::types::Point;

/// Features extracted from one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFile {
    pub image_index: usize,
    pub dimension: usize,
    pub features: Vec<Vec<f64>>,
}

impl FeatureFile {
    /// Collects the coordinates of `points` under `image_index`.
    ///
    /// # Errors
    /// `CbirError::DimensionMismatch` if the points do not share one dimension.
    pub fn from_points(image_index: usize, points: &[Point]) -> Result<Self, CbirError> {
        let dimension = points.first().map_or(0, Point::dimension);
        let mut features = Vec::with_capacity(points.len());
        for point in points {
            if point.dimension() != dimension {
                return Err(CbirError::DimensionMismatch { dim1: dimension, dim2: point.dimension() });
            }
            features.push(point.coords().to_vec());
        }
        Ok(Self { image_index, dimension, features })
    }

    /// Checks that every feature row has `dimension` values.
    pub fn validate(&self) -> Result<(), CbirError> {
        if let Some(row) = self.features.iter().find(|row| row.len() != self.dimension) {
            return Err(CbirError::DimensionMismatch { dim1: self.dimension, dim2: row.len() });
        }
        Ok(())
    }

    /// Turns every row into a [`Point`] owned by `image_index`.
    pub fn into_points(self) -> Result<Vec<Point>, CbirError> {
        let owner = self.image_index;
        self.features.into_iter().map(|coords| Point::new(owner, coords)).collect()
    }

    /// Turns every row into a query point.
    pub fn into_query_points(self) -> Result<Vec<Point>, CbirError> {
        self.features.into_iter().map(Point::query).collect()
    }

    pub fn save(&self, path: &Path) -> Result<(), CbirError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads and validates a feature file.
    pub fn load(path: &Path) -> Result<Self, CbirError> {
        let file = File::open(path)?;
        let loaded: Self = serde_json::from_reader(BufReader::new(file))?;
        loaded.validate()?;
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("img3.feats");
        let points = vec![
            Point::new(3, vec![1.0, 2.0]).unwrap(),
            Point::new(3, vec![-0.5, 4.25]).unwrap(),
        ];

        FeatureFile::from_points(3, &points).unwrap().save(&path).unwrap();
        let loaded = FeatureFile::load(&path).unwrap();
        assert_eq!(loaded.image_index, 3);
        assert_eq!(loaded.dimension, 2);
        assert_eq!(loaded.into_points().unwrap(), points);
    }

    #[test]
    fn test_from_points_dimension_mismatch() {
        let points = vec![Point::new(0, vec![1.0]).unwrap(), Point::new(0, vec![1.0, 2.0]).unwrap()];
        assert!(matches!(
            FeatureFile::from_points(0, &points),
            Err(CbirError::DimensionMismatch { dim1: 1, dim2: 2 })
        ));
    }

    #[test]
    fn test_load_rejects_ragged_rows() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"{{"image_index": 0, "dimension": 2, "features": [[1.0, 2.0], [3.0]]}}"#)
            .unwrap();
        assert!(matches!(
            FeatureFile::load(temp_file.path()),
            Err(CbirError::DimensionMismatch { dim1: 2, dim2: 1 })
        ));
    }

    #[test]
    fn test_load_malformed_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "not json").unwrap();
        assert!(matches!(FeatureFile::load(temp_file.path()), Err(CbirError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(FeatureFile::load(&dir.path().join("nope.feats")), Err(CbirError::Io(_))));
    }

    #[test]
    fn test_into_query_points() {
        let file = FeatureFile { image_index: 5, dimension: 1, features: vec![vec![2.0]] };
        let points = file.into_query_points().unwrap();
        assert_eq!(points[0].owner(), Point::QUERY_OWNER);
    }
}
