// src/api/db.rs

use std::path::PathBuf;

use tracing::info;

use crate::core::common::CbirError;
use crate::core::config::Config;
use crate::core::indexing::kdtree::{KdArray, KdTree, KdTreeBuilder};
use crate::core::types::Point;
use crate::core::vector::features::FeatureFile;
use crate::core::vector::ranker::{rank_similar_images, rank_with_votes, RankParams, RankedImage};

/// A searchable image database: the configuration it was built with and one
/// KD-Tree over the features of every database image.
///
/// Built once, then queried any number of times. `find_similar_images` takes
/// `&self`, so the database can be shared between threads.
#[derive(Debug)]
pub struct ImageDatabase {
    config: Config,
    tree: KdTree,
    feature_count: usize,
}

impl ImageDatabase {
    /// Indexes `image_features`, where entry `i` holds the features of image `i`.
    ///
    /// # Errors
    /// * `CbirError::InvalidInput` if the number of collections differs from
    ///   `config.num_of_images`, a point's owner differs from its collection
    ///   index, or there are no features at all.
    /// * `CbirError::Index` if the features do not share one dimension.
    pub fn new(config: Config, image_features: &[Vec<Point>]) -> Result<Self, CbirError> {
        config.validate()?;
        if image_features.len() != config.num_of_images {
            return Err(CbirError::invalid_input(format!(
                "Expected features for {} images, got {}",
                config.num_of_images,
                image_features.len()
            )));
        }

        let mut all_features = Vec::with_capacity(image_features.iter().map(Vec::len).sum());
        for (image_index, features) in image_features.iter().enumerate() {
            if let Some(stray) = features.iter().find(|p| p.owner() != image_index) {
                return Err(CbirError::invalid_input(format!(
                    "Feature owned by image {} found in the collection of image {}",
                    stray.owner(),
                    image_index
                )));
            }
            all_features.extend(features.iter().cloned());
        }

        let array = KdArray::build(&all_features)?;
        let mut builder = match config.split_seed {
            Some(seed) => KdTreeBuilder::with_seed(config.split_method, seed),
            None => KdTreeBuilder::new(config.split_method),
        };
        let tree = builder.build(array)?;

        info!(
            images = config.num_of_images,
            features = all_features.len(),
            dimension = tree.dimension(),
            method = %config.split_method,
            "Image database indexed"
        );

        Ok(Self { config, tree, feature_count: all_features.len() })
    }

    /// Loads every database image's feature file (`Config::features_path`) and
    /// indexes them.
    pub fn open(config: Config) -> Result<Self, CbirError> {
        let mut image_features = Vec::with_capacity(config.num_of_images);
        for index in 0..config.num_of_images {
            let path = config.features_path(index)?;
            let file = FeatureFile::load(&path)?;
            if file.image_index != index {
                return Err(CbirError::invalid_input(format!(
                    "Feature file '{}' belongs to image {}, expected {}",
                    path.display(),
                    file.image_index,
                    index
                )));
            }
            image_features.push(file.into_points()?);
        }
        Self::new(config, &image_features)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tree(&self) -> &KdTree {
        &self.tree
    }

    pub fn image_count(&self) -> usize {
        self.config.num_of_images
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    fn rank_params(&self) -> RankParams {
        RankParams {
            knn: self.config.knn,
            num_similar_images: self.config.num_of_similar_images.min(self.config.num_of_images),
            image_count: self.config.num_of_images,
        }
    }

    /// Indices of the `num_of_similar_images` database images most similar to
    /// the image described by `query_features`, best first.
    pub fn find_similar_images(&self, query_features: &[Point]) -> Result<Vec<usize>, CbirError> {
        rank_similar_images(&self.tree, query_features, &self.rank_params())
    }

    /// Like [`find_similar_images`](Self::find_similar_images), with vote counts.
    pub fn find_similar_images_with_votes(
        &self,
        query_features: &[Point],
    ) -> Result<Vec<RankedImage>, CbirError> {
        rank_with_votes(&self.tree, query_features, &self.rank_params())
    }

    /// Image paths of the most similar images, best first.
    pub fn find_similar_image_paths(&self, query_features: &[Point]) -> Result<Vec<PathBuf>, CbirError> {
        self.find_similar_images(query_features)?
            .into_iter()
            .map(|index| self.config.image_path(index))
            .collect()
    }
}

/// One-shot helper: indexes `image_features` and ranks a single query image.
pub fn find_similar_images(
    image_features: &[Vec<Point>],
    query_features: &[Point],
    config: &Config,
) -> Result<Vec<usize>, CbirError> {
    ImageDatabase::new(config.clone(), image_features)?.find_similar_images(query_features)
}
