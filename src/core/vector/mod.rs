// src/core/vector/mod.rs

//! Feature-vector operations: distances, on-disk feature collections and the
//! vote-based image ranker built on top of the KD-Tree search.

pub mod features;
pub mod ranker;
pub mod similarity;

// Re-export key types and functions for convenience
pub use features::FeatureFile;
pub use ranker::{count_votes, rank_similar_images, rank_with_votes, select_top, RankParams, RankedImage};
pub use similarity::{euclidean_distance, squared_euclidean_distance};
