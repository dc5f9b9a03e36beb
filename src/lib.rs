#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_sign_loss)]
#![forbid(unsafe_code)]

//! # cbir: nearest-neighbour core for content-based image retrieval
//!
//! Every database image is described by a set of feature vectors. All of them
//! go into one KD-Tree; a query image's features are each matched against the
//! tree, every match votes for the image that owns it, and the images with the
//! most votes are the most similar.
//!
//! - [`core::indexing::kdtree`]: sorted point arrays, tree construction with
//!   max-spread, random or round-robin splits, bounded queues and exact
//!   branch-and-bound K nearest neighbour search.
//! - [`core::vector`]: distances, feature files and vote ranking.
//! - [`api::ImageDatabase`]: the built index plus its configuration.

pub mod api;
pub mod core;

// Re-export key types for easier use by library consumers
pub use crate::core::common::CbirError;
pub use crate::core::config::Config;
pub use crate::core::types::Point;
pub use api::ImageDatabase;

/// Core result type for the library
pub type Result<T> = std::result::Result<T, CbirError>;
