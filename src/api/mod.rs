//! Public API module for the image retrieval core.
//!
//! The main entry point is [`ImageDatabase`], which owns the index built from
//! every database image's features and answers "which images look like this
//! one" queries.

pub mod db;

pub use db::{find_similar_images, ImageDatabase};
