// src/core/indexing/kdtree/mod.rs

//! KD-Tree implementation for feature-vector indexing.
//!
//! The pieces, leaves first:
//! - [`BoundedQueue`]: keeps the K best [`Neighbor`] candidates of a search.
//! - [`KdArray`]: points plus per-axis sorted permutations, split at the median
//!   in linear time.
//! - [`KdTree`]: built by [`KdTreeBuilder`] using a [`SplitMethod`]; one point
//!   per leaf.
//! - [`find_knn`]: branch-and-bound K nearest neighbour search.
//!
//! A built tree is immutable, so several searches may run on separate threads
//! as long as each one uses its own queue.

pub use self::array::KdArray;
pub use self::builder::{build_kdtree, KdTreeBuilder, SplitMethod};
pub use self::error::KdTreeError;
pub use self::queue::{BoundedQueue, Neighbor};
pub use self::search::{brute_force_knn, find_knn, knn};
pub use self::tree::{KdNode, KdTree, Leaves};

mod array;
mod builder;
mod error;
mod queue;
mod search;
mod tree;
