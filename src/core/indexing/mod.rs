pub mod kdtree;

// Re-export the tree types for convenience.
pub use kdtree::{KdArray, KdTree, KdTreeBuilder, SplitMethod};
