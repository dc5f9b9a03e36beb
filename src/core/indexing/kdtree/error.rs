// src/core/indexing/kdtree/error.rs

use std::collections::TryReserveError;
use std::fmt;

/// Custom error types for KD-Tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KdTreeError {
    /// Error when trying to build an array or tree from empty input.
    EmptyInput(String),
    /// Error when vector dimensions are inconsistent.
    DimensionMismatch(String),
    /// Error when an axis is out of bounds for a given dimension.
    AxisOutOfBounds(String),
    /// Error for invalid parameters (capacity, k, coordinates).
    InvalidArgument(String),
    /// Error when storage for the index could not be reserved.
    Allocation(String),
    /// The bounded queue is at capacity and the candidate cannot improve it.
    QueueFull,
    /// Dequeue on an empty bounded queue.
    QueueEmpty,
    /// Error for general issues, e.g., during search or build.
    InternalError(String),
}

impl fmt::Display for KdTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdTreeError::EmptyInput(msg) => write!(f, "KD-Tree Empty Input: {}", msg),
            KdTreeError::DimensionMismatch(msg) => write!(f, "KD-Tree Dimension Mismatch: {}", msg),
            KdTreeError::AxisOutOfBounds(msg) => write!(f, "KD-Tree Axis Out Of Bounds: {}", msg),
            KdTreeError::InvalidArgument(msg) => write!(f, "KD-Tree Invalid Argument: {}", msg),
            KdTreeError::Allocation(msg) => write!(f, "KD-Tree Allocation Failure: {}", msg),
            KdTreeError::QueueFull => write!(f, "KD-Tree Bounded Queue Full"),
            KdTreeError::QueueEmpty => write!(f, "KD-Tree Bounded Queue Empty"),
            KdTreeError::InternalError(msg) => write!(f, "KD-Tree Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for KdTreeError {}

impl From<TryReserveError> for KdTreeError {
    fn from(err: TryReserveError) -> Self {
        KdTreeError::Allocation(err.to_string())
    }
}
