use std::fmt;

use crate::core::indexing::kdtree::KdTreeError;

#[derive(Debug)]
pub enum CbirError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Configuration(String),
    InvalidInput { message: String },
    Index(String),
    DimensionMismatch { dim1: usize, dim2: usize },
    Internal(String),
}

impl fmt::Display for CbirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO Error: {}", e),
            Self::Json(e) => write!(f, "JSON Serialization/Deserialization Error: {}", e),
            Self::Configuration(s) => write!(f, "Configuration error: {}", s),
            Self::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            Self::Index(s) => write!(f, "Index Error: {}", s),
            Self::DimensionMismatch { dim1, dim2 } => {
                write!(f, "Vector dimension mismatch: dim1 = {}, dim2 = {}", dim1, dim2)
            }
            Self::Internal(s) => write!(f, "Internal Error: {}", s),
        }
    }
}

impl std::error::Error for CbirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CbirError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CbirError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<KdTreeError> for CbirError {
    fn from(err: KdTreeError) -> Self {
        match err {
            KdTreeError::EmptyInput(s) => Self::InvalidInput { message: format!("Empty input: {s}") },
            KdTreeError::DimensionMismatch(s) => Self::Index(format!("Dimension mismatch: {s}")),
            KdTreeError::AxisOutOfBounds(s) => Self::Index(format!("Axis out of bounds: {s}")),
            KdTreeError::InvalidArgument(s) => Self::InvalidInput { message: s },
            KdTreeError::Allocation(s) => Self::Index(format!("Allocation failed: {s}")),
            // Full is a search-internal signal; reaching the caller means a logic error.
            KdTreeError::QueueFull => Self::Internal("Bounded queue unexpectedly full".to_string()),
            KdTreeError::QueueEmpty => Self::Internal("Bounded queue unexpectedly empty".to_string()),
            KdTreeError::InternalError(s) => Self::Internal(s),
        }
    }
}

impl CbirError {
    /// Shorthand for an `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }
}
