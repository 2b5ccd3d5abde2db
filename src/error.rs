use std::fmt::Debug;
use thiserror::Error;

use crate::r#type::CoordType;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KDTreeError {
    /// Malformed shapes, non-positive dimension or leaf size, bad radius.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Source and target points have a different number of coordinates.
    #[error("Dimension of source points ({source_dim}) and target points ({target_dim}) must match.")]
    DimensionMismatch {
        source_dim: usize,
        target_dim: usize,
    },

    /// Source and target points use different floating point precisions.
    #[error("Coordinate type of source ({source_type}) and target ({target_type}) points must match.")]
    DTypeMismatch {
        source_type: CoordType,
        target_type: CoordType,
    },

    /// A point set that requires at least one point is empty.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A radius search did not produce a single edge.
    #[error("No edges found with radius set to {radius}.")]
    NoEdgesFound { radius: f64 },
}

pub type Result<T> = std::result::Result<T, KDTreeError>;
