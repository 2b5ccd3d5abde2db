//! Edge queries between two point sets, answered with a [`KDTree`][crate::KDTree] built over
//! one of them.

mod nearest;
mod radius;

pub use nearest::NearestEdges;
pub use radius::RadiusEdges;
