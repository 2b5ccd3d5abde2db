#![doc = include_str!("../README.md")]

pub mod bbox;
mod edges;
mod error;
pub mod kdtree;
pub mod points;
pub mod query;
mod r#type;

pub use edges::{union_edges, Edges};
pub use error::{KDTreeError, Result};
pub use kdtree::{KDTree, KDTreeBuilder};
pub use points::{Points, PointsRef};
pub use query::{NearestEdges, RadiusEdges};
pub use r#type::{CoordNum, CoordType};

#[cfg(test)]
pub(crate) mod test;
