//! An implementation of an immutable K-D tree over points of any dimension.

#![warn(missing_docs)]

mod builder;
mod index;
pub mod traversal;

pub use builder::{KDTreeBuilder, DEFAULT_MIN_LEAF_SIZE};
pub use index::KDTree;
pub(crate) use index::NodeKind;
pub use traversal::Node;

#[cfg(test)]
mod test;
