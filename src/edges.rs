//! Edge lists produced by the neighbor queries, and helpers to combine them.

use std::collections::BTreeSet;

use crate::error::{KDTreeError, Result};

/// A list of `(source, target)` index pairs.
///
/// Indices refer to the original order of the source and target point buffers. Conceptually this
/// is a `[2, num_edges]` table with source indices in row 0 and target indices in row 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edges {
    source: Vec<u32>,
    target: Vec<u32>,
}

impl Edges {
    /// An empty edge list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            source: Vec::with_capacity(capacity),
            target: Vec::with_capacity(capacity),
        }
    }

    /// Create an edge list from its two rows, which must have the same length.
    pub fn try_new(source: Vec<u32>, target: Vec<u32>) -> Result<Self> {
        if source.len() != target.len() {
            return Err(KDTreeError::InvalidArgument(format!(
                "number of source indices ({}) differs from the number of target indices ({})",
                source.len(),
                target.len()
            )));
        }
        Ok(Self { source, target })
    }

    #[inline]
    pub(crate) fn push(&mut self, source: u32, target: u32) {
        self.source.push(source);
        self.target.push(target);
    }

    pub(crate) fn append(&mut self, mut other: Edges) {
        self.source.append(&mut other.source);
        self.target.append(&mut other.target);
    }

    /// The number of edges.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Source index of each edge.
    pub fn source(&self) -> &[u32] {
        &self.source
    }

    /// Target index of each edge.
    pub fn target(&self) -> &[u32] {
        &self.target
    }

    /// Iterate over `(source, target)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.source.iter().copied().zip(self.target.iter().copied())
    }

    /// The edges as a row-major `[2, num_edges]` table.
    pub fn to_table(&self) -> Vec<u32> {
        let mut table = Vec::with_capacity(2 * self.len());
        table.extend_from_slice(&self.source);
        table.extend_from_slice(&self.target);
        table
    }

    /// Split into the source and target rows.
    pub fn into_parts(self) -> (Vec<u32>, Vec<u32>) {
        (self.source, self.target)
    }

    /// Sort in place by source index, then by target index.
    pub fn sort_by_source(&mut self) {
        let mut pairs: Vec<(u32, u32)> = self.iter().collect();
        pairs.sort_unstable();
        for (i, (s, t)) in pairs.into_iter().enumerate() {
            self.source[i] = s;
            self.target[i] = t;
        }
    }
}

impl FromIterator<(u32, u32)> for Edges {
    fn from_iter<T: IntoIterator<Item = (u32, u32)>>(iter: T) -> Self {
        let mut edges = Edges::new();
        for (s, t) in iter {
            edges.push(s, t);
        }
        edges
    }
}

/// Combine edge lists, dropping duplicate pairs.
///
/// The result is sorted by source index, then target index. It is an error to pass no edge
/// lists at all; passing only empty lists returns an empty list.
pub fn union_edges(inputs: &[Edges]) -> Result<Edges> {
    if inputs.is_empty() {
        return Err(KDTreeError::InvalidArgument(
            "no input edges provided".to_string(),
        ));
    }
    let unique: BTreeSet<(u32, u32)> = inputs.iter().flat_map(|edges| edges.iter()).collect();
    Ok(unique.into_iter().collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_mismatched_rows() {
        assert!(Edges::try_new(vec![0, 1], vec![0]).is_err());
    }

    #[test]
    fn table_layout() {
        let edges = Edges::try_new(vec![0, 1, 2], vec![5, 6, 7]).unwrap();
        assert_eq!(edges.to_table(), vec![0, 1, 2, 5, 6, 7]);
        assert_eq!(edges.iter().nth(1), Some((1, 6)));
    }

    #[test]
    fn sorts_by_source_then_target() {
        let mut edges = Edges::try_new(vec![2, 0, 2, 1, 0], vec![1, 3, 0, 9, 2]).unwrap();
        edges.sort_by_source();
        assert_eq!(edges.source(), &[0, 0, 1, 2, 2]);
        assert_eq!(edges.target(), &[2, 3, 9, 0, 1]);
    }

    #[test]
    fn union_removes_duplicates() {
        let a = Edges::try_new(vec![0, 1, 1], vec![1, 2, 2]).unwrap();
        let b = Edges::try_new(vec![1, 3], vec![2, 0]).unwrap();
        let union = union_edges(&[a, b, Edges::new()]).unwrap();
        assert_eq!(union.iter().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (3, 0)]);
    }

    #[test]
    fn union_of_nothing() {
        assert!(matches!(
            union_edges(&[]),
            Err(KDTreeError::InvalidArgument(_))
        ));
        assert!(union_edges(&[Edges::new()]).unwrap().is_empty());
    }
}
