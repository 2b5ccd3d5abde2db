//! Views over flat, row-major point buffers.
//!
//! A point set of `N` points with `D` coordinates each is a slice of length `N * D`, where point
//! `i` occupies `[i * D, (i + 1) * D)`.

use bytemuck::try_cast_slice;

use crate::error::{KDTreeError, Result};
use crate::r#type::{CoordNum, CoordType};

/// A typed view over a flat buffer of points with a fixed dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Points<'a, N: CoordNum> {
    coords: &'a [N],
    dimension: usize,
}

impl<'a, N: CoordNum> Points<'a, N> {
    /// Create a new view, validating that the buffer holds a whole number of points.
    ///
    /// Empty buffers are accepted; callers that require points check [`Points::is_empty`].
    pub fn try_new(coords: &'a [N], dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(KDTreeError::InvalidArgument(
                "number of dimensions must be positive".to_string(),
            ));
        }
        if coords.len() % dimension != 0 {
            return Err(KDTreeError::InvalidArgument(format!(
                "length of points buffer ({}) must be a multiple of the dimension of each point ({})",
                coords.len(),
                dimension
            )));
        }
        if coords.len() / dimension > u32::MAX as usize {
            return Err(KDTreeError::InvalidArgument(format!(
                "at most {} points are supported, got {}",
                u32::MAX,
                coords.len() / dimension
            )));
        }
        Ok(Self { coords, dimension })
    }

    /// The underlying flat coordinate buffer.
    pub fn coords(&self) -> &'a [N] {
        self.coords
    }

    /// The number of coordinates of each point.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The number of points in this buffer.
    pub fn num_points(&self) -> usize {
        self.coords.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The coordinates of the point at position `i`.
    #[inline]
    pub fn point(&self, i: usize) -> &'a [N] {
        &self.coords[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Iterate over the points in order.
    pub fn iter(&self) -> std::slice::ChunksExact<'a, N> {
        self.coords.chunks_exact(self.dimension)
    }
}

/// A point buffer whose coordinate type is only known at runtime.
///
/// This is the entry point for callers that hold points of either precision, for example raw
/// byte buffers coming from another system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointsRef<'a> {
    Float32(Points<'a, f32>),
    Float64(Points<'a, f64>),
}

impl<'a> PointsRef<'a> {
    /// Create a dynamically typed view over a raw byte buffer.
    ///
    /// The buffer must be aligned for the requested coordinate type.
    pub fn try_from_bytes(
        data: &'a [u8],
        coord_type: CoordType,
        dimension: usize,
    ) -> Result<Self> {
        let cast_err = |err: bytemuck::PodCastError| {
            KDTreeError::InvalidArgument(format!(
                "cannot view {} bytes as {} coordinates: {:?}",
                data.len(),
                coord_type,
                err
            ))
        };
        let points = match coord_type {
            CoordType::Float32 => {
                let coords: &[f32] = try_cast_slice(data).map_err(cast_err)?;
                PointsRef::Float32(Points::try_new(coords, dimension)?)
            }
            CoordType::Float64 => {
                let coords: &[f64] = try_cast_slice(data).map_err(cast_err)?;
                PointsRef::Float64(Points::try_new(coords, dimension)?)
            }
        };
        Ok(points)
    }

    pub fn coord_type(&self) -> CoordType {
        match self {
            PointsRef::Float32(_) => CoordType::Float32,
            PointsRef::Float64(_) => CoordType::Float64,
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            PointsRef::Float32(p) => p.dimension(),
            PointsRef::Float64(p) => p.dimension(),
        }
    }

    pub fn num_points(&self) -> usize {
        match self {
            PointsRef::Float32(p) => p.num_points(),
            PointsRef::Float64(p) => p.num_points(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_points() == 0
    }
}

impl<'a> From<Points<'a, f32>> for PointsRef<'a> {
    fn from(value: Points<'a, f32>) -> Self {
        PointsRef::Float32(value)
    }
}

impl<'a> From<Points<'a, f64>> for PointsRef<'a> {
    fn from(value: Points<'a, f64>) -> Self {
        PointsRef::Float64(value)
    }
}
