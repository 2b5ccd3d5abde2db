use std::fmt::{Debug, Display};

use num_traits::{Float, NumCast, ToPrimitive};

/// A trait for types that can be used as point coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Only single and double
/// precision floats are supported, and the two never mix within one index or query.
pub trait CoordNum:
    private::Sealed
    + Float
    + NumCast
    + ToPrimitive
    + PartialOrd
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + bytemuck::Pod
{
    /// The runtime tag for this coordinate type.
    const COORD_TYPE: CoordType;
    /// The number of bytes per element
    const BYTES_PER_ELEMENT: usize;

    /// Convert a radius given in double precision to this type, never rounding it down.
    fn radius_from_f64(radius: f64) -> Self;
}

impl CoordNum for f32 {
    const COORD_TYPE: CoordType = CoordType::Float32;
    const BYTES_PER_ELEMENT: usize = 4;

    #[inline]
    fn radius_from_f64(radius: f64) -> Self {
        use float_next_after::NextAfter;

        let mut r = radius as f32;
        if (r as f64) < radius {
            r = r.next_after(f32::INFINITY);
        }
        debug_assert!(r as f64 >= radius || radius.is_nan());
        r
    }
}

impl CoordNum for f64 {
    const COORD_TYPE: CoordType = CoordType::Float64;
    const BYTES_PER_ELEMENT: usize = 8;

    #[inline]
    fn radius_from_f64(radius: f64) -> Self {
        radius
    }
}

/// An enum over the allowed coordinate types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordType {
    Float32,
    Float64,
}

impl CoordType {
    /// The number of bytes of a single coordinate of this type.
    pub fn bytes_per_element(&self) -> usize {
        match self {
            CoordType::Float32 => f32::BYTES_PER_ELEMENT,
            CoordType::Float64 => f64::BYTES_PER_ELEMENT,
        }
    }
}

impl Display for CoordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordType::Float32 => write!(f, "Float32"),
            CoordType::Float64 => write!(f, "Float64"),
        }
    }
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
