#![warn(missing_docs)]

//! Math types for cupline.
//!
//! Thin wrappers around nalgebra. Kernel-space geometry is evaluated in
//! `f64`; sampled profiles and persisted outlines use single-precision
//! [`Point2D`] / [`Point3D`].
//!
//! # Profile space
//!
//! Surfaces are modelled with the revolution axis along kernel +Z. The
//! sampler moves every evaluated point into *profile space* with a single
//! fixed permutation, [`to_profile_space`]: kernel `(x, y, z)` becomes
//! profile `(x, z, y)`. In profile space Y is the axial coordinate and, on
//! the symmetry meridian `u = π/2`, Z is the radius.

use nalgebra::{Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D parameter space.
pub type Point2 = nalgebra::Point2<f64>;

/// Single-precision 2D point: `(axial, radius)` profile samples and
/// `(u, v)` parameter pairs.
pub type Point2D = nalgebra::Point2<f32>;

/// Single-precision 3D point: sampled surface points and fiducial curves.
pub type Point3D = nalgebra::Point3<f32>;

/// Parameter value reported by surfaces that extend without bound.
pub const INFINITE_PARAMETER: f64 = 2.0e100;

/// Map a kernel-space point into profile space (swap Y and Z).
pub fn to_profile_space(p: &Point3) -> Point3 {
    Point3::new(p.x, p.z, p.y)
}

/// Narrow a kernel point to a stored [`Point3D`].
pub fn narrow3(p: &Point3) -> Point3D {
    Point3D::new(p.x as f32, p.y as f32, p.z as f32)
}

/// Narrow a pair of kernel values to a stored [`Point2D`].
pub fn narrow2(x: f64, y: f64) -> Point2D {
    Point2D::new(x as f32, y as f32)
}

/// Widen a stored [`Point3D`] back to kernel precision.
pub fn widen3(p: &Point3D) -> Point3 {
    Point3::new(p.x as f64, p.y as f64, p.z as f64)
}

/// Clamp `value` into `[lo, hi]`.
///
/// Unlike `f64::clamp` this never panics; `lo` wins if the range is inverted.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.min(hi).max(lo)
}
