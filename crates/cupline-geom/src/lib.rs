#![warn(missing_docs)]

//! Surface and curve geometry for cupline.
//!
//! Every face of a cup model lies on one of a small family of parametric
//! surfaces: the analytic quadrics a CAD kernel reports (plane, cylinder,
//! cone, sphere, torus), B-spline and Bézier patches, and surfaces derived
//! from other geometry (rectangular trims, linear extrusions, revolutions).
//! Edges lie on the matching family of curves.
//!
//! Directions a surface does not bound report [`INFINITE_PARAMETER`], so
//! samplers can refuse them. Geometry lives in a [`GeometryStore`] and is
//! referenced through typed [`GeomRef`] handles; [`classify`] maps a handle
//! to its [`SurfaceKind`] / [`CurveKind`].
//!
//! The revolved surfaces share an [`AxisFrame`]: `u` turns about the frame
//! axis starting at `ref_dir`, so `u = π/2` is the meridian through
//! `axis × ref_dir`.

use std::f64::consts::{FRAC_PI_2, PI};

pub use cupline_math::INFINITE_PARAMETER;
use cupline_math::{Dir3, Point2, Point3, Vec3};

pub mod bspline;
pub mod classify;
pub mod curves;
pub mod derived;
pub mod error;
pub mod shape;
pub mod store;

pub use bspline::{BSplineCurve, BSplineSurface, BezierCurve, BezierSurface};
pub use classify::{
    classify, classify_basis, classify_curve, classify_curve_object, classify_surface,
    classify_surface_basis, CURVE_KIND_ORDER, SURFACE_KIND_ORDER,
};
pub use curves::{
    Circle3d, Curve3d, CurveKind, Ellipse3d, Hyperbola3d, Line3d, Parabola3d, TrimmedCurve,
};
pub use derived::{RectangularTrimmedSurface, SurfaceOfLinearExtrusion, SurfaceOfRevolution};
pub use error::{GeomError, Result};
pub use shape::{Edge, Face, Shape, Wire};
pub use store::{CurveRef, GeomId, GeomRef, GeometryStore, SurfaceRef};

// =============================================================================
// Surface trait
// =============================================================================

/// Concrete kind of a surface, as reported by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Plane.
    Plane,
    /// Sphere.
    Sphere,
    /// Cone.
    Cone,
    /// Torus.
    Torus,
    /// Cylinder.
    Cylinder,
    /// Non-rational B-spline patch.
    BSpline,
    /// Bézier patch.
    Bezier,
    /// Another surface restricted to a parameter rectangle.
    RectangularTrimmed,
    /// A curve swept along a straight direction.
    LinearExtrusion,
    /// A curve revolved about an axis.
    Revolution,
}

impl SurfaceKind {
    /// Short lowercase label used in reports and logs.
    pub fn label(self) -> &'static str {
        match self {
            SurfaceKind::Plane => "plane",
            SurfaceKind::Sphere => "sphere",
            SurfaceKind::Cone => "cone",
            SurfaceKind::Torus => "torus",
            SurfaceKind::Cylinder => "cylinder",
            SurfaceKind::BSpline => "bspline",
            SurfaceKind::Bezier => "bezier",
            SurfaceKind::RectangularTrimmed => "trimmed",
            SurfaceKind::LinearExtrusion => "extrusion",
            SurfaceKind::Revolution => "revolution",
        }
    }
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A parametric surface `(u, v) → P`.
pub trait Surface: Send + Sync + std::fmt::Debug {
    /// Point at `uv = (u, v)`.
    fn evaluate(&self, uv: Point2) -> Point3;

    /// `((u_min, u_max), (v_min, v_max))`; unbounded directions report
    /// `±INFINITE_PARAMETER`.
    fn domain(&self) -> ((f64, f64), (f64, f64));

    /// Concrete kind.
    fn surface_type(&self) -> SurfaceKind;

    /// Kind predicate used by the classifier.
    fn is_kind(&self, kind: SurfaceKind) -> bool {
        self.surface_type() == kind
    }

    /// The surface meets itself across the u boundary.
    fn is_u_closed(&self) -> bool {
        false
    }

    /// The surface meets itself across the v boundary.
    fn is_v_closed(&self) -> bool {
        false
    }

    /// u repeats with the domain width as its period.
    fn is_u_periodic(&self) -> bool {
        false
    }

    /// v repeats with the domain width as its period.
    fn is_v_periodic(&self) -> bool {
        false
    }

    /// The surface this one restricts, for parameter-space trims.
    fn trimmed_basis(&self) -> Option<&dyn Surface> {
        None
    }

    /// Boxed copy.
    fn clone_box(&self) -> Box<dyn Surface>;
}

impl Clone for Box<dyn Surface> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Some unit vector perpendicular to `axis`.
pub(crate) fn any_perpendicular(axis: &Dir3) -> Dir3 {
    let seed = if axis.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    Dir3::new_normalize(seed - seed.dot(axis.as_ref()) * axis.into_inner())
}

/// `reference` with its `axis` component removed; any perpendicular when
/// nothing is left.
pub(crate) fn frame_ref(axis: &Dir3, reference: Vec3) -> Dir3 {
    let projected = reference - reference.dot(axis.as_ref()) * axis.into_inner();
    if projected.norm() < 1e-12 {
        any_perpendicular(axis)
    } else {
        Dir3::new_normalize(projected)
    }
}

const FULL_TURN: (f64, f64) = (0.0, 2.0 * PI);
const UNBOUNDED: (f64, f64) = (-INFINITE_PARAMETER, INFINITE_PARAMETER);

// =============================================================================
// Axis frame
// =============================================================================

/// Placement of a revolved surface: an origin on the axis, the axis, and
/// the direction `u = 0` points to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFrame {
    /// Point on the axis.
    pub origin: Point3,
    /// Axis direction.
    pub axis: Dir3,
    /// Direction of `u = 0`, perpendicular to `axis`.
    pub ref_dir: Dir3,
}

impl AxisFrame {
    /// Frame about `axis` with an arbitrary `u = 0` direction.
    pub fn new(origin: Point3, axis: Vec3) -> Self {
        let axis = Dir3::new_normalize(axis);
        Self {
            origin,
            axis,
            ref_dir: any_perpendicular(&axis),
        }
    }

    /// Frame about `axis` with `u = 0` toward `ref_dir` (orthogonalized).
    pub fn with_ref(origin: Point3, axis: Vec3, ref_dir: Vec3) -> Self {
        let axis = Dir3::new_normalize(axis);
        Self {
            origin,
            axis,
            ref_dir: frame_ref(&axis, ref_dir),
        }
    }

    /// Kernel frame: axis +Z, `u = 0` along +X.
    pub fn z_up(origin: Point3) -> Self {
        Self::with_ref(origin, Vec3::z(), Vec3::x())
    }

    /// Direction of `u = π/2`.
    pub fn binormal(&self) -> Vec3 {
        self.axis.cross(self.ref_dir.as_ref())
    }

    /// Unit vector perpendicular to the axis at angle `u`.
    pub fn radial(&self, u: f64) -> Vec3 {
        let (s, c) = u.sin_cos();
        c * self.ref_dir.into_inner() + s * self.binormal()
    }
}

macro_rules! closure_flags {
    (u) => {
        fn is_u_closed(&self) -> bool {
            true
        }

        fn is_u_periodic(&self) -> bool {
            true
        }
    };
    (u, v) => {
        closure_flags!(u);

        fn is_v_closed(&self) -> bool {
            true
        }

        fn is_v_periodic(&self) -> bool {
            true
        }
    };
}

// =============================================================================
// Plane
// =============================================================================

/// Unbounded plane, `P(u, v) = origin + u·x_dir + v·y_dir`.
///
/// Cup rims are planar annuli: a plane trimmed in both directions.
#[derive(Debug, Clone)]
pub struct Plane {
    /// `P(0, 0)`.
    pub origin: Point3,
    /// u direction.
    pub x_dir: Dir3,
    /// v direction.
    pub y_dir: Dir3,
}

impl Plane {
    /// Plane through `origin` spanned by `x_dir` and `y_dir`. Lengths are
    /// ignored.
    pub fn new(origin: Point3, x_dir: Vec3, y_dir: Vec3) -> Self {
        Self {
            origin,
            x_dir: Dir3::new_normalize(x_dir),
            y_dir: Dir3::new_normalize(y_dir),
        }
    }

    /// The kernel XY plane.
    pub fn xy() -> Self {
        Self::new(Point3::origin(), Vec3::x(), Vec3::y())
    }

    /// Unit normal, `x_dir × y_dir`.
    pub fn normal(&self) -> Dir3 {
        Dir3::new_normalize(self.x_dir.cross(self.y_dir.as_ref()))
    }
}

impl Surface for Plane {
    fn evaluate(&self, uv: Point2) -> Point3 {
        self.origin + uv.x * self.x_dir.into_inner() + uv.y * self.y_dir.into_inner()
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (UNBOUNDED, UNBOUNDED)
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Plane
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Quadrics of revolution
// =============================================================================

/// Cylinder, `P(u, v) = origin + radius·radial(u) + v·axis`. Unbounded
/// in v.
#[derive(Debug, Clone)]
pub struct CylinderSurface {
    /// Placement; `v = 0` at the frame origin.
    pub frame: AxisFrame,
    /// Radius.
    pub radius: f64,
}

impl CylinderSurface {
    /// Cylinder about the kernel Z axis.
    pub fn new(radius: f64) -> Self {
        Self {
            frame: AxisFrame::z_up(Point3::origin()),
            radius,
        }
    }

    /// Cylinder about `axis` through `center`, arbitrary seam.
    pub fn with_axis(center: Point3, axis: Vec3, radius: f64) -> Self {
        Self {
            frame: AxisFrame::new(center, axis),
            radius,
        }
    }

    /// Cylinder with its seam at `ref_dir`.
    pub fn with_frame(center: Point3, axis: Vec3, ref_dir: Vec3, radius: f64) -> Self {
        Self {
            frame: AxisFrame::with_ref(center, axis, ref_dir),
            radius,
        }
    }
}

impl Surface for CylinderSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        let f = &self.frame;
        f.origin + self.radius * f.radial(uv.x) + uv.y * f.axis.into_inner()
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (FULL_TURN, UNBOUNDED)
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Cylinder
    }

    closure_flags!(u);

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

/// Cone with its apex at the frame origin; `v` is the signed slant
/// distance from the apex:
/// `P(u, v) = apex + v·(cos α·axis + sin α·radial(u))`.
#[derive(Debug, Clone)]
pub struct ConeSurface {
    /// Placement; the origin is the apex.
    pub frame: AxisFrame,
    /// Half-angle `α` in radians.
    pub half_angle: f64,
}

impl ConeSurface {
    /// Cone opening along kernel +Z from the origin.
    pub fn new(half_angle: f64) -> Self {
        Self {
            frame: AxisFrame::z_up(Point3::origin()),
            half_angle,
        }
    }

    /// Cone opening along `axis` from `apex`, arbitrary seam.
    pub fn with_axis(apex: Point3, axis: Vec3, half_angle: f64) -> Self {
        Self {
            frame: AxisFrame::new(apex, axis),
            half_angle,
        }
    }

    /// Cone with its seam at `ref_dir`.
    pub fn with_frame(apex: Point3, axis: Vec3, ref_dir: Vec3, half_angle: f64) -> Self {
        Self {
            frame: AxisFrame::with_ref(apex, axis, ref_dir),
            half_angle,
        }
    }

    /// The apex.
    pub fn apex(&self) -> Point3 {
        self.frame.origin
    }
}

impl Surface for ConeSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        let f = &self.frame;
        let (sa, ca) = self.half_angle.sin_cos();
        f.origin + uv.y * (ca * f.axis.into_inner() + sa * f.radial(uv.x))
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (FULL_TURN, UNBOUNDED)
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Cone
    }

    closure_flags!(u);

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

/// Sphere; `u` is longitude about the frame axis and `v ∈ [-π/2, π/2]` is
/// latitude:
/// `P(u, v) = center + radius·(cos v·radial(u) + sin v·axis)`.
///
/// The polar axis need not coincide with the part's revolution axis; cup
/// caps are often modelled with the pole transverse to it.
#[derive(Debug, Clone)]
pub struct SphereSurface {
    /// Placement; the origin is the center.
    pub frame: AxisFrame,
    /// Radius.
    pub radius: f64,
}

impl SphereSurface {
    /// Sphere at the origin with its pole on kernel +Z.
    pub fn new(radius: f64) -> Self {
        Self {
            frame: AxisFrame::z_up(Point3::origin()),
            radius,
        }
    }

    /// Sphere with an explicit pole and `u = 0` direction.
    pub fn with_frame(center: Point3, axis: Vec3, ref_dir: Vec3, radius: f64) -> Self {
        Self {
            frame: AxisFrame::with_ref(center, axis, ref_dir),
            radius,
        }
    }

    /// The center.
    pub fn center(&self) -> Point3 {
        self.frame.origin
    }
}

impl Surface for SphereSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        let f = &self.frame;
        let (sv, cv) = uv.y.sin_cos();
        f.origin + self.radius * (cv * f.radial(uv.x) + sv * f.axis.into_inner())
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (FULL_TURN, (-FRAC_PI_2, FRAC_PI_2))
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Sphere
    }

    closure_flags!(u);

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

/// Torus; `u` runs around the frame axis, `v` around the tube:
///
/// ```text
/// P(u, v) = center + (R + r·cos v)·radial(u) + r·sin v·axis
/// ```
///
/// Rounded rims show up as torus patches.
#[derive(Debug, Clone)]
pub struct TorusSurface {
    /// Placement; the origin is the center of the ring.
    pub frame: AxisFrame,
    /// `R`: center to tube center.
    pub major_radius: f64,
    /// `r`: tube radius.
    pub minor_radius: f64,
}

impl TorusSurface {
    /// Torus about kernel +Z at the origin.
    pub fn new(major_radius: f64, minor_radius: f64) -> Self {
        Self {
            frame: AxisFrame::z_up(Point3::origin()),
            major_radius,
            minor_radius,
        }
    }

    /// Torus about `axis` through `center`, arbitrary seam.
    pub fn with_axis(center: Point3, axis: Vec3, major_radius: f64, minor_radius: f64) -> Self {
        Self {
            frame: AxisFrame::new(center, axis),
            major_radius,
            minor_radius,
        }
    }
}

impl Surface for TorusSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        let f = &self.frame;
        let (sv, cv) = uv.y.sin_cos();
        f.origin
            + (self.major_radius + self.minor_radius * cv) * f.radial(uv.x)
            + self.minor_radius * sv * f.axis.into_inner()
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (FULL_TURN, FULL_TURN)
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Torus
    }

    closure_flags!(u, v);

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn at(s: &dyn Surface, u: f64, v: f64) -> Point3 {
        s.evaluate(Point2::new(u, v))
    }

    #[test]
    fn test_plane_rim_patch() {
        let rim = Plane::new(Point3::new(0.0, 40.0, 30.0), Vec3::x() * 3.0, Vec3::y());
        assert_abs_diff_eq!(at(&rim, 1.0, 5.0), Point3::new(1.0, 45.0, 30.0), epsilon = 1e-12);
        assert_abs_diff_eq!(rim.normal().into_inner(), Vec3::z(), epsilon = 1e-12);
        assert_eq!(rim.domain(), (UNBOUNDED, UNBOUNDED));
        assert_eq!(Plane::xy().domain().0 .1, INFINITE_PARAMETER);
    }

    #[test]
    fn test_meridian_is_binormal() {
        let f = AxisFrame::z_up(Point3::origin());
        assert_abs_diff_eq!(f.radial(FRAC_PI_2), Vec3::y(), epsilon = 1e-12);
        assert_abs_diff_eq!(f.radial(0.0), Vec3::x(), epsilon = 1e-12);
        assert_abs_diff_eq!(f.binormal(), Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_frame_ref_is_orthogonalized() {
        let f = AxisFrame::with_ref(Point3::origin(), Vec3::z(), Vec3::new(1.0, 0.0, 1.0));
        assert_abs_diff_eq!(f.ref_dir.into_inner(), Vec3::x(), epsilon = 1e-12);
        // a reference along the axis falls back to some perpendicular
        let g = AxisFrame::with_ref(Point3::origin(), Vec3::z(), Vec3::z() * 2.0);
        assert_abs_diff_eq!(g.ref_dir.dot(g.axis.as_ref()), 0.0, epsilon = 1e-12);
        let h = AxisFrame::new(Point3::origin(), Vec3::x());
        assert_abs_diff_eq!(h.ref_dir.dot(h.axis.as_ref()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_wall() {
        let c = CylinderSurface::with_frame(Point3::new(0.0, 0.0, -5.0), Vec3::z(), Vec3::x(), 40.0);
        assert_abs_diff_eq!(at(&c, FRAC_PI_2, 12.0), Point3::new(0.0, 40.0, 7.0), epsilon = 1e-12);
        assert_abs_diff_eq!(at(&c, PI, 0.0), Point3::new(-40.0, 0.0, -5.0), epsilon = 1e-12);
        assert!(c.is_u_closed() && c.is_u_periodic());
        assert!(!c.is_v_closed() && !c.is_v_periodic());
        assert_eq!(c.domain().1, UNBOUNDED);
    }

    #[test]
    fn test_cone_slant_parameter() {
        let half = 0.25_f64;
        let cone = ConeSurface::with_frame(Point3::new(0.0, 0.0, -100.0), Vec3::z(), Vec3::x(), half);
        let v = 60.0;
        let p = at(&cone, FRAC_PI_2, v);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, v * half.sin(), epsilon = 1e-12);
        assert_abs_diff_eq!(p.z, -100.0 + v * half.cos(), epsilon = 1e-12);
        assert_eq!(cone.apex(), Point3::new(0.0, 0.0, -100.0));
        assert!(cone.is_u_periodic());
    }

    #[test]
    fn test_sphere_pole_and_equator() {
        let s = SphereSurface::new(24.0);
        assert_abs_diff_eq!(at(&s, 0.0, FRAC_PI_2), Point3::new(0.0, 0.0, 24.0), epsilon = 1e-12);
        assert_abs_diff_eq!(at(&s, FRAC_PI_2, 0.0), Point3::new(0.0, 24.0, 0.0), epsilon = 1e-12);
        assert_eq!(s.domain().1, (-FRAC_PI_2, FRAC_PI_2));
        assert_eq!(s.center(), Point3::origin());
    }

    #[test]
    fn test_sphere_transverse_pole() {
        // pole along -Y, seam along -X: the u=π/2 meridian runs through -Z
        let s = SphereSurface::with_frame(Point3::origin(), -Vec3::y(), -Vec3::x(), 10.0);
        assert_abs_diff_eq!(at(&s, FRAC_PI_2, 0.0), Point3::new(0.0, 0.0, -10.0), epsilon = 1e-12);
        assert_abs_diff_eq!(at(&s, FRAC_PI_2, -FRAC_PI_2), Point3::new(0.0, 10.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_torus_rounded_rim() {
        let t = TorusSurface::new(44.0, 1.0);
        assert_abs_diff_eq!(at(&t, 0.0, 0.0), Point3::new(45.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(at(&t, FRAC_PI_2, PI), Point3::new(0.0, 43.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(at(&t, 0.0, FRAC_PI_2), Point3::new(44.0, 0.0, 1.0), epsilon = 1e-12);
        assert!(t.is_u_closed() && t.is_v_closed());
        assert!(t.is_v_periodic());
        let tilted = TorusSurface::with_axis(Point3::new(0.0, 0.0, 3.0), Vec3::z(), 44.0, 1.0);
        assert_abs_diff_eq!(at(&tilted, 0.0, FRAC_PI_2).z, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(SurfaceKind::RectangularTrimmed.to_string(), "trimmed");
        assert_eq!(SurfaceKind::Sphere.label(), "sphere");
    }
}
