//! Curve kinds, the [`Curve3d`] trait and the analytic curves.

use std::any::Any;
use std::f64::consts::PI;

use cupline_math::{Dir3, Point3, Vec3};

use crate::{frame_ref, INFINITE_PARAMETER};

// =============================================================================
// Curve types
// =============================================================================

/// The kind of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// Straight line.
    Line,
    /// Circle.
    Circle,
    /// Ellipse.
    Ellipse,
    /// One branch of a hyperbola.
    Hyperbola,
    /// Parabola.
    Parabola,
    /// Non-rational B-spline curve.
    BSpline,
    /// Bézier curve.
    Bezier,
    /// Another curve restricted to a parameter interval.
    Trimmed,
}

impl CurveKind {
    /// Short lowercase label used in reports and logs.
    pub fn label(self) -> &'static str {
        match self {
            CurveKind::Line => "line",
            CurveKind::Circle => "circle",
            CurveKind::Ellipse => "ellipse",
            CurveKind::Hyperbola => "hyperbola",
            CurveKind::Parabola => "parabola",
            CurveKind::BSpline => "bspline",
            CurveKind::Bezier => "bezier",
            CurveKind::Trimmed => "trimmed",
        }
    }
}

impl std::fmt::Display for CurveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A parametric curve in 3D space.
pub trait Curve3d: Send + Sync + std::fmt::Debug {
    /// Evaluate the curve at parameter `t` to get a 3D point.
    fn evaluate(&self, t: f64) -> Point3;

    /// Parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// The kind of this curve.
    fn curve_type(&self) -> CurveKind;

    /// Kind predicate used by the classifier.
    fn is_kind(&self, kind: CurveKind) -> bool {
        self.curve_type() == kind
    }

    /// Whether the curve's end meets its start.
    fn is_closed(&self) -> bool {
        false
    }

    /// Whether the parameterization repeats with a fixed period.
    fn is_periodic(&self) -> bool {
        false
    }

    /// Clone into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Curve3d>;

    /// Downcast support for callers that need the concrete curve.
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Curve3d> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

// =============================================================================
// Line3d
// =============================================================================

/// A 3D line defined by origin and direction.
///
/// Parameterization: `P(t) = origin + t * direction`
#[derive(Debug, Clone)]
pub struct Line3d {
    /// Starting point.
    pub origin: Point3,
    /// Direction; its length sets the parameter speed.
    pub direction: Vec3,
}

impl Line3d {
    /// Create a line from two endpoints, parameterized so `t=0` gives `start` and `t=1` gives `end`.
    pub fn from_points(start: Point3, end: Point3) -> Self {
        Self {
            origin: start,
            direction: end - start,
        }
    }
}

impl Curve3d for Line3d {
    fn evaluate(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    fn domain(&self) -> (f64, f64) {
        (-INFINITE_PARAMETER, INFINITE_PARAMETER)
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::Line
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Conics
// =============================================================================

/// In-plane frame shared by the conics: `(x_dir, y_dir, normal)`.
fn conic_frame(normal: Vec3, x_dir: Option<Vec3>) -> (Dir3, Dir3, Dir3) {
    let n = Dir3::new_normalize(normal);
    let x = match x_dir {
        Some(x) => frame_ref(&n, x),
        None => crate::any_perpendicular(&n),
    };
    let y = Dir3::new_normalize(n.as_ref().cross(x.as_ref()));
    (x, y, n)
}

/// A circle in 3D space defined by center, normal, and radius.
///
/// Parameterization: `P(t) = center + radius * (cos(t) * x_dir + sin(t) * y_dir)`
///
/// Where `t ∈ [0, 2π)`.
#[derive(Debug, Clone)]
pub struct Circle3d {
    /// Center of the circle.
    pub center: Point3,
    /// Radius.
    pub radius: f64,
    /// Reference direction for t=0.
    pub x_dir: Dir3,
    /// Second in-plane direction (perpendicular to x_dir and normal).
    pub y_dir: Dir3,
    /// Normal to the circle plane.
    pub normal: Dir3,
}

impl Circle3d {
    /// Create a circle in the XY plane centered at the given point.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self::with_normal(center, radius, Vec3::z())
    }

    /// Create a circle with a custom normal direction.
    pub fn with_normal(center: Point3, radius: f64, normal: Vec3) -> Self {
        let (x_dir, y_dir, normal) = conic_frame(normal, Some(Vec3::x()));
        Self {
            center,
            radius,
            x_dir,
            y_dir,
            normal,
        }
    }

    /// Create a circle with an explicit `t = 0` direction.
    pub fn with_frame(center: Point3, radius: f64, normal: Vec3, x_dir: Vec3) -> Self {
        let (x_dir, y_dir, normal) = conic_frame(normal, Some(x_dir));
        Self {
            center,
            radius,
            x_dir,
            y_dir,
            normal,
        }
    }
}

impl Curve3d for Circle3d {
    fn evaluate(&self, t: f64) -> Point3 {
        let (sin_t, cos_t) = t.sin_cos();
        self.center + self.radius * (cos_t * self.x_dir.as_ref() + sin_t * self.y_dir.as_ref())
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 2.0 * PI)
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::Circle
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn is_periodic(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An ellipse with its major axis along `x_dir`.
///
/// Parameterization: `P(t) = center + major * cos(t) * x_dir + minor * sin(t) * y_dir`
#[derive(Debug, Clone)]
pub struct Ellipse3d {
    /// Center.
    pub center: Point3,
    /// Semi-major axis length.
    pub major_radius: f64,
    /// Semi-minor axis length.
    pub minor_radius: f64,
    /// Major axis direction.
    pub x_dir: Dir3,
    /// Minor axis direction.
    pub y_dir: Dir3,
    /// Plane normal.
    pub normal: Dir3,
}

impl Ellipse3d {
    /// Create an ellipse in the plane with the given normal.
    pub fn new(
        center: Point3,
        normal: Vec3,
        x_dir: Vec3,
        major_radius: f64,
        minor_radius: f64,
    ) -> Self {
        let (x_dir, y_dir, normal) = conic_frame(normal, Some(x_dir));
        Self {
            center,
            major_radius,
            minor_radius,
            x_dir,
            y_dir,
            normal,
        }
    }
}

impl Curve3d for Ellipse3d {
    fn evaluate(&self, t: f64) -> Point3 {
        let (sin_t, cos_t) = t.sin_cos();
        self.center
            + self.major_radius * cos_t * self.x_dir.as_ref()
            + self.minor_radius * sin_t * self.y_dir.as_ref()
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 2.0 * PI)
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::Ellipse
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn is_periodic(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The positive branch of a hyperbola.
///
/// Parameterization: `P(t) = center + major * cosh(t) * x_dir + minor * sinh(t) * y_dir`
#[derive(Debug, Clone)]
pub struct Hyperbola3d {
    /// Center.
    pub center: Point3,
    /// Distance from center to vertex.
    pub major_radius: f64,
    /// Conjugate semi-axis length.
    pub minor_radius: f64,
    /// Transverse axis direction.
    pub x_dir: Dir3,
    /// Conjugate axis direction.
    pub y_dir: Dir3,
}

impl Hyperbola3d {
    /// Create a hyperbola in the plane with the given normal.
    pub fn new(
        center: Point3,
        normal: Vec3,
        x_dir: Vec3,
        major_radius: f64,
        minor_radius: f64,
    ) -> Self {
        let (x_dir, y_dir, _) = conic_frame(normal, Some(x_dir));
        Self {
            center,
            major_radius,
            minor_radius,
            x_dir,
            y_dir,
        }
    }
}

impl Curve3d for Hyperbola3d {
    fn evaluate(&self, t: f64) -> Point3 {
        self.center
            + self.major_radius * t.cosh() * self.x_dir.as_ref()
            + self.minor_radius * t.sinh() * self.y_dir.as_ref()
    }

    fn domain(&self) -> (f64, f64) {
        (-INFINITE_PARAMETER, INFINITE_PARAMETER)
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::Hyperbola
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A parabola opening along `x_dir`.
///
/// Parameterization: `P(t) = vertex + t² / (4 f) * x_dir + t * y_dir`
#[derive(Debug, Clone)]
pub struct Parabola3d {
    /// Vertex.
    pub vertex: Point3,
    /// Focal length.
    pub focal: f64,
    /// Symmetry axis direction.
    pub x_dir: Dir3,
    /// Direction along the directrix.
    pub y_dir: Dir3,
}

impl Parabola3d {
    /// Create a parabola in the plane with the given normal.
    pub fn new(vertex: Point3, normal: Vec3, x_dir: Vec3, focal: f64) -> Self {
        let (x_dir, y_dir, _) = conic_frame(normal, Some(x_dir));
        Self {
            vertex,
            focal,
            x_dir,
            y_dir,
        }
    }
}

impl Curve3d for Parabola3d {
    fn evaluate(&self, t: f64) -> Point3 {
        self.vertex + (t * t / (4.0 * self.focal)) * self.x_dir.as_ref() + t * self.y_dir.as_ref()
    }

    fn domain(&self) -> (f64, f64) {
        (-INFINITE_PARAMETER, INFINITE_PARAMETER)
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::Parabola
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Trimmed curve
// =============================================================================

/// A basis curve restricted to `[t0, t1]`.
#[derive(Debug, Clone)]
pub struct TrimmedCurve {
    /// The untrimmed curve.
    pub basis: Box<dyn Curve3d>,
    /// Trim interval.
    pub range: (f64, f64),
}

impl TrimmedCurve {
    /// Trim `basis` to `range`.
    pub fn new(basis: Box<dyn Curve3d>, range: (f64, f64)) -> Self {
        Self { basis, range }
    }

    /// Kind of the underlying curve.
    pub fn basis_kind(&self) -> CurveKind {
        self.basis.curve_type()
    }
}

impl Curve3d for TrimmedCurve {
    fn evaluate(&self, t: f64) -> Point3 {
        self.basis.evaluate(t)
    }

    fn domain(&self) -> (f64, f64) {
        self.range
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::Trimmed
    }

    fn is_closed(&self) -> bool {
        let a = self.basis.evaluate(self.range.0);
        let b = self.basis.evaluate(self.range.1);
        (a - b).norm() < 1e-9
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_radius_and_closure() {
        let c = Circle3d::with_normal(Point3::new(0.0, 0.0, 20.0), 14.5, Vec3::z());
        for i in 0..8 {
            let t = i as f64 * PI / 4.0;
            let p = c.evaluate(t);
            let r = (p - c.center).norm();
            assert!((r - 14.5).abs() < 1e-10);
            assert!((p.z - 20.0).abs() < 1e-12);
        }
        assert!(c.is_closed() && c.is_periodic());
    }

    #[test]
    fn test_circle_downcast() {
        let boxed: Box<dyn Curve3d> = Box::new(Circle3d::new(Point3::origin(), 3.0));
        let circle = boxed.as_any().downcast_ref::<Circle3d>();
        assert!(circle.is_some());
        assert!(boxed.as_any().downcast_ref::<Line3d>().is_none());
    }

    #[test]
    fn test_ellipse_extremes() {
        let e = Ellipse3d::new(Point3::origin(), Vec3::z(), Vec3::x(), 5.0, 2.0);
        let p0 = e.evaluate(0.0);
        assert!((p0.x - 5.0).abs() < 1e-12);
        let p1 = e.evaluate(PI / 2.0);
        assert!((p1.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_hyperbola_vertex() {
        let h = Hyperbola3d::new(Point3::origin(), Vec3::z(), Vec3::x(), 3.0, 1.0);
        let v = h.evaluate(0.0);
        assert!((v.x - 3.0).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
    }

    #[test]
    fn test_parabola_focal_relation() {
        let p = Parabola3d::new(Point3::origin(), Vec3::z(), Vec3::x(), 2.0);
        let pt = p.evaluate(4.0);
        // x = t²/(4f) = 16/8
        assert!((pt.x - 2.0).abs() < 1e-12);
        assert!((pt.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_trimmed_arc_is_open() {
        let basis: Box<dyn Curve3d> = Box::new(Circle3d::new(Point3::origin(), 1.0));
        let arc = TrimmedCurve::new(basis.clone(), (0.0, PI));
        assert!(!arc.is_closed());
        assert_eq!(arc.curve_type(), CurveKind::Trimmed);
        assert_eq!(arc.basis_kind(), CurveKind::Circle);
        let full = TrimmedCurve::new(basis, (0.0, 2.0 * PI));
        assert!(full.is_closed());
    }
}
