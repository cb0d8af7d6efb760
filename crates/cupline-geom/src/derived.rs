//! Surfaces built from other geometry: trims, extrusions and revolutions.

use cupline_math::{Dir3, Point2, Point3, Vec3};

use crate::curves::Curve3d;
use crate::{Surface, SurfaceKind, FULL_TURN, UNBOUNDED};

const PERIOD_TOL: f64 = 1e-9;

// =============================================================================
// Rectangular trim
// =============================================================================

/// A basis surface restricted to a rectangle of its parameter space.
#[derive(Debug, Clone)]
pub struct RectangularTrimmedSurface {
    /// The untrimmed surface.
    pub basis: Box<dyn Surface>,
    /// Trimmed u interval.
    pub u_bounds: (f64, f64),
    /// Trimmed v interval.
    pub v_bounds: (f64, f64),
}

impl RectangularTrimmedSurface {
    /// Trim `basis` to `u_bounds × v_bounds`.
    pub fn new(basis: Box<dyn Surface>, u_bounds: (f64, f64), v_bounds: (f64, f64)) -> Self {
        Self {
            basis,
            u_bounds,
            v_bounds,
        }
    }

    /// Trim only v, keeping the basis's full u range.
    pub fn trim_v(basis: Box<dyn Surface>, v_bounds: (f64, f64)) -> Self {
        let (u_bounds, _) = basis.domain();
        Self::new(basis, u_bounds, v_bounds)
    }

    /// Kind of the underlying surface.
    pub fn basis_kind(&self) -> SurfaceKind {
        self.basis.surface_type()
    }

    fn spans(trim: (f64, f64), full: (f64, f64)) -> bool {
        ((trim.1 - trim.0) - (full.1 - full.0)).abs() < PERIOD_TOL
    }
}

impl Surface for RectangularTrimmedSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        self.basis.evaluate(uv)
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (self.u_bounds, self.v_bounds)
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::RectangularTrimmed
    }

    fn is_u_closed(&self) -> bool {
        self.basis.is_u_closed() && Self::spans(self.u_bounds, self.basis.domain().0)
    }

    fn is_v_closed(&self) -> bool {
        self.basis.is_v_closed() && Self::spans(self.v_bounds, self.basis.domain().1)
    }

    fn is_u_periodic(&self) -> bool {
        self.basis.is_u_periodic() && Self::spans(self.u_bounds, self.basis.domain().0)
    }

    fn is_v_periodic(&self) -> bool {
        self.basis.is_v_periodic() && Self::spans(self.v_bounds, self.basis.domain().1)
    }

    fn trimmed_basis(&self) -> Option<&dyn Surface> {
        Some(self.basis.as_ref())
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Linear extrusion
// =============================================================================

/// A curve swept along a fixed direction.
///
/// Parameterization: `P(u, v) = C(u) + v * direction`
#[derive(Debug, Clone)]
pub struct SurfaceOfLinearExtrusion {
    /// Profile curve.
    pub curve: Box<dyn Curve3d>,
    /// Sweep direction.
    pub direction: Dir3,
}

impl SurfaceOfLinearExtrusion {
    /// Extrude `curve` along `direction`.
    pub fn new(curve: Box<dyn Curve3d>, direction: Vec3) -> Self {
        Self {
            curve,
            direction: Dir3::new_normalize(direction),
        }
    }
}

impl Surface for SurfaceOfLinearExtrusion {
    fn evaluate(&self, uv: Point2) -> Point3 {
        self.curve.evaluate(uv.x) + uv.y * self.direction.as_ref()
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (self.curve.domain(), UNBOUNDED)
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::LinearExtrusion
    }

    fn is_u_closed(&self) -> bool {
        self.curve.is_closed()
    }

    fn is_u_periodic(&self) -> bool {
        self.curve.is_periodic()
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Revolution
// =============================================================================

/// A meridian curve revolved about an axis.
///
/// `u` is the rotation angle, `v` the curve parameter.
#[derive(Debug, Clone)]
pub struct SurfaceOfRevolution {
    /// Meridian curve.
    pub curve: Box<dyn Curve3d>,
    /// A point on the axis.
    pub axis_origin: Point3,
    /// Axis direction.
    pub axis: Dir3,
}

impl SurfaceOfRevolution {
    /// Revolve `curve` about the line through `axis_origin` along `axis`.
    pub fn new(curve: Box<dyn Curve3d>, axis_origin: Point3, axis: Vec3) -> Self {
        Self {
            curve,
            axis_origin,
            axis: Dir3::new_normalize(axis),
        }
    }
}

impl Surface for SurfaceOfRevolution {
    fn evaluate(&self, uv: Point2) -> Point3 {
        // Rodrigues rotation of the meridian point about the axis
        let p = self.curve.evaluate(uv.y) - self.axis_origin;
        let k = self.axis.as_ref();
        let (sin_u, cos_u) = uv.x.sin_cos();
        let rotated = p * cos_u + k.cross(&p) * sin_u + k * k.dot(&p) * (1.0 - cos_u);
        self.axis_origin + rotated
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (FULL_TURN, self.curve.domain())
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Revolution
    }

    fn is_u_closed(&self) -> bool {
        true
    }

    fn is_v_closed(&self) -> bool {
        self.curve.is_closed()
    }

    fn is_u_periodic(&self) -> bool {
        true
    }

    fn is_v_periodic(&self) -> bool {
        self.curve.is_periodic()
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{Circle3d, Line3d, TrimmedCurve};
    use crate::{ConeSurface, CylinderSurface, INFINITE_PARAMETER};
    use std::f64::consts::PI;

    #[test]
    fn test_trimmed_cone_keeps_periodicity() {
        let cone = ConeSurface::new(0.3);
        let trimmed = RectangularTrimmedSurface::trim_v(Box::new(cone.clone()), (1.0, 5.0));
        assert!(trimmed.is_u_closed() && trimmed.is_u_periodic());
        assert!(!trimmed.is_v_closed());
        assert_eq!(trimmed.basis_kind(), SurfaceKind::Cone);
        assert_eq!(trimmed.surface_type(), SurfaceKind::RectangularTrimmed);
        assert_eq!(trimmed.domain().1, (1.0, 5.0));
        let uv = Point2::new(1.0, 2.0);
        assert!((trimmed.evaluate(uv) - cone.evaluate(uv)).norm() < 1e-12);
    }

    #[test]
    fn test_partial_trim_is_open() {
        let half = RectangularTrimmedSurface::new(
            Box::new(CylinderSurface::new(1.0)),
            (0.0, PI),
            (0.0, 1.0),
        );
        assert!(!half.is_u_closed());
        assert!(!half.is_u_periodic());
    }

    #[test]
    fn test_extrusion_of_circle_is_cylinder_like() {
        let circle = Circle3d::new(Point3::origin(), 2.0);
        let ext = SurfaceOfLinearExtrusion::new(Box::new(circle), Vec3::z());
        let p = ext.evaluate(Point2::new(PI / 2.0, 3.0));
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
        assert!((p.z - 3.0).abs() < 1e-12);
        assert!(ext.is_u_closed() && ext.is_u_periodic());
        assert_eq!(ext.domain().1 .1, INFINITE_PARAMETER);
    }

    #[test]
    fn test_revolution_of_segment() {
        // Segment from (5,0,0) to (5,0,10) revolved about Z is a cylinder of radius 5.
        let line = Line3d::from_points(Point3::new(5.0, 0.0, 0.0), Point3::new(5.0, 0.0, 10.0));
        let seg = TrimmedCurve::new(Box::new(line), (0.0, 1.0));
        let rev = SurfaceOfRevolution::new(Box::new(seg), Point3::origin(), Vec3::z());
        let p = rev.evaluate(Point2::new(PI / 2.0, 0.5));
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 5.0).abs() < 1e-12);
        assert!((p.z - 5.0).abs() < 1e-12);
        assert!(rev.is_u_periodic());
        assert!(!rev.is_v_closed());
    }
}
