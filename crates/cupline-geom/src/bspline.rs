//! Non-rational B-spline and Bézier curves and surfaces.
//!
//! A [`KnotVector`] owns span lookup and basis evaluation; curves and
//! surfaces blend control points with its weights. Surfaces are either
//! clamped in both directions ([`BSplineSurface::new`]) or periodic in u,
//! built from a stack of closed control rings
//! ([`BSplineSurface::periodic_u`]). The second form is how tubular
//! fiducial markers come out of a CAD export.

use std::any::Any;

use cupline_math::{Point2, Point3};

use crate::curves::{Curve3d, CurveKind};
use crate::error::{GeomError, Result};
use crate::{Surface, SurfaceKind};

/// Points closer than this count as the same control point.
const COINCIDENT: f64 = 1e-9;

// =============================================================================
// Knots
// =============================================================================

/// A validated, non-decreasing knot vector for `count` control points of
/// a given degree.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotVector {
    knots: Vec<f64>,
    degree: usize,
    count: usize,
}

/// `num / den`, with the B-spline convention `x / 0 = 0`.
fn ratio(num: f64, den: f64) -> f64 {
    if den.abs() < 1e-30 {
        0.0
    } else {
        num / den
    }
}

impl KnotVector {
    /// Check `knots` against `count` control points of `degree`.
    /// `direction` names the parameter in errors.
    pub fn new(
        knots: Vec<f64>,
        count: usize,
        degree: usize,
        direction: &'static str,
    ) -> Result<Self> {
        if count <= degree {
            return Err(GeomError::TooFewControlPoints { degree, count });
        }
        let expected = count + degree + 1;
        if knots.len() != expected || knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(GeomError::InvalidKnots {
                direction,
                len: knots.len(),
                expected,
            });
        }
        Ok(Self {
            knots,
            degree,
            count,
        })
    }

    /// The raw knots.
    pub fn as_slice(&self) -> &[f64] {
        &self.knots
    }

    /// Polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Valid parameter range, `[knots[degree], knots[count]]`.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.count])
    }

    /// Index of the last knot at or below `t`, kept inside
    /// `[degree, count - 1]` so the span is never empty.
    fn span(&self, t: f64) -> usize {
        let p = self.degree;
        let window = &self.knots[p..self.count];
        (p + window.partition_point(|&k| k <= t)).saturating_sub(1).max(p)
    }

    /// The `degree + 1` basis values that are non-zero at `t`, and the index
    /// of the control point the first one weights. `t` is clamped to the
    /// domain.
    pub fn weights(&self, t: f64) -> (usize, Vec<f64>) {
        let (lo, hi) = self.domain();
        let t = cupline_math::clamp(t, lo, hi);
        let p = self.degree;
        let span = self.span(t);
        let k = &self.knots;

        // n[i] holds N(span - p + i) of the degree being built
        let mut n = vec![0.0; p + 1];
        n[p] = 1.0;
        for d in 1..=p {
            for i in (p - d)..=p {
                let g = span + i - p;
                let upper = if i < p { n[i + 1] } else { 0.0 };
                n[i] = ratio(t - k[g], k[g + d] - k[g]) * n[i]
                    + ratio(k[g + d + 1] - t, k[g + d + 1] - k[g + 1]) * upper;
            }
        }
        (span - p, n)
    }
}

/// Clamped knot vector with uniform interior spacing on `[0, 1]`.
pub fn clamped_uniform_knots(count: usize, degree: usize) -> Vec<f64> {
    let interior = count.saturating_sub(degree + 1);
    let step = 1.0 / (interior + 1) as f64;
    std::iter::repeat(0.0)
        .take(degree + 1)
        .chain((1..=interior).map(|i| i as f64 * step))
        .chain(std::iter::repeat(1.0).take(degree + 1))
        .collect()
}

/// Uniform unclamped knots for a u-periodic net of `ring_len` distinct
/// columns. The valid domain is exactly `[0, 1]`.
fn periodic_knots(ring_len: usize, degree: usize) -> Vec<f64> {
    (0..ring_len + 2 * degree + 1)
        .map(|i| (i as f64 - degree as f64) / ring_len as f64)
        .collect()
}

// =============================================================================
// Curves
// =============================================================================

/// A non-rational B-spline curve.
#[derive(Debug, Clone)]
pub struct BSplineCurve {
    /// Control points.
    pub control_points: Vec<Point3>,
    knots: KnotVector,
}

impl BSplineCurve {
    /// Curve over explicit knots.
    pub fn new(control_points: Vec<Point3>, knots: Vec<f64>, degree: usize) -> Result<Self> {
        let knots = KnotVector::new(knots, control_points.len(), degree, "t")?;
        Ok(Self {
            control_points,
            knots,
        })
    }

    /// Curve over clamped uniform knots on `[0, 1]`.
    pub fn clamped_uniform(control_points: Vec<Point3>, degree: usize) -> Result<Self> {
        let knots = clamped_uniform_knots(control_points.len(), degree);
        Self::new(control_points, knots, degree)
    }

    /// Knot vector.
    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    /// Point at `t`, clamped to the domain.
    pub fn eval(&self, t: f64) -> Point3 {
        let (first, w) = self.knots.weights(t);
        let coords = w
            .iter()
            .zip(&self.control_points[first..])
            .fold(Point3::origin().coords, |acc, (&b, p)| acc + b * p.coords);
        Point3::from(coords)
    }
}

impl Curve3d for BSplineCurve {
    fn evaluate(&self, t: f64) -> Point3 {
        self.eval(t)
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain()
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::BSpline
    }

    fn is_closed(&self) -> bool {
        let (t0, t1) = self.knots.domain();
        (self.eval(t0) - self.eval(t1)).norm() < COINCIDENT
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Bézier curve of degree `poles.len() - 1`, on `[0, 1]`.
#[derive(Debug, Clone)]
pub struct BezierCurve {
    inner: BSplineCurve,
}

impl BezierCurve {
    /// Curve through its first and last pole.
    pub fn new(poles: Vec<Point3>) -> Result<Self> {
        let degree = poles.len().saturating_sub(1);
        Ok(Self {
            inner: BSplineCurve::clamped_uniform(poles, degree)?,
        })
    }

    /// Poles.
    pub fn poles(&self) -> &[Point3] {
        &self.inner.control_points
    }
}

impl Curve3d for BezierCurve {
    fn evaluate(&self, t: f64) -> Point3 {
        self.inner.eval(t)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::Bezier
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Surfaces
// =============================================================================

/// Tensor-product B-spline patch over a row-major control net: point
/// `(i, j)` is `control_points[j * n_u + i]`.
#[derive(Debug, Clone)]
pub struct BSplineSurface {
    /// Control net, one row of `n_u` points per v index.
    pub control_points: Vec<Point3>,
    /// Points per row.
    pub n_u: usize,
    /// Rows.
    pub n_v: usize,
    knots_u: KnotVector,
    knots_v: KnotVector,
    periodic_u: bool,
}

impl BSplineSurface {
    /// Patch over explicit knots.
    pub fn new(
        control_points: Vec<Point3>,
        n_u: usize,
        n_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        degree_u: usize,
        degree_v: usize,
    ) -> Result<Self> {
        if control_points.len() != n_u * n_v {
            return Err(GeomError::ControlNet {
                found: control_points.len(),
                n_u,
                n_v,
            });
        }
        Ok(Self {
            knots_u: KnotVector::new(knots_u, n_u, degree_u, "u")?,
            knots_v: KnotVector::new(knots_v, n_v, degree_v, "v")?,
            control_points,
            n_u,
            n_v,
            periodic_u: false,
        })
    }

    /// Patch clamped in both directions over uniform knots on `[0, 1]²`.
    pub fn clamped_uniform(
        control_points: Vec<Point3>,
        n_u: usize,
        n_v: usize,
        degree_u: usize,
        degree_v: usize,
    ) -> Result<Self> {
        Self::new(
            control_points,
            n_u,
            n_v,
            clamped_uniform_knots(n_u, degree_u),
            clamped_uniform_knots(n_v, degree_v),
            degree_u,
            degree_v,
        )
    }

    /// Surface periodic in u from closed control rings.
    ///
    /// `rings[j]` holds the distinct u control points of row j, without
    /// repeating the first at the end. u runs over `[0, 1]` and wraps; v is
    /// clamped uniform on `[0, 1]`.
    pub fn periodic_u(rings: Vec<Vec<Point3>>, degree_u: usize, degree_v: usize) -> Result<Self> {
        let ring_len = rings.first().map_or(0, Vec::len);
        if let Some((index, ring)) = rings.iter().enumerate().find(|(_, r)| r.len() != ring_len) {
            return Err(GeomError::RaggedRings {
                index,
                found: ring.len(),
                expected: ring_len,
            });
        }
        if ring_len <= degree_u {
            return Err(GeomError::TooFewControlPoints {
                degree: degree_u,
                count: ring_len,
            });
        }

        // repeat the first degree_u columns so the net closes smoothly
        let n_u = ring_len + degree_u;
        let n_v = rings.len();
        let control_points = rings
            .iter()
            .flat_map(|ring| ring.iter().cycle().take(n_u).copied())
            .collect();

        let mut surface = Self::new(
            control_points,
            n_u,
            n_v,
            periodic_knots(ring_len, degree_u),
            clamped_uniform_knots(n_v, degree_v),
            degree_u,
            degree_v,
        )?;
        surface.periodic_u = true;
        Ok(surface)
    }

    fn cp(&self, i: usize, j: usize) -> &Point3 {
        &self.control_points[j * self.n_u + i]
    }

    /// Point at `(u, v)`. u wraps on periodic surfaces; everything else is
    /// clamped to the domain.
    pub fn eval(&self, u: f64, v: f64) -> Point3 {
        let u = if self.periodic_u {
            let (lo, hi) = self.knots_u.domain();
            lo + (u - lo).rem_euclid(hi - lo)
        } else {
            u
        };
        let (i0, wu) = self.knots_u.weights(u);
        let (j0, wv) = self.knots_v.weights(v);

        let mut coords = Point3::origin().coords;
        for (dj, bv) in wv.iter().enumerate() {
            for (di, bu) in wu.iter().enumerate() {
                coords += (bu * bv) * self.cp(i0 + di, j0 + dj).coords;
            }
        }
        Point3::from(coords)
    }

    /// u knot vector.
    pub fn knots_u(&self) -> &KnotVector {
        &self.knots_u
    }

    /// v knot vector.
    pub fn knots_v(&self) -> &KnotVector {
        &self.knots_v
    }

    fn first_last_column_meet(&self) -> bool {
        (0..self.n_v).all(|j| (self.cp(0, j) - self.cp(self.n_u - 1, j)).norm() < COINCIDENT)
    }

    fn first_last_row_meet(&self) -> bool {
        (0..self.n_u).all(|i| (self.cp(i, 0) - self.cp(i, self.n_v - 1)).norm() < COINCIDENT)
    }
}

impl Surface for BSplineSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        self.eval(uv.x, uv.y)
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        (self.knots_u.domain(), self.knots_v.domain())
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::BSpline
    }

    fn is_u_closed(&self) -> bool {
        self.periodic_u || self.first_last_column_meet()
    }

    fn is_v_closed(&self) -> bool {
        self.first_last_row_meet()
    }

    fn is_u_periodic(&self) -> bool {
        self.periodic_u
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

/// Bézier patch on `[0, 1]²`, degree one less than the pole counts.
#[derive(Debug, Clone)]
pub struct BezierSurface {
    inner: BSplineSurface,
}

impl BezierSurface {
    /// Patch over a row-major pole grid with `n_u` poles per row.
    pub fn new(poles: Vec<Point3>, n_u: usize, n_v: usize) -> Result<Self> {
        let degree_u = n_u.saturating_sub(1);
        let degree_v = n_v.saturating_sub(1);
        Ok(Self {
            inner: BSplineSurface::clamped_uniform(poles, n_u, n_v, degree_u, degree_v)?,
        })
    }
}

impl Surface for BezierSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        self.inner.eval(uv.x, uv.y)
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        ((0.0, 1.0), (0.0, 1.0))
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Bezier
    }

    fn is_u_closed(&self) -> bool {
        self.inner.first_last_column_meet()
    }

    fn is_v_closed(&self) -> bool {
        self.inner.first_last_row_meet()
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::TAU;

    fn ring(radius: f64, z: f64, n: usize) -> Vec<Point3> {
        (0..n)
            .map(|i| {
                let a = TAU * i as f64 / n as f64;
                Point3::new(radius * a.cos(), radius * a.sin(), z)
            })
            .collect()
    }

    #[test]
    fn test_clamped_uniform_knots() {
        assert_eq!(clamped_uniform_knots(2, 1), vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(
            clamped_uniform_knots(5, 2),
            vec![0.0, 0.0, 0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0, 1.0, 1.0]
        );
        assert_eq!(periodic_knots(4, 1), vec![-0.25, 0.0, 0.25, 0.5, 0.75, 1.0, 1.25]);
    }

    #[test]
    fn test_weights_partition_unity() {
        let kv = KnotVector::new(clamped_uniform_knots(6, 3), 6, 3, "t").unwrap();
        for i in 0..=20 {
            let (first, w) = kv.weights(i as f64 / 20.0);
            assert_eq!(w.len(), 4);
            assert!(first + 4 <= 6);
            assert_abs_diff_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            assert!(w.iter().all(|&b| b >= -1e-12));
        }
        // the ends pick out the end control points
        assert_eq!(kv.weights(0.0), (0, vec![1.0, 0.0, 0.0, 0.0]));
        let (first, w) = kv.weights(1.0);
        assert_eq!(first, 2);
        assert_abs_diff_eq!(w[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_curve_is_polyline() {
        let pts = vec![
            Point3::origin(),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
        ];
        let c = BSplineCurve::new(pts, vec![0.0, 0.0, 0.5, 1.0, 1.0], 1).unwrap();
        assert_abs_diff_eq!(c.eval(0.25), Point3::new(5.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(c.eval(0.5), Point3::new(10.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(c.eval(0.75), Point3::new(10.0, 5.0, 0.0), epsilon = 1e-12);
        // outside the domain clamps
        assert_abs_diff_eq!(c.eval(2.0), Point3::new(10.0, 10.0, 0.0), epsilon = 1e-12);
        assert!(!c.is_closed());
    }

    #[test]
    fn test_quadratic_meridian() {
        // one quadratic span: the midpoint is the average of the chord
        // midpoint and the middle pole
        let c = BSplineCurve::clamped_uniform(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 40.0, 0.0),
                Point3::new(0.0, 40.0, 30.0),
            ],
            2,
        )
        .unwrap();
        assert_abs_diff_eq!(c.eval(0.5), Point3::new(0.0, 30.0, 7.5), epsilon = 1e-12);
        assert_eq!(c.knots().degree(), 2);
        assert_eq!(c.domain(), (0.0, 1.0));
    }

    #[test]
    fn test_rejects_bad_knots() {
        let pts = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let err = BSplineCurve::new(pts.clone(), vec![0.0, 1.0, 1.0], 1).unwrap_err();
        assert!(matches!(err, GeomError::InvalidKnots { expected: 4, .. }));
        let err = BSplineCurve::new(pts.clone(), vec![0.0, 1.0, 0.5, 1.0], 1).unwrap_err();
        assert!(matches!(err, GeomError::InvalidKnots { direction: "t", .. }));
        let err = BSplineCurve::clamped_uniform(pts, 2).unwrap_err();
        assert_eq!(err, GeomError::TooFewControlPoints { degree: 2, count: 2 });
    }

    #[test]
    fn test_bezier_curve() {
        let c = BezierCurve::new(vec![
            Point3::origin(),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(c.curve_type(), CurveKind::Bezier);
        assert_abs_diff_eq!(c.evaluate(0.5), Point3::new(1.0, 0.5, 0.0), epsilon = 1e-12);
        assert_eq!(c.poles().len(), 3);
    }

    #[test]
    fn test_bilinear_patch() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(2.0, 2.0, 4.0),
        ];
        let s = BSplineSurface::clamped_uniform(pts, 2, 2, 1, 1).unwrap();
        assert_abs_diff_eq!(s.eval(0.5, 0.5), Point3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(s.eval(1.0, 0.0), Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert!(!s.is_u_closed() && !s.is_u_periodic() && !s.is_v_closed());
        assert_eq!(s.knots_u().as_slice(), &[0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_control_net_mismatch() {
        let err =
            BSplineSurface::clamped_uniform(vec![Point3::origin(); 3], 2, 2, 1, 1).unwrap_err();
        assert_eq!(
            err,
            GeomError::ControlNet {
                found: 3,
                n_u: 2,
                n_v: 2
            }
        );
    }

    #[test]
    fn test_periodic_tube_wraps() {
        let rings = vec![ring(6.0, 0.0, 8), ring(6.0, 4.0, 8), ring(6.0, 8.0, 8)];
        let s = BSplineSurface::periodic_u(rings, 3, 2).unwrap();
        assert_eq!(s.domain(), ((0.0, 1.0), (0.0, 1.0)));
        assert_eq!(s.n_u, 11);
        assert!(s.is_u_closed() && s.is_u_periodic());
        assert!(!s.is_v_closed() && !s.is_v_periodic());

        for v in [0.0, 0.3, 1.0] {
            assert_abs_diff_eq!(s.eval(0.0, v), s.eval(1.0, v), epsilon = 1e-9);
            assert_abs_diff_eq!(s.eval(0.25, v), s.eval(1.25, v), epsilon = 1e-9);
            assert_abs_diff_eq!(s.eval(0.25, v), s.eval(-0.75, v), epsilon = 1e-9);
        }
        // planar rings: the clamped v ends sit on the first and last ring
        assert_abs_diff_eq!(s.eval(0.4, 0.0).z, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.eval(0.4, 1.0).z, 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_periodic_rejects_bad_rings() {
        let err = BSplineSurface::periodic_u(vec![ring(1.0, 0.0, 6), ring(1.0, 1.0, 5)], 2, 1)
            .unwrap_err();
        assert!(matches!(err, GeomError::RaggedRings { index: 1, found: 5, expected: 6 }));
        let err = BSplineSurface::periodic_u(vec![ring(1.0, 0.0, 3); 2], 3, 1).unwrap_err();
        assert!(matches!(err, GeomError::TooFewControlPoints { degree: 3, count: 3 }));
    }

    #[test]
    fn test_bezier_patch() {
        let poles = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let b = BezierSurface::new(poles, 2, 2).unwrap();
        assert_eq!(b.surface_type(), SurfaceKind::Bezier);
        assert_abs_diff_eq!(
            b.evaluate(Point2::new(0.25, 0.75)),
            Point3::new(0.25, 0.75, 0.0),
            epsilon = 1e-12
        );
        assert!(!b.is_u_closed());
    }
}
