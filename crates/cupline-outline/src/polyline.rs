//! Polyline compaction and fiducial curve construction.

use cupline_math::{widen3, Point2D, Point3, Point3D, Vec3};
use tracing::debug;

use crate::{OutlineError, Result};

/// RDP tolerance applied to fiducial curves before they are written.
pub const FIDUCIAL_SIMPLIFY_TOLERANCE: f32 = 0.01;

/// Smallest tangent axial component accepted by [`extend_to_plane`].
const MIN_AXIAL_TANGENT: f64 = 1e-9;

/// Drop points whose first coordinate is within `tol` of the last kept one.
///
/// The first point is always kept. Only `x` is compared: two points with the
/// same axial position but different radii count as duplicates.
pub fn remove_dupes(points: &[Point2D], tol: f32) -> Vec<Point2D> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let mut kept = vec![*first];
    let mut last_x = first.x;
    for p in &points[1..] {
        if (p.x - last_x).abs() > tol {
            kept.push(*p);
            last_x = p.x;
        }
    }
    if kept.len() < points.len() {
        debug!(removed = points.len() - kept.len(), "removed duplicate points");
    }
    kept
}

// =============================================================================
// Ramer–Douglas–Peucker
// =============================================================================

/// Simplify a 3D polyline with recursive Ramer–Douglas–Peucker.
///
/// Interior points are dropped when they lie within `tol` of the chord
/// through the kept neighbours. Endpoints are always kept.
pub fn simplify_polyline(points: &[Point3D], tol: f32) -> Vec<Point3D> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let wide: Vec<Point3> = points.iter().map(widen3).collect();
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    rdp(&wide, f64::from(tol.max(0.0)), 0, points.len() - 1, &mut keep);

    points
        .iter()
        .zip(&keep)
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect()
}

fn rdp(points: &[Point3], tol: f64, start: usize, end: usize, keep: &mut [bool]) {
    if end <= start + 1 {
        return;
    }
    let mut max_idx = start;
    let mut max_dist = -1.0;
    for i in start + 1..end {
        let d = chord_distance(&points[i], &points[start], &points[end]);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }
    if max_dist > tol {
        keep[max_idx] = true;
        rdp(points, tol, start, max_idx, keep);
        rdp(points, tol, max_idx, end, keep);
    }
}

/// Perpendicular distance from `p` to the line through `a` and `b`, or the
/// distance to `a` when the two coincide.
fn chord_distance(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let len = ab.norm();
    if len <= 1e-12 {
        return ap.norm();
    }
    ab.cross(&ap).norm() / len
}

// =============================================================================
// Fiducial curves
// =============================================================================

/// A 3D reference polyline in profile space (`y` is axial).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiducialCurve {
    points: Vec<Point3D>,
}

impl FiducialCurve {
    /// Wrap an existing polyline.
    pub fn from_points(points: Vec<Point3D>) -> Self {
        Self { points }
    }

    /// Points in order.
    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    /// Take the points.
    pub fn into_points(self) -> Vec<Point3D> {
        self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add extrapolated endpoints on the plane `y = axial`.
    pub fn extend_to_plane(&mut self, axial: f32) -> Result<()> {
        self.points = extend_to_plane(&self.points, axial)?;
        Ok(())
    }

    /// A copy simplified with [`simplify_polyline`].
    pub fn simplified(&self, tol: f32) -> Self {
        Self::from_points(simplify_polyline(&self.points, tol))
    }
}

/// Prepend and append points on the plane `y = axial`, continuing the first
/// and last segments in a straight line.
///
/// Each end moves along the unit tangent of its end segment, pointing away
/// from the curve, by the signed distance that brings `y` to `axial`.
pub fn extend_to_plane(points: &[Point3D], axial: f32) -> Result<Vec<Point3D>> {
    let n = points.len();
    if n < 2 {
        return Err(OutlineError::DegenerateGeometry(format!(
            "cannot extend a polyline of {n} point(s)"
        )));
    }
    let axial = f64::from(axial);
    let head = extrapolate(&widen3(&points[1]), &widen3(&points[0]), axial, "start")?;
    let tail = extrapolate(&widen3(&points[n - 2]), &widen3(&points[n - 1]), axial, "end")?;

    let mut out = Vec::with_capacity(n + 2);
    out.push(head);
    out.extend_from_slice(points);
    out.push(tail);
    Ok(out)
}

/// Continue the segment `from -> to` past `to` until `y == axial`.
fn extrapolate(from: &Point3, to: &Point3, axial: f64, end: &str) -> Result<Point3D> {
    let d: Vec3 = to - from;
    let len = d.norm();
    if len <= f64::EPSILON {
        return Err(OutlineError::DegenerateGeometry(format!(
            "zero-length tangent at the {end} of the fiducial curve"
        )));
    }
    let t = d / len;
    if t.y.abs() < MIN_AXIAL_TANGENT {
        return Err(OutlineError::DegenerateGeometry(format!(
            "tangent at the {end} of the fiducial curve is parallel to the reference plane"
        )));
    }
    let s = (axial - to.y) / t.y;
    let p = to + t * s;
    Ok(Point3D::new(p.x as f32, p.y as f32, p.z as f32))
}
