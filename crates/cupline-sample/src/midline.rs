//! Centerline and radial outline of a surface closed around its axis.

use cupline_geom::{classify, Surface};
use cupline_math::{narrow2, narrow3, Point2D, Point3, Point3D};
use tracing::{debug, warn};

use crate::{evaluate_profile, finite_bounds, parameter_steps};

/// Result of [`extract_midline`]: one entry per v sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Midline {
    /// Centroid of each u cross-section, profile space.
    pub centerline: Vec<Point3D>,
    /// `(axial, radius)` of the cross-section point nearest the profile axis.
    pub outline: Vec<Point2D>,
}

/// Extract the centerline and inner outline of a surface that wraps around
/// in u and runs open along v.
///
/// For each of the `nv + 1` v values the `nu + 1` u samples are averaged
/// into a centerline point, and the sample with the smallest `x² + z²`
/// (squared distance from the profile Y axis) becomes an outline point.
///
/// Returns `None` when u is not both closed and periodic, when v is closed
/// or periodic, when the surface is unbounded, or when `nu` or `nv` is zero.
pub fn extract_midline(surface: &dyn Surface, nu: usize, nv: usize) -> Option<Midline> {
    let kind = classify(surface);
    if !(surface.is_u_closed() && surface.is_u_periodic()) {
        warn!(?kind, "midline needs a surface closed and periodic in u");
        return None;
    }
    if surface.is_v_closed() || surface.is_v_periodic() {
        warn!(?kind, "midline needs a surface open in v");
        return None;
    }
    if nu == 0 || nv == 0 {
        return None;
    }
    let b = finite_bounds(surface)?;
    debug!(?kind, nu, nv, "extracting midline");

    let us = parameter_steps(b.u_min, b.u_max, nu);
    let weight = 1.0 / us.len() as f64;

    let mut centerline = Vec::with_capacity(nv + 1);
    let mut outline = Vec::with_capacity(nv + 1);
    for v in parameter_steps(b.v_min, b.v_max, nv) {
        let mut sum = Point3::origin();
        let mut nearest: Option<(f64, Point3)> = None;
        for &u in &us {
            let p = evaluate_profile(surface, u, v);
            sum.coords += p.coords;
            let d2 = p.x * p.x + p.z * p.z;
            if nearest.map_or(true, |(best, _)| d2 < best) {
                nearest = Some((d2, p));
            }
        }
        centerline.push(narrow3(&Point3::from(sum.coords * weight)));
        if let Some((d2, p)) = nearest {
            outline.push(narrow2(p.y, d2.sqrt()));
        }
    }

    Some(Midline {
        centerline,
        outline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_surfaces::Patch;
    use cupline_geom::{BSplineSurface, ConeSurface, CylinderSurface, RectangularTrimmedSurface};
    use cupline_math::Point3 as P3;
    use std::f64::consts::TAU;

    #[test]
    fn test_precondition_flags() {
        let mut patch = Patch::new(((0.0, 1.0), (0.0, 1.0)));
        // open in u
        assert!(extract_midline(&patch, 8, 8).is_none());

        // closed but not periodic in u
        patch.u_closed = true;
        assert!(extract_midline(&patch, 8, 8).is_none());

        patch.u_periodic = true;
        assert!(extract_midline(&patch, 8, 8).is_some());

        // closed or periodic in v
        patch.v_closed = true;
        assert!(extract_midline(&patch, 8, 8).is_none());
        patch.v_closed = false;
        patch.v_periodic = true;
        assert!(extract_midline(&patch, 8, 8).is_none());
    }

    #[test]
    fn test_zero_counts() {
        let mut patch = Patch::new(((0.0, 1.0), (0.0, 1.0)));
        patch.u_closed = true;
        patch.u_periodic = true;
        assert!(extract_midline(&patch, 0, 4).is_none());
        assert!(extract_midline(&patch, 4, 0).is_none());
    }

    #[test]
    fn test_cylinder_midline() {
        let cyl = RectangularTrimmedSurface::trim_v(Box::new(CylinderSurface::new(3.0)), (0.0, 10.0));
        let nu = 256;
        let m = extract_midline(&cyl, nu, 10).unwrap();
        assert_eq!(m.centerline.len(), 11);
        assert_eq!(m.outline.len(), 11);
        for (k, (c, o)) in m.centerline.iter().zip(&m.outline).enumerate() {
            let v = k as f32;
            assert!((c.y - v).abs() < 1e-5);
            // u = 0 and u = 2π both land in the average
            assert!((c.x - 3.0 / (nu as f32 + 1.0)).abs() < 1e-4);
            assert!(c.z.abs() < 1e-4);
            assert!((o.x - v).abs() < 1e-5);
            assert!((o.y - 3.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cone_outline_radius_grows() {
        let half = 0.2_f64;
        let cone = RectangularTrimmedSurface::trim_v(Box::new(ConeSurface::new(half)), (1.0, 5.0));
        let m = extract_midline(&cone, 64, 4).unwrap();
        for (k, o) in m.outline.iter().enumerate() {
            let v = 1.0 + k as f64;
            assert!((o.x as f64 - v * half.cos()).abs() < 1e-5);
            assert!((o.y as f64 - v * half.sin()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_periodic_bspline_midline_on_axis() {
        let ring = |r: f64, z: f64| -> Vec<P3> {
            (0..8)
                .map(|i| {
                    let a = TAU * i as f64 / 8.0;
                    P3::new(r * a.cos(), r * a.sin(), z)
                })
                .collect()
        };
        let s = BSplineSurface::periodic_u(vec![ring(6.0, 0.0), ring(6.0, 4.0), ring(6.0, 8.0)], 3, 2)
            .unwrap();
        let m = extract_midline(&s, 100, 8).unwrap();
        assert!((m.centerline[0].y - 0.0).abs() < 1e-5);
        assert!((m.centerline[8].y - 8.0).abs() < 1e-5);
        for c in &m.centerline {
            assert!(c.x.abs() < 0.1 && c.z.abs() < 0.1);
        }
        for o in &m.outline {
            assert!(o.y > 0.0 && o.y < 6.0);
        }
    }
}
