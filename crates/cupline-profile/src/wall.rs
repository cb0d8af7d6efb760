//! Wall construction.

use std::f64::consts::FRAC_PI_2;

use cupline_geom::Surface;
use cupline_math::{narrow2, Point3};
use cupline_sample::{evaluate_profile, finite_bounds, sample_meridian, Bounds};
use tracing::{debug, warn};

use crate::{NormalOffset, ProfileError, Result, ShellSurfaces, WallProfile, WallSampling};

/// u of the symmetry meridian every shell surface is sampled along.
pub const MERIDIAN_U: f64 = FRAC_PI_2;

const EPS: f64 = 1e-9;

fn bounds(surface: &dyn Surface, role: &'static str) -> Result<Bounds> {
    finite_bounds(surface).ok_or(ProfileError::UnboundedParameter { role })
}

fn meridian(
    surface: &dyn Surface,
    role: &'static str,
    v_from: f64,
    v_to: f64,
    steps: usize,
) -> Result<Vec<Point3>> {
    sample_meridian(surface, MERIDIAN_U, v_from, v_to, steps)
        .ok_or(ProfileError::UnboundedParameter { role })
}

/// Build a wall with the default [`WallSampling`].
pub fn build_wall(
    shell: &ShellSurfaces<'_>,
    thickness: f64,
    offset: NormalOffset,
) -> Result<WallProfile> {
    build_wall_with(shell, thickness, offset, WallSampling::default())
}

/// Build a wall from `shell`, optionally pushed by `thickness`.
///
/// The cone's meridian tangent between its minimum and mid v, with its
/// two in-plane components swapped, is the offset direction `(wy, wz)`
/// for the whole wall. Sphere samples beyond the (shifted) start of the
/// cone are dropped; the sphere itself is never offset.
pub fn build_wall_with(
    shell: &ShellSurfaces<'_>,
    thickness: f64,
    offset: NormalOffset,
    sampling: WallSampling,
) -> Result<WallProfile> {
    if !thickness.is_finite() {
        return Err(ProfileError::PreconditionViolation(format!(
            "thickness must be finite, got {thickness}"
        )));
    }
    let t = thickness * offset.sign();

    // ----- transition point and normal from the cone -----
    let cb = bounds(shell.cone, "cone")?;
    let start = evaluate_profile(shell.cone, MERIDIAN_U, cb.v_min);
    let mid = evaluate_profile(shell.cone, MERIDIAN_U, cb.v_mid());
    let (dy, dz) = (mid.y - start.y, mid.z - start.z);
    let len = (dy * dy + dz * dz).sqrt();
    if len < EPS {
        return Err(ProfileError::DegenerateGeometry(
            "cone meridian has zero length between v_min and v_mid".into(),
        ));
    }
    // swap the tangent components to get the normal
    let (wy, wz) = (dz / len, dy / len);
    if offset != NormalOffset::None && wz.abs() < EPS {
        return Err(ProfileError::DegenerateGeometry(format!(
            "offset normal has no radial component (wy={wy}, wz={wz})"
        )));
    }
    let transition = start.y + wy * t;
    debug!(transition, wy, wz, t, "cone transition");

    let mut points = Vec::with_capacity(
        sampling.sphere_steps + sampling.cone_steps + sampling.rim_steps + 3,
    );

    // ----- sphere: v_min → v_mid, kept samples go to the front -----
    let sb = bounds(shell.sphere, "sphere")?;
    let mut rejected = 0usize;
    for p in meridian(shell.sphere, "sphere", sb.v_min, sb.v_mid(), sampling.sphere_steps)? {
        if p.y > transition {
            rejected += 1;
            continue;
        }
        points.insert(0, narrow2(p.y, p.z));
    }
    if rejected > 0 {
        debug!(rejected, "sphere samples past the cone start dropped");
    }

    // ----- cone and rim, offset along (wy, wz) -----
    for p in meridian(shell.cone, "cone", cb.v_min, cb.v_max, sampling.cone_steps)? {
        points.push(narrow2(p.y + wy * t, p.z + wz * t));
    }
    if let Some(rim) = shell.rim {
        let rb = bounds(rim, "rim")?;
        for p in meridian(rim, "rim", rb.v_min, rb.v_max, sampling.rim_steps)? {
            points.push(narrow2(p.y + wy * t, p.z + wz * t));
        }
    }

    let wall = WallProfile::from_points(points);
    if !wall.is_axially_monotonic() {
        warn!("wall profile is not monotonic in the axial coordinate");
    }
    Ok(wall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CorrectionPoint;
    use approx::assert_abs_diff_eq;
    use cupline_geom::{
        ConeSurface, CylinderSurface, Plane, RectangularTrimmedSurface, SphereSurface,
    };
    use cupline_math::Vec3;
    use std::f64::consts::PI;

    /// Hemisphere of radius 10 whose rim sits at axial -0.5, radius 10.
    fn cap() -> SphereSurface {
        SphereSurface::with_frame(Point3::new(0.0, 0.0, -0.5), -Vec3::y(), -Vec3::x(), 10.0)
    }

    /// Cone from (axial 0, radius 10) to (axial 20, radius 12).
    fn wall() -> RectangularTrimmedSurface {
        let half = (2.0_f64 / 20.0).atan();
        let cone = ConeSurface::with_frame(Point3::new(0.0, 0.0, -100.0), Vec3::z(), Vec3::x(), half);
        RectangularTrimmedSurface::trim_v(
            Box::new(cone),
            (100.0 / half.cos(), 120.0 / half.cos()),
        )
    }

    /// Flat ring at axial 20, radius 12 → 14.
    fn top() -> RectangularTrimmedSurface {
        let plane = Plane::new(Point3::new(0.0, 12.0, 20.0), Vec3::x(), Vec3::y());
        RectangularTrimmedSurface::new(Box::new(plane), (0.0, PI), (0.0, 2.0))
    }

    #[test]
    fn test_wall_runs_apex_to_rim() {
        let (s, c, r) = (cap(), wall(), top());
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: Some(&r),
        };
        let w = build_wall(&shell, 2.0, NormalOffset::None).unwrap();
        assert_eq!(w.len(), 41 + 41 + 5);
        assert!(w.is_axially_monotonic());

        let first = w.points()[0];
        assert_abs_diff_eq!(first.x, -10.5, epsilon = 1e-4);
        assert_abs_diff_eq!(first.y, 0.0, epsilon = 1e-4);
        let last = w.points()[w.len() - 1];
        assert_abs_diff_eq!(last.x, 20.0, epsilon = 1e-4);
        assert_abs_diff_eq!(last.y, 14.0, epsilon = 1e-4);
        // cone start follows the last sphere sample
        assert_abs_diff_eq!(w.points()[41].x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(w.points()[41].y, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_outward_offset_moves_cone_and_rim_only() {
        let (s, c, r) = (cap(), wall(), top());
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: Some(&r),
        };
        let plain = build_wall(&shell, 2.0, NormalOffset::None).unwrap();
        let outer = build_wall(&shell, 2.0, NormalOffset::Outward).unwrap();
        assert_eq!(plain.len(), outer.len());

        // tangent (10, 1)/√101 swapped → (1, 10)/√101
        let l = 101.0_f32.sqrt();
        let (wy, wz) = (1.0 / l, 10.0 / l);
        for i in 0..41 {
            assert_eq!(plain.points()[i], outer.points()[i]);
        }
        for i in 41..plain.len() {
            let a = plain.points()[i];
            let b = outer.points()[i];
            assert_abs_diff_eq!(b.x - a.x, 2.0 * wy, epsilon = 1e-4);
            assert_abs_diff_eq!(b.y - a.y, 2.0 * wz, epsilon = 1e-4);
        }

        let inner = build_wall(&shell, 2.0, NormalOffset::Inward).unwrap();
        assert_abs_diff_eq!(inner.points()[41].y, 10.0 - 2.0 * wz, epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_samples_past_transition_dropped() {
        // Lift the cap so its upper half overlaps the cone start at axial 0.
        let s = SphereSurface::with_frame(Point3::new(0.0, 0.0, 5.0), -Vec3::y(), -Vec3::x(), 10.0);
        let c = wall();
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: None,
        };
        let w = build_wall(&shell, 0.0, NormalOffset::None).unwrap();
        assert!(w.len() < 41 + 41);
        assert!(w.len() > 41);
        assert!(w.points()[..w.len() - 41].iter().all(|p| p.x <= 0.0));
    }

    /// Point sphere at the origin, cylindrical wall r=40 over axial 0..30,
    /// flat rim 40→45 at axial 30.
    fn flat_disk(
        apex_axial: f64,
    ) -> (SphereSurface, RectangularTrimmedSurface, RectangularTrimmedSurface) {
        let apex = Point3::new(0.0, 0.0, apex_axial);
        let s = SphereSurface::with_frame(apex, Vec3::z(), Vec3::x(), 0.0);
        let c = RectangularTrimmedSurface::trim_v(
            Box::new(CylinderSurface::with_frame(Point3::origin(), Vec3::z(), Vec3::x(), 40.0)),
            (0.0, 30.0),
        );
        let r = RectangularTrimmedSurface::new(
            Box::new(Plane::new(Point3::new(0.0, 40.0, 30.0), Vec3::x(), Vec3::y())),
            (0.0, PI),
            (0.0, 5.0),
        );
        (s, c, r)
    }

    #[test]
    fn test_flat_disk_is_40_40_4_intervals_plus_3_endpoints() {
        let (s, c, r) = flat_disk(0.0);
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: Some(&r),
        };
        let mut w = build_wall(&shell, 2.0, NormalOffset::Outward).unwrap();
        // WallSampling counts intervals; each surface also contributes its
        // closing endpoint: 40 + 40 + 4 + 3 = 41 + 41 + 5
        let sampling = WallSampling::default();
        assert_eq!(
            (sampling.sphere_steps, sampling.cone_steps, sampling.rim_steps),
            (40, 40, 4)
        );
        assert_eq!(w.len(), 40 + 40 + 4 + 3);

        w.append_corrections(&[
            CorrectionPoint {
                axial: None,
                radius: 47.5,
            },
            CorrectionPoint {
                axial: Some(31.0),
                radius: 48.0,
            },
        ]);
        assert_eq!(w.len(), 40 + 40 + 4 + 3 + 2);
        assert_abs_diff_eq!(w.points()[0].y, 0.0, epsilon = 1e-6);
        assert_eq!(w.points()[w.len() - 1].y, 48.0);
        // wall normal is purely radial: radius pushed by the thickness
        assert_abs_diff_eq!(w.points()[41].y, 42.0, epsilon = 1e-4);
        assert_abs_diff_eq!(w.points()[41].x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_sample_at_transition_is_kept() {
        // every sample of the point sphere sits exactly on the cone start
        let (s, c, r) = flat_disk(0.0);
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: Some(&r),
        };
        let w = build_wall(&shell, 0.0, NormalOffset::None).unwrap();
        assert_eq!(w.len(), 41 + 41 + 5);
        assert!(w.points()[..41].iter().all(|p| p.x == 0.0));

        // nudged just past it, every sample is dropped
        let (s, c, r) = flat_disk(1e-6);
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: Some(&r),
        };
        let w = build_wall(&shell, 0.0, NormalOffset::None).unwrap();
        assert_eq!(w.len(), 41 + 5);
        assert_eq!(w.points()[0].x, 0.0);
    }

    #[test]
    fn test_unbounded_cone_rejected() {
        let s = cap();
        let c = ConeSurface::new(0.1);
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: None,
        };
        let err = build_wall(&shell, 1.0, NormalOffset::None).unwrap_err();
        assert_eq!(err, ProfileError::UnboundedParameter { role: "cone" });
    }

    #[test]
    fn test_unbounded_rim_rejected() {
        let (s, c) = (cap(), wall());
        let rim = Plane::xy();
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: Some(&rim),
        };
        let err = build_wall(&shell, 1.0, NormalOffset::None).unwrap_err();
        assert_eq!(err, ProfileError::UnboundedParameter { role: "rim" });
    }

    #[test]
    fn test_degenerate_cone() {
        // cylinder trimmed to a single v: start and mid coincide
        let s = cap();
        let c = RectangularTrimmedSurface::trim_v(Box::new(CylinderSurface::new(5.0)), (3.0, 3.0));
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: None,
        };
        let err = build_wall(&shell, 1.0, NormalOffset::Outward).unwrap_err();
        assert!(matches!(err, ProfileError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_offset_needs_radial_normal() {
        // A flat annulus as the "cone": tangent is purely radial, so wz = 0.
        let s = cap();
        let c = RectangularTrimmedSurface::new(
            Box::new(Plane::new(Point3::new(0.0, 10.0, 0.0), Vec3::x(), Vec3::y())),
            (0.0, PI),
            (0.0, 2.0),
        );
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: None,
        };
        let err = build_wall(&shell, 1.0, NormalOffset::Outward).unwrap_err();
        assert!(matches!(err, ProfileError::DegenerateGeometry(_)));
        // without an offset the same stack is fine
        assert!(build_wall(&shell, 1.0, NormalOffset::None).is_ok());
    }

    #[test]
    fn test_non_finite_thickness() {
        let (s, c) = (cap(), wall());
        let shell = ShellSurfaces {
            sphere: &s,
            cone: &c,
            rim: None,
        };
        let err = build_wall(&shell, f64::NAN, NormalOffset::Outward).unwrap_err();
        assert!(matches!(err, ProfileError::PreconditionViolation(_)));
    }
}
