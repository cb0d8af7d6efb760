#![warn(missing_docs)]

//! Surface sampling for cupline.
//!
//! Every sampler here reads the surface's parameter bounds first and refuses
//! surfaces that extend without bound ([`finite_bounds`]). Parameter values
//! are spaced evenly and clamped into the bounds so floating-point overshoot
//! never leaves the domain. Evaluated points are returned in profile space
//! (see [`cupline_math::to_profile_space`]).

use cupline_geom::Surface;
use cupline_math::{clamp, narrow2, narrow3, to_profile_space, Point2, Point2D, Point3, Point3D};
use tracing::debug;

mod gnuplot;
mod midline;

pub use gnuplot::{gnuplot_file_name, save_gnuplot_grid, write_gnuplot_grid};
pub use midline::{extract_midline, Midline};

/// Bound magnitude at or above which a surface counts as unbounded.
pub const UNBOUNDED_THRESHOLD: f64 = 2.0e99;

/// Finite parameter bounds of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum u.
    pub u_min: f64,
    /// Maximum u.
    pub u_max: f64,
    /// Minimum v.
    pub v_min: f64,
    /// Maximum v.
    pub v_max: f64,
}

impl Bounds {
    /// Midpoint of the v interval.
    pub fn v_mid(&self) -> f64 {
        0.5 * (self.v_min + self.v_max)
    }
}

/// The surface's bounds, or `None` when any of the four reaches
/// [`UNBOUNDED_THRESHOLD`] in magnitude.
pub fn finite_bounds(surface: &dyn Surface) -> Option<Bounds> {
    let ((u_min, u_max), (v_min, v_max)) = surface.domain();
    let all = [u_min, u_max, v_min, v_max];
    if all.iter().any(|b| !b.is_finite() || b.abs() >= UNBOUNDED_THRESHOLD) {
        debug!(?all, "surface reports unbounded parameters");
        return None;
    }
    Some(Bounds {
        u_min,
        u_max,
        v_min,
        v_max,
    })
}

/// `n + 1` evenly spaced values from `min` to `max`, each clamped into
/// `[min, max]`. With `n == 0` the single value is `min`.
pub fn parameter_steps(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![min];
    }
    let step = (max - min) / n as f64;
    (0..=n)
        .map(|k| clamp(min + k as f64 * step, min, max))
        .collect()
}

/// Evaluate `surface` at `(u, v)` and move the point into profile space.
pub fn evaluate_profile(surface: &dyn Surface, u: f64, v: f64) -> Point3 {
    to_profile_space(&surface.evaluate(Point2::new(u, v)))
}

/// A dense rectangular grid of samples: one row per u value, one column per v value.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    /// Profile-space points, `points[iu][iv]`.
    pub points: Vec<Vec<Point3D>>,
    /// Matching `(u, v)` parameters when requested.
    pub params: Option<Vec<Vec<Point2D>>>,
}

impl SampleGrid {
    /// Number of rows (u values).
    pub fn rows(&self) -> usize {
        self.points.len()
    }

    /// Number of columns (v values).
    pub fn columns(&self) -> usize {
        self.points.first().map_or(0, Vec::len)
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.points.iter().map(Vec::len).sum()
    }

    /// Whether the grid holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sample `surface` on an `(nu + 1) × (nv + 1)` grid.
///
/// Returns `None` for an unbounded surface or when `nu` or `nv` is zero.
pub fn sample_grid(surface: &dyn Surface, nu: usize, nv: usize) -> Option<SampleGrid> {
    sample(surface, nu, nv, false)
}

/// Like [`sample_grid`], also recording the `(u, v)` of every sample.
pub fn sample_grid_with_params(surface: &dyn Surface, nu: usize, nv: usize) -> Option<SampleGrid> {
    sample(surface, nu, nv, true)
}

fn sample(surface: &dyn Surface, nu: usize, nv: usize, with_params: bool) -> Option<SampleGrid> {
    if nu == 0 || nv == 0 {
        return None;
    }
    let b = finite_bounds(surface)?;
    let us = parameter_steps(b.u_min, b.u_max, nu);
    let vs = parameter_steps(b.v_min, b.v_max, nv);

    let mut points = Vec::with_capacity(us.len());
    let mut params = with_params.then(|| Vec::with_capacity(us.len()));
    for &u in &us {
        points.push(
            vs.iter()
                .map(|&v| narrow3(&evaluate_profile(surface, u, v)))
                .collect(),
        );
        if let Some(params) = params.as_mut() {
            params.push(vs.iter().map(|&v| narrow2(u, v)).collect());
        }
    }
    Some(SampleGrid { points, params })
}

/// Sample one iso-u line from `v_from` to `v_to` in `steps` intervals.
///
/// Each v is clamped into the surface's v bounds. Returns `None` for an
/// unbounded surface.
pub fn sample_meridian(
    surface: &dyn Surface,
    u: f64,
    v_from: f64,
    v_to: f64,
    steps: usize,
) -> Option<Vec<Point3>> {
    let b = finite_bounds(surface)?;
    let points = if steps == 0 {
        vec![evaluate_profile(surface, u, clamp(v_from, b.v_min, b.v_max))]
    } else {
        let dv = (v_to - v_from) / steps as f64;
        (0..=steps)
            .map(|k| {
                let v = clamp(v_from + k as f64 * dv, b.v_min, b.v_max);
                evaluate_profile(surface, u, v)
            })
            .collect()
    };
    Some(points)
}

#[cfg(test)]
pub(crate) mod test_surfaces {
    use cupline_geom::{Surface, SurfaceKind};
    use cupline_math::{Point2, Point3};

    /// Flat patch `P(u, v) = (u, v, 0)` with arbitrary declared bounds and flags.
    #[derive(Debug, Clone)]
    pub struct Patch {
        pub domain: ((f64, f64), (f64, f64)),
        pub u_closed: bool,
        pub u_periodic: bool,
        pub v_closed: bool,
        pub v_periodic: bool,
    }

    impl Patch {
        pub fn new(domain: ((f64, f64), (f64, f64))) -> Self {
            Self {
                domain,
                u_closed: false,
                u_periodic: false,
                v_closed: false,
                v_periodic: false,
            }
        }
    }

    impl Surface for Patch {
        fn evaluate(&self, uv: Point2) -> Point3 {
            Point3::new(uv.x, uv.y, 0.0)
        }

        fn domain(&self) -> ((f64, f64), (f64, f64)) {
            self.domain
        }

        fn surface_type(&self) -> SurfaceKind {
            SurfaceKind::BSpline
        }

        fn is_u_closed(&self) -> bool {
            self.u_closed
        }

        fn is_v_closed(&self) -> bool {
            self.v_closed
        }

        fn is_u_periodic(&self) -> bool {
            self.u_periodic
        }

        fn is_v_periodic(&self) -> bool {
            self.v_periodic
        }

        fn clone_box(&self) -> Box<dyn Surface> {
            Box::new(self.clone())
        }
    }
}
