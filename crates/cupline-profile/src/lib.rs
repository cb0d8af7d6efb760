#![warn(missing_docs)]

//! Wall profiles of revolved cup shells.
//!
//! A cup wall is modelled by a stack of surfaces: a spherical cap at the
//! apex, a conical wall, and optionally a flat or toroidal rim. The builder
//! samples each surface along the symmetry meridian `u = π/2` and joins the
//! samples into one `(axial, radius)` polyline running apex → rim.
//!
//! # Example
//!
//! ```ignore
//! use cupline_profile::{build_wall, NormalOffset, ShellSurfaces};
//!
//! let shell = ShellSurfaces { sphere: &cap, cone: &wall, rim: Some(&top) };
//! let outer = build_wall(&shell, 2.0, NormalOffset::Outward)?;
//! ```

use cupline_geom::Surface;
use cupline_math::Point2D;
use serde::{Deserialize, Serialize};

mod error;
mod wall;

pub use error::{ProfileError, Result};
pub use wall::{build_wall, build_wall_with, MERIDIAN_U};

/// The surfaces making up one wall, apex first.
#[derive(Debug, Clone, Copy)]
pub struct ShellSurfaces<'a> {
    /// Spherical cap at the apex.
    pub sphere: &'a dyn Surface,
    /// Conical wall.
    pub cone: &'a dyn Surface,
    /// Rim surface, when the wall has one.
    pub rim: Option<&'a dyn Surface>,
}

/// Direction in which the wall is pushed by the thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalOffset {
    /// Samples are used as evaluated.
    #[default]
    None,
    /// Pushed by `+thickness` along the estimated normal.
    Outward,
    /// Pushed by `-thickness` along the estimated normal.
    Inward,
}

impl NormalOffset {
    /// Signed multiplier applied to the thickness.
    pub fn sign(self) -> f64 {
        match self {
            NormalOffset::None => 0.0,
            NormalOffset::Outward => 1.0,
            NormalOffset::Inward => -1.0,
        }
    }
}

/// Number of meridian intervals sampled on each shell surface.
///
/// Fields left out of a config table keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WallSampling {
    /// Intervals from the sphere's minimum v to its midpoint.
    pub sphere_steps: usize,
    /// Intervals across the cone's full v range.
    pub cone_steps: usize,
    /// Intervals across the rim's full v range.
    pub rim_steps: usize,
}

impl Default for WallSampling {
    fn default() -> Self {
        Self {
            sphere_steps: 40,
            cone_steps: 40,
            rim_steps: 4,
        }
    }
}

/// A literal point appended after the computed wall.
///
/// Missing `axial` repeats the axial coordinate of the point before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionPoint {
    /// Axial position, or `None` to keep the previous one.
    #[serde(default)]
    pub axial: Option<f32>,
    /// Radius.
    pub radius: f32,
}

/// One wall of a shell: `(x = axial, y = radius)` samples from apex to rim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallProfile {
    points: Vec<Point2D>,
}

impl WallProfile {
    /// Wrap an existing polyline.
    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    /// Samples in order.
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Take the samples.
    pub fn into_points(self) -> Vec<Point2D> {
        self.points
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the wall has no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append literal correction points at the rim end.
    pub fn append_corrections(&mut self, corrections: &[CorrectionPoint]) {
        for c in corrections {
            let axial = c
                .axial
                .or_else(|| self.points.last().map(|p| p.x))
                .unwrap_or(0.0);
            self.points.push(Point2D::new(axial, c.radius));
        }
    }

    /// Whether the axial coordinate never decreases.
    pub fn is_axially_monotonic(&self) -> bool {
        self.points.windows(2).all(|w| w[1].x >= w[0].x)
    }
}
