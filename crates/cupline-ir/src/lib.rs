#![warn(missing_docs)]

//! Model document for cupline.
//!
//! A model is a solid that has already been split into faces by a CAD
//! kernel. Each face records the surface it lies on (with its concrete kind)
//! and its boundary wires. The document is plain JSON; [`Document::build`]
//! turns it into a [`cupline_geom::Shape`] whose faces reference geometry in
//! a store.
//!
//! The document is purely declarative: geometry is validated and evaluated
//! only after building.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod build;

/// 3D vector with f64 components (conventionally millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// As a kernel vector.
    pub fn to_vector(self) -> cupline_math::Vec3 {
        cupline_math::Vec3::new(self.x, self.y, self.z)
    }

    /// As a kernel point.
    pub fn to_point(self) -> cupline_math::Point3 {
        cupline_math::Point3::new(self.x, self.y, self.z)
    }
}

/// Surface carried by a face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurfaceDef {
    /// Infinite plane through `origin` spanned by `x_dir` and `y_dir`.
    Plane {
        /// Point at `(u, v) = (0, 0)`.
        origin: Vec3,
        /// u direction.
        x_dir: Vec3,
        /// v direction.
        y_dir: Vec3,
    },
    /// Infinite cylinder.
    Cylinder {
        /// Point on the axis at `v = 0`.
        center: Vec3,
        /// Axis direction.
        axis: Vec3,
        /// Direction of `u = 0`; arbitrary when omitted.
        #[serde(default)]
        ref_dir: Option<Vec3>,
        /// Radius.
        radius: f64,
    },
    /// Infinite cone; `v` is the slant distance from the apex.
    Cone {
        /// Apex.
        apex: Vec3,
        /// Axis direction (apex toward base).
        axis: Vec3,
        /// Direction of `u = 0`; arbitrary when omitted.
        #[serde(default)]
        ref_dir: Option<Vec3>,
        /// Half-angle in radians.
        half_angle: f64,
    },
    /// Sphere; `v` is latitude about `axis`.
    Sphere {
        /// Center.
        center: Vec3,
        /// Polar axis; +Z when omitted.
        #[serde(default)]
        axis: Option<Vec3>,
        /// Direction of `u = 0`; +X when omitted.
        #[serde(default)]
        ref_dir: Option<Vec3>,
        /// Radius.
        radius: f64,
    },
    /// Torus.
    Torus {
        /// Center.
        center: Vec3,
        /// Axis of the ring.
        axis: Vec3,
        /// Center to tube center.
        major_radius: f64,
        /// Tube radius.
        minor_radius: f64,
    },
    /// Clamped B-spline patch, control points row-major (`v * n_u + u`).
    BSpline {
        /// Control net.
        control_points: Vec<Vec3>,
        /// Control points per row.
        n_u: usize,
        /// Number of rows.
        n_v: usize,
        /// u knots; clamped uniform when omitted.
        #[serde(default)]
        knots_u: Option<Vec<f64>>,
        /// v knots; clamped uniform when omitted.
        #[serde(default)]
        knots_v: Option<Vec<f64>>,
        /// Degree in u.
        degree_u: usize,
        /// Degree in v.
        degree_v: usize,
    },
    /// B-spline patch periodic in u, one closed ring of control points per v row.
    PeriodicBSpline {
        /// Control rings, first point not repeated.
        rings: Vec<Vec<Vec3>>,
        /// Degree in u.
        degree_u: usize,
        /// Degree in v.
        degree_v: usize,
    },
    /// Bézier patch, poles row-major.
    Bezier {
        /// Pole grid.
        poles: Vec<Vec3>,
        /// Poles per row.
        n_u: usize,
        /// Number of rows.
        n_v: usize,
    },
    /// Rectangular trim of another surface.
    Trimmed {
        /// Untrimmed surface.
        basis: Box<SurfaceDef>,
        /// u interval; the basis's full u range when omitted.
        #[serde(default)]
        u: Option<[f64; 2]>,
        /// v interval.
        v: [f64; 2],
    },
    /// Curve swept along a direction.
    Extrusion {
        /// Swept curve.
        curve: CurveDef,
        /// Sweep direction.
        direction: Vec3,
    },
    /// Curve revolved about an axis.
    Revolution {
        /// Meridian curve.
        curve: CurveDef,
        /// Point on the axis.
        origin: Vec3,
        /// Axis direction.
        axis: Vec3,
    },
}

/// Curve carried by an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveDef {
    /// Line through `origin` along `direction`.
    Line {
        /// Point at `t = 0`.
        origin: Vec3,
        /// Direction (its length is the parameter speed).
        direction: Vec3,
    },
    /// Circle.
    Circle {
        /// Center.
        center: Vec3,
        /// Plane normal.
        normal: Vec3,
        /// Direction of `t = 0`; arbitrary when omitted.
        #[serde(default)]
        x_dir: Option<Vec3>,
        /// Radius.
        radius: f64,
    },
    /// Ellipse.
    Ellipse {
        /// Center.
        center: Vec3,
        /// Plane normal.
        normal: Vec3,
        /// Major axis direction.
        x_dir: Vec3,
        /// Semi-major length.
        major_radius: f64,
        /// Semi-minor length.
        minor_radius: f64,
    },
    /// Hyperbola branch.
    Hyperbola {
        /// Center.
        center: Vec3,
        /// Plane normal.
        normal: Vec3,
        /// Transverse axis direction.
        x_dir: Vec3,
        /// Center to vertex.
        major_radius: f64,
        /// Conjugate semi-axis.
        minor_radius: f64,
    },
    /// Parabola.
    Parabola {
        /// Vertex.
        vertex: Vec3,
        /// Plane normal.
        normal: Vec3,
        /// Symmetry axis direction.
        x_dir: Vec3,
        /// Focal length.
        focal: f64,
    },
    /// B-spline curve.
    BSpline {
        /// Control points.
        control_points: Vec<Vec3>,
        /// Knots; clamped uniform when omitted.
        #[serde(default)]
        knots: Option<Vec<f64>>,
        /// Degree.
        degree: usize,
    },
    /// Bézier curve.
    Bezier {
        /// Poles.
        poles: Vec<Vec3>,
    },
    /// Trimmed curve.
    Trimmed {
        /// Untrimmed curve.
        basis: Box<CurveDef>,
        /// Parameter interval.
        range: [f64; 2],
    },
}

/// One boundary edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    /// Carrier curve.
    pub curve: CurveDef,
    /// Parameter interval; the curve's domain when omitted.
    #[serde(default)]
    pub range: Option<[f64; 2]>,
}

/// One face of the solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDef {
    /// Optional label, for reports.
    #[serde(default)]
    pub name: Option<String>,
    /// Carrier surface.
    pub surface: SurfaceDef,
    /// Boundary wires, outer first.
    #[serde(default)]
    pub wires: Vec<Vec<EdgeDef>>,
}

/// A cupline model document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string (e.g. "0.1").
    pub version: String,
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Faces in source order; pipelines address them by index.
    pub faces: Vec<FaceDef>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            name: String::new(),
            faces: Vec::new(),
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Errors raised while turning a document into geometry.
#[derive(Error, Debug)]
pub enum IrError {
    /// The JSON could not be parsed.
    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A B-spline or Bézier definition was rejected.
    #[error("face {face}: {source}")]
    Geometry {
        /// Face index.
        face: usize,
        /// Underlying error.
        source: cupline_geom::GeomError,
    },

    /// A direction vector has zero length.
    #[error("face {face}: {field} has zero length")]
    ZeroVector {
        /// Face index.
        face: usize,
        /// Offending field.
        field: &'static str,
    },
}
