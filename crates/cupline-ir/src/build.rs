//! Document → geometry conversion.

use cupline_geom::{
    BSplineCurve, BSplineSurface, BezierCurve, BezierSurface, Circle3d, ConeSurface, Curve3d,
    CylinderSurface, Edge, Ellipse3d, Hyperbola3d, Line3d, Parabola3d, Plane,
    RectangularTrimmedSurface, Shape, SphereSurface, Surface, SurfaceOfLinearExtrusion,
    SurfaceOfRevolution, TorusSurface, TrimmedCurve, Wire,
};
use cupline_geom::bspline::clamped_uniform_knots;
use cupline_math::Point3;

use crate::{CurveDef, Document, IrError, SurfaceDef, Vec3};

/// Per-face conversion context, so errors name the face.
struct FaceBuilder {
    face: usize,
}

impl FaceBuilder {
    fn dir(&self, v: Vec3, field: &'static str) -> Result<cupline_math::Vec3, IrError> {
        let d = v.to_vector();
        if d.norm() < 1e-12 {
            return Err(IrError::ZeroVector {
                face: self.face,
                field,
            });
        }
        Ok(d)
    }

    fn geom<T>(&self, r: cupline_geom::Result<T>) -> Result<T, IrError> {
        r.map_err(|source| IrError::Geometry {
            face: self.face,
            source,
        })
    }

    fn points(pts: &[Vec3]) -> Vec<Point3> {
        pts.iter().map(|p| p.to_point()).collect()
    }

    fn surface(&self, def: &SurfaceDef) -> Result<Box<dyn Surface>, IrError> {
        let surface: Box<dyn Surface> = match def {
            SurfaceDef::Plane {
                origin,
                x_dir,
                y_dir,
            } => Box::new(Plane::new(
                origin.to_point(),
                self.dir(*x_dir, "x_dir")?,
                self.dir(*y_dir, "y_dir")?,
            )),
            SurfaceDef::Cylinder {
                center,
                axis,
                ref_dir,
                radius,
            } => {
                let axis = self.dir(*axis, "axis")?;
                Box::new(match ref_dir {
                    Some(r) => CylinderSurface::with_frame(
                        center.to_point(),
                        axis,
                        self.dir(*r, "ref_dir")?,
                        *radius,
                    ),
                    None => CylinderSurface::with_axis(center.to_point(), axis, *radius),
                })
            }
            SurfaceDef::Cone {
                apex,
                axis,
                ref_dir,
                half_angle,
            } => {
                let axis = self.dir(*axis, "axis")?;
                Box::new(match ref_dir {
                    Some(r) => ConeSurface::with_frame(
                        apex.to_point(),
                        axis,
                        self.dir(*r, "ref_dir")?,
                        *half_angle,
                    ),
                    None => ConeSurface::with_axis(apex.to_point(), axis, *half_angle),
                })
            }
            SurfaceDef::Sphere {
                center,
                axis,
                ref_dir,
                radius,
            } => {
                let axis = match axis {
                    Some(a) => self.dir(*a, "axis")?,
                    None => cupline_math::Vec3::z(),
                };
                let ref_dir = match ref_dir {
                    Some(r) => self.dir(*r, "ref_dir")?,
                    None => cupline_math::Vec3::x(),
                };
                Box::new(SphereSurface::with_frame(
                    center.to_point(),
                    axis,
                    ref_dir,
                    *radius,
                ))
            }
            SurfaceDef::Torus {
                center,
                axis,
                major_radius,
                minor_radius,
            } => Box::new(TorusSurface::with_axis(
                center.to_point(),
                self.dir(*axis, "axis")?,
                *major_radius,
                *minor_radius,
            )),
            SurfaceDef::BSpline {
                control_points,
                n_u,
                n_v,
                knots_u,
                knots_v,
                degree_u,
                degree_v,
            } => {
                let ku = knots_u
                    .clone()
                    .unwrap_or_else(|| clamped_uniform_knots(*n_u, *degree_u));
                let kv = knots_v
                    .clone()
                    .unwrap_or_else(|| clamped_uniform_knots(*n_v, *degree_v));
                let pts = Self::points(control_points);
                Box::new(self.geom(BSplineSurface::new(
                    pts, *n_u, *n_v, ku, kv, *degree_u, *degree_v,
                ))?)
            }
            SurfaceDef::PeriodicBSpline {
                rings,
                degree_u,
                degree_v,
            } => {
                let rings = rings.iter().map(|r| Self::points(r)).collect();
                Box::new(self.geom(BSplineSurface::periodic_u(rings, *degree_u, *degree_v))?)
            }
            SurfaceDef::Bezier { poles, n_u, n_v } => {
                Box::new(self.geom(BezierSurface::new(Self::points(poles), *n_u, *n_v))?)
            }
            SurfaceDef::Trimmed { basis, u, v } => {
                let basis = self.surface(basis)?;
                let v = (v[0], v[1]);
                Box::new(match u {
                    Some(u) => RectangularTrimmedSurface::new(basis, (u[0], u[1]), v),
                    None => RectangularTrimmedSurface::trim_v(basis, v),
                })
            }
            SurfaceDef::Extrusion { curve, direction } => Box::new(SurfaceOfLinearExtrusion::new(
                self.curve(curve)?,
                self.dir(*direction, "direction")?,
            )),
            SurfaceDef::Revolution {
                curve,
                origin,
                axis,
            } => Box::new(SurfaceOfRevolution::new(
                self.curve(curve)?,
                origin.to_point(),
                self.dir(*axis, "axis")?,
            )),
        };
        Ok(surface)
    }

    fn curve(&self, def: &CurveDef) -> Result<Box<dyn Curve3d>, IrError> {
        let curve: Box<dyn Curve3d> = match def {
            CurveDef::Line { origin, direction } => Box::new(Line3d {
                origin: origin.to_point(),
                direction: self.dir(*direction, "direction")?,
            }),
            CurveDef::Circle {
                center,
                normal,
                x_dir,
                radius,
            } => {
                let normal = self.dir(*normal, "normal")?;
                Box::new(match x_dir {
                    Some(x) => Circle3d::with_frame(
                        center.to_point(),
                        *radius,
                        normal,
                        self.dir(*x, "x_dir")?,
                    ),
                    None => Circle3d::with_normal(center.to_point(), *radius, normal),
                })
            }
            CurveDef::Ellipse {
                center,
                normal,
                x_dir,
                major_radius,
                minor_radius,
            } => Box::new(Ellipse3d::new(
                center.to_point(),
                self.dir(*normal, "normal")?,
                self.dir(*x_dir, "x_dir")?,
                *major_radius,
                *minor_radius,
            )),
            CurveDef::Hyperbola {
                center,
                normal,
                x_dir,
                major_radius,
                minor_radius,
            } => Box::new(Hyperbola3d::new(
                center.to_point(),
                self.dir(*normal, "normal")?,
                self.dir(*x_dir, "x_dir")?,
                *major_radius,
                *minor_radius,
            )),
            CurveDef::Parabola {
                vertex,
                normal,
                x_dir,
                focal,
            } => Box::new(Parabola3d::new(
                vertex.to_point(),
                self.dir(*normal, "normal")?,
                self.dir(*x_dir, "x_dir")?,
                *focal,
            )),
            CurveDef::BSpline {
                control_points,
                knots,
                degree,
            } => {
                let pts = Self::points(control_points);
                let curve = match knots {
                    Some(k) => BSplineCurve::new(pts, k.clone(), *degree),
                    None => BSplineCurve::clamped_uniform(pts, *degree),
                };
                Box::new(self.geom(curve)?)
            }
            CurveDef::Bezier { poles } => {
                Box::new(self.geom(BezierCurve::new(Self::points(poles)))?)
            }
            CurveDef::Trimmed { basis, range } => {
                Box::new(TrimmedCurve::new(self.curve(basis)?, (range[0], range[1])))
            }
        };
        Ok(curve)
    }
}

impl Document {
    /// Build the geometry described by this document.
    ///
    /// Faces keep their document order, so face `i` of the result is
    /// `self.faces[i]`.
    pub fn build(&self) -> Result<Shape, IrError> {
        let mut shape = Shape::new();
        for (face, def) in self.faces.iter().enumerate() {
            let builder = FaceBuilder { face };
            let surface = builder.surface(&def.surface)?;
            let mut wires = Vec::with_capacity(def.wires.len());
            for wire in &def.wires {
                let mut edges = Vec::with_capacity(wire.len());
                for edge in wire {
                    let curve = builder.curve(&edge.curve)?;
                    let range = match edge.range {
                        Some([a, b]) => (a, b),
                        None => curve.domain(),
                    };
                    edges.push(Edge {
                        curve: shape.store.add_curve(curve),
                        range,
                    });
                }
                wires.push(Wire { edges });
            }
            shape.add_face(surface, wires);
        }
        Ok(shape)
    }
}
