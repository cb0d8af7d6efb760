//! A solid decomposed into faces: just enough topology to pick surfaces and
//! read boundary circles.

use crate::curves::Curve3d;
use crate::store::{CurveRef, GeometryStore, SurfaceRef};
use crate::Surface;

/// A boundary edge: a curve and the parameter interval it covers.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Underlying curve.
    pub curve: CurveRef,
    /// Parameter interval on the curve.
    pub range: (f64, f64),
}

/// An ordered loop of edges.
#[derive(Debug, Clone, Default)]
pub struct Wire {
    /// Edges in traversal order.
    pub edges: Vec<Edge>,
}

/// A face: a surface bounded by wires (outer first).
#[derive(Debug, Clone)]
pub struct Face {
    /// Carrier surface.
    pub surface: SurfaceRef,
    /// Boundary wires.
    pub wires: Vec<Wire>,
}

/// Faces plus the store their handles point into.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    /// Geometry referenced by the faces.
    pub store: GeometryStore,
    /// Faces in source order.
    pub faces: Vec<Face>,
}

impl Shape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a face carried by `surface` and return its index.
    pub fn add_face(&mut self, surface: Box<dyn Surface>, wires: Vec<Wire>) -> usize {
        let handle = self.store.add_surface(surface);
        self.faces.push(Face {
            surface: handle,
            wires,
        });
        self.faces.len() - 1
    }

    /// Face at `index`.
    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    /// Resolved surface of the face at `index`.
    pub fn face_surface(&self, index: usize) -> Option<&dyn Surface> {
        self.face(index)?.surface.resolve(&self.store)
    }

    /// Resolved curve of an edge.
    pub fn edge_curve<'a>(&'a self, edge: &'a Edge) -> Option<&'a dyn Curve3d> {
        edge.curve.resolve(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Circle3d, Plane, SurfaceKind};
    use cupline_math::Point3;

    #[test]
    fn test_face_surface_lookup() {
        let mut shape = Shape::new();
        let circle = shape
            .store
            .add_curve(Box::new(Circle3d::new(Point3::origin(), 4.0)));
        let wire = Wire {
            edges: vec![Edge {
                curve: circle,
                range: (0.0, std::f64::consts::TAU),
            }],
        };
        let idx = shape.add_face(Box::new(Plane::xy()), vec![wire]);
        assert_eq!(idx, 0);
        let s = shape.face_surface(0).unwrap();
        assert_eq!(s.surface_type(), SurfaceKind::Plane);
        assert!(shape.face_surface(1).is_none());

        let face = shape.face(0).unwrap();
        let curve = shape.edge_curve(&face.wires[0].edges[0]).unwrap();
        assert!(curve.is_closed());
    }
}
