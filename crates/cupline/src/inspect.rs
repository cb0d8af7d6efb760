//! Model inspection: face listings and rim circles, for picking the face
//! indices that go into a [`ModelConfig`](crate::ModelConfig).

use cupline_geom::{
    classify_curve, classify_surface, classify_surface_basis, Circle3d, CurveKind, Shape,
    SurfaceKind,
};
use cupline_sample::{finite_bounds, Bounds};
use tracing::debug;

use crate::{PipelineError, Result};

/// One line of a [`face_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct FaceInfo {
    /// Face index.
    pub index: usize,
    /// Surface kind, `None` when unclassified.
    pub kind: Option<SurfaceKind>,
    /// Kind under any rectangular trims.
    pub basis_kind: Option<SurfaceKind>,
    /// Number of boundary wires.
    pub wires: usize,
    /// Parameter bounds, `None` when unbounded.
    pub bounds: Option<Bounds>,
    /// Closed in u.
    pub u_closed: bool,
    /// Periodic in u.
    pub u_periodic: bool,
    /// Closed in v.
    pub v_closed: bool,
    /// Periodic in v.
    pub v_periodic: bool,
}

/// Describe every face of `shape`.
pub fn face_report(shape: &Shape) -> Vec<FaceInfo> {
    shape
        .faces
        .iter()
        .enumerate()
        .map(|(index, face)| {
            let kind = classify_surface(&face.surface, &shape.store);
            let basis_kind = classify_surface_basis(&face.surface, &shape.store);
            let surface = face.surface.resolve(&shape.store);
            FaceInfo {
                index,
                kind,
                basis_kind,
                wires: face.wires.len(),
                bounds: surface.and_then(|s| finite_bounds(s)),
                u_closed: surface.is_some_and(|s| s.is_u_closed()),
                u_periodic: surface.is_some_and(|s| s.is_u_periodic()),
                v_closed: surface.is_some_and(|s| s.is_v_closed()),
                v_periodic: surface.is_some_and(|s| s.is_v_periodic()),
            }
        })
        .collect()
}

/// A planar annulus bounded by two circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RimCircles {
    /// Face index.
    pub face: usize,
    /// Radius of the first edge of each wire.
    pub radii: [f64; 2],
    /// Parameter interval of each of those edges.
    pub ranges: [(f64, f64); 2],
}

/// Find planar faces (trimmed or not) with exactly two wires and read the
/// circle that starts each wire.
///
/// A wire that starts with anything but a circle is a precondition
/// violation: the face is not the annulus it looks like.
pub fn circular_rims(shape: &Shape) -> Result<Vec<RimCircles>> {
    let mut rims = Vec::new();
    for (index, face) in shape.faces.iter().enumerate() {
        if classify_surface_basis(&face.surface, &shape.store) != Some(SurfaceKind::Plane)
            || face.wires.len() != 2
        {
            continue;
        }
        let mut radii = [0.0; 2];
        let mut ranges = [(0.0, 0.0); 2];
        for (w, wire) in face.wires.iter().enumerate() {
            let edge = wire.edges.first().ok_or_else(|| {
                PipelineError::PreconditionViolation(format!("face {index} wire {w} has no edges"))
            })?;
            let kind = classify_curve(&edge.curve, &shape.store);
            let circle = shape
                .edge_curve(edge)
                .and_then(|c| c.as_any().downcast_ref::<Circle3d>())
                .filter(|_| kind == Some(CurveKind::Circle))
                .ok_or_else(|| {
                    PipelineError::PreconditionViolation(format!(
                        "face {index} wire {w}: expected a circle, found {}",
                        kind.map_or("nothing", CurveKind::label)
                    ))
                })?;
            radii[w] = circle.radius;
            ranges[w] = edge.range;
        }
        debug!(face = index, r0 = radii[0], r1 = radii[1], "rim circles");
        rims.push(RimCircles {
            face: index,
            radii,
            ranges,
        });
    }
    Ok(rims)
}
