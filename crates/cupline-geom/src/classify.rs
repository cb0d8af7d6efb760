//! Surface and curve kind classification.
//!
//! Kinds are tested in a fixed order with [`Surface::is_kind`] /
//! [`Curve3d::is_kind`] and the first match wins, so geometry that answers
//! to several kinds always lands on the same one.

use tracing::debug;

use crate::curves::{Curve3d, CurveKind};
use crate::store::{CurveRef, GeometryStore, SurfaceRef};
use crate::{Surface, SurfaceKind};

/// Order in which surface kinds are tested.
pub const SURFACE_KIND_ORDER: [SurfaceKind; 10] = [
    SurfaceKind::Bezier,
    SurfaceKind::BSpline,
    SurfaceKind::RectangularTrimmed,
    SurfaceKind::Cone,
    SurfaceKind::Cylinder,
    SurfaceKind::Plane,
    SurfaceKind::Sphere,
    SurfaceKind::Torus,
    SurfaceKind::LinearExtrusion,
    SurfaceKind::Revolution,
];

/// Order in which curve kinds are tested.
pub const CURVE_KIND_ORDER: [CurveKind; 8] = [
    CurveKind::Bezier,
    CurveKind::BSpline,
    CurveKind::Trimmed,
    CurveKind::Circle,
    CurveKind::Ellipse,
    CurveKind::Hyperbola,
    CurveKind::Parabola,
    CurveKind::Line,
];

/// Classify an already-resolved surface.
pub fn classify(surface: &dyn Surface) -> Option<SurfaceKind> {
    SURFACE_KIND_ORDER
        .iter()
        .copied()
        .find(|&kind| surface.is_kind(kind))
}

/// Classify an already-resolved curve.
pub fn classify_curve_object(curve: &dyn Curve3d) -> Option<CurveKind> {
    CURVE_KIND_ORDER.iter().copied().find(|&kind| curve.is_kind(kind))
}

/// Resolve `handle` and classify the surface behind it.
///
/// Returns `None` for a dangling handle or a surface matching no known kind.
pub fn classify_surface(handle: &SurfaceRef, store: &GeometryStore) -> Option<SurfaceKind> {
    let Some(surface) = handle.resolve(store) else {
        debug!(id = ?handle.id(), "surface handle did not resolve");
        return None;
    };
    let kind = classify(surface);
    if kind.is_none() {
        debug!("surface matched no known kind");
    }
    kind
}

/// Classify the surface under any rectangular trims.
///
/// Faces are usually trimmed copies of an analytic surface; this is the
/// kind to check when a face has to be a sphere, cone or plane.
pub fn classify_basis(surface: &dyn Surface) -> Option<SurfaceKind> {
    let mut surface = surface;
    while let Some(basis) = surface.trimmed_basis() {
        surface = basis;
    }
    classify(surface)
}

/// Resolve `handle` and classify the surface under any trims.
pub fn classify_surface_basis(handle: &SurfaceRef, store: &GeometryStore) -> Option<SurfaceKind> {
    let Some(surface) = handle.resolve(store) else {
        debug!(id = ?handle.id(), "surface handle did not resolve");
        return None;
    };
    classify_basis(surface)
}

/// Resolve `handle` and classify the curve behind it.
pub fn classify_curve(handle: &CurveRef, store: &GeometryStore) -> Option<CurveKind> {
    let Some(curve) = handle.resolve(store) else {
        debug!(id = ?handle.id(), "curve handle did not resolve");
        return None;
    };
    classify_curve_object(curve)
}
