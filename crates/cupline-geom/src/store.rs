//! Geometry storage and typed handles.
//!
//! Faces and edges refer to their geometry through a [`GeomRef`]: either the
//! geometry itself, or an id into a [`GeometryStore`]. Nothing resolves a
//! handle implicitly; callers go through [`GeomRef::resolve`].

use crate::curves::Curve3d;
use crate::Surface;

/// Index of a surface or curve in a [`GeometryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeomId(pub usize);

/// A handle to geometry: owned inline, or stored by id.
pub enum GeomRef<T: ?Sized> {
    /// The geometry is carried by the handle.
    Resolved(Box<T>),
    /// The geometry lives in a store.
    Unresolved(GeomId),
}

/// Handle to a surface.
pub type SurfaceRef = GeomRef<dyn Surface>;

/// Handle to a 3D curve.
pub type CurveRef = GeomRef<dyn Curve3d>;

/// Types that can be looked up in a [`GeometryStore`].
pub trait StoreLookup {
    /// Fetch the entity stored under `id`.
    fn lookup(store: &GeometryStore, id: GeomId) -> Option<&Self>;
}

impl StoreLookup for dyn Surface {
    fn lookup(store: &GeometryStore, id: GeomId) -> Option<&Self> {
        store.surfaces.get(id.0).map(|s| s.as_ref())
    }
}

impl StoreLookup for dyn Curve3d {
    fn lookup(store: &GeometryStore, id: GeomId) -> Option<&Self> {
        store.curves.get(id.0).map(|c| c.as_ref())
    }
}

impl<T: ?Sized + StoreLookup> GeomRef<T> {
    /// Resolve the handle. `None` when the id is not in `store`.
    pub fn resolve<'a>(&'a self, store: &'a GeometryStore) -> Option<&'a T> {
        match self {
            GeomRef::Resolved(geom) => Some(&**geom),
            GeomRef::Unresolved(id) => T::lookup(store, *id),
        }
    }
}

impl<T: ?Sized> GeomRef<T> {
    /// The store id, if this handle is not inline.
    pub fn id(&self) -> Option<GeomId> {
        match self {
            GeomRef::Resolved(_) => None,
            GeomRef::Unresolved(id) => Some(*id),
        }
    }
}

impl<T: ?Sized> Clone for GeomRef<T>
where
    Box<T>: Clone,
{
    fn clone(&self) -> Self {
        match self {
            GeomRef::Resolved(geom) => GeomRef::Resolved(geom.clone()),
            GeomRef::Unresolved(id) => GeomRef::Unresolved(*id),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for GeomRef<T>
where
    Box<T>: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeomRef::Resolved(geom) => f.debug_tuple("Resolved").field(geom).finish(),
            GeomRef::Unresolved(id) => f.debug_tuple("Unresolved").field(id).finish(),
        }
    }
}

// =============================================================================
// Geometry store
// =============================================================================

/// Storage for the surfaces and curves referenced by a shape's faces.
#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    surfaces: Vec<Box<dyn Surface>>,
    curves: Vec<Box<dyn Curve3d>>,
}

impl GeometryStore {
    /// Create an empty geometry store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface and return a handle to it.
    pub fn add_surface(&mut self, surface: Box<dyn Surface>) -> SurfaceRef {
        self.surfaces.push(surface);
        GeomRef::Unresolved(GeomId(self.surfaces.len() - 1))
    }

    /// Add a 3D curve and return a handle to it.
    pub fn add_curve(&mut self, curve: Box<dyn Curve3d>) -> CurveRef {
        self.curves.push(curve);
        GeomRef::Unresolved(GeomId(self.curves.len() - 1))
    }

    /// Surface stored under `id`.
    pub fn surface(&self, id: GeomId) -> Option<&dyn Surface> {
        self.surfaces.get(id.0).map(|s| s.as_ref())
    }

    /// Curve stored under `id`.
    pub fn curve(&self, id: GeomId) -> Option<&dyn Curve3d> {
        self.curves.get(id.0).map(|c| c.as_ref())
    }

    /// Number of stored surfaces.
    pub fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of stored curves.
    pub fn num_curves(&self) -> usize {
        self.curves.len()
    }
}
