//! The outline extraction pipeline.
//!
//! One [`ModelConfig`] drives one run: the configured faces are resolved in
//! the model, both walls are built, corrections and dedup are applied, the
//! optional fiducial is extracted, and the results are written.

use std::path::Path;

use cupline_geom::{classify_basis, Shape, Surface, SurfaceKind};
use cupline_ir::{Document, IrError};
use cupline_outline::{
    remove_dupes, write_icp_file, write_ocp_file, FiducialCurve, IcpDocument, OcpDocument,
    WriteOutcome,
};
use cupline_profile::{build_wall_with, NormalOffset, ShellSurfaces, WallProfile};
use cupline_sample::{extract_midline, sample_grid};
use tracing::{debug, info};

use crate::config::{FiducialConfig, ModelConfig, ShellFaces};
use crate::viewer::{Viewer, WallSide};
use crate::{PipelineError, Result};

/// Grid resolution used when publishing shell faces to a viewer.
pub const VIEWER_GRID_STEPS: usize = 32;

/// Read a model document and build its geometry.
pub fn load_model(path: &Path) -> Result<Shape> {
    let json = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model_err = |source: IrError| PipelineError::Model {
        path: path.to_path_buf(),
        source,
    };
    let doc = Document::from_json(&json).map_err(|e| model_err(e.into()))?;
    let shape = doc.build().map_err(model_err)?;
    debug!(path = %path.display(), faces = shape.faces.len(), "model loaded");
    Ok(shape)
}

/// What one run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Model name.
    pub name: String,
    /// Outer wall, offset by the thickness, with corrections.
    pub outer: WallProfile,
    /// Inner wall.
    pub inner: WallProfile,
    /// Fiducial curve, when configured.
    pub fiducial: Option<FiducialCurve>,
}

/// What [`Pipeline::write`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteReport {
    /// ICP result, when an ICP path is configured.
    pub icp: Option<WriteOutcome>,
    /// Whether an OCP file was written.
    pub ocp: bool,
}

/// Outline extraction for one configured model.
pub struct Pipeline<'a> {
    config: &'a ModelConfig,
    viewer: Option<&'a mut dyn Viewer>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline for `config`.
    pub fn new(config: &'a ModelConfig) -> Self {
        Self {
            config,
            viewer: None,
        }
    }

    /// Publish intermediate results to `viewer`.
    pub fn with_viewer(mut self, viewer: &'a mut dyn Viewer) -> Self {
        self.viewer = Some(viewer);
        self
    }

    /// Load the configured model document.
    pub fn load_model(&self) -> Result<Shape> {
        load_model(&self.config.input)
    }

    /// Build both walls and the optional fiducial from `shape`.
    pub fn run(&mut self, shape: &Shape) -> Result<PipelineOutput> {
        let cfg = self.config;
        info!(model = %cfg.name, faces = shape.faces.len(), "extracting outline");

        let outer_shell = shell(shape, &cfg.outer, WallSide::Outer)?;
        let inner_shell = shell(shape, &cfg.inner, WallSide::Inner)?;

        if let Some(viewer) = self.viewer.as_deref_mut() {
            for &index in cfg.outer.faces.iter().chain(&cfg.inner.faces) {
                let grid = shape
                    .face_surface(index)
                    .and_then(|s| sample_grid(s, VIEWER_GRID_STEPS, VIEWER_GRID_STEPS));
                match grid {
                    Some(grid) => viewer.publish_grid(index, &grid),
                    None => debug!(face = index, "face not samplable, not published"),
                }
            }
        }

        let mut outer = build_wall_with(
            &outer_shell,
            cfg.thickness,
            NormalOffset::Outward,
            cfg.sampling,
        )
        .map_err(|source| PipelineError::Profile {
            wall: WallSide::Outer.label(),
            source,
        })?;
        let mut inner = build_wall_with(&inner_shell, cfg.thickness, NormalOffset::None, cfg.sampling)
            .map_err(|source| PipelineError::Profile {
                wall: WallSide::Inner.label(),
                source,
            })?;

        // dedup first: a correction without an axial value repeats the last one
        if let Some(tol) = cfg.dedup_tolerance {
            outer = WallProfile::from_points(remove_dupes(outer.points(), tol));
            inner = WallProfile::from_points(remove_dupes(inner.points(), tol));
        }
        outer.append_corrections(&cfg.correction_points);

        let fiducial = cfg
            .fiducial
            .as_ref()
            .map(|f| extract_fiducial(shape, f))
            .transpose()?;

        if let Some(viewer) = self.viewer.as_deref_mut() {
            viewer.publish_wall(WallSide::Outer, &outer);
            viewer.publish_wall(WallSide::Inner, &inner);
            if let Some(curve) = &fiducial {
                viewer.publish_fiducial(curve);
            }
        }

        info!(
            model = %cfg.name,
            outer = outer.len(),
            inner = inner.len(),
            fiducial = fiducial.as_ref().map_or(0, FiducialCurve::len),
            "outline extracted"
        );
        Ok(PipelineOutput {
            name: cfg.name.clone(),
            outer,
            inner,
            fiducial,
        })
    }

    /// Write the configured ICP and OCP files.
    pub fn write(&self, output: &PipelineOutput) -> Result<WriteReport> {
        let cfg = self.config;
        let mut report = WriteReport::default();

        if let Some(path) = &cfg.output.icp {
            let doc = IcpDocument::from_parts(
                (&cfg.header).into(),
                Some(cfg.axial_offset),
                Some(output.inner.points()),
                Some(output.outer.points()),
            );
            report.icp = Some(write_icp_file(path, doc.as_ref())?);
        }

        if let Some(path) = &cfg.output.ocp {
            let doc = OcpDocument {
                inner: output.inner.points().to_vec(),
                outer: output.outer.points().to_vec(),
                fiducial: output
                    .fiducial
                    .as_ref()
                    .map(|f| f.points().to_vec())
                    .unwrap_or_default(),
            };
            write_ocp_file(path, &doc)?;
            report.ocp = true;
        }

        Ok(report)
    }
}

fn face<'s>(shape: &'s Shape, index: usize, role: &str) -> Result<&'s dyn Surface> {
    shape.face_surface(index).ok_or_else(|| {
        PipelineError::PreconditionViolation(format!(
            "{role} face {index} not in model ({} faces)",
            shape.faces.len()
        ))
    })
}

// Kinds each shell role accepts, looking through trims. A flat-bottomed
// cup has a cylindrical wall; a rounded rim is a torus patch.
const SPHERE_KINDS: &[SurfaceKind] = &[SurfaceKind::Sphere];
const CONE_KINDS: &[SurfaceKind] = &[SurfaceKind::Cone, SurfaceKind::Cylinder];
const RIM_KINDS: &[SurfaceKind] = &[SurfaceKind::Plane, SurfaceKind::Torus];

fn shell_face<'s>(
    shape: &'s Shape,
    index: usize,
    role: &str,
    accepted: &[SurfaceKind],
) -> Result<&'s dyn Surface> {
    let surface = face(shape, index, role)?;
    match classify_basis(surface) {
        Some(kind) if accepted.contains(&kind) => Ok(surface),
        kind => Err(PipelineError::PreconditionViolation(format!(
            "{role} face {index} must be {}, found {}",
            accepted
                .iter()
                .map(|k| k.label())
                .collect::<Vec<_>>()
                .join(" or "),
            kind.map_or("an unknown surface", SurfaceKind::label)
        ))),
    }
}

fn shell<'s>(shape: &'s Shape, faces: &ShellFaces, side: WallSide) -> Result<ShellSurfaces<'s>> {
    let wall = side.label();
    let sphere = shell_face(shape, faces.sphere(), &format!("{wall} sphere"), SPHERE_KINDS)?;
    let cone = shell_face(shape, faces.cone(), &format!("{wall} cone"), CONE_KINDS)?;
    let rim = shell_face(shape, faces.rim(), &format!("{wall} rim"), RIM_KINDS)?;
    debug!(
        wall,
        sphere = ?classify_basis(sphere),
        cone = ?classify_basis(cone),
        rim = ?classify_basis(rim),
        "shell surfaces"
    );
    Ok(ShellSurfaces {
        sphere,
        cone,
        rim: Some(rim),
    })
}

fn extract_fiducial(shape: &Shape, cfg: &FiducialConfig) -> Result<FiducialCurve> {
    let surface = face(shape, cfg.face, "fiducial")?;
    let kind = classify_basis(surface);
    if kind != Some(SurfaceKind::BSpline) {
        return Err(PipelineError::PreconditionViolation(format!(
            "fiducial face {} must be a B-spline surface, found {:?}",
            cfg.face, kind
        )));
    }
    let midline = extract_midline(surface, cfg.u_samples, cfg.v_samples).ok_or_else(|| {
        PipelineError::PreconditionViolation(format!(
            "fiducial face {} must be closed and periodic in u and open in v",
            cfg.face
        ))
    })?;

    let mut curve = FiducialCurve::from_points(midline.centerline);
    curve.extend_to_plane(cfg.reference_plane)?;
    let simplified = curve.simplified(cfg.tolerance);
    debug!(
        sampled = curve.len(),
        kept = simplified.len(),
        "fiducial simplified"
    );
    Ok(simplified)
}
