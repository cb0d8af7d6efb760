//! Per-model configuration.
//!
//! One TOML file describes one cup model: which faces of the model document
//! make up each wall, the wall thickness, the reference offset for the ICP
//! axial coordinate, rim corrections and where to write the results.
//!
//! ```toml
//! name = "R8O1IS01"
//! input = "breast_cup_outer_203.json"
//! thickness = 2.0
//! axial_offset = -101.0
//!
//! [header]
//! id = "8"
//! outer_cup = "1"
//! inner_cup = "G01"
//!
//! [outer]
//! faces = [39, 125, 126]
//!
//! [inner]
//! faces = [124, 125, 126]
//!
//! [[correction_points]]
//! radius = 87.0
//!
//! [[correction_points]]
//! axial = 0.0
//! radius = 87.95
//!
//! [output]
//! icp = "R8O1IS01.icp"
//! ```

use std::path::{Path, PathBuf};

use cupline_outline::{IcpHeader, FIDUCIAL_SIMPLIFY_TOLERANCE};
use cupline_profile::{CorrectionPoint, WallSampling};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a [`ModelConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The TOML is malformed or has the wrong shape.
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The three header lines written to ICP files.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Identifier token.
    #[serde(default)]
    pub id: String,
    /// Outer cup label.
    #[serde(default)]
    pub outer_cup: String,
    /// Inner cup label.
    #[serde(default)]
    pub inner_cup: String,
}

impl From<&HeaderConfig> for IcpHeader {
    fn from(h: &HeaderConfig) -> Self {
        IcpHeader {
            id: h.id.clone(),
            outer_cup: h.outer_cup.clone(),
            inner_cup: h.inner_cup.clone(),
        }
    }
}

/// Face indices of one wall: sphere, cone, rim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellFaces {
    /// `[sphere, cone, rim]` indices into the model's faces.
    pub faces: [usize; 3],
}

impl ShellFaces {
    /// Index of the spherical cap.
    pub fn sphere(&self) -> usize {
        self.faces[0]
    }

    /// Index of the conical wall.
    pub fn cone(&self) -> usize {
        self.faces[1]
    }

    /// Index of the rim.
    pub fn rim(&self) -> usize {
        self.faces[2]
    }
}

fn default_fiducial_tolerance() -> f32 {
    FIDUCIAL_SIMPLIFY_TOLERANCE
}

fn default_u_samples() -> usize {
    256
}

fn default_v_samples() -> usize {
    100
}

/// Fiducial curve extraction from a periodic B-spline face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiducialConfig {
    /// Face whose midline is the fiducial.
    pub face: usize,
    /// Axial position of the plane both ends are extended to.
    pub reference_plane: f32,
    /// RDP tolerance.
    #[serde(default = "default_fiducial_tolerance")]
    pub tolerance: f32,
    /// Samples around the closed direction.
    #[serde(default = "default_u_samples")]
    pub u_samples: usize,
    /// Midline points along the open direction, minus one.
    #[serde(default = "default_v_samples")]
    pub v_samples: usize,
}

/// Output files. Relative paths are resolved against the config file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// ICP destination.
    #[serde(default)]
    pub icp: Option<PathBuf>,
    /// OCP destination.
    #[serde(default)]
    pub ocp: Option<PathBuf>,
}

/// Everything needed to extract the outline of one cup model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Model name, for logs.
    pub name: String,
    /// Model document (JSON).
    pub input: PathBuf,
    /// Wall thickness the outer wall is pushed by.
    pub thickness: f64,
    /// Reference offset: ICP axial = `axial_offset - axial`.
    pub axial_offset: f32,
    /// ICP header lines.
    #[serde(default)]
    pub header: HeaderConfig,
    /// Outer wall faces.
    pub outer: ShellFaces,
    /// Inner wall faces.
    pub inner: ShellFaces,
    /// Literal points appended to the outer wall.
    #[serde(default)]
    pub correction_points: Vec<CorrectionPoint>,
    /// Drop wall points whose axial position repeats within this tolerance.
    #[serde(default)]
    pub dedup_tolerance: Option<f32>,
    /// Meridian sample counts.
    #[serde(default)]
    pub sampling: WallSampling,
    /// Fiducial extraction, when the model has one.
    #[serde(default)]
    pub fiducial: Option<FiducialConfig>,
    /// Output files.
    #[serde(default)]
    pub output: OutputConfig,
}

impl ModelConfig {
    /// Parse and validate a config. Paths are kept as written.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file and resolve its relative paths against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Make relative `input` and output paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        rebase(&mut self.input);
        if let Some(p) = self.output.icp.as_mut() {
            rebase(p);
        }
        if let Some(p) = self.output.ocp.as_mut() {
            rebase(p);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.thickness.is_finite() || self.thickness < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "thickness must be a non-negative number, got {}",
                self.thickness
            )));
        }
        if !self.axial_offset.is_finite() {
            return Err(ConfigError::Invalid("axial_offset must be finite".into()));
        }
        if let Some(tol) = self.dedup_tolerance {
            if tol.is_nan() || tol < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "dedup_tolerance must be non-negative, got {tol}"
                )));
            }
        }
        if let Some(f) = &self.fiducial {
            if f.u_samples == 0 || f.v_samples == 0 {
                return Err(ConfigError::Invalid(
                    "fiducial u_samples and v_samples must be positive".into(),
                ));
            }
            if f.tolerance.is_nan() || f.tolerance < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "fiducial tolerance must be non-negative, got {}",
                    f.tolerance
                )));
            }
        }
        Ok(())
    }
}
