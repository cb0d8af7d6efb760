#![warn(missing_docs)]

//! Outline extraction for hip-implant cups.
//!
//! A cup model is a solid already split into classified faces. A
//! [`ModelConfig`] names the faces that make up the outer and inner walls,
//! and a [`Pipeline`] turns them into two `(axial, radius)` wall profiles,
//! an optional fiducial polyline, and the ICP/OCP files written from them.
//!
//! # Example
//!
//! ```no_run
//! use cupline::{ModelConfig, Pipeline};
//! use std::path::Path;
//!
//! # fn main() -> cupline::Result<()> {
//! let config = ModelConfig::load(Path::new("R8O1IS01.toml"))?;
//! let mut pipeline = Pipeline::new(&config);
//! let shape = pipeline.load_model()?;
//! let output = pipeline.run(&shape)?;
//! pipeline.write(&output)?;
//! # Ok(())
//! # }
//! ```

pub use cupline_geom;
pub use cupline_ir;
pub use cupline_math;
pub use cupline_outline;
pub use cupline_profile;
pub use cupline_sample;

mod config;
mod error;
pub mod inspect;
mod pipeline;
mod viewer;

pub use config::{
    ConfigError, FiducialConfig, HeaderConfig, ModelConfig, OutputConfig, ShellFaces,
};
pub use error::{PipelineError, Result};
pub use pipeline::{load_model, Pipeline, PipelineOutput, WriteReport, VIEWER_GRID_STEPS};
pub use viewer::{NullViewer, Viewer, WallSide};
