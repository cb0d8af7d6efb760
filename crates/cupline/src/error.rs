//! Pipeline errors.

use std::path::PathBuf;

use cupline_ir::IrError;
use cupline_outline::OutlineError;
use cupline_profile::ProfileError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort processing of one model.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The model document could not be read.
    #[error("cannot read model {path}: {source}")]
    Io {
        /// Model path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The model document is invalid.
    #[error("model {path}: {source}")]
    Model {
        /// Model path.
        path: PathBuf,
        /// Underlying error.
        source: IrError,
    },

    /// A wall could not be built.
    #[error("{wall} wall: {source}")]
    Profile {
        /// `"outer"` or `"inner"`.
        wall: &'static str,
        /// Underlying error.
        source: ProfileError,
    },

    /// Writing or post-processing an outline failed.
    #[error(transparent)]
    Outline(#[from] OutlineError),

    /// The model does not match what the configuration says about it.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
