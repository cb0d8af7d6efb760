//! Error types for wall construction.

use thiserror::Error;

/// Errors that abort building a wall profile.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A shell surface reports unbounded parameters and cannot be sampled.
    #[error("{role} surface is unbounded; trim it before sampling")]
    UnboundedParameter {
        /// Which shell surface (`"sphere"`, `"cone"` or `"rim"`).
        role: &'static str,
    },

    /// Offset or tangent math would divide by (near) zero.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The inputs break an assumption of the builder.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
}

/// Result type for profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
