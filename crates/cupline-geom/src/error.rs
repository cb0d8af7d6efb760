//! Error types for geometry construction.

use thiserror::Error;

/// Errors raised while building geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Knot vector is decreasing or has the wrong length.
    #[error("invalid {direction} knot vector: len={len}, expected {expected}")]
    InvalidKnots {
        /// Which parameter direction (`"u"`, `"v"` or `"t"`).
        direction: &'static str,
        /// Supplied length.
        len: usize,
        /// Required length.
        expected: usize,
    },

    /// Control net size does not match the declared dimensions.
    #[error("control point count mismatch: {found} != {n_u} * {n_v}")]
    ControlNet {
        /// Points supplied.
        found: usize,
        /// Declared u count.
        n_u: usize,
        /// Declared v count.
        n_v: usize,
    },

    /// Too few control points for the requested degree.
    #[error("degree {degree} needs at least {} control points, got {count}", .degree + 1)]
    TooFewControlPoints {
        /// Polynomial degree.
        degree: usize,
        /// Points supplied.
        count: usize,
    },

    /// Periodic rings must all have the same length.
    #[error("ring {index} has {found} points, expected {expected}")]
    RaggedRings {
        /// Offending ring.
        index: usize,
        /// Its length.
        found: usize,
        /// Length of the first ring.
        expected: usize,
    },
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;
