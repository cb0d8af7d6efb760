#![warn(missing_docs)]

//! Persisted cup outlines.
//!
//! Two text formats carry the wall profiles built by `cupline-profile`:
//!
//! - **ICP** ([`icp`]): a three-line header and both walls as `%13.6e`
//!   column pairs, with the axial coordinate measured from a reference
//!   offset.
//! - **OCP** ([`ocp`]): both walls plus a 3D fiducial polyline with explicit
//!   segment connectivity.
//!
//! Files are written through a temporary sibling and renamed into place, so
//! a failed write never leaves a truncated outline behind.
//!
//! The polyline helpers ([`remove_dupes`], [`simplify_polyline`],
//! [`extend_to_plane`]) compact walls and prepare fiducial curves before
//! they are written.

mod atomic;
mod error;
pub mod icp;
pub mod ocp;
mod polyline;

pub use atomic::write_atomic;
pub use error::{OutlineError, Result};
pub use icp::{
    format_icp_number, read_icp, read_icp_file, write_icp, write_icp_file, IcpDocument,
    IcpHeader, WriteOutcome,
};
pub use ocp::{
    format_ocp_number, read_ocp, read_ocp_file, write_connectivity, write_ocp, write_ocp_file, write_points2d,
    write_points3d, OcpDocument,
};
pub use polyline::{
    extend_to_plane, remove_dupes, simplify_polyline, FiducialCurve,
    FIDUCIAL_SIMPLIFY_TOLERANCE,
};
