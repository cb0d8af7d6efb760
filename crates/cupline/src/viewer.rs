//! One-way publishing of intermediate results to a viewer.

use cupline_outline::FiducialCurve;
use cupline_profile::WallProfile;
use cupline_sample::SampleGrid;

/// Which wall of the cup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    /// Outer wall.
    Outer,
    /// Inner wall.
    Inner,
}

impl WallSide {
    /// Lowercase name.
    pub fn label(self) -> &'static str {
        match self {
            WallSide::Outer => "outer",
            WallSide::Inner => "inner",
        }
    }
}

/// Receives results as the pipeline produces them.
///
/// Every method defaults to doing nothing. The pipeline never reads
/// anything back.
pub trait Viewer {
    /// A sampled face of the model.
    fn publish_grid(&mut self, _face: usize, _grid: &SampleGrid) {}

    /// A finished wall, after corrections and dedup.
    fn publish_wall(&mut self, _side: WallSide, _wall: &WallProfile) {}

    /// The finished fiducial curve.
    fn publish_fiducial(&mut self, _curve: &FiducialCurve) {}
}

/// A viewer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullViewer;

impl Viewer for NullViewer {}
