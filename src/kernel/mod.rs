//! Geometry kernel seam
//!
//! The layer-stack core only talks to [`GeometryKernel`]. [`MeshKernel`] is the
//! bundled implementation that turns imported contours into an STL-ready body.

pub mod import;
pub mod mesh_kernel;
pub mod profiles;

use crate::domain::{Point2, Profile};
use crate::stack::ContourLayer;
use serde::Deserialize;
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

pub use mesh_kernel::{Body, ContourSketch, MeshKernel, OperationGroup};

/// How an extrusion combines with the bodies already in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum JoinMode {
    /// Merge into the running body
    #[default]
    Join,
    /// Start a separate body
    NewBody,
}

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("failed to read contour file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported contour format {extension:?} for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("invalid contour file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid JSON contour file {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("extrusion height must be positive, got {0}")]
    InvalidHeight(f64),

    #[error("nothing to extrude")]
    EmptySelection,
}

/// Operations the layer stack needs from a modeling kernel
///
/// Every successful import and extrusion counts as one operation on the
/// kernel's timeline; `group_operations` and `roll_back` address that timeline.
pub trait GeometryKernel {
    /// Handle to the imported geometry of one layer
    type Sketch;

    /// Import the contour file of `layer`, mapping file coordinates `p` to `origin + scale * p`
    fn import_contour(
        &mut self,
        layer: &ContourLayer,
        origin: Point2,
        scale: f64,
    ) -> Result<Self::Sketch, KernelError>;

    /// Regions of a sketch, each with one outer loop and the loops of its holes
    fn extract_profiles(&self, sketch: &Self::Sketch) -> Vec<Profile>;

    /// Extrude `profiles` from `start_offset` for `height` along +Z
    fn extrude(
        &mut self,
        profiles: &[&Profile],
        start_offset: f64,
        height: f64,
        mode: JoinMode,
    ) -> Result<(), KernelError>;

    /// Name a contiguous range of timeline operations
    fn group_operations(&mut self, range: Range<usize>, name: &str);

    /// Number of operations on the timeline
    fn operation_count(&self) -> usize;

    /// Undo every operation after the first `operations`
    fn roll_back(&mut self, operations: usize);
}
