//! contour3d - Reconstruct a 3D solid from a stack of 2D contour slices

pub mod config;
pub mod domain;
pub mod error;
pub mod hierarchy;
pub mod kernel;
pub mod mesh;
pub mod report;
pub mod stack;

pub use error::{Error, ErrorKind, Result};
