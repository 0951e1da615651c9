pub mod contour;
pub mod point;

pub use contour::{Curve, Loop, Profile};
pub use point::{LoopKey, Point2};
