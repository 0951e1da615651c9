//! Loop nesting and solid/hole classification for a single layer
//!
//! Profiles produced by the kernel share boundaries: the inner loop of a region
//! is traced again as the outer loop of the region nested inside it. Matching
//! loops by their identity key recovers the containment tree without any
//! geometric containment test, and the even-odd rule on the tree depth tells
//! solid material from holes.

pub mod resolver;
pub mod selector;

pub use resolver::{
    HierarchyError, LayerHierarchy, LoopRole, NestingForest, ResolvedProfile, extreme_point,
    resolve,
};
pub use selector::{is_solid, select_solid, select_solid_profiles};
