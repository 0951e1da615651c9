pub mod builder;
pub mod extrusion;
pub mod stl;
pub mod triangulation;
pub mod validation;

pub use builder::{MeshBuilder, Triangle};
pub use extrusion::extrude_polygon;
pub use stl::{estimate_stl_size, write_stl};
pub use triangulation::triangulate_polygon;
pub use validation::{MeshReport, clean_mesh};
