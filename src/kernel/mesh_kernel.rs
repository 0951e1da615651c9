use super::import::{place_rings, read_contour};
use super::profiles::{extract_profiles, oriented};
use super::{GeometryKernel, JoinMode, KernelError};
use crate::domain::{Point2, Profile};
use crate::mesh::{Triangle, extrude_polygon};
use crate::stack::ContourLayer;
use std::ops::Range;
use tracing::debug;

/// Closed rings imported from one contour file, in model coordinates
#[derive(Debug, Clone)]
pub struct ContourSketch {
    pub name: String,
    pub rings: Vec<Vec<Point2>>,
}

/// A triangle soup accumulated by extrusions
#[derive(Debug, Default, Clone)]
pub struct Body {
    pub triangles: Vec<Triangle>,
}

/// Named span of timeline operations
#[derive(Debug, Clone, PartialEq)]
pub struct OperationGroup {
    pub name: String,
    pub range: Range<usize>,
}

#[derive(Debug, Clone)]
enum Operation {
    Sketch {
        name: String,
    },
    Extrude {
        body: usize,
        first_triangle: usize,
        created_body: bool,
    },
}

/// In-memory modeling kernel producing triangle meshes
///
/// Imports become sketches on the timeline, extrusions append prisms to a body.
/// Bodies are plain triangle soups: joined extrusions are concatenated, not
/// boolean-merged, which is what a layer-wise printable STL needs.
#[derive(Debug, Default)]
pub struct MeshKernel {
    bodies: Vec<Body>,
    timeline: Vec<Operation>,
    groups: Vec<OperationGroup>,
}

impl MeshKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn groups(&self) -> &[OperationGroup] {
        &self.groups
    }

    /// Names of the sketches on the timeline, in creation order
    pub fn sketch_names(&self) -> Vec<&str> {
        self.timeline
            .iter()
            .filter_map(|op| match op {
                Operation::Sketch { name } => Some(name.as_str()),
                Operation::Extrude { .. } => None,
            })
            .collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.bodies.iter().map(|b| b.triangles.len()).sum()
    }

    /// All triangles of all bodies
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.bodies.into_iter().flat_map(|b| b.triangles).collect()
    }
}

fn to_tuples(ring: Vec<Point2>) -> Vec<(f64, f64)> {
    ring.into_iter().map(|p| (p.x, p.y)).collect()
}

impl GeometryKernel for MeshKernel {
    type Sketch = ContourSketch;

    fn import_contour(
        &mut self,
        layer: &ContourLayer,
        origin: Point2,
        scale: f64,
    ) -> Result<ContourSketch, KernelError> {
        let rings = place_rings(read_contour(&layer.path)?, origin, scale);
        let name = format!("Contour {:04}", layer.index);
        debug!(sketch = %name, rings = rings.len(), "imported contour");

        self.timeline.push(Operation::Sketch { name: name.clone() });
        Ok(ContourSketch { name, rings })
    }

    fn extract_profiles(&self, sketch: &ContourSketch) -> Vec<Profile> {
        extract_profiles(&sketch.rings)
    }

    fn extrude(
        &mut self,
        profiles: &[&Profile],
        start_offset: f64,
        height: f64,
        mode: JoinMode,
    ) -> Result<(), KernelError> {
        if height.is_nan() || height <= 0.0 {
            return Err(KernelError::InvalidHeight(height));
        }
        if profiles.is_empty() {
            return Err(KernelError::EmptySelection);
        }

        let mut triangles = Vec::new();
        for profile in profiles {
            let Some(outer) = profile.outer_loops().next() else {
                continue;
            };
            let outer = to_tuples(oriented(&outer.ring(), true));
            let holes: Vec<Vec<(f64, f64)>> = profile
                .inner_loops()
                .map(|l| to_tuples(oriented(&l.ring(), false)))
                .collect();
            triangles.extend(extrude_polygon(
                &outer,
                &holes,
                start_offset,
                start_offset + height,
            ));
        }

        let (body, created_body) = match mode {
            JoinMode::Join if !self.bodies.is_empty() => (self.bodies.len() - 1, false),
            _ => {
                self.bodies.push(Body::default());
                (self.bodies.len() - 1, true)
            }
        };
        let target = &mut self.bodies[body].triangles;
        let first_triangle = target.len();
        target.extend(triangles);

        debug!(
            body,
            profiles = profiles.len(),
            triangles = target.len() - first_triangle,
            start_offset,
            "extruded profiles"
        );

        self.timeline.push(Operation::Extrude {
            body,
            first_triangle,
            created_body,
        });
        Ok(())
    }

    fn group_operations(&mut self, range: Range<usize>, name: &str) {
        self.groups.push(OperationGroup {
            name: name.to_string(),
            range,
        });
    }

    fn operation_count(&self) -> usize {
        self.timeline.len()
    }

    fn roll_back(&mut self, operations: usize) {
        while self.timeline.len() > operations {
            let Some(Operation::Extrude {
                body,
                first_triangle,
                created_body,
            }) = self.timeline.pop()
            else {
                continue;
            };
            if created_body {
                self.bodies.truncate(body);
            } else if let Some(b) = self.bodies.get_mut(body) {
                b.triangles.truncate(first_triangle);
            }
        }
        self.groups.retain(|g| g.range.end <= operations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{resolve, select_solid_profiles};
    use std::fs;
    use tempfile::tempdir;

    const RING_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <path d="M0 0 H30 V30 H0 Z M5 5 H25 V25 H5 Z M10 10 H20 V20 H10 Z"/>
</svg>"#;

    fn layer(dir: &std::path::Path, index: usize, contents: &str) -> ContourLayer {
        let path = dir.join(format!("{index:04}.svg"));
        fs::write(&path, contents).unwrap();
        ContourLayer::new(index, path)
    }

    #[test]
    fn test_import_names_sketch_and_scales() {
        let dir = tempdir().unwrap();
        let layer = layer(dir.path(), 7, RING_SVG);
        let mut kernel = MeshKernel::new();

        let sketch = kernel
            .import_contour(&layer, Point2::new(1.0, 1.0), 0.1)
            .unwrap();

        assert_eq!(sketch.name, "Contour 0007");
        assert_eq!(sketch.rings.len(), 3);
        assert!((sketch.rings[0][1].x - 4.0).abs() < 1e-12);
        assert_eq!(kernel.sketch_names(), vec!["Contour 0007"]);
        assert_eq!(kernel.operation_count(), 1);
    }

    #[test]
    fn test_import_failure_leaves_timeline_untouched() {
        let dir = tempdir().unwrap();
        let layer = layer(dir.path(), 0, r#"<svg><path d="M0 0 A 1 1 0 0 0 2 2 Z"/></svg>"#);
        let mut kernel = MeshKernel::new();

        assert!(kernel.import_contour(&layer, Point2::ORIGIN, 1.0).is_err());
        assert_eq!(kernel.operation_count(), 0);
    }

    #[test]
    fn test_extrude_selected_profiles() {
        let dir = tempdir().unwrap();
        let layer = layer(dir.path(), 0, RING_SVG);
        let mut kernel = MeshKernel::new();

        let sketch = kernel.import_contour(&layer, Point2::ORIGIN, 1.0).unwrap();
        let profiles = kernel.extract_profiles(&sketch);
        let hierarchy = resolve(&profiles).unwrap();
        let solid = select_solid_profiles(&hierarchy);
        assert_eq!(solid.len(), 2);

        kernel.extrude(&solid, 0.5, 0.25, JoinMode::Join).unwrap();

        // Annulus: 8 top + 8 bottom + 16 walls; inner square: 2 + 2 + 8
        assert_eq!(kernel.triangle_count(), 44);
        assert_eq!(kernel.bodies().len(), 1);
        for tri in &kernel.bodies()[0].triangles {
            let (lo, hi) = tri.z_range();
            assert!(lo >= 0.5 && hi <= 0.75);
        }
    }

    #[test]
    fn test_extrude_rejects_bad_input() {
        let profile = Profile::with_holes(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
            &[],
        );
        let mut kernel = MeshKernel::new();

        assert!(matches!(
            kernel.extrude(&[&profile], 0.0, 0.0, JoinMode::Join),
            Err(KernelError::InvalidHeight(_))
        ));
        assert!(matches!(
            kernel.extrude(&[], 0.0, 1.0, JoinMode::Join),
            Err(KernelError::EmptySelection)
        ));
        assert_eq!(kernel.operation_count(), 0);
    }

    #[test]
    fn test_join_modes_and_roll_back() {
        let square = Profile::with_holes(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            &[],
        );
        let mut kernel = MeshKernel::new();

        kernel.extrude(&[&square], 0.0, 1.0, JoinMode::Join).unwrap();
        kernel.extrude(&[&square], 1.0, 1.0, JoinMode::Join).unwrap();
        assert_eq!(kernel.bodies().len(), 1);
        assert_eq!(kernel.triangle_count(), 24);

        kernel.group_operations(0..2, "Layers");
        kernel.extrude(&[&square], 2.0, 1.0, JoinMode::NewBody).unwrap();
        assert_eq!(kernel.bodies().len(), 2);

        kernel.roll_back(1);
        assert_eq!(kernel.operation_count(), 1);
        assert_eq!(kernel.bodies().len(), 1);
        assert_eq!(kernel.triangle_count(), 12);
        assert!(kernel.groups().is_empty());

        kernel.roll_back(0);
        assert_eq!(kernel.triangle_count(), 0);
    }
}
