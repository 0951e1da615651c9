//! Cleanup of the accumulated body before it is written out

use super::Triangle;
use super::builder::face_normal;

/// Facets smaller than this (square model units) are dropped
const MIN_TRIANGLE_AREA: f32 = 1e-10;

/// Counts gathered while cleaning a mesh
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshReport {
    pub total: usize,
    pub degenerate: usize,
    pub non_finite: usize,
}

impl MeshReport {
    pub fn kept(&self) -> usize {
        self.total - self.degenerate - self.non_finite
    }

    pub fn has_issues(&self) -> bool {
        self.degenerate > 0 || self.non_finite > 0
    }

    pub fn summary(&self) -> String {
        if self.has_issues() {
            format!(
                "{} of {} triangles kept ({} degenerate, {} non-finite removed)",
                self.kept(),
                self.total,
                self.degenerate,
                self.non_finite
            )
        } else {
            format!("{} triangles, no issues", self.total)
        }
    }
}

/// Drop NaN/Inf and zero-area facets and recompute every normal
pub fn clean_mesh(triangles: Vec<Triangle>) -> (Vec<Triangle>, MeshReport) {
    let mut report = MeshReport {
        total: triangles.len(),
        ..Default::default()
    };

    let cleaned = triangles
        .into_iter()
        .filter_map(|mut tri| {
            if !tri.vertices.iter().flatten().all(|c| c.is_finite()) {
                report.non_finite += 1;
                return None;
            }
            if tri.area() < MIN_TRIANGLE_AREA {
                report.degenerate += 1;
                return None;
            }
            tri.normal = face_normal(&tri.vertices);
            Some(tri)
        })
        .collect();

    (cleaned, report)
}
