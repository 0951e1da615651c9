//! Readers turning a contour file into closed rings of points

pub mod json;
pub mod svg;

use super::KernelError;
use crate::domain::Point2;
use std::path::Path;
use tracing::warn;

/// Read the closed rings of a contour file, in file coordinates
///
/// The format is chosen from the file extension (`svg` or `json`).
pub fn read_contour(path: &Path) -> Result<Vec<Vec<Point2>>, KernelError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "svg" => svg::parse_svg(&read_to_string(path)?).map_err(|message| KernelError::Parse {
            path: path.to_path_buf(),
            message,
        }),
        "json" => json::parse_json(&read_to_string(path)?).map_err(|source| KernelError::Json {
            path: path.to_path_buf(),
            source,
        }),
        other => Err(KernelError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: other.to_string(),
        }),
    }
}

fn read_to_string(path: &Path) -> Result<String, KernelError> {
    std::fs::read_to_string(path).map_err(|source| KernelError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Map rings into model space (`origin + scale * p`) and drop unusable ones
pub fn place_rings(rings: Vec<Vec<Point2>>, origin: Point2, scale: f64) -> Vec<Vec<Point2>> {
    rings
        .into_iter()
        .filter_map(|ring| {
            let placed = ring
                .into_iter()
                .map(|p| Point2::new(origin.x + scale * p.x, origin.y + scale * p.y))
                .collect();
            let cleaned = clean_ring(placed);
            if cleaned.is_none() {
                warn!("skipping contour ring with fewer than 3 distinct points");
            }
            cleaned
        })
        .collect()
}

/// Remove consecutive duplicates and the closing duplicate of a ring
///
/// Returns `None` when fewer than three points remain.
pub fn clean_ring(mut ring: Vec<Point2>) -> Option<Vec<Point2>> {
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    (ring.len() >= 3).then_some(ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_clean_ring_drops_duplicates() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let cleaned = clean_ring(ring).unwrap();
        assert_eq!(cleaned.len(), 3);
    }

    #[test]
    fn test_clean_ring_rejects_degenerate() {
        let ring = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 0.0)];
        assert!(clean_ring(ring).is_none());
    }

    #[test]
    fn test_place_rings_scales_and_offsets() {
        let rings = vec![vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ]];
        let placed = place_rings(rings, Point2::new(1.0, 2.0), 0.5);
        assert_eq!(placed[0][1], Point2::new(6.0, 2.0));
        assert_eq!(placed[0][2], Point2::new(6.0, 7.0));
    }

    #[test]
    fn test_read_contour_dispatches_on_extension() {
        let dir = tempdir().unwrap();
        let svg = dir.path().join("0000.svg");
        fs::write(&svg, r#"<svg><polygon points="0,0 4,0 4,4"/></svg>"#).unwrap();
        let json = dir.path().join("0001.json");
        fs::write(&json, r#"{"loops": [[[0, 0], [4, 0], [4, 4]]]}"#).unwrap();

        assert_eq!(read_contour(&svg).unwrap().len(), 1);
        assert_eq!(read_contour(&json).unwrap().len(), 1);
    }

    #[test]
    fn test_read_contour_errors() {
        let dir = tempdir().unwrap();
        let dxf = dir.path().join("0000.dxf");
        fs::write(&dxf, "").unwrap();
        assert!(matches!(
            read_contour(&dxf),
            Err(KernelError::UnsupportedFormat { .. })
        ));

        let missing = dir.path().join("0001.svg");
        assert!(matches!(
            read_contour(&missing),
            Err(KernelError::Read { .. })
        ));

        let bad = dir.path().join("0002.svg");
        fs::write(&bad, r#"<svg><path d="M0 0 C 1 1 2 2 3 3 Z"/></svg>"#).unwrap();
        assert!(matches!(read_contour(&bad), Err(KernelError::Parse { .. })));
    }
}
