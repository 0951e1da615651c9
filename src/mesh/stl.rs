use super::Triangle;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write triangles to a binary STL file
pub fn write_stl(path: &Path, triangles: &[Triangle]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let mesh: Vec<stl_io::Triangle> = triangles.iter().map(to_stl).collect();
    stl_io::write_stl(&mut writer, mesh.iter())
        .with_context(|| format!("Failed to write STL file: {}", path.display()))?;

    Ok(())
}

fn to_stl(tri: &Triangle) -> stl_io::Triangle {
    stl_io::Triangle {
        normal: stl_io::Normal::new(tri.normal),
        vertices: tri.vertices.map(stl_io::Vertex::new),
    }
}

/// Size in bytes of a binary STL holding `triangle_count` facets
pub fn estimate_stl_size(triangle_count: usize) -> usize {
    // 80 header + 4 count + 50 per facet (normal, three vertices, attribute)
    84 + triangle_count * 50
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_stl_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layers.stl");

        let triangles = vec![
            Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            Triangle::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        write_stl(&path, &triangles).unwrap();

        let metadata = fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), estimate_stl_size(2) as u64);

        let mut file = File::open(&path).unwrap();
        let mesh = stl_io::read_stl(&mut file).unwrap();
        assert_eq!(mesh.faces.len(), 2);
    }

    #[test]
    fn test_write_stl_bad_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.stl");
        assert!(write_stl(&path, &[]).is_err());
    }

    #[test]
    fn test_estimate_size() {
        assert_eq!(estimate_stl_size(0), 84);
        assert_eq!(estimate_stl_size(1), 134);
    }
}
