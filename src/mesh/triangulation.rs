use earcutr::earcut;

/// Triangulate a ring with holes, returning vertex indices into the
/// concatenation `outer ++ holes[0] ++ holes[1] ++ ...`
pub fn triangulate_polygon(outer: &[(f64, f64)], holes: &[Vec<(f64, f64)>]) -> Vec<usize> {
    if outer.len() < 3 {
        return Vec::new();
    }

    let total = outer.len() + holes.iter().map(Vec::len).sum::<usize>();
    let mut vertices: Vec<f64> = Vec::with_capacity(total * 2);
    let mut hole_indices: Vec<usize> = Vec::with_capacity(holes.len());

    for &(x, y) in outer {
        vertices.extend([x, y]);
    }

    for hole in holes.iter().filter(|h| h.len() >= 3) {
        hole_indices.push(vertices.len() / 2);
        for &(x, y) in hole {
            vertices.extend([x, y]);
        }
    }

    earcut(&vertices, &hole_indices, 2).unwrap_or_default()
}
