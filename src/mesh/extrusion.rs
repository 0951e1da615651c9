use super::builder::{MeshBuilder, Triangle};
use super::triangulation::triangulate_polygon;

/// Extrude a planar region with holes into a closed prism between `z_bottom` and `z_top`
///
/// The outer ring must be counter-clockwise and hole rings clockwise; side walls
/// are then emitted with the same winding for both and face away from the material.
/// Rings with fewer than three points are ignored.
pub fn extrude_polygon(
    outer: &[(f64, f64)],
    holes: &[Vec<(f64, f64)>],
    z_bottom: f64,
    z_top: f64,
) -> Vec<Triangle> {
    if outer.len() < 3 || z_top <= z_bottom {
        return Vec::new();
    }

    let holes: Vec<Vec<(f64, f64)>> = holes.iter().filter(|h| h.len() >= 3).cloned().collect();
    let indices = triangulate_polygon(outer, &holes);
    if indices.is_empty() {
        return Vec::new();
    }

    let all_points: Vec<(f64, f64)> = outer
        .iter()
        .chain(holes.iter().flatten())
        .copied()
        .collect();

    let (zb, zt) = (z_bottom as f32, z_top as f32);
    let mut builder = MeshBuilder::new();

    for tri in indices.chunks_exact(3) {
        let [mut a, mut b, c] = [all_points[tri[0]], all_points[tri[1]], all_points[tri[2]]];
        if cross_2d(a, b, c) < 0.0 {
            std::mem::swap(&mut a, &mut b);
        }
        let (a, b, c) = (to_f32(a), to_f32(b), to_f32(c));

        builder.add_triangle([a.0, a.1, zt], [b.0, b.1, zt], [c.0, c.1, zt]);
        builder.add_triangle([a.0, a.1, zb], [c.0, c.1, zb], [b.0, b.1, zb]);
    }

    add_side_walls(&mut builder, outer, zb, zt);
    for hole in &holes {
        add_side_walls(&mut builder, hole, zb, zt);
    }

    builder.finish()
}

fn add_side_walls(builder: &mut MeshBuilder, ring: &[(f64, f64)], z_bottom: f32, z_top: f32) {
    let n = ring.len();
    for i in 0..n {
        let p1 = to_f32(ring[i]);
        let p2 = to_f32(ring[(i + 1) % n]);
        builder.add_quad(
            [p1.0, p1.1, z_bottom],
            [p2.0, p2.1, z_bottom],
            [p2.0, p2.1, z_top],
            [p1.0, p1.1, z_top],
        );
    }
}

fn cross_2d(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn to_f32((x, y): (f64, f64)) -> (f32, f32) {
    (x as f32, y as f32)
}
