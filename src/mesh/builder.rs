/// A triangle for STL output
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Three vertices: [[x, y, z], [x, y, z], [x, y, z]]
    pub vertices: [[f32; 3]; 3],
    /// Unit normal following the right-hand rule on the vertex order
    pub normal: [f32; 3],
}

impl Triangle {
    pub fn new(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> Self {
        let vertices = [v0, v1, v2];
        Self {
            normal: face_normal(&vertices),
            vertices,
        }
    }

    /// Area via the cross product of two edges
    pub fn area(&self) -> f32 {
        let c = cross(&self.vertices);
        0.5 * (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.vertices.iter().flatten().all(|c| c.is_finite())
            && self.normal.iter().all(|c| c.is_finite())
    }

    /// Lowest and highest z among the vertices
    pub fn z_range(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v[2]), hi.max(v[2]))
            })
    }
}

fn cross(vertices: &[[f32; 3]; 3]) -> [f32; 3] {
    let [v0, v1, v2] = vertices;
    let u = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let v = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

/// Normalized cross product; degenerate triangles point up
pub(crate) fn face_normal(vertices: &[[f32; 3]; 3]) -> [f32; 3] {
    let [nx, ny, nz] = cross(vertices);
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    if len > 1e-10 {
        [nx / len, ny / len, nz / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

/// Accumulator for building triangle meshes
#[derive(Debug, Default)]
pub struct MeshBuilder {
    triangles: Vec<Triangle>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_triangle(&mut self, v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) {
        self.triangles.push(Triangle::new(v0, v1, v2));
    }

    /// Add a quad as two triangles; vertices in counter-clockwise order seen from outside
    pub fn add_quad(&mut self, v0: [f32; 3], v1: [f32; 3], v2: [f32; 3], v3: [f32; 3]) {
        self.add_triangle(v0, v1, v2);
        self.add_triangle(v0, v2, v3);
    }

    pub fn extend(&mut self, triangles: impl IntoIterator<Item = Triangle>) {
        self.triangles.extend(triangles);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn finish(self) -> Vec<Triangle> {
        self.triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_normal() {
        let tri = Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!((tri.normal[2] - 1.0).abs() < 0.001);
        assert!((tri.area() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_normal_points_up() {
        let tri = Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert_eq!(tri.normal, [0.0, 0.0, 1.0]);
        assert!(tri.area() < 1e-10);
    }

    #[test]
    fn test_z_range() {
        let tri = Triangle::new([0.0, 0.0, 0.5], [1.0, 0.0, 0.2], [0.0, 1.0, 0.9]);
        assert_eq!(tri.z_range(), (0.2, 0.9));
    }

    #[test]
    fn test_mesh_builder_quad() {
        let mut builder = MeshBuilder::new();
        builder.add_quad(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        );
        assert_eq!(builder.len(), 2);
        let tris = builder.finish();
        // Wall seen from -y: normal points to -y
        assert!((tris[0].normal[1] + 1.0).abs() < 0.001);
    }
}
