//! Mesh geometry
//!
//! CPU-side mesh data with the scene's primitive shapes, and the GPU mesh
//! drawn by every pass.

use crate::context::WgpuContext;
use crate::core::buffer::{IndexBuffer, VertexBuffer};
use crate::core::vertex::Vertex;
use glam::Vec3;

/// Indexed triangle list before upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Four-sided pyramid with its apex at +Y and smoothed normals.
    pub fn pyramid() -> Self {
        let mut vertices = vec![
            Vertex::new([-1.0, -1.0, 0.0], [0.0, 0.0], [0.0; 3]),
            Vertex::new([0.0, -1.0, 1.0], [0.5, 0.0], [0.0; 3]),
            Vertex::new([1.0, -1.0, 0.0], [1.0, 0.0], [0.0; 3]),
            Vertex::new([0.0, 1.0, 0.0], [0.5, 1.0], [0.0; 3]),
        ];
        let indices = vec![0, 1, 3, 1, 2, 3, 2, 0, 3, 0, 2, 1];
        calc_average_normals(&indices, &mut vertices);
        Self::new(vertices, indices)
    }

    /// Square floor in the XZ plane facing +Y. The texture repeats
    /// `uv_repeat` times along each edge.
    pub fn floor(half_extent: f32, uv_repeat: f32) -> Self {
        let (h, r) = (half_extent, uv_repeat);
        let up = [0.0, 1.0, 0.0];
        let vertices = vec![
            Vertex::new([-h, 0.0, -h], [0.0, 0.0], up),
            Vertex::new([h, 0.0, -h], [r, 0.0], up),
            Vertex::new([-h, 0.0, h], [0.0, r], up),
            Vertex::new([h, 0.0, h], [r, r], up),
        ];
        let indices = vec![0, 2, 1, 1, 2, 3];
        Self::new(vertices, indices)
    }
}

/// Replace vertex normals with the normalized sum of the face normals of
/// every triangle that uses the vertex.
///
/// Face normals follow the counter-clockwise winding of each triangle.
/// Vertices no triangle references end up with a zero normal. Triangles
/// with an index past the end of `vertices` are skipped.
pub fn calc_average_normals(indices: &[u32], vertices: &mut [Vertex]) {
    let mut sums = vec![Vec3::ZERO; vertices.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if [a, b, c].iter().any(|&i| i >= vertices.len()) {
            tracing::warn!(?triangle, "triangle index out of range, skipped");
            continue;
        }
        let p0 = Vec3::from(vertices[a].position);
        let p1 = Vec3::from(vertices[b].position);
        let p2 = Vec3::from(vertices[c].position);

        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        sums[a] += normal;
        sums[b] += normal;
        sums[c] += normal;
    }

    for (vertex, sum) in vertices.iter_mut().zip(sums) {
        vertex.normal = sum.normalize_or_zero().to_array();
    }
}

/// Uploaded mesh.
pub struct Mesh {
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
}

impl Mesh {
    /// Upload mesh data.
    pub fn new(ctx: &WgpuContext, data: &MeshData, label: Option<&str>) -> Self {
        Self {
            vertex_buffer: VertexBuffer::new(ctx, &data.vertices, label),
            index_buffer: IndexBuffer::new(ctx, &data.indices, label),
        }
    }

    /// Bind the buffers and issue the indexed draw.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice());
        pass.set_index_buffer(self.index_buffer.slice(), self.index_buffer.format());
        pass.draw_indexed(0..self.index_buffer.count(), 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_single_triangle_normal() {
        let mut vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0], [0.0; 3]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0], [0.0; 3]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0], [0.0; 3]),
        ];
        calc_average_normals(&[0, 1, 2], &mut vertices);
        for vertex in &vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_shared_vertex_averages() {
        // Two triangles folded 90 degrees along the shared X edge.
        let mut vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0], [0.0; 3]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0], [0.0; 3]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0], [0.0; 3]),
            Vertex::new([0.0, 0.0, 1.0], [0.0, 0.0], [0.0; 3]),
        ];
        calc_average_normals(&[0, 1, 2, 0, 3, 1], &mut vertices);

        let shared = Vec3::from(vertices[0].normal);
        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((shared - expected).length() < EPSILON);
        assert_eq!(vertices[2].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[3].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_pyramid_normals_point_outward() {
        let pyramid = MeshData::pyramid();
        assert_eq!(pyramid.vertices.len(), 4);
        assert_eq!(pyramid.indices.len(), 12);

        let centre = pyramid
            .vertices
            .iter()
            .map(|v| Vec3::from(v.position))
            .sum::<Vec3>()
            / 4.0;
        for vertex in &pyramid.vertices {
            let normal = Vec3::from(vertex.normal);
            assert!((normal.length() - 1.0).abs() < EPSILON);
            assert!(normal.dot(Vec3::from(vertex.position) - centre) > 0.0);
        }
    }

    #[test]
    fn test_floor_winding_faces_up() {
        let floor = MeshData::floor(10.0, 10.0);
        let mut recomputed = floor.vertices.clone();
        calc_average_normals(&floor.indices, &mut recomputed);
        for vertex in &recomputed {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
        assert_eq!(floor.vertices[3].uv, [10.0, 10.0]);
    }

    #[test]
    fn test_unreferenced_vertex_gets_zero_normal() {
        let mut vertices = vec![Vertex::new([0.0; 3], [0.0; 2], [1.0, 0.0, 0.0])];
        calc_average_normals(&[], &mut vertices);
        assert_eq!(vertices[0].normal, [0.0; 3]);
    }

    #[test]
    fn test_out_of_range_triangle_is_skipped() {
        let mut vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0], [0.0; 3]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0], [0.0; 3]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0], [0.0; 3]),
        ];
        calc_average_normals(&[0, 1, 2, 0, 1, 7], &mut vertices);
        for vertex in &vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }
}
