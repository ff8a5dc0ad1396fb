//! Mesh data for the fan's parts, on the CPU and on the GPU.
//!
//! This module provides the two halves of every renderable primitive:
//!
//! - [`MeshData`] — CPU-side positions, normals, vertex colors and triangle indices,
//!   produced by the generators in [`geometry`](crate::geometry) and owned by the
//!   [`MeshRegistry`](crate::MeshRegistry)
//! - [`Vertex3d`] / [`Mesh`] — the interleaved vertex format and the GPU buffers a
//!   `MeshData` is uploaded into
//!
//! # Invariants
//!
//! A well-formed [`MeshData`] satisfies:
//!
//! - `normals.len() == colors.len() == positions.len()`
//! - every index is `< positions.len()`
//! - `indices.len()` is a multiple of 3
//!
//! [`MeshData::validate`] checks all three. Generators validate before returning, so
//! a mesh that made it into the registry is always safe to draw.
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | color     | Float32x3 | 24     | 2               |
//!
//! This layout is exposed via [`Vertex3d::LAYOUT`].

use glam::Vec3;

use crate::geometry::GeometryError;
use crate::gpu::GpuContext;

/// Positions, normals, vertex colors and triangle indices for one primitive.
///
/// Triangles wind counter-clockwise when viewed from the side their normals point to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions in the part's local space.
    pub positions: Vec<Vec3>,
    /// Unit normals, one per position.
    pub normals: Vec<Vec3>,
    /// Linear RGB colors, one per position.
    pub colors: Vec<[f32; 3]>,
    /// Triangle list; each consecutive triple references `positions`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, color: [f32; 3]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.colors.push(color);
        index
    }

    /// Appends one triangle.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles (`indices.len() / 3`).
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the vertex indices of triangle `i`, or `None` if out of range.
    pub fn triangle(&self, i: usize) -> Option<[u32; 3]> {
        let tri = self.indices.get(i * 3..i * 3 + 3)?;
        Some([tri[0], tri[1], tri[2]])
    }

    /// True if any two of triangle `i`'s positions coincide.
    pub fn is_degenerate_triangle(&self, i: usize) -> bool {
        let Some([a, b, c]) = self.triangle(i) else {
            return false;
        };
        let (pa, pb, pc) = (
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        );
        pa == pb || pb == pc || pa == pc
    }

    /// Computes the axis-aligned bounding box as `(min, max)`.
    ///
    /// An empty mesh yields `(+inf, -inf)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), &p| (min.min(p), max.max(p)),
        )
    }

    /// Checks the stream-length and index-range invariants.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let n = self.positions.len();
        if self.normals.len() != n || self.colors.len() != n {
            return Err(GeometryError::InvalidMesh(format!(
                "attribute length mismatch: {} positions, {} normals, {} colors",
                n,
                self.normals.len(),
                self.colors.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some((slot, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= n)
        {
            return Err(GeometryError::InvalidMesh(format!(
                "index {} at slot {} is out of range for {} vertices",
                index, slot, n
            )));
        }
        Ok(())
    }

    /// Interleaves the attribute streams into GPU vertices.
    pub fn to_vertices(&self) -> Vec<Vertex3d> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.colors)
            .map(|((p, n), c)| Vertex3d::new(p.to_array(), n.to_array(), *c))
            .collect()
    }
}

/// A vertex with position, normal and linear RGB color.
///
/// `#[repr(C)]` plus [`bytemuck::Pod`] lets a `&[Vertex3d]` be cast straight to bytes
/// for upload. Each vertex occupies 36 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// Position in model space.
    pub position: [f32; 3],
    /// Surface normal (unit length).
    pub normal: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout for this vertex type.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// GPU-resident geometry with vertex and index buffers.
///
/// Created once per registry entry by [`RenderQueue`](crate::RenderQueue) and reused
/// for every draw of that part.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Uploads validated mesh data to GPU buffers.
    pub fn upload(gpu: &GpuContext, label: &str, data: &MeshData) -> Self {
        use wgpu::util::DeviceExt;

        let vertices = data.to_vertices();

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        let mut mesh = MeshData::new();
        let a = mesh.push_vertex(Vec3::ZERO, Vec3::Z, [1.0, 0.0, 0.0]);
        let b = mesh.push_vertex(Vec3::X, Vec3::Z, [1.0, 0.0, 0.0]);
        let c = mesh.push_vertex(Vec3::Y, Vec3::Z, [1.0, 0.0, 0.0]);
        mesh.push_triangle(a, b, c);
        mesh
    }

    #[test]
    fn validate_accepts_well_formed_mesh() {
        assert!(triangle().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let mut mesh = triangle();
        mesh.push_triangle(0, 1, 3);
        let err = mesh.validate().unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn validate_rejects_partial_triangle() {
        let mut mesh = triangle();
        mesh.indices.push(0);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_colors() {
        let mut mesh = triangle();
        mesh.colors.pop();
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn degenerate_triangle_detection() {
        let mut mesh = triangle();
        assert!(!mesh.is_degenerate_triangle(0));
        let d = mesh.push_vertex(Vec3::X, Vec3::Z, [1.0, 0.0, 0.0]);
        mesh.push_triangle(0, 1, d);
        assert!(mesh.is_degenerate_triangle(1));
        assert!(!mesh.is_degenerate_triangle(7));
    }

    #[test]
    fn bounds_cover_all_positions() {
        let (min, max) = triangle().bounds();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn interleaved_vertices_match_streams() {
        let vertices = triangle().to_vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 1.0]);
        assert_eq!(std::mem::size_of::<Vertex3d>(), 36);
    }
}
