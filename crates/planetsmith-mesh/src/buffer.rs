//! Per-vertex attribute buffers, index-aligned with the base mesh.

/// Positions, colors and normals for one mesh, stored as parallel arrays.
///
/// Entry `i` of every array belongs to vertex `i` of the base mesh, so the
/// host can reuse the base triangle list unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexBuffer {
    /// Displaced positions, one per vertex.
    pub positions: Vec<[f32; 3]>,
    /// Linear RGBA vertex colors, one per vertex.
    pub colors: Vec<[f32; 4]>,
    /// Unit vertex normals, one per vertex.
    pub normals: Vec<[f32; 3]>,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with room for `cap` vertices.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            positions: Vec::with_capacity(cap),
            colors: Vec::with_capacity(cap),
            normals: Vec::with_capacity(cap),
        }
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the buffer holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `true` when every attribute array has one entry per position.
    pub fn is_aligned(&self) -> bool {
        self.colors.len() == self.positions.len() && self.normals.len() == self.positions.len()
    }

    /// Distance of vertex `i` from the origin.
    pub fn radius(&self, i: usize) -> f32 {
        let [x, y, z] = self.positions[i];
        (x * x + y * y + z * z).sqrt()
    }

    /// Position data as bytes for GPU upload.
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Color data as bytes for GPU upload.
    pub fn colors_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Normal data as bytes for GPU upload.
    pub fn normals_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Total size of all attribute arrays in bytes.
    pub fn byte_size(&self) -> usize {
        self.positions_bytes().len() + self.colors_bytes().len() + self.normals_bytes().len()
    }
}
