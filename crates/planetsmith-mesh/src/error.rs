//! Topology error types.

/// A base mesh that cannot be displaced. Reported before any generation work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// The base mesh has no vertices.
    #[error("base mesh has no vertices")]
    EmptyMesh,

    /// The index list does not describe whole triangles.
    #[error("index count {index_count} is not a multiple of 3")]
    IncompleteTriangle { index_count: usize },

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}
