//! Base unit-sphere meshes supplied by the host.
//!
//! The topology (triangle index list) belongs to the base mesh and is never
//! modified by terrain generation; only per-vertex attributes are produced.

use std::collections::HashMap;

use glam::Vec3;

use crate::error::TopologyError;

/// Unit-sphere vertex positions plus an immutable triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaseMesh {
    /// Vertex positions, expected to be (close to) unit length.
    pub positions: Vec<Vec3>,
    /// Triangle indices, three per triangle, counter-clockwise from outside.
    pub indices: Vec<u32>,
}

impl BaseMesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Generate an icosphere with the given number of subdivisions.
    ///
    /// Subdivision 0 is the 12-vertex icosahedron; each level splits every
    /// triangle into four. Subdivision 5 yields ~20k triangles.
    pub fn icosphere(subdivisions: u32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

        let mut positions: Vec<Vec3> = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .into_iter()
        .map(Vec3::normalize)
        .collect();

        let mut indices: Vec<u32> = vec![
            0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6,
            7, 1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6,
            7, 9, 8, 1,
        ];

        for _ in 0..subdivisions {
            subdivide(&mut positions, &mut indices);
        }

        Self { positions, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that the mesh has vertices and every index is in range.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let vertex_count = self.positions.len();
        if vertex_count == 0 {
            return Err(TopologyError::EmptyMesh);
        }
        if self.indices.len() % 3 != 0 {
            return Err(TopologyError::IncompleteTriangle {
                index_count: self.indices.len(),
            });
        }
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= vertex_count)
        {
            return Err(TopologyError::IndexOutOfRange {
                triangle: position / 3,
                index,
                vertex_count,
            });
        }
        Ok(())
    }
}

/// Split each triangle into four at its edge midpoints, reusing shared midpoints.
fn subdivide(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>) {
    let mut midpoint_cache: HashMap<(u32, u32), u32> = HashMap::new();
    let mut new_indices = Vec::with_capacity(indices.len() * 4);

    let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        *midpoint_cache.entry(key).or_insert_with(|| {
            let mid = (positions[a as usize] + positions[b as usize]).normalize();
            positions.push(mid);
            (positions.len() - 1) as u32
        })
    };

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, positions);
        let bc = midpoint(b, c, positions);
        let ca = midpoint(c, a, positions);

        new_indices.extend_from_slice(&[a, ab, ca]);
        new_indices.extend_from_slice(&[b, bc, ab]);
        new_indices.extend_from_slice(&[c, ca, bc]);
        new_indices.extend_from_slice(&[ab, bc, ca]);
    }

    *indices = new_indices;
}
