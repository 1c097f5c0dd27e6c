//! Smooth vertex normals recomputed from displaced positions.

use glam::{DVec3, Vec3};

/// Area-weighted smooth normals for an indexed triangle list.
///
/// Each triangle adds its unnormalized face normal (twice its area) to its
/// three vertices. Vertices with no usable contribution fall back to their
/// radial direction. Triangles referencing a vertex past the end of
/// `positions` are skipped.
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![DVec3::ZERO; positions.len()];
    let point = |i: usize| Vec3::from_array(positions[i]).as_dvec3();

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a.max(b).max(c) >= positions.len() {
            continue;
        }
        let (pa, pb, pc) = (point(a), point(b), point(c));
        let face = (pb - pa).cross(pc - pa);
        accumulated[a] += face;
        accumulated[b] += face;
        accumulated[c] += face;
    }

    accumulated
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let normal = n.normalize_or_zero();
            let normal = if normal == DVec3::ZERO {
                point(i).normalize_or_zero()
            } else {
                normal
            };
            normal.as_vec3().to_array()
        })
        .collect()
}
