use bevy::prelude::Vec3;
use tracing::debug;

/// Normal given to vertices whose accumulated normal has zero length.
pub const DEFAULT_NORMAL: Vec3 = Vec3::Z;

/// Per-vertex normals from the unnormalized sum of adjacent face normals.
///
/// Each face contributes its raw cross product, so larger faces weigh more.
pub fn vertex_normals(vertices: &[Vec3], triangles: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];

    for tri in triangles.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (v1, v2, v3) = (vertices[a], vertices[b], vertices[c]);

        // Edge vectors leaving each corner
        normals[a] += (v2 - v1).cross(v3 - v1);
        normals[b] += (v3 - v2).cross(v1 - v2);
        normals[c] += (v1 - v3).cross(v2 - v3);
    }

    normalize_all(normals)
}

pub(crate) fn normalize_all(mut normals: Vec<Vec3>) -> Vec<Vec3> {
    let mut degenerate = 0;

    for n in normals.iter_mut() {
        *n = n.try_normalize().unwrap_or_else(|| {
            degenerate += 1;
            DEFAULT_NORMAL
        });
    }

    if degenerate > 0 {
        debug!(degenerate, "Terrain: substituted default normals");
    }

    normals
}
