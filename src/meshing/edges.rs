/// Line-list indices for wireframe drawing: the three sides of every triangle.
/// Sides shared by two triangles appear twice.
pub fn triangle_edges(triangles: &[u32]) -> Vec<u32> {
    let mut edges = Vec::with_capacity(triangles.len() * 2);

    for tri in triangles.chunks_exact(3) {
        edges.extend([tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]]);
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_edges_are_kept() {
        let edges = triangle_edges(&[0, 1, 2, 1, 3, 2]);

        assert_eq!(edges, vec![0, 1, 1, 2, 2, 0, 1, 3, 3, 2, 2, 1]);
    }

    #[test]
    fn test_empty_input() {
        assert!(triangle_edges(&[]).is_empty());
    }
}
