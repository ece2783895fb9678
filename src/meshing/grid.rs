use bevy::prelude::Vec3;

use crate::config::GridParams;
use crate::error::Result;
use crate::HeightMap;

/// Vertex positions in row-major order, heights taken from `heights`.
pub fn grid_vertices(grid: &GridParams, heights: &HeightMap) -> Vec<Vec3> {
    let mut vertices = Vec::with_capacity(grid.vertex_count());

    for i in 0..grid.side() {
        for j in 0..grid.side() {
            vertices.push(heights.vertex_at(grid, i, j));
        }
    }

    vertices
}

/// Two counter-clockwise triangles per cell, seen from +z.
pub fn grid_triangles(grid: &GridParams) -> Vec<u32> {
    let div = grid.div as usize;
    let mut triangles = Vec::with_capacity(grid.triangle_count() * 3);
    let idx = |i: usize, j: usize| -> u32 { grid.index(i, j) as u32 };

    for i in 0..div {
        for j in 0..div {
            triangles.extend([idx(i, j), idx(i, j + 1), idx(i + 1, j)]);
            triangles.extend([idx(i, j + 1), idx(i + 1, j + 1), idx(i + 1, j)]);
        }
    }

    triangles
}

/// Flat (z = 0) vertex and triangle buffers for `grid`.
pub fn flat_grid(grid: &GridParams) -> Result<(Vec<Vec3>, Vec<u32>)> {
    grid.validate()?;
    let vertices = grid_vertices(grid, &HeightMap::flat(grid));
    Ok((vertices, grid_triangles(grid)))
}
