use bevy::prelude::Vec3;
use ndarray::Array2;

use crate::config::GridParams;

/// Vertex heights indexed by `[[row, column]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap(pub Array2<f32>);

impl HeightMap {
    /// A flat heightmap covering every vertex of `grid`.
    pub fn flat(grid: &GridParams) -> Self {
        Self(Array2::zeros((grid.side(), grid.side())))
    }

    /// World-space position of vertex `(i, j)`: columns run along x, rows along y.
    pub fn vertex_at(&self, grid: &GridParams, i: usize, j: usize) -> Vec3 {
        Vec3 {
            x: grid.min_x + grid.delta_x() * j as f32,
            y: grid.min_y + grid.delta_y() * i as f32,
            z: self.0[[i, j]],
        }
    }

    pub fn height_at(&self, i: usize, j: usize) -> f32 {
        self.0[[i, j]]
    }

    /// Minimum and maximum height.
    pub fn range(&self) -> (f32, f32) {
        self.0
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }
}
