mod edges;
mod grid;
mod normals;

pub use edges::triangle_edges;
pub use grid::{flat_grid, grid_triangles, grid_vertices};
pub use normals::{vertex_normals, DEFAULT_NORMAL};

use bevy::{
    prelude::*,
    render::{mesh::Indices, render_resource::PrimitiveTopology},
};
use tracing::info;

use crate::config::{FaultSettings, GridParams, TerrainConfig};
use crate::error::Result;
use crate::generation::{fault_formation, FaultSource, RandomFaults};
use crate::HeightMap;

/// How vertex colours are assigned when building a render mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// No vertex colours; the material colour applies.
    #[default]
    Uniform,
    /// Normal components as RGB.
    Normals,
    /// Height ramp from water through grass and rock to snow.
    Elevation,
}

/// A finished fault-formation terrain. Immutable once generated; build a new
/// one for a different terrain.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    params: GridParams,
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    triangles: Vec<u32>,
    edges: Vec<u32>,
}

impl TerrainMesh {
    /// Runs the full pipeline: grid, faults, normals, edges.
    pub fn generate(
        params: GridParams,
        faults: &FaultSettings,
        source: &mut impl FaultSource,
    ) -> Result<Self> {
        params.validate()?;
        faults.validate()?;

        let triangles = grid_triangles(&params);
        info!(
            vertices = params.vertex_count(),
            triangles = triangles.len() / 3,
            "Terrain: generated triangles"
        );

        let mut heights = HeightMap::flat(&params);
        fault_formation(&mut heights, params.div, faults, source);
        let vertices = grid_vertices(&params, &heights);

        let normals = vertex_normals(&vertices, &triangles);
        info!("Terrain: generated normals");

        let edges = triangle_edges(&triangles);
        info!(edges = edges.len() / 2, "Terrain: generated lines");

        Ok(Self {
            params,
            vertices,
            normals,
            triangles,
            edges,
        })
    }

    /// Generates a terrain with PCG faults seeded by `seed`.
    pub fn from_config(config: &TerrainConfig, seed: u64) -> Result<Self> {
        Self::generate(config.grid, &config.faults, &mut RandomFaults::seeded(seed))
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Positions as a flat `x, y, z` buffer.
    pub fn vertex_buffer(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }

    /// Flat triangle-list indices.
    pub fn triangle_indices(&self) -> &[u32] {
        &self.triangles
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
    }

    /// Flat line-list indices.
    pub fn edge_indices(&self) -> &[u32] {
        &self.edges
    }

    pub fn edges(&self) -> impl Iterator<Item = [u32; 2]> + '_ {
        self.edges.chunks_exact(2).map(|e| [e[0], e[1]])
    }

    pub fn vertex_at(&self, i: usize, j: usize) -> Option<Vec3> {
        self.grid_index(i, j).map(|idx| self.vertices[idx])
    }

    pub fn normal_at(&self, i: usize, j: usize) -> Option<Vec3> {
        self.grid_index(i, j).map(|idx| self.normals[idx])
    }

    /// Lowest and highest vertex height.
    pub fn height_range(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.z), hi.max(v.z))
            })
    }

    fn grid_index(&self, i: usize, j: usize) -> Option<usize> {
        let side = self.params.side();
        (i < side && j < side).then(|| self.params.index(i, j))
    }

    pub fn to_render_mesh(&self, color_mode: ColorMode) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);

        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.position_attribute());

        match color_mode {
            ColorMode::Uniform => {}
            ColorMode::Normals => {
                mesh.insert_attribute(
                    Mesh::ATTRIBUTE_COLOR,
                    self.normals
                        .iter()
                        .map(|n| [n.x, n.y, n.z, 1.])
                        .collect::<Vec<_>>(),
                );
            }
            ColorMode::Elevation => {
                let (min, max) = self.height_range();
                mesh.insert_attribute(
                    Mesh::ATTRIBUTE_COLOR,
                    self.vertices
                        .iter()
                        .map(|v| elevation_color(v.z, min, max))
                        .collect::<Vec<_>>(),
                );
            }
        }

        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normal_attribute());
        mesh.set_indices(Some(Indices::U32(self.triangles.clone())));

        mesh
    }

    /// Line-list mesh over the edge buffer.
    pub fn to_wireframe_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::LineList);

        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.position_attribute());
        // The PBR pipeline requires normals even for lines
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normal_attribute());
        mesh.set_indices(Some(Indices::U32(self.edges.clone())));

        mesh
    }

    fn position_attribute(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| v.to_array()).collect()
    }

    fn normal_attribute(&self) -> Vec<[f32; 3]> {
        self.normals.iter().map(|n| n.to_array()).collect()
    }
}

const ELEVATION_RAMP: [(f32, [f32; 3]); 4] = [
    (0.0, [0.10, 0.30, 0.60]),
    (0.35, [0.25, 0.55, 0.20]),
    (0.70, [0.45, 0.35, 0.25]),
    (1.0, [0.95, 0.95, 0.95]),
];

fn elevation_color(z: f32, min: f32, max: f32) -> [f32; 4] {
    let t = if max > min { (z - min) / (max - min) } else { 0.5 };

    let upper = ELEVATION_RAMP
        .iter()
        .position(|&(stop, _)| t <= stop)
        .unwrap_or(ELEVATION_RAMP.len() - 1)
        .max(1);
    let (lo_t, lo) = ELEVATION_RAMP[upper - 1];
    let (hi_t, hi) = ELEVATION_RAMP[upper];
    let s = ((t - lo_t) / (hi_t - lo_t)).clamp(0., 1.);

    [
        lo[0] + (hi[0] - lo[0]) * s,
        lo[1] + (hi[1] - lo[1]) * s,
        lo[2] + (hi[2] - lo[2]) * s,
        1.,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{Fault, ScriptedFaults};

    fn unit_grid(div: u32) -> GridParams {
        GridParams::new(div, -1., 1., -1., 1.).unwrap()
    }

    #[test]
    fn test_single_cell_without_faults() {
        let faults = FaultSettings {
            iterations: 0,
            ..Default::default()
        };
        let mesh =
            TerrainMesh::generate(unit_grid(1), &faults, &mut RandomFaults::seeded(0)).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(
            mesh.vertex_buffer(),
            vec![-1., -1., 0., 1., -1., 0., -1., 1., 0., 1., 1., 0.]
        );
        assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 1, 2], [1, 3, 2]]);
        assert_eq!(mesh.edges().count(), 6);
        assert!(mesh.normals().iter().all(|&n| n == Vec3::Z));
    }

    #[test]
    fn test_grid_lookup() {
        let mesh = TerrainMesh::from_config(&TerrainConfig::default(), 5).unwrap();
        let div = mesh.params().div as usize;

        assert_eq!(mesh.vertex_at(0, 0), Some(mesh.vertices()[0]));
        assert_eq!(
            mesh.normal_at(div, 1),
            Some(mesh.normals()[div * (div + 1) + 1])
        );
        assert_eq!(mesh.vertex_at(div + 1, 0), None);
        assert_eq!(mesh.normal_at(0, div + 1), None);
    }

    #[test]
    fn test_scripted_fault_reaches_vertices() {
        let faults = FaultSettings {
            iterations: 1,
            delta: 0.5,
        };
        let mut source = ScriptedFaults::new(vec![Fault::new(1, 1, 0.)]);
        let mesh = TerrainMesh::generate(unit_grid(2), &faults, &mut source).unwrap();

        for j in 0..3 {
            assert_eq!(mesh.vertex_at(0, j).unwrap().z, -0.5);
            assert_eq!(mesh.vertex_at(1, j).unwrap().z, 0.);
            assert_eq!(mesh.vertex_at(2, j).unwrap().z, 0.5);
        }
        // The slope rises along +y, so normals tilt towards -y
        let n = mesh.normal_at(1, 1).unwrap();
        assert!(n.y < 0. && n.z > 0.);
        assert!(n.x.abs() < 1e-6);
    }

    #[test]
    fn test_invalid_config_returns_no_mesh() {
        let grid = GridParams {
            min_x: 2.,
            ..Default::default()
        };
        let result = TerrainMesh::generate(grid, &FaultSettings::default(), &mut RandomFaults::seeded(1));

        assert!(result.is_err());
    }

    #[test]
    fn test_render_meshes() {
        let config = TerrainConfig {
            grid: unit_grid(4),
            ..Default::default()
        };
        let terrain = TerrainMesh::from_config(&config, 9).unwrap();

        let solid = terrain.to_render_mesh(ColorMode::Elevation);
        assert_eq!(solid.primitive_topology(), PrimitiveTopology::TriangleList);
        assert_eq!(solid.count_vertices(), 25);
        assert_eq!(solid.indices().map(|i| i.len()), Some(3 * 32));
        assert!(solid.attribute(Mesh::ATTRIBUTE_COLOR).is_some());

        let plain = terrain.to_render_mesh(ColorMode::Uniform);
        assert!(plain.attribute(Mesh::ATTRIBUTE_COLOR).is_none());

        let wire = terrain.to_wireframe_mesh();
        assert_eq!(wire.primitive_topology(), PrimitiveTopology::LineList);
        assert_eq!(wire.indices().map(|i| i.len()), Some(6 * 32));
    }

    #[test]
    fn test_elevation_ramp_endpoints() {
        let close = |a: [f32; 4], b: [f32; 4]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5);

        assert!(close(elevation_color(0., 0., 1.), [0.10, 0.30, 0.60, 1.]));
        assert!(close(elevation_color(1., 0., 1.), [0.95, 0.95, 0.95, 1.]));
        // Halfway between grass and rock
        assert!(close(elevation_color(0.525, 0., 1.), [0.35, 0.45, 0.225, 1.]));

        let flat = elevation_color(3., 3., 3.);
        assert!(flat.iter().all(|c| (0.0..=1.0).contains(c)));
    }
}
