//! Fault formation terrain: a square heightmap grid is split by random fault
//! lines many times over, then meshed with smooth vertex normals and a
//! wireframe edge list ready for rendering.

pub mod config;
pub mod error;
pub mod generation;
pub mod heightmap;
pub mod meshing;

pub use config::{FaultSettings, GridParams, TerrainConfig};
pub use error::TerrainError;
pub use generation::{Fault, FaultSource, RandomFaults, ScriptedFaults};
pub use heightmap::HeightMap;
pub use meshing::{ColorMode, TerrainMesh};
