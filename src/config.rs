//! Terrain configuration: grid layout, fault settings and TOML loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Layout of the square vertex grid the terrain is built on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Number of cells along each axis.
    pub div: u32,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            div: 64,
            min_x: -1.,
            max_x: 1.,
            min_y: -1.,
            max_y: 1.,
        }
    }
}

impl GridParams {
    pub fn new(div: u32, min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Result<Self> {
        let params = Self {
            div,
            min_x,
            max_x,
            min_y,
            max_y,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.div < 1 {
            return Err(TerrainError::invalid("div must be at least 1"));
        }

        let bounds = [self.min_x, self.max_x, self.min_y, self.max_y];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(TerrainError::invalid("grid bounds must be finite"));
        }
        if self.min_x >= self.max_x {
            return Err(TerrainError::invalid(format!(
                "min_x ({}) must be less than max_x ({})",
                self.min_x, self.max_x
            )));
        }
        if self.min_y >= self.max_y {
            return Err(TerrainError::invalid(format!(
                "min_y ({}) must be less than max_y ({})",
                self.min_y, self.max_y
            )));
        }

        // Mesh indices are u32
        let side = self.div as u64 + 1;
        if side * side > u32::MAX as u64 {
            return Err(TerrainError::invalid(format!(
                "div {} produces more vertices than a u32 index can address",
                self.div
            )));
        }

        Ok(())
    }

    /// Vertices per row (and per column).
    pub fn side(&self) -> usize {
        self.div as usize + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.side() * self.side()
    }

    pub fn triangle_count(&self) -> usize {
        2 * self.div as usize * self.div as usize
    }

    pub fn delta_x(&self) -> f32 {
        (self.max_x - self.min_x) / self.div as f32
    }

    pub fn delta_y(&self) -> f32 {
        (self.max_y - self.min_y) / self.div as f32
    }

    /// Linear vertex index of row `i`, column `j`.
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.side() + j
    }
}

/// Parameters of the fault formation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultSettings {
    /// Number of random faults applied.
    pub iterations: u32,
    /// Height step applied on each side of a fault.
    pub delta: f32,
}

impl Default for FaultSettings {
    fn default() -> Self {
        Self {
            iterations: 1000,
            delta: 0.003,
        }
    }
}

impl FaultSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.delta.is_finite() || self.delta < 0. {
            return Err(TerrainError::invalid(format!(
                "fault delta must be finite and non-negative, got {}",
                self.delta
            )));
        }
        Ok(())
    }

    /// Largest height any vertex can reach after all iterations.
    pub fn max_displacement(&self) -> f32 {
        self.iterations as f32 * self.delta
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub grid: GridParams,
    pub faults: FaultSettings,
    /// Seed for the fault source. A fresh seed is drawn when absent.
    pub seed: Option<u64>,
}

impl TerrainConfig {
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TerrainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| TerrainError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.faults.validate()
    }
}
