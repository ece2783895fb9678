//! Fault formation: the grid is split by random fault lines, raising the vertices
//! on one side and lowering those on the other.

use std::f32::consts::TAU;

use bevy::prelude::Vec2;
use ndarray::Zip;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use tracing::info;

use super::config::FaultSettings;
use super::heightmap::HeightMap;

/// A fault line through grid point `(px, py)` with normal at `angle` radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fault {
    pub px: u32,
    pub py: u32,
    pub angle: f32,
}

impl Fault {
    pub fn new(px: u32, py: u32, angle: f32) -> Self {
        Self { px, py, angle }
    }

    pub fn normal(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }
}

/// Supplies the fault applied on each iteration.
pub trait FaultSource {
    /// Next fault for a grid with `div` cells per side. The point must lie in `0..=div`.
    fn next_fault(&mut self, div: u32) -> Fault;
}

/// Uniformly random faults drawn from `R`.
pub struct RandomFaults<R> {
    rng: R,
}

impl<R: Rng> RandomFaults<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomFaults<Pcg64Mcg> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg64Mcg::seed_from_u64(seed))
    }
}

impl<R: Rng> FaultSource for RandomFaults<R> {
    fn next_fault(&mut self, div: u32) -> Fault {
        let px = self.rng.gen_range(0..=div);
        let py = self.rng.gen_range(0..=div);
        let angle = self.rng.gen_range(0.0..TAU);
        Fault { px, py, angle }
    }
}

/// Replays a fixed list of faults, wrapping around when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedFaults {
    faults: Vec<Fault>,
    next: usize,
}

impl ScriptedFaults {
    /// # Panics
    /// If `faults` is empty.
    pub fn new(faults: Vec<Fault>) -> Self {
        assert!(!faults.is_empty(), "ScriptedFaults needs at least one fault");
        Self { faults, next: 0 }
    }
}

impl FaultSource for ScriptedFaults {
    fn next_fault(&mut self, _div: u32) -> Fault {
        let fault = self.faults[self.next];
        self.next = (self.next + 1) % self.faults.len();
        fault
    }
}

/// Steps every height by `delta` according to its side of `fault`.
/// Vertices exactly on the fault line keep their height.
pub fn apply_fault(heights: &mut HeightMap, fault: &Fault, delta: f32) {
    let n = fault.normal();
    let (px, py) = (fault.px as f32, fault.py as f32);

    Zip::indexed(&mut heights.0).par_for_each(|(i, j), z| {
        // Grid-index space, not world space
        let pb = Vec2::new(i as f32 - px, j as f32 - py);
        let side = pb.dot(n);
        if side > 0. {
            *z += delta;
        } else if side < 0. {
            *z -= delta;
        }
    });
}

/// Applies `settings.iterations` faults from `source` to `heights`.
pub fn fault_formation(
    heights: &mut HeightMap,
    div: u32,
    settings: &FaultSettings,
    source: &mut impl FaultSource,
) {
    for _ in 0..settings.iterations {
        let fault = source.next_fault(div);
        apply_fault(heights, &fault, settings.delta);
    }

    let (min, max) = heights.range();
    info!(
        iterations = settings.iterations,
        min_height = min,
        max_height = max,
        "Terrain: applied faults"
    );
}
