//! Road network generation.
//!
//! Two layers produce the street network of a chunk:
//!
//! 1. [`stamp_arterials`] overlays the world-aligned arterial lattice. The
//!    classification depends only on global cell coordinates and fixed
//!    constants, so any two chunks agree on their shared border; this is what
//!    keeps the infinite world seamless.
//! 2. A secondary strategy carves local streets inside the chunk. Strategies
//!    are interchangeable behind [`RoadStrategy`] and selected per world via
//!    [`RoadStrategyKind`].
//!
//! No operation here can fail: degenerate configurations produce fewer roads.

pub mod lattice;
pub mod partition;
pub mod walkers;

use bevy::math::IVec2;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::GenConfig;
use crate::grid::{global_cell, CellKind, ChunkGrid};

/// Which secondary road strategy a world uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoadStrategyKind {
    /// Recursive rectangle partitioning (the default city look).
    #[default]
    RecursivePartition,
    /// Regular lattice at a fixed angle. Seamless across chunks sharing the
    /// same angle and period, at the cost of ignoring the chunk border grid.
    RotatedLattice,
    /// Independent random walkers with turning bias and branching.
    RandomWalkers,
}

/// A secondary road generator: mark `Way` cells on a chunk-local grid.
///
/// Implementations must be deterministic given the RNG state and must keep
/// every marked cell inside the grid bounds.
pub trait RoadStrategy {
    fn carve(&self, grid: &mut ChunkGrid, rng: &mut ChaCha8Rng, config: &GenConfig, index: IVec2);
}

/// Carve the configured secondary network into `grid`.
pub fn carve_secondary(
    grid: &mut ChunkGrid,
    rng: &mut ChaCha8Rng,
    config: &GenConfig,
    index: IVec2,
) {
    let strategy: &dyn RoadStrategy = match config.strategy {
        RoadStrategyKind::RecursivePartition => &partition::RecursivePartition,
        RoadStrategyKind::RotatedLattice => &lattice::RotatedLattice,
        RoadStrategyKind::RandomWalkers => &walkers::RandomWalkers,
    };
    strategy.carve(grid, rng, config, index);
}

/// True when a global cell coordinate falls on an arterial line.
///
/// `rem_euclid` keeps the lattice periodic across negative coordinates; a
/// truncating modulus would silently drop every arterial in the negative
/// quadrants and break the shared-border guarantee.
#[inline]
pub fn is_arterial(global: i64, period: usize, width: usize) -> bool {
    (global.rem_euclid(period as i64) as usize) < width
}

/// Overlay the world-aligned arterial lattice onto a chunk grid.
pub fn stamp_arterials(grid: &mut ChunkGrid, index: IVec2, config: &GenConfig) {
    let tiles = grid.tiles;
    let period = config.arterial_period;
    let width = config.arterial_width;

    for lx in 0..tiles {
        let on_x = is_arterial(global_cell(index.x, tiles, lx), period, width);
        for lz in 0..tiles {
            let on_z = is_arterial(global_cell(index.y, tiles, lz), period, width);
            if on_x || on_z {
                grid.set(lx, lz, CellKind::Way);
            }
        }
    }
}

/// Stamp a full-height vertical road band `[x0, x0 + width)`.
pub(crate) fn carve_vertical_band(grid: &mut ChunkGrid, x0: usize, z0: usize, h: usize, width: usize) {
    for x in x0..(x0 + width).min(grid.tiles) {
        for z in z0..(z0 + h).min(grid.tiles) {
            grid.set(x, z, CellKind::Way);
        }
    }
}

/// Stamp a full-width horizontal road band `[z0, z0 + width)`.
pub(crate) fn carve_horizontal_band(grid: &mut ChunkGrid, x0: usize, z0: usize, w: usize, width: usize) {
    for z in z0..(z0 + width).min(grid.tiles) {
        for x in x0..(x0 + w).min(grid.tiles) {
            grid.set(x, z, CellKind::Way);
        }
    }
}
