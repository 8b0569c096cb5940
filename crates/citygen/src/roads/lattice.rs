//! Rotated-lattice road strategy.
//!
//! Roads run at a fixed angle and period, classified by rotating each cell's
//! *global* coordinates into lattice space and testing the rotated axes
//! against the period. Because the test depends only on global coordinates,
//! chunks sharing the same angle and period line up with each other; the
//! trade-off versus the axis-aligned arterial grid is that the pattern has no
//! relationship to chunk borders, so the lattice alone does not guarantee a
//! road on any particular border cell.

use bevy::math::IVec2;
use rand_chacha::ChaCha8Rng;

use crate::config::GenConfig;
use crate::grid::{global_cell, CellKind, ChunkGrid};
use crate::roads::RoadStrategy;

pub struct RotatedLattice;

impl RoadStrategy for RotatedLattice {
    fn carve(
        &self,
        grid: &mut ChunkGrid,
        _rng: &mut ChaCha8Rng,
        config: &GenConfig,
        index: IVec2,
    ) {
        let l = &config.lattice;
        let (sin, cos) = l.angle_deg.to_radians().sin_cos();
        let tiles = grid.tiles;

        for lx in 0..tiles {
            let gx = global_cell(index.x, tiles, lx) as f32 + 0.5;
            for lz in 0..tiles {
                let gz = global_cell(index.y, tiles, lz) as f32 + 0.5;

                // Rotate into lattice space; a cell is road when either
                // rotated coordinate lands inside a band.
                let u = gx * cos + gz * sin;
                let v = -gx * sin + gz * cos;
                if u.rem_euclid(l.period) < l.width || v.rem_euclid(l.period) < l.width {
                    grid.set(lx, lz, CellKind::Way);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk_rng::ChunkRng;
    use crate::roads::RoadStrategyKind;

    fn lattice_config(angle_deg: f32) -> GenConfig {
        let mut config = GenConfig {
            strategy: RoadStrategyKind::RotatedLattice,
            chunk_tiles: 32,
            ..GenConfig::default()
        };
        config.lattice.angle_deg = angle_deg;
        config
    }

    fn carve(config: &GenConfig, index: IVec2) -> ChunkGrid {
        let mut grid = ChunkGrid::new(config.chunk_tiles);
        let mut rng = ChunkRng::for_chunk(config.seed, index);
        RotatedLattice.carve(&mut grid, &mut rng.0, config, index);
        grid
    }

    #[test]
    fn test_zero_angle_reproduces_axis_aligned_grid() {
        let config = lattice_config(0.0);
        let grid = carve(&config, IVec2::ZERO);
        // With angle 0 and period 14, local column 13 (global center 13.5)
        // falls just below the period boundary; column 0 starts a band.
        for z in 0..config.chunk_tiles {
            assert_eq!(grid.get(0, z), CellKind::Way);
        }
        assert_eq!(grid.get(5, 5), CellKind::Empty);
    }

    #[test]
    fn test_lattice_marks_roads_at_any_angle() {
        let config = lattice_config(30.0);
        let grid = carve(&config, IVec2::ZERO);
        assert!(grid.count(CellKind::Way) > 0);
        assert!(grid.count(CellKind::Empty) > 0);
    }

    #[test]
    fn test_lattice_is_seamless_across_chunks() {
        // Shared border: right edge of chunk (0,0) vs left edge of chunk
        // (1,0). Both classify global cells, so the columns they *share*
        // (global x = 31 and 32) must be consistent: recompute chunk (0,0)'s
        // border column from the neighbor's frame by shifting one cell.
        let config = lattice_config(30.0);
        let a = carve(&config, IVec2::new(0, 0));
        let b = carve(&config, IVec2::new(1, 0));

        // Classification is a pure function of global coords; verify via an
        // oversized reference chunk covering both.
        let mut wide = ChunkGrid::new(config.chunk_tiles * 2);
        let mut rng = ChunkRng::for_chunk(config.seed, IVec2::ZERO);
        let wide_config = GenConfig {
            chunk_tiles: config.chunk_tiles * 2,
            ..config.clone()
        };
        RotatedLattice.carve(&mut wide, &mut rng.0, &wide_config, IVec2::ZERO);

        let t = config.chunk_tiles;
        for z in 0..t {
            for x in 0..t {
                assert_eq!(a.get(x, z), wide.get(x, z), "chunk (0,0) mismatch");
                assert_eq!(b.get(x, z), wide.get(x + t, z), "chunk (1,0) mismatch");
            }
        }
    }
}
