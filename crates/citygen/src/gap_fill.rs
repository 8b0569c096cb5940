//! Connector / gap-fill pass.
//!
//! Runs after packing and guarantees two things: every retained lot can reach
//! the road network, and every cell is accounted for by a road, a placement,
//! or a 1x1 filler. Both passes are idempotent: a cell that is already `Way`,
//! already under a placement, or already recorded as filler is never touched
//! again.

use crate::grid::{CellKind, ChunkGrid, GridPos};
use crate::lots::Lot;
use crate::packer::Placement;

/// Per-cell coverage: true when the cell is a road, under a placement, or
/// already recorded as filler.
fn coverage_mask(grid: &ChunkGrid, placements: &[Placement], filler: &[GridPos]) -> Vec<bool> {
    let tiles = grid.tiles;
    let mut mask: Vec<bool> = grid.cells.iter().map(|&c| c == CellKind::Way).collect();
    for p in placements {
        for z in p.z..(p.z + p.span_z).min(tiles) {
            for x in p.x..(p.x + p.span_x).min(tiles) {
                mask[z * tiles + x] = true;
            }
        }
    }
    for &(x, z) in filler {
        mask[z * tiles + x] = true;
    }
    mask
}

/// Stamp access roads for lots that never touched the network.
///
/// For each such lot, member cells on the outer `band_width` rings of its
/// bounding box become `Way`, skipping cells already claimed by a placement.
/// Returns the number of cells stamped; zero on a repeat run.
pub fn ensure_lot_access(
    grid: &mut ChunkGrid,
    lots: &mut [Lot],
    placements: &[Placement],
    band_width: usize,
) -> usize {
    let covered = coverage_mask(grid, placements, &[]);
    let tiles = grid.tiles;
    let mut stamped = 0;

    for lot in lots.iter_mut() {
        if lot.touches_road {
            continue;
        }
        let mut stamped_here = 0;
        for &(x, z) in &lot.cells {
            let on_band = x < lot.min_x + band_width
                || x + band_width > lot.max_x
                || z < lot.min_z + band_width
                || z + band_width > lot.max_z;
            if !on_band {
                continue;
            }
            let idx = z * tiles + x;
            if covered[idx] {
                continue;
            }
            grid.set(x, z, CellKind::Way);
            stamped_here += 1;
        }
        if stamped_here > 0 {
            lot.touches_road = true;
            stamped += stamped_here;
        }
    }

    stamped
}

/// Record a 1x1 filler for every cell still uncovered, appending to `filler`.
///
/// Returns the number of cells added; zero when everything is already
/// covered, which makes a repeat run a no-op.
pub fn fill_residual(
    grid: &ChunkGrid,
    placements: &[Placement],
    filler: &mut Vec<GridPos>,
) -> usize {
    let covered = coverage_mask(grid, placements, filler);
    let tiles = grid.tiles;
    let mut added = 0;

    for z in 0..tiles {
        for x in 0..tiles {
            if !covered[z * tiles + x] {
                filler.push((x, z));
                added += 1;
            }
        }
    }

    added
}
