//! Lot extraction.
//!
//! After road carving, the remaining `Empty` cells are partitioned into
//! maximal connected regions ("lots") by flood fill. The raster scan order
//! of seed cells makes the partition deterministic for a fixed grid.

use pathfinding::prelude::bfs_reach;
use serde::{Deserialize, Serialize};

use crate::config::LotConfig;
use crate::grid::{CellKind, ChunkGrid, GridPos};

/// A maximal connected region of non-road cells, eligible for packing.
///
/// Immutable once extracted; the bounding box always contains every member
/// cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lot {
    /// Member cells in flood-fill discovery order.
    pub cells: Vec<GridPos>,
    pub min_x: usize,
    pub max_x: usize,
    pub min_z: usize,
    pub max_z: usize,
    /// Whether any member cell is orthogonally adjacent to a `Way` cell.
    pub touches_road: bool,
}

impl Lot {
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Bounding-box extent in cells (inclusive bounds).
    pub fn bbox_size(&self) -> (usize, usize) {
        (self.max_x - self.min_x + 1, self.max_z - self.min_z + 1)
    }
}

/// Partition the grid's `Empty` cells into lots.
///
/// Scan order is raster (row-major); the first unvisited `Empty` cell seeds
/// each flood fill. Lots below `min_area_cells` are dropped; lots that never
/// touch a road are dropped too unless `cover_all` retains them for the
/// connector pass.
pub fn extract_lots(grid: &ChunkGrid, config: &LotConfig) -> Vec<Lot> {
    let tiles = grid.tiles;
    let mut visited = vec![false; tiles * tiles];
    let mut lots = Vec::new();

    for z in 0..tiles {
        for x in 0..tiles {
            if visited[grid.index(x, z)] || grid.get(x, z) != CellKind::Empty {
                continue;
            }

            let lot = flood_fill(grid, (x, z), config.merge_diagonals, &mut visited);

            if lot.area() < config.min_area_cells {
                continue;
            }
            if !lot.touches_road && !config.cover_all {
                continue;
            }
            lots.push(lot);
        }
    }

    lots
}

/// BFS over connected `Empty` cells starting at `seed`, marking `visited`.
fn flood_fill(grid: &ChunkGrid, seed: GridPos, diagonals: bool, visited: &mut [bool]) -> Lot {
    let mut cells = Vec::new();
    let (mut min_x, mut max_x) = (seed.0, seed.0);
    let (mut min_z, mut max_z) = (seed.1, seed.1);
    let mut touches_road = false;

    for (x, z) in bfs_reach(seed, |&pos| empty_neighbors(grid, pos, diagonals)) {
        visited[grid.index(x, z)] = true;
        cells.push((x, z));
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_z = min_z.min(z);
        max_z = max_z.max(z);
        touches_road |= grid.adjacent_to_way(x, z);
    }

    Lot {
        cells,
        min_x,
        max_x,
        min_z,
        max_z,
        touches_road,
    }
}

fn empty_neighbors(grid: &ChunkGrid, (x, z): GridPos, diagonals: bool) -> Vec<GridPos> {
    let mut result = Vec::with_capacity(8);
    let (cardinal, count) = grid.neighbors4(x, z);
    result.extend(
        cardinal[..count]
            .iter()
            .copied()
            .filter(|&(nx, nz)| grid.get(nx, nz) == CellKind::Empty),
    );
    if diagonals {
        let tiles = grid.tiles as i64;
        for (dx, dz) in [(-1i64, -1i64), (-1, 1), (1, -1), (1, 1)] {
            let nx = x as i64 + dx;
            let nz = z as i64 + dz;
            if nx >= 0 && nz >= 0 && nx < tiles && nz < tiles {
                let (nx, nz) = (nx as usize, nz as usize);
                if grid.get(nx, nz) == CellKind::Empty {
                    result.push((nx, nz));
                }
            }
        }
    }
    result
}
