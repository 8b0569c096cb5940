use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Semantic classification of one grid cell.
///
/// Cells start `Empty`, get promoted to `Way` during road carving, and are
/// read-only afterwards until the chunk is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CellKind {
    #[default]
    Empty,
    Way,
}

/// A grid-cell coordinate pair, local to one chunk.
pub type GridPos = (usize, usize);

/// The per-chunk square cell array. Pure data plus coordinate transforms;
/// all carving and packing logic lives in the generator modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkGrid {
    pub cells: Vec<CellKind>,
    pub tiles: usize,
}

impl ChunkGrid {
    pub fn new(tiles: usize) -> Self {
        Self {
            cells: vec![CellKind::Empty; tiles * tiles],
            tiles,
        }
    }

    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        z * self.tiles + x
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, z: usize) -> bool {
        x < self.tiles && z < self.tiles
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> CellKind {
        self.cells[self.index(x, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, kind: CellKind) {
        let idx = self.index(x, z);
        self.cells[idx] = kind;
    }

    pub fn clear(&mut self) {
        self.cells.fill(CellKind::Empty);
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Returns up to 4 cardinal neighbors and the count of valid entries.
    /// Use `&result[..count]` to iterate over valid neighbors.
    pub fn neighbors4(&self, x: usize, z: usize) -> ([GridPos; 4], usize) {
        let mut result = [(0, 0); 4];
        let mut count = 0;
        if x > 0 {
            result[count] = (x - 1, z);
            count += 1;
        }
        if x + 1 < self.tiles {
            result[count] = (x + 1, z);
            count += 1;
        }
        if z > 0 {
            result[count] = (x, z - 1);
            count += 1;
        }
        if z + 1 < self.tiles {
            result[count] = (x, z + 1);
            count += 1;
        }
        (result, count)
    }

    /// True when any cardinal neighbor of `(x, z)` is a `Way` cell.
    pub fn adjacent_to_way(&self, x: usize, z: usize) -> bool {
        let (neighbors, count) = self.neighbors4(x, z);
        neighbors[..count]
            .iter()
            .any(|&(nx, nz)| self.get(nx, nz) == CellKind::Way)
    }
}

/// Global cell coordinate of a local column/row within a chunk.
///
/// This is the quantity the arterial lattice is keyed on: it depends only on
/// the chunk index and fixed constants, so adjacent chunks agree on it along
/// their shared border.
#[inline]
pub fn global_cell(chunk_coord: i32, tiles: usize, local: usize) -> i64 {
    chunk_coord as i64 * tiles as i64 + local as i64
}

/// Chunk index containing a world-space position.
pub fn world_to_chunk(world_x: f32, world_z: f32, chunk_world_size: f32) -> IVec2 {
    IVec2::new(
        (world_x / chunk_world_size).floor() as i32,
        (world_z / chunk_world_size).floor() as i32,
    )
}

/// World-space origin (minimum corner) of a chunk.
pub fn chunk_origin(index: IVec2, chunk_world_size: f32) -> Vec2 {
    Vec2::new(
        index.x as f32 * chunk_world_size,
        index.y as f32 * chunk_world_size,
    )
}

/// World-space center of a local cell within a chunk.
pub fn cell_center(origin: Vec2, x: usize, z: usize, cell_size: f32) -> Vec2 {
    Vec2::new(
        origin.x + (x as f32 + 0.5) * cell_size,
        origin.y + (z as f32 + 0.5) * cell_size,
    )
}
