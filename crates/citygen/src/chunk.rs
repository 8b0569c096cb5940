//! Chunk: one independently generated square region of the world.
//!
//! A chunk exclusively owns its grid and its RNG; nothing here reaches into
//! global state, so chunks for different indices can be generated on any
//! thread and dropped at any time (cancellation is just dropping the value).
//! Everything a chunk holds is regenerable from `(config, catalog, index)`.

use bevy::math::{IVec2, Vec2};

use crate::chunk_rng::ChunkRng;
use crate::config::GenConfig;
use crate::gap_fill::{ensure_lot_access, fill_residual};
use crate::grid::{cell_center, chunk_origin, ChunkGrid, GridPos};
use crate::lots::{extract_lots, Lot};
use crate::packer::{pack_lot, FootprintCatalog, PackResult, Placement};
use crate::roads::{carve_secondary, stamp_arterials};

/// One generated chunk: the finalized grid plus the layout derived from it.
pub struct Chunk {
    pub index: IVec2,
    /// World-space minimum corner.
    pub origin: Vec2,
    pub grid: ChunkGrid,
    pub lots: Vec<Lot>,
    /// Packing result per lot, parallel to `lots`.
    pub packs: Vec<PackResult>,
    /// Cells covered by neither a road nor a placement; the host fills these
    /// with generic block geometry.
    pub filler: Vec<GridPos>,
    /// The chunk's exclusively owned RNG, seeded from `(seed, index)` only.
    rng: ChunkRng,
    cell_size: f32,
}

impl Chunk {
    /// Create an ungenerated chunk. `config` must already be validated.
    pub fn new(index: IVec2, config: &GenConfig) -> Self {
        Self {
            index,
            origin: chunk_origin(index, config.chunk_world_size()),
            grid: ChunkGrid::new(config.chunk_tiles),
            lots: Vec::new(),
            packs: Vec::new(),
            filler: Vec::new(),
            rng: ChunkRng::for_chunk(config.seed, index),
            cell_size: config.cell_size,
        }
    }

    /// Run the full generation pipeline: clear, arterials, secondary roads,
    /// lots, packing, connector pass. Synchronous; a host that needs to
    /// bound per-frame latency schedules whole chunks per tick instead of
    /// slicing inside this call.
    pub fn generate(&mut self, config: &GenConfig, catalog: &FootprintCatalog) {
        self.grid.clear();
        self.lots.clear();
        self.packs.clear();
        self.filler.clear();

        stamp_arterials(&mut self.grid, self.index, config);
        carve_secondary(&mut self.grid, &mut self.rng.0, config, self.index);

        self.lots = extract_lots(&self.grid, &config.lots);

        self.packs = self
            .lots
            .iter()
            .map(|lot| pack_lot(lot, catalog, config.cell_size, &config.packing))
            .collect();

        let all: Vec<Placement> = self.placements().copied().collect();
        ensure_lot_access(
            &mut self.grid,
            &mut self.lots,
            &all,
            config.lots.access_road_width,
        );
        fill_residual(&self.grid, &all, &mut self.filler);
    }

    /// All placements across all lots, in lot order.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.packs.iter().flat_map(|p| p.placements.iter())
    }

    pub fn total_occupied_cells(&self) -> usize {
        self.packs.iter().map(|p| p.occupied_cells).sum()
    }

    /// World-space center of a local cell.
    pub fn cell_center_world(&self, x: usize, z: usize) -> Vec2 {
        cell_center(self.origin, x, z, self.cell_size)
    }

    /// World-space center and extents of a placement's footprint rectangle.
    pub fn placement_rect_world(&self, p: &Placement) -> (Vec2, Vec2) {
        let size = Vec2::new(
            p.span_x as f32 * self.cell_size,
            p.span_z as f32 * self.cell_size,
        );
        let min = Vec2::new(
            self.origin.x + p.x as f32 * self.cell_size,
            self.origin.y + p.z as f32 * self.cell_size,
        );
        (min + size * 0.5, size)
    }
}

/// Generate a chunk in one call. Convenience wrapper used by the streaming
/// layer and tests.
pub fn generate_chunk(index: IVec2, config: &GenConfig, catalog: &FootprintCatalog) -> Chunk {
    let mut chunk = Chunk::new(index, config);
    chunk.generate(config, catalog);
    chunk
}
