//! Generation configuration.
//!
//! One `GenConfig` resource describes a whole world: every chunk is generated
//! from it plus the chunk index. Configuration is validated once, before any
//! generation runs; the algorithms themselves never fail (degenerate values
//! that pass validation just produce fewer roads or fewer buildings).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roads::RoadStrategyKind;

/// Smallest chunk side the generator accepts, in cells.
pub const MIN_CHUNK_TILES: usize = 8;

/// Configuration violations rejected by [`GenConfig::validate`].
///
/// These are the only genuine faults in the engine; everything downstream of
/// a validated config degrades gracefully instead of erroring.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("cell_size must be positive, got {0}")]
    CellSize(f32),
    #[error("chunk_tiles must be at least {MIN_CHUNK_TILES}, got {0}")]
    ChunkTiles(usize),
    #[error("arterial_period must be at least 1, got {0}")]
    ArterialPeriod(usize),
    #[error("arterial_width {width} must not exceed arterial_period {period}")]
    ArterialWidth { width: usize, period: usize },
    #[error("partition.min_partition {min_partition} exceeds chunk_tiles {chunk_tiles}")]
    MinPartition {
        min_partition: usize,
        chunk_tiles: usize,
    },
    #[error("{name} road width must be at least 1 cell")]
    RoadWidth { name: &'static str },
    #[error("{name} must lie in [0, 1], got {value}")]
    UnitInterval { name: &'static str, value: f32 },
    #[error("lattice.period must be positive, got {0}")]
    LatticePeriod(f32),
    #[error("packing.multi_start must be at least 1")]
    MultiStart,
    #[error("packing.lot_edge_margin must be non-negative, got {0}")]
    LotEdgeMargin(f32),
    #[error("footprint option {index} has zero cell area ({width}x{depth} world units)")]
    ZeroAreaFootprint {
        index: usize,
        width: f32,
        depth: f32,
    },
    #[error("footprint option {index} has no templates")]
    EmptyTemplateSet { index: usize },
}

/// Parameters for the recursive-partition road strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Rectangles smaller than this on either axis stop recursing.
    pub min_partition: usize,
    /// Width of carved road bands, in cells.
    pub road_width: usize,
    /// Fraction of the rectangle extent the split line may drift from the midpoint.
    pub split_jitter: f32,
    /// Probability of stamping an extra orthogonal crossing per attempt.
    pub extra_cross_chance: f32,
    /// Width of extra crossings, in cells.
    pub extra_cross_width: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            min_partition: 12,
            road_width: 1,
            split_jitter: 0.10,
            extra_cross_chance: 0.10,
            extra_cross_width: 1,
        }
    }
}

/// Parameters for the rotated-lattice road strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Lattice rotation in degrees. 0 degrees reproduces an axis-aligned grid.
    pub angle_deg: f32,
    /// Road period along each rotated axis, in cells.
    pub period: f32,
    /// Road band width along each rotated axis, in cells.
    pub width: f32,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            angle_deg: 30.0,
            period: 14.0,
            width: 1.0,
        }
    }
}

/// Parameters for the random-walker road strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Number of independent walkers started per chunk.
    pub count: usize,
    /// Step budget per walker.
    pub steps: usize,
    /// Probability of turning 90 degrees at each step.
    pub turn_chance: f32,
    /// Probability of spawning a branch walker at each step.
    pub branch_chance: f32,
    /// Width of stamped path bands, in cells.
    pub path_width: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            count: 4,
            steps: 160,
            turn_chance: 0.20,
            branch_chance: 0.03,
            path_width: 1,
        }
    }
}

/// Parameters for lot extraction and the connector pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotConfig {
    /// Lots with fewer member cells than this are discarded.
    pub min_area_cells: usize,
    /// Merge diagonally-touching empty regions into one lot (8-connectivity).
    pub merge_diagonals: bool,
    /// Keep lots that never touch a road and let the connector pass serve them.
    pub cover_all: bool,
    /// Width of the access band stamped around road-less lots, in cells.
    pub access_road_width: usize,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            min_area_cells: 25,
            merge_diagonals: true,
            cover_all: false,
            access_road_width: 1,
        }
    }
}

/// Parameters for the building packer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackConfig {
    /// Independent packing trials per lot; the best result wins.
    pub multi_start: u32,
    /// Probability of perturbing the candidate-size order at a scan position.
    pub epsilon: f32,
    /// Fraction of the interior cell list that gets shuffled before scanning.
    pub position_shuffle_rate: f32,
    /// Margin kept free around the lot edge, in world units.
    pub lot_edge_margin: f32,
    /// Hard cap on placements per lot.
    pub max_buildings_per_lot: usize,
    /// Hard cap on cells scanned per trial; a safety valve for huge lots.
    pub max_cells_scanned: usize,
    /// Global offset XORed into every per-lot seed.
    pub rand_seed_offset: u32,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            multi_start: 2,
            epsilon: 0.05,
            position_shuffle_rate: 1.0,
            lot_edge_margin: 0.0,
            max_buildings_per_lot: 100,
            max_cells_scanned: 200_000,
            rand_seed_offset: 12345,
        }
    }
}

/// Whole-world generation configuration.
///
/// Shared by all chunks; the only per-chunk inputs are the chunk index and
/// the seed derived from it.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct GenConfig {
    /// World seed. Chunk seeds derive purely from this and the chunk index.
    pub seed: u64,
    /// Side of one cell in world units.
    pub cell_size: f32,
    /// Chunk side in cells.
    pub chunk_tiles: usize,
    /// Global arterial lattice period, in cells.
    pub arterial_period: usize,
    /// Global arterial band width, in cells.
    pub arterial_width: usize,
    /// Secondary road strategy carved inside each chunk.
    pub strategy: RoadStrategyKind,
    pub partition: PartitionConfig,
    pub lattice: LatticeConfig,
    pub walkers: WalkerConfig,
    pub lots: LotConfig,
    pub packing: PackConfig,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            cell_size: 10.0,
            chunk_tiles: 48,
            arterial_period: 20,
            arterial_width: 1,
            strategy: RoadStrategyKind::RecursivePartition,
            partition: PartitionConfig::default(),
            lattice: LatticeConfig::default(),
            walkers: WalkerConfig::default(),
            lots: LotConfig::default(),
            packing: PackConfig::default(),
        }
    }
}

impl GenConfig {
    /// World-unit side of one chunk.
    pub fn chunk_world_size(&self) -> f32 {
        self.chunk_tiles as f32 * self.cell_size
    }

    /// Reject configurations the generator cannot honor.
    ///
    /// Called once at startup; a config that passes here can never make the
    /// pipeline fail mid-chunk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        if self.chunk_tiles < MIN_CHUNK_TILES {
            return Err(ConfigError::ChunkTiles(self.chunk_tiles));
        }
        if self.arterial_period == 0 {
            return Err(ConfigError::ArterialPeriod(self.arterial_period));
        }
        if self.arterial_width > self.arterial_period {
            return Err(ConfigError::ArterialWidth {
                width: self.arterial_width,
                period: self.arterial_period,
            });
        }
        if self.partition.min_partition > self.chunk_tiles {
            return Err(ConfigError::MinPartition {
                min_partition: self.partition.min_partition,
                chunk_tiles: self.chunk_tiles,
            });
        }
        if self.partition.road_width == 0 {
            return Err(ConfigError::RoadWidth { name: "partition" });
        }
        if self.walkers.path_width == 0 {
            return Err(ConfigError::RoadWidth { name: "walkers" });
        }
        if self.lots.access_road_width == 0 {
            return Err(ConfigError::RoadWidth { name: "lots.access" });
        }
        check_unit("partition.split_jitter", self.partition.split_jitter)?;
        check_unit("partition.extra_cross_chance", self.partition.extra_cross_chance)?;
        check_unit("walkers.turn_chance", self.walkers.turn_chance)?;
        check_unit("walkers.branch_chance", self.walkers.branch_chance)?;
        check_unit("packing.epsilon", self.packing.epsilon)?;
        check_unit("packing.position_shuffle_rate", self.packing.position_shuffle_rate)?;
        if !(self.lattice.period > 0.0) {
            return Err(ConfigError::LatticePeriod(self.lattice.period));
        }
        if self.packing.multi_start == 0 {
            return Err(ConfigError::MultiStart);
        }
        if self.packing.lot_edge_margin < 0.0 {
            return Err(ConfigError::LotEdgeMargin(self.packing.lot_edge_margin));
        }
        Ok(())
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::UnitInterval { name, value })
    }
}
