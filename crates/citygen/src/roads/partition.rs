//! Recursive-partition road strategy (the default).
//!
//! The chunk is treated as a rectangle on a work stack. Rectangles large
//! enough to split are divided by a jittered road band and both halves are
//! pushed back; rectangles below the minimum partition size get at most one
//! randomized road and stop recursing. A final pass stamps a few extra
//! orthogonal crossings to break up overly regular blocks.

use bevy::math::IVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::{GenConfig, PartitionConfig};
use crate::grid::ChunkGrid;
use crate::roads::{carve_horizontal_band, carve_vertical_band, RoadStrategy};

pub struct RecursivePartition;

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: usize,
    z: usize,
    w: usize,
    h: usize,
}

impl RoadStrategy for RecursivePartition {
    fn carve(&self, grid: &mut ChunkGrid, rng: &mut ChaCha8Rng, config: &GenConfig, _index: IVec2) {
        let p = &config.partition;
        let tiles = grid.tiles;

        let mut stack = vec![Rect {
            x: 0,
            z: 0,
            w: tiles,
            h: tiles,
        }];

        while let Some(rect) = stack.pop() {
            // Splittable only when both halves keep at least min_partition cells.
            let can_vertical = rect.w >= p.min_partition * 2 + p.road_width;
            let can_horizontal = rect.h >= p.min_partition * 2 + p.road_width;

            if !can_vertical && !can_horizontal {
                carve_terminal_road(grid, rng, p, rect);
                continue;
            }

            let split_vertical = if can_vertical && can_horizontal {
                if rect.w > rect.h {
                    true
                } else if rect.h > rect.w {
                    false
                } else {
                    rng.gen_bool(0.5)
                }
            } else {
                can_vertical
            };

            if split_vertical {
                let min_x = rect.x + p.min_partition;
                let max_x = rect.x + rect.w - p.min_partition - p.road_width;
                let split = jittered_split(rng, min_x, max_x, rect.w, p.split_jitter);

                carve_vertical_band(grid, split, rect.z, rect.h, p.road_width);

                stack.push(Rect {
                    w: split - rect.x,
                    ..rect
                });
                stack.push(Rect {
                    x: split + p.road_width,
                    w: rect.x + rect.w - (split + p.road_width),
                    ..rect
                });
            } else {
                let min_z = rect.z + p.min_partition;
                let max_z = rect.z + rect.h - p.min_partition - p.road_width;
                let split = jittered_split(rng, min_z, max_z, rect.h, p.split_jitter);

                carve_horizontal_band(grid, rect.x, split, rect.w, p.road_width);

                stack.push(Rect {
                    h: split - rect.z,
                    ..rect
                });
                stack.push(Rect {
                    z: split + p.road_width,
                    h: rect.z + rect.h - (split + p.road_width),
                    ..rect
                });
            }
        }

        stamp_extra_crossings(grid, rng, p);
    }
}

/// Midpoint of `[min, max]` perturbed by up to `extent * jitter` cells.
fn jittered_split(rng: &mut ChaCha8Rng, min: usize, max: usize, extent: usize, jitter: f32) -> usize {
    let base = (min + max) / 2;
    let amplitude = (extent as f32 * jitter).round() as i64;
    if amplitude == 0 {
        return base;
    }
    let offset = rng.gen_range(-amplitude..=amplitude);
    (base as i64 + offset).clamp(min as i64, max as i64) as usize
}

/// Carve at most one road through a rectangle that is too small to split.
///
/// The road runs across the shorter axis at a random interior position,
/// leaving a margin of at least two cells on either side; rectangles that
/// cannot afford that margin stay intact.
fn carve_terminal_road(grid: &mut ChunkGrid, rng: &mut ChaCha8Rng, p: &PartitionConfig, rect: Rect) {
    const MARGIN: usize = 2;
    let along_x = rect.w >= rect.h;

    if along_x {
        if rect.w < MARGIN * 2 + p.road_width {
            return;
        }
        let x = rng.gen_range(rect.x + MARGIN..=rect.x + rect.w - MARGIN - p.road_width);
        carve_vertical_band(grid, x, rect.z, rect.h, p.road_width);
    } else {
        if rect.h < MARGIN * 2 + p.road_width {
            return;
        }
        let z = rng.gen_range(rect.z + MARGIN..=rect.z + rect.h - MARGIN - p.road_width);
        carve_horizontal_band(grid, rect.x, z, rect.w, p.road_width);
    }
}

/// Randomized full-span crossings that cut across the partition blocks.
fn stamp_extra_crossings(grid: &mut ChunkGrid, rng: &mut ChaCha8Rng, p: &PartitionConfig) {
    if p.extra_cross_chance <= 0.0 {
        return;
    }
    let tiles = grid.tiles;
    let attempts = (tiles / p.min_partition.max(1)).max(1);

    for _ in 0..attempts {
        if rng.gen::<f32>() >= p.extra_cross_chance {
            continue;
        }
        let pos = rng.gen_range(0..tiles.saturating_sub(p.extra_cross_width).max(1));
        if rng.gen_bool(0.5) {
            carve_vertical_band(grid, pos, 0, tiles, p.extra_cross_width);
        } else {
            carve_horizontal_band(grid, 0, pos, tiles, p.extra_cross_width);
        }
    }
}
