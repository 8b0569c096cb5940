//! Building packing.
//!
//! Fits heterogeneous rectangular footprints into a lot by randomized
//! multi-start greedy search: scan interior cells in a (partially shuffled)
//! order, try candidate sizes largest-first with an epsilon chance of a
//! perturbed order, place on first fit, keep the best of `multi_start`
//! trials. Per-lot seeding makes the result identical run-to-run and
//! independent of the order lots are visited in.

use bevy::prelude::Resource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh32::xxh32;

use crate::config::{ConfigError, PackConfig};
use crate::lots::Lot;

/// One building template a footprint can resolve to, with a selection weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootprintTemplate {
    /// Host-side template reference (mesh/prefab id); opaque to the engine.
    pub id: u32,
    pub weight: f32,
}

impl FootprintTemplate {
    pub fn new(id: u32) -> Self {
        Self { id, weight: 1.0 }
    }
}

/// A candidate building footprint: world-unit extents plus the interchangeable
/// templates that can fill it. Configured once per world, reused by all lots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootprintOption {
    /// Footprint width in world units.
    pub width: f32,
    /// Footprint depth in world units.
    pub depth: f32,
    pub templates: Vec<FootprintTemplate>,
}

impl FootprintOption {
    pub fn new(width: f32, depth: f32, templates: Vec<FootprintTemplate>) -> Self {
        Self {
            width,
            depth,
            templates,
        }
    }

    /// Cell span of this option for a given cell size. Pitch is computed per
    /// option; sizing every candidate from a shared representative entry
    /// mis-sizes mixed catalogs.
    pub fn cell_span(&self, cell_size: f32) -> (usize, usize) {
        let sx = ((self.width / cell_size).ceil() as usize).max(1);
        let sz = ((self.depth / cell_size).ceil() as usize).max(1);
        (sx, sz)
    }
}

/// The per-world footprint catalog.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct FootprintCatalog {
    pub options: Vec<FootprintOption>,
}

impl Default for FootprintCatalog {
    fn default() -> Self {
        // The classic mix: three large set-backed sizes plus small squares.
        let sizes: [(f32, f32); 6] = [
            (60.0, 60.0),
            (50.0, 50.0),
            (40.0, 60.0),
            (30.0, 30.0),
            (20.0, 20.0),
            (10.0, 10.0),
        ];
        let options = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, d))| FootprintOption::new(w, d, vec![FootprintTemplate::new(i as u32)]))
            .collect();
        Self { options }
    }
}

impl FootprintCatalog {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, option) in self.options.iter().enumerate() {
            if !(option.width > 0.0) || !(option.depth > 0.0) {
                return Err(ConfigError::ZeroAreaFootprint {
                    index,
                    width: option.width,
                    depth: option.depth,
                });
            }
            if option.templates.is_empty() {
                return Err(ConfigError::EmptyTemplateSet { index });
            }
        }
        Ok(())
    }
}

/// One committed footprint instance inside a lot.
///
/// Coordinates are chunk-local cells; the span is the occupied rectangle
/// after any 90-degree rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: usize,
    pub z: usize,
    pub span_x: usize,
    pub span_z: usize,
    /// Index into the catalog's option list.
    pub option: usize,
    /// Chosen template id from that option's set.
    pub template: u32,
    pub rotated: bool,
}

/// Result of packing one lot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackResult {
    pub placements: Vec<Placement>,
    pub occupied_cells: usize,
}

/// Candidate size in cells, tied back to its catalog option.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    sx: usize,
    sz: usize,
    option: usize,
}

impl Candidate {
    fn area(&self) -> usize {
        self.sx * self.sz
    }
}

/// Deterministic per-lot seed: hash of the interior rectangle XOR the global
/// offset. Depends only on lot geometry, never on visitation order.
fn lot_seed(min_x: usize, min_z: usize, w: usize, h: usize, offset: u32) -> u64 {
    let mut bytes = [0u8; 16];
    bytes[0..4].copy_from_slice(&(min_x as u32).to_le_bytes());
    bytes[4..8].copy_from_slice(&(min_z as u32).to_le_bytes());
    bytes[8..12].copy_from_slice(&(w as u32).to_le_bytes());
    bytes[12..16].copy_from_slice(&(h as u32).to_le_bytes());
    (xxh32(&bytes, 0) ^ offset) as u64
}

/// Pack one lot with the configured footprint catalog.
///
/// Degenerate inputs (empty catalog, interior consumed by the margin,
/// no free cells) yield an empty result; the scan and placement caps
/// truncate silently rather than fail.
pub fn pack_lot(
    lot: &Lot,
    catalog: &FootprintCatalog,
    cell_size: f32,
    config: &PackConfig,
) -> PackResult {
    // Interior rectangle: bounding box shrunk by the edge margin.
    let margin_cells = (config.lot_edge_margin.max(0.0) / cell_size).ceil() as usize;
    let inner_min_x = lot.min_x + margin_cells;
    let inner_min_z = lot.min_z + margin_cells;
    let inner_max_x = match lot.max_x.checked_sub(margin_cells) {
        Some(v) if v >= inner_min_x => v,
        _ => return PackResult::default(),
    };
    let inner_max_z = match lot.max_z.checked_sub(margin_cells) {
        Some(v) if v >= inner_min_z => v,
        _ => return PackResult::default(),
    };
    let w = inner_max_x - inner_min_x + 1;
    let h = inner_max_z - inner_min_z + 1;

    // Candidate sizes, largest area first. Stable sort keeps catalog order
    // for equal areas.
    let mut candidates: Vec<Candidate> = catalog
        .options
        .iter()
        .enumerate()
        .filter(|(_, option)| !option.templates.is_empty())
        .map(|(option, opt)| {
            let (sx, sz) = opt.cell_span(cell_size);
            Candidate { sx, sz, option }
        })
        .collect();
    if candidates.is_empty() {
        return PackResult::default();
    }
    candidates.sort_by(|a, b| b.area().cmp(&a.area()));

    // Cells of the interior rectangle that do not belong to the lot start out
    // occupied, so concave lots never leak placements onto roads or into
    // neighboring lots.
    let mut base_occ = vec![true; w * h];
    for &(x, z) in &lot.cells {
        if x >= inner_min_x && x <= inner_max_x && z >= inner_min_z && z <= inner_max_z {
            base_occ[(z - inner_min_z) * w + (x - inner_min_x)] = false;
        }
    }

    let seed = lot_seed(inner_min_x, inner_min_z, w, h, config.rand_seed_offset);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // Multi-start: all trials draw from one sequential stream, so raising
    // multi_start only appends candidate solutions and the best result can
    // never get worse. Ties keep the earliest trial.
    let trials = config.multi_start.max(1);
    let mut best = PackResult::default();
    let mut best_occupied = -1i64;

    for _ in 0..trials {
        let trial = pack_once(
            w,
            h,
            &base_occ,
            &candidates,
            catalog,
            &mut rng,
            config,
            (inner_min_x, inner_min_z),
        );
        if trial.occupied_cells as i64 > best_occupied {
            best_occupied = trial.occupied_cells as i64;
            best = trial;
        }
    }

    best
}

#[allow(clippy::too_many_arguments)]
fn pack_once(
    w: usize,
    h: usize,
    base_occ: &[bool],
    candidates: &[Candidate],
    catalog: &FootprintCatalog,
    rng: &mut ChaCha8Rng,
    config: &PackConfig,
    (origin_x, origin_z): (usize, usize),
) -> PackResult {
    let mut occ = base_occ.to_vec();
    let mut result = PackResult::default();

    // Interior cell list; a shuffled prefix controls how grid-aligned the
    // packing looks (0.0 = pure raster greedy, 1.0 = fully random seeds).
    let mut coords: Vec<(usize, usize)> = (0..h)
        .flat_map(|z| (0..w).map(move |x| (x, z)))
        .collect();
    let shuffle_to =
        (coords.len() as f32 * config.position_shuffle_rate.clamp(0.0, 1.0)) as usize;
    for i in 0..shuffle_to {
        let j = rng.gen_range(i..coords.len());
        coords.swap(i, j);
    }

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    let base_order: Vec<usize> = order.clone();

    let mut scanned = 0usize;
    for &(x, z) in &coords {
        if scanned >= config.max_cells_scanned {
            break;
        }
        scanned += 1;
        if occ[z * w + x] {
            continue;
        }

        // Epsilon-greedy: mostly the fixed descending-area order, sometimes
        // a perturbed copy with two entries swapped.
        order.copy_from_slice(&base_order);
        if config.epsilon > 0.0 && rng.gen::<f32>() < config.epsilon {
            let i = rng.gen_range(0..order.len());
            let j = rng.gen_range(0..order.len());
            order.swap(i, j);
        }

        'candidates: for &ci in &order {
            let cand = candidates[ci];
            let variants = [(cand.sx, cand.sz, false), (cand.sz, cand.sx, true)];
            let variant_count = if cand.sx == cand.sz { 1 } else { 2 };
            for &(sx, sz, rotated) in &variants[..variant_count] {
                if x + sx > w || z + sz > h {
                    continue;
                }
                if !cells_free(&occ, w, x, z, sx, sz) {
                    continue;
                }

                mark(&mut occ, w, x, z, sx, sz);
                result.occupied_cells += sx * sz;
                let template = pick_template(&catalog.options[cand.option].templates, rng);
                result.placements.push(Placement {
                    x: origin_x + x,
                    z: origin_z + z,
                    span_x: sx,
                    span_z: sz,
                    option: cand.option,
                    template,
                    rotated,
                });
                break 'candidates;
            }
        }

        if result.placements.len() >= config.max_buildings_per_lot {
            break;
        }
    }

    result
}

fn cells_free(occ: &[bool], w: usize, x0: usize, z0: usize, sx: usize, sz: usize) -> bool {
    for z in z0..z0 + sz {
        for x in x0..x0 + sx {
            if occ[z * w + x] {
                return false;
            }
        }
    }
    true
}

fn mark(occ: &mut [bool], w: usize, x0: usize, z0: usize, sx: usize, sz: usize) {
    for z in z0..z0 + sz {
        for x in x0..x0 + sx {
            occ[z * w + x] = true;
        }
    }
}

/// Weighted template choice using the lot RNG. Uniform when weights are equal.
fn pick_template(templates: &[FootprintTemplate], rng: &mut ChaCha8Rng) -> u32 {
    let total: f32 = templates.iter().map(|t| t.weight.max(0.0)).sum();
    let mut fallback = 0;
    if let Some(first) = templates.first() {
        fallback = first.id;
    }
    if total <= 0.0 {
        return fallback;
    }
    let mut roll = rng.gen::<f32>() * total;
    for t in templates {
        roll -= t.weight.max(0.0);
        if roll <= 0.0 {
            return t.id;
        }
    }
    templates.last().map(|t| t.id).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A full rectangular lot covering `[0, w) x [0, h)`.
    fn rect_lot(w: usize, h: usize) -> Lot {
        let mut cells = Vec::new();
        for z in 0..h {
            for x in 0..w {
                cells.push((x, z));
            }
        }
        Lot {
            cells,
            min_x: 0,
            max_x: w - 1,
            min_z: 0,
            max_z: h - 1,
            touches_road: true,
        }
    }

    fn single_option_catalog(width: f32, depth: f32) -> FootprintCatalog {
        FootprintCatalog {
            options: vec![FootprintOption::new(
                width,
                depth,
                vec![FootprintTemplate::new(0)],
            )],
        }
    }

    fn greedy_config() -> PackConfig {
        PackConfig {
            multi_start: 1,
            epsilon: 0.0,
            position_shuffle_rate: 0.0,
            lot_edge_margin: 0.0,
            ..PackConfig::default()
        }
    }

    fn assert_no_overlap(placements: &[Placement]) {
        let mut claimed = std::collections::HashSet::new();
        for p in placements {
            for z in p.z..p.z + p.span_z {
                for x in p.x..p.x + p.span_x {
                    assert!(claimed.insert((x, z)), "cell ({x},{z}) claimed twice");
                }
            }
        }
    }

    #[test]
    fn test_raster_greedy_fills_ten_by_ten_exactly() {
        // 10x10 lot, one 2x2-cell option, no randomness: raster-order greedy
        // must tile the lot perfectly with 25 footprints.
        let lot = rect_lot(10, 10);
        let catalog = single_option_catalog(20.0, 20.0); // 2x2 cells at cell_size 10
        let result = pack_lot(&lot, &catalog, 10.0, &greedy_config());

        assert_eq!(result.placements.len(), 25);
        assert_eq!(result.occupied_cells, 100);
        assert_no_overlap(&result.placements);
    }

    #[test]
    fn test_packing_is_deterministic_per_lot() {
        let lot = rect_lot(17, 13);
        let catalog = FootprintCatalog::default();
        let config = PackConfig::default();
        let a = pack_lot(&lot, &catalog, 10.0, &config);
        let b = pack_lot(&lot, &catalog, 10.0, &config);
        assert_eq!(a.placements, b.placements);
        assert_eq!(a.occupied_cells, b.occupied_cells);
    }

    #[test]
    fn test_seed_offset_changes_layout() {
        let lot = rect_lot(17, 13);
        let catalog = FootprintCatalog::default();
        let a = pack_lot(&lot, &catalog, 10.0, &PackConfig::default());
        let b = pack_lot(
            &lot,
            &catalog,
            10.0,
            &PackConfig {
                rand_seed_offset: 999,
                ..PackConfig::default()
            },
        );
        assert_ne!(a.placements, b.placements);
    }

    #[test]
    fn test_multi_start_monotonicity() {
        let lot = rect_lot(23, 19);
        let catalog = FootprintCatalog::default();
        let mut previous = 0;
        for multi_start in [1, 2, 4, 8] {
            let config = PackConfig {
                multi_start,
                epsilon: 0.15,
                position_shuffle_rate: 1.0,
                ..PackConfig::default()
            };
            let result = pack_lot(&lot, &catalog, 10.0, &config);
            assert!(
                result.occupied_cells >= previous,
                "multi_start {multi_start} regressed: {} < {previous}",
                result.occupied_cells
            );
            previous = result.occupied_cells;
        }
    }

    #[test]
    fn test_rotation_fits_non_square_footprints() {
        // A 2x3-cell option in a 3x2 lot only fits rotated.
        let lot = rect_lot(3, 2);
        let catalog = single_option_catalog(20.0, 30.0);
        let result = pack_lot(&lot, &catalog, 10.0, &greedy_config());
        assert_eq!(result.placements.len(), 1);
        let p = result.placements[0];
        assert!(p.rotated);
        assert_eq!((p.span_x, p.span_z), (3, 2));
    }

    #[test]
    fn test_empty_catalog_yields_no_placements() {
        let lot = rect_lot(10, 10);
        let catalog = FootprintCatalog { options: vec![] };
        let result = pack_lot(&lot, &catalog, 10.0, &greedy_config());
        assert!(result.placements.is_empty());
        assert_eq!(result.occupied_cells, 0);
    }

    #[test]
    fn test_margin_can_consume_lot() {
        let lot = rect_lot(4, 4);
        let catalog = single_option_catalog(10.0, 10.0);
        let config = PackConfig {
            lot_edge_margin: 30.0, // 3 cells of margin on each side
            ..greedy_config()
        };
        let result = pack_lot(&lot, &catalog, 10.0, &config);
        assert!(result.placements.is_empty());
    }

    #[test]
    fn test_margin_shrinks_interior() {
        let lot = rect_lot(10, 10);
        let catalog = single_option_catalog(10.0, 10.0);
        let config = PackConfig {
            lot_edge_margin: 10.0, // 1 cell margin: 8x8 interior
            ..greedy_config()
        };
        let result = pack_lot(&lot, &catalog, 10.0, &config);
        assert_eq!(result.placements.len(), 64);
        for p in &result.placements {
            assert!(p.x >= 1 && p.x + p.span_x <= 9);
            assert!(p.z >= 1 && p.z + p.span_z <= 9);
        }
    }

    #[test]
    fn test_placement_cap_truncates() {
        let lot = rect_lot(10, 10);
        let catalog = single_option_catalog(10.0, 10.0);
        let config = PackConfig {
            max_buildings_per_lot: 7,
            ..greedy_config()
        };
        let result = pack_lot(&lot, &catalog, 10.0, &config);
        assert_eq!(result.placements.len(), 7);
    }

    #[test]
    fn test_scan_cap_truncates() {
        let lot = rect_lot(10, 10);
        let catalog = single_option_catalog(10.0, 10.0);
        let config = PackConfig {
            max_cells_scanned: 10,
            ..greedy_config()
        };
        let result = pack_lot(&lot, &catalog, 10.0, &config);
        assert_eq!(result.placements.len(), 10);
    }

    #[test]
    fn test_concave_lot_never_overflows_membership() {
        // L-shaped lot: 10x10 minus its 5x5 top-right corner.
        let mut cells = Vec::new();
        for z in 0..10 {
            for x in 0..10 {
                if !(x >= 5 && z < 5) {
                    cells.push((x, z));
                }
            }
        }
        let lot = Lot {
            cells: cells.clone(),
            min_x: 0,
            max_x: 9,
            min_z: 0,
            max_z: 9,
            touches_road: true,
        };
        let member: std::collections::HashSet<_> = cells.into_iter().collect();
        let catalog = single_option_catalog(20.0, 20.0);
        let result = pack_lot(&lot, &catalog, 10.0, &greedy_config());
        assert!(!result.placements.is_empty());
        for p in &result.placements {
            for z in p.z..p.z + p.span_z {
                for x in p.x..p.x + p.span_x {
                    assert!(member.contains(&(x, z)), "({x},{z}) outside lot");
                }
            }
        }
    }

    #[test]
    fn test_per_candidate_cell_spans() {
        let option_a = FootprintOption::new(25.0, 25.0, vec![FootprintTemplate::new(0)]);
        let option_b = FootprintOption::new(10.0, 10.0, vec![FootprintTemplate::new(1)]);
        assert_eq!(option_a.cell_span(10.0), (3, 3));
        assert_eq!(option_b.cell_span(10.0), (1, 1));
    }

    #[test]
    fn test_catalog_validation() {
        assert!(FootprintCatalog::default().validate().is_ok());

        let zero = FootprintCatalog {
            options: vec![FootprintOption::new(0.0, 10.0, vec![FootprintTemplate::new(0)])],
        };
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::ZeroAreaFootprint { index: 0, .. })
        ));

        let no_templates = FootprintCatalog {
            options: vec![FootprintOption::new(10.0, 10.0, vec![])],
        };
        assert!(matches!(
            no_templates.validate(),
            Err(ConfigError::EmptyTemplateSet { index: 0 })
        ));
    }

    #[test]
    fn test_weighted_template_pick_respects_weights() {
        let templates = vec![
            FootprintTemplate { id: 0, weight: 0.0 },
            FootprintTemplate { id: 1, weight: 1.0 },
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(pick_template(&templates, &mut rng), 1);
        }
    }
}
