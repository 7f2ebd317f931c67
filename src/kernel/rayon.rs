//! Rayon-parallel scans (feature-gated).
//!
//! Each tile is an independent rectangle of placements. Workers only read the
//! scene and the plan; per-tile peak lists are collected in tile order and the
//! caller restores row-major order, so the output equals the sequential scan.

use crate::candidate::peak::Peak;
use crate::kernel::{Kernel, ScanParams};
use crate::search::tile::Tile;
use crate::template::TemplatePlan;
use crate::ImageView;
use rayon::prelude::*;

/// Scans every tile on the rayon pool and concatenates results in tile order.
pub fn scan_tiles_par<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    tiles: &[Tile],
    params: ScanParams,
) -> Vec<Peak> {
    let per_tile: Vec<Vec<Peak>> = tiles
        .par_iter()
        .map(|tile| K::scan_roi(image, plan, tile.x0, tile.y0, tile.x1, tile.y1, params))
        .collect();
    per_tile.into_iter().flatten().collect()
}

/// Row-parallel full scan: one band per placement row.
pub fn scan_rows_par<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    max_x: usize,
    max_y: usize,
    params: ScanParams,
) -> Vec<Peak> {
    let per_row: Vec<Vec<Peak>> = (0..=max_y)
        .into_par_iter()
        .map(|y| K::scan_roi(image, plan, 0, y, max_x, y, params))
        .collect();
    per_row.into_iter().flatten().collect()
}
