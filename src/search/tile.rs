//! Partitioning of the placement range into tiles.

/// Inclusive rectangle of top-left placements `x0..=x1`, `y0..=y1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Tile {
    /// Number of placements covered by the tile.
    pub fn placements(&self) -> usize {
        (self.x1 - self.x0 + 1) * (self.y1 - self.y0 + 1)
    }
}

/// Splits placements `0..=max_x` x `0..=max_y` into disjoint tiles.
///
/// Tiles are emitted row of tiles by row of tiles. Edge tiles are truncated,
/// never skipped, so the union is always the full placement range. Zero tile
/// sizes are treated as one.
pub fn tile_placements(
    max_x: usize,
    max_y: usize,
    tile_width: usize,
    tile_height: usize,
) -> Vec<Tile> {
    let tile_width = tile_width.max(1);
    let tile_height = tile_height.max(1);
    let mut tiles = Vec::new();
    for y0 in (0..=max_y).step_by(tile_height) {
        let y1 = (y0 + tile_height - 1).min(max_y);
        for x0 in (0..=max_x).step_by(tile_width) {
            let x1 = (x0 + tile_width - 1).min(max_x);
            tiles.push(Tile { x0, y0, x1, y1 });
        }
    }
    tiles
}
