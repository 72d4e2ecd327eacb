// src/game/visibility.rs
//! Which cache markers are in view of the player

use crate::world::{Cell, LatLng};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    pub shown: Vec<Cell>,
    pub hidden: Vec<Cell>,
}

impl VisibilityReport {
    pub fn is_shown(&self, cell: &Cell) -> bool {
        self.shown.binary_search(cell).is_ok()
    }
}

/// Euclidean distance from the cell's corner to the player, in tiles
pub fn distance_in_tiles(cell: &Cell, player: LatLng, tile_size: f64) -> f64 {
    let di = cell.i as f64 - player.lat / tile_size;
    let dj = cell.j as f64 - player.lng / tile_size;
    (di * di + dj * dj).sqrt()
}

/// Split `cells` into shown and hidden; both lists come back sorted
pub fn filter<'a>(
    cells: impl IntoIterator<Item = &'a Cell>,
    player: LatLng,
    tile_size: f64,
    radius: u32,
) -> VisibilityReport {
    let mut report = VisibilityReport::default();

    for cell in cells {
        if distance_in_tiles(cell, player, tile_size) <= radius as f64 {
            report.shown.push(*cell);
        } else {
            report.hidden.push(*cell);
        }
    }

    report.shown.sort();
    report.hidden.sort();
    report
}
