// src/world/cell.rs
//! Mapping continuous lat/lng positions onto the discrete cell grid

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and on the globe: latitude within ±90, longitude within ±180
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Shift by a whole number of tiles
    pub fn offset_tiles(&self, d_lat: i64, d_lng: i64, tile_size: f64) -> Self {
        Self {
            lat: self.lat + d_lat as f64 * tile_size,
            lng: self.lng + d_lng as f64 * tile_size,
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Grid coordinate: `i` counts tiles of latitude, `j` tiles of longitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub i: i64,
    pub j: i64,
}

impl Cell {
    pub fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }

    pub fn containing(position: LatLng, tile_size: f64) -> Self {
        Self {
            i: (position.lat / tile_size).floor() as i64,
            j: (position.lng / tile_size).floor() as i64,
        }
    }

    /// Neighbor cell; clamps at the edge of the index range instead of wrapping
    pub fn offset(&self, di: i64, dj: i64) -> Self {
        Self::new(self.i.saturating_add(di), self.j.saturating_add(dj))
    }

    /// Middle of the cell; maps back to the same cell without rounding trouble
    pub fn center(&self, tile_size: f64) -> LatLng {
        LatLng::new(
            (self.i as f64 + 0.5) * tile_size,
            (self.j as f64 + 0.5) * tile_size,
        )
    }

    pub fn bounds(&self, tile_size: f64) -> CellBounds {
        CellBounds {
            south_west: LatLng::new(self.i as f64 * tile_size, self.j as f64 * tile_size),
            north_east: LatLng::new(
                (self.i as f64 + 1.0) * tile_size,
                (self.j as f64 + 1.0) * tile_size,
            ),
        }
    }
}

impl fmt::Display for CellBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.south_west, self.north_east)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

/// Flyweight table of every cell the game has looked at.
///
/// Lookups for the same coordinates always hand back the registered cell,
/// so callers can compare cells by value without caring where they came from.
#[derive(Debug, Clone)]
pub struct CellRegistry {
    tile_size: f64,
    known: HashMap<(i64, i64), Cell>,
}

impl CellRegistry {
    pub fn new(tile_size: f64) -> Self {
        Self {
            tile_size,
            known: HashMap::new(),
        }
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn cell_for(&mut self, lat: f64, lng: f64) -> Cell {
        let cell = Cell::containing(LatLng::new(lat, lng), self.tile_size);
        self.register(cell)
    }

    pub fn cell_at(&mut self, position: LatLng) -> Cell {
        self.cell_for(position.lat, position.lng)
    }

    /// Register a cell obtained some other way (neighborhood offsets, restored saves)
    pub fn register(&mut self, cell: Cell) -> Cell {
        *self.known.entry((cell.i, cell.j)).or_insert(cell)
    }

    pub fn known_cells(&self) -> usize {
        self.known.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_division() {
        let mut registry = CellRegistry::new(0.0001);
        assert_eq!(registry.cell_for(36.9895, -122.0628), Cell::new(369895, -1220628));
        assert_eq!(registry.cell_for(36.98955, -122.06275), Cell::new(369895, -1220628));
    }

    #[test]
    fn test_position_validity() {
        assert!(LatLng::new(36.9895, -122.0628).is_valid());
        assert!(LatLng::new(-90.0, 180.0).is_valid());
        assert!(!LatLng::new(1e300, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -180.5).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_offset_clamps_at_index_limits() {
        let edge = Cell::new(i64::MAX, i64::MIN);
        assert_eq!(edge.offset(3, -3), edge);
        assert_eq!(edge.offset(-1, 1), Cell::new(i64::MAX - 1, i64::MIN + 1));
    }

    #[test]
    fn test_negative_coordinates_floor_down() {
        let mut registry = CellRegistry::new(1.0);
        assert_eq!(registry.cell_for(-0.5, -1.5), Cell::new(-1, -2));
        assert_eq!(registry.cell_for(0.5, 1.5), Cell::new(0, 1));
    }

    #[test]
    fn test_repeated_lookups_are_memoized() {
        let mut registry = CellRegistry::new(0.0001);
        let first = registry.cell_for(36.98949379578401, -122.06277128548504);
        let second = registry.cell_for(36.98949379578401, -122.06277128548504);
        let nearby = registry.cell_for(36.98949, -122.06277);

        assert_eq!(first, second);
        assert_eq!(first, nearby);
        assert_eq!(registry.known_cells(), 1);

        registry.cell_for(36.9896, -122.0628);
        assert_eq!(registry.known_cells(), 2);
    }

    #[test]
    fn test_center_maps_back_to_cell() {
        let tile = 0.0001;
        for cell in [Cell::new(369894, -1220628), Cell::new(-3, 7), Cell::new(0, 0)] {
            assert_eq!(Cell::containing(cell.center(tile), tile), cell);
        }
    }

    #[test]
    fn test_bounds_span_one_tile() {
        let bounds = Cell::new(2, -3).bounds(0.5);
        assert_eq!(bounds.south_west, LatLng::new(1.0, -1.5));
        assert_eq!(bounds.north_east, LatLng::new(1.5, -1.0));
        assert_eq!(bounds.to_string(), "1.000000, -1.500000 to 1.500000, -1.000000");
    }

    #[test]
    fn test_display_key() {
        assert_eq!(Cell::new(369894, -1220628).to_string(), "369894,-1220628");
    }
}
