// src/world/spawner.rs
//! Deterministic cache placement around a position

use super::cache::Cache;
use super::cell::{Cell, CellRegistry, LatLng};
use super::luck::luck;
use std::collections::HashMap;

/// Coins per cache are drawn from `0..MAX_INITIAL_COINS`
pub const MAX_INITIAL_COINS: u32 = 10;

const COIN_SALT: &str = "initialValue";

/// Whether the cell is lucky enough to hold a cache
pub fn spawns_cache(cell: Cell, probability: f64) -> bool {
    luck(&format!("{},{}", cell.i, cell.j)) < probability
}

pub fn initial_coin_count(cell: Cell) -> u32 {
    let roll = luck(&format!("{},{},{}", cell.i, cell.j, COIN_SALT));
    ((roll * MAX_INITIAL_COINS as f64).floor() as u32).min(MAX_INITIAL_COINS - 1)
}

/// Spawn caches in the square of cells within `radius` of `center`.
///
/// Cells that already hold a cache are left alone, so restored or
/// partially emptied caches survive re-spawning. Returns the cells that
/// gained a cache, in row-major order.
pub fn spawn_neighborhood(
    registry: &mut CellRegistry,
    caches: &mut HashMap<Cell, Cache>,
    center: LatLng,
    radius: u32,
    probability: f64,
) -> Vec<Cell> {
    let origin = registry.cell_at(center);
    let radius = radius as i64;
    let mut spawned = Vec::new();

    for di in -radius..=radius {
        for dj in -radius..=radius {
            let cell = registry.register(origin.offset(di, dj));
            if caches.contains_key(&cell) || !spawns_cache(cell, probability) {
                continue;
            }
            let cache = Cache::minted(cell, initial_coin_count(cell));
            tracing::debug!("Spawned cache at {} with {} coins", cell, cache.coin_count());
            caches.insert(cell, cache);
            spawned.push(cell);
        }
    }

    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Coin;

    const TILE: f64 = 1e-4;

    #[test]
    fn test_known_cells() {
        assert!(spawns_cache(Cell::new(369888, -1220627), 0.1));
        assert_eq!(initial_coin_count(Cell::new(369888, -1220627)), 7);

        assert!(spawns_cache(Cell::new(369886, -1220632), 0.1));
        assert_eq!(initial_coin_count(Cell::new(369886, -1220632)), 6);

        // luck("369895,-1220628") is about 0.53
        assert!(!spawns_cache(Cell::new(369895, -1220628), 0.1));
        assert!(spawns_cache(Cell::new(369895, -1220628), 0.6));
    }

    #[test]
    fn test_probability_extremes() {
        let cell = Cell::new(12, 34);
        assert!(!spawns_cache(cell, 0.0));
        assert!(spawns_cache(cell, 1.0));
    }

    #[test]
    fn test_coin_count_range() {
        for i in -20..20 {
            for j in -20..20 {
                assert!(initial_coin_count(Cell::new(i, j)) < MAX_INITIAL_COINS);
            }
        }
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let center = LatLng::new(36.98949379578401, -122.06277128548504);

        let mut registry_a = CellRegistry::new(TILE);
        let mut caches_a = HashMap::new();
        let spawned_a = spawn_neighborhood(&mut registry_a, &mut caches_a, center, 8, 0.1);

        let mut registry_b = CellRegistry::new(TILE);
        let mut caches_b = HashMap::new();
        let spawned_b = spawn_neighborhood(&mut registry_b, &mut caches_b, center, 8, 0.1);

        assert_eq!(spawned_a, spawned_b);
        assert_eq!(caches_a, caches_b);
        assert_eq!(spawned_a.len(), 25);
        assert_eq!(registry_a.known_cells(), 17 * 17);
        assert!(caches_a.contains_key(&Cell::new(369888, -1220627)));
    }

    #[test]
    fn test_existing_caches_are_not_replaced() {
        let center = LatLng::new(36.98949379578401, -122.06277128548504);
        let lucky = Cell::new(369888, -1220627);

        let mut registry = CellRegistry::new(TILE);
        let mut caches = HashMap::new();
        caches.insert(lucky, Cache::empty(lucky));

        let spawned = spawn_neighborhood(&mut registry, &mut caches, center, 8, 0.1);
        assert!(!spawned.contains(&lucky));
        assert!(caches[&lucky].is_empty());

        // a second pass finds nothing new
        let again = spawn_neighborhood(&mut registry, &mut caches, center, 8, 0.1);
        assert!(again.is_empty());
    }

    #[test]
    fn test_zero_radius_only_checks_center() {
        let center = Cell::new(369888, -1220627).center(TILE);
        let mut registry = CellRegistry::new(TILE);
        let mut caches = HashMap::new();

        let spawned = spawn_neighborhood(&mut registry, &mut caches, center, 0, 0.1);
        assert_eq!(spawned, vec![Cell::new(369888, -1220627)]);
        assert_eq!(
            caches[&Cell::new(369888, -1220627)].coins[0],
            Coin::new(Cell::new(369888, -1220627), 0)
        );
    }
}
