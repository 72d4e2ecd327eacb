// src/game/ledger.rs
//! Moving coins between caches and the player
//!
//! Both transfers are all-or-nothing: every coin on the source side moves,
//! or nothing does. An empty source is a no-op rather than an error.

use super::GameState;
use crate::world::Cell;

/// Take every coin from the cache at `cell`. Returns how many moved.
pub fn collect(state: &mut GameState, cell: &Cell) -> usize {
    let Some(cache) = state.caches.get_mut(cell) else {
        return 0;
    };
    if cache.coins.is_empty() {
        return 0;
    }

    let moved = cache.coins.len();
    state.player.coins.append(&mut cache.coins);
    tracing::info!("Collected {} coins from {}", moved, cell);
    moved
}

/// Leave every coin the player carries in the cache at `cell`. Returns how many moved.
pub fn deposit(state: &mut GameState, cell: &Cell) -> usize {
    if state.player.coins.is_empty() {
        return 0;
    }
    let Some(cache) = state.caches.get_mut(cell) else {
        return 0;
    };

    let moved = state.player.coins.len();
    cache.coins.append(&mut state.player.coins);
    tracing::info!("Deposited {} coins into {}", moved, cell);
    moved
}

/// Coins in the world: every cache plus the player's inventory
pub fn total_coins(state: &GameState) -> usize {
    state.player.coins.len() + state.caches.values().map(|c| c.coin_count()).sum::<usize>()
}
