// src/storage/save.rs
//! The saved-game document and the save/load operations over a store

use super::KeyValueStore;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::game::{GameState, Player};
use crate::world::{Cache, Cell, Coin, LatLng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const STORAGE_KEY: &str = "gameState";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDocument {
    pub player_lat: f64,
    pub player_lng: f64,
    pub player_coins: Vec<Coin>,
    pub location_history: Vec<(f64, f64)>,
    pub caches: Vec<CacheRecord>,
}

/// A cache as stored: where it is plus a JSON snapshot of its coins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub lat: f64,
    pub lng: f64,
    pub memento: String,
}

impl SaveDocument {
    pub fn capture(state: &GameState) -> Result<Self> {
        let tile_size = state.tile_size();

        let mut cells: Vec<&Cell> = state.caches.keys().collect();
        cells.sort();

        let caches = cells
            .into_iter()
            .map(|cell| -> Result<CacheRecord> {
                let center = cell.center(tile_size);
                Ok(CacheRecord {
                    lat: center.lat,
                    lng: center.lng,
                    memento: state.caches[cell].to_memento()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            player_lat: state.player.position.lat,
            player_lng: state.player.position.lng,
            player_coins: state.player.coins.clone(),
            location_history: state.player.history.iter().map(|p| (p.lat, p.lng)).collect(),
            caches,
        })
    }

    /// Build a complete state from the document.
    ///
    /// Every cache is decoded before the state is assembled, so a bad
    /// memento fails the whole restore instead of leaving empty caches behind.
    pub fn restore(&self, config: &GameConfig) -> Result<GameState> {
        let position = LatLng::new(self.player_lat, self.player_lng);
        if !position.is_valid() {
            return Err(GameError::Parse(format!("Saved player position out of range: {}", position)));
        }

        let mut caches = HashMap::with_capacity(self.caches.len());
        for record in &self.caches {
            let at = LatLng::new(record.lat, record.lng);
            if !at.is_valid() {
                return Err(GameError::Parse(format!("Saved cache position out of range: {}", at)));
            }
            let cell = Cell::containing(at, config.tile_size);
            let cache = Cache::from_memento(cell, &record.memento)?;
            if caches.insert(cell, cache).is_some() {
                return Err(GameError::Parse(format!("Duplicate cache at {}", cell)));
            }
        }

        let mut history: Vec<LatLng> = self
            .location_history
            .iter()
            .map(|&(lat, lng)| LatLng::new(lat, lng))
            .collect();
        if let Some(bad) = history.iter().find(|p| !p.is_valid()) {
            return Err(GameError::Parse(format!("Saved history position out of range: {}", bad)));
        }
        if history.is_empty() {
            history.push(position);
        }

        let player = Player {
            position,
            coins: self.player_coins.clone(),
            history,
        };

        Ok(GameState::from_parts(config, player, caches))
    }
}

pub fn save_game(store: &mut dyn KeyValueStore, state: &GameState) -> Result<()> {
    let document = SaveDocument::capture(state)?;
    let json = serde_json::to_string(&document)?;
    store.set(STORAGE_KEY, &json)?;
    tracing::debug!("Saved game with {} caches", document.caches.len());
    Ok(())
}

/// Restore the saved game, or `None` when there is no usable save.
///
/// A malformed document is treated the same as a missing one; nothing is
/// partially recovered. Callers re-spawn the current neighborhood afterwards.
pub fn load_game(store: &dyn KeyValueStore, config: &GameConfig) -> Option<GameState> {
    let json = match store.get(STORAGE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Could not read saved game: {}", e);
            return None;
        }
    };

    let restored = serde_json::from_str::<SaveDocument>(&json)
        .map_err(GameError::from)
        .and_then(|document| document.restore(config));

    match restored {
        Ok(state) => {
            tracing::info!(
                "Restored game at {} with {} caches",
                state.player.position,
                state.caches.len()
            );
            Some(state)
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed saved game: {}", e);
            None
        }
    }
}

pub fn clear_game(store: &mut dyn KeyValueStore) -> Result<()> {
    store.remove(STORAGE_KEY)
}
