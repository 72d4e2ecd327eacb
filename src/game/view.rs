// src/game/view.rs
//! Render-agnostic view model: strings and flags a UI layer can draw

use super::GameState;
use crate::world::{Cell, Coin};

/// How many coins a one-line summary lists before eliding the rest
const COIN_PREVIEW: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePopup {
    pub cell: Cell,
    pub title: String,
    /// Corner coordinates of the cell
    pub area: String,
    pub coins: Vec<String>,
    pub can_collect: bool,
    pub can_deposit: bool,
}

impl CachePopup {
    pub fn for_cell(state: &GameState, cell: &Cell) -> Option<Self> {
        let cache = state.cache_at(cell)?;
        Some(Self {
            cell: *cell,
            title: format!("Cache {} ({} coins)", cell, cache.coin_count()),
            area: cell.bounds(state.tile_size()).to_string(),
            coins: cache.coins.iter().map(Coin::to_string).collect(),
            can_collect: !cache.is_empty(),
            can_deposit: !state.player.coins.is_empty(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub position: String,
    pub cell: String,
    pub inventory: String,
}

impl StatusLine {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            position: state.player.position.to_string(),
            cell: state.current_cell().to_string(),
            inventory: summarize_coins(&state.player.coins),
        }
    }
}

/// "No coins" or "3 coins: a, b, c" with at most a handful listed
pub fn summarize_coins(coins: &[Coin]) -> String {
    if coins.is_empty() {
        return "No coins".to_string();
    }

    let listed: Vec<String> = coins.iter().take(COIN_PREVIEW).map(Coin::to_string).collect();
    let mut summary = format!("{} coins: {}", coins.len(), listed.join(", "));
    if coins.len() > COIN_PREVIEW {
        summary.push_str(&format!(", +{} more", coins.len() - COIN_PREVIEW));
    }
    summary
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Player,
    /// Player standing on a cache
    PlayerOnCache,
    Cache,
    EmptyCache,
    Nothing,
}

/// Square of glyphs centered on the player, north row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborhoodView {
    pub radius: u32,
    pub rows: Vec<Vec<Glyph>>,
}

impl NeighborhoodView {
    pub fn from_state(state: &GameState) -> Self {
        let visible = state.visibility();
        let center = state.current_cell();
        let r = state.radius() as i64;

        let rows = (-r..=r)
            .rev()
            .map(|di| {
                (-r..=r)
                    .map(|dj| {
                        let cell = center.offset(di, dj);
                        let cache = state.cache_at(&cell).filter(|_| visible.is_shown(&cell));
                        match (di == 0 && dj == 0, cache) {
                            (true, Some(_)) => Glyph::PlayerOnCache,
                            (true, None) => Glyph::Player,
                            (false, Some(c)) if c.is_empty() => Glyph::EmptyCache,
                            (false, Some(_)) => Glyph::Cache,
                            (false, None) => Glyph::Nothing,
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            radius: state.radius(),
            rows,
        }
    }
}
