// src/game/state.rs
//! The explicit game state every operation reads from and writes to

use super::visibility::{self, VisibilityReport};
use crate::config::GameConfig;
use crate::world::{spawner, Cache, Cell, CellRegistry, Coin, LatLng};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Tile offset as (lat, lng)
    pub fn delta(&self) -> (i64, i64) {
        match self {
            Direction::North => (1, 0),
            Direction::South => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: LatLng,
    pub coins: Vec<Coin>,
    pub history: Vec<LatLng>,
}

impl Player {
    pub fn at(position: LatLng) -> Self {
        Self {
            position,
            coins: Vec::new(),
            history: vec![position],
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub cells: CellRegistry,
    pub caches: HashMap<Cell, Cache>,
    pub player: Player,
    radius: u32,
    spawn_probability: f64,
}

impl GameState {
    /// A fresh world at the configured origin with its neighborhood spawned
    pub fn new(config: &GameConfig) -> Self {
        let mut state = Self::from_parts(config, Player::at(config.origin()), HashMap::new());
        state.spawn_nearby();
        state
    }

    /// Assemble a state from restored pieces without spawning anything
    pub fn from_parts(config: &GameConfig, player: Player, caches: HashMap<Cell, Cache>) -> Self {
        let mut cells = CellRegistry::new(config.tile_size);
        cells.cell_at(player.position);
        for cell in caches.keys() {
            cells.register(*cell);
        }

        Self {
            cells,
            caches,
            player,
            radius: config.neighborhood_radius,
            spawn_probability: config.spawn_probability,
        }
    }

    pub fn tile_size(&self) -> f64 {
        self.cells.tile_size()
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn player_cell(&mut self) -> Cell {
        self.cells.cell_at(self.player.position)
    }

    /// Cell under the player without registering it
    pub fn current_cell(&self) -> Cell {
        Cell::containing(self.player.position, self.tile_size())
    }

    pub fn cache_at(&self, cell: &Cell) -> Option<&Cache> {
        self.caches.get(cell)
    }

    /// Step one tile and record the new position in the trail.
    /// A step off the edge of the globe leaves the player where they are.
    pub fn move_player(&mut self, direction: Direction) -> LatLng {
        let (d_lat, d_lng) = direction.delta();
        let next = self.player.position.offset_tiles(d_lat, d_lng, self.tile_size());
        self.relocate(next);
        self.player.position
    }

    /// Jump to an absolute position, e.g. from a location fix.
    ///
    /// Returns false and changes nothing when the position is not a real
    /// place on the globe.
    pub fn relocate(&mut self, position: LatLng) -> bool {
        if !position.is_valid() {
            tracing::warn!("Refusing to move to {}", position);
            return false;
        }
        self.player.position = position;
        self.player.history.push(position);
        self.cells.cell_at(position);
        true
    }

    pub fn spawn_nearby(&mut self) -> Vec<Cell> {
        spawner::spawn_neighborhood(
            &mut self.cells,
            &mut self.caches,
            self.player.position,
            self.radius,
            self.spawn_probability,
        )
    }

    pub fn visibility(&self) -> VisibilityReport {
        visibility::filter(self.caches.keys(), self.player.position, self.tile_size(), self.radius)
    }

    /// Everything that follows a position change: spawn newly reachable
    /// caches and recompute which markers are shown
    pub fn step(&mut self) -> VisibilityReport {
        let spawned = self.spawn_nearby();
        if !spawned.is_empty() {
            tracing::debug!("{} new caches near {}", spawned.len(), self.player.position);
        }
        self.visibility()
    }

    /// Throw the world away and start over from the configured origin
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }
}
