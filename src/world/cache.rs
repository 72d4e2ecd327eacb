// src/world/cache.rs
//! Coins and the caches that hold them

use super::cell::Cell;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A coin is identified by the cell it was minted in and its serial there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coin {
    pub cell: Cell,
    pub serial: u32,
}

impl Coin {
    pub fn new(cell: Cell, serial: u32) -> Self {
        Self { cell, serial }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.cell.i, self.cell.j, self.serial)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    pub cell: Cell,
    pub coins: Vec<Coin>,
}

impl Cache {
    pub fn empty(cell: Cell) -> Self {
        Self {
            cell,
            coins: Vec::new(),
        }
    }

    /// A cache holding `count` coins minted in its own cell
    pub fn minted(cell: Cell, count: u32) -> Self {
        Self {
            cell,
            coins: (0..count).map(|serial| Coin::new(cell, serial)).collect(),
        }
    }

    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Snapshot of the coin list as a JSON string
    pub fn to_memento(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.coins)?)
    }

    /// Rebuild a cache from a memento produced by [`Cache::to_memento`]
    pub fn from_memento(cell: Cell, memento: &str) -> Result<Self> {
        let coins: Vec<Coin> = serde_json::from_str(memento)?;
        Ok(Self { cell, coins })
    }
}
