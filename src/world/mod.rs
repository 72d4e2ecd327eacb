// src/world/mod.rs
//! Grid cells, coins, caches and the deterministic spawner

mod cache;
mod cell;
pub mod luck;
pub mod spawner;

pub use cache::{Cache, Coin};
pub use cell::{Cell, CellBounds, CellRegistry, LatLng};
