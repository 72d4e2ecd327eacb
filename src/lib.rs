// src/lib.rs
//! Geocoin Library
//!
//! A location-based coin collecting game: caches spawn deterministically on
//! a lat/lng grid around the player, who collects and deposits their coins.
//! State persists to a key-value store and can follow a live GPS feed.

pub mod config;
pub mod display;
pub mod error;
pub mod game;
pub mod location;
pub mod session;
pub mod storage;
pub mod trail;
pub mod world;

// Re-export main types for convenience
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use game::GameState;
pub use session::{Command, GameSession};
