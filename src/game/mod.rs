// src/game/mod.rs
//! Game state, the coin ledger, visibility and the view model

pub mod ledger;
mod state;
pub mod view;
pub mod visibility;

pub use state::{Direction, GameState, Player};
pub use visibility::VisibilityReport;
