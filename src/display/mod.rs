// src/display/mod.rs
//! Front ends that draw the game's view model

pub mod terminal;

pub use terminal::TerminalDisplay;
