// src/location/mod.rs
//! Live position feeds: gpsd and NMEA serial receivers

pub mod fix;
pub mod gpsd;
pub mod nmea;
pub mod tracker;

pub use fix::Fix;
pub use tracker::{LocationEvent, LocationEventKind, LocationSource, LocationTracker, Subscription};
