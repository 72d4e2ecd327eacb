// src/location/fix.rs
//! A single position report from a location source

use crate::world::LatLng;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub position: LatLng,
    pub timestamp: DateTime<Utc>,
    pub accuracy: Option<f64>, // meters
    pub source: String,        // "gpsd", "NMEA", ...
}

impl Fix {
    pub fn new(position: LatLng, source: &str) -> Self {
        Self {
            position,
            timestamp: Utc::now(),
            accuracy: None,
            source: source.to_string(),
        }
    }

    /// Get the age of the fix in seconds
    pub fn age_seconds(&self) -> i64 {
        Utc::now().signed_duration_since(self.timestamp).num_seconds()
    }

    /// Short text for the status bar
    pub fn describe(&self) -> String {
        let accuracy = match self.accuracy {
            Some(acc) => format!(" ±{:.0} m", acc),
            None => String::new(),
        };
        format!(
            "{} fix {}{} at {}",
            self.source,
            self.position,
            accuracy,
            self.timestamp.format("%H:%M:%S UTC")
        )
    }
}
