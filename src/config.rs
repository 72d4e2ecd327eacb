// src/config.rs
//! Game configuration stored as JSON under the user's config directory

use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Starting point of a fresh world (the classroom the game was designed around).
pub const DEFAULT_ORIGIN: (f64, f64) = (36.98949379578401, -122.06277128548504);

/// Largest neighborhood the spawner and the grid view will walk
pub const MAX_NEIGHBORHOOD_RADIUS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cell edge length in degrees
    pub tile_size: f64,
    /// Half-width of the spawn/visibility square, in cells
    pub neighborhood_radius: u32,
    pub spawn_probability: f64,
    pub origin_lat: f64,
    pub origin_lng: f64,
    /// Where the save store and log file live; defaults next to the config file
    pub data_dir: Option<PathBuf>,
    pub location_source: String, // "none", "gpsd", "serial"
    pub gpsd_host: Option<String>,
    pub gpsd_port: Option<u16>,
    pub serial_port: Option<String>,
    pub serial_baudrate: Option<u32>,
    pub location_timeout_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 1e-4,
            neighborhood_radius: 8,
            spawn_probability: 0.1,
            origin_lat: DEFAULT_ORIGIN.0,
            origin_lng: DEFAULT_ORIGIN.1,
            data_dir: None,
            location_source: "none".to_string(),
            gpsd_host: Some("localhost".to_string()),
            gpsd_port: Some(2947),
            serial_port: None,
            serial_baudrate: Some(9600),
            location_timeout_secs: 10,
        }
    }
}

impl GameConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| GameError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GameError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| GameError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| GameError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Reject values the grid math cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(GameError::Config(format!(
                "tile_size must be a positive number, got {}",
                self.tile_size
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(GameError::Config(format!(
                "spawn_probability must be within [0, 1], got {}",
                self.spawn_probability
            )));
        }
        if self.neighborhood_radius > MAX_NEIGHBORHOOD_RADIUS {
            return Err(GameError::Config(format!(
                "neighborhood_radius must be at most {}, got {}",
                MAX_NEIGHBORHOOD_RADIUS, self.neighborhood_radius
            )));
        }
        if !self.origin().is_valid() {
            return Err(GameError::Config(format!("origin is not on the globe: {}", self.origin())));
        }
        match self.location_source.as_str() {
            "none" | "gpsd" | "serial" => Ok(()),
            other => Err(GameError::Config(format!("Unknown location source: {}", other))),
        }
    }

    /// Config file path: `$HOME/.config/geocoin/config.json`
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Directory holding the save store and log, honoring `data_dir`
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match self.data_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => Ok(Self::base_dir()?.join("data")),
        }
    }

    fn base_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| GameError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("geocoin"))
    }

    /// Update the location source
    pub fn update_source(&mut self, source_type: &str) {
        self.location_source = source_type.to_string();
    }

    /// Update serial port settings
    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.location_source = "serial".to_string();
        self.serial_port = Some(port);
        self.serial_baudrate = Some(baudrate);
    }

    /// Update gpsd settings
    pub fn update_gpsd(&mut self, host: String, port: u16) {
        self.location_source = "gpsd".to_string();
        self.gpsd_host = Some(host);
        self.gpsd_port = Some(port);
    }

    pub fn origin(&self) -> crate::world::LatLng {
        crate::world::LatLng::new(self.origin_lat, self.origin_lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.tile_size, 1e-4);
        assert_eq!(config.neighborhood_radius, 8);
        assert_eq!(config.location_source, "none");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_update_serial() {
        let mut config = GameConfig::default();
        config.update_serial("/dev/ttyUSB0".to_string(), 115200);
        assert_eq!(config.location_source, "serial");
        assert_eq!(config.serial_port, Some("/dev/ttyUSB0".to_string()));
        assert_eq!(config.serial_baudrate, Some(115200));
    }

    #[test]
    fn test_update_gpsd() {
        let mut config = GameConfig::default();
        config.update_gpsd("gps.local".to_string(), 3000);
        assert_eq!(config.location_source, "gpsd");
        assert_eq!(config.gpsd_host.as_deref(), Some("gps.local"));
        assert_eq!(config.gpsd_port, Some(3000));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.tile_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.spawn_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.update_source("bluetooth");
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.origin_lat = 1e300;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_radius() {
        let mut config = GameConfig::default();
        config.neighborhood_radius = MAX_NEIGHBORHOOD_RADIUS;
        assert!(config.validate().is_ok());

        config.neighborhood_radius = 4_000_000_000;
        assert!(matches!(config.validate(), Err(GameError::Config(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = GameConfig::default();
        config.neighborhood_radius = 4;
        config.save_to(&path).unwrap();

        let loaded = GameConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"spawn_probability": 0.25}"#).unwrap();

        let loaded = GameConfig::load_from(&path).unwrap();
        assert_eq!(loaded.spawn_probability, 0.25);
        assert_eq!(loaded.tile_size, 1e-4);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = GameConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, GameConfig::default());
    }
}
