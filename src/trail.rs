// src/trail.rs
//! Exporting the player's movement history

use crate::error::{GameError, Result};
use crate::world::LatLng;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TrailFormat {
    Gpx,
    #[value(name = "geojson")]
    GeoJson,
    Csv,
}

impl TrailFormat {
    pub fn extension(&self) -> &str {
        match self {
            TrailFormat::Gpx => "gpx",
            TrailFormat::GeoJson => "geojson",
            TrailFormat::Csv => "csv",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TrailFormat::Gpx => "GPX (GPS Exchange)",
            TrailFormat::GeoJson => "GeoJSON",
            TrailFormat::Csv => "CSV",
        }
    }
}

pub struct TrailExporter<'a> {
    name: String,
    points: &'a [LatLng],
}

impl<'a> TrailExporter<'a> {
    pub fn new(name: &str, points: &'a [LatLng]) -> Self {
        Self {
            name: name.to_string(),
            points,
        }
    }

    pub fn render(&self, format: TrailFormat) -> Result<String> {
        if self.points.is_empty() {
            return Err(GameError::Other("No trail points to export".to_string()));
        }

        match format {
            TrailFormat::Gpx => Ok(self.to_gpx()),
            TrailFormat::GeoJson => self.to_geojson(),
            TrailFormat::Csv => Ok(self.to_csv()),
        }
    }

    pub fn export_to_file(&self, path: &Path, format: TrailFormat) -> Result<()> {
        let content = self.render(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        tracing::info!("Exported {} trail points to {}", self.points.len(), path.display());
        Ok(())
    }

    fn to_gpx(&self) -> String {
        let mut gpx = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="geocoin" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
"#,
        );
        gpx.push_str(&format!("    <name>{}</name>\n    <trkseg>\n", escape_xml(&self.name)));

        for point in self.points {
            gpx.push_str(&format!(
                "      <trkpt lat=\"{}\" lon=\"{}\"/>\n",
                point.lat, point.lng
            ));
        }

        gpx.push_str("    </trkseg>\n  </trk>\n</gpx>\n");
        gpx
    }

    fn to_geojson(&self) -> Result<String> {
        // GeoJSON positions are [longitude, latitude]
        let coordinates: Vec<[f64; 2]> = self.points.iter().map(|p| [p.lng, p.lat]).collect();

        let feature = serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates
            },
            "properties": {
                "name": self.name,
                "points": self.points.len()
            }
        });

        Ok(serde_json::to_string_pretty(&feature)?)
    }

    fn to_csv(&self) -> String {
        let mut csv = String::from("step,latitude,longitude\n");
        for (step, point) in self.points.iter().enumerate() {
            csv.push_str(&format!("{},{},{}\n", step, point.lat, point.lng));
        }
        csv
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trail() -> Vec<LatLng> {
        vec![LatLng::new(36.5, -122.0), LatLng::new(36.5001, -122.0)]
    }

    #[test]
    fn test_gpx_export() {
        let points = trail();
        let gpx = TrailExporter::new("Walk <1>", &points).render(TrailFormat::Gpx).unwrap();
        assert!(gpx.contains("<trkseg>"));
        assert!(gpx.contains("Walk &lt;1&gt;"));
        assert!(gpx.contains("<trkpt lat=\"36.5\" lon=\"-122\"/>"));
    }

    #[test]
    fn test_geojson_is_lng_lat() {
        let points = trail();
        let json = TrailExporter::new("walk", &points).render(TrailFormat::GeoJson).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["geometry"]["type"], "LineString");
        assert_eq!(value["geometry"]["coordinates"][0][0], -122.0);
        assert_eq!(value["geometry"]["coordinates"][0][1], 36.5);
    }

    #[test]
    fn test_csv_export() {
        let points = trail();
        let csv = TrailExporter::new("walk", &points).render(TrailFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("step,latitude,longitude\n0,36.5,-122\n"));
    }

    #[test]
    fn test_empty_trail_is_error() {
        assert!(TrailExporter::new("walk", &[]).render(TrailFormat::Csv).is_err());
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let points = trail();
        let path = dir.path().join(format!("walk.{}", TrailFormat::Gpx.extension()));
        TrailExporter::new("walk", &points).export_to_file(&path, TrailFormat::Gpx).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<gpx"));
    }
}
