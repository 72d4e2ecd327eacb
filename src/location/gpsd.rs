// src/location/gpsd.rs
//! GPSD client implementation

use super::fix::Fix;
use crate::error::{GameError, Result};
use crate::world::LatLng;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::TcpStream,
};

#[derive(Debug, Deserialize)]
struct GpsdMessage {
    class: String,
    #[serde(flatten)]
    data: HashMap<String, serde_json::Value>,
}

/// Connect to a gpsd daemon and return a stream reader
pub async fn connect_gpsd(host: &str, port: u16) -> Result<BufReader<TcpStream>> {
    let mut stream = TcpStream::connect(format!("{}:{}", host, port))
        .await
        .map_err(|e| GameError::Connection(format!("Failed to connect to gpsd at {}:{}: {}", host, port, e)))?;

    // Send WATCH command to start receiving JSON data
    let watch_cmd = "?WATCH={\"enable\":true,\"json\":true}\n";
    stream
        .write_all(watch_cmd.as_bytes())
        .await
        .map_err(|e| GameError::Connection(format!("Failed to send WATCH command: {}", e)))?;

    Ok(BufReader::new(stream))
}

/// Parse a single line of gpsd JSON; only TPV reports with a 2D/3D fix yield a position
pub fn parse_gpsd_json(line: &str) -> Result<Option<Fix>> {
    let msg: GpsdMessage = serde_json::from_str(line)
        .map_err(|e| GameError::Parse(format!("Failed to parse gpsd JSON: {}", e)))?;

    match msg.class.as_str() {
        "TPV" => Ok(parse_tpv_message(&msg.data)),
        "VERSION" => {
            if let Some(version) = msg.data.get("release").and_then(|v| v.as_str()) {
                tracing::info!("Connected to gpsd version: {}", version);
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// Parse TPV (Time Position Velocity) message
fn parse_tpv_message(msg_data: &HashMap<String, serde_json::Value>) -> Option<Fix> {
    let mode = msg_data.get("mode").and_then(|v| v.as_u64()).unwrap_or(0);
    if mode < 2 {
        return None;
    }

    let lat = msg_data.get("lat").and_then(|v| v.as_f64())?;
    let lon = msg_data.get("lon").and_then(|v| v.as_f64())?;

    let position = LatLng::new(lat, lon);
    if !position.is_valid() {
        tracing::warn!("Ignoring gpsd fix off the globe: {}", position);
        return None;
    }

    let mut fix = Fix::new(position, "gpsd");

    // Horizontal error: eph when reported, else the worse of epx/epy
    fix.accuracy = msg_data.get("eph").and_then(|v| v.as_f64()).or_else(|| {
        let epx = msg_data.get("epx").and_then(|v| v.as_f64());
        let epy = msg_data.get("epy").and_then(|v| v.as_f64());
        match (epx, epy) {
            (Some(x), Some(y)) => Some(x.max(y)),
            (x, y) => x.or(y),
        }
    });

    if let Some(time) = msg_data
        .get("time")
        .and_then(|v| v.as_str())
        .and_then(|t| chrono::DateTime::parse_from_rfc3339(t).ok())
    {
        fix.timestamp = time.with_timezone(&chrono::Utc);
    }

    Some(fix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tpv_parsing() {
        let json = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":3,"time":"2023-01-01T12:00:00.000Z","ept":0.005,"lat":48.117,"lon":11.517,"alt":545.4,"epx":15.319,"epy":17.054,"epv":124.484,"track":10.3797,"speed":0.091,"climb":10.7,"eps":34.11,"epc":248.97}"#;

        let fix = parse_gpsd_json(json).unwrap().unwrap();

        assert_eq!(fix.position, LatLng::new(48.117, 11.517));
        assert_eq!(fix.accuracy, Some(17.054));
        assert_eq!(fix.source, "gpsd");
        assert_eq!(fix.timestamp.to_rfc3339(), "2023-01-01T12:00:00+00:00");
    }

    #[test]
    fn test_tpv_without_fix() {
        let json = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":1}"#;
        assert!(parse_gpsd_json(json).unwrap().is_none());
    }

    #[test]
    fn test_tpv_out_of_range_is_ignored() {
        let json = r#"{"class":"TPV","mode":3,"lat":1e300,"lon":11.517}"#;
        assert!(parse_gpsd_json(json).unwrap().is_none());

        let json = r#"{"class":"TPV","mode":2,"lat":48.117,"lon":-181.0}"#;
        assert!(parse_gpsd_json(json).unwrap().is_none());
    }

    #[test]
    fn test_other_classes_are_ignored() {
        let json = r#"{"class":"SKY","device":"/dev/ttyUSB0","hdop":1.2,"satellites":[]}"#;
        assert!(parse_gpsd_json(json).unwrap().is_none());

        let json = r#"{"class":"VERSION","release":"3.25","rev":"3.25","proto_major":3,"proto_minor":15}"#;
        assert!(parse_gpsd_json(json).unwrap().is_none());
    }

    #[test]
    fn test_invalid_json() {
        let invalid_json = r#"{"invalid": json"#;
        assert!(parse_gpsd_json(invalid_json).is_err());
    }
}
