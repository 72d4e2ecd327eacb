// src/location/nmea.rs
//! NMEA sentence parsing, reduced to what a position fix needs

use super::fix::Fix;
use crate::world::LatLng;

/// Parse a single NMEA sentence into a fix.
///
/// Only GGA and RMC carry positions; every other sentence, and sentences
/// reporting no fix, yield `None`.
pub fn parse_nmea_sentence(line: &str) -> Option<Fix> {
    let body = line.split('*').next().unwrap_or(line);
    let parts: Vec<&str> = body.split(',').collect();
    let kind = parts.first()?;

    if kind.len() != 6 || !kind.starts_with('$') {
        return None;
    }

    match kind.get(3..)? {
        "GGA" => parse_gga(&parts),
        "RMC" => parse_rmc(&parts),
        _ => None,
    }
}

/// GGA (Global Positioning System Fix Data)
fn parse_gga(parts: &[&str]) -> Option<Fix> {
    if parts.len() < 10 {
        return None;
    }

    // Fix quality (field 6), 0 means no fix
    let quality = parts[6].parse::<u8>().ok()?;
    if quality == 0 {
        return None;
    }

    let lat = parse_coordinate(parts[2], parts[3])?;
    let lng = parse_coordinate(parts[4], parts[5])?;

    let mut fix = Fix::new(on_globe(lat, lng)?, "NMEA");
    // HDOP (field 8) scaled by a typical receiver's 5 m base error
    fix.accuracy = parts[8].parse::<f64>().ok().map(|hdop| hdop * 5.0);
    Some(fix)
}

/// RMC (Recommended Minimum Course)
fn parse_rmc(parts: &[&str]) -> Option<Fix> {
    if parts.len() < 7 {
        return None;
    }

    // Status (field 2): A = active, V = void
    if parts[2] != "A" {
        return None;
    }

    let lat = parse_coordinate(parts[3], parts[4])?;
    let lng = parse_coordinate(parts[5], parts[6])?;
    Some(Fix::new(on_globe(lat, lng)?, "NMEA"))
}

fn on_globe(lat: f64, lng: f64) -> Option<LatLng> {
    Some(LatLng::new(lat, lng)).filter(LatLng::is_valid)
}

/// `ddmm.mmmm` / `dddmm.mmmm` plus hemisphere into signed degrees
fn parse_coordinate(value: &str, hemisphere: &str) -> Option<f64> {
    if value.is_empty() || hemisphere.is_empty() {
        return None;
    }

    let raw = value.parse::<f64>().ok()?;
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;

    match hemisphere {
        "N" | "E" => Some(decimal),
        "S" | "W" => Some(-decimal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gga_parsing() {
        let gga = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
        let fix = parse_nmea_sentence(gga).unwrap();

        assert!((fix.position.lat - 48.1173).abs() < 1e-4);
        assert!((fix.position.lng - 11.516_666).abs() < 1e-4);
        assert_eq!(fix.source, "NMEA");
        assert!((fix.accuracy.unwrap() - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_rmc_parsing_western_hemisphere() {
        let rmc = "$GNRMC,201500,A,3659.3696,N,12203.7663,W,0.0,0.0,161026,,,A*6C";
        let fix = parse_nmea_sentence(rmc).unwrap();

        assert!((fix.position.lat - 36.989_493).abs() < 1e-5);
        assert!((fix.position.lng + 122.062_771).abs() < 1e-5);
    }

    #[test]
    fn test_no_fix_sentences() {
        let gga = "$GPGGA,123519,,,,,0,00,,,M,,M,,*66";
        assert!(parse_nmea_sentence(gga).is_none());

        let rmc = "$GPRMC,123519,V,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*7D";
        assert!(parse_nmea_sentence(rmc).is_none());
    }

    #[test]
    fn test_out_of_range_coordinates() {
        // 95 degrees north
        let gga = "$GPGGA,123519,9500.000,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
        assert!(parse_nmea_sentence(gga).is_none());

        // 190 degrees west
        let rmc = "$GPRMC,123519,A,4807.038,N,19000.000,W,022.4,084.4,230394,003.1,W*6A";
        assert!(parse_nmea_sentence(rmc).is_none());
    }

    #[test]
    fn test_invalid_sentence() {
        assert!(parse_nmea_sentence("$INVALID,123,456").is_none());
        assert!(parse_nmea_sentence("$GPGSV,3,1,12,01,40,083,46*75").is_none());
        assert!(parse_nmea_sentence("").is_none());
    }
}
