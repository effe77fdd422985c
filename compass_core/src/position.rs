use std::fmt;

use serde::{Deserialize, Serialize};

/// Position fix from the platform geolocation service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
    /// Horizontal accuracy radius in meters
    #[serde(default, rename = "accuracy")]
    pub accuracy_m: Option<f64>,
}

impl GeoPosition {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon, accuracy_m: None }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    /// Inside the range the geodetic conversions are defined for
    pub fn is_in_domain(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}°, {:.6}°)", self.lat, self.lon)?;
        if let Some(acc) = self.accuracy_m {
            write!(f, " ±{:.0} m", acc)?;
        }
        Ok(())
    }
}

/// Why no position is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionFault {
    PermissionDenied,
    Unavailable,
}

impl PositionFault {
    /// Map a geolocation error code: 1 is a denied permission, anything
    /// else (timeout, no signal) counts as unavailable.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => PositionFault::PermissionDenied,
            _ => PositionFault::Unavailable,
        }
    }
}

impl fmt::Display for PositionFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PositionFault::PermissionDenied => write!(f, "position permission denied"),
            PositionFault::Unavailable => write!(f, "position unavailable"),
        }
    }
}

impl std::error::Error for PositionFault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_new_and_display() {
        let pos = GeoPosition::new(60.169856, 24.938379);
        assert_eq!(format!("{}", pos), "(60.169856°, 24.938379°)");

        let pos = pos.with_accuracy(12.4);
        assert_eq!(format!("{}", pos), "(60.169856°, 24.938379°) ±12 m");
    }

    #[test]
    fn test_domain() {
        assert!(GeoPosition::new(90.0, 180.0).is_in_domain());
        assert!(GeoPosition::new(-90.0, -180.0).is_in_domain());
        assert!(!GeoPosition::new(90.1, 0.0).is_in_domain());
        assert!(!GeoPosition::new(0.0, f64::NAN).is_in_domain());
    }

    #[test]
    fn test_fault_codes() {
        assert_eq!(PositionFault::from_code(1), PositionFault::PermissionDenied);
        assert_eq!(PositionFault::from_code(2), PositionFault::Unavailable);
        assert_eq!(PositionFault::from_code(3), PositionFault::Unavailable);
    }

    #[test]
    fn test_deserialize_fix() {
        let pos: GeoPosition = serde_json::from_str(r#"{"lat": 60.1, "lon": 24.9, "accuracy": 8.0}"#).unwrap();
        assert_eq!(pos, GeoPosition::new(60.1, 24.9).with_accuracy(8.0));

        let pos: GeoPosition = serde_json::from_str(r#"{"lat": 60.1, "lon": 24.9}"#).unwrap();
        assert_eq!(pos.accuracy_m, None);
    }
}
