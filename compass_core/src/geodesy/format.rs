use std::fmt;

use serde::{Deserialize, Serialize};

use super::{to_decimal, to_maidenhead, to_military_grid, to_national_grid};

/// Coordinate representation selected on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateFormat {
    #[default]
    Decimal,
    Maidenhead,
    NationalGrid,
    MilitaryGridApprox,
}

/// Order the display steps through
const CYCLE: [CoordinateFormat; 4] = [
    CoordinateFormat::Decimal,
    CoordinateFormat::NationalGrid,
    CoordinateFormat::MilitaryGridApprox,
    CoordinateFormat::Maidenhead,
];

impl CoordinateFormat {
    pub fn next(self) -> Self {
        let index = CYCLE.iter().position(|f| *f == self).unwrap_or(0);
        CYCLE[(index + 1) % CYCLE.len()]
    }

    /// Short label shown next to the coordinate text
    pub fn label(&self) -> &'static str {
        match self {
            CoordinateFormat::Decimal => "DD",
            CoordinateFormat::Maidenhead => "QTH",
            CoordinateFormat::NationalGrid => "TM35",
            CoordinateFormat::MilitaryGridApprox => "UTM",
        }
    }
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn format_coordinates(lat: f64, lon: f64, format: CoordinateFormat) -> String {
    match format {
        CoordinateFormat::Decimal => to_decimal(lat, lon),
        CoordinateFormat::Maidenhead => to_maidenhead(lat, lon),
        CoordinateFormat::NationalGrid => to_national_grid(lat, lon),
        CoordinateFormat::MilitaryGridApprox => to_military_grid(lat, lon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_order() {
        let mut format = CoordinateFormat::Decimal;
        let mut seen = vec![format];
        for _ in 0..4 {
            format = format.next();
            seen.push(format);
        }
        assert_eq!(
            seen,
            vec![
                CoordinateFormat::Decimal,
                CoordinateFormat::NationalGrid,
                CoordinateFormat::MilitaryGridApprox,
                CoordinateFormat::Maidenhead,
                CoordinateFormat::Decimal,
            ]
        );
    }

    #[test]
    fn test_format_dispatch() {
        assert_eq!(format_coordinates(60.1, 24.9, CoordinateFormat::Decimal), "60.10000, 24.90000");
        assert_eq!(format_coordinates(60.1, 24.9, CoordinateFormat::Maidenhead), "KP20kc");
        assert_eq!(
            format_coordinates(60.1, 24.9, CoordinateFormat::NationalGrid),
            "N 6664403 E 383234"
        );
        assert_eq!(
            format_coordinates(60.1, 24.9, CoordinateFormat::MilitaryGridApprox),
            "35V 383515 6678604"
        );
    }

    #[test]
    fn test_formats_are_deterministic() {
        for format in CYCLE {
            assert_eq!(
                format_coordinates(61.5, 23.75, format),
                format_coordinates(61.5, 23.75, format)
            );
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&CoordinateFormat::MilitaryGridApprox).unwrap();
        assert_eq!(json, r#""military_grid_approx""#);
        let format: CoordinateFormat = serde_json::from_str(r#""national_grid""#).unwrap();
        assert_eq!(format, CoordinateFormat::NationalGrid);
    }
}
