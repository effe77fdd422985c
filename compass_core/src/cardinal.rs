//! Translates numeric headings to 8-point compass directions (N, NE, E, ...).

use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Lookup table in clockwise order, 45° apart starting at north
const POINTS: [CompassPoint; 8] = [
    CompassPoint::N,
    CompassPoint::NE,
    CompassPoint::E,
    CompassPoint::SE,
    CompassPoint::S,
    CompassPoint::SW,
    CompassPoint::W,
    CompassPoint::NW,
];

impl CompassPoint {
    /// `round(heading / 45) mod 8` into the table
    pub fn from_heading(heading: f64) -> Self {
        let index = ((heading / 45.0).round() as i64).rem_euclid(8) as usize;
        POINTS[index]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompassPoint::N => "north",
            CompassPoint::NE => "northeast",
            CompassPoint::E => "east",
            CompassPoint::SE => "southeast",
            CompassPoint::S => "south",
            CompassPoint::SW => "southwest",
            CompassPoint::W => "west",
            CompassPoint::NW => "northwest",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}
