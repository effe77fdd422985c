//! UTM-style grid reference for the display.
//!
//! This is an approximation: the meridional distance comes from a short
//! closed-form series and the easting from a spherical scale, and the 100 km
//! grid square letters of a full MGRS reference are not produced. The
//! latitude band is fixed to the one covering the intended operating area
//! (60°N-64°N). Expect errors of tens of meters or more away from the zone's
//! central meridian.

use std::f64::consts::PI;

/// Latitude band letter printed after the zone number
pub const OPERATING_BAND: char = 'V';

const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500000.0;
const EQUATORIAL_RADIUS: f64 = 6378137.0;

/// UTM zone number, 1-60. Longitude 180 belongs to zone 60.
pub fn utm_zone(lon: f64) -> u8 {
    let zone = ((lon + 180.0) / 6.0).floor() as i64 + 1;
    zone.clamp(1, 60) as u8
}

/// Central meridian of a zone in degrees.
pub fn zone_central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// Approximate (easting, northing) in meters for the fix's own zone.
pub fn approximate_utm(lat: f64, lon: f64) -> (u8, f64, f64) {
    let zone = utm_zone(lon);
    let lambda0 = zone_central_meridian(zone) * PI / 180.0;
    let phi = lat.to_radians();
    let lambda = lon.to_radians();

    let northing = lat * 111132.92 - 559.82 * (2.0 * phi).sin() + 1.175 * (4.0 * phi).sin();
    let easting = FALSE_EASTING + (lambda - lambda0) * phi.cos() * EQUATORIAL_RADIUS * SCALE_FACTOR;

    (zone, easting, northing)
}

/// `"{zone}{band} {easting} {northing}"`, rounded to the meter.
pub fn to_military_grid(lat: f64, lon: f64) -> String {
    let (zone, easting, northing) = approximate_utm(lat, lon);
    format!("{}{} {:.0} {:.0}", zone, OPERATING_BAND, easting.round(), northing.round())
}
