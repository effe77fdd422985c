use std::fmt;

use serde::{Deserialize, Serialize};

use crate::angle::normalize0_360;
use crate::cardinal::CompassPoint;

/// Largest offset magnitude accepted from the user, in degrees
pub const MAX_OFFSET_DEG: f64 = 359.0;

/// User calibration: mirror the heading and/or add a fixed correction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationSettings {
    pub invert: bool,
    pub offset: f64,
}

impl CalibrationSettings {
    pub fn new(invert: bool, offset: f64) -> Self {
        Self { invert, offset }
    }

    pub fn is_valid(&self) -> bool {
        self.offset.is_finite() && self.offset.abs() <= MAX_OFFSET_DEG
    }

    /// Step the offset by `amount` and wrap into [0, 360), as the
    /// calibration dialog buttons do. A fractional result above the largest
    /// accepted offset folds to its negative equivalent.
    pub fn adjust_offset(&mut self, amount: f64) {
        let mut next = normalize0_360(self.offset + amount);
        if next > MAX_OFFSET_DEG {
            next -= 360.0;
        }
        self.offset = next;
    }

    pub fn reset_offset(&mut self) {
        self.offset = 0.0;
    }

    /// Calibrate a raw heading. Result is always in [0, 360).
    pub fn apply(&self, raw: f64) -> f64 {
        let heading = if self.invert { mirror(raw) } else { raw };
        apply_offset(heading, self.offset)
    }
}

impl fmt::Display for CalibrationSettings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invert={} offset={:+}°", self.invert, self.offset)
    }
}

/// Reflect a heading (east and west swap places)
pub fn mirror(heading: f64) -> f64 {
    normalize0_360(360.0 - heading)
}

pub fn apply_offset(heading: f64, offset: f64) -> f64 {
    normalize0_360(heading + offset)
}

/// Heading after calibration, ready for numeric display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedHeading {
    /// Degrees clockwise from north, in [0, 360)
    pub degrees: f64,
    pub is_absolute: bool,
    /// Reported accuracy in degrees, 0 when unknown
    pub accuracy: f64,
}

impl NormalizedHeading {
    /// Three-digit rounded readout, "000" to "359"
    pub fn readout(&self) -> String {
        let rounded = self.degrees.round() as i64 % 360;
        format!("{:03}", rounded)
    }

    pub fn cardinal(&self) -> CompassPoint {
        CompassPoint::from_heading(self.degrees)
    }
}

impl fmt::Display for NormalizedHeading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}° {} ({})",
            self.readout(),
            self.cardinal(),
            if self.is_absolute { "absolute" } else { "relative" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_is_identity() {
        let settings = CalibrationSettings::default();
        assert!(!settings.invert);
        assert_eq!(settings.offset, 0.0);
        for h in [0.0, 45.5, 180.0, 359.9] {
            assert_abs_diff_eq!(settings.apply(h), h, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mirror() {
        assert_eq!(mirror(90.0), 270.0);
        assert_eq!(mirror(0.0), 0.0);
        for h in [0.0, 90.0, 180.0, 270.0] {
            assert_eq!(mirror(mirror(h)), h);
        }
    }

    #[test]
    fn test_apply_offset_wraps() {
        assert_abs_diff_eq!(apply_offset(350.0, 20.0), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(apply_offset(10.0, -20.0), 350.0, epsilon = 1e-9);
        assert_abs_diff_eq!(apply_offset(10.0, 7200.0), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invert_then_offset() {
        let settings = CalibrationSettings::new(true, 10.0);
        // 360 - 90 = 270, + 10
        assert_abs_diff_eq!(settings.apply(90.0), 280.0, epsilon = 1e-9);
        // 360 - 0 = 360 -> wraps to 10
        assert_abs_diff_eq!(settings.apply(0.0), 10.0, epsilon = 1e-9);

        let settings = CalibrationSettings::new(true, -359.0);
        let h = settings.apply(0.5);
        assert!((0.0..360.0).contains(&h));
        assert_abs_diff_eq!(h, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let settings = CalibrationSettings::new(true, 33.0);
        assert_eq!(settings.apply(123.4), settings.apply(123.4));
    }

    #[test]
    fn test_validity() {
        assert!(CalibrationSettings::new(false, 359.0).is_valid());
        assert!(CalibrationSettings::new(false, -359.0).is_valid());
        assert!(!CalibrationSettings::new(false, 360.0).is_valid());
        assert!(!CalibrationSettings::new(false, f64::NAN).is_valid());
    }

    #[test]
    fn test_adjust_offset_wraps_like_dialog() {
        let mut settings = CalibrationSettings::default();
        settings.adjust_offset(-1.0);
        assert_eq!(settings.offset, 359.0);
        settings.adjust_offset(10.0);
        assert_eq!(settings.offset, 9.0);
        settings.adjust_offset(-10.0);
        assert_eq!(settings.offset, 359.0);
        settings.reset_offset();
        assert_eq!(settings.offset, 0.0);
    }

    #[test]
    fn test_adjust_offset_stays_valid() {
        let mut settings = CalibrationSettings::new(false, 358.5);
        settings.adjust_offset(1.0);
        assert_eq!(settings.offset, -0.5);
        assert!(settings.is_valid());

        // large steps wrap more than once
        let mut settings = CalibrationSettings::default();
        settings.adjust_offset(730.0);
        assert_eq!(settings.offset, 10.0);
        settings.adjust_offset(-370.0);
        assert_eq!(settings.offset, 0.0);

        // negative offsets from a save step like any other
        let mut settings = CalibrationSettings::new(true, -15.0);
        settings.adjust_offset(10.0);
        assert_eq!(settings.offset, 355.0);
        assert!(settings.invert);
    }

    #[test]
    fn test_apply_uses_mirror() {
        let settings = CalibrationSettings::new(true, 0.0);
        for raw in [0.0, 45.0, 90.0, 180.0, 270.5, 359.9] {
            assert_abs_diff_eq!(settings.apply(raw), mirror(raw), epsilon = 1e-9);
        }
        assert_eq!(settings.apply(0.0), 0.0);
    }

    #[test]
    fn test_readout() {
        let heading = |degrees| NormalizedHeading { degrees, is_absolute: true, accuracy: 0.0 };
        assert_eq!(heading(5.2).readout(), "005");
        assert_eq!(heading(0.0).readout(), "000");
        assert_eq!(heading(359.4).readout(), "359");
        assert_eq!(heading(359.6).readout(), "000");
        assert_eq!(heading(90.5).readout(), "091");
    }

    #[test]
    fn test_settings_serialization() {
        let settings = CalibrationSettings::new(true, -12.0);
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"invert":true,"offset":-12.0}"#);
        let back: CalibrationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
