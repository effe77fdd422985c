use std::fmt;

use serde::Deserialize;

use crate::screen::ScreenRotationChain;

/// One orientation reading in a platform-independent shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawOrientationSample {
    /// A magnetometer-derived compass heading. Always absolute.
    CompassHeading { value: f64, accuracy: f64 },
    /// Rotation around the device z-axis, counter-clockwise.
    /// Absolute only when the source says so.
    RotationAngle { alpha: f64, absolute: bool },
}

impl RawOrientationSample {
    pub fn is_absolute(&self) -> bool {
        match self {
            RawOrientationSample::CompassHeading { .. } => true,
            RawOrientationSample::RotationAngle { absolute, .. } => *absolute,
        }
    }
}

impl fmt::Display for RawOrientationSample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RawOrientationSample::CompassHeading { value, accuracy } => {
                write!(f, "CompassHeading {:.2}° (±{:.1}°)", value, accuracy)
            }
            RawOrientationSample::RotationAngle { alpha, absolute } => {
                write!(f, "RotationAngle alpha={:.2}° absolute={}", alpha, absolute)
            }
        }
    }
}

/// Orientation event as delivered by the platform.
///
/// Different platforms fill different fields: WebKit devices report
/// `webkitCompassHeading`, everything else reports `alpha` with an optional
/// `absolute` flag. The screen rotation travels with the event because it can
/// change mid-session.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationEvent {
    #[serde(default)]
    pub webkit_compass_heading: Option<f64>,
    #[serde(default)]
    pub webkit_compass_accuracy: Option<f64>,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub absolute: Option<bool>,
    /// Preferred screen orientation angle (0/90/180/270)
    #[serde(default)]
    pub screen_angle: Option<f64>,
    /// Legacy numeric orientation property, may be -90
    #[serde(default)]
    pub window_orientation: Option<f64>,
}

impl OrientationEvent {
    /// Decode the event into a sample. Returns None when the primary field is
    /// missing or not a finite number.
    pub fn to_sample(&self) -> Option<RawOrientationSample> {
        if let Some(value) = self.webkit_compass_heading.filter(|v| v.is_finite()) {
            let accuracy = self
                .webkit_compass_accuracy
                .filter(|a| a.is_finite())
                .unwrap_or(0.0);
            return Some(RawOrientationSample::CompassHeading { value, accuracy });
        }

        self.alpha
            .filter(|a| a.is_finite())
            .map(|alpha| RawOrientationSample::RotationAngle {
                alpha,
                absolute: self.absolute.unwrap_or(false),
            })
    }

    /// Screen rotation for this event: preferred angle, then the legacy
    /// property, then 0.
    pub fn screen_rotation(&self) -> f64 {
        ScreenRotationChain::new()
            .with_provider(|| self.screen_angle)
            .with_provider(|| self.window_orientation)
            .resolve()
    }
}
