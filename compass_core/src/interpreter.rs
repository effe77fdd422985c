use std::fmt;

use tracing::trace;

use crate::angle::normalize0_360;
use crate::sample::RawOrientationSample;

/// A uniform heading sample, before calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample {
    /// Degrees clockwise from north, in [0, 360)
    pub heading: f64,
    pub is_absolute: bool,
    pub accuracy: f64,
}

/// Outcome of interpreting one raw sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interpretation {
    Accepted(HeadingSample),
    /// Primary field was unusable
    Dropped,
    /// A relative sample arrived while an absolute source holds the lock
    Suppressed,
}

impl Interpretation {
    pub fn sample(&self) -> Option<HeadingSample> {
        match self {
            Interpretation::Accepted(sample) => Some(*sample),
            _ => None,
        }
    }
}

/// Why the orientation pipeline could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorFault {
    /// No orientation capability on this device
    Unavailable,
    PermissionDenied,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SensorFault::Unavailable => write!(f, "orientation sensor unavailable"),
            SensorFault::PermissionDenied => write!(f, "orientation permission denied"),
        }
    }
}

impl std::error::Error for SensorFault {}

/// Turns raw orientation samples into headings and arbitrates between
/// absolute and relative streams.
///
/// Once an absolute sample has been accepted, relative rotation samples are
/// suppressed. The lock is released only after a whole subscription session
/// goes by without a single absolute sample.
#[derive(Debug, Default)]
pub struct SensorReadingInterpreter {
    absolute_locked: bool,
    absolute_seen_this_session: bool,
}

impl SensorReadingInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subscription session.
    pub fn begin_session(&mut self) {
        self.absolute_locked = self.absolute_seen_this_session;
        self.absolute_seen_this_session = false;
    }

    pub fn is_absolute_locked(&self) -> bool {
        self.absolute_locked
    }

    /// Interpret one sample against the current screen rotation (degrees).
    pub fn interpret(&mut self, sample: &RawOrientationSample, screen_offset: f64) -> Interpretation {
        let offset = if screen_offset.is_finite() { screen_offset } else { 0.0 };

        let (heading, is_absolute, accuracy) = match *sample {
            RawOrientationSample::CompassHeading { value, accuracy } => {
                if !value.is_finite() {
                    return Interpretation::Dropped;
                }
                (normalize0_360(value + offset), true, accuracy)
            }
            RawOrientationSample::RotationAngle { alpha, absolute } => {
                if !alpha.is_finite() {
                    return Interpretation::Dropped;
                }
                if !absolute && self.absolute_locked {
                    trace!("Suppressing relative sample alpha={:.2} under absolute lock", alpha);
                    return Interpretation::Suppressed;
                }
                (normalize0_360(360.0 - alpha - offset), absolute, 0.0)
            }
        };

        if is_absolute {
            self.absolute_locked = true;
            self.absolute_seen_this_session = true;
        }

        Interpretation::Accepted(HeadingSample {
            heading,
            is_absolute,
            accuracy: if accuracy.is_finite() { accuracy } else { 0.0 },
        })
    }
}
