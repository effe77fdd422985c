use crate::angle::{angle_diff, normalize0_360};

/// Unwraps a stream of [0, 360) headings into one continuous angle.
///
/// The dial renderer rotates by this value, so crossing north animates as a
/// short step instead of a full turn the other way.
#[derive(Debug, Clone, Default)]
pub struct ContinuousHeadingTracker {
    value: Option<f64>,
}

impl ContinuousHeadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next normalized heading and return the continuous value.
    /// The first heading seeds the register.
    pub fn update(&mut self, heading: f64) -> f64 {
        let next = match self.value {
            None => heading,
            Some(previous) => {
                let current = normalize0_360(previous);
                previous + angle_diff(heading, current)
            }
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
