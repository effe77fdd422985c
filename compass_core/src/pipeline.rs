use tracing::debug;

use crate::calibration::{CalibrationSettings, NormalizedHeading};
use crate::interpreter::{Interpretation, SensorReadingInterpreter};
use crate::sample::RawOrientationSample;
use crate::tracker::ContinuousHeadingTracker;

/// Result of one accepted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingUpdate {
    pub normalized: NormalizedHeading,
    /// Unwrapped angle for the dial animation
    pub continuous: f64,
}

/// Interpreter -> normalizer -> tracker, one synchronous recompute per sample.
#[derive(Debug, Default)]
pub struct HeadingPipeline {
    interpreter: SensorReadingInterpreter,
    tracker: ContinuousHeadingTracker,
    last: Option<HeadingUpdate>,
}

impl HeadingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_session(&mut self) {
        self.interpreter.begin_session();
    }

    /// Run one sample through the pipeline. Returns None when the sample was
    /// dropped or suppressed; the previous state is then untouched.
    pub fn process(
        &mut self,
        sample: &RawOrientationSample,
        screen_offset: f64,
        settings: &CalibrationSettings,
    ) -> Option<HeadingUpdate> {
        self.process_detailed(sample, screen_offset, settings).sample()?;
        self.last
    }

    /// Like `process`, but reports the interpreter outcome.
    pub fn process_detailed(
        &mut self,
        sample: &RawOrientationSample,
        screen_offset: f64,
        settings: &CalibrationSettings,
    ) -> Interpretation {
        let interpretation = self.interpreter.interpret(sample, screen_offset);
        if let Interpretation::Accepted(heading_sample) = interpretation {
            let normalized = NormalizedHeading {
                degrees: settings.apply(heading_sample.heading),
                is_absolute: heading_sample.is_absolute,
                accuracy: heading_sample.accuracy,
            };
            let continuous = self.tracker.update(normalized.degrees);
            debug!(
                "Heading {:.1}° (raw {:.1}°, continuous {:.1}°, absolute={})",
                normalized.degrees, heading_sample.heading, continuous, normalized.is_absolute
            );
            self.last = Some(HeadingUpdate { normalized, continuous });
        }
        interpretation
    }

    pub fn last(&self) -> Option<HeadingUpdate> {
        self.last
    }

    pub fn is_absolute_locked(&self) -> bool {
        self.interpreter.is_absolute_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rotation(alpha: f64, absolute: bool) -> RawOrientationSample {
        RawOrientationSample::RotationAngle { alpha, absolute }
    }

    #[test]
    fn test_calibration_applies_after_interpretation() {
        let mut pipeline = HeadingPipeline::new();
        pipeline.begin_session();
        let settings = CalibrationSettings::new(true, 5.0);
        // interpreter: 360 - 90 = 270; mirror: 90; offset: 95
        let update = pipeline.process(&rotation(90.0, true), 0.0, &settings).unwrap();
        assert_abs_diff_eq!(update.normalized.degrees, 95.0, epsilon = 1e-9);
        assert_abs_diff_eq!(update.continuous, 95.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wraparound_through_pipeline() {
        let mut pipeline = HeadingPipeline::new();
        pipeline.begin_session();
        let settings = CalibrationSettings::default();
        // alpha 10 -> heading 350, alpha 350 -> heading 10
        let first = pipeline.process(&rotation(10.0, true), 0.0, &settings).unwrap();
        let second = pipeline.process(&rotation(350.0, true), 0.0, &settings).unwrap();
        assert_abs_diff_eq!(second.continuous - first.continuous, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(second.normalized.degrees, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_suppressed_sample_leaves_heading_alone() {
        let mut pipeline = HeadingPipeline::new();
        pipeline.begin_session();
        let settings = CalibrationSettings::default();
        let locked = pipeline.process(&rotation(45.0, true), 0.0, &settings).unwrap();

        assert_eq!(pipeline.process(&rotation(200.0, false), 0.0, &settings), None);
        assert_eq!(
            pipeline.process_detailed(&rotation(200.0, false), 0.0, &settings),
            Interpretation::Suppressed
        );
        assert_eq!(pipeline.last(), Some(locked));
    }

    #[test]
    fn test_dropped_sample_leaves_heading_alone() {
        let mut pipeline = HeadingPipeline::new();
        pipeline.begin_session();
        let settings = CalibrationSettings::default();
        assert_eq!(pipeline.process(&rotation(f64::NAN, true), 0.0, &settings), None);
        assert_eq!(pipeline.last(), None);
    }
}
