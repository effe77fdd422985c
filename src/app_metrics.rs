use std::time::{Duration, Instant};
use tracing::info;

use crate::event_reader::{EventOutcome, SensorEvent};

/// Counters for the event pipeline, logged and reset periodically
pub struct AppMetrics {
    /// Orientation events received
    pub orientation_events: u64,
    /// Headings that reached the display
    pub headings_accepted: u64,
    /// Orientation samples with no usable reading
    pub samples_dropped: u64,
    /// Relative samples suppressed under the absolute lock
    pub samples_suppressed: u64,
    /// Position fixes that reached the display
    pub position_fixes: u64,
    /// Sensor lifecycle events (permission, faults)
    pub lifecycle_events: u64,
    /// Events no handler wanted
    pub ignored_events: u64,
    /// Datagrams or lines that did not decode
    pub decode_errors: u64,
    /// Calibration writes that failed
    pub store_errors: u64,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self {
            orientation_events: 0,
            headings_accepted: 0,
            samples_dropped: 0,
            samples_suppressed: 0,
            position_fixes: 0,
            lifecycle_events: 0,
            ignored_events: 0,
            decode_errors: 0,
            store_errors: 0,
        }
    }

    /// Account for one handled event
    pub fn record(&mut self, event: &SensorEvent, outcome: EventOutcome) {
        match (event, outcome) {
            (_, EventOutcome::Ignored) => self.ignored_events += 1,
            (SensorEvent::Orientation(_), outcome) => {
                self.orientation_events += 1;
                match outcome {
                    EventOutcome::Accepted => self.headings_accepted += 1,
                    EventOutcome::Dropped => self.samples_dropped += 1,
                    EventOutcome::Suppressed => self.samples_suppressed += 1,
                    EventOutcome::Ignored => {}
                }
            }
            (SensorEvent::Position(_), EventOutcome::Accepted) => self.position_fixes += 1,
            (SensorEvent::Position(_), _) => self.samples_dropped += 1,
            _ => self.lifecycle_events += 1,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn log(&self) {
        info!(
            "[Metrics] Orientation events: {}, Headings: {}, Dropped: {}, Suppressed: {}, Fixes: {}, Lifecycle: {}, Ignored: {}, Decode errors: {}, Store errors: {}",
            self.orientation_events,
            self.headings_accepted,
            self.samples_dropped,
            self.samples_suppressed,
            self.position_fixes,
            self.lifecycle_events,
            self.ignored_events,
            self.decode_errors,
            self.store_errors
        );
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Manages periodic logging of application metrics
pub struct MetricsLogger {
    last_log: Instant,
    log_interval: Duration,
}

impl MetricsLogger {
    pub fn new(log_interval: Duration) -> Self {
        Self {
            last_log: Instant::now(),
            log_interval,
        }
    }

    /// Log and reset the metrics once the interval has passed.
    /// Returns true if metrics were logged
    pub fn check_and_log(&mut self, metrics: &mut AppMetrics) -> bool {
        if self.last_log.elapsed() >= self.log_interval {
            metrics.log();
            metrics.reset();
            self.last_log = Instant::now();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::{GeoPosition, OrientationEvent};

    fn orientation() -> SensorEvent {
        SensorEvent::Orientation(OrientationEvent::default())
    }

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = AppMetrics::new();
        assert_eq!(metrics.orientation_events, 0);
        assert_eq!(metrics.headings_accepted, 0);
        assert_eq!(metrics.position_fixes, 0);
        assert_eq!(metrics.decode_errors, 0);
    }

    #[test]
    fn test_record_outcomes() {
        let mut metrics = AppMetrics::new();
        metrics.record(&orientation(), EventOutcome::Accepted);
        metrics.record(&orientation(), EventOutcome::Suppressed);
        metrics.record(&orientation(), EventOutcome::Dropped);
        metrics.record(&orientation(), EventOutcome::Ignored);
        metrics.record(&SensorEvent::Position(GeoPosition::new(60.0, 25.0)), EventOutcome::Accepted);
        metrics.record(&SensorEvent::PositionUnavailable, EventOutcome::Accepted);

        assert_eq!(metrics.orientation_events, 3);
        assert_eq!(metrics.headings_accepted, 1);
        assert_eq!(metrics.samples_suppressed, 1);
        assert_eq!(metrics.samples_dropped, 1);
        assert_eq!(metrics.ignored_events, 1);
        assert_eq!(metrics.position_fixes, 1);
        assert_eq!(metrics.lifecycle_events, 1);
    }

    #[test]
    fn test_reset_clears_all_counters() {
        let mut metrics = AppMetrics::new();
        metrics.orientation_events = 100;
        metrics.headings_accepted = 50;
        metrics.decode_errors = 5;
        metrics.store_errors = 1;

        metrics.reset();

        assert_eq!(metrics.orientation_events, 0);
        assert_eq!(metrics.headings_accepted, 0);
        assert_eq!(metrics.decode_errors, 0);
        assert_eq!(metrics.store_errors, 0);
    }

    #[test]
    fn test_metrics_logger_interval() {
        let mut logger = MetricsLogger::new(Duration::from_millis(50));
        let mut metrics = AppMetrics::new();

        // Should not log immediately
        assert!(!logger.check_and_log(&mut metrics));

        std::thread::sleep(Duration::from_millis(60));
        assert!(logger.check_and_log(&mut metrics));

        // Should not log immediately after
        assert!(!logger.check_and_log(&mut metrics));
    }
}
