use chrono::{DateTime, Utc};
use compass_core::geodesy::{format_coordinates, CoordinateFormat};
use compass_core::{GeoPosition, PositionFault, SourceKind, Subscription, SubscriptionError, SubscriptionRegistry};
use tracing::{debug, info, warn};

use crate::event_reader::{EventHandler, EventOutcome, SensorEvent};

/// Tracks the latest position fix and renders it in the selected format.
pub struct PositionMonitor {
    subscription: Option<Subscription>,
    last_fix: Option<GeoPosition>,
    last_fix_at: Option<DateTime<Utc>>,
    fault: Option<PositionFault>,
    format: CoordinateFormat,
}

impl PositionMonitor {
    pub fn new(format: CoordinateFormat) -> Self {
        Self {
            subscription: None,
            last_fix: None,
            last_fix_at: None,
            fault: None,
            format,
        }
    }

    pub fn start(&mut self, registry: &mut SubscriptionRegistry) -> Result<(), SubscriptionError> {
        self.subscription = Some(registry.subscribe(SourceKind::Position)?);
        info!("Position tracking started ({})", self.format.label());
        Ok(())
    }

    pub fn stop(&mut self, registry: &mut SubscriptionRegistry) -> Result<(), SubscriptionError> {
        if let Some(subscription) = self.subscription.take() {
            registry.unsubscribe(subscription)?;
            info!("Position tracking stopped");
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn process_fix(&mut self, fix: &GeoPosition) -> EventOutcome {
        if self.subscription.is_none() {
            return EventOutcome::Ignored;
        }
        if !fix.is_in_domain() || !fix.lat.is_finite() || !fix.lon.is_finite() {
            debug!("Dropping out-of-range fix {}", fix);
            return EventOutcome::Dropped;
        }

        if self.fault.take().is_some() {
            info!("Position fix recovered at {}", fix);
        }
        self.last_fix = Some(*fix);
        self.last_fix_at = Some(Utc::now());
        EventOutcome::Accepted
    }

    /// The last fix stays on display while the fault is shown.
    fn record_fault(&mut self, fault: PositionFault) {
        if self.fault != Some(fault) {
            warn!("Position unavailable: {}", fault);
            self.fault = Some(fault);
        }
    }

    pub fn last_fix(&self) -> Option<GeoPosition> {
        self.last_fix
    }

    pub fn last_fix_at(&self) -> Option<DateTime<Utc>> {
        self.last_fix_at
    }

    pub fn fault(&self) -> Option<PositionFault> {
        self.fault
    }

    pub fn format(&self) -> CoordinateFormat {
        self.format
    }

    /// Step to the next coordinate format.
    pub fn cycle_format(&mut self) -> CoordinateFormat {
        self.format = self.format.next();
        info!("Coordinate format now {}", self.format.label());
        self.format
    }

    /// Last fix in the selected format.
    pub fn formatted(&self) -> Option<String> {
        self.last_fix
            .map(|fix| format_coordinates(fix.lat, fix.lon, self.format))
    }
}

impl EventHandler for PositionMonitor {
    fn handle_event(&mut self, event: &SensorEvent, _registry: &mut SubscriptionRegistry) -> EventOutcome {
        match event {
            SensorEvent::Position(fix) => self.process_fix(fix),
            SensorEvent::PositionError { code } if self.is_active() => {
                self.record_fault(PositionFault::from_code(*code));
                EventOutcome::Accepted
            }
            SensorEvent::PositionUnavailable if self.is_active() => {
                self.record_fault(PositionFault::Unavailable);
                EventOutcome::Accepted
            }
            _ => EventOutcome::Ignored,
        }
    }
}
