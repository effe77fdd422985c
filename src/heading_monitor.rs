use chrono::{DateTime, Utc};
use compass_core::{
    CalibrationSettings, HeadingPipeline, HeadingUpdate, Interpretation, OrientationEvent, SensorFault,
    SourceKind, Subscription, SubscriptionError, SubscriptionRegistry,
};
use tracing::{debug, info, warn};

use crate::event_reader::{EventHandler, EventOutcome, SensorEvent};

/// Owns the orientation subscription and runs orientation events through the
/// heading pipeline.
pub struct HeadingMonitor {
    pipeline: HeadingPipeline,
    settings: CalibrationSettings,
    subscription: Option<Subscription>,
    /// Waiting for a permission answer before subscribing
    awaiting_permission: bool,
    fault: Option<SensorFault>,
    last_update_at: Option<DateTime<Utc>>,
}

impl HeadingMonitor {
    pub fn new(settings: CalibrationSettings) -> Self {
        Self {
            pipeline: HeadingPipeline::new(),
            settings,
            subscription: None,
            awaiting_permission: false,
            fault: None,
            last_update_at: None,
        }
    }

    /// Subscribe to orientation events and start a new pipeline session.
    pub fn start(&mut self, registry: &mut SubscriptionRegistry) -> Result<(), SubscriptionError> {
        let subscription = registry.subscribe(SourceKind::Orientation)?;
        self.subscription = Some(subscription);
        self.awaiting_permission = false;
        self.fault = None;
        self.pipeline.begin_session();
        info!("Orientation pipeline started");
        Ok(())
    }

    /// Hold off subscribing until the platform's permission prompt is answered.
    pub fn await_permission(&mut self) {
        self.awaiting_permission = true;
        info!("Waiting for orientation permission");
    }

    pub fn stop(&mut self, registry: &mut SubscriptionRegistry) -> Result<(), SubscriptionError> {
        if let Some(subscription) = self.subscription.take() {
            registry.unsubscribe(subscription)?;
            info!("Orientation pipeline stopped");
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn is_awaiting_permission(&self) -> bool {
        self.awaiting_permission
    }

    pub fn fault(&self) -> Option<SensorFault> {
        self.fault
    }

    /// Stop the pipeline and surface the fault. The fault is logged once
    /// however many times the platform repeats it.
    fn record_fault(&mut self, fault: SensorFault, registry: &mut SubscriptionRegistry) {
        if let Err(e) = self.stop(registry) {
            warn!("Failed to release orientation subscription: {}", e);
        }
        self.awaiting_permission = false;
        if self.fault != Some(fault) {
            warn!("Heading unavailable: {}", fault);
            self.fault = Some(fault);
        }
    }

    pub fn settings(&self) -> CalibrationSettings {
        self.settings
    }

    /// New calibration applies from the next accepted sample on.
    pub fn set_settings(&mut self, settings: CalibrationSettings) {
        debug!("Heading calibration now {}", settings);
        self.settings = settings;
    }

    pub fn last(&self) -> Option<HeadingUpdate> {
        self.pipeline.last()
    }

    pub fn last_update_at(&self) -> Option<DateTime<Utc>> {
        self.last_update_at
    }

    pub fn is_absolute_locked(&self) -> bool {
        self.pipeline.is_absolute_locked()
    }

    pub fn process_orientation(&mut self, event: &OrientationEvent) -> EventOutcome {
        if self.subscription.is_none() {
            return EventOutcome::Ignored;
        }

        let sample = match event.to_sample() {
            Some(sample) => sample,
            None => {
                debug!("Orientation event without a usable reading");
                return EventOutcome::Dropped;
            }
        };

        match self.pipeline.process_detailed(&sample, event.screen_rotation(), &self.settings) {
            Interpretation::Accepted(_) => {
                self.last_update_at = Some(Utc::now());
                EventOutcome::Accepted
            }
            Interpretation::Dropped => EventOutcome::Dropped,
            Interpretation::Suppressed => EventOutcome::Suppressed,
        }
    }
}

impl EventHandler for HeadingMonitor {
    fn handle_event(&mut self, event: &SensorEvent, registry: &mut SubscriptionRegistry) -> EventOutcome {
        match event {
            SensorEvent::Orientation(orientation) => self.process_orientation(orientation),
            SensorEvent::OrientationPermission { granted: true } => {
                if self.is_active() {
                    return EventOutcome::Ignored;
                }
                match self.start(registry) {
                    Ok(()) => EventOutcome::Accepted,
                    Err(e) => {
                        warn!("Cannot start orientation pipeline: {}", e);
                        EventOutcome::Ignored
                    }
                }
            }
            SensorEvent::OrientationPermission { granted: false } => {
                self.record_fault(SensorFault::PermissionDenied, registry);
                EventOutcome::Accepted
            }
            SensorEvent::OrientationUnavailable => {
                self.record_fault(SensorFault::Unavailable, registry);
                EventOutcome::Accepted
            }
            SensorEvent::OrientationRevoked => {
                self.record_fault(SensorFault::PermissionDenied, registry);
                EventOutcome::Accepted
            }
            _ => EventOutcome::Ignored,
        }
    }
}
