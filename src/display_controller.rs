use compass_core::geodesy::CoordinateFormat;
use compass_core::{CalibrationSettings, SubscriptionRegistry};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::display_state::{source_text, DisplaySnapshot, HeadingView, PositionView};
use crate::event_reader::{DecodeError, EventHandler, EventOutcome, SensorEvent};
use crate::heading_monitor::HeadingMonitor;
use crate::position_monitor::PositionMonitor;

/// User actions coming from the control surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CycleFormat,
    SaveCalibration(CalibrationSettings),
    /// Step the offset by this many degrees, wrapping like the dial buttons
    AdjustOffset(f64),
    ResetOffset,
}

/// Everything the pipeline task consumes, in arrival order.
#[derive(Debug)]
pub enum Input {
    Event(SensorEvent),
    Malformed(DecodeError),
    /// `reply` receives the snapshot after the command has been applied
    Command {
        command: Command,
        reply: Option<oneshot::Sender<DisplaySnapshot>>,
    },
}

/// Side effect the caller has to carry out after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEffect {
    None,
    /// Write these settings to the calibration store
    Persist(CalibrationSettings),
}

/// Owns the display state: both monitors, their subscriptions, the
/// calibration in use and the coordinate format.
pub struct DisplayController {
    registry: SubscriptionRegistry,
    heading: HeadingMonitor,
    position: PositionMonitor,
}

impl DisplayController {
    pub fn new(settings: CalibrationSettings, format: CoordinateFormat) -> Self {
        Self {
            registry: SubscriptionRegistry::new(),
            heading: HeadingMonitor::new(settings),
            position: PositionMonitor::new(format),
        }
    }

    /// Subscribe to both sources. With `require_permission` the orientation
    /// source waits for an explicit grant first.
    pub fn start(&mut self, require_permission: bool) {
        if require_permission {
            self.heading.await_permission();
        } else if let Err(e) = self.heading.start(&mut self.registry) {
            warn!("Cannot start orientation pipeline: {}", e);
        }
        if let Err(e) = self.position.start(&mut self.registry) {
            warn!("Cannot start position tracking: {}", e);
        }
    }

    pub fn shutdown(&mut self) {
        if let Err(e) = self.heading.stop(&mut self.registry) {
            warn!("Failed to stop orientation pipeline: {}", e);
        }
        if let Err(e) = self.position.stop(&mut self.registry) {
            warn!("Failed to stop position tracking: {}", e);
        }
    }

    /// Offer the event to every handler. The first outcome other than
    /// `Ignored` wins.
    pub fn handle_event(&mut self, event: &SensorEvent) -> EventOutcome {
        let handlers: [&mut dyn EventHandler; 2] = [&mut self.heading, &mut self.position];
        let mut outcome = EventOutcome::Ignored;
        for handler in handlers {
            let result = handler.handle_event(event, &mut self.registry);
            if outcome == EventOutcome::Ignored {
                outcome = result;
            }
        }
        outcome
    }

    pub fn handle_command(&mut self, command: Command) -> CommandEffect {
        match command {
            Command::CycleFormat => {
                self.position.cycle_format();
                CommandEffect::None
            }
            Command::SaveCalibration(settings) => {
                if !settings.is_valid() {
                    warn!("Rejecting calibration {}", settings);
                    return CommandEffect::None;
                }
                info!("Calibration set to {}", settings);
                self.heading.set_settings(settings);
                CommandEffect::Persist(settings)
            }
            Command::AdjustOffset(step) => {
                if !step.is_finite() {
                    warn!("Rejecting offset step {}", step);
                    return CommandEffect::None;
                }
                let mut settings = self.heading.settings();
                settings.adjust_offset(step);
                info!("Calibration offset stepped by {}: {}", step, settings);
                self.heading.set_settings(settings);
                CommandEffect::Persist(settings)
            }
            Command::ResetOffset => {
                let mut settings = self.heading.settings();
                settings.reset_offset();
                info!("Calibration offset reset: {}", settings);
                self.heading.set_settings(settings);
                CommandEffect::Persist(settings)
            }
        }
    }

    /// Apply a command and answer the requester with the resulting snapshot.
    pub fn handle_request(
        &mut self,
        command: Command,
        reply: Option<oneshot::Sender<DisplaySnapshot>>,
    ) -> CommandEffect {
        let effect = self.handle_command(command);
        if let Some(reply) = reply {
            if reply.send(self.snapshot()).is_err() {
                debug!("Command requester went away before the reply");
            }
        }
        effect
    }

    pub fn calibration(&self) -> CalibrationSettings {
        self.heading.settings()
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        let heading = self.heading.last().map(|update| {
            let normalized = update.normalized;
            let cardinal = normalized.cardinal();
            HeadingView {
                degrees: normalized.degrees,
                readout: normalized.readout(),
                cardinal,
                cardinal_name: cardinal.name().to_string(),
                continuous: update.continuous,
                is_absolute: normalized.is_absolute,
                accuracy: normalized.accuracy,
                source: source_text(normalized.is_absolute).to_string(),
                updated_at: self.heading.last_update_at(),
            }
        });

        let position = self.position.last_fix().map(|fix| PositionView {
            lat: fix.lat,
            lon: fix.lon,
            accuracy_m: fix.accuracy_m,
            updated_at: self.position.last_fix_at(),
        });

        let format = self.position.format();
        DisplaySnapshot {
            heading,
            sensor_active: self.heading.is_active(),
            awaiting_permission: self.heading.is_awaiting_permission(),
            absolute_locked: self.heading.is_absolute_locked(),
            sensor_fault: self.heading.fault(),
            position,
            position_fault: self.position.fault(),
            coordinate_format: format,
            coordinate_label: format.label().to_string(),
            coordinates: self.position.formatted(),
            calibration: self.heading.settings(),
        }
    }
}
