use chrono::{DateTime, Utc};
use compass_core::geodesy::CoordinateFormat;
use compass_core::{CalibrationSettings, CompassPoint, PositionFault, SensorFault};
use serde::Serialize;

/// Source text shown while the heading is earth-referenced
pub const SOURCE_ABSOLUTE: &str = "GPS/MAG (ABS)";
/// Source text shown for a relative (gyro-only) heading
pub const SOURCE_RELATIVE: &str = "RELATIVE";

/// Everything a renderer needs to draw the display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    pub heading: Option<HeadingView>,
    /// Orientation subscription is running
    pub sensor_active: bool,
    pub awaiting_permission: bool,
    /// Relative samples are being suppressed in favour of absolute ones
    pub absolute_locked: bool,
    pub sensor_fault: Option<SensorFault>,
    pub position: Option<PositionView>,
    pub position_fault: Option<PositionFault>,
    pub coordinate_format: CoordinateFormat,
    pub coordinate_label: String,
    /// Last fix in the selected format
    pub coordinates: Option<String>,
    pub calibration: CalibrationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingView {
    /// Calibrated heading, [0, 360)
    pub degrees: f64,
    /// Three-digit readout, e.g. "007"
    pub readout: String,
    pub cardinal: CompassPoint,
    pub cardinal_name: String,
    /// Unwrapped heading for rotating the dial without 360->0 jumps
    pub continuous: f64,
    pub is_absolute: bool,
    pub accuracy: f64,
    pub source: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionView {
    pub lat: f64,
    pub lon: f64,
    pub accuracy_m: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn source_text(is_absolute: bool) -> &'static str {
    if is_absolute {
        SOURCE_ABSOLUTE
    } else {
        SOURCE_RELATIVE
    }
}
