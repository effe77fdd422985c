//! Compass core library
//!
//! The numeric heart of a handheld heading/position display:
//! - Interpretation of platform orientation events into one heading sample
//! - User calibration (mirror + fixed offset)
//! - Continuous (unwrapped) heading tracking for smooth dial rotation
//! - Conversion of a position fix into several coordinate representations
//!
//! # Example
//!
//! ```
//! use compass_core::{CalibrationSettings, HeadingPipeline, RawOrientationSample};
//! use compass_core::geodesy::{format_coordinates, CoordinateFormat};
//!
//! let mut pipeline = HeadingPipeline::new();
//! pipeline.begin_session();
//!
//! let sample = RawOrientationSample::RotationAngle { alpha: 30.0, absolute: true };
//! let update = pipeline
//!     .process(&sample, 0.0, &CalibrationSettings::default())
//!     .unwrap();
//! assert_eq!(update.normalized.degrees, 330.0);
//!
//! let text = format_coordinates(60.1, 24.9, CoordinateFormat::Decimal);
//! assert_eq!(text, "60.10000, 24.90000");
//! ```

pub mod angle;
pub mod calibration;
pub mod cardinal;
pub mod geodesy;
pub mod interpreter;
pub mod pipeline;
pub mod position;
pub mod sample;
pub mod screen;
pub mod subscription;
pub mod tracker;

// Re-export commonly used types
pub use calibration::{CalibrationSettings, NormalizedHeading};
pub use cardinal::CompassPoint;
pub use interpreter::{HeadingSample, Interpretation, SensorFault, SensorReadingInterpreter};
pub use pipeline::{HeadingPipeline, HeadingUpdate};
pub use position::{GeoPosition, PositionFault};
pub use sample::{OrientationEvent, RawOrientationSample};
pub use screen::ScreenRotationChain;
pub use subscription::{SourceKind, Subscription, SubscriptionError, SubscriptionRegistry};
pub use tracker::ContinuousHeadingTracker;
