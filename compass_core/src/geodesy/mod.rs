//! Geodetic conversions of a WGS84/ETRS89 latitude/longitude fix into the
//! textual representations shown on the display.
//!
//! All functions are pure and total over `lat ∈ [-90, 90]`,
//! `lon ∈ [-180, 180]`. Output for other inputs is unspecified.

pub mod decimal;
pub mod format;
pub mod maidenhead;
pub mod military_grid;
pub mod national_grid;

// Re-export commonly used types
pub use decimal::to_decimal;
pub use format::{CoordinateFormat, format_coordinates};
pub use maidenhead::to_maidenhead;
pub use military_grid::to_military_grid;
pub use national_grid::{GridCoordinate, to_national_grid, tm35fin};
