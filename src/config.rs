use compass_core::geodesy::CoordinateFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory where log files will be stored
    pub directory: String,
    /// Log file name prefix (date will be appended)
    pub file_prefix: String,
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: "./logs".to_string(),
            file_prefix: "compassi".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Where sensor events come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// UDP address to receive JSON sensor events on
    pub udp_listen: String,
    /// Replay events from a JSON-lines file instead of listening on UDP
    pub replay_file: Option<String>,
    /// Pause between replayed events
    pub replay_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            udp_listen: "0.0.0.0:10110".to_string(),
            replay_file: None,
            replay_interval_ms: 50,
        }
    }
}

impl InputConfig {
    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub enabled: bool,
    pub port: u16,
    /// Directory with a renderer front end, served for non-API paths
    pub static_dir: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8080,
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// File the user's calibration is saved to
    pub settings_path: String,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            settings_path: "./calibration.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Coordinate format shown at startup
    pub coordinate_format: CoordinateFormat,
    /// Wait for an orientation_permission grant before processing
    /// orientation events (platforms that ask the user first)
    pub require_orientation_permission: bool,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
