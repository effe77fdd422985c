use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use compass_core::CalibrationSettings;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
    /// Offset outside the accepted range
    Invalid(CalibrationSettings),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "calibration store I/O error: {}", e),
            StoreError::Serialize(e) => write!(f, "calibration serialization error: {}", e),
            StoreError::Invalid(settings) => write!(f, "invalid calibration: {}", settings),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e)
    }
}

/// Persistence boundary for the user's calibration.
pub trait CalibrationStore: Send + Sync {
    /// Stored settings, or None when nothing usable is stored. Corrupt data
    /// is reported through the log and treated as absent.
    fn load(&self) -> Option<CalibrationSettings>;

    /// Overwrite the stored settings.
    fn save(&self, settings: &CalibrationSettings) -> Result<(), StoreError>;
}

/// Stored settings, falling back to no mirror and no offset.
pub fn load_or_default(store: &dyn CalibrationStore) -> CalibrationSettings {
    store.load().unwrap_or_default()
}

/// Calibration kept as a small JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalibrationStore for JsonFileStore {
    fn load(&self) -> Option<CalibrationSettings> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No stored calibration at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<CalibrationSettings>(&contents) {
            Ok(settings) if settings.is_valid() => Some(settings),
            Ok(settings) => {
                warn!("Ignoring out-of-range stored calibration ({}), using defaults", settings);
                None
            }
            Err(e) => {
                warn!("Stored calibration at {} is corrupt ({}), using defaults", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, settings: &CalibrationSettings) -> Result<(), StoreError> {
        if !settings.is_valid() {
            return Err(StoreError::Invalid(*settings));
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // write next to the target and rename so a crash never leaves half a file
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "compassi-store-{}-{}.json",
            std::process::id(),
            name
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.load(), None);
        assert_eq!(load_or_default(&store), CalibrationSettings::default());
    }

    #[test]
    fn test_round_trip() {
        let path = temp_path("round-trip");
        let store = JsonFileStore::new(&path);
        let settings = CalibrationSettings::new(true, -15.0);
        store.save(&settings).unwrap();
        assert_eq!(store.load(), Some(settings));

        // saving again overwrites
        let settings = CalibrationSettings::new(false, 7.0);
        store.save(&settings).unwrap();
        store.save(&settings).unwrap();
        assert_eq!(store.load(), Some(settings));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let path = temp_path("corrupt");
        fs::write(&path, "{\"invert\": tru").unwrap();
        let store = JsonFileStore::new(&path);
        assert_eq!(store.load(), None);
        assert_eq!(load_or_default(&store), CalibrationSettings::default());

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert_eq!(load_or_default(&store), CalibrationSettings::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_out_of_range_offset_is_rejected() {
        let path = temp_path("out-of-range");
        fs::write(&path, r#"{"invert": false, "offset": 720.0}"#).unwrap();
        let store = JsonFileStore::new(&path);
        assert_eq!(store.load(), None);

        let err = store.save(&CalibrationSettings::new(false, 400.0)).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = std::env::temp_dir().join(format!("compassi-store-dir-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let store = JsonFileStore::new(dir.join("nested").join("calibration.json"));
        store.save(&CalibrationSettings::new(true, 0.0)).unwrap();
        assert_eq!(store.load(), Some(CalibrationSettings::new(true, 0.0)));
        let _ = fs::remove_dir_all(dir);
    }
}
