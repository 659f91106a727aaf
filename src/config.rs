use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::state::DEFAULT_HISTORY_LEN;

const HISTORY_LEN_RANGE: RangeInclusive<usize> = 1..=64;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_width: f32,
    pub window_height: f32,
    pub title: String,
    pub history_len: usize,
    pub queue_capacity: usize,
    pub frame_interval_ms: u64,
    /// Connect straight away to the first port whose name contains this.
    pub preferred_device: Option<String>,
    pub font_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 800.0,
            window_height: 400.0,
            title: "MIDI Note Display".to_string(),
            history_len: DEFAULT_HISTORY_LEN,
            queue_capacity: 100,
            frame_interval_ms: 16,
            preferred_device: None,
            font_path: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|reason| Error::ConfigValue {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !HISTORY_LEN_RANGE.contains(&self.history_len) {
            return Err(format!(
                "history_len must be between {} and {}, got {}",
                HISTORY_LEN_RANGE.start(),
                HISTORY_LEN_RANGE.end(),
                self.history_len
            ));
        }
        Ok(())
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config_overrides_fields() {
        let config = Config::from_json(
            r#"{ "history_len": 8, "preferred_device": "Digital Piano", "font_path": "fonts/mono.ttf" }"#,
        )
        .unwrap();
        assert_eq!(config.history_len, 8);
        assert_eq!(config.preferred_device.as_deref(), Some("Digital Piano"));
        assert_eq!(config.font_path, Some(PathBuf::from("fonts/mono.ttf")));
        assert_eq!(config.window_width, 800.0);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_bad_json_is_rejected() {
        assert!(Config::from_json(r#"{ "history_len": "five" }"#).is_err());
    }

    #[test]
    fn test_history_len_bounds() {
        let parse = |len: &str| Config::from_json(&format!(r#"{{ "history_len": {len} }}"#)).unwrap();
        assert!(parse("0").validate().is_err());
        assert!(parse("18446744073709551615").validate().is_err());
        assert!(parse("65").validate().is_err());
        assert!(parse("1").validate().is_ok());
        assert!(parse("64").validate().is_ok());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_rejects_empty_history() {
        let path = std::env::temp_dir().join(format!("midi-staff-{}.json", std::process::id()));
        fs::write(&path, r#"{ "history_len": 0 }"#).unwrap();
        let err = Config::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, Error::ConfigValue { .. }));
        assert!(err.to_string().contains("history_len"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/midi-staff.json")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("/nonexistent/midi-staff.json"));
    }
}
