//! Persisted spin settings.
//!
//! The browser host stores these as JSON in `localStorage`; the CLI keeps a
//! `settings.json` in its data directory. Both go through [`SpinSettings::from_json`]
//! so a stale or hand-edited document is rejected the same way everywhere.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animator::{TurnRange, DEFAULT_MAX_TURNS, DEFAULT_MIN_TURNS};
use crate::curve::SpeedCurve;

pub const SETTINGS_VERSION: u32 = 1;

pub const DEFAULT_DURATION_S: f64 = 5.0;
pub const MIN_DURATION_S: f64 = 0.5;
pub const MAX_DURATION_S: f64 = 60.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[cfg(feature = "serde")]
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported settings version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpinSettings {
    pub version: u32,
    pub duration_s: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_min_turns"))]
    pub min_turns: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_max_turns"))]
    pub max_turns: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub curve: SpeedCurve,
}

#[cfg(feature = "serde")]
fn default_min_turns() -> f64 {
    DEFAULT_MIN_TURNS
}

#[cfg(feature = "serde")]
fn default_max_turns() -> f64 {
    DEFAULT_MAX_TURNS
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            duration_s: DEFAULT_DURATION_S,
            min_turns: DEFAULT_MIN_TURNS,
            max_turns: DEFAULT_MAX_TURNS,
            curve: SpeedCurve::default(),
        }
    }
}

impl SpinSettings {
    /// Copy with the duration clamped and the turn range normalized.
    pub fn sanitized(&self) -> Self {
        let duration_s = if self.duration_s.is_finite() {
            self.duration_s.clamp(MIN_DURATION_S, MAX_DURATION_S)
        } else {
            DEFAULT_DURATION_S
        };
        let turns = self.turns();
        Self {
            version: SETTINGS_VERSION,
            duration_s,
            min_turns: turns.min_turns,
            max_turns: turns.max_turns,
            curve: self.curve.clone(),
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_s * 1000.0
    }

    pub fn turns(&self) -> TurnRange {
        TurnRange::new(self.min_turns, self.max_turns)
    }
}

#[cfg(feature = "serde")]
impl SpinSettings {
    /// Parse and sanitize. The curve is validated while decoding.
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        let parsed: SpinSettings = serde_json::from_str(raw)?;
        if parsed.version != SETTINGS_VERSION {
            return Err(SettingsError::Version {
                found: parsed.version,
                expected: SETTINGS_VERSION,
            });
        }
        Ok(parsed.sanitized())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Write atomically: temp file next to `path`, then rename.
    pub fn save(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, self.to_json()?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = SpinSettings::default();
        assert_eq!(s.duration_ms(), 5000.0);
        assert_eq!(s.turns(), TurnRange::default());
        assert_eq!(s.curve, SpeedCurve::default());
    }

    #[test]
    fn sanitize_clamps_duration() {
        let mut s = SpinSettings {
            duration_s: 0.0,
            ..SpinSettings::default()
        };
        assert_eq!(s.sanitized().duration_s, MIN_DURATION_S);
        s.duration_s = 1000.0;
        assert_eq!(s.sanitized().duration_s, MAX_DURATION_S);
        s.duration_s = f64::NAN;
        assert_eq!(s.sanitized().duration_s, DEFAULT_DURATION_S);
    }

    #[cfg(feature = "serde")]
    mod json {
        use super::*;
        use crate::curve::ControlPoint;

        #[test]
        fn round_trips_through_json() {
            let mut s = SpinSettings::default();
            s.duration_s = 7.5;
            s.curve.insert(ControlPoint::new(0.3, 0.9));
            let raw = s.to_json().unwrap();
            assert_eq!(SpinSettings::from_json(&raw).unwrap(), s);
        }

        #[test]
        fn rejects_wrong_version() {
            let raw = r#"{"version":99,"duration_s":5.0}"#;
            assert!(matches!(
                SpinSettings::from_json(raw),
                Err(SettingsError::Version { found: 99, .. })
            ));
        }

        #[test]
        fn missing_fields_fall_back_to_defaults() {
            let s = SpinSettings::from_json(r#"{"version":1,"duration_s":3.0}"#).unwrap();
            assert_eq!(s.curve, SpeedCurve::default());
            assert_eq!(s.min_turns, DEFAULT_MIN_TURNS);
        }

        #[test]
        fn rejects_unpinned_curve() {
            let raw = r#"{"version":1,"duration_s":3.0,
                "curve":[{"time":0.1,"speed":1.0},{"time":1.0,"speed":0.0}]}"#;
            assert!(matches!(
                SpinSettings::from_json(raw),
                Err(SettingsError::Json(_))
            ));
        }

        #[test]
        fn save_then_load() {
            let dir = std::env::temp_dir().join(format!("wheelspin-settings-{}", std::process::id()));
            let path = dir.join("settings.json");
            let s = SpinSettings {
                duration_s: 2.0,
                ..SpinSettings::default()
            };
            s.save(&path).unwrap();
            assert_eq!(SpinSettings::load(&path).unwrap(), s);
            let _ = std::fs::remove_dir_all(&dir);
        }
    }
}
